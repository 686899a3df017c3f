//! Minimal SCIM filter reader.
//!
//! Turns filter text (RFC 7644 Section 3.4.2) into a [`Filter`] tree so that
//! each attribute token can be handed to
//! [`resolve_field`](super::field::resolve_field). Only the subset needed to
//! reach the attribute tokens is supported:
//!
//! ```text
//! filter  = term *("or" term)
//! term    = factor *("and" factor)
//! factor  = "not" "(" filter ")" / "(" filter ")" / ATTR "pr" / ATTR OP VALUE
//! ATTR    = ALPHA *(ALPHA / DIGIT / "_" / "-" / "$" / ":" / ".")
//! OP      = eq / ne / co / sw / ew / gt / ge / lt / le
//! VALUE   = STRING / NUMBER / true / false / null
//! ```
//!
//! Attribute tokens are returned exactly as written. Value paths
//! (`emails[type eq "work"]`) are not supported. Strings accept the `\"` and
//! `\\` escapes only.

use std::{iter::Peekable, str::CharIndices, vec};

use serde::{Deserialize, Serialize};

/// Size limits applied before and during parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "json-schema", derive(schemars::JsonSchema))]
#[serde(deny_unknown_fields)]
pub struct FilterLimits {
    /// Longest accepted filter, in bytes.
    #[serde(default = "FilterLimits::default_max_length")]
    pub max_length: usize,

    /// Deepest accepted nesting of parentheses.
    #[serde(default = "FilterLimits::default_max_depth")]
    pub max_depth: usize,
}

impl FilterLimits {
    fn default_max_length() -> usize {
        4096
    }

    fn default_max_depth() -> usize {
        32
    }
}

impl Default for FilterLimits {
    fn default() -> Self {
        Self {
            max_length: Self::default_max_length(),
            max_depth: Self::default_max_depth(),
        }
    }
}

/// Filter tree with unresolved attribute tokens.
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    Compare {
        attr: String,
        op: CompareOp,
        value: FilterValue,
    },
    Present {
        attr: String,
    },
    And(Box<Filter>, Box<Filter>),
    Or(Box<Filter>, Box<Filter>),
    Not(Box<Filter>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompareOp {
    Eq,
    Ne,
    Co,
    Sw,
    Ew,
    Gt,
    Ge,
    Lt,
    Le,
}

impl CompareOp {
    const ALL: [CompareOp; 9] = [
        CompareOp::Eq,
        CompareOp::Ne,
        CompareOp::Co,
        CompareOp::Sw,
        CompareOp::Ew,
        CompareOp::Gt,
        CompareOp::Ge,
        CompareOp::Lt,
        CompareOp::Le,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CompareOp::Eq => "eq",
            CompareOp::Ne => "ne",
            CompareOp::Co => "co",
            CompareOp::Sw => "sw",
            CompareOp::Ew => "ew",
            CompareOp::Gt => "gt",
            CompareOp::Ge => "ge",
            CompareOp::Lt => "lt",
            CompareOp::Le => "le",
        }
    }

    fn from_word(word: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|op| op.as_str().eq_ignore_ascii_case(word))
    }
}

/// Comparison operand.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FilterValue {
    String(String),
    Bool(bool),
    Number(f64),
    Null,
}

/// Malformed filter text.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{message} at position {position}")]
pub struct FilterParseError {
    pub message: String,
    /// Byte offset into the filter text
    pub position: usize,
}

impl FilterParseError {
    fn new(message: impl Into<String>, position: usize) -> Self {
        Self {
            message: message.into(),
            position,
        }
    }
}

/// Parse `input` with [`FilterLimits::default`].
///
/// ```
/// use scim_fields::scim::{Filter, parse_filter};
///
/// let filter = parse_filter("urn:example:2.0:Custom:costCenter pr").unwrap();
/// assert!(matches!(filter, Filter::Present { .. }));
/// ```
pub fn parse_filter(input: &str) -> Result<Filter, FilterParseError> {
    parse_filter_with_limits(input, &FilterLimits::default())
}

/// Parse `input`, rejecting it if it is longer or deeper than `limits` allow.
pub fn parse_filter_with_limits(
    input: &str,
    limits: &FilterLimits,
) -> Result<Filter, FilterParseError> {
    if input.len() > limits.max_length {
        return Err(FilterParseError::new(
            format!(
                "Filter exceeds maximum length ({} bytes, max {})",
                input.len(),
                limits.max_length
            ),
            0,
        ));
    }

    let mut stream = TokenStream {
        input,
        tokens: tokenize(input)?.into_iter().peekable(),
        depth: 0,
        max_depth: limits.max_depth,
    };
    let filter = stream.or_expr()?;

    match stream.tokens.peek() {
        None => Ok(filter),
        Some(rest) => Err(FilterParseError::new(
            format!("Unexpected input: '{}'", &input[rest.at..]),
            rest.at,
        )),
    }
}

// -----------------------------------------------------------------------------
// Lexer
// -----------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
enum Token<'a> {
    /// Attribute token, keyword, operator or literal name
    Word(&'a str),
    Str(String),
    Num(f64),
    Open,
    Close,
}

#[derive(Debug)]
struct Lexed<'a> {
    token: Token<'a>,
    at: usize,
}

type Chars<'a> = Peekable<CharIndices<'a>>;

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '$' | ':' | '.')
}

fn is_number_char(c: char) -> bool {
    c.is_ascii_digit() || matches!(c, '.' | 'e' | 'E' | '+' | '-')
}

fn tokenize(input: &str) -> Result<Vec<Lexed<'_>>, FilterParseError> {
    let mut chars = input.char_indices().peekable();
    let mut tokens = Vec::new();

    while let Some(&(at, c)) = chars.peek() {
        let token = match c {
            c if c.is_whitespace() => {
                chars.next();
                continue;
            }
            '(' => {
                chars.next();
                Token::Open
            }
            ')' => {
                chars.next();
                Token::Close
            }
            '"' => {
                chars.next();
                Token::Str(read_string(&mut chars, at)?)
            }
            c if c.is_ascii_alphabetic() => Token::Word(take_while(input, &mut chars, is_word_char)),
            c if c.is_ascii_digit() || c == '-' || c == '+' => {
                let lexeme = take_while(input, &mut chars, is_number_char);
                let number = lexeme.parse::<f64>().map_err(|_| {
                    FilterParseError::new(format!("Invalid number: '{lexeme}'"), at)
                })?;
                Token::Num(number)
            }
            other => {
                return Err(FilterParseError::new(
                    format!("Unexpected character '{other}'"),
                    at,
                ));
            }
        };
        tokens.push(Lexed { token, at });
    }

    Ok(tokens)
}

fn take_while<'a>(input: &'a str, chars: &mut Chars<'a>, accept: fn(char) -> bool) -> &'a str {
    let start = chars.peek().map_or(input.len(), |&(i, _)| i);
    while chars.next_if(|&(_, c)| accept(c)).is_some() {}
    let end = chars.peek().map_or(input.len(), |&(i, _)| i);
    &input[start..end]
}

/// Read a string body; the opening quote at `start` is already consumed.
fn read_string(chars: &mut Chars<'_>, start: usize) -> Result<String, FilterParseError> {
    let mut value = String::new();
    loop {
        match chars.next() {
            None => return Err(FilterParseError::new("Unterminated string", start)),
            Some((_, '"')) => return Ok(value),
            Some((at, '\\')) => match chars.next() {
                Some((_, c @ ('"' | '\\'))) => value.push(c),
                _ => return Err(FilterParseError::new("Invalid escape sequence", at)),
            },
            Some((_, c)) => value.push(c),
        }
    }
}

// -----------------------------------------------------------------------------
// Parser
// -----------------------------------------------------------------------------

struct TokenStream<'a> {
    input: &'a str,
    tokens: Peekable<vec::IntoIter<Lexed<'a>>>,
    depth: usize,
    max_depth: usize,
}

impl<'a> TokenStream<'a> {
    fn position(&mut self) -> usize {
        self.tokens.peek().map_or(self.input.len(), |lexed| lexed.at)
    }

    fn eat(&mut self, expected: &Token<'a>) -> bool {
        self.tokens.next_if(|lexed| lexed.token == *expected).is_some()
    }

    fn eat_keyword(&mut self, keyword: &str) -> bool {
        self.tokens
            .next_if(|lexed| matches!(lexed.token, Token::Word(w) if w.eq_ignore_ascii_case(keyword)))
            .is_some()
    }

    fn or_expr(&mut self) -> Result<Filter, FilterParseError> {
        let mut filter = self.and_expr()?;
        while self.eat_keyword("or") {
            filter = Filter::Or(Box::new(filter), Box::new(self.and_expr()?));
        }
        Ok(filter)
    }

    fn and_expr(&mut self) -> Result<Filter, FilterParseError> {
        let mut filter = self.factor()?;
        while self.eat_keyword("and") {
            filter = Filter::And(Box::new(filter), Box::new(self.factor()?));
        }
        Ok(filter)
    }

    fn factor(&mut self) -> Result<Filter, FilterParseError> {
        if self.eat_keyword("not") {
            if !self.eat(&Token::Open) {
                return Err(FilterParseError::new("Expected '(' after 'not'", self.position()));
            }
            return Ok(Filter::Not(Box::new(self.group()?)));
        }
        if self.eat(&Token::Open) {
            return self.group();
        }
        self.attr_expr()
    }

    /// Body of a parenthesized filter, after the opening paren.
    fn group(&mut self) -> Result<Filter, FilterParseError> {
        if self.depth == self.max_depth {
            return Err(FilterParseError::new(
                format!("Filter exceeds maximum nesting depth ({})", self.max_depth),
                self.position(),
            ));
        }

        self.depth += 1;
        let inner = self.or_expr()?;
        self.depth -= 1;

        if !self.eat(&Token::Close) {
            return Err(FilterParseError::new("Expected ')'", self.position()));
        }
        Ok(inner)
    }

    fn attr_expr(&mut self) -> Result<Filter, FilterParseError> {
        let at = self.position();
        let attr = match self.tokens.next().map(|lexed| lexed.token) {
            Some(Token::Word(word)) => word.to_string(),
            _ => return Err(FilterParseError::new("Expected attribute name", at)),
        };

        if self.eat_keyword("pr") {
            return Ok(Filter::Present { attr });
        }

        let at = self.position();
        let op = match self.tokens.next().map(|lexed| lexed.token) {
            Some(Token::Word(word)) => CompareOp::from_word(word).ok_or_else(|| {
                FilterParseError::new(format!("Unknown operator: '{word}'"), at)
            })?,
            _ => return Err(FilterParseError::new("Expected operator after attribute", at)),
        };

        let at = self.position();
        let value = match self.tokens.next().map(|lexed| lexed.token) {
            Some(Token::Str(s)) => FilterValue::String(s),
            Some(Token::Num(n)) => FilterValue::Number(n),
            Some(Token::Word(w)) if w.eq_ignore_ascii_case("true") => FilterValue::Bool(true),
            Some(Token::Word(w)) if w.eq_ignore_ascii_case("false") => FilterValue::Bool(false),
            Some(Token::Word(w)) if w.eq_ignore_ascii_case("null") => FilterValue::Null,
            _ => {
                return Err(FilterParseError::new(
                    "Expected value (string, boolean, number, or null)",
                    at,
                ));
            }
        };

        Ok(Filter::Compare { attr, op, value })
    }
}
