use clap::Parser;
use scim_fields::{
    config::ScimFieldsConfig,
    observability::init_tracing,
    scim::{
        CoreFieldRegistry, GroupRegistry, ResolveContext, ScimErrorResponse, ScimResourceType,
        ScimResult, TracingSink, UserRegistry, build_filter,
    },
};
use serde::Serialize;

/// CLI arguments for scim-fields
#[derive(Parser, Debug)]
#[command(version, about = "Resolve SCIM filter attributes", long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Resource type to resolve against (overrides `schema.resource`)
    #[arg(short, long, global = true, value_enum)]
    resource: Option<Resource>,
}

#[derive(clap::Subcommand, Debug)]
enum Command {
    /// Resolve attribute tokens and print one descriptor per line (JSON)
    Resolve {
        /// Attribute tokens, e.g. `userName` or `urn:example:2.0:Custom:badge`
        #[arg(required = true)]
        tokens: Vec<String>,
    },
    /// Parse a filter and print the resolved expression (JSON)
    Parse {
        /// Filter expression, e.g. `userName eq "bjensen"`
        filter: String,
    },
    /// Export the JSON schema for the configuration file
    Schema,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum Resource {
    User,
    Group,
}

impl From<Resource> for ScimResourceType {
    fn from(resource: Resource) -> Self {
        match resource {
            Resource::User => ScimResourceType::User,
            Resource::Group => ScimResourceType::Group,
        }
    }
}

fn main() {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => match ScimFieldsConfig::from_file(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Error: {e}");
                std::process::exit(2);
            }
        },
        None => ScimFieldsConfig::default(),
    };
    if let Some(resource) = args.resource {
        config.schema.resource = resource.into();
    }

    if let Err(e) = init_tracing(&config.observability.logging) {
        eprintln!("Error: {e}");
        std::process::exit(2);
    }

    let result = match args.command {
        Command::Resolve { tokens } => match config.schema.resource {
            ScimResourceType::User => resolve_tokens(&config, &UserRegistry, &tokens),
            ScimResourceType::Group => resolve_tokens(&config, &GroupRegistry, &tokens),
        },
        Command::Parse { filter } => match config.schema.resource {
            ScimResourceType::User => parse_expression(&config, &UserRegistry, &filter),
            ScimResourceType::Group => parse_expression(&config, &GroupRegistry, &filter),
        },
        Command::Schema => {
            run_schema_export();
            Ok(())
        }
    };

    if let Err(err) = result {
        tracing::debug!(detail = %err.detail, "Filter rejected");
        print_json(&err);
        std::process::exit(1);
    }
}

fn resolve_tokens<R>(config: &ScimFieldsConfig, registry: &R, tokens: &[String]) -> ScimResult<()>
where
    R: CoreFieldRegistry,
    R::Field: Serialize,
{
    let ctx = ResolveContext::new(config.schema.core_schema_urn(), registry, &TracingSink);
    let fields = tokens
        .iter()
        .map(|token| ctx.resolve(token))
        .collect::<Result<Vec<_>, _>>()
        .map_err(ScimErrorResponse::from)?;

    for field in &fields {
        match serde_json::to_string(field) {
            Ok(line) => println!("{line}"),
            Err(e) => eprintln!("Error: failed to serialize output: {e}"),
        }
    }
    Ok(())
}

fn parse_expression<R>(config: &ScimFieldsConfig, registry: &R, filter: &str) -> ScimResult<()>
where
    R: CoreFieldRegistry,
    R::Field: Serialize,
{
    let ctx = ResolveContext::new(config.schema.core_schema_urn(), registry, &TracingSink);
    let expr = build_filter(filter, &config.filter, &ctx).map_err(ScimErrorResponse::from)?;
    print_json(&expr);
    Ok(())
}

fn print_json<T: Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{json}"),
        Err(e) => eprintln!("Error: failed to serialize output: {e}"),
    }
}

#[cfg(feature = "json-schema")]
fn run_schema_export() {
    print_json(&ScimFieldsConfig::json_schema());
}

#[cfg(not(feature = "json-schema"))]
fn run_schema_export() {
    eprintln!("Error: JSON schema export requires the 'json-schema' feature");
    std::process::exit(1);
}
