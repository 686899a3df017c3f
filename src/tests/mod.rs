//! Consolidated test modules.
//!
//! End-to-end tests that run configuration, parsing and resolution together.

mod filter_e2e;
