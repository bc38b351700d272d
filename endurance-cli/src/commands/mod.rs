//! CLI command implementations.

pub mod check;
pub mod print_config;
pub mod run;
