#![forbid(unsafe_code)]

pub mod cli;
pub mod config;
pub mod models;
pub mod query;
pub mod settings;
pub mod store;
pub mod utils;

pub use cli::app::{Cli, Command};
pub use query::error::QueryError;
