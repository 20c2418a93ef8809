//! Warehouse loading: SQL template substitution and blocking query
//! execution against the BigQuery REST endpoint.

mod client;
mod error;
mod templates;

pub use client::BigQueryClient;
pub use error::BigQueryError;
pub use templates::{run_warehouse, substitute_placeholders, TemplateVars};
