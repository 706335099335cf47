//! HTTP inbound adapter exposing the table operations as REST endpoints.

pub mod error;
pub mod health;
pub mod schemas;
pub mod state;
pub mod tables;

pub use error::{ApiResult, json_error_handler};
