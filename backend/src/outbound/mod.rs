//! Outbound adapters implementing the row store port.
//!
//! - **memory**: process-local tables for development and tests
//! - **persistence**: PostgreSQL via Diesel
//!
//! Adapters only translate between internal rows and their storage
//! representation. They contain no table conventions.

pub mod memory;
pub mod persistence;
