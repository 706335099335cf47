//! Inbound adapters that translate external requests into data-access calls
//! while keeping framework details at the edge.

pub mod http;
