//! Fleet API outbound adapter.
//!
//! This module provides the JSON-over-HTTP implementation of the `FleetApi`
//! port.

mod dto;
mod http_client;

pub use http_client::{FleetHttpClient, FleetHttpIdentity};
