//! Domain adaptation layer and operator tooling for a guided-vehicle fleet API.

pub mod config;
pub mod domain;
pub mod outbound;
pub mod telemetry;
