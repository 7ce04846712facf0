//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **fleet_http**: reqwest-backed client for the fleet management API
//!
//! Adapters are thin translators between domain types and wire
//! representations. They contain no business logic.

pub mod fleet_http;
