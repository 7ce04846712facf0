//! Domain ports defining the edges of the hexagon.
//!
//! The only driven port is the remote fleet API. Its errors are strongly
//! typed so the domain can tell transport failures apart from structured
//! `succeeded: false` replies.

mod fleet_api;
mod macros;

pub(crate) use macros::define_port_error;

#[cfg(test)]
pub use fleet_api::MockFleetApi;
pub use fleet_api::{
    CarInfoBody, CarInfoRecord, CreateUserBody, FleetApi, FleetApiError, FleetApiResult,
    LoginAdminBody, MonitorCarBody, NoPayload, PassableBody, PlanLegBody, Reply, RouteNameRecord,
    RouteNamesBody, SaveRouteBody, SavedRouteBody,
};
