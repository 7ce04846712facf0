//! Driven port for the fleet management API.
//!
//! One method per remote operation. Implementations only move bytes: they
//! serialise the request, decode the reply envelope and report transport
//! failures. Interpreting `succeeded`/`reason` is left to the domain.

use async_trait::async_trait;
use serde::Deserialize;

use super::define_port_error;
use crate::domain::{
    AdminId, CarId, PassableArea, PassableId, PassablePoint, Position, Route, SubRoute, UserId,
};

/// Raw reply envelope shared by every operation.
#[derive(Debug, Clone, PartialEq)]
pub struct Reply<T> {
    /// True when the server completed the operation.
    pub succeeded: bool,
    /// Free-text failure reason; only meaningful when `succeeded` is false.
    pub reason: Option<String>,
    /// Operation-specific fields, all optional on the wire.
    pub body: T,
}

impl<T> Reply<T> {
    /// Successful reply carrying `body`.
    pub fn ok(body: T) -> Self {
        Self {
            succeeded: true,
            reason: None,
            body,
        }
    }
}

impl<T: Default> Reply<T> {
    /// Failed reply carrying `reason` and an empty body.
    pub fn failed(reason: impl Into<String>) -> Self {
        Self {
            succeeded: false,
            reason: Some(reason.into()),
            body: T::default(),
        }
    }
}

/// Body of replies that carry nothing beyond the envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub struct NoPayload {}

/// Body of `createUser`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateUserBody {
    /// Newly issued user identifier.
    pub user_id: Option<UserId>,
}

/// One saved route name as listed by `routeName`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteNameRecord {
    /// Name the route was saved under.
    pub route_name: String,
    /// True when the route can currently be used.
    pub available: bool,
}

/// Body of `routeName`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RouteNamesBody {
    /// Saved route names.
    pub passable_names: Option<Vec<RouteNameRecord>>,
}

/// Body of `reqRoute`.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SavedRouteBody {
    /// The saved route.
    pub route: Option<Route>,
    /// Stops included in the route.
    pub dest: Option<Vec<Position>>,
    /// True for cyclic routes.
    pub junkai: Option<bool>,
}

/// Body of `reqPassable` and `reqPassAdmin`.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PassableBody {
    /// Passable areas currently stored on the server.
    pub passable_info: Option<Vec<PassableArea>>,
}

/// Body of `astar`.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PlanLegBody {
    /// The planned leg.
    pub route: Option<SubRoute>,
}

/// Body of `saveRoute`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SaveRouteBody {
    /// Echo of the saved route name.
    pub route_name: Option<String>,
}

/// Body of `monitorCar`: every field is independently optional.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MonitorCarBody {
    /// True when a vehicle is assigned to the user.
    pub reserve: Option<bool>,
    /// Route being executed.
    pub route: Option<Route>,
    /// Stops of the route being executed.
    pub dest: Option<Vec<Position>>,
    /// True when the executing route is cyclic.
    pub junkai: Option<bool>,
    /// True while the vehicle waits at a stop.
    pub arrival: Option<bool>,
    /// True once the vehicle is at its final destination.
    pub finish: Option<bool>,
    /// True once the vehicle has reached the start of the route.
    pub arrange: Option<bool>,
    /// True when the vehicle reports a healthy state.
    pub status: Option<bool>,
    /// Current vehicle position.
    pub now_point: Option<Position>,
    /// Remaining battery percentage.
    pub battery: Option<f64>,
}

/// Body of `loginAdmin`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LoginAdminBody {
    /// Newly issued administrator identifier.
    pub admin_id: Option<AdminId>,
}

/// One vehicle as listed by `reqCarInfo`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CarInfoRecord {
    /// Vehicle identifier.
    pub car_id: CarId,
    /// Server-defined status code.
    pub status: i64,
    /// Current position.
    pub now_point: Position,
    /// Remaining battery percentage.
    pub battery: f64,
    /// Time of last contact, in HTTP-date form.
    pub last_at: String,
}

/// Body of `reqCarInfo`.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CarInfoBody {
    /// Known vehicles.
    pub car_informations: Option<Vec<CarInfoRecord>>,
}

define_port_error! {
    /// Transport-level failures raised before a reply envelope was obtained.
    pub enum FleetApiError {
        /// The request could not be sent or the connection failed.
        Transport { message: String } =>
            "fleet api transport failed: {message}",
        /// The request did not complete in time.
        Timeout { message: String } =>
            "fleet api request timed out: {message}",
        /// The server answered with a non-success HTTP status.
        Status { status: u16, message: String } =>
            "fleet api answered status {status}: {message}",
        /// The reply body was not a valid envelope.
        Decode { message: String } =>
            "fleet api reply could not be decoded: {message}",
    }
}

/// Result of one wire call.
pub type FleetApiResult<T> = Result<Reply<T>, FleetApiError>;

/// Port for the remote fleet management API.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FleetApi: Send + Sync {
    /// Issue a new user identifier.
    async fn create_user(&self) -> FleetApiResult<CreateUserBody>;

    /// End a user session.
    async fn terminate(&self, user: &UserId) -> FleetApiResult<NoPayload>;

    /// Cancel the route bound to a user.
    async fn end_route(&self, user: &UserId) -> FleetApiResult<NoPayload>;

    /// Let a vehicle waiting at a stop continue to the next one.
    async fn proceed_route(&self, user: &UserId) -> FleetApiResult<NoPayload>;

    /// Check whether the user may start a new route.
    async fn is_acceptable(&self, user: &UserId) -> FleetApiResult<NoPayload>;

    /// List saved route names.
    async fn route_names(&self, user: &UserId) -> FleetApiResult<RouteNamesBody>;

    /// Fetch a saved route by name.
    async fn fetch_route(&self, user: &UserId, route_name: &str)
    -> FleetApiResult<SavedRouteBody>;

    /// Fetch the passable areas visible to a user.
    async fn fetch_passable(&self, user: &UserId) -> FleetApiResult<PassableBody>;

    /// Plan one leg through the given waypoints.
    async fn plan_leg(&self, user: &UserId, waypoints: &[Position])
    -> FleetApiResult<PlanLegBody>;

    /// Reserve execution of a route.
    async fn execute_route(
        &self,
        user: &UserId,
        route: &[SubRoute],
        cyclic: bool,
    ) -> FleetApiResult<NoPayload>;

    /// Save a route under a name.
    async fn save_route(
        &self,
        user: &UserId,
        route_name: &str,
        route: &[SubRoute],
        cyclic: bool,
    ) -> FleetApiResult<SaveRouteBody>;

    /// Report route progress and vehicle state for a user.
    async fn monitor_car(&self, user: &UserId) -> FleetApiResult<MonitorCarBody>;

    /// Authenticate an administrator.
    async fn login_admin(&self, name: &str, password: &str) -> FleetApiResult<LoginAdminBody>;

    /// End an administrator session.
    async fn terminate_admin(&self, admin: &AdminId) -> FleetApiResult<NoPayload>;

    /// Change the administrator password.
    async fn change_password(
        &self,
        admin: &AdminId,
        current_password: &str,
        new_password: &str,
    ) -> FleetApiResult<NoPayload>;

    /// Fetch every stored passable area.
    async fn fetch_passable_admin(&self, admin: &AdminId) -> FleetApiResult<PassableBody>;

    /// Delete passable areas by identifier.
    async fn delete_passable(
        &self,
        admin: &AdminId,
        ids: &[PassableId],
    ) -> FleetApiResult<NoPayload>;

    /// Add new passable areas.
    async fn add_passable(
        &self,
        admin: &AdminId,
        points: &[PassablePoint],
    ) -> FleetApiResult<NoPayload>;

    /// Reset a vehicle that entered an abnormal state.
    async fn manage_car(&self, admin: &AdminId, car: &CarId) -> FleetApiResult<NoPayload>;

    /// List every vehicle with its telemetry.
    async fn car_info(&self, admin: &AdminId) -> FleetApiResult<CarInfoBody>;
}
