//! Domain adaptation layer between callers and the fleet API.
//!
//! Purpose: turn loosely typed wire replies into typed values or classified
//! [`DomainError`]s. Nothing in this module performs I/O directly; every
//! remote call goes through the [`ports::FleetApi`] driven port.
//!
//! Public surface:
//! - `UserConsoleService` / `AdminConsoleService`: one method per remote
//!   operation, each returning [`DomainResult`].
//! - `ReasonTranslator`: classification of raw outcomes.
//! - `compose_route`, `synchronize_areas`, `CarStatusSnapshot`: the composite
//!   operations.

pub mod admin_service;
pub mod area_sync;
pub mod car_status;
pub mod error;
pub mod geometry;
pub mod identifiers;
pub mod messages;
pub mod ports;
pub mod reason_table;
pub mod route_composer;
pub mod user_service;

pub use self::admin_service::{AdminConsoleService, CarInfo};
pub use self::area_sync::{
    AreaDiff, AreaSyncError, AreaSyncReport, MutationOutcome, synchronize_areas,
};
pub use self::car_status::{
    CarStatusSnapshot, RouteProgress, RouteState, VehicleState, VehicleTelemetry,
};
pub use self::error::{DomainError, ErrorCode};
pub use self::geometry::{PassableArea, PassableId, PassablePoint, Position, Route, SubRoute};
pub use self::identifiers::{AdminId, AdminSession, CarId, UserId, UserSession};
pub use self::messages::{Locale, MessageKey, UnsupportedLocale};
pub use self::reason_table::{Operation, ReasonTableError, ReasonTranslator};
pub use self::route_composer::compose_route;
pub use self::user_service::{NamedRoute, SavedRoute, UserConsoleService};

/// Result of every domain operation.
///
/// # Examples
/// ```
/// use fleet_console::domain::{DomainError, DomainResult, Locale};
///
/// fn refused() -> DomainResult<()> {
///     Err(DomainError::communication_failure(Locale::En))
/// }
///
/// assert!(refused().is_err());
/// ```
pub type DomainResult<T> = Result<T, DomainError>;
