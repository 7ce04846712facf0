//! Snapshot of a user's route progress and assigned vehicle.
//!
//! The monitoring reply is a flat record of optional fields. It is folded
//! into two independent sub-states: whether a route is running and whether a
//! vehicle is assigned. All four combinations are representable; a running
//! route without a vehicle is transient but tolerated.

use serde::Serialize;

use super::geometry::{Position, Route};
use super::ports::MonitorCarBody;

/// Progress of the route being executed.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteProgress {
    /// Route being executed.
    pub route: Route,
    /// Stops on the route.
    pub stops: Vec<Position>,
    /// True when the route loops back to its first stop.
    pub cyclic: bool,
    /// True while the vehicle waits at a stop.
    pub at_stop: bool,
    /// True once the vehicle is at the final destination.
    pub at_destination: bool,
    /// True once the vehicle has reached the start of the route.
    pub reached_start: bool,
}

/// Route sub-state.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum RouteState {
    /// No route is bound to the user.
    Idle,
    /// A route is being executed.
    InProgress(RouteProgress),
}

/// Telemetry of the vehicle assigned to the user.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleTelemetry {
    /// Current position, when reported.
    pub location: Option<Position>,
    /// Remaining battery percentage, when reported.
    pub battery: Option<f64>,
    /// True when the vehicle reports a healthy state.
    pub healthy: bool,
}

/// Vehicle sub-state.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum VehicleState {
    /// No vehicle is assigned.
    Unassigned,
    /// A vehicle is assigned.
    Assigned(VehicleTelemetry),
}

/// Combined route and vehicle snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CarStatusSnapshot {
    /// Route sub-state.
    pub route: RouteState,
    /// Vehicle sub-state.
    pub vehicle: VehicleState,
}

impl CarStatusSnapshot {
    /// Fold a monitoring reply into a snapshot.
    ///
    /// The route is in progress iff the reply carries a non-empty route; the
    /// vehicle is assigned iff the reservation flag is set. Route-only and
    /// vehicle-only fields are read only for their own sub-state, and no
    /// consistency is enforced between the two.
    pub fn from_monitor(body: MonitorCarBody) -> Self {
        let route = match body.route {
            Some(route) if !route.is_empty() => RouteState::InProgress(RouteProgress {
                route,
                stops: body.dest.unwrap_or_default(),
                cyclic: body.junkai.unwrap_or(false),
                at_stop: body.arrival.unwrap_or(false),
                at_destination: body.finish.unwrap_or(false),
                reached_start: body.arrange.unwrap_or(false),
            }),
            _ => RouteState::Idle,
        };

        let vehicle = if body.reserve.unwrap_or(false) {
            VehicleState::Assigned(VehicleTelemetry {
                location: body.now_point,
                battery: body.battery,
                healthy: body.status.unwrap_or(false),
            })
        } else {
            VehicleState::Unassigned
        };

        Self { route, vehicle }
    }

    /// Progress of the running route, if any.
    pub const fn progress(&self) -> Option<&RouteProgress> {
        match &self.route {
            RouteState::InProgress(progress) => Some(progress),
            RouteState::Idle => None,
        }
    }

    /// Telemetry of the assigned vehicle, if any.
    pub const fn telemetry(&self) -> Option<&VehicleTelemetry> {
        match &self.vehicle {
            VehicleState::Assigned(telemetry) => Some(telemetry),
            VehicleState::Unassigned => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn running_route() -> Route {
        vec![vec![Position::new(0.0, 0.0), Position::new(0.0, 1.0)]]
    }

    #[rstest]
    fn idle_and_unassigned_when_reply_is_empty() {
        let snapshot = CarStatusSnapshot::from_monitor(MonitorCarBody::default());
        assert_eq!(snapshot.route, RouteState::Idle);
        assert_eq!(snapshot.vehicle, VehicleState::Unassigned);
    }

    #[rstest]
    fn vehicle_without_route_keeps_only_vehicle_fields() {
        let snapshot = CarStatusSnapshot::from_monitor(MonitorCarBody {
            reserve: Some(true),
            battery: Some(42.0),
            status: Some(true),
            now_point: Some(Position::new(35.0, 139.0)),
            junkai: Some(true),
            arrival: Some(true),
            ..MonitorCarBody::default()
        });

        assert!(snapshot.progress().is_none());
        let telemetry = snapshot.telemetry().expect("vehicle assigned");
        assert_eq!(telemetry.battery, Some(42.0));
        assert_eq!(telemetry.location, Some(Position::new(35.0, 139.0)));
        assert!(telemetry.healthy);
    }

    #[rstest]
    fn route_without_vehicle_is_tolerated() {
        let snapshot = CarStatusSnapshot::from_monitor(MonitorCarBody {
            route: Some(running_route()),
            dest: Some(vec![Position::new(0.0, 1.0)]),
            junkai: Some(true),
            arrange: Some(true),
            battery: Some(80.0),
            ..MonitorCarBody::default()
        });

        let progress = snapshot.progress().expect("route running");
        assert_eq!(progress.route, running_route());
        assert!(progress.cyclic);
        assert!(progress.reached_start);
        assert!(!progress.at_stop);
        assert_eq!(snapshot.vehicle, VehicleState::Unassigned);
    }

    #[rstest]
    fn route_and_vehicle_together() {
        let snapshot = CarStatusSnapshot::from_monitor(MonitorCarBody {
            reserve: Some(true),
            route: Some(running_route()),
            finish: Some(true),
            ..MonitorCarBody::default()
        });

        assert!(snapshot.progress().expect("route").at_destination);
        let telemetry = snapshot.telemetry().expect("vehicle");
        assert!(telemetry.location.is_none());
        assert!(!telemetry.healthy);
    }

    #[rstest]
    fn empty_route_counts_as_idle() {
        let snapshot = CarStatusSnapshot::from_monitor(MonitorCarBody {
            route: Some(Vec::new()),
            reserve: Some(false),
            ..MonitorCarBody::default()
        });
        assert_eq!(snapshot.route, RouteState::Idle);
        assert_eq!(snapshot.vehicle, VehicleState::Unassigned);
    }
}
