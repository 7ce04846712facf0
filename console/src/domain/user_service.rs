//! User-facing fleet operations.
//!
//! Every method reduces the raw wire outcome to either a typed value or a
//! [`DomainError`]; raw server text never leaves this module.

use std::sync::Arc;

use serde::Serialize;

use super::car_status::CarStatusSnapshot;
use super::error::DomainError;
use super::geometry::{PassableArea, Position, Route, SubRoute};
use super::identifiers::UserSession;
use super::ports::{FleetApi, RouteNameRecord};
use super::reason_table::{Operation, ReasonTranslator};
use super::route_composer::compose_route;

/// A saved route name as offered to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NamedRoute {
    /// Name the route was saved under.
    pub name: String,
    /// True when the route can currently be used.
    pub available: bool,
}

impl From<RouteNameRecord> for NamedRoute {
    fn from(record: RouteNameRecord) -> Self {
        Self {
            name: record.route_name,
            available: record.available,
        }
    }
}

/// A route previously stored with [`UserConsoleService::save_route`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedRoute {
    /// Legs of the route.
    pub route: Route,
    /// Stops the route visits.
    pub stops: Vec<Position>,
    /// True when the route loops back to its first stop.
    pub cyclic: bool,
}

/// User console service implementing the user-side operations.
#[derive(Clone)]
pub struct UserConsoleService<A> {
    api: Arc<A>,
    translator: ReasonTranslator,
}

impl<A> UserConsoleService<A> {
    /// Create a new service over the given API port.
    pub fn new(api: Arc<A>, translator: ReasonTranslator) -> Self {
        Self { api, translator }
    }
}

impl<A> UserConsoleService<A>
where
    A: FleetApi,
{
    /// Obtain a fresh user session from the server.
    ///
    /// # Errors
    ///
    /// Rate limiting and capacity refusals are reported with their own codes.
    pub async fn create_user(&self) -> Result<UserSession, DomainError> {
        let op = Operation::CreateUser;
        let body = self.translator.interpret(op, self.api.create_user().await)?;
        let id = self.translator.require(op, "userId", body.user_id)?;
        Ok(UserSession::resume(id))
    }

    /// End the session. The handle is consumed even when the call fails.
    ///
    /// # Errors
    ///
    /// Returns the classified failure of the termination call.
    pub async fn terminate(&self, session: UserSession) -> Result<(), DomainError> {
        let outcome = self.api.terminate(session.id()).await;
        self.translator.interpret(Operation::Terminate, outcome)?;
        Ok(())
    }

    /// Cancel the route bound to the session.
    ///
    /// # Errors
    ///
    /// Returns the classified failure of the call.
    pub async fn end_route(&self, session: &UserSession) -> Result<(), DomainError> {
        let outcome = self.api.end_route(session.id()).await;
        self.translator.interpret(Operation::EndRoute, outcome)?;
        Ok(())
    }

    /// Let the vehicle waiting at a stop continue.
    ///
    /// # Errors
    ///
    /// Fails with a conflicting-operation error when the vehicle is not at a
    /// stop.
    pub async fn proceed_route(&self, session: &UserSession) -> Result<(), DomainError> {
        let outcome = self.api.proceed_route(session.id()).await;
        self.translator.interpret(Operation::ProceedRoute, outcome)?;
        Ok(())
    }

    /// Check that a new route may be started.
    ///
    /// # Errors
    ///
    /// Fails with a conflicting-operation error while the vehicle or the
    /// system is busy or faulty.
    pub async fn is_acceptable(&self, session: &UserSession) -> Result<(), DomainError> {
        let outcome = self.api.is_acceptable(session.id()).await;
        self.translator.interpret(Operation::IsAcceptable, outcome)?;
        Ok(())
    }

    /// List saved route names.
    ///
    /// # Errors
    ///
    /// Returns the classified failure of the call.
    pub async fn route_names(&self, session: &UserSession) -> Result<Vec<NamedRoute>, DomainError> {
        let op = Operation::RouteNames;
        let body = self
            .translator
            .interpret(op, self.api.route_names(session.id()).await)?;
        let names = self
            .translator
            .require(op, "passableNames", body.passable_names)?;
        Ok(names.into_iter().map(NamedRoute::from).collect())
    }

    /// Fetch a saved route by name.
    ///
    /// # Errors
    ///
    /// Fails with a not-found error when no route carries `name`.
    pub async fn fetch_route(
        &self,
        session: &UserSession,
        name: &str,
    ) -> Result<SavedRoute, DomainError> {
        let op = Operation::FetchRoute;
        let body = self
            .translator
            .interpret(op, self.api.fetch_route(session.id(), name).await)?;
        Ok(SavedRoute {
            route: self.translator.require(op, "route", body.route)?,
            stops: self.translator.require(op, "dest", body.dest)?,
            cyclic: self.translator.require(op, "junkai", body.junkai)?,
        })
    }

    /// Fetch the passable areas the user may route through.
    ///
    /// # Errors
    ///
    /// Returns the classified failure of the call.
    pub async fn fetch_passable(
        &self,
        session: &UserSession,
    ) -> Result<Vec<PassableArea>, DomainError> {
        let op = Operation::FetchPassable;
        let body = self
            .translator
            .interpret(op, self.api.fetch_passable(session.id()).await)?;
        self.translator.require(op, "passableInfo", body.passable_info)
    }

    /// Plan every leg concurrently and assemble them in input order.
    ///
    /// # Errors
    ///
    /// Returns the error of the first failing leg in input order.
    pub async fn compose_route(
        &self,
        session: &UserSession,
        legs: &[Vec<Position>],
    ) -> Result<Route, DomainError> {
        compose_route(self.api.as_ref(), &self.translator, session.id(), legs).await
    }

    /// Ask the server to execute `route`.
    ///
    /// # Errors
    ///
    /// Fails when the route is unreachable or another order is running.
    pub async fn execute_route(
        &self,
        session: &UserSession,
        route: &[SubRoute],
        cyclic: bool,
    ) -> Result<(), DomainError> {
        let outcome = self.api.execute_route(session.id(), route, cyclic).await;
        self.translator.interpret(Operation::ExecuteRoute, outcome)?;
        Ok(())
    }

    /// Store `route` under `name`. The echoed name is discarded.
    ///
    /// # Errors
    ///
    /// Fails with an unreachable-destination error when a leg cannot be
    /// travelled.
    pub async fn save_route(
        &self,
        session: &UserSession,
        name: &str,
        route: &[SubRoute],
        cyclic: bool,
    ) -> Result<(), DomainError> {
        let outcome = self
            .api
            .save_route(session.id(), name, route, cyclic)
            .await;
        self.translator.interpret(Operation::SaveRoute, outcome)?;
        Ok(())
    }

    /// Report route progress and vehicle state.
    ///
    /// # Errors
    ///
    /// Returns the classified failure of the monitoring call.
    pub async fn car_status(&self, session: &UserSession) -> Result<CarStatusSnapshot, DomainError> {
        let outcome = self.api.monitor_car(session.id()).await;
        let body = self.translator.interpret(Operation::MonitorCar, outcome)?;
        Ok(CarStatusSnapshot::from_monitor(body))
    }
}

#[cfg(test)]
#[path = "user_service_tests.rs"]
mod tests;
