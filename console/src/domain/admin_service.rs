//! Administrator fleet operations.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::warn;

use super::area_sync::{self, AreaSyncError, AreaSyncReport};
use super::error::DomainError;
use super::geometry::{PassableArea, Position};
use super::identifiers::{AdminSession, CarId};
use super::ports::{CarInfoRecord, FleetApi};
use super::reason_table::{Operation, ReasonTranslator};

/// One vehicle as reported to administrators.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CarInfo {
    /// Vehicle identifier.
    pub car_id: CarId,
    /// Server-defined status code.
    pub status: i64,
    /// Last reported position.
    pub location: Position,
    /// Remaining battery percentage.
    pub battery: f64,
    /// Time of last contact; `None` when the server value could not be read.
    pub last_contact: Option<DateTime<Utc>>,
}

impl From<CarInfoRecord> for CarInfo {
    fn from(record: CarInfoRecord) -> Self {
        let last_contact = parse_last_contact(&record.last_at);
        if last_contact.is_none() {
            warn!(car = %record.car_id, last_at = %record.last_at, "unreadable last contact time");
        }
        Self {
            car_id: record.car_id,
            status: record.status,
            location: record.now_point,
            battery: record.battery,
            last_contact,
        }
    }
}

/// Parse the HTTP-date form (`Wed, 21 Oct 2015 07:28:00 GMT`) the server emits.
fn parse_last_contact(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc2822(raw.trim())
        .ok()
        .map(|stamp| stamp.with_timezone(&Utc))
}

/// Administrator console service implementing the admin-side operations.
#[derive(Clone)]
pub struct AdminConsoleService<A> {
    api: Arc<A>,
    translator: ReasonTranslator,
}

impl<A> AdminConsoleService<A> {
    /// Create a new service over the given API port.
    pub fn new(api: Arc<A>, translator: ReasonTranslator) -> Self {
        Self { api, translator }
    }
}

impl<A> AdminConsoleService<A>
where
    A: FleetApi,
{
    /// Authenticate and obtain an administrator session.
    ///
    /// # Errors
    ///
    /// Fails with an unauthorized-identity error for a wrong name or password.
    pub async fn login_admin(&self, name: &str, password: &str) -> Result<AdminSession, DomainError> {
        let op = Operation::LoginAdmin;
        let body = self
            .translator
            .interpret(op, self.api.login_admin(name, password).await)?;
        let id = self.translator.require(op, "adminId", body.admin_id)?;
        Ok(AdminSession::resume(id))
    }

    /// End the session. The handle is consumed even when the call fails.
    ///
    /// # Errors
    ///
    /// Returns the classified failure of the termination call.
    pub async fn terminate_admin(&self, session: AdminSession) -> Result<(), DomainError> {
        let outcome = self.api.terminate_admin(session.id()).await;
        self.translator.interpret(Operation::TerminateAdmin, outcome)?;
        Ok(())
    }

    /// Replace the administrator password.
    ///
    /// # Errors
    ///
    /// Fails with an unauthorized-identity error when `current` is wrong.
    pub async fn change_password(
        &self,
        session: &AdminSession,
        current: &str,
        new: &str,
    ) -> Result<(), DomainError> {
        let outcome = self.api.change_password(session.id(), current, new).await;
        self.translator.interpret(Operation::ChangePassword, outcome)?;
        Ok(())
    }

    /// Fetch every passable area stored on the server.
    ///
    /// # Errors
    ///
    /// Returns the classified failure of the call.
    pub async fn passable_areas(
        &self,
        session: &AdminSession,
    ) -> Result<Vec<PassableArea>, DomainError> {
        area_sync::fetch_areas(self.api.as_ref(), &self.translator, session.id()).await
    }

    /// Make the server's passable areas match `desired`.
    ///
    /// # Errors
    ///
    /// See [`area_sync::synchronize_areas`]. After
    /// [`AreaSyncError::StateUnknown`] the areas must be re-fetched before
    /// retrying.
    pub async fn synchronize_areas(
        &self,
        session: &AdminSession,
        desired: &[PassableArea],
    ) -> Result<AreaSyncReport, AreaSyncError> {
        area_sync::synchronize_areas(self.api.as_ref(), &self.translator, session.id(), desired)
            .await
    }

    /// Reset a vehicle that entered an abnormal state.
    ///
    /// # Errors
    ///
    /// Fails with a not-found error for unknown vehicles.
    pub async fn manage_car(&self, session: &AdminSession, car: &CarId) -> Result<(), DomainError> {
        let outcome = self.api.manage_car(session.id(), car).await;
        self.translator.interpret(Operation::ManageCar, outcome)?;
        Ok(())
    }

    /// List every vehicle with its latest telemetry.
    ///
    /// # Errors
    ///
    /// Returns the classified failure of the call.
    pub async fn car_info(&self, session: &AdminSession) -> Result<Vec<CarInfo>, DomainError> {
        let op = Operation::CarInfo;
        let body = self
            .translator
            .interpret(op, self.api.car_info(session.id()).await)?;
        let cars = self
            .translator
            .require(op, "carInformations", body.car_informations)?;
        Ok(cars.into_iter().map(CarInfo::from).collect())
    }
}

#[cfg(test)]
#[path = "admin_service_tests.rs"]
mod tests;
