//! Reconciliation of locally edited passable areas with the server.
//!
//! The server's current set is fetched first, then the identifier-keyed
//! difference is applied with one deletion call and one addition call,
//! dispatched together. The two calls are not atomic: if either fails the
//! server may hold a mix of old and new areas, which is reported as
//! [`AreaSyncError::StateUnknown`]. No compensation is attempted.

use std::collections::HashSet;

use serde::Serialize;
use tracing::{debug, warn};

use super::error::DomainError;
use super::geometry::{PassableArea, PassableId, PassablePoint};
use super::identifiers::AdminId;
use super::ports::{FleetApi, FleetApiResult, NoPayload, Reply};
use super::reason_table::{Operation, ReasonTranslator};

/// Identifier-keyed difference between two sets of areas.
///
/// Geometry is never compared: an area whose identifier appears on both
/// sides is left alone even if it was moved or resized locally.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AreaDiff {
    /// Areas on the server whose identifier is absent from the desired set.
    pub deletion: Vec<PassableArea>,
    /// Desired areas whose identifier is absent from the server set.
    pub addition: Vec<PassableArea>,
}

impl AreaDiff {
    /// Compute `current \ desired` and `desired \ current` by identifier.
    pub fn compute(current: &[PassableArea], desired: &[PassableArea]) -> Self {
        let current_ids: HashSet<PassableId> = current.iter().map(|area| area.id).collect();
        let desired_ids: HashSet<PassableId> = desired.iter().map(|area| area.id).collect();

        Self {
            deletion: current
                .iter()
                .filter(|area| !desired_ids.contains(&area.id))
                .copied()
                .collect(),
            addition: desired
                .iter()
                .filter(|area| !current_ids.contains(&area.id))
                .copied()
                .collect(),
        }
    }

    /// True when nothing needs to change.
    pub fn is_empty(&self) -> bool {
        self.deletion.is_empty() && self.addition.is_empty()
    }

    /// Identifiers to send with the deletion call.
    pub fn deletion_ids(&self) -> Vec<PassableId> {
        self.deletion.iter().map(|area| area.id).collect()
    }

    /// Circles to send with the addition call.
    pub fn addition_points(&self) -> Vec<PassablePoint> {
        self.addition.iter().map(|area| area.point).collect()
    }
}

/// What is known about one mutation call after it returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationOutcome {
    /// The server reported success.
    Applied,
    /// The server reported failure.
    Rejected,
    /// The call failed in transit; the server may or may not have applied it.
    Unknown,
}

impl MutationOutcome {
    fn of<T>(outcome: &FleetApiResult<T>) -> Self {
        match outcome {
            Ok(reply) if reply.succeeded => Self::Applied,
            Ok(_) => Self::Rejected,
            Err(_) => Self::Unknown,
        }
    }
}

/// Result of a successful synchronisation.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct AreaSyncReport {
    /// Identifiers removed from the server.
    pub deleted: Vec<PassableId>,
    /// Circles added to the server; their identifiers are assigned remotely.
    pub added: Vec<PassablePoint>,
}

/// Failure of a synchronisation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AreaSyncError {
    /// The current areas could not be fetched; nothing was changed.
    #[error("{0}")]
    Fetch(DomainError),
    /// A mutation failed; the server state must be re-fetched before retrying.
    #[error("{error}")]
    StateUnknown {
        /// Classified failure of the first failing call, deletion first.
        error: DomainError,
        /// Outcome of the deletion call.
        deletion: MutationOutcome,
        /// Outcome of the addition call.
        addition: MutationOutcome,
    },
}

impl AreaSyncError {
    /// The classified failure behind this error.
    pub const fn domain_error(&self) -> &DomainError {
        match self {
            Self::Fetch(error) | Self::StateUnknown { error, .. } => error,
        }
    }

    /// True when the server may hold a partially applied update.
    pub const fn is_state_unknown(&self) -> bool {
        matches!(self, Self::StateUnknown { .. })
    }
}

impl From<AreaSyncError> for DomainError {
    fn from(value: AreaSyncError) -> Self {
        match value {
            AreaSyncError::Fetch(error) | AreaSyncError::StateUnknown { error, .. } => error,
        }
    }
}

/// Fetch the server's areas for `admin`.
///
/// # Errors
///
/// Returns the classified [`DomainError`] when the call fails.
pub async fn fetch_areas<A>(
    api: &A,
    translator: &ReasonTranslator,
    admin: &AdminId,
) -> Result<Vec<PassableArea>, DomainError>
where
    A: FleetApi + ?Sized,
{
    let body = translator.interpret(
        Operation::FetchPassableAdmin,
        api.fetch_passable_admin(admin).await,
    )?;
    translator.require(
        Operation::FetchPassableAdmin,
        "passableInfo",
        body.passable_info,
    )
}

/// Make the server's passable areas match `desired`.
///
/// Areas in `desired` that are not yet committed must carry placeholder
/// identifiers (see [`PassableId::placeholder`]).
///
/// # Errors
///
/// Returns [`AreaSyncError::Fetch`] when the prerequisite fetch fails and
/// [`AreaSyncError::StateUnknown`] when either mutation fails.
pub async fn synchronize_areas<A>(
    api: &A,
    translator: &ReasonTranslator,
    admin: &AdminId,
    desired: &[PassableArea],
) -> Result<AreaSyncReport, AreaSyncError>
where
    A: FleetApi + ?Sized,
{
    let current = fetch_areas(api, translator, admin)
        .await
        .map_err(AreaSyncError::Fetch)?;
    let diff = AreaDiff::compute(&current, desired);
    let deleted = diff.deletion_ids();
    let added = diff.addition_points();

    let (deletion, addition) = futures_util::join!(
        api.delete_passable(admin, &deleted),
        api.add_passable(admin, &added),
    );

    let outcomes = (MutationOutcome::of(&deletion), MutationOutcome::of(&addition));
    if outcomes == (MutationOutcome::Applied, MutationOutcome::Applied) {
        debug!(
            deleted = deleted.len(),
            added = added.len(),
            "passable areas synchronised"
        );
        return Ok(AreaSyncReport { deleted, added });
    }

    let error = classify_mutation_failure(translator, &deletion, &addition);
    warn!(
        deletion = ?outcomes.0,
        addition = ?outcomes.1,
        code = ?error.code(),
        "passable area update left server state unknown"
    );
    Err(AreaSyncError::StateUnknown {
        error,
        deletion: outcomes.0,
        addition: outcomes.1,
    })
}

/// Pick the error to report for a failed pair of mutations.
///
/// A call lost in transit always wins, deletion first. Otherwise the first
/// non-empty refusal reason is classified, deletion first.
fn classify_mutation_failure(
    translator: &ReasonTranslator,
    deletion: &FleetApiResult<NoPayload>,
    addition: &FleetApiResult<NoPayload>,
) -> DomainError {
    let (deletion, addition) = match (deletion, addition) {
        (Err(failure), _) => {
            return translator.transport_failure(Operation::DeletePassable, failure);
        }
        (_, Err(failure)) => {
            return translator.transport_failure(Operation::AddPassable, failure);
        }
        (Ok(deletion), Ok(addition)) => (deletion, addition),
    };

    match (refusal(deletion), refusal(addition)) {
        (Some(reason), _) => translator.classify(Operation::DeletePassable, Some(reason)),
        (None, Some(reason)) => translator.classify(Operation::AddPassable, Some(reason)),
        (None, None) if !deletion.succeeded => {
            translator.classify(Operation::DeletePassable, None)
        }
        (None, None) => translator.classify(Operation::AddPassable, None),
    }
}

fn refusal(reply: &Reply<NoPayload>) -> Option<&str> {
    if reply.succeeded {
        return None;
    }
    reply.reason.as_deref().filter(|reason| !reason.is_empty())
}
