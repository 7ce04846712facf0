//! Classification of raw API failures into domain errors.
//!
//! The server explains failures with free-text `reason` strings whose
//! vocabulary differs per operation. This module turns that vocabulary into a
//! single table keyed by `(operation, normalised reason)`. Normalisation masks
//! every run of digits with `#`, so "Destination 3 ..." and "Destination 7 ..."
//! resolve to the same entry.
//!
//! The table is built once per process and validated against the known server
//! vocabulary before the first translator is handed out.

use std::collections::HashMap;
use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use thiserror::Error;
use tracing::{error, warn};

use super::error::{DomainError, ErrorCode};
use super::messages::{Locale, MessageKey};
use super::ports::{FleetApiError, FleetApiResult};

/// Remote operations, one per API endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Operation {
    /// Issue a user identifier.
    CreateUser,
    /// End a user session.
    Terminate,
    /// Cancel the running route.
    EndRoute,
    /// Let the vehicle leave its current stop.
    ProceedRoute,
    /// Check whether a new route may start.
    IsAcceptable,
    /// List saved route names.
    RouteNames,
    /// Fetch a saved route.
    FetchRoute,
    /// Fetch passable areas for a user.
    FetchPassable,
    /// Plan one leg.
    PlanLeg,
    /// Execute a route.
    ExecuteRoute,
    /// Save a route.
    SaveRoute,
    /// Report route and vehicle state.
    MonitorCar,
    /// Authenticate an administrator.
    LoginAdmin,
    /// End an administrator session.
    TerminateAdmin,
    /// Change the administrator password.
    ChangePassword,
    /// Fetch passable areas for an administrator.
    FetchPassableAdmin,
    /// Delete passable areas.
    DeletePassable,
    /// Add passable areas.
    AddPassable,
    /// Reset a vehicle.
    ManageCar,
    /// List vehicles.
    CarInfo,
}

/// Which generic reasons an operation shares with its siblings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Audience {
    Anonymous,
    Credentials,
    User,
    Admin,
}

/// How the normalised reason is compared with an operation's patterns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MatchMode {
    Exact,
    /// Only the leading sentence is significant; servers append detail.
    Prefix,
}

impl Operation {
    /// Every operation, in declaration order.
    pub const ALL: [Self; 20] = [
        Self::CreateUser,
        Self::Terminate,
        Self::EndRoute,
        Self::ProceedRoute,
        Self::IsAcceptable,
        Self::RouteNames,
        Self::FetchRoute,
        Self::FetchPassable,
        Self::PlanLeg,
        Self::ExecuteRoute,
        Self::SaveRoute,
        Self::MonitorCar,
        Self::LoginAdmin,
        Self::TerminateAdmin,
        Self::ChangePassword,
        Self::FetchPassableAdmin,
        Self::DeletePassable,
        Self::AddPassable,
        Self::ManageCar,
        Self::CarInfo,
    ];

    /// Endpoint name as exposed by the server.
    pub const fn endpoint(self) -> &'static str {
        match self {
            Self::CreateUser => "createUser",
            Self::Terminate => "terminate",
            Self::EndRoute => "endRoute",
            Self::ProceedRoute => "proceedRoute",
            Self::IsAcceptable => "isAcceptable",
            Self::RouteNames => "routeName",
            Self::FetchRoute => "reqRoute",
            Self::FetchPassable => "reqPassable",
            Self::PlanLeg => "astar",
            Self::ExecuteRoute => "execRoute",
            Self::SaveRoute => "saveRoute",
            Self::MonitorCar => "monitorCar",
            Self::LoginAdmin => "loginAdmin",
            Self::TerminateAdmin => "terminateAdmin",
            Self::ChangePassword => "changePasswd",
            Self::FetchPassableAdmin => "reqPassAdmin",
            Self::DeletePassable => "delPassable",
            Self::AddPassable => "addPassable",
            Self::ManageCar => "manageCar",
            Self::CarInfo => "reqCarInfo",
        }
    }

    const fn audience(self) -> Audience {
        match self {
            Self::CreateUser => Audience::Anonymous,
            Self::LoginAdmin | Self::ChangePassword => Audience::Credentials,
            Self::Terminate
            | Self::EndRoute
            | Self::ProceedRoute
            | Self::IsAcceptable
            | Self::RouteNames
            | Self::FetchRoute
            | Self::FetchPassable
            | Self::PlanLeg
            | Self::ExecuteRoute
            | Self::SaveRoute
            | Self::MonitorCar => Audience::User,
            Self::TerminateAdmin
            | Self::FetchPassableAdmin
            | Self::DeletePassable
            | Self::AddPassable
            | Self::ManageCar
            | Self::CarInfo => Audience::Admin,
        }
    }

    const fn match_mode(self) -> MatchMode {
        match self {
            Self::IsAcceptable | Self::SaveRoute => MatchMode::Prefix,
            _ => MatchMode::Exact,
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.endpoint())
    }
}

type RuleSpec = (&'static str, ErrorCode, MessageKey);

const INVALID_REQUEST: RuleSpec = (
    "Invalid request.",
    ErrorCode::InvalidRequest,
    MessageKey::InvalidRequest,
);
const MALFORMED_REQUEST: RuleSpec = (
    "Invalid request.",
    ErrorCode::InvalidRequest,
    MessageKey::MalformedRequest,
);
const ILLEGAL_USER: RuleSpec = (
    "Illegal user.",
    ErrorCode::UnauthorizedIdentity,
    MessageKey::IllegalUser,
);
const ILLEGAL_ADMIN: RuleSpec = (
    "Illegal admin.",
    ErrorCode::UnauthorizedIdentity,
    MessageKey::IllegalAdmin,
);

const fn shared_rules(operation: Operation) -> &'static [RuleSpec] {
    match operation {
        Operation::TerminateAdmin => return &[MALFORMED_REQUEST, ILLEGAL_ADMIN],
        Operation::ChangePassword => return &[MALFORMED_REQUEST],
        _ => {}
    }
    match operation.audience() {
        Audience::Anonymous => &[],
        Audience::Credentials => &[INVALID_REQUEST],
        Audience::User => &[INVALID_REQUEST, ILLEGAL_USER],
        Audience::Admin => &[INVALID_REQUEST, ILLEGAL_ADMIN],
    }
}

const fn specific_rules(operation: Operation) -> &'static [RuleSpec] {
    use ErrorCode as C;
    use MessageKey as M;

    match operation {
        Operation::CreateUser => &[
            (
                "Please allow some tims and access again.",
                C::RateLimited,
                M::RateLimited,
            ),
            ("User creation failed.", C::GenericFailure, M::ServerError),
            ("Users exceeded the limit.", C::CapacityExceeded, M::SystemFull),
        ],
        Operation::ProceedRoute => &[(
            "The car you are using is not at the stop.",
            C::ConflictingOperation,
            M::CarNotAtStop,
        )],
        Operation::IsAcceptable => &[
            (
                "A probrem has occurred with the car being used.",
                C::ConflictingOperation,
                M::CarProblem,
            ),
            (
                "There is a problem with the system status.",
                C::ConflictingOperation,
                M::SystemProblem,
            ),
            (
                "A new route cannot be created because the instruction is being executed.",
                C::ConflictingOperation,
                M::RouteInProgress,
            ),
            (
                "A new route cannot ben created because a car assignment is in progress.",
                C::ConflictingOperation,
                M::AssignmentInProgress,
            ),
        ],
        Operation::FetchRoute => &[(
            "There is no route with that name.",
            C::NotFound,
            M::RouteNotFound,
        )],
        Operation::PlanLeg => &[
            (
                "Destination # is outside the passable area.",
                C::UnreachableDestination,
                M::PointOutsidePassableArea,
            ),
            (
                "Destination # could not be reached.",
                C::UnreachableDestination,
                M::PointUnreachable,
            ),
            (
                "The end point could not be reached.",
                C::UnreachableDestination,
                M::EndPointUnreachable,
            ),
        ],
        Operation::ExecuteRoute => &[
            ("unreachable!", C::UnreachableDestination, M::RouteUnreachable),
            ("Reject new order!", C::ConflictingOperation, M::RouteInProgress),
        ],
        Operation::SaveRoute => &[("RouteNo.", C::UnreachableDestination, M::PointUnreachable)],
        Operation::LoginAdmin => &[
            ("Your name is wrong.", C::UnauthorizedIdentity, M::WrongAdminName),
            (
                "Your password is wrong.",
                C::UnauthorizedIdentity,
                M::WrongAdminPassword,
            ),
        ],
        Operation::ChangePassword => &[
            (
                "No such administrator exists.",
                C::UnauthorizedIdentity,
                M::IllegalAdmin,
            ),
            (
                "Your password is wrong.",
                C::UnauthorizedIdentity,
                M::WrongAdminPassword,
            ),
        ],
        Operation::ManageCar => &[("No such car exists.", C::NotFound, M::CarNotFound)],
        Operation::Terminate
        | Operation::EndRoute
        | Operation::RouteNames
        | Operation::FetchPassable
        | Operation::MonitorCar
        | Operation::TerminateAdmin
        | Operation::FetchPassableAdmin
        | Operation::DeletePassable
        | Operation::AddPassable
        | Operation::CarInfo => &[],
    }
}

/// Reasons the server is known to emit, as raw text.
///
/// Every entry must resolve through the table; [`ReasonTable::build`] refuses
/// to produce a table otherwise.
pub const KNOWN_SERVER_REASONS: &[(Operation, &str)] = &[
    (
        Operation::CreateUser,
        "Please allow some tims and access again.",
    ),
    (Operation::CreateUser, "User creation failed."),
    (Operation::CreateUser, "Users exceeded the limit."),
    (Operation::Terminate, "Illegal user."),
    (Operation::EndRoute, "Invalid request."),
    (
        Operation::ProceedRoute,
        "The car you are using is not at the stop.",
    ),
    (
        Operation::IsAcceptable,
        "A probrem has occurred with the car being used. Car 12 reported an error.",
    ),
    (
        Operation::IsAcceptable,
        "There is a problem with the system status.",
    ),
    (
        Operation::IsAcceptable,
        "A new route cannot be created because the instruction is being executed.",
    ),
    (
        Operation::IsAcceptable,
        "A new route cannot ben created because a car assignment is in progress.",
    ),
    (Operation::RouteNames, "Illegal user."),
    (Operation::FetchRoute, "There is no route with that name."),
    (Operation::FetchPassable, "Illegal user."),
    (
        Operation::PlanLeg,
        "Destination 3 is outside the passable area.",
    ),
    (Operation::PlanLeg, "Destination 12 could not be reached."),
    (Operation::PlanLeg, "The end point could not be reached."),
    (Operation::ExecuteRoute, "unreachable!"),
    (Operation::ExecuteRoute, "Reject new order!"),
    (Operation::SaveRoute, "RouteNo.2 could not be reached."),
    (Operation::MonitorCar, "Illegal user."),
    (Operation::LoginAdmin, "Your name is wrong."),
    (Operation::LoginAdmin, "Your password is wrong."),
    (Operation::TerminateAdmin, "Illegal admin."),
    (Operation::ChangePassword, "No such administrator exists."),
    (Operation::ChangePassword, "Your password is wrong."),
    (Operation::FetchPassableAdmin, "Illegal admin."),
    (Operation::DeletePassable, "Illegal admin."),
    (Operation::AddPassable, "Invalid request."),
    (Operation::ManageCar, "No such car exists."),
    (Operation::CarInfo, "Illegal admin."),
];

/// Errors detected while building the reason table.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReasonTableError {
    /// The same pattern is registered twice for one operation.
    #[error("{operation}: pattern '{pattern}' is registered twice")]
    DuplicatePattern {
        /// Operation owning the pattern.
        operation: Operation,
        /// Offending pattern.
        pattern: &'static str,
    },
    /// A pattern is altered by normalisation and could never match.
    #[error("{operation}: pattern '{pattern}' is not in normalised form")]
    UnnormalisedPattern {
        /// Operation owning the pattern.
        operation: Operation,
        /// Offending pattern.
        pattern: &'static str,
    },
    /// A known server reason resolves to nothing.
    #[error("{operation}: known reason '{reason}' is not covered")]
    UncoveredReason {
        /// Operation emitting the reason.
        operation: Operation,
        /// Raw reason text.
        reason: &'static str,
    },
}

/// Outcome of a successful table lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    /// Error category.
    pub code: ErrorCode,
    /// Message to display.
    pub key: MessageKey,
}

/// Mapping from `(operation, normalised reason)` to a [`Resolution`].
#[derive(Debug)]
pub struct ReasonTable {
    exact: HashMap<(Operation, &'static str), Resolution>,
    prefixes: HashMap<Operation, Vec<(&'static str, Resolution)>>,
}

fn digit_runs() -> &'static Regex {
    static DIGIT_RUNS: OnceLock<Regex> = OnceLock::new();
    DIGIT_RUNS.get_or_init(|| {
        Regex::new(r"\d+").unwrap_or_else(|error| panic!("digit regex failed to compile: {error}"))
    })
}

/// Normalise a raw reason for lookup: trim it and mask digit runs with `#`.
pub fn normalise_reason(raw: &str) -> String {
    digit_runs().replace_all(raw.trim(), "#").into_owned()
}

impl ReasonTable {
    /// Build the table and validate it against [`KNOWN_SERVER_REASONS`].
    ///
    /// # Errors
    ///
    /// Returns [`ReasonTableError`] when a pattern is duplicated, cannot
    /// match after normalisation, or a known reason is left uncovered.
    pub fn build() -> Result<Self, ReasonTableError> {
        let mut table = Self {
            exact: HashMap::new(),
            prefixes: HashMap::new(),
        };
        for operation in Operation::ALL {
            let rules = shared_rules(operation)
                .iter()
                .chain(specific_rules(operation));
            for &(pattern, code, key) in rules {
                table.insert(operation, pattern, Resolution { code, key })?;
            }
        }
        table.validate(KNOWN_SERVER_REASONS)?;
        Ok(table)
    }

    fn insert(
        &mut self,
        operation: Operation,
        pattern: &'static str,
        resolution: Resolution,
    ) -> Result<(), ReasonTableError> {
        if pattern.is_empty() || normalise_reason(pattern) != pattern {
            return Err(ReasonTableError::UnnormalisedPattern { operation, pattern });
        }
        let duplicate = match operation.match_mode() {
            MatchMode::Exact => self
                .exact
                .insert((operation, pattern), resolution)
                .is_some(),
            MatchMode::Prefix => {
                let entries = self.prefixes.entry(operation).or_default();
                let seen = entries.iter().any(|(existing, _)| *existing == pattern);
                entries.push((pattern, resolution));
                seen
            }
        };
        if duplicate {
            return Err(ReasonTableError::DuplicatePattern { operation, pattern });
        }
        Ok(())
    }

    /// Check that every reason in `vocabulary` resolves.
    ///
    /// # Errors
    ///
    /// Returns [`ReasonTableError::UncoveredReason`] for the first reason
    /// that falls through to the generic failure.
    pub fn validate(
        &self,
        vocabulary: &[(Operation, &'static str)],
    ) -> Result<(), ReasonTableError> {
        match vocabulary
            .iter()
            .find(|(operation, reason)| self.resolve(*operation, reason).is_none())
        {
            Some(&(operation, reason)) => {
                Err(ReasonTableError::UncoveredReason { operation, reason })
            }
            None => Ok(()),
        }
    }

    /// Look up a raw reason. `None` means the reason is not recognised.
    pub fn resolve(&self, operation: Operation, raw: &str) -> Option<Resolution> {
        let normalised = normalise_reason(raw);
        match operation.match_mode() {
            MatchMode::Exact => self.exact.get(&(operation, normalised.as_str())).copied(),
            MatchMode::Prefix => self
                .prefixes
                .get(&operation)?
                .iter()
                .filter(|(pattern, _)| normalised.starts_with(pattern))
                .max_by_key(|(pattern, _)| pattern.len())
                .map(|(_, resolution)| *resolution),
        }
    }
}

fn shared_table() -> Result<&'static ReasonTable, ReasonTableError> {
    static TABLE: OnceLock<Result<ReasonTable, ReasonTableError>> = OnceLock::new();
    TABLE
        .get_or_init(ReasonTable::build)
        .as_ref()
        .map_err(Clone::clone)
}

/// Turns raw outcomes into payloads or [`DomainError`]s.
///
/// Unrecognised reasons and transport failures are recorded through
/// `tracing` before the domain error is returned; the raw text never reaches
/// the error itself.
#[derive(Debug, Clone, Copy)]
pub struct ReasonTranslator {
    table: &'static ReasonTable,
    locale: Locale,
}

impl ReasonTranslator {
    /// Create a translator rendering messages in `locale`.
    ///
    /// # Errors
    ///
    /// Returns [`ReasonTableError`] when the shared table fails validation.
    pub fn new(locale: Locale) -> Result<Self, ReasonTableError> {
        Ok(Self {
            table: shared_table()?,
            locale,
        })
    }

    /// Locale used for every message this translator produces.
    pub const fn locale(&self) -> Locale {
        self.locale
    }

    /// Classify a `succeeded: false` reply.
    pub fn classify(&self, operation: Operation, reason: Option<&str>) -> DomainError {
        let Some(raw) = reason else {
            warn!(%operation, "fleet api reported failure without a reason");
            return DomainError::generic_failure(self.locale);
        };
        match self.table.resolve(operation, raw) {
            Some(Resolution { code, key }) => DomainError::new(code, key, self.locale),
            None => {
                warn!(%operation, reason = raw, "unrecognised fleet api failure reason");
                DomainError::generic_failure(self.locale)
            }
        }
    }

    /// Classify a failure raised before any reply envelope was obtained.
    pub fn transport_failure(&self, operation: Operation, failure: &FleetApiError) -> DomainError {
        error!(%operation, error = %failure, "fleet api call failed");
        DomainError::communication_failure(self.locale)
    }

    /// Classify a successful reply that lacks a required field.
    pub fn protocol_violation(&self, operation: Operation, field: &'static str) -> DomainError {
        warn!(%operation, field, "fleet api reply is missing a required field");
        DomainError::generic_failure(self.locale)
    }

    /// Reduce a raw outcome to its body or a domain error.
    ///
    /// # Errors
    ///
    /// Returns a [`DomainError`] for transport failures and for replies with
    /// `succeeded: false`.
    pub fn interpret<T>(
        &self,
        operation: Operation,
        outcome: FleetApiResult<T>,
    ) -> Result<T, DomainError> {
        match outcome {
            Err(failure) => Err(self.transport_failure(operation, &failure)),
            Ok(reply) if !reply.succeeded => {
                Err(self.classify(operation, reply.reason.as_deref()))
            }
            Ok(reply) => Ok(reply.body),
        }
    }

    /// Require an optional payload field of a successful reply.
    ///
    /// # Errors
    ///
    /// Returns a generic failure when the field is absent.
    pub fn require<T>(
        &self,
        operation: Operation,
        field: &'static str,
        value: Option<T>,
    ) -> Result<T, DomainError> {
        value.ok_or_else(|| self.protocol_violation(operation, field))
    }
}

#[cfg(test)]
mod tests {
    //! Coverage for reason normalisation, lookup and table validation.

    use super::*;
    use crate::domain::ports::{NoPayload, Reply};
    use rstest::{fixture, rstest};

    #[fixture]
    fn translator() -> ReasonTranslator {
        ReasonTranslator::new(Locale::En).expect("table validates")
    }

    #[rstest]
    #[case("Destination 3 is outside the passable area.", "Destination # is outside the passable area.")]
    #[case("  Car 12 and 7  ", "Car # and #")]
    #[case("no digits", "no digits")]
    fn normalisation_masks_digit_runs(#[case] raw: &str, #[case] expected: &str) {
        assert_eq!(normalise_reason(raw), expected);
    }

    #[rstest]
    fn known_vocabulary_is_fully_covered() {
        let table = ReasonTable::build().expect("table builds");
        assert!(table.validate(KNOWN_SERVER_REASONS).is_ok());
    }

    #[rstest]
    fn validation_reports_uncovered_reasons() {
        let table = ReasonTable::build().expect("table builds");
        let error = table
            .validate(&[(Operation::ManageCar, "Car exploded.")])
            .expect_err("reason is unknown");
        assert_eq!(
            error,
            ReasonTableError::UncoveredReason {
                operation: Operation::ManageCar,
                reason: "Car exploded.",
            }
        );
    }

    #[rstest]
    #[case::leg_outside(Operation::PlanLeg, "Destination 7 is outside the passable area.", ErrorCode::UnreachableDestination)]
    #[case::leg_unreachable(Operation::PlanLeg, "Destination 1 could not be reached.", ErrorCode::UnreachableDestination)]
    #[case::rate_limited(Operation::CreateUser, "Please allow some tims and access again.", ErrorCode::RateLimited)]
    #[case::capacity(Operation::CreateUser, "Users exceeded the limit.", ErrorCode::CapacityExceeded)]
    #[case::busy(Operation::ExecuteRoute, "Reject new order!", ErrorCode::ConflictingOperation)]
    #[case::missing_route(Operation::FetchRoute, "There is no route with that name.", ErrorCode::NotFound)]
    #[case::illegal_admin(Operation::CarInfo, "Illegal admin.", ErrorCode::UnauthorizedIdentity)]
    #[case::first_sentence(Operation::IsAcceptable, "Invalid request. Missing userId.", ErrorCode::InvalidRequest)]
    #[case::save_unreachable(Operation::SaveRoute, "RouteNo.4 could not be reached.", ErrorCode::UnreachableDestination)]
    fn recognised_reasons_map_to_their_code(
        translator: ReasonTranslator,
        #[case] operation: Operation,
        #[case] reason: &str,
        #[case] expected: ErrorCode,
    ) {
        assert_eq!(translator.classify(operation, Some(reason)).code(), expected);
    }

    #[rstest]
    #[case::user_reason_on_admin_call(Operation::CarInfo, Some("Illegal user."))]
    #[case::exact_match_needs_whole_text(Operation::EndRoute, Some("Invalid request. Extra."))]
    #[case::unknown(Operation::PlanLeg, Some("Something odd happened."))]
    #[case::empty(Operation::Terminate, Some(""))]
    #[case::absent(Operation::MonitorCar, None)]
    fn unrecognised_reasons_degrade_to_generic_failure(
        translator: ReasonTranslator,
        #[case] operation: Operation,
        #[case] reason: Option<&str>,
    ) {
        let error = translator.classify(operation, reason);
        assert_eq!(error.code(), ErrorCode::GenericFailure);
        assert_eq!(error.key(), MessageKey::ApiCallFailed);
    }

    #[rstest]
    #[case::terminate_admin(Operation::TerminateAdmin, MessageKey::MalformedRequest)]
    #[case::change_password(Operation::ChangePassword, MessageKey::MalformedRequest)]
    #[case::login_admin(Operation::LoginAdmin, MessageKey::InvalidRequest)]
    #[case::car_info(Operation::CarInfo, MessageKey::InvalidRequest)]
    fn invalid_request_wording_depends_on_operation(
        #[case] operation: Operation,
        #[case] expected: MessageKey,
    ) {
        let ja = ReasonTranslator::new(Locale::Ja).expect("table validates");
        let error = ja.classify(operation, Some("Invalid request."));
        assert_eq!(error.code(), ErrorCode::InvalidRequest);
        assert_eq!(error.key(), expected);
    }

    #[rstest]
    fn admin_account_calls_use_the_short_invalid_request_text() {
        let ja = ReasonTranslator::new(Locale::Ja).expect("table validates");
        let error = ja.classify(Operation::TerminateAdmin, Some("Invalid request."));
        assert_eq!(error.message(), "不正なリクエストです。");
    }

    #[rstest]
    fn same_text_resolves_per_operation(translator: ReasonTranslator) {
        let login = translator.classify(Operation::LoginAdmin, Some("Your password is wrong."));
        let change = translator.classify(Operation::ChangePassword, Some("No such administrator exists."));
        let manage = translator.classify(Operation::ManageCar, Some("No such administrator exists."));

        assert_eq!(login.key(), MessageKey::WrongAdminPassword);
        assert_eq!(change.key(), MessageKey::IllegalAdmin);
        assert_eq!(manage.code(), ErrorCode::GenericFailure);
    }

    #[rstest]
    fn transport_failures_never_use_operation_vocabulary(translator: ReasonTranslator) {
        for operation in Operation::ALL {
            let outcome: FleetApiResult<NoPayload> =
                Err(FleetApiError::transport("connection refused"));
            let error = translator
                .interpret(operation, outcome)
                .expect_err("transport failure");
            assert_eq!(error.code(), ErrorCode::CommunicationFailure);
        }
    }

    #[rstest]
    fn interpret_passes_successful_bodies_through(translator: ReasonTranslator) {
        let body = translator
            .interpret(Operation::Terminate, Ok(Reply::ok(NoPayload {})))
            .expect("success");
        assert_eq!(body, NoPayload {});
    }

    #[rstest]
    fn require_flags_missing_fields(translator: ReasonTranslator) {
        let error = translator
            .require::<u8>(Operation::CreateUser, "userId", None)
            .expect_err("missing");
        assert_eq!(error.code(), ErrorCode::GenericFailure);
        assert_eq!(
            translator.require(Operation::CreateUser, "userId", Some(1_u8)),
            Ok(1)
        );
    }

    #[rstest]
    fn messages_follow_the_translator_locale() {
        let ja = ReasonTranslator::new(Locale::Ja).expect("table validates");
        let error = ja.classify(Operation::ManageCar, Some("No such car exists."));
        assert_eq!(error.message(), "指定された車両は存在しません。");
    }
}
