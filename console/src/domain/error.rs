//! Domain-level error types.
//!
//! Every service operation returns either its payload or a [`DomainError`].
//! Raw server reasons and transport failures are classified before they reach
//! this type, so adapters above the domain only ever see the closed
//! [`ErrorCode`] taxonomy and a message fit for display.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::messages::{Locale, MessageKey};

/// Stable machine-readable error code describing the failure category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// The request was malformed or failed server-side validation.
    InvalidRequest,
    /// A user, administrator or vehicle identifier was rejected.
    UnauthorizedIdentity,
    /// Too many calls were made in a short period.
    RateLimited,
    /// The system cannot admit more sessions.
    CapacityExceeded,
    /// A named route or vehicle does not exist.
    NotFound,
    /// A waypoint or destination lies outside the passable area or cannot be reached.
    UnreachableDestination,
    /// The operation conflicts with work already in progress.
    ConflictingOperation,
    /// The server could not be reached or its reply could not be read.
    CommunicationFailure,
    /// Catch-all for server reasons that are not recognised.
    GenericFailure,
}

impl ErrorCode {
    /// Every code, in declaration order.
    pub const ALL: [Self; 9] = [
        Self::InvalidRequest,
        Self::UnauthorizedIdentity,
        Self::RateLimited,
        Self::CapacityExceeded,
        Self::NotFound,
        Self::UnreachableDestination,
        Self::ConflictingOperation,
        Self::CommunicationFailure,
        Self::GenericFailure,
    ];
}

/// Domain error payload.
///
/// ## Invariants
/// - `message` is the rendering of `key` in the locale the error was built
///   with, and is never empty.
///
/// # Examples
/// ```
/// use fleet_console::domain::{DomainError, ErrorCode, Locale, MessageKey};
///
/// let err = DomainError::new(ErrorCode::NotFound, MessageKey::RouteNotFound, Locale::En);
/// assert_eq!(err.code(), ErrorCode::NotFound);
/// assert_eq!(err.message(), "There is no route with that name.");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainError {
    code: ErrorCode,
    key: MessageKey,
    message: &'static str,
}

impl DomainError {
    /// Create an error whose message is `key` rendered in `locale`.
    pub const fn new(code: ErrorCode, key: MessageKey, locale: Locale) -> Self {
        Self {
            code,
            key,
            message: key.text(locale),
        }
    }

    /// Stable machine-readable error code.
    pub const fn code(&self) -> ErrorCode {
        self.code
    }

    /// Catalogue entry the message was rendered from.
    pub const fn key(&self) -> MessageKey {
        self.key
    }

    /// Localised, user-displayable message.
    pub const fn message(&self) -> &'static str {
        self.message
    }

    /// Re-render the message in another locale.
    pub fn localized(self, locale: Locale) -> Self {
        Self::new(self.code, self.key, locale)
    }

    /// Convenience constructor for [`ErrorCode::CommunicationFailure`].
    pub const fn communication_failure(locale: Locale) -> Self {
        Self::new(
            ErrorCode::CommunicationFailure,
            MessageKey::CommunicationFailed,
            locale,
        )
    }

    /// Convenience constructor for [`ErrorCode::GenericFailure`].
    pub const fn generic_failure(locale: Locale) -> Self {
        Self::new(ErrorCode::GenericFailure, MessageKey::ApiCallFailed, locale)
    }
}

impl fmt::Display for DomainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message)
    }
}

impl std::error::Error for DomainError {}
