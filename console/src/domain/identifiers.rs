//! Server-issued identifiers and the session handles built on top of them.
//!
//! Identifiers are opaque: the client compares them for equality and sends
//! them back verbatim, nothing more. Session handles wrap the identifier that
//! a login or creation call returned and are passed explicitly into every
//! service call. Terminating a session consumes its handle so the identifier
//! cannot be reused after the server has invalidated it.

use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! define_identifier {
    ($(#[$outer:meta])* $name:ident) => {
        $(#[$outer])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Wrap a raw identifier string issued by the server.
            pub fn new(raw: impl Into<String>) -> Self {
                Self(raw.into())
            }

            /// Borrow the identifier as sent on the wire.
            pub fn as_str(&self) -> &str {
                self.0.as_str()
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                self.as_str()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0
            }
        }
    };
}

define_identifier! {
    /// Identifier naming an end-user session.
    UserId
}

define_identifier! {
    /// Identifier naming an authenticated administrator session.
    AdminId
}

define_identifier! {
    /// Identifier naming a vehicle.
    CarId
}

/// Handle for an active user session.
///
/// The handle is not `Clone`: [`crate::domain::UserConsoleService::terminate`]
/// takes it by value, ending its use together with the server-side session.
#[derive(Debug, PartialEq, Eq)]
pub struct UserSession {
    id: UserId,
}

impl UserSession {
    /// Resume a session from an identifier obtained earlier.
    pub fn resume(id: UserId) -> Self {
        Self { id }
    }

    /// Identifier sent with every call made on behalf of this session.
    pub fn id(&self) -> &UserId {
        &self.id
    }
}

/// Handle for an authenticated administrator session.
#[derive(Debug, PartialEq, Eq)]
pub struct AdminSession {
    id: AdminId,
}

impl AdminSession {
    /// Resume a session from an identifier obtained earlier.
    pub fn resume(id: AdminId) -> Self {
        Self { id }
    }

    /// Identifier sent with every call made on behalf of this session.
    pub fn id(&self) -> &AdminId {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn identifiers_serialise_as_bare_strings() {
        let id = CarId::new("car-7");
        let json = serde_json::to_string(&id).expect("serialise");
        assert_eq!(json, "\"car-7\"");

        let decoded: CarId = serde_json::from_str(&json).expect("deserialise");
        assert_eq!(decoded, id);
    }

    #[rstest]
    fn sessions_expose_the_wrapped_identifier() {
        let session = AdminSession::resume(AdminId::new("admin-1"));
        assert_eq!(session.id().as_str(), "admin-1");
    }
}
