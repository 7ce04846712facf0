//! User-presentable message catalogue.
//!
//! Domain errors never carry server text verbatim. Each failure resolves to a
//! [`MessageKey`] and the key is rendered in the configured [`Locale`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Display language for domain error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    /// Japanese, the operators' language.
    #[default]
    Ja,
    /// English.
    En,
}

/// Error returned when a locale tag is not supported.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unsupported locale '{tag}' (expected 'ja' or 'en')")]
pub struct UnsupportedLocale {
    tag: String,
}

impl FromStr for Locale {
    type Err = UnsupportedLocale;

    fn from_str(tag: &str) -> Result<Self, Self::Err> {
        match tag.trim().to_ascii_lowercase().as_str() {
            "ja" | "ja-jp" => Ok(Self::Ja),
            "en" | "en-gb" | "en-us" => Ok(Self::En),
            _ => Err(UnsupportedLocale {
                tag: tag.to_owned(),
            }),
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ja => f.write_str("ja"),
            Self::En => f.write_str("en"),
        }
    }
}

/// Identifies one entry of the message catalogue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageKey {
    /// The server rejected the request as malformed.
    InvalidRequest,
    /// Short form of [`MessageKey::InvalidRequest`] used by administrator
    /// account calls.
    MalformedRequest,
    /// The user identifier is not valid.
    IllegalUser,
    /// The administrator identifier is not valid.
    IllegalAdmin,
    /// The administrator name does not exist.
    WrongAdminName,
    /// The administrator password does not match.
    WrongAdminPassword,
    /// Too many calls in a short period.
    RateLimited,
    /// No more users can be admitted.
    SystemFull,
    /// The server failed internally.
    ServerError,
    /// No saved route has the requested name.
    RouteNotFound,
    /// No vehicle has the requested identifier.
    CarNotFound,
    /// A waypoint lies outside every passable area.
    PointOutsidePassableArea,
    /// A waypoint cannot be reached.
    PointUnreachable,
    /// The final destination cannot be reached.
    EndPointUnreachable,
    /// The submitted route cannot be driven.
    RouteUnreachable,
    /// The vehicle has not arrived at a stop yet.
    CarNotAtStop,
    /// The vehicle in use reported a fault.
    CarProblem,
    /// The system is not in a state to accept routes.
    SystemProblem,
    /// A route is already being executed.
    RouteInProgress,
    /// A vehicle assignment is still in progress.
    AssignmentInProgress,
    /// Generic failure for unrecognised server reasons.
    ApiCallFailed,
    /// The server could not be reached or answered unintelligibly.
    CommunicationFailed,
}

impl MessageKey {
    /// Render the message in the given locale.
    pub const fn text(self, locale: Locale) -> &'static str {
        match locale {
            Locale::Ja => self.ja(),
            Locale::En => self.en(),
        }
    }

    const fn ja(self) -> &'static str {
        match self {
            Self::InvalidRequest => "不正な API リクエストが発生しました。",
            Self::MalformedRequest => "不正なリクエストです。",
            Self::IllegalUser => "ユーザ識別子は有効ではありません。",
            Self::IllegalAdmin => "管理者識別子は有効ではありません。",
            Self::WrongAdminName => "管理者名が間違っています。",
            Self::WrongAdminPassword => "管理者パスワードが間違っています。",
            Self::RateLimited => "API 呼び出しの回数制限を超えました。",
            Self::SystemFull => "システムが満員状態です。",
            Self::ServerError => "API サーバでエラーが発生しました。",
            Self::RouteNotFound => "そのような名前の経路はありません。",
            Self::CarNotFound => "指定された車両は存在しません。",
            Self::PointOutsidePassableArea => "通行できない地点が含まれています。",
            Self::PointUnreachable => "到達できない地点が含まれています。",
            Self::EndPointUnreachable => "目的地に到達できません。",
            Self::RouteUnreachable => "指定された経路は到達できません。",
            Self::CarNotAtStop => "利用中の車は停留所に到着していません。",
            Self::CarProblem => "利用中の車に問題が発生しました。",
            Self::SystemProblem => "システムに問題が発生しました。",
            Self::RouteInProgress => "経路を実行している間は別の経路を実行できません。",
            Self::AssignmentInProgress => "車の割当て処理を実行中は別の経路を実行できません。",
            Self::ApiCallFailed => "API の呼び出しに失敗しました。",
            Self::CommunicationFailed => "API サーバとの通信に失敗しました。",
        }
    }

    const fn en(self) -> &'static str {
        match self {
            Self::InvalidRequest => "The API request was invalid.",
            Self::MalformedRequest => "The request was invalid.",
            Self::IllegalUser => "The user identifier is not valid.",
            Self::IllegalAdmin => "The administrator identifier is not valid.",
            Self::WrongAdminName => "The administrator name is wrong.",
            Self::WrongAdminPassword => "The administrator password is wrong.",
            Self::RateLimited => "Too many API calls; please wait and try again.",
            Self::SystemFull => "The system is at capacity.",
            Self::ServerError => "The API server encountered an error.",
            Self::RouteNotFound => "There is no route with that name.",
            Self::CarNotFound => "The specified vehicle does not exist.",
            Self::PointOutsidePassableArea => "The route includes a point outside the passable area.",
            Self::PointUnreachable => "The route includes a point that cannot be reached.",
            Self::EndPointUnreachable => "The destination cannot be reached.",
            Self::RouteUnreachable => "The specified route cannot be driven.",
            Self::CarNotAtStop => "The vehicle has not arrived at the stop.",
            Self::CarProblem => "A problem occurred with the vehicle in use.",
            Self::SystemProblem => "A problem occurred with the system.",
            Self::RouteInProgress => "Another route cannot start while a route is running.",
            Self::AssignmentInProgress => {
                "Another route cannot start while a vehicle is being assigned."
            }
            Self::ApiCallFailed => "The API call failed.",
            Self::CommunicationFailed => "Communication with the API server failed.",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("ja", Locale::Ja)]
    #[case(" EN ", Locale::En)]
    #[case("en-GB", Locale::En)]
    fn locale_tags_parse(#[case] tag: &str, #[case] expected: Locale) {
        assert_eq!(tag.parse::<Locale>().expect("supported"), expected);
    }

    #[rstest]
    fn unknown_locale_is_rejected() {
        let error = "fr".parse::<Locale>().expect_err("unsupported");
        assert!(error.to_string().contains("'fr'"));
    }

    #[rstest]
    fn every_message_renders_in_both_locales() {
        for key in [
            MessageKey::InvalidRequest,
            MessageKey::MalformedRequest,
            MessageKey::ApiCallFailed,
            MessageKey::CommunicationFailed,
        ] {
            assert!(!key.text(Locale::Ja).trim().is_empty());
            assert!(!key.text(Locale::En).trim().is_empty());
        }
    }
}
