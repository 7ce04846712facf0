//! Geographic primitives shared by routing and passable-area management.
//!
//! Coordinates are WGS84 degrees, north and east positive. The client never
//! normalises or validates them; the server decides what is reachable.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A latitude/longitude pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    /// Latitude, north positive.
    pub lat: f64,
    /// Longitude, east positive.
    pub lng: f64,
}

impl Position {
    /// Build a position from latitude and longitude.
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// One leg of a route: the path between two consecutive stops.
pub type SubRoute = Vec<Position>;

/// A complete route. Leg order is significant.
pub type Route = Vec<SubRoute>;

/// A circular passable region.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PassablePoint {
    /// Centre of the circle.
    pub position: Position,
    /// Radius in metres.
    pub radius: f64,
}

/// Numeric identifier of a passable area.
///
/// Identifiers assigned by the server are non-negative. Areas drawn locally
/// and not yet committed carry a strictly negative placeholder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PassableId(i64);

impl PassableId {
    /// Wrap a raw identifier value.
    pub const fn new(raw: i64) -> Self {
        Self(raw)
    }

    /// Placeholder for the `n`th locally drawn area (`n` starting at zero).
    pub const fn placeholder(n: u32) -> Self {
        Self(-1 - n as i64)
    }

    /// Raw value as sent on the wire.
    pub const fn get(self) -> i64 {
        self.0
    }

    /// True when the identifier was assigned by the server.
    pub const fn is_committed(self) -> bool {
        self.0 >= 0
    }
}

impl fmt::Display for PassableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A passable circle tagged with its identifier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PassableArea {
    /// Identifier; negative for areas not yet committed.
    #[serde(rename = "passableId")]
    pub id: PassableId,
    /// Circle geometry.
    #[serde(flatten)]
    pub point: PassablePoint,
}

impl PassableArea {
    /// Tag a circle with an identifier.
    pub const fn new(id: PassableId, point: PassablePoint) -> Self {
        Self { id, point }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case(0, -1)]
    #[case(1, -2)]
    #[case(41, -42)]
    fn placeholders_are_strictly_negative(#[case] n: u32, #[case] expected: i64) {
        let id = PassableId::placeholder(n);
        assert_eq!(id.get(), expected);
        assert!(!id.is_committed());
    }

    #[rstest]
    fn passable_area_uses_the_flat_wire_shape() {
        let area: PassableArea = serde_json::from_value(json!({
            "passableId": 3,
            "position": { "lat": 35.1, "lng": 136.9 },
            "radius": 12.5
        }))
        .expect("decode");

        assert_eq!(area.id, PassableId::new(3));
        assert!(area.id.is_committed());
        assert_eq!(area.point.position, Position::new(35.1, 136.9));
        assert_eq!(area.point.radius, 12.5);
    }
}
