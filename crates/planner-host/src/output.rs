//! JSON serialization of a [`motion::VelocityProfile`], reproducing the
//! wire format byte-for-byte — including the historical "velcoity"
//! misspelling — so downstream consumers don't need to change.

use motion::PlanningPoint;
use serde::Serialize;

/// One point's wire representation: `time`, `heading`, and the two wheel
/// speeds, under the exact (misspelled) field names external consumers
/// already depend on.
#[derive(Debug, Serialize, PartialEq)]
pub struct WirePoint {
    pub time: f64,
    pub heading: f64,
    #[serde(rename = "left velcoity")]
    pub left_velcoity: f64,
    #[serde(rename = "right velocity")]
    pub right_velocity: f64,
}

impl From<&PlanningPoint> for WirePoint {
    fn from(p: &PlanningPoint) -> Self {
        WirePoint {
            time: p.external_time,
            heading: p.heading,
            left_velcoity: p.left_velocity,
            right_velocity: p.right_velocity,
        }
    }
}

/// Renders every point of `points` to a pretty-printed JSON array.
pub fn to_json(points: &[PlanningPoint]) -> serde_json::Result<String> {
    let wire: Vec<WirePoint> = points.iter().map(WirePoint::from).collect();
    serde_json::to_string_pretty(&wire)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_names_match_the_legacy_wire_format() {
        let point = WirePoint {
            time: 1.5,
            heading: 0.3,
            left_velcoity: 0.9,
            right_velocity: 1.1,
        };
        let json = serde_json::to_string(&point).unwrap();
        assert!(json.contains("\"time\":1.5"));
        assert!(json.contains("\"heading\":0.3"));
        assert!(json.contains("\"left velcoity\":0.9"));
        assert!(json.contains("\"right velocity\":1.1"));
    }
}
