use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Snapshot type written by the background recorder.
pub const SNAPSHOT_TYPE_SCHEDULED: &str = "scheduled";
/// Snapshot type written by `cw record`.
pub const SNAPSHOT_TYPE_MANUAL: &str = "manual";

/// One recorded account balance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreditSnapshot {
    /// Store-assigned identifier
    pub id: String,
    /// Account balance at `timestamp`
    pub credits: f64,
    pub timestamp: DateTime<Utc>,
    /// Why the snapshot was taken ("scheduled", "manual", ...)
    #[serde(rename = "type")]
    pub snapshot_type: String,
    /// Server states at recording time, passed through untouched
    #[serde(default)]
    pub server_states: Vec<Value>,
}

/// A snapshot that has not been written yet; the store assigns the id.
#[derive(Debug, Clone)]
pub struct NewSnapshot {
    pub credits: f64,
    pub timestamp: DateTime<Utc>,
    pub snapshot_type: String,
    pub server_states: Vec<Value>,
}

impl NewSnapshot {
    pub fn into_snapshot(self, id: String) -> CreditSnapshot {
        CreditSnapshot {
            id,
            credits: self.credits,
            timestamp: self.timestamp,
            snapshot_type: self.snapshot_type,
            server_states: self.server_states,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerCount {
    pub max: u32,
    pub count: u32,
}

/// Compact server state stored alongside each recorded snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerState {
    pub id: String,
    pub name: String,
    pub status: u8,
    pub status_label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub players: Option<PlayerCount>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn snapshot_serializes_type_and_camel_case() {
        let snapshot = CreditSnapshot {
            id: "1-0".to_string(),
            credits: 12.5,
            timestamp: Utc.with_ymd_and_hms(2026, 10, 1, 9, 0, 0).unwrap(),
            snapshot_type: SNAPSHOT_TYPE_MANUAL.to_string(),
            server_states: vec![],
        };
        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["type"], "manual");
        assert!(json.get("serverStates").is_some());
        assert!(json.get("snapshot_type").is_none());
    }

    #[test]
    fn snapshot_without_server_states_deserializes() {
        let json = r#"{"id":"a","credits":3.0,"timestamp":"2026-10-01T09:00:00Z","type":"scheduled"}"#;
        let snapshot: CreditSnapshot = serde_json::from_str(json).unwrap();
        assert!(snapshot.server_states.is_empty());
        assert_eq!(snapshot.snapshot_type, SNAPSHOT_TYPE_SCHEDULED);
    }

    #[test]
    fn server_states_pass_through_unknown_fields() {
        let json = r#"{"id":"a","credits":3.0,"timestamp":"2026-10-01T09:00:00Z","type":"x","serverStates":[{"foo":{"bar":1}}]}"#;
        let snapshot: CreditSnapshot = serde_json::from_str(json).unwrap();
        let back = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(back["serverStates"][0]["foo"]["bar"], 1);
    }
}
