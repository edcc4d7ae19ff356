//! Achievement records and their wire schema.
//!
//! Local records carry presentation data (the medal to display) that is not
//! part of the upload contract. The wire schema is an explicit allow-list:
//! a field reaches the server only if [`WireAchievement`] names it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Version of the [`WireAchievement`] field list.
pub const WIRE_SCHEMA_VERSION: u32 = 1;

/// Field names sent to the server, in serialization order.
pub const WIRE_FIELDS: [&str; 4] = ["id", "medal_id", "deck_id", "created_at"];

/// Display data derived locally from the medal id. Never uploaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MedalDisplay {
    pub name: String,
    pub image: String,
}

/// A medal earned during review, as stored by the streak engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AchievementRecord {
    /// Local row id
    pub id: i64,
    /// Identifier of the medal that was earned
    pub medal_id: String,
    /// Deck the review happened in
    pub deck_id: i64,
    /// When the medal was earned
    pub created_at: DateTime<Utc>,
    /// Local-only presentation data
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub medal: Option<MedalDisplay>,
}

impl AchievementRecord {
    pub fn new(id: i64, medal_id: impl Into<String>, deck_id: i64, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            medal_id: medal_id.into(),
            deck_id,
            created_at,
            medal: None,
        }
    }

    /// Attach display data.
    pub fn with_medal(mut self, medal: MedalDisplay) -> Self {
        self.medal = Some(medal);
        self
    }

    /// Project onto the upload schema.
    pub fn to_wire(&self) -> WireAchievement {
        WireAchievement {
            id: self.id,
            medal_id: self.medal_id.clone(),
            deck_id: self.deck_id,
            created_at: self.created_at,
        }
    }
}

/// One element of the uploaded JSON array (schema version 1).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WireAchievement {
    pub id: i64,
    pub medal_id: String,
    pub deck_id: i64,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn record() -> AchievementRecord {
        AchievementRecord::new(1, "double_kill", 42, Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap())
            .with_medal(MedalDisplay {
                name: "Double Kill".to_string(),
                image: "double_kill.png".to_string(),
            })
    }

    #[test]
    fn test_wire_object_has_exactly_the_allowed_fields() {
        let value = serde_json::to_value(record().to_wire()).unwrap();
        let object = value.as_object().unwrap();

        assert_eq!(object.len(), WIRE_FIELDS.len());
        for field in WIRE_FIELDS {
            assert!(object.contains_key(field), "missing {}", field);
        }
        assert!(!object.contains_key("medal"));
    }

    #[test]
    fn test_wire_fields_serialize_in_declared_order() {
        let json = serde_json::to_string(&record().to_wire()).unwrap();

        let positions: Vec<usize> = WIRE_FIELDS
            .iter()
            .map(|field| json.find(&format!("\"{}\":", field)).unwrap())
            .collect();

        let mut sorted = positions.clone();
        sorted.sort_unstable();
        assert_eq!(positions, sorted, "fields out of order in {}", json);
    }

    #[test]
    fn test_schema_version_one_has_four_fields() {
        assert_eq!(WIRE_SCHEMA_VERSION, 1);
        assert_eq!(WIRE_FIELDS, ["id", "medal_id", "deck_id", "created_at"]);
    }

    #[test]
    fn test_to_wire_copies_fields() {
        let wire = record().to_wire();
        assert_eq!(wire.id, 1);
        assert_eq!(wire.medal_id, "double_kill");
        assert_eq!(wire.deck_id, 42);
        assert_eq!(wire.created_at, record().created_at);
    }

    #[test]
    fn test_wire_rejects_unknown_fields() {
        let json = r#"{"id":1,"medal_id":"m","deck_id":2,"created_at":"2024-03-01T12:00:00Z","medal":{}}"#;
        assert!(serde_json::from_str::<WireAchievement>(json).is_err());
    }

    #[test]
    fn test_record_deserializes_without_medal() {
        let json = r#"{"id":3,"medal_id":"killing_spree","deck_id":1,"created_at":"2024-03-01T12:00:00Z"}"#;
        let record: AchievementRecord = serde_json::from_str(json).unwrap();
        assert!(record.medal.is_none());
        assert_eq!(record.medal_id, "killing_spree");
    }
}
