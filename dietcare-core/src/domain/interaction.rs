//! Interaction events (likes, saves, cooked)

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use super::wire;

/// What the user did with a recipe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InteractionKind {
    Like,
    Save,
    Cooked,
}

impl InteractionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            InteractionKind::Like => "like",
            InteractionKind::Save => "save",
            InteractionKind::Cooked => "cooked",
        }
    }

    /// Parse a wire name; `None` for event types this client doesn't record
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "like" => Some(InteractionKind::Like),
            "save" => Some(InteractionKind::Save),
            "cooked" => Some(InteractionKind::Cooked),
            _ => None,
        }
    }
}

impl fmt::Display for InteractionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Append-only record of a user action on a recipe
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "InteractionWire", into = "InteractionWire")]
pub struct Interaction {
    pub id: Option<String>,
    pub user_id: String,
    pub recipe_id: String,
    pub event_type: InteractionKind,
    pub timestamp: Option<DateTime<Utc>>,
}

impl Interaction {
    /// A new, unsent event stamped with the current time
    pub fn new(
        user_id: impl Into<String>,
        recipe_id: impl Into<String>,
        event_type: InteractionKind,
    ) -> Self {
        Self {
            id: None,
            user_id: user_id.into(),
            recipe_id: recipe_id.into(),
            event_type,
            timestamp: Some(Utc::now()),
        }
    }

    /// Decode a backend list of interactions.
    ///
    /// Records with an event type this client doesn't know (or none at all)
    /// are skipped. A record that is otherwise malformed fails the list.
    pub fn decode_list(body: JsonValue) -> serde_json::Result<Vec<Interaction>> {
        let records: Vec<InteractionWire> = serde_json::from_value(body)?;
        Ok(records
            .into_iter()
            .filter_map(|record| Interaction::try_from(record).ok())
            .collect())
    }
}

/// JSON shape of an interaction.
///
/// The feed writes the kind as `event_type` and the recipe card as `type`;
/// both are read, and both are written.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct InteractionWire {
    #[serde(
        default,
        deserialize_with = "wire::optional_id",
        skip_serializing_if = "Option::is_none"
    )]
    id: Option<String>,
    #[serde(deserialize_with = "wire::id")]
    user_id: String,
    #[serde(deserialize_with = "wire::id")]
    recipe_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    event_type: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    timestamp: Option<DateTime<Utc>>,
}

impl TryFrom<InteractionWire> for Interaction {
    type Error = String;

    fn try_from(raw: InteractionWire) -> Result<Self, Self::Error> {
        let name = raw
            .event_type
            .as_deref()
            .or(raw.kind.as_deref())
            .ok_or_else(|| "interaction has neither `event_type` nor `type`".to_string())?;
        let event_type = InteractionKind::from_name(name)
            .ok_or_else(|| format!("unknown interaction type '{}'", name))?;

        Ok(Self {
            id: raw.id,
            user_id: raw.user_id,
            recipe_id: raw.recipe_id,
            event_type,
            timestamp: raw.timestamp,
        })
    }
}

impl From<Interaction> for InteractionWire {
    fn from(event: Interaction) -> Self {
        let name = event.event_type.as_str().to_string();
        Self {
            id: event.id,
            user_id: event.user_id,
            recipe_id: event.recipe_id,
            event_type: Some(name.clone()),
            kind: Some(name),
            timestamp: event.timestamp,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_payload_shape() {
        let event = Interaction::new("1", "42", InteractionKind::Like);
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["user_id"], json!("1"));
        assert_eq!(value["recipe_id"], json!("42"));
        assert_eq!(value["event_type"], json!("like"));
        assert_eq!(value["type"], json!("like"));
        assert!(value.get("id").is_none());
        assert!(value.get("timestamp").is_some());
    }

    #[test]
    fn test_decode_numeric_ids() {
        let event: Interaction = serde_json::from_value(json!({
            "id": 3, "user_id": 1, "recipe_id": 12, "event_type": "save"
        }))
        .unwrap();
        assert_eq!(event.id.as_deref(), Some("3"));
        assert_eq!(event.recipe_id, "12");
        assert_eq!(event.event_type, InteractionKind::Save);
        assert!(event.timestamp.is_none());
    }

    #[test]
    fn test_decode_type_field() {
        let event: Interaction = serde_json::from_value(json!({
            "user_id": 1, "recipe_id": 2, "type": "like", "timestamp": null
        }))
        .unwrap();
        assert_eq!(event.event_type, InteractionKind::Like);
        assert_eq!(event.recipe_id, "2");
    }

    #[test]
    fn test_decode_rejects_unknown_kind() {
        let result: serde_json::Result<Interaction> = serde_json::from_value(json!({
            "user_id": 1, "recipe_id": 2, "event_type": "view"
        }));
        assert!(result.is_err());
        let result: serde_json::Result<Interaction> =
            serde_json::from_value(json!({"user_id": 1, "recipe_id": 2}));
        assert!(result.is_err());
    }

    #[test]
    fn test_decode_list_skips_foreign_kinds() {
        let events = Interaction::decode_list(json!([
            {"id": 1, "user_id": 1, "recipe_id": 4, "type": "like"},
            {"id": 2, "user_id": 1, "recipe_id": 5, "event_type": "view"},
            {"id": 3, "user_id": 1, "recipe_id": 6, "event_type": "Save"}
        ]))
        .unwrap();
        let ids: Vec<&str> = events.iter().map(|e| e.recipe_id.as_str()).collect();
        assert_eq!(ids, vec!["4", "6"]);

        assert!(Interaction::decode_list(json!([{"user_id": 1, "type": "like"}])).is_err());
        assert!(Interaction::decode_list(json!({"error": "nope"})).is_err());
    }
}
