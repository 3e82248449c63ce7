//! Audit entry types.
//!
//! An [`AuditEntry`] records one successfully completed action: what was
//! done, to which entity, by whom and from where. Entries are built once and
//! never changed after the storage has assigned their id.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Kind of audited action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditAction {
    /// An entity was created (e.g. a new research report).
    Create,
    /// An existing entity was changed (e.g. a rating change).
    Update,
    /// An entity was deleted.
    Delete,
    /// An entity was looked at.
    View,
    /// Data was exported.
    Export,
    Login,
    Logout,
    /// Data was imported.
    Import,
}

impl std::fmt::Display for AuditAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Create => write!(f, "CREATE"),
            Self::Update => write!(f, "UPDATE"),
            Self::Delete => write!(f, "DELETE"),
            Self::View => write!(f, "VIEW"),
            Self::Export => write!(f, "EXPORT"),
            Self::Login => write!(f, "LOGIN"),
            Self::Logout => write!(f, "LOGOUT"),
            Self::Import => write!(f, "IMPORT"),
        }
    }
}

/// Who performed an action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

impl Actor {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: None,
            role: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = Some(role.into());
        self
    }
}

/// One record in the audit trail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditEntry {
    /// Assigned by the storage on save.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,

    /// When the action was recorded.
    pub timestamp: DateTime<Utc>,

    pub action: AuditAction,

    /// Entity type tag, e.g. "REPORT".
    pub entity_type: String,

    /// Entity id, absent for actions without a natural subject.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity_id: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actor_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actor_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actor_role: Option<String>,

    /// Human-readable summary of the action.
    #[serde(default)]
    pub details: String,

    /// Origin of the request (client address).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_address: Option<String>,
}

impl AuditEntry {
    /// Create an unsaved entry stamped with the current time.
    pub fn new(action: AuditAction, entity_type: impl Into<String>) -> Self {
        Self {
            id: None,
            timestamp: Utc::now(),
            action,
            entity_type: entity_type.into(),
            entity_id: None,
            actor_id: None,
            actor_name: None,
            actor_role: None,
            details: String::new(),
            source_address: None,
        }
    }

    /// Create a builder for an audit entry.
    pub fn builder(action: AuditAction, entity_type: impl Into<String>) -> AuditEntryBuilder {
        AuditEntryBuilder::new(action, entity_type)
    }
}

/// Builder for creating audit entries.
#[derive(Debug)]
pub struct AuditEntryBuilder {
    entry: AuditEntry,
}

impl AuditEntryBuilder {
    /// Create a new builder with required fields.
    pub fn new(action: AuditAction, entity_type: impl Into<String>) -> Self {
        Self {
            entry: AuditEntry::new(action, entity_type),
        }
    }

    /// Set the entity id.
    pub fn entity_id(mut self, id: Option<i64>) -> Self {
        self.entry.entity_id = id;
        self
    }

    /// Set the actor fields from an [`Actor`].
    pub fn actor(mut self, actor: &Actor) -> Self {
        self.entry.actor_id = Some(actor.id.clone());
        self.entry.actor_name = actor.name.clone();
        self.entry.actor_role = actor.role.clone();
        self
    }

    /// Set the details text.
    pub fn details(mut self, details: impl Into<String>) -> Self {
        self.entry.details = details.into();
        self
    }

    /// Set the details text, truncated to `max_chars` characters.
    pub fn bounded_details(mut self, details: impl Into<String>, max_chars: usize) -> Self {
        self.entry.details = truncate_chars(details.into(), max_chars);
        self
    }

    /// Set the source address.
    pub fn source_address(mut self, address: impl Into<String>) -> Self {
        self.entry.source_address = Some(address.into());
        self
    }

    /// Override the creation timestamp.
    pub fn timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.entry.timestamp = timestamp;
        self
    }

    /// Build the audit entry.
    pub fn build(self) -> AuditEntry {
        self.entry
    }
}

/// Cut `text` down to at most `max_chars` characters, on a char boundary.
pub fn truncate_chars(mut text: String, max_chars: usize) -> String {
    if let Some((byte_index, _)) = text.char_indices().nth(max_chars) {
        text.truncate(byte_index);
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_builder() {
        let actor = Actor::new("jdoe").with_name("Jane Doe").with_role("ANALYST");
        let entry = AuditEntry::builder(AuditAction::Update, "REPORT")
            .entity_id(Some(12))
            .actor(&actor)
            .details("Report 'UBS Rating Change' updated (rating: SELL)")
            .source_address("10.0.0.8")
            .build();

        assert_eq!(entry.id, None);
        assert_eq!(entry.action, AuditAction::Update);
        assert_eq!(entry.entity_type, "REPORT");
        assert_eq!(entry.entity_id, Some(12));
        assert_eq!(entry.actor_id.as_deref(), Some("jdoe"));
        assert_eq!(entry.actor_name.as_deref(), Some("Jane Doe"));
        assert_eq!(entry.actor_role.as_deref(), Some("ANALYST"));
        assert_eq!(entry.source_address.as_deref(), Some("10.0.0.8"));
    }

    #[test]
    fn test_bounded_details_truncates_on_char_boundary() {
        let entry = AuditEntry::builder(AuditAction::Create, "REPORT")
            .bounded_details("Nestlé Übernahme", 5)
            .build();
        assert_eq!(entry.details, "Nestl");

        let entry = AuditEntry::builder(AuditAction::Create, "REPORT")
            .bounded_details("Nestlé", 6)
            .build();
        assert_eq!(entry.details, "Nestlé");

        assert_eq!(truncate_chars("short".to_string(), 2000), "short");
    }

    #[test]
    fn test_action_display_and_wire_tag() {
        assert_eq!(AuditAction::Create.to_string(), "CREATE");
        assert_eq!(AuditAction::Import.to_string(), "IMPORT");
        assert_eq!(serde_json::to_string(&AuditAction::View).unwrap(), "\"VIEW\"");
    }

    #[test]
    fn test_entry_json_round_trip_keeps_absent_fields_absent() {
        let entry = AuditEntry::builder(AuditAction::Export, "REPORT")
            .details("Operation 'exportReports' executed")
            .build();
        let json = serde_json::to_value(&entry).unwrap();

        assert!(json.get("entityId").is_none());
        assert!(json.get("actorId").is_none());
        assert_eq!(json["action"], "EXPORT");

        let back: AuditEntry = serde_json::from_value(json).unwrap();
        assert_eq!(back, entry);
    }
}
