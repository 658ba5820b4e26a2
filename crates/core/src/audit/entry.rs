//! Audit entries produced from record lifecycle events.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::audit::trackable::{FieldChange, Trackable, changes_between};

/// Kind of audited event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuditAction {
    /// Record inserted.
    Created,
    /// Tracked field changed.
    Updated,
    /// Record removed.
    Deleted,
}

impl AuditAction {
    /// Returns the string representation of the action.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Updated => "updated",
            Self::Deleted => "deleted",
        }
    }

    /// Parses an action from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "created" => Some(Self::Created),
            "updated" => Some(Self::Updated),
            "deleted" => Some(Self::Deleted),
            _ => None,
        }
    }
}

impl fmt::Display for AuditAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row to append to the audit trail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditEntry {
    /// What happened.
    pub action: AuditAction,
    /// Field change for `Updated` entries.
    pub change: Option<FieldChange>,
    /// Human readable summary.
    pub message: String,
}

impl AuditEntry {
    /// Entry for a newly created record.
    #[must_use]
    pub fn created<T: Trackable>(resource: &T) -> Self {
        Self {
            action: AuditAction::Created,
            change: None,
            message: format!("{} {} created", T::RESOURCE_TYPE, resource.resource_label()),
        }
    }

    /// One entry per tracked field that differs between the snapshots.
    #[must_use]
    pub fn updated<T: Trackable>(before: &T, after: &T) -> Vec<Self> {
        let label = after.resource_label();
        changes_between(before, after)
            .into_iter()
            .map(|change| Self {
                action: AuditAction::Updated,
                message: format!("{} {label}: {}", T::RESOURCE_TYPE, change.describe()),
                change: Some(change),
            })
            .collect()
    }

    /// Entry for a removed record.
    #[must_use]
    pub fn deleted<T: Trackable>(resource: &T) -> Self {
        Self {
            action: AuditAction::Deleted,
            change: None,
            message: format!("{} {} deleted", T::RESOURCE_TYPE, resource.resource_label()),
        }
    }

    /// Name of the changed field, if any.
    #[must_use]
    pub fn field(&self) -> Option<&'static str> {
        self.change.as_ref().map(|c| c.field)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::trackable::fixtures::Parcel;

    #[test]
    fn test_action_roundtrip() {
        for action in [AuditAction::Created, AuditAction::Updated, AuditAction::Deleted] {
            assert_eq!(AuditAction::parse(action.as_str()), Some(action));
        }
        assert_eq!(AuditAction::parse("viewed"), None);
    }

    #[test]
    fn test_created_and_deleted_messages() {
        let parcel = Parcel::new();
        let created = AuditEntry::created(&parcel);
        assert_eq!(created.action, AuditAction::Created);
        assert_eq!(created.message, "Parcel Parcel 3 created");
        assert_eq!(created.field(), None);

        let deleted = AuditEntry::deleted(&parcel);
        assert_eq!(deleted.action, AuditAction::Deleted);
        assert!(deleted.message.ends_with("deleted"));
    }

    #[test]
    fn test_updated_emits_one_entry_per_change() {
        let before = Parcel::new();
        let mut after = before.clone();
        after.status = "shipped".to_string();

        let entries = AuditEntry::updated(&before, &after);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].field(), Some("status"));
        assert_eq!(
            entries[0].message,
            "Parcel Parcel 3: status changed from pending to shipped"
        );

        assert!(AuditEntry::updated(&after, &after).is_empty());
    }
}
