//! Field-level diffing of tracked records.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A record whose tracked fields are written to the audit trail.
pub trait Trackable {
    /// Resource type stored on audit rows (e.g. "Order").
    const RESOURCE_TYPE: &'static str;

    /// Primary key of the record.
    fn resource_id(&self) -> Uuid;

    /// Human label of the record (order reference, invoice number, ...).
    fn resource_label(&self) -> String;

    /// Current value of every tracked field, in a stable order.
    fn tracked_values(&self) -> Vec<(&'static str, Option<String>)>;
}

/// One tracked field that changed value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldChange {
    /// Field name.
    pub field: &'static str,
    /// Value before the change.
    pub old_value: Option<String>,
    /// Value after the change.
    pub new_value: Option<String>,
}

impl FieldChange {
    /// "status changed from pending to validated".
    #[must_use]
    pub fn describe(&self) -> String {
        match (&self.old_value, &self.new_value) {
            (Some(old), Some(new)) => format!("{} changed from {old} to {new}", self.field),
            (None, Some(new)) => format!("{} set to {new}", self.field),
            (Some(old), None) => format!("{} cleared (was {old})", self.field),
            (None, None) => format!("{} unchanged", self.field),
        }
    }
}

/// Compares two snapshots of the same record.
///
/// Returns one change per tracked field whose value differs.
#[must_use]
pub fn changes_between<T: Trackable>(before: &T, after: &T) -> Vec<FieldChange> {
    let old_values = before.tracked_values();
    after
        .tracked_values()
        .into_iter()
        .filter_map(|(field, new_value)| {
            let old_value = old_values
                .iter()
                .find(|(name, _)| *name == field)
                .and_then(|(_, value)| value.clone());
            (old_value != new_value).then_some(FieldChange {
                field,
                old_value,
                new_value,
            })
        })
        .collect()
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    /// Minimal tracked record for tests.
    #[derive(Debug, Clone)]
    pub struct Parcel {
        pub id: Uuid,
        pub status: String,
        pub note: Option<String>,
        pub weight: u32,
    }

    impl Parcel {
        pub fn new() -> Self {
            Self {
                id: Uuid::nil(),
                status: "pending".to_string(),
                note: None,
                weight: 3,
            }
        }
    }

    impl Trackable for Parcel {
        const RESOURCE_TYPE: &'static str = "Parcel";

        fn resource_id(&self) -> Uuid {
            self.id
        }

        fn resource_label(&self) -> String {
            format!("Parcel {}", self.weight)
        }

        fn tracked_values(&self) -> Vec<(&'static str, Option<String>)> {
            vec![
                ("status", Some(self.status.clone())),
                ("note", self.note.clone()),
            ]
        }
    }
}
