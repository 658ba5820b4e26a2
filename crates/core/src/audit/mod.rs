//! Audit trail of tracked field changes.
//!
//! Records implement [`Trackable`]; the persistence layer snapshots a record
//! before and after a change and stores the resulting [`AuditEntry`] rows.

pub mod entry;
pub mod trackable;

pub use entry::{AuditAction, AuditEntry};
pub use trackable::{FieldChange, Trackable, changes_between};
