use orderdesk_db::entities::sea_orm_active_enums::EventAction;
use orderdesk_db::repositories::EventWithResource;
use serde::Serialize;
use uuid::Uuid;

use super::timestamp;

/// An audit event with the resource it describes.
#[derive(Debug, Serialize)]
pub struct EventResponse {
    /// Event ID.
    pub id: Uuid,
    /// `created`, `updated` or `deleted`.
    pub action: &'static str,
    /// Resource type, e.g. `Order`.
    pub resource_type: Option<String>,
    /// Resource ID.
    pub resource_id: Option<Uuid>,
    /// Last known label of the resource.
    pub resource_label: Option<String>,
    /// User who made the change.
    pub author_id: Option<Uuid>,
    /// Changed field.
    pub field: Option<String>,
    /// Value before the change.
    pub old_value: Option<String>,
    /// Value after the change.
    pub new_value: Option<String>,
    /// Human readable summary.
    pub message: String,
    /// Created at timestamp.
    pub created_at: String,
}

impl From<EventWithResource> for EventResponse {
    fn from(row: EventWithResource) -> Self {
        let event = row.event;
        let action = match event.action {
            EventAction::Created => "created",
            EventAction::Updated => "updated",
            EventAction::Deleted => "deleted",
        };
        Self {
            id: event.id,
            action,
            resource_type: row.resource.as_ref().map(|r| r.resource_type.clone()),
            resource_id: row.resource.as_ref().map(|r| r.resource_id),
            resource_label: row.resource.map(|r| r.label),
            author_id: event.author_id,
            created_at: timestamp(&event.created_at),
            field: event.field,
            old_value: event.old_value,
            new_value: event.new_value,
            message: event.message,
        }
    }
}
