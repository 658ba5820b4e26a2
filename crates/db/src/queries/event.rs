//! Audit event listing query.

use orderdesk_core::audit::AuditAction;
use orderdesk_shared::types::PageRequest;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder, SelectTwo};
use uuid::Uuid;

use super::non_blank;
use crate::entities::{account_events, resources, sea_orm_active_enums::EventAction};

/// Filters for listing audit events.
#[derive(Debug, Clone, Default)]
pub struct EventQuery {
    /// Resource type, e.g. "Order".
    pub resource_type: Option<String>,
    /// Id of the audited record.
    pub resource_id: Option<Uuid>,
    /// Only this kind of event.
    pub action: Option<AuditAction>,
    /// Only events authored by this user.
    pub author_id: Option<Uuid>,
    /// Requested page.
    pub page: PageRequest,
}

impl EventQuery {
    /// Builds the select joined with the resource, newest first.
    #[must_use]
    pub fn select(
        &self,
        account_id: Uuid,
    ) -> SelectTwo<account_events::Entity, resources::Entity> {
        let mut select = account_events::Entity::find()
            .find_also_related(resources::Entity)
            .filter(account_events::Column::AccountId.eq(account_id));

        if let Some(resource_type) = non_blank(self.resource_type.as_ref()) {
            select = select.filter(resources::Column::ResourceType.eq(resource_type));
        }
        if let Some(resource_id) = self.resource_id {
            select = select.filter(resources::Column::ResourceId.eq(resource_id));
        }
        if let Some(action) = self.action {
            select = select.filter(account_events::Column::Action.eq(EventAction::from(action)));
        }
        if let Some(author_id) = self.author_id {
            select = select.filter(account_events::Column::AuthorId.eq(author_id));
        }

        select
            .order_by_desc(account_events::Column::CreatedAt)
            .order_by_desc(account_events::Column::Id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DbBackend, QueryTrait};

    #[test]
    fn test_resource_filters_use_join() {
        let query = EventQuery {
            resource_type: Some("Order".to_string()),
            action: Some(AuditAction::Updated),
            ..Default::default()
        };
        let sql = query
            .select(Uuid::nil())
            .build(DbBackend::Postgres)
            .to_string();
        assert!(sql.contains(r#"LEFT JOIN "resources""#));
        assert!(sql.contains(r#""resources"."resource_type" = 'Order'"#));
        assert!(sql.contains("updated"));
    }
}
