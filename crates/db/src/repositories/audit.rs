//! Audit trail writer and reader.

use chrono::Utc;
use orderdesk_core::DomainResult;
use orderdesk_core::audit::{AuditEntry, Trackable};
use orderdesk_shared::types::PageResponse;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set,
};
use uuid::Uuid;

use super::Actor;
use crate::entities::{account_events, resources, sea_orm_active_enums::EventAction};
use crate::error::map_db_err;
use crate::queries::{EventQuery, fetch_page};

/// An audit event together with the resource it names.
#[derive(Debug, Clone)]
pub struct EventWithResource {
    /// The event row.
    pub event: account_events::Model,
    /// The audited resource, if still resolvable.
    pub resource: Option<resources::Model>,
}

/// Repository for the append-only audit trail.
#[derive(Debug, Clone)]
pub struct AuditRepository {
    db: DatabaseConnection,
}

impl AuditRepository {
    /// Creates a new audit repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Writes audit entries for a resource.
    ///
    /// Finds or creates the `resources` row, then inserts one event per
    /// entry. Meant to run inside the caller's transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if any insert fails.
    pub async fn record<C, T>(
        conn: &C,
        actor: Actor,
        resource: &T,
        entries: Vec<AuditEntry>,
    ) -> DomainResult<Vec<account_events::Model>>
    where
        C: ConnectionTrait,
        T: Trackable + Sync,
    {
        if entries.is_empty() {
            return Ok(Vec::new());
        }

        let resource_row = Self::find_or_create_resource(conn, actor.account_id, resource).await?;
        let now = Utc::now().into();

        let mut events = Vec::with_capacity(entries.len());
        for entry in entries {
            let field = entry.field().map(str::to_string);
            let (old_value, new_value) = entry
                .change
                .map(|c| (c.old_value, c.new_value))
                .unwrap_or_default();

            let event = account_events::ActiveModel {
                id: Set(Uuid::now_v7()),
                account_id: Set(actor.account_id),
                resource_ref: Set(resource_row.id),
                author_id: Set(actor.author_id),
                action: Set(EventAction::from(entry.action)),
                field: Set(field),
                old_value: Set(old_value),
                new_value: Set(new_value),
                message: Set(entry.message),
                created_at: Set(now),
            }
            .insert(conn)
            .await
            .map_err(map_db_err)?;
            events.push(event);
        }

        tracing::debug!(
            resource_type = T::RESOURCE_TYPE,
            resource_id = %resource.resource_id(),
            count = events.len(),
            "recorded audit events"
        );

        Ok(events)
    }

    /// Lists audit events of an account.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn list(
        &self,
        account_id: Uuid,
        query: &EventQuery,
    ) -> DomainResult<PageResponse<EventWithResource>> {
        let page = fetch_page(&self.db, query.select(account_id), &query.page)
            .await
            .map_err(map_db_err)?;
        Ok(page.map(|(event, resource)| EventWithResource { event, resource }))
    }

    /// Events of one audited record, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn history(
        &self,
        account_id: Uuid,
        resource_type: &str,
        resource_id: Uuid,
    ) -> DomainResult<Vec<account_events::Model>> {
        let Some(resource) = resources::Entity::find()
            .filter(resources::Column::AccountId.eq(account_id))
            .filter(resources::Column::ResourceType.eq(resource_type))
            .filter(resources::Column::ResourceId.eq(resource_id))
            .one(&self.db)
            .await
            .map_err(map_db_err)?
        else {
            return Ok(Vec::new());
        };

        account_events::Entity::find()
            .filter(account_events::Column::ResourceRef.eq(resource.id))
            .order_by_asc(account_events::Column::CreatedAt)
            .order_by_asc(account_events::Column::Id)
            .all(&self.db)
            .await
            .map_err(map_db_err)
    }

    async fn find_or_create_resource<C, T>(
        conn: &C,
        account_id: Uuid,
        resource: &T,
    ) -> DomainResult<resources::Model>
    where
        C: ConnectionTrait,
        T: Trackable + Sync,
    {
        let label = resource.resource_label();
        let existing = resources::Entity::find()
            .filter(resources::Column::ResourceType.eq(T::RESOURCE_TYPE))
            .filter(resources::Column::ResourceId.eq(resource.resource_id()))
            .one(conn)
            .await
            .map_err(map_db_err)?;

        match existing {
            Some(row) if row.label == label => Ok(row),
            Some(row) => {
                let mut active: resources::ActiveModel = row.into();
                active.label = Set(label);
                active.update(conn).await.map_err(map_db_err)
            }
            None => resources::ActiveModel {
                id: Set(Uuid::now_v7()),
                account_id: Set(account_id),
                resource_type: Set(T::RESOURCE_TYPE.to_string()),
                resource_id: Set(resource.resource_id()),
                label: Set(label),
                created_at: Set(Utc::now().into()),
            }
            .insert(conn)
            .await
            .map_err(map_db_err),
        }
    }
}
