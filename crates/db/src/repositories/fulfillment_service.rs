//! Fulfillment service repository.

use chrono::Utc;
use orderdesk_core::audit::AuditEntry;
use orderdesk_core::values::validate_tracking_template;
use orderdesk_core::{DomainError, DomainResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, ModelTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use super::Actor;
use super::audit::AuditRepository;
use super::customer::clean;
use crate::entities::fulfillment_services;
use crate::error::map_db_err;

/// Input for creating a fulfillment service.
#[derive(Debug, Clone)]
pub struct CreateFulfillmentServiceInput {
    /// Unique name within the account.
    pub name: String,
    /// Default carrier of shipments.
    pub carrier: Option<String>,
    /// URL template containing `{tracking_number}`.
    pub tracking_url_template: Option<String>,
    /// Whether new fulfillments may use the service.
    pub active: bool,
}

/// Changes to a fulfillment service. `Some(None)` clears a field.
#[derive(Debug, Clone, Default)]
pub struct UpdateFulfillmentServiceInput {
    /// Unique name within the account.
    pub name: Option<String>,
    /// Default carrier.
    pub carrier: Option<Option<String>>,
    /// URL template.
    pub tracking_url_template: Option<Option<String>>,
    /// Active flag.
    pub active: Option<bool>,
}

/// Fulfillment service repository.
#[derive(Debug, Clone)]
pub struct FulfillmentServiceRepository {
    db: DatabaseConnection,
}

impl FulfillmentServiceRepository {
    /// Creates a new fulfillment service repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists services of an account by name, optionally only active ones.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn list(
        &self,
        account_id: Uuid,
        active_only: bool,
    ) -> DomainResult<Vec<fulfillment_services::Model>> {
        let mut select = fulfillment_services::Entity::find()
            .filter(fulfillment_services::Column::AccountId.eq(account_id));
        if active_only {
            select = select.filter(fulfillment_services::Column::Active.eq(true));
        }
        select
            .order_by_asc(fulfillment_services::Column::Name)
            .all(&self.db)
            .await
            .map_err(map_db_err)
    }

    /// Finds a service of an account.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the service does not belong to the account.
    pub async fn find(
        &self,
        account_id: Uuid,
        id: Uuid,
    ) -> DomainResult<fulfillment_services::Model> {
        fulfillment_services::Entity::find_by_id(id)
            .filter(fulfillment_services::Column::AccountId.eq(account_id))
            .one(&self.db)
            .await
            .map_err(map_db_err)?
            .ok_or(DomainError::not_found("fulfillment service", id))
    }

    /// Creates a service.
    ///
    /// # Errors
    ///
    /// Returns `Validation` for a blank name or bad template, `Conflict` for
    /// a duplicate name.
    pub async fn create(
        &self,
        actor: Actor,
        input: CreateFulfillmentServiceInput,
    ) -> DomainResult<fulfillment_services::Model> {
        let name = required_name(&input.name)?;
        let template = checked_template(input.tracking_url_template)?;

        let txn = self.db.begin().await.map_err(map_db_err)?;
        let now = Utc::now().into();
        let service = fulfillment_services::ActiveModel {
            id: Set(Uuid::now_v7()),
            account_id: Set(actor.account_id),
            name: Set(name),
            carrier: Set(clean(input.carrier)),
            tracking_url_template: Set(template),
            active: Set(input.active),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await
        .map_err(map_db_err)?;

        AuditRepository::record(&txn, actor, &service, vec![AuditEntry::created(&service)])
            .await?;
        txn.commit().await.map_err(map_db_err)?;
        Ok(service)
    }

    /// Updates a service.
    ///
    /// # Errors
    ///
    /// Returns `NotFound`, `Validation` or `Conflict`.
    pub async fn update(
        &self,
        actor: Actor,
        id: Uuid,
        input: UpdateFulfillmentServiceInput,
    ) -> DomainResult<fulfillment_services::Model> {
        let txn = self.db.begin().await.map_err(map_db_err)?;
        let before = find_locked(&txn, actor.account_id, id).await?;

        let mut active: fulfillment_services::ActiveModel = before.clone().into();
        if let Some(name) = input.name {
            active.name = Set(required_name(&name)?);
        }
        if let Some(carrier) = input.carrier {
            active.carrier = Set(clean(carrier));
        }
        if let Some(template) = input.tracking_url_template {
            active.tracking_url_template = Set(checked_template(template)?);
        }
        if let Some(flag) = input.active {
            active.active = Set(flag);
        }

        if !active.is_changed() {
            return Ok(before);
        }

        let after = active.update(&txn).await.map_err(map_db_err)?;
        AuditRepository::record(&txn, actor, &after, AuditEntry::updated(&before, &after)).await?;
        txn.commit().await.map_err(map_db_err)?;
        Ok(after)
    }

    /// Deletes a service. Its fulfillments keep existing without a service.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the service does not belong to the account.
    pub async fn delete(&self, actor: Actor, id: Uuid) -> DomainResult<()> {
        let txn = self.db.begin().await.map_err(map_db_err)?;
        let service = find_locked(&txn, actor.account_id, id).await?;

        AuditRepository::record(&txn, actor, &service, vec![AuditEntry::deleted(&service)])
            .await?;
        service.delete(&txn).await.map_err(map_db_err)?;
        txn.commit().await.map_err(map_db_err)?;
        Ok(())
    }
}

async fn find_locked<C>(
    conn: &C,
    account_id: Uuid,
    id: Uuid,
) -> DomainResult<fulfillment_services::Model>
where
    C: ConnectionTrait,
{
    fulfillment_services::Entity::find_by_id(id)
        .filter(fulfillment_services::Column::AccountId.eq(account_id))
        .lock_exclusive()
        .one(conn)
        .await
        .map_err(map_db_err)?
        .ok_or(DomainError::not_found("fulfillment service", id))
}

fn required_name(name: &str) -> DomainResult<String> {
    let name = name.trim();
    if name.is_empty() {
        Err(DomainError::Validation(
            "service name must not be blank".to_string(),
        ))
    } else {
        Ok(name.to_string())
    }
}

fn checked_template(template: Option<String>) -> DomainResult<Option<String>> {
    let template = clean(template);
    if let Some(template) = &template {
        validate_tracking_template(template)?;
    }
    Ok(template)
}
