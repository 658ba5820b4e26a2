//! Fulfillment repository: shipments of validated orders.

use chrono::Utc;
use orderdesk_core::audit::AuditEntry;
use orderdesk_core::fulfillment::{FulfillmentAction, FulfillmentLifecycle, FulfillmentStatus};
use orderdesk_core::values::TrackingInfo;
use orderdesk_core::{DomainError, DomainResult};
use orderdesk_shared::types::PageResponse;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use super::Actor;
use super::audit::AuditRepository;
use super::customer::clean;
use super::order::find_locked as find_order_locked;
use crate::entities::{fulfillment_services, fulfillments, sea_orm_active_enums};
use crate::error::map_db_err;
use crate::queries::{FulfillmentQuery, fetch_page};

/// Input for creating a fulfillment.
#[derive(Debug, Clone, Default)]
pub struct CreateFulfillmentInput {
    /// Service handling the shipment.
    pub fulfillment_service_id: Option<Uuid>,
    /// Carrier, defaults to the service carrier.
    pub carrier: Option<String>,
    /// Tracking number, if already known.
    pub tracking_number: Option<String>,
}

/// Tracking details given when shipping.
#[derive(Debug, Clone, Default)]
pub struct ShipmentInput {
    /// Carrier, keeps the current one when absent.
    pub carrier: Option<String>,
    /// Tracking number, keeps the current one when absent.
    pub tracking_number: Option<String>,
    /// Explicit tracking URL, overrides the service template.
    pub tracking_url: Option<String>,
}

/// Fulfillment repository.
#[derive(Debug, Clone)]
pub struct FulfillmentRepository {
    db: DatabaseConnection,
}

impl FulfillmentRepository {
    /// Creates a new fulfillment repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists fulfillments of an account.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn list(
        &self,
        account_id: Uuid,
        query: &FulfillmentQuery,
    ) -> DomainResult<PageResponse<fulfillments::Model>> {
        fetch_page(&self.db, query.select(account_id), &query.page)
            .await
            .map_err(map_db_err)
    }

    /// Finds a fulfillment of an account.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the fulfillment does not belong to the account.
    pub async fn find(&self, account_id: Uuid, id: Uuid) -> DomainResult<fulfillments::Model> {
        fulfillments::Entity::find_by_id(id)
            .filter(fulfillments::Column::AccountId.eq(account_id))
            .one(&self.db)
            .await
            .map_err(map_db_err)?
            .ok_or(DomainError::not_found("fulfillment", id))
    }

    /// Creates a pending fulfillment for a validated or invoiced order.
    ///
    /// # Errors
    ///
    /// Returns `OrderNotFulfillable`, `ServiceInactive`, `NotFound` or
    /// `Validation`.
    pub async fn create(
        &self,
        actor: Actor,
        order_id: Uuid,
        input: CreateFulfillmentInput,
    ) -> DomainResult<fulfillments::Model> {
        let txn = self.db.begin().await.map_err(map_db_err)?;
        let order = find_order_locked(&txn, actor.account_id, order_id).await?;
        FulfillmentLifecycle::can_fulfill(order.status.into())?;

        let service = match input.fulfillment_service_id {
            Some(service_id) => Some(find_active_service(&txn, actor.account_id, service_id).await?),
            None => None,
        };

        let carrier = clean(input.carrier).or_else(|| service.as_ref().and_then(|s| s.carrier.clone()));
        let tracking = match clean(input.tracking_number) {
            Some(number) => Some(
                TrackingInfo::new(carrier.as_deref(), &number)?.with_template(
                    service
                        .as_ref()
                        .and_then(|s| s.tracking_url_template.as_deref()),
                ),
            ),
            None => None,
        };

        let now = Utc::now().into();
        let fulfillment = fulfillments::ActiveModel {
            id: Set(Uuid::now_v7()),
            account_id: Set(actor.account_id),
            order_id: Set(order.id),
            fulfillment_service_id: Set(service.as_ref().map(|s| s.id)),
            status: Set(sea_orm_active_enums::FulfillmentStatus::Pending),
            carrier: Set(carrier),
            tracking_number: Set(tracking.as_ref().map(|t| t.number.clone())),
            tracking_url: Set(tracking.and_then(|t| t.url)),
            shipped_at: Set(None),
            delivered_at: Set(None),
            cancelled_at: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await
        .map_err(map_db_err)?;

        AuditRepository::record(
            &txn,
            actor,
            &fulfillment,
            vec![AuditEntry::created(&fulfillment)],
        )
        .await?;
        txn.commit().await.map_err(map_db_err)?;

        tracing::info!(fulfillment_id = %fulfillment.id, order_id = %order_id, "fulfillment created");
        Ok(fulfillment)
    }

    /// Starts processing a pending fulfillment.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` unless the fulfillment is pending.
    pub async fn process(&self, actor: Actor, id: Uuid) -> DomainResult<fulfillments::Model> {
        let txn = self.db.begin().await.map_err(map_db_err)?;
        let before = find_locked(&txn, actor.account_id, id).await?;
        let action = FulfillmentLifecycle::process(before.status.into())?;
        let after = apply_action(&txn, actor, before, &action, None).await?;
        txn.commit().await.map_err(map_db_err)?;
        Ok(after)
    }

    /// Ships a pending or processing fulfillment.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` once shipped or cancelled, `Validation`
    /// for a blank tracking number.
    pub async fn ship(
        &self,
        actor: Actor,
        id: Uuid,
        input: ShipmentInput,
    ) -> DomainResult<fulfillments::Model> {
        let txn = self.db.begin().await.map_err(map_db_err)?;
        let before = find_locked(&txn, actor.account_id, id).await?;
        let action = FulfillmentLifecycle::ship(before.status.into())?;

        let carrier = clean(input.carrier).or_else(|| before.carrier.clone());
        let number = clean(input.tracking_number);
        // A stored URL only stays valid for the number it was built from.
        let stored_url = match &number {
            Some(n) if before.tracking_number.as_ref() != Some(n) => None,
            _ => before.tracking_url.clone(),
        };
        let tracking = match number.or_else(|| before.tracking_number.clone()) {
            Some(number) => {
                let template = match before.fulfillment_service_id {
                    Some(service_id) => fulfillment_services::Entity::find_by_id(service_id)
                        .one(&txn)
                        .await
                        .map_err(map_db_err)?
                        .and_then(|s| s.tracking_url_template),
                    None => None,
                };
                Some(
                    TrackingInfo::new(carrier.as_deref(), &number)?
                        .with_template(template.as_deref())
                        .with_url(clean(input.tracking_url).or(stored_url)),
                )
            }
            None => None,
        };

        let after = apply_action(&txn, actor, before, &action, Some((carrier, tracking))).await?;
        txn.commit().await.map_err(map_db_err)?;

        tracing::info!(fulfillment_id = %id, "fulfillment shipped");
        Ok(after)
    }

    /// Marks a shipped fulfillment as delivered.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` unless the fulfillment shipped.
    pub async fn deliver(&self, actor: Actor, id: Uuid) -> DomainResult<fulfillments::Model> {
        let txn = self.db.begin().await.map_err(map_db_err)?;
        let before = find_locked(&txn, actor.account_id, id).await?;
        let action = FulfillmentLifecycle::deliver(before.status.into())?;
        let after = apply_action(&txn, actor, before, &action, None).await?;
        txn.commit().await.map_err(map_db_err)?;
        Ok(after)
    }

    /// Cancels a fulfillment that has not shipped.
    ///
    /// # Errors
    ///
    /// Returns `AlreadyCancelled` or `InvalidTransition`.
    pub async fn cancel(&self, actor: Actor, id: Uuid) -> DomainResult<fulfillments::Model> {
        let txn = self.db.begin().await.map_err(map_db_err)?;
        let before = find_locked(&txn, actor.account_id, id).await?;
        let action = FulfillmentLifecycle::cancel(before.status.into())?;
        let after = apply_action(&txn, actor, before, &action, None).await?;
        txn.commit().await.map_err(map_db_err)?;
        Ok(after)
    }
}

/// Statuses of all fulfillments of an order.
pub(crate) async fn statuses_of_order<C>(
    conn: &C,
    order_id: Uuid,
) -> DomainResult<Vec<(fulfillments::Model, FulfillmentStatus)>>
where
    C: ConnectionTrait,
{
    let rows = fulfillments::Entity::find()
        .filter(fulfillments::Column::OrderId.eq(order_id))
        .lock_exclusive()
        .all(conn)
        .await
        .map_err(map_db_err)?;
    Ok(rows
        .into_iter()
        .map(|f| {
            let status = FulfillmentStatus::from(f.status);
            (f, status)
        })
        .collect())
}

async fn find_locked<C>(conn: &C, account_id: Uuid, id: Uuid) -> DomainResult<fulfillments::Model>
where
    C: ConnectionTrait,
{
    fulfillments::Entity::find_by_id(id)
        .filter(fulfillments::Column::AccountId.eq(account_id))
        .lock_exclusive()
        .one(conn)
        .await
        .map_err(map_db_err)?
        .ok_or(DomainError::not_found("fulfillment", id))
}

async fn find_active_service<C>(
    conn: &C,
    account_id: Uuid,
    id: Uuid,
) -> DomainResult<fulfillment_services::Model>
where
    C: ConnectionTrait,
{
    let service = fulfillment_services::Entity::find_by_id(id)
        .filter(fulfillment_services::Column::AccountId.eq(account_id))
        .one(conn)
        .await
        .map_err(map_db_err)?
        .ok_or(DomainError::not_found("fulfillment service", id))?;
    if !service.active {
        return Err(DomainError::ServiceInactive);
    }
    Ok(service)
}

/// Persists a fulfillment transition with its audit events.
///
/// `shipment` carries carrier and tracking details for `Ship`.
pub(crate) async fn apply_action<C>(
    conn: &C,
    actor: Actor,
    before: fulfillments::Model,
    action: &FulfillmentAction,
    shipment: Option<(Option<String>, Option<TrackingInfo>)>,
) -> DomainResult<fulfillments::Model>
where
    C: ConnectionTrait,
{
    let mut active: fulfillments::ActiveModel = before.clone().into();
    active.status = Set(action.new_status().into());
    match action {
        FulfillmentAction::Process { .. } => {}
        FulfillmentAction::Ship { shipped_at, .. } => {
            active.shipped_at = Set(Some((*shipped_at).into()));
        }
        FulfillmentAction::Deliver { delivered_at, .. } => {
            active.delivered_at = Set(Some((*delivered_at).into()));
        }
        FulfillmentAction::Cancel { cancelled_at, .. } => {
            active.cancelled_at = Set(Some((*cancelled_at).into()));
        }
    }
    if let Some((carrier, tracking)) = shipment {
        active.carrier = Set(carrier);
        if let Some(tracking) = tracking {
            active.tracking_number = Set(Some(tracking.number));
            active.tracking_url = Set(tracking.url);
        }
    }

    let after = active.update(conn).await.map_err(map_db_err)?;
    AuditRepository::record(conn, actor, &after, AuditEntry::updated(&before, &after)).await?;
    Ok(after)
}
