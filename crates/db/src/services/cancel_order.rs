//! Order cancellation.

use async_trait::async_trait;
use orderdesk_core::audit::AuditEntry;
use orderdesk_core::fulfillment::FulfillmentLifecycle;
use orderdesk_core::invoice::InvoiceLifecycle;
use orderdesk_core::order::OrderLifecycle;
use orderdesk_core::DomainResult;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use super::Service;
use crate::entities::{fulfillments, invoices, orders, sea_orm_active_enums::InvoiceStatus};
use crate::error::map_db_err;
use crate::repositories::fulfillment::{apply_action as apply_fulfillment, statuses_of_order};
use crate::repositories::invoice::apply_action as apply_invoice;
use crate::repositories::order::find_locked as find_order_locked;
use crate::repositories::{Actor, AuditRepository};

/// Everything touched by a cancellation.
#[derive(Debug, Clone)]
pub struct CancelledOrder {
    /// The cancelled order.
    pub order: orders::Model,
    /// Its invoice, if one was cancelled along.
    pub invoice: Option<invoices::Model>,
    /// Fulfillments cancelled along.
    pub fulfillments: Vec<fulfillments::Model>,
}

/// Cancels an order together with its open invoice and open fulfillments.
///
/// Refused when the invoice is paid or a fulfillment has shipped.
#[derive(Debug, Clone)]
pub struct CancelOrder {
    db: DatabaseConnection,
    actor: Actor,
    order_id: Uuid,
    reason: Option<String>,
}

impl CancelOrder {
    /// Builds the command.
    #[must_use]
    pub const fn new(
        db: DatabaseConnection,
        actor: Actor,
        order_id: Uuid,
        reason: Option<String>,
    ) -> Self {
        Self {
            db,
            actor,
            order_id,
            reason,
        }
    }
}

#[async_trait]
impl Service for CancelOrder {
    type Output = CancelledOrder;

    async fn call(self) -> DomainResult<CancelledOrder> {
        let txn = self.db.begin().await.map_err(map_db_err)?;
        let order = find_order_locked(&txn, self.actor.account_id, self.order_id).await?;

        let invoice = invoices::Entity::find()
            .filter(invoices::Column::OrderId.eq(order.id))
            .filter(invoices::Column::Status.ne(InvoiceStatus::Cancelled))
            .order_by_desc(invoices::Column::CreatedAt)
            .lock_exclusive()
            .one(&txn)
            .await
            .map_err(map_db_err)?;
        let shipments = statuses_of_order(&txn, order.id).await?;
        let shipment_statuses: Vec<_> = shipments.iter().map(|(_, status)| *status).collect();

        let plan = OrderLifecycle::cancel(
            order.status.into(),
            invoice.as_ref().map(|i| i.status.into()),
            &shipment_statuses,
            self.reason,
        )?;

        let cancelled_invoice = match invoice {
            Some(invoice) if plan.cancel_invoice => {
                let action = InvoiceLifecycle::cancel(invoice.status.into())?;
                Some(apply_invoice(&txn, self.actor, invoice, &action).await?)
            }
            _ => None,
        };

        let mut cancelled_fulfillments = Vec::new();
        if plan.cancel_open_fulfillments {
            for (fulfillment, status) in shipments {
                if !status.is_open() {
                    continue;
                }
                let action = FulfillmentLifecycle::cancel(status)?;
                cancelled_fulfillments.push(
                    apply_fulfillment(&txn, self.actor, fulfillment, &action, None).await?,
                );
            }
        }

        let mut active: orders::ActiveModel = order.clone().into();
        active.status = Set(plan.new_status.into());
        active.cancelled_at = Set(Some(plan.cancelled_at.into()));
        active.cancellation_reason = Set(plan.reason);
        let cancelled = active.update(&txn).await.map_err(map_db_err)?;

        AuditRepository::record(
            &txn,
            self.actor,
            &cancelled,
            AuditEntry::updated(&order, &cancelled),
        )
        .await?;

        txn.commit().await.map_err(map_db_err)?;

        tracing::info!(
            order_id = %cancelled.id,
            invoice_cancelled = cancelled_invoice.is_some(),
            fulfillments_cancelled = cancelled_fulfillments.len(),
            "order cancelled"
        );

        Ok(CancelledOrder {
            order: cancelled,
            invoice: cancelled_invoice,
            fulfillments: cancelled_fulfillments,
        })
    }
}
