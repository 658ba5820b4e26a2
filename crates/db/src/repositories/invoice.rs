//! Invoice repository: listing and the send / pay / cancel transitions.
//!
//! Invoices are created by the `CreateInvoice` service object.

use chrono::NaiveDate;
use orderdesk_core::audit::AuditEntry;
use orderdesk_core::invoice::{InvoiceAction, InvoiceLifecycle, InvoiceStatus};
use orderdesk_core::order::{OrderLifecycle, OrderStatus};
use orderdesk_core::{DomainError, DomainResult};
use orderdesk_shared::types::PageResponse;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use super::Actor;
use super::audit::AuditRepository;
use super::order::find_locked as find_order_locked;
use crate::entities::{invoices, orders};
use crate::error::map_db_err;
use crate::queries::{InvoiceQuery, fetch_page};

/// Invoice repository.
#[derive(Debug, Clone)]
pub struct InvoiceRepository {
    db: DatabaseConnection,
}

impl InvoiceRepository {
    /// Creates a new invoice repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists invoices of an account.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn list(
        &self,
        account_id: Uuid,
        query: &InvoiceQuery,
    ) -> DomainResult<PageResponse<invoices::Model>> {
        fetch_page(&self.db, query.select(account_id), &query.page)
            .await
            .map_err(map_db_err)
    }

    /// Finds an invoice of an account.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the invoice does not belong to the account.
    pub async fn find(&self, account_id: Uuid, id: Uuid) -> DomainResult<invoices::Model> {
        invoices::Entity::find_by_id(id)
            .filter(invoices::Column::AccountId.eq(account_id))
            .one(&self.db)
            .await
            .map_err(map_db_err)?
            .ok_or(DomainError::not_found("invoice", id))
    }

    /// Marks a draft invoice as sent.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` unless the invoice is a draft.
    pub async fn send(&self, actor: Actor, id: Uuid) -> DomainResult<invoices::Model> {
        self.transition(actor, id, InvoiceLifecycle::send).await
    }

    /// Records the payment of a sent invoice.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` unless the invoice was sent.
    pub async fn mark_as_paid(&self, actor: Actor, id: Uuid) -> DomainResult<invoices::Model> {
        self.transition(actor, id, InvoiceLifecycle::mark_as_paid)
            .await
    }

    /// Cancels a draft or sent invoice and returns its order to validated.
    ///
    /// # Errors
    ///
    /// Returns `InvoiceAlreadyPaid` or `AlreadyCancelled`.
    pub async fn cancel(&self, actor: Actor, id: Uuid) -> DomainResult<invoices::Model> {
        self.transition(actor, id, InvoiceLifecycle::cancel).await
    }

    /// Moves the due date of an open invoice.
    ///
    /// # Errors
    ///
    /// Returns `Validation` if the date precedes the issue date or the
    /// invoice is no longer open.
    pub async fn reschedule(
        &self,
        actor: Actor,
        id: Uuid,
        due_on: NaiveDate,
    ) -> DomainResult<invoices::Model> {
        let txn = self.db.begin().await.map_err(map_db_err)?;
        let before = find_locked(&txn, actor.account_id, id).await?;

        if !InvoiceStatus::from(before.status).is_open() {
            return Err(DomainError::Validation(format!(
                "invoice {} is {} and can no longer be rescheduled",
                before.number,
                InvoiceStatus::from(before.status)
            )));
        }
        if due_on < before.issued_on {
            return Err(DomainError::Validation(
                "due date must not precede the issue date".to_string(),
            ));
        }

        let mut active: invoices::ActiveModel = before.clone().into();
        active.due_on = Set(due_on);
        let after = active.update(&txn).await.map_err(map_db_err)?;

        AuditRepository::record(&txn, actor, &after, AuditEntry::updated(&before, &after)).await?;
        txn.commit().await.map_err(map_db_err)?;
        Ok(after)
    }

    async fn transition<F>(&self, actor: Actor, id: Uuid, guard: F) -> DomainResult<invoices::Model>
    where
        F: FnOnce(InvoiceStatus) -> DomainResult<InvoiceAction> + Send,
    {
        // Order before invoice, the same lock order `CancelOrder` takes.
        let order_id = self.find(actor.account_id, id).await?.order_id;

        let txn = self.db.begin().await.map_err(map_db_err)?;
        let order = find_order_locked(&txn, actor.account_id, order_id).await?;
        let before = find_locked(&txn, actor.account_id, id).await?;
        let action = guard(before.status.into())?;

        let after = apply_action(&txn, actor, before, &action).await?;

        if let InvoiceAction::Cancel { .. } = action {
            revert_order(&txn, actor, order).await?;
        }

        txn.commit().await.map_err(map_db_err)?;

        tracing::info!(
            invoice_id = %id,
            status = %action.new_status(),
            "invoice status changed"
        );
        Ok(after)
    }
}

/// Loads an invoice of an account with `FOR UPDATE`.
pub(crate) async fn find_locked<C>(
    conn: &C,
    account_id: Uuid,
    id: Uuid,
) -> DomainResult<invoices::Model>
where
    C: ConnectionTrait,
{
    invoices::Entity::find_by_id(id)
        .filter(invoices::Column::AccountId.eq(account_id))
        .lock_exclusive()
        .one(conn)
        .await
        .map_err(map_db_err)?
        .ok_or(DomainError::not_found("invoice", id))
}

/// Persists an invoice transition with its audit events.
pub(crate) async fn apply_action<C>(
    conn: &C,
    actor: Actor,
    before: invoices::Model,
    action: &InvoiceAction,
) -> DomainResult<invoices::Model>
where
    C: ConnectionTrait,
{
    let mut active: invoices::ActiveModel = before.clone().into();
    active.status = Set(action.new_status().into());
    match action {
        InvoiceAction::Send { sent_at, .. } => active.sent_at = Set(Some((*sent_at).into())),
        InvoiceAction::MarkAsPaid { paid_at, .. } => {
            active.paid_at = Set(Some((*paid_at).into()));
        }
        InvoiceAction::Cancel { cancelled_at, .. } => {
            active.cancelled_at = Set(Some((*cancelled_at).into()));
        }
    }
    let after = active.update(conn).await.map_err(map_db_err)?;
    AuditRepository::record(conn, actor, &after, AuditEntry::updated(&before, &after)).await?;
    Ok(after)
}

/// Returns an invoiced order to validated once its invoice is cancelled.
async fn revert_order<C>(conn: &C, actor: Actor, before: orders::Model) -> DomainResult<()>
where
    C: ConnectionTrait,
{
    if OrderStatus::from(before.status) != OrderStatus::Invoiced {
        return Ok(());
    }
    let action = OrderLifecycle::revert_invoice(before.status.into())?;

    let mut active: orders::ActiveModel = before.clone().into();
    active.status = Set(action.new_status().into());
    active.invoiced_at = Set(None);
    let after = active.update(conn).await.map_err(map_db_err)?;

    AuditRepository::record(conn, actor, &after, AuditEntry::updated(&before, &after)).await?;
    Ok(())
}
