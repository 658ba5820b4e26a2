//! Invoice creation from a validated order.

use async_trait::async_trait;
use chrono::{Datelike, Utc};
use orderdesk_core::audit::AuditEntry;
use orderdesk_core::invoice::{InvoiceTotals, due_date, format_invoice_number};
use orderdesk_core::order::OrderLifecycle;
use orderdesk_core::{DomainError, DomainResult};
use rust_decimal::Decimal;
use sea_orm::prelude::DateTimeWithTimeZone;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, Set, TransactionTrait,
};
use uuid::Uuid;

use super::Service;
use crate::entities::{invoices, orders, sea_orm_active_enums::InvoiceStatus};
use crate::error::map_db_err;
use crate::repositories::order::find_locked as find_order_locked;
use crate::repositories::{AccountRepository, Actor, AuditRepository, Sequence};

/// Payment term used when neither the caller nor the configuration set one.
pub const DEFAULT_DUE_DAYS: u32 = 30;

/// The created invoice and the order it was issued for.
#[derive(Debug, Clone)]
pub struct InvoicedOrder {
    /// New draft invoice.
    pub invoice: invoices::Model,
    /// Order, now invoiced.
    pub order: orders::Model,
}

/// Issues a draft invoice for a validated order.
///
/// The order must be validated and have no open invoice. The invoice number
/// is allocated under a lock on the account row, the order is marked
/// invoiced, and both changes are audited.
#[derive(Debug, Clone)]
pub struct CreateInvoice {
    db: DatabaseConnection,
    actor: Actor,
    order_id: Uuid,
    tax_rate: Option<Decimal>,
    due_in_days: Option<u32>,
    default_due_days: u32,
}

impl CreateInvoice {
    /// Builds the command with the account's tax rate and default due days.
    #[must_use]
    pub const fn new(db: DatabaseConnection, actor: Actor, order_id: Uuid) -> Self {
        Self {
            db,
            actor,
            order_id,
            tax_rate: None,
            due_in_days: None,
            default_due_days: DEFAULT_DUE_DAYS,
        }
    }

    /// Overrides the account's default tax rate.
    #[must_use]
    pub const fn tax_rate(mut self, tax_rate: Option<Decimal>) -> Self {
        self.tax_rate = tax_rate;
        self
    }

    /// Sets the payment term in days.
    #[must_use]
    pub const fn due_in_days(mut self, days: Option<u32>) -> Self {
        self.due_in_days = days;
        self
    }

    /// Payment term used when `due_in_days` is not set.
    #[must_use]
    pub const fn default_due_days(mut self, days: u32) -> Self {
        self.default_due_days = days;
        self
    }
}

#[async_trait]
impl Service for CreateInvoice {
    type Output = InvoicedOrder;

    async fn call(self) -> DomainResult<InvoicedOrder> {
        let txn = self.db.begin().await.map_err(map_db_err)?;

        let order = find_order_locked(&txn, self.actor.account_id, self.order_id).await?;
        let action = OrderLifecycle::invoice(order.status.into())?;
        ensure_no_open_invoice(&txn, order.id).await?;

        let (account, sequence) =
            AccountRepository::allocate(&txn, self.actor.account_id, Sequence::Invoice).await?;

        let tax_rate = self.tax_rate.unwrap_or(account.default_tax_rate);
        let totals = InvoiceTotals::compute(order.total_amount, tax_rate)?;
        let issued_on = Utc::now().date_naive();
        let due_on = due_date(
            issued_on,
            self.due_in_days.unwrap_or(self.default_due_days),
        )?;

        let now: DateTimeWithTimeZone = Utc::now().into();
        let invoice = invoices::ActiveModel {
            id: Set(Uuid::now_v7()),
            account_id: Set(self.actor.account_id),
            order_id: Set(order.id),
            number: Set(format_invoice_number(
                &account.invoice_prefix,
                issued_on.year(),
                sequence,
            )),
            status: Set(InvoiceStatus::Draft),
            currency: Set(order.currency.clone()),
            amount: Set(totals.amount),
            tax_rate: Set(totals.tax_rate),
            tax_amount: Set(totals.tax_amount),
            total_amount: Set(totals.total_amount),
            issued_on: Set(issued_on),
            due_on: Set(due_on),
            sent_at: Set(None),
            paid_at: Set(None),
            cancelled_at: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await
        .map_err(map_db_err)?;

        let mut active: orders::ActiveModel = order.clone().into();
        active.status = Set(action.new_status().into());
        active.invoiced_at = Set(Some(now));
        let invoiced = active.update(&txn).await.map_err(map_db_err)?;

        AuditRepository::record(&txn, self.actor, &invoice, vec![AuditEntry::created(&invoice)])
            .await?;
        AuditRepository::record(
            &txn,
            self.actor,
            &invoiced,
            AuditEntry::updated(&order, &invoiced),
        )
        .await?;

        txn.commit().await.map_err(map_db_err)?;

        tracing::info!(
            invoice_id = %invoice.id,
            number = %invoice.number,
            order_id = %invoiced.id,
            "invoice created"
        );

        Ok(InvoicedOrder {
            invoice,
            order: invoiced,
        })
    }
}

async fn ensure_no_open_invoice<C>(conn: &C, order_id: Uuid) -> DomainResult<()>
where
    C: ConnectionTrait,
{
    let open = invoices::Entity::find()
        .filter(invoices::Column::OrderId.eq(order_id))
        .filter(invoices::Column::Status.is_in([InvoiceStatus::Draft, InvoiceStatus::Sent]))
        .count(conn)
        .await
        .map_err(map_db_err)?;
    if open > 0 {
        return Err(DomainError::OpenInvoiceExists);
    }
    Ok(())
}
