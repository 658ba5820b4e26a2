//! Integration tests for invoice creation and the invoice lifecycle.

mod common;

use chrono::{Datelike, Duration, Utc};
use futures::future::join;
use orderdesk_core::DomainError;
use orderdesk_db::entities::sea_orm_active_enums::{InvoiceStatus, OrderStatus};
use orderdesk_db::queries::InvoiceQuery;
use orderdesk_db::repositories::{InvoiceRepository, OrderRepository};
use orderdesk_db::services::{CancelOrder, CreateInvoice, Service};
use rust_decimal_macros::dec;

use common::{create_order, setup, validated_order};

#[tokio::test]
async fn test_create_invoice_from_validated_order() {
    let Some(ctx) = setup().await else { return };
    let order_id = validated_order(&ctx).await;

    let result = CreateInvoice::new(ctx.db.clone(), ctx.actor, order_id)
        .due_in_days(Some(14))
        .call()
        .await
        .unwrap();

    let today = Utc::now().date_naive();
    let invoice = result.invoice;
    assert_eq!(invoice.number, format!("INV-{}-00001", today.year()));
    assert_eq!(invoice.status, InvoiceStatus::Draft);
    assert_eq!(invoice.amount, dec!(25.00));
    assert_eq!(invoice.tax_rate, dec!(0.20));
    assert_eq!(invoice.tax_amount, dec!(5.00));
    assert_eq!(invoice.total_amount, dec!(30.00));
    assert_eq!(invoice.issued_on, today);
    assert_eq!(invoice.due_on, today + Duration::days(14));

    assert_eq!(result.order.status, OrderStatus::Invoiced);
    assert!(result.order.invoiced_at.is_some());
}

#[tokio::test]
async fn test_create_invoice_with_explicit_tax_rate() {
    let Some(ctx) = setup().await else { return };
    let order_id = validated_order(&ctx).await;

    let invoice = CreateInvoice::new(ctx.db.clone(), ctx.actor, order_id)
        .tax_rate(Some(dec!(0.055)))
        .call()
        .await
        .unwrap()
        .invoice;

    assert_eq!(invoice.tax_amount, dec!(1.38));
    assert_eq!(invoice.total_amount, dec!(26.38));
    assert_eq!(invoice.due_on, invoice.issued_on + Duration::days(30));
}

#[tokio::test]
async fn test_create_invoice_requires_validated_order() {
    let Some(ctx) = setup().await else { return };
    let pending = create_order(&ctx).await;

    let err = CreateInvoice::new(ctx.db.clone(), ctx.actor, pending.order.id)
        .call()
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::InvalidTransition { .. }));

    let order_id = validated_order(&ctx).await;
    CreateInvoice::new(ctx.db.clone(), ctx.actor, order_id)
        .call()
        .await
        .unwrap();
    let err = CreateInvoice::new(ctx.db.clone(), ctx.actor, order_id)
        .call()
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::InvalidTransition { .. }));
}

#[tokio::test]
async fn test_invoice_send_then_pay() {
    let Some(ctx) = setup().await else { return };
    let repo = InvoiceRepository::new(ctx.db.clone());
    let order_id = validated_order(&ctx).await;
    let invoice = CreateInvoice::new(ctx.db.clone(), ctx.actor, order_id)
        .call()
        .await
        .unwrap()
        .invoice;

    let err = repo.mark_as_paid(ctx.actor, invoice.id).await.unwrap_err();
    assert!(matches!(err, DomainError::InvalidTransition { .. }));

    let sent = repo.send(ctx.actor, invoice.id).await.unwrap();
    assert_eq!(sent.status, InvoiceStatus::Sent);
    assert!(sent.sent_at.is_some());

    let paid = repo.mark_as_paid(ctx.actor, invoice.id).await.unwrap();
    assert_eq!(paid.status, InvoiceStatus::Paid);
    assert!(paid.paid_at.is_some());

    let err = repo.cancel(ctx.actor, invoice.id).await.unwrap_err();
    assert!(matches!(err, DomainError::InvoiceAlreadyPaid));
}

#[tokio::test]
async fn test_cancel_invoice_reverts_order_and_allows_reissue() {
    let Some(ctx) = setup().await else { return };
    let repo = InvoiceRepository::new(ctx.db.clone());
    let order_id = validated_order(&ctx).await;
    let first = CreateInvoice::new(ctx.db.clone(), ctx.actor, order_id)
        .call()
        .await
        .unwrap()
        .invoice;

    let cancelled = repo.cancel(ctx.actor, first.id).await.unwrap();
    assert_eq!(cancelled.status, InvoiceStatus::Cancelled);

    let order = OrderRepository::new(ctx.db.clone())
        .find(ctx.actor.account_id, order_id)
        .await
        .unwrap();
    assert_eq!(order.status, OrderStatus::Validated);
    assert!(order.invoiced_at.is_none());

    let second = CreateInvoice::new(ctx.db.clone(), ctx.actor, order_id)
        .call()
        .await
        .unwrap()
        .invoice;
    assert_ne!(second.number, first.number);
    assert!(second.number.ends_with("-00002"));

    let err = repo.cancel(ctx.actor, first.id).await.unwrap_err();
    assert!(matches!(err, DomainError::AlreadyCancelled { .. }));
}

#[tokio::test]
async fn test_reschedule_rejects_date_before_issue() {
    let Some(ctx) = setup().await else { return };
    let repo = InvoiceRepository::new(ctx.db.clone());
    let order_id = validated_order(&ctx).await;
    let invoice = CreateInvoice::new(ctx.db.clone(), ctx.actor, order_id)
        .call()
        .await
        .unwrap()
        .invoice;

    let err = repo
        .reschedule(ctx.actor, invoice.id, invoice.issued_on - Duration::days(1))
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Validation(_)));

    let new_due = invoice.issued_on + Duration::days(60);
    let moved = repo.reschedule(ctx.actor, invoice.id, new_due).await.unwrap();
    assert_eq!(moved.due_on, new_due);
}

#[tokio::test]
async fn test_list_overdue_invoices() {
    let Some(ctx) = setup().await else { return };
    let repo = InvoiceRepository::new(ctx.db.clone());
    let order_id = validated_order(&ctx).await;
    let invoice = CreateInvoice::new(ctx.db.clone(), ctx.actor, order_id)
        .due_in_days(Some(0))
        .call()
        .await
        .unwrap()
        .invoice;
    repo.send(ctx.actor, invoice.id).await.unwrap();

    let tomorrow = Utc::now().date_naive() + Duration::days(1);
    let overdue = repo
        .list(
            ctx.actor.account_id,
            &InvoiceQuery {
                overdue_on: Some(tomorrow),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(overdue.meta.total, 1);

    let today = repo
        .list(
            ctx.actor.account_id,
            &InvoiceQuery {
                overdue_on: Some(invoice.due_on),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(today.meta.total, 0);
}

#[tokio::test]
async fn test_concurrent_invoice_and_order_cancellation_do_not_deadlock() {
    let Some(ctx) = setup().await else { return };
    let invoices = InvoiceRepository::new(ctx.db.clone());
    let orders = OrderRepository::new(ctx.db.clone());

    for _ in 0..5 {
        let order_id = validated_order(&ctx).await;
        let invoice = CreateInvoice::new(ctx.db.clone(), ctx.actor, order_id)
            .call()
            .await
            .unwrap()
            .invoice;

        let (invoice_result, order_result) = join(
            invoices.cancel(ctx.actor, invoice.id),
            CancelOrder::new(ctx.db.clone(), ctx.actor, order_id, None).call(),
        )
        .await;

        assert!(order_result.is_ok(), "{order_result:?}");
        assert!(
            matches!(
                invoice_result,
                Ok(_) | Err(DomainError::AlreadyCancelled { .. })
            ),
            "{invoice_result:?}"
        );

        let order = orders.find(ctx.actor.account_id, order_id).await.unwrap();
        assert_eq!(order.status, OrderStatus::Cancelled);
        let invoice = invoices.find(ctx.actor.account_id, invoice.id).await.unwrap();
        assert_eq!(invoice.status, InvoiceStatus::Cancelled);
    }
}
