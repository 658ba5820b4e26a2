//! Integration tests for orders and their lines.

mod common;

use futures::future::join_all;
use orderdesk_core::DomainError;
use orderdesk_db::entities::sea_orm_active_enums::OrderStatus;
use orderdesk_db::queries::OrderQuery;
use orderdesk_db::repositories::{
    CreateOrderInput, OrderRepository, UpdateLineInput, UpdateOrderInput,
};
use rust_decimal_macros::dec;
use std::collections::HashSet;

use common::{create_order, line, setup};

#[tokio::test]
async fn test_create_order_computes_totals_and_reference() {
    let Some(ctx) = setup().await else { return };

    let created = create_order(&ctx).await;

    assert_eq!(created.order.reference, "ORD-000001");
    assert_eq!(created.order.status, OrderStatus::Pending);
    assert_eq!(created.order.currency, "EUR");
    assert_eq!(created.order.total_amount, dec!(25.00));
    assert_eq!(created.lines.len(), 2);
    assert_eq!(created.lines[0].position, 1);
    assert_eq!(created.lines[0].total_price, dec!(15.00));

    let second = create_order(&ctx).await;
    assert_eq!(second.order.reference, "ORD-000002");
}

#[tokio::test]
async fn test_line_changes_refresh_total() {
    let Some(ctx) = setup().await else { return };
    let repo = OrderRepository::new(ctx.db.clone());
    let created = create_order(&ctx).await;
    let order_id = created.order.id;

    let with_sticker = repo
        .add_line(ctx.actor, order_id, line("Sticker", 4, dec!(1.25)))
        .await
        .unwrap();
    assert_eq!(with_sticker.order.total_amount, dec!(30.00));
    let added = with_sticker
        .lines
        .iter()
        .find(|l| l.description == "Sticker")
        .unwrap()
        .clone();
    assert_eq!(added.position, 3);

    repo.update_line(
        ctx.actor,
        order_id,
        created.lines[0].id,
        UpdateLineInput {
            quantity: Some(1),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    let order = repo.find(ctx.actor.account_id, order_id).await.unwrap();
    assert_eq!(order.total_amount, dec!(22.50));

    repo.remove_line(ctx.actor, order_id, added.id).await.unwrap();
    let order = repo.find(ctx.actor.account_id, order_id).await.unwrap();
    assert_eq!(order.total_amount, dec!(17.50));
}

#[tokio::test]
async fn test_validate_requires_lines_and_freezes_order() {
    let Some(ctx) = setup().await else { return };
    let repo = OrderRepository::new(ctx.db.clone());

    let empty = repo
        .create(ctx.actor, Default::default())
        .await
        .unwrap();
    let err = repo.validate(ctx.actor, empty.order.id).await.unwrap_err();
    assert!(matches!(err, DomainError::EmptyOrder));

    let created = create_order(&ctx).await;
    let validated = repo.validate(ctx.actor, created.order.id).await.unwrap();
    assert_eq!(validated.status, OrderStatus::Validated);
    assert!(validated.validated_at.is_some());

    let err = repo
        .add_line(ctx.actor, created.order.id, line("Late", 1, dec!(1)))
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::OrderNotEditable { .. }));

    let err = repo.delete(ctx.actor, created.order.id).await.unwrap_err();
    assert!(matches!(err, DomainError::OrderNotDeletable { .. }));

    // Notes stay editable after validation.
    let updated = repo
        .update(
            ctx.actor,
            created.order.id,
            UpdateOrderInput {
                notes: Some(Some("Gift wrap".to_string())),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.notes.as_deref(), Some("Gift wrap"));
}

#[tokio::test]
async fn test_orders_are_scoped_to_account() {
    let Some(ctx) = setup().await else { return };
    let Some(other) = setup().await else { return };
    let repo = OrderRepository::new(ctx.db.clone());
    let created = create_order(&ctx).await;

    let err = repo
        .find(other.actor.account_id, created.order.id)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::NotFound { .. }));

    let page = repo
        .list(other.actor.account_id, &OrderQuery::default())
        .await
        .unwrap();
    assert_eq!(page.meta.total, 0);
}

#[tokio::test]
async fn test_list_filters_by_status() {
    let Some(ctx) = setup().await else { return };
    let repo = OrderRepository::new(ctx.db.clone());
    create_order(&ctx).await;
    common::validated_order(&ctx).await;

    let page = repo
        .list(
            ctx.actor.account_id,
            &OrderQuery {
                status: Some(orderdesk_core::order::OrderStatus::Validated),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(page.meta.total, 1);
    assert_eq!(page.data[0].status, OrderStatus::Validated);
}

#[tokio::test]
async fn test_concurrent_creation_allocates_distinct_references() {
    let Some(ctx) = setup().await else { return };

    let created = join_all((0..8).map(|_| create_order(&ctx))).await;
    let references: HashSet<_> = created.into_iter().map(|o| o.order.reference).collect();

    assert_eq!(references.len(), 8);
    assert!(references.contains("ORD-000008"));
}

#[tokio::test]
async fn test_sub_cent_price_is_rejected_and_total_kept() {
    let Some(ctx) = setup().await else { return };
    let repo = OrderRepository::new(ctx.db.clone());
    let created = create_order(&ctx).await;

    let result = repo
        .add_line(ctx.actor, created.order.id, line("Sticker", 3, dec!(0.005)))
        .await;
    assert!(matches!(result, Err(DomainError::Validation(_))));

    let order = repo
        .find(ctx.actor.account_id, created.order.id)
        .await
        .unwrap();
    assert_eq!(order.total_amount, dec!(25.00));
}

#[tokio::test]
async fn test_amounts_beyond_column_range_are_rejected() {
    let Some(ctx) = setup().await else { return };
    let repo = OrderRepository::new(ctx.db.clone());

    let huge_line = repo
        .create(
            ctx.actor,
            CreateOrderInput {
                lines: vec![line("Yacht", 1_000, dec!(999_999_999_999.99))],
                ..Default::default()
            },
        )
        .await;
    assert!(matches!(huge_line, Err(DomainError::Validation(_))));

    let huge_sum = repo
        .create(
            ctx.actor,
            CreateOrderInput {
                lines: vec![
                    line("Yacht", 1, dec!(999_999_999_999.99)),
                    line("Second yacht", 1, dec!(999_999_999_999.99)),
                ],
                ..Default::default()
            },
        )
        .await;
    assert!(matches!(huge_sum, Err(DomainError::Validation(_))));

    let page = repo
        .list(ctx.actor.account_id, &OrderQuery::default())
        .await
        .unwrap();
    assert_eq!(page.meta.total, 0);
}
