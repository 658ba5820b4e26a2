//! Integration tests for the audit trail.

mod common;

use futures::future::join;
use orderdesk_core::audit::AuditAction;
use orderdesk_db::entities::{account_events, sea_orm_active_enums::EventAction};
use orderdesk_db::queries::EventQuery;
use orderdesk_db::repositories::{
    AuditRepository, CreateCustomerInput, CustomerRepository, UpdateCustomerInput,
};
use orderdesk_db::services::{CreateInvoice, Service};
use sea_orm::{ActiveModelTrait, ActiveValue::Set, EntityTrait};

use common::{setup, validated_order};

fn customer_input(email: &str) -> CreateCustomerInput {
    CreateCustomerInput {
        first_name: "Ada".to_string(),
        last_name: "Lovelace".to_string(),
        email: email.to_string(),
        city: Some("London".to_string()),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_customer_changes_are_recorded_per_field() {
    let Some(ctx) = setup().await else { return };
    let customers = CustomerRepository::new(ctx.db.clone());
    let audit = AuditRepository::new(ctx.db.clone());

    let customer = customers
        .create(ctx.actor, customer_input("Ada@Example.com"))
        .await
        .unwrap();
    assert_eq!(customer.email, "ada@example.com");

    customers
        .update(
            ctx.actor,
            customer.id,
            UpdateCustomerInput {
                city: Some(Some("Paris".to_string())),
                phone: Some(Some("+33 1 00 00 00 00".to_string())),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let history = audit
        .history(ctx.actor.account_id, "Customer", customer.id)
        .await
        .unwrap();
    assert_eq!(history.len(), 3);
    assert_eq!(history[0].action, EventAction::Created);
    assert_eq!(history[0].message, "Customer Ada Lovelace created");
    assert!(history.iter().all(|e| e.author_id == ctx.actor.author_id));

    let city = history
        .iter()
        .find(|e| e.field.as_deref() == Some("city"))
        .unwrap();
    assert_eq!(city.old_value.as_deref(), Some("London"));
    assert_eq!(city.new_value.as_deref(), Some("Paris"));
    assert_eq!(
        city.message,
        "Customer Ada Lovelace: city changed from London to Paris"
    );
}

#[tokio::test]
async fn test_concurrent_customer_updates_chain_their_history() {
    let Some(ctx) = setup().await else { return };
    let customers = CustomerRepository::new(ctx.db.clone());
    let audit = AuditRepository::new(ctx.db.clone());

    let customer = customers
        .create(ctx.actor, customer_input("grace@example.com"))
        .await
        .unwrap();
    let move_to = |city: &str| UpdateCustomerInput {
        city: Some(Some(city.to_string())),
        ..Default::default()
    };

    let (paris, berlin) = join(
        customers.update(ctx.actor, customer.id, move_to("Paris")),
        customers.update(ctx.actor, customer.id, move_to("Berlin")),
    )
    .await;
    paris.unwrap();
    berlin.unwrap();

    let history = audit
        .history(ctx.actor.account_id, "Customer", customer.id)
        .await
        .unwrap();
    let changes: Vec<_> = history
        .iter()
        .filter(|e| e.field.as_deref() == Some("city"))
        .collect();
    assert_eq!(changes.len(), 2);
    assert_eq!(changes[0].old_value.as_deref(), Some("London"));
    assert_eq!(changes[1].old_value, changes[0].new_value);

    let current = customers.find(ctx.actor.account_id, customer.id).await.unwrap();
    assert_eq!(current.city, changes[1].new_value);
}

#[tokio::test]
async fn test_duplicate_customer_email_conflicts() {
    let Some(ctx) = setup().await else { return };
    let customers = CustomerRepository::new(ctx.db.clone());

    customers
        .create(ctx.actor, customer_input("dup@example.com"))
        .await
        .unwrap();
    let err = customers
        .create(ctx.actor, customer_input("DUP@example.com"))
        .await
        .unwrap_err();
    assert!(matches!(err, orderdesk_core::DomainError::Conflict(_)));
}

#[tokio::test]
async fn test_invoice_creation_is_audited_on_order_and_invoice() {
    let Some(ctx) = setup().await else { return };
    let order_id = validated_order(&ctx).await;
    let result = CreateInvoice::new(ctx.db.clone(), ctx.actor, order_id)
        .call()
        .await
        .unwrap();
    let audit = AuditRepository::new(ctx.db.clone());

    let invoice_history = audit
        .history(ctx.actor.account_id, "Invoice", result.invoice.id)
        .await
        .unwrap();
    assert_eq!(invoice_history.len(), 1);
    assert_eq!(invoice_history[0].action, EventAction::Created);

    let order_history = audit
        .history(ctx.actor.account_id, "Order", order_id)
        .await
        .unwrap();
    let last = order_history.last().unwrap();
    assert_eq!(last.field.as_deref(), Some("status"));
    assert_eq!(
        last.message,
        format!(
            "Order {}: status changed from validated to invoiced",
            result.order.reference
        )
    );

    let updates = audit
        .list(
            ctx.actor.account_id,
            &EventQuery {
                resource_type: Some("Order".to_string()),
                action: Some(AuditAction::Updated),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updates.meta.total, 2);
    assert!(
        updates
            .data
            .iter()
            .all(|e| e.resource.as_ref().is_some_and(|r| r.resource_id == order_id))
    );
}

#[tokio::test]
async fn test_events_cannot_be_modified() {
    let Some(ctx) = setup().await else { return };
    let customer = CustomerRepository::new(ctx.db.clone())
        .create(ctx.actor, customer_input("immutable@example.com"))
        .await
        .unwrap();
    let event = AuditRepository::new(ctx.db.clone())
        .history(ctx.actor.account_id, "Customer", customer.id)
        .await
        .unwrap()
        .remove(0);

    let mut active: account_events::ActiveModel = event.clone().into();
    active.message = Set("rewritten".to_string());
    assert!(active.update(&ctx.db).await.is_err());

    let stored = account_events::Entity::find_by_id(event.id)
        .one(&ctx.db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.message, event.message);
}

#[tokio::test]
async fn test_deleting_customer_keeps_history() {
    let Some(ctx) = setup().await else { return };
    let customers = CustomerRepository::new(ctx.db.clone());
    let customer = customers
        .create(ctx.actor, customer_input("gone@example.com"))
        .await
        .unwrap();
    customers.delete(ctx.actor, customer.id).await.unwrap();

    let history = AuditRepository::new(ctx.db.clone())
        .history(ctx.actor.account_id, "Customer", customer.id)
        .await
        .unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[1].action, EventAction::Deleted);
}
