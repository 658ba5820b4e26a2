//! Shared setup for database integration tests.
//!
//! Tests are skipped when `DATABASE_URL` is not set.

#![allow(dead_code)]

use std::env;

use orderdesk_db::migration::{Migrator, MigratorTrait};
use orderdesk_db::repositories::{
    AccountRepository, Actor, CreateAccountInput, CreateOrderInput, NewLineInput, OrderRepository,
    OrderWithLines,
};
use orderdesk_shared::types::Currency;
use rust_decimal_macros::dec;
use sea_orm::{Database, DatabaseConnection};
use tokio::sync::OnceCell;
use uuid::Uuid;

static MIGRATED: OnceCell<()> = OnceCell::const_new();

/// Connection and a fresh account for one test.
pub struct TestContext {
    pub db: DatabaseConnection,
    pub actor: Actor,
}

/// Connects, migrates once per test binary and creates a fresh account.
pub async fn setup() -> Option<TestContext> {
    let Ok(url) = env::var("DATABASE_URL") else {
        eprintln!("DATABASE_URL not set, skipping");
        return None;
    };
    let db = Database::connect(&url).await.expect("connect");

    MIGRATED
        .get_or_init(|| async {
            Migrator::up(&db, None).await.expect("migrate");
        })
        .await;

    let account = AccountRepository::new(db.clone())
        .create(CreateAccountInput {
            name: "Test Shop".to_string(),
            slug: format!("test-{}", Uuid::new_v4().simple()),
            currency: Currency::Eur,
            default_tax_rate: dec!(0.20),
            invoice_prefix: "INV".to_string(),
        })
        .await
        .expect("create account");

    Some(TestContext {
        db,
        actor: Actor::new(account.id, Uuid::new_v4()),
    })
}

pub fn line(description: &str, quantity: i32, unit_price: rust_decimal::Decimal) -> NewLineInput {
    NewLineInput {
        description: description.to_string(),
        sku: None,
        quantity,
        unit_price,
    }
}

/// Creates an order with two lines totalling 25.00.
pub async fn create_order(ctx: &TestContext) -> OrderWithLines {
    OrderRepository::new(ctx.db.clone())
        .create(
            ctx.actor,
            CreateOrderInput {
                lines: vec![line("Mug", 2, dec!(7.50)), line("Poster", 1, dec!(10.00))],
                ..Default::default()
            },
        )
        .await
        .expect("create order")
}

/// Creates and validates an order.
pub async fn validated_order(ctx: &TestContext) -> Uuid {
    let order = create_order(ctx).await;
    OrderRepository::new(ctx.db.clone())
        .validate(ctx.actor, order.order.id)
        .await
        .expect("validate order")
        .id
}
