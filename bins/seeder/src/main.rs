//! Database seeder for Orderdesk development and testing.
//!
//! Seeds a demo account with customers, a fulfillment service and orders in
//! several stages, then prints a bearer token for the demo user.
//!
//! Usage: cargo run --bin seeder

use anyhow::Context;
use rust_decimal::Decimal;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};
use uuid::Uuid;

use orderdesk_db::{
    CreateInvoice, Service,
    entities::accounts,
    repositories::{
        AccountRepository, Actor, CreateAccountInput, CreateCustomerInput,
        CreateFulfillmentInput, CreateFulfillmentServiceInput, CreateOrderInput,
        CustomerRepository, FulfillmentRepository, FulfillmentServiceRepository,
        InvoiceRepository, NewLineInput, OrderRepository, ShipmentInput,
    },
};
use orderdesk_shared::{
    AppConfig, JwtConfig, JwtService,
    types::{AccountId, Currency, UserId},
};

/// Slug of the demo account.
const DEMO_SLUG: &str = "demo";
/// Demo user ID (consistent for all seeds)
const DEMO_USER_ID: Uuid = Uuid::from_u128(0x0000_0000_0000_0000_0000_0000_0000_0002);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load().context("failed to load configuration")?;

    println!("Connecting to database...");
    let db = orderdesk_db::connect(&config.database.url)
        .await
        .context("failed to connect to database")?;

    let account = match find_demo_account(&db).await? {
        Some(account) => {
            println!("  Demo account already exists, skipping data...");
            account
        }
        None => {
            println!("Seeding demo account...");
            let account = AccountRepository::new(db.clone())
                .create(CreateAccountInput {
                    name: "Demo Shop".to_string(),
                    slug: DEMO_SLUG.to_string(),
                    currency: Currency::Eur,
                    default_tax_rate: config.billing.default_tax_rate,
                    invoice_prefix: "INV".to_string(),
                })
                .await?;
            let actor = Actor::new(account.id, DEMO_USER_ID);
            seed_orders(&db, actor, config.billing.invoice_due_days).await?;
            account
        }
    };

    let jwt = JwtService::new(JwtConfig {
        secret: config.jwt.secret.clone(),
        #[allow(clippy::cast_possible_wrap)]
        access_token_expires_minutes: (config.jwt.access_token_expiry_secs / 60) as i64,
    });
    let token = jwt.generate_access_token(
        UserId::from_uuid(DEMO_USER_ID),
        AccountId::from_uuid(account.id),
    )?;

    println!("Seeding complete!");
    println!("  Account: {} ({})", account.name, account.id);
    println!("  Token:   {token}");
    Ok(())
}

async fn find_demo_account(db: &DatabaseConnection) -> anyhow::Result<Option<accounts::Model>> {
    Ok(accounts::Entity::find()
        .filter(accounts::Column::Slug.eq(DEMO_SLUG))
        .one(db)
        .await?)
}

fn line(description: &str, sku: &str, quantity: i32, cents: i64) -> NewLineInput {
    NewLineInput {
        description: description.to_string(),
        sku: Some(sku.to_string()),
        quantity,
        unit_price: Decimal::new(cents, 2),
    }
}

fn customer(first: &str, last: &str, email: &str, city: &str, country: &str) -> CreateCustomerInput {
    CreateCustomerInput {
        first_name: first.to_string(),
        last_name: last.to_string(),
        email: email.to_string(),
        phone: None,
        company_name: None,
        address_line1: None,
        address_line2: None,
        postal_code: None,
        city: Some(city.to_string()),
        country: Some(country.to_string()),
    }
}

/// One pending, one invoiced and one shipped order.
async fn seed_orders(db: &DatabaseConnection, actor: Actor, due_days: u32) -> anyhow::Result<()> {
    println!("Seeding customers...");
    let customers = CustomerRepository::new(db.clone());
    let ada = customers
        .create(actor, customer("Ada", "Lovelace", "ada@example.com", "London", "GB"))
        .await?;
    let grace = customers
        .create(actor, customer("Grace", "Hopper", "grace@example.com", "Arlington", "US"))
        .await?;

    println!("Seeding fulfillment service...");
    let service = FulfillmentServiceRepository::new(db.clone())
        .create(
            actor,
            CreateFulfillmentServiceInput {
                name: "Parcel Express".to_string(),
                carrier: Some("DHL".to_string()),
                tracking_url_template: Some(
                    "https://track.example.com/{tracking_number}".to_string(),
                ),
                active: true,
            },
        )
        .await?;

    println!("Seeding orders...");
    let orders = OrderRepository::new(db.clone());
    orders
        .create(
            actor,
            CreateOrderInput {
                customer_id: Some(ada.id),
                currency: None,
                notes: Some("Gift wrap".to_string()),
                lines: vec![line("Enamel mug", "MUG-01", 2, 750)],
            },
        )
        .await?;

    let invoiced = orders
        .create(
            actor,
            CreateOrderInput {
                customer_id: Some(grace.id),
                currency: None,
                notes: None,
                lines: vec![
                    line("Poster A2", "POS-A2", 1, 1000),
                    line("Sticker pack", "STK-10", 3, 350),
                ],
            },
        )
        .await?;
    orders.validate(actor, invoiced.order.id).await?;
    let invoice = CreateInvoice::new(db.clone(), actor, invoiced.order.id)
        .default_due_days(due_days)
        .call()
        .await?
        .invoice;
    InvoiceRepository::new(db.clone())
        .send(actor, invoice.id)
        .await?;

    let shipped = orders
        .create(
            actor,
            CreateOrderInput {
                customer_id: Some(ada.id),
                currency: None,
                notes: None,
                lines: vec![line("Notebook", "NTB-05", 5, 420)],
            },
        )
        .await?;
    orders.validate(actor, shipped.order.id).await?;
    let fulfillments = FulfillmentRepository::new(db.clone());
    let fulfillment = fulfillments
        .create(
            actor,
            shipped.order.id,
            CreateFulfillmentInput {
                fulfillment_service_id: Some(service.id),
                ..Default::default()
            },
        )
        .await?;
    fulfillments.process(actor, fulfillment.id).await?;
    fulfillments
        .ship(
            actor,
            fulfillment.id,
            ShipmentInput {
                tracking_number: Some("JD014600006281".to_string()),
                ..Default::default()
            },
        )
        .await?;

    Ok(())
}
