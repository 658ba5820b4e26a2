//! `SeaORM` Entity for accounts table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "accounts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    #[sea_orm(unique)]
    pub slug: String,
    pub currency: String,
    #[sea_orm(column_type = "Decimal(Some((5, 4)))")]
    pub default_tax_rate: Decimal,
    pub invoice_prefix: String,
    pub next_order_number: i64,
    pub next_invoice_number: i64,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::customers::Entity")]
    Customers,
    #[sea_orm(has_many = "super::orders::Entity")]
    Orders,
    #[sea_orm(has_many = "super::invoices::Entity")]
    Invoices,
    #[sea_orm(has_many = "super::fulfillment_services::Entity")]
    FulfillmentServices,
    #[sea_orm(has_many = "super::fulfillments::Entity")]
    Fulfillments,
    #[sea_orm(has_many = "super::account_events::Entity")]
    AccountEvents,
}

impl Related<super::customers::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Customers.def()
    }
}

impl Related<super::orders::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Orders.def()
    }
}

impl Related<super::invoices::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Invoices.def()
    }
}

impl Related<super::fulfillment_services::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::FulfillmentServices.def()
    }
}

impl Related<super::fulfillments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Fulfillments.def()
    }
}

impl Related<super::account_events::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AccountEvents.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
