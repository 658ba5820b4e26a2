use orderdesk_core::order::OrderStatus;
use orderdesk_db::entities::{order_lines, orders};
use orderdesk_db::repositories::OrderWithLines;
use serde::Serialize;
use uuid::Uuid;

use super::{MoneyView, StatusView, optional_timestamp, timestamp};

/// An order, with its lines when loaded.
#[derive(Debug, Serialize)]
pub struct OrderResponse {
    /// Order ID.
    pub id: Uuid,
    /// Account-scoped reference, e.g. `ORD-000042`.
    pub reference: String,
    /// Status with label.
    pub status: StatusView,
    /// Customer, if any.
    pub customer_id: Option<Uuid>,
    /// Sum of the line totals.
    pub total: MoneyView,
    /// Free text notes.
    pub notes: Option<String>,
    /// Reason given at cancellation.
    pub cancellation_reason: Option<String>,
    /// Validated at timestamp.
    pub validated_at: Option<String>,
    /// Invoiced at timestamp.
    pub invoiced_at: Option<String>,
    /// Cancelled at timestamp.
    pub cancelled_at: Option<String>,
    /// Created at timestamp.
    pub created_at: String,
    /// Updated at timestamp.
    pub updated_at: String,
    /// Lines, omitted in listings.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lines: Option<Vec<OrderLineResponse>>,
}

/// An order line.
#[derive(Debug, Serialize)]
pub struct OrderLineResponse {
    /// Line ID.
    pub id: Uuid,
    /// 1-based position within the order.
    pub position: i32,
    /// Description.
    pub description: String,
    /// Stock keeping unit.
    pub sku: Option<String>,
    /// Quantity.
    pub quantity: i32,
    /// Price per unit.
    pub unit_price: MoneyView,
    /// `quantity × unit_price`.
    pub total_price: MoneyView,
}

impl OrderLineResponse {
    fn new(line: order_lines::Model, currency: &str) -> Self {
        Self {
            id: line.id,
            position: line.position,
            unit_price: MoneyView::new(line.unit_price, currency),
            total_price: MoneyView::new(line.total_price, currency),
            description: line.description,
            sku: line.sku,
            quantity: line.quantity,
        }
    }
}

pub(crate) fn order_status(status: OrderStatus) -> StatusView {
    StatusView {
        value: status.as_str(),
        label: status.label(),
    }
}

impl From<orders::Model> for OrderResponse {
    fn from(order: orders::Model) -> Self {
        Self {
            id: order.id,
            status: order_status(order.status.into()),
            total: MoneyView::new(order.total_amount, &order.currency),
            validated_at: optional_timestamp(order.validated_at.as_ref()),
            invoiced_at: optional_timestamp(order.invoiced_at.as_ref()),
            cancelled_at: optional_timestamp(order.cancelled_at.as_ref()),
            created_at: timestamp(&order.created_at),
            updated_at: timestamp(&order.updated_at),
            reference: order.reference,
            customer_id: order.customer_id,
            notes: order.notes,
            cancellation_reason: order.cancellation_reason,
            lines: None,
        }
    }
}

impl From<OrderWithLines> for OrderResponse {
    fn from(loaded: OrderWithLines) -> Self {
        let currency = loaded.order.currency.clone();
        let lines = loaded
            .lines
            .into_iter()
            .map(|line| OrderLineResponse::new(line, &currency))
            .collect();
        Self {
            lines: Some(lines),
            ..Self::from(loaded.order)
        }
    }
}
