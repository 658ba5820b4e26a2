//! `SeaORM` active enums mapped to Postgres enum types.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use orderdesk_core::audit::AuditAction;
use orderdesk_core::fulfillment::FulfillmentStatus as CoreFulfillmentStatus;
use orderdesk_core::invoice::InvoiceStatus as CoreInvoiceStatus;
use orderdesk_core::order::OrderStatus as CoreOrderStatus;

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "order_status")]
pub enum OrderStatus {
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "validated")]
    Validated,
    #[sea_orm(string_value = "invoiced")]
    Invoiced,
    #[sea_orm(string_value = "cancelled")]
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "invoice_status")]
pub enum InvoiceStatus {
    #[sea_orm(string_value = "draft")]
    Draft,
    #[sea_orm(string_value = "sent")]
    Sent,
    #[sea_orm(string_value = "paid")]
    Paid,
    #[sea_orm(string_value = "cancelled")]
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "fulfillment_status")]
pub enum FulfillmentStatus {
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "processing")]
    Processing,
    #[sea_orm(string_value = "shipped")]
    Shipped,
    #[sea_orm(string_value = "delivered")]
    Delivered,
    #[sea_orm(string_value = "cancelled")]
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "event_action")]
pub enum EventAction {
    #[sea_orm(string_value = "created")]
    Created,
    #[sea_orm(string_value = "updated")]
    Updated,
    #[sea_orm(string_value = "deleted")]
    Deleted,
}

// Conversions between the stored enums and the core lifecycle enums.

impl From<OrderStatus> for CoreOrderStatus {
    fn from(status: OrderStatus) -> Self {
        match status {
            OrderStatus::Pending => Self::Pending,
            OrderStatus::Validated => Self::Validated,
            OrderStatus::Invoiced => Self::Invoiced,
            OrderStatus::Cancelled => Self::Cancelled,
        }
    }
}

impl From<CoreOrderStatus> for OrderStatus {
    fn from(status: CoreOrderStatus) -> Self {
        match status {
            CoreOrderStatus::Pending => Self::Pending,
            CoreOrderStatus::Validated => Self::Validated,
            CoreOrderStatus::Invoiced => Self::Invoiced,
            CoreOrderStatus::Cancelled => Self::Cancelled,
        }
    }
}

impl From<InvoiceStatus> for CoreInvoiceStatus {
    fn from(status: InvoiceStatus) -> Self {
        match status {
            InvoiceStatus::Draft => Self::Draft,
            InvoiceStatus::Sent => Self::Sent,
            InvoiceStatus::Paid => Self::Paid,
            InvoiceStatus::Cancelled => Self::Cancelled,
        }
    }
}

impl From<CoreInvoiceStatus> for InvoiceStatus {
    fn from(status: CoreInvoiceStatus) -> Self {
        match status {
            CoreInvoiceStatus::Draft => Self::Draft,
            CoreInvoiceStatus::Sent => Self::Sent,
            CoreInvoiceStatus::Paid => Self::Paid,
            CoreInvoiceStatus::Cancelled => Self::Cancelled,
        }
    }
}

impl From<FulfillmentStatus> for CoreFulfillmentStatus {
    fn from(status: FulfillmentStatus) -> Self {
        match status {
            FulfillmentStatus::Pending => Self::Pending,
            FulfillmentStatus::Processing => Self::Processing,
            FulfillmentStatus::Shipped => Self::Shipped,
            FulfillmentStatus::Delivered => Self::Delivered,
            FulfillmentStatus::Cancelled => Self::Cancelled,
        }
    }
}

impl From<CoreFulfillmentStatus> for FulfillmentStatus {
    fn from(status: CoreFulfillmentStatus) -> Self {
        match status {
            CoreFulfillmentStatus::Pending => Self::Pending,
            CoreFulfillmentStatus::Processing => Self::Processing,
            CoreFulfillmentStatus::Shipped => Self::Shipped,
            CoreFulfillmentStatus::Delivered => Self::Delivered,
            CoreFulfillmentStatus::Cancelled => Self::Cancelled,
        }
    }
}

impl From<AuditAction> for EventAction {
    fn from(action: AuditAction) -> Self {
        match action {
            AuditAction::Created => Self::Created,
            AuditAction::Updated => Self::Updated,
            AuditAction::Deleted => Self::Deleted,
        }
    }
}

impl From<EventAction> for AuditAction {
    fn from(action: EventAction) -> Self {
        match action {
            EventAction::Created => Self::Created,
            EventAction::Updated => Self::Updated,
            EventAction::Deleted => Self::Deleted,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::Iterable;

    #[test]
    fn test_status_conversions_roundtrip() {
        for status in CoreOrderStatus::ALL {
            assert_eq!(CoreOrderStatus::from(OrderStatus::from(status)), status);
        }
        for status in CoreInvoiceStatus::ALL {
            assert_eq!(CoreInvoiceStatus::from(InvoiceStatus::from(status)), status);
        }
        for status in CoreFulfillmentStatus::ALL {
            assert_eq!(
                CoreFulfillmentStatus::from(FulfillmentStatus::from(status)),
                status
            );
        }
    }

    #[test]
    fn test_string_values_match_core() {
        for status in OrderStatus::iter() {
            assert_eq!(status.to_value(), CoreOrderStatus::from(status).as_str());
        }
        for status in FulfillmentStatus::iter() {
            assert_eq!(
                status.to_value(),
                CoreFulfillmentStatus::from(status).as_str()
            );
        }
    }
}
