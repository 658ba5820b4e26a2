//! `Trackable` implementations for the audited entities.

use orderdesk_core::audit::Trackable;
use orderdesk_core::fulfillment::FulfillmentStatus;
use orderdesk_core::invoice::InvoiceStatus;
use orderdesk_core::order::OrderStatus;
use orderdesk_core::values::PersonName;
use uuid::Uuid;

use crate::entities::{customers, fulfillment_services, fulfillments, invoices, orders};

impl Trackable for customers::Model {
    const RESOURCE_TYPE: &'static str = "Customer";

    fn resource_id(&self) -> Uuid {
        self.id
    }

    fn resource_label(&self) -> String {
        let name = PersonName::new(&self.first_name, &self.last_name);
        if name.is_blank() {
            self.email.clone()
        } else {
            name.full_name()
        }
    }

    fn tracked_values(&self) -> Vec<(&'static str, Option<String>)> {
        vec![
            ("first_name", Some(self.first_name.clone())),
            ("last_name", Some(self.last_name.clone())),
            ("email", Some(self.email.clone())),
            ("phone", self.phone.clone()),
            ("company_name", self.company_name.clone()),
            ("city", self.city.clone()),
            ("country", self.country.clone()),
        ]
    }
}

impl Trackable for orders::Model {
    const RESOURCE_TYPE: &'static str = "Order";

    fn resource_id(&self) -> Uuid {
        self.id
    }

    fn resource_label(&self) -> String {
        self.reference.clone()
    }

    fn tracked_values(&self) -> Vec<(&'static str, Option<String>)> {
        vec![
            (
                "status",
                Some(OrderStatus::from(self.status).as_str().to_string()),
            ),
            ("customer_id", self.customer_id.map(|id| id.to_string())),
            ("notes", self.notes.clone()),
            ("total_amount", Some(self.total_amount.to_string())),
        ]
    }
}

impl Trackable for invoices::Model {
    const RESOURCE_TYPE: &'static str = "Invoice";

    fn resource_id(&self) -> Uuid {
        self.id
    }

    fn resource_label(&self) -> String {
        self.number.clone()
    }

    fn tracked_values(&self) -> Vec<(&'static str, Option<String>)> {
        vec![
            (
                "status",
                Some(InvoiceStatus::from(self.status).as_str().to_string()),
            ),
            ("due_on", Some(self.due_on.to_string())),
        ]
    }
}

impl Trackable for fulfillment_services::Model {
    const RESOURCE_TYPE: &'static str = "FulfillmentService";

    fn resource_id(&self) -> Uuid {
        self.id
    }

    fn resource_label(&self) -> String {
        self.name.clone()
    }

    fn tracked_values(&self) -> Vec<(&'static str, Option<String>)> {
        vec![
            ("name", Some(self.name.clone())),
            ("carrier", self.carrier.clone()),
            ("active", Some(self.active.to_string())),
        ]
    }
}

impl Trackable for fulfillments::Model {
    const RESOURCE_TYPE: &'static str = "Fulfillment";

    fn resource_id(&self) -> Uuid {
        self.id
    }

    fn resource_label(&self) -> String {
        let short: String = self.id.simple().to_string().chars().take(8).collect();
        format!("#{short}")
    }

    fn tracked_values(&self) -> Vec<(&'static str, Option<String>)> {
        vec![
            (
                "status",
                Some(FulfillmentStatus::from(self.status).as_str().to_string()),
            ),
            ("tracking_number", self.tracking_number.clone()),
            ("carrier", self.carrier.clone()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::sea_orm_active_enums;
    use chrono::Utc;
    use orderdesk_core::audit::{AuditEntry, changes_between};
    use rust_decimal_macros::dec;

    fn order() -> orders::Model {
        let now = Utc::now().into();
        orders::Model {
            id: Uuid::now_v7(),
            account_id: Uuid::now_v7(),
            customer_id: None,
            reference: "ORD-000001".to_string(),
            status: sea_orm_active_enums::OrderStatus::Pending,
            currency: "EUR".to_string(),
            total_amount: dec!(10.00),
            notes: None,
            cancellation_reason: None,
            validated_at: None,
            invoiced_at: None,
            cancelled_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_order_status_change_is_tracked() {
        let before = order();
        let mut after = before.clone();
        after.status = sea_orm_active_enums::OrderStatus::Validated;
        after.updated_at = Utc::now().into();

        let changes = changes_between(&before, &after);
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].field, "status");
        assert_eq!(changes[0].old_value.as_deref(), Some("pending"));
        assert_eq!(changes[0].new_value.as_deref(), Some("validated"));
    }

    #[test]
    fn test_untracked_order_fields_are_ignored() {
        let before = order();
        let mut after = before.clone();
        after.cancellation_reason = Some("late".to_string());
        after.currency = "USD".to_string();
        assert!(AuditEntry::updated(&before, &after).is_empty());
    }

    #[test]
    fn test_total_and_notes_changes() {
        let before = order();
        let mut after = before.clone();
        after.total_amount = dec!(12.50);
        after.notes = Some("gift wrap".to_string());

        let entries = AuditEntry::updated(&before, &after);
        let fields: Vec<_> = entries.iter().filter_map(AuditEntry::field).collect();
        assert_eq!(fields, vec!["notes", "total_amount"]);
    }

    #[test]
    fn test_created_message_uses_reference() {
        let entry = AuditEntry::created(&order());
        assert_eq!(entry.message, "Order ORD-000001 created");
    }
}
