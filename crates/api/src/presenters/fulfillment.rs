use orderdesk_core::fulfillment::FulfillmentStatus;
use orderdesk_core::values::TrackingInfo;
use orderdesk_db::entities::{fulfillment_services, fulfillments};
use serde::Serialize;
use uuid::Uuid;

use super::{StatusView, optional_timestamp, timestamp};

/// A shipment.
#[derive(Debug, Serialize)]
pub struct FulfillmentResponse {
    /// Fulfillment ID.
    pub id: Uuid,
    /// Shipped order.
    pub order_id: Uuid,
    /// Service handling the shipment.
    pub fulfillment_service_id: Option<Uuid>,
    /// Status with label.
    pub status: StatusView,
    /// Carrier name.
    pub carrier: Option<String>,
    /// Tracking number.
    pub tracking_number: Option<String>,
    /// Tracking page.
    pub tracking_url: Option<String>,
    /// e.g. `DHL 00340434`.
    pub tracking_display: Option<String>,
    /// Shipped at timestamp.
    pub shipped_at: Option<String>,
    /// Delivered at timestamp.
    pub delivered_at: Option<String>,
    /// Cancelled at timestamp.
    pub cancelled_at: Option<String>,
    /// Created at timestamp.
    pub created_at: String,
}

impl From<fulfillments::Model> for FulfillmentResponse {
    fn from(fulfillment: fulfillments::Model) -> Self {
        let status = FulfillmentStatus::from(fulfillment.status);
        let tracking_display = fulfillment.tracking_number.as_deref().and_then(|number| {
            TrackingInfo::new(fulfillment.carrier.as_deref(), number)
                .ok()
                .map(|t| t.display())
        });
        Self {
            id: fulfillment.id,
            order_id: fulfillment.order_id,
            fulfillment_service_id: fulfillment.fulfillment_service_id,
            status: StatusView {
                value: status.as_str(),
                label: status.label(),
            },
            tracking_display,
            shipped_at: optional_timestamp(fulfillment.shipped_at.as_ref()),
            delivered_at: optional_timestamp(fulfillment.delivered_at.as_ref()),
            cancelled_at: optional_timestamp(fulfillment.cancelled_at.as_ref()),
            created_at: timestamp(&fulfillment.created_at),
            carrier: fulfillment.carrier,
            tracking_number: fulfillment.tracking_number,
            tracking_url: fulfillment.tracking_url,
        }
    }
}

/// A fulfillment service.
#[derive(Debug, Serialize)]
pub struct FulfillmentServiceResponse {
    /// Service ID.
    pub id: Uuid,
    /// Unique name within the account.
    pub name: String,
    /// Default carrier.
    pub carrier: Option<String>,
    /// URL template with a `{tracking_number}` placeholder.
    pub tracking_url_template: Option<String>,
    /// Whether new fulfillments may use it.
    pub active: bool,
    /// Created at timestamp.
    pub created_at: String,
}

impl From<fulfillment_services::Model> for FulfillmentServiceResponse {
    fn from(service: fulfillment_services::Model) -> Self {
        Self {
            id: service.id,
            created_at: timestamp(&service.created_at),
            name: service.name,
            carrier: service.carrier,
            tracking_url_template: service.tracking_url_template,
            active: service.active,
        }
    }
}
