use orderdesk_core::values::PersonName;
use orderdesk_db::entities::customers;
use serde::Serialize;
use uuid::Uuid;

use super::timestamp;

/// A customer with display name.
#[derive(Debug, Serialize)]
pub struct CustomerResponse {
    /// Customer ID.
    pub id: Uuid,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// "First Last".
    pub full_name: String,
    /// Two-letter initials.
    pub initials: String,
    /// Email address.
    pub email: String,
    /// Phone number.
    pub phone: Option<String>,
    /// Company name.
    pub company_name: Option<String>,
    /// Street address.
    pub address_line1: Option<String>,
    /// Address complement.
    pub address_line2: Option<String>,
    /// Postal code.
    pub postal_code: Option<String>,
    /// City.
    pub city: Option<String>,
    /// Country code.
    pub country: Option<String>,
    /// Created at timestamp.
    pub created_at: String,
    /// Updated at timestamp.
    pub updated_at: String,
}

impl From<customers::Model> for CustomerResponse {
    fn from(customer: customers::Model) -> Self {
        let name = PersonName::new(&customer.first_name, &customer.last_name);
        Self {
            id: customer.id,
            full_name: name.full_name(),
            initials: name.initials(),
            first_name: customer.first_name,
            last_name: customer.last_name,
            email: customer.email,
            phone: customer.phone,
            company_name: customer.company_name,
            address_line1: customer.address_line1,
            address_line2: customer.address_line2,
            postal_code: customer.postal_code,
            city: customer.city,
            country: customer.country,
            created_at: timestamp(&customer.created_at),
            updated_at: timestamp(&customer.updated_at),
        }
    }
}
