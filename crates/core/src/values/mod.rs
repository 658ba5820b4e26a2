//! Value objects shared by the business records.

pub mod person_name;
pub mod tracking;

pub use person_name::PersonName;
pub use tracking::{TRACKING_NUMBER_PLACEHOLDER, TrackingInfo, validate_tracking_template};
