//! Parcel tracking information.

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};

/// Placeholder replaced by the tracking number in URL templates.
pub const TRACKING_NUMBER_PLACEHOLDER: &str = "{tracking_number}";

/// Carrier, tracking number and optional tracking URL of a shipment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackingInfo {
    /// Carrier name (e.g. "DHL").
    pub carrier: Option<String>,
    /// Tracking number, never empty.
    pub number: String,
    /// Public tracking page.
    pub url: Option<String>,
}

impl TrackingInfo {
    /// Builds tracking info, trimming inputs.
    ///
    /// # Errors
    /// * `Validation` if the tracking number is blank
    pub fn new(carrier: Option<&str>, number: &str) -> DomainResult<Self> {
        let number = number.trim();
        if number.is_empty() {
            return Err(DomainError::Validation(
                "tracking number must not be empty".to_string(),
            ));
        }
        Ok(Self {
            carrier: carrier
                .map(str::trim)
                .filter(|c| !c.is_empty())
                .map(str::to_string),
            number: number.to_string(),
            url: None,
        })
    }

    /// Fills the tracking URL from a service template.
    #[must_use]
    pub fn with_template(mut self, template: Option<&str>) -> Self {
        if let Some(template) = template.filter(|t| t.contains(TRACKING_NUMBER_PLACEHOLDER)) {
            self.url = Some(template.replace(TRACKING_NUMBER_PLACEHOLDER, &self.number));
        }
        self
    }

    /// Uses an explicit URL, overriding any template.
    #[must_use]
    pub fn with_url(mut self, url: Option<String>) -> Self {
        if let Some(url) = url.filter(|u| !u.trim().is_empty()) {
            self.url = Some(url);
        }
        self
    }

    /// "DHL 00340434", or just the number without a carrier.
    #[must_use]
    pub fn display(&self) -> String {
        match &self.carrier {
            Some(carrier) => format!("{carrier} {}", self.number),
            None => self.number.clone(),
        }
    }
}

/// Checks a tracking URL template contains the placeholder.
///
/// # Errors
/// * `Validation` if the placeholder is missing
pub fn validate_tracking_template(template: &str) -> DomainResult<()> {
    if template.contains(TRACKING_NUMBER_PLACEHOLDER) {
        Ok(())
    } else {
        Err(DomainError::Validation(format!(
            "tracking URL template must contain {TRACKING_NUMBER_PLACEHOLDER}"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_trims_and_rejects_blank() {
        let info = TrackingInfo::new(Some(" DHL "), " 00340434 ").unwrap();
        assert_eq!(info.carrier.as_deref(), Some("DHL"));
        assert_eq!(info.number, "00340434");
        assert!(TrackingInfo::new(Some("DHL"), "   ").is_err());
    }

    #[test]
    fn test_blank_carrier_dropped() {
        let info = TrackingInfo::new(Some(""), "X1").unwrap();
        assert_eq!(info.carrier, None);
        assert_eq!(info.display(), "X1");
    }

    #[test]
    fn test_with_template() {
        let info = TrackingInfo::new(Some("DHL"), "00340434")
            .unwrap()
            .with_template(Some("https://track.example/{tracking_number}?lang=en"));
        assert_eq!(
            info.url.as_deref(),
            Some("https://track.example/00340434?lang=en")
        );
        assert_eq!(info.display(), "DHL 00340434");
    }

    #[test]
    fn test_template_without_placeholder_ignored() {
        let info = TrackingInfo::new(None, "1")
            .unwrap()
            .with_template(Some("https://track.example/"));
        assert_eq!(info.url, None);
    }

    #[test]
    fn test_explicit_url_wins() {
        let info = TrackingInfo::new(None, "1")
            .unwrap()
            .with_template(Some("https://a/{tracking_number}"))
            .with_url(Some("https://b/1".to_string()));
        assert_eq!(info.url.as_deref(), Some("https://b/1"));
    }

    #[test]
    fn test_validate_template() {
        assert!(validate_tracking_template("https://x/{tracking_number}").is_ok());
        assert!(validate_tracking_template("https://x/").is_err());
    }
}
