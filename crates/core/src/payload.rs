//! Inbound alert payloads and the text fragments price extraction reads.

use compact_str::CompactString;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Labelled name/value pair inside an alert.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AlertField {
    pub name: CompactString,
    pub value: String,
}

impl AlertField {
    pub fn new(name: &str, value: &str) -> Self {
        Self {
            name: CompactString::new(name),
            value: value.to_string(),
        }
    }
}

/// A deal alert as received from the ingest endpoint.
///
/// Only the title is required. Everything else deserializes leniently:
/// absent members become `None` or empty rather than a rejection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AlertPayload {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub footer: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<AlertField>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

/// Payload rejection reasons surfaced at the ingest boundary.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PayloadError {
    #[error("alert payload requires a non-empty title")]
    MissingTitle,
}

/// How a fragment participates in price extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FragmentRole {
    /// Label mentions a price; scanned before everything else.
    PriceLabeled,
    /// Ordinary text, scanned in natural order.
    Plain,
    /// Derived or estimated value (resell notices); never scanned.
    Derived,
}

/// One labelled piece of alert text.
#[derive(Debug, Clone)]
pub struct Fragment {
    pub label: CompactString,
    pub text: String,
    pub role: FragmentRole,
}

impl Fragment {
    fn new(label: &str, text: &str) -> Self {
        Self {
            label: CompactString::new(label),
            text: text.to_string(),
            role: classify(label, text),
        }
    }
}

/// Derived markers win over price labels: a "Resell Price" field carries an
/// estimate, not a purchase price.
fn classify(label: &str, text: &str) -> FragmentRole {
    let label_lower = label.to_lowercase();
    let text_lower = text.to_lowercase();
    for marker in ["notice", "resell"] {
        if label_lower.contains(marker) || text_lower.contains(marker) {
            return FragmentRole::Derived;
        }
    }
    if label_lower.contains("price") {
        return FragmentRole::PriceLabeled;
    }
    FragmentRole::Plain
}

impl AlertPayload {
    /// Reject payloads without a usable title.
    pub fn validate(&self) -> Result<(), PayloadError> {
        if self.title.trim().is_empty() {
            return Err(PayloadError::MissingTitle);
        }
        Ok(())
    }

    /// Collect the payload's text as ordered, role-tagged fragments.
    ///
    /// Natural order is title, description, fields, footer. Price-labelled
    /// fragments are promoted to the front (stable within each group), so a
    /// field explicitly named "Price" beats earlier text that merely
    /// contains a currency symbol.
    pub fn fragments(&self) -> Vec<Fragment> {
        let mut fragments = Vec::with_capacity(self.fields.len() + 3);
        fragments.push(Fragment::new("title", &self.title));
        if let Some(description) = &self.description {
            fragments.push(Fragment::new("description", description));
        }
        for field in &self.fields {
            fragments.push(Fragment::new(&field.name, &field.value));
        }
        if let Some(footer) = &self.footer {
            fragments.push(Fragment::new("footer", footer));
        }
        fragments.sort_by_key(|fragment| fragment.role != FragmentRole::PriceLabeled);
        fragments
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample_payload() -> AlertPayload {
        AlertPayload {
            title: "Pokémon Booster Box".to_string(),
            description: Some("Back in stock at £45".to_string()),
            fields: vec![
                AlertField::new("Status", "In stock"),
                AlertField::new("Price", "£45.00"),
                AlertField::new("Resell Notice", "Sells for £80"),
            ],
            footer: Some("store-watch".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_validate() {
        assert!(sample_payload().validate().is_ok());

        let empty = AlertPayload::default();
        assert_eq!(empty.validate(), Err(PayloadError::MissingTitle));

        let blank = AlertPayload {
            title: "   ".to_string(),
            ..Default::default()
        };
        assert_eq!(blank.validate(), Err(PayloadError::MissingTitle));
    }

    #[test]
    fn test_fragment_roles() {
        let fragments = sample_payload().fragments();
        let by_label = |label: &str| {
            fragments
                .iter()
                .find(|f| f.label == label)
                .map(|f| f.role)
        };

        assert_eq!(by_label("Price"), Some(FragmentRole::PriceLabeled));
        assert_eq!(by_label("Status"), Some(FragmentRole::Plain));
        assert_eq!(by_label("Resell Notice"), Some(FragmentRole::Derived));
        assert_eq!(by_label("title"), Some(FragmentRole::Plain));
    }

    #[test]
    fn test_price_label_promoted_to_front() {
        let fragments = sample_payload().fragments();
        assert_eq!(fragments[0].label, "Price");
        assert_eq!(fragments[0].text, "£45.00");
    }

    #[test]
    fn test_natural_order_within_plain_group() {
        let fragments = sample_payload().fragments();
        let plain: Vec<&str> = fragments
            .iter()
            .filter(|f| f.role == FragmentRole::Plain)
            .map(|f| f.label.as_str())
            .collect();
        assert_eq!(plain, vec!["title", "description", "Status", "footer"]);
    }

    #[test]
    fn test_derived_text_marker() {
        let payload = AlertPayload {
            title: "Some product".to_string(),
            description: Some("Great to resell at £90".to_string()),
            ..Default::default()
        };
        let fragments = payload.fragments();
        assert_eq!(fragments[1].role, FragmentRole::Derived);
    }

    #[test]
    fn test_lenient_deserialize() {
        let payload: AlertPayload =
            serde_json::from_str(r#"{"title": "Some Deal"}"#).unwrap();
        assert_eq!(payload.title, "Some Deal");
        assert_eq!(payload.description, None);
        assert!(payload.fields.is_empty());

        let with_fields: AlertPayload = serde_json::from_str(
            r#"{"title": "Deal", "fields": [{"name": "Price", "value": "£9.99"}]}"#,
        )
        .unwrap();
        assert_eq!(with_fields.fields.len(), 1);
        assert_eq!(with_fields.fields[0].name, "Price");
    }
}
