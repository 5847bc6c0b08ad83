//! Normalized product identity.

use serde::{Deserialize, Serialize};

/// Sentinel name used when a title normalizes away to nothing.
pub const UNKNOWN_PRODUCT: &str = "Unknown Product";

/// The cleaned product name plus the raw title it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedProduct {
    pub name: String,
    pub raw_title: String,
}

impl NormalizedProduct {
    /// Build from a cleaned name, substituting the sentinel when cleaning
    /// removed everything. The name is never an empty string.
    pub fn new(name: impl Into<String>, raw_title: impl Into<String>) -> Self {
        let name = name.into();
        let name = if name.trim().is_empty() {
            UNKNOWN_PRODUCT.to_string()
        } else {
            name
        };
        Self {
            name,
            raw_title: raw_title.into(),
        }
    }

    /// Whether the name is a real product name rather than the sentinel.
    pub fn is_known(&self) -> bool {
        self.name != UNKNOWN_PRODUCT
    }
}
