//! Discord delivery for evaluated deals.
//!
//! This crate provides:
//! - The webhook wire format Discord accepts
//! - Verdict-to-embed rendering
//! - Delivery with timeouts and redacted configuration

pub mod notifier;
pub mod webhook;

pub use notifier::{build_message, NotifierConfig, NotifierError, VerdictNotifier};
pub use webhook::{Embed, EmbedField, EmbedFooter, WebhookMessage};
