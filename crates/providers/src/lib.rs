//! Resale data acquisition: the structured search API, the headless-browser
//! fallback, and the aggregation fold that stitches them together.

pub mod aggregator;
pub mod ebay;
pub mod error;
pub mod scrape;
pub mod source;

pub use aggregator::*;
pub use ebay::*;
pub use error::*;
pub use scrape::*;
pub use source::*;
