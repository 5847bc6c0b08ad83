//! Alert processing stages: text normalization, price extraction, search
//! query generation, and profitability evaluation.

pub mod evaluator;
pub mod extractor;
pub mod normalizer;
pub mod query;

pub use evaluator::*;
pub use extractor::*;
pub use normalizer::*;
pub use query::*;
