//! Core data types for the flipwatch pipeline.

pub mod currency;
pub mod money;
pub mod payload;
pub mod product;
pub mod rates;
pub mod verdict;

pub use currency::*;
pub use money::*;
pub use payload::*;
pub use product::*;
pub use rates::*;
pub use verdict::*;
