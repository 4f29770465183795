//! Money arithmetic for budget proposals.
//!
//! [`pricing`] derives the totals shown in the investment section from a
//! [`crate::FormState`]; [`common`] holds rounding, parsing and formatting
//! helpers shared with the collector and the composer.

pub mod common;
pub mod pricing;

pub use pricing::PricingSummary;
