//! Shared primitive types used across the panel pipeline.

/// Reporting period key (`periodo` in the source table).
pub type Period = u32;

/// Monetary amount in Colombian pesos. The enrichment stage guarantees
/// these are non-negative integers.
pub type Money = u64;

/// A count of people or trust funds.
pub type Count = u64;
