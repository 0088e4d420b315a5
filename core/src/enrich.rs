//! Row enrichment: raw source cells to typed records.
//!
//! A malformed cell must never take the page down. Every numeric field is
//! coerced: parse failures, NULLs, and negative values all land on 0.

use crate::resolver::{base_name, canonical_display_name};
use crate::types::{Count, Money};
use serde::{Deserialize, Serialize};

/// One source row exactly as fetched, every value still raw text.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawRecord {
    pub comuna_code: String,
    pub trust_id: String,
    pub budget_total: Option<String>,
    pub budget_remaining: Option<String>,
    pub accumulated_legalized: Option<String>,
    pub user_count: Option<String>,
}

/// Stratum grouping encoded in the comuna code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StratumGroup {
    Low,
    High,
}

impl StratumGroup {
    /// Codes containing "123" anywhere are low-stratum; everything else,
    /// malformed codes included, counts as high-stratum. Substring, not
    /// suffix: kept exactly as the upstream encoding has always been
    /// interpreted.
    pub fn classify(comuna_code: &str) -> Self {
        if comuna_code.contains("123") {
            Self::Low
        } else {
            Self::High
        }
    }

    /// Filter and table heading label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Low => "Estratos 1, 2 y 3",
            Self::High => "Estratos 4, 5 y 6",
        }
    }

    /// Short range used on card headings ("ESTRATOS 1-3").
    pub fn range_label(self) -> &'static str {
        match self {
            Self::Low => "1-3",
            Self::High => "4-6",
        }
    }
}

/// A raw record plus the derived columns the rest of the pipeline works
/// with. Exactly one per fetched row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnrichedRecord {
    pub comuna_code: String,
    pub trust_id: String,
    pub budget_total: Money,
    pub budget_remaining: Money,
    pub accumulated_legalized: Money,
    pub user_count: Count,
    pub stratum: StratumGroup,
    pub comuna_display_name: String,
    pub comuna_base_name: String,
}

/// Coerce a raw cell to a non-negative integer. NULL, garbage text, and
/// negative values all become 0.
pub fn coerce_amount(raw: Option<&str>) -> u64 {
    let Some(text) = raw else { return 0 };
    match text.trim().parse::<f64>() {
        Ok(v) if v.is_finite() && v > 0.0 => v as u64,
        _ => 0,
    }
}

/// Enrich every fetched row, preserving input order.
pub fn enrich(rows: &[RawRecord]) -> Vec<EnrichedRecord> {
    rows.iter().map(enrich_one).collect()
}

fn enrich_one(row: &RawRecord) -> EnrichedRecord {
    let display = canonical_display_name(&row.comuna_code);
    EnrichedRecord {
        comuna_code: row.comuna_code.clone(),
        trust_id: row.trust_id.clone(),
        budget_total: coerce_amount(row.budget_total.as_deref()),
        budget_remaining: coerce_amount(row.budget_remaining.as_deref()),
        accumulated_legalized: coerce_amount(row.accumulated_legalized.as_deref()),
        user_count: coerce_amount(row.user_count.as_deref()),
        stratum: StratumGroup::classify(&row.comuna_code),
        comuna_base_name: base_name(&display),
        comuna_display_name: display,
    }
}
