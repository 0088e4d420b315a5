//! Grouping and summation over enriched records.
//!
//! The distinction between "summed to zero" and "no rows at all" matters
//! here: a comuna with no rows for a stratum group keeps `None`, which the
//! presentation renders as not applicable, never as 0%.

use crate::enrich::{EnrichedRecord, StratumGroup};
use crate::resolver::{ComunaResolver, UNKNOWN_DISTRICT};
use crate::types::{Count, Money};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Which stratum groups a view wants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StratumFilter {
    All,
    LowStratum,
    HighStratum,
}

impl StratumFilter {
    pub fn accepts(self, group: StratumGroup) -> bool {
        match self {
            Self::All => true,
            Self::LowStratum => group == StratumGroup::Low,
            Self::HighStratum => group == StratumGroup::High,
        }
    }
}

impl Default for StratumFilter {
    fn default() -> Self {
        Self::All
    }
}

/// Summed figures for one comuna and stratum group.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StratumSummary {
    pub budget_total: Money,
    pub budget_remaining: Money,
    pub accumulated_legalized: Money,
    pub user_count: Count,
}

impl StratumSummary {
    pub fn consumed(&self) -> Money {
        self.budget_total.saturating_sub(self.budget_remaining)
    }

    pub fn utilization_pct(&self) -> f64 {
        utilization_pct(self.budget_total, self.budget_remaining)
    }
}

/// (consumed / total) x 100. An empty allocation is pinned to 0 rather than
/// a division error; the result is never clamped from above, an overshoot
/// must stay visible.
pub fn utilization_pct(total: Money, remaining: Money) -> f64 {
    if total == 0 {
        return 0.0;
    }
    total.saturating_sub(remaining) as f64 / total as f64 * 100.0
}

/// One trust fund inside a comuna and stratum group, for card display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrustRow {
    pub trust_id: String,
    pub budget_total: Money,
    pub budget_remaining: Money,
}

impl TrustRow {
    pub fn consumed(&self) -> Money {
        self.budget_total.saturating_sub(self.budget_remaining)
    }

    pub fn utilization_pct(&self) -> f64 {
        utilization_pct(self.budget_total, self.budget_remaining)
    }
}

/// Everything the grid needs for one comuna. A stratum group with no rows
/// keeps `None`, never a zeroed summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComunaAggregate {
    pub base_name: String,
    pub district_number: String,
    pub low_summary: Option<StratumSummary>,
    pub low_trusts: Vec<TrustRow>,
    pub high_summary: Option<StratumSummary>,
    pub high_trusts: Vec<TrustRow>,
}

/// Group enriched rows into per-comuna aggregates.
///
/// Rows failing `filter` drop out before grouping, so a filtered view shows
/// the excluded stratum group as not applicable. Output is ordered by
/// district number ascending; comunas whose number cannot be resolved sort
/// last. Trust rows inside each group are ordered by allocation, largest
/// first.
pub fn aggregate(
    resolver: &ComunaResolver,
    rows: &[EnrichedRecord],
    filter: StratumFilter,
) -> Vec<ComunaAggregate> {
    let mut by_comuna: BTreeMap<&str, (Vec<&EnrichedRecord>, Vec<&EnrichedRecord>)> =
        BTreeMap::new();
    for row in rows {
        if !filter.accepts(row.stratum) {
            continue;
        }
        let slot = by_comuna.entry(row.comuna_base_name.as_str()).or_default();
        match row.stratum {
            StratumGroup::Low => slot.0.push(row),
            StratumGroup::High => slot.1.push(row),
        }
    }

    let mut out: Vec<ComunaAggregate> = by_comuna
        .into_iter()
        .map(|(name, (low, high))| {
            let (low_summary, low_trusts) = summarize_group(&low);
            let (high_summary, high_trusts) = summarize_group(&high);
            ComunaAggregate {
                district_number: resolver.district_number(name),
                base_name: name.to_string(),
                low_summary,
                low_trusts,
                high_summary,
                high_trusts,
            }
        })
        .collect();

    // Stable sort on top of the alphabetical grouping keeps ties
    // deterministic.
    out.sort_by_key(|agg| district_rank(&agg.district_number));
    out
}

/// Sort rank for a resolved district number; the unknown code ranks 99,
/// after every real district.
fn district_rank(number: &str) -> u32 {
    if number == UNKNOWN_DISTRICT {
        return 99;
    }
    number.parse().unwrap_or(99)
}

fn summarize_group(rows: &[&EnrichedRecord]) -> (Option<StratumSummary>, Vec<TrustRow>) {
    if rows.is_empty() {
        return (None, Vec::new());
    }
    let mut summary = StratumSummary::default();
    let mut trusts: Vec<TrustRow> = Vec::with_capacity(rows.len());
    for row in rows {
        summary.budget_total += row.budget_total;
        summary.budget_remaining += row.budget_remaining;
        summary.accumulated_legalized += row.accumulated_legalized;
        summary.user_count += row.user_count;
        trusts.push(TrustRow {
            trust_id: row.trust_id.clone(),
            budget_total: row.budget_total,
            budget_remaining: row.budget_remaining,
        });
    }
    trusts.sort_by(|a, b| b.budget_total.cmp(&a.budget_total));
    (Some(summary), trusts)
}

/// Dashboard-wide totals across every enriched record.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GlobalSummary {
    pub total_budget: Money,
    pub total_remaining: Money,
    pub total_users: Count,
    pub comuna_count: usize,
    pub trust_count: usize,
    pub low_trust_count: usize,
    pub high_trust_count: usize,
}

impl GlobalSummary {
    pub fn total_consumed(&self) -> Money {
        self.total_budget.saturating_sub(self.total_remaining)
    }

    pub fn utilization_pct(&self) -> f64 {
        utilization_pct(self.total_budget, self.total_remaining)
    }
}

pub fn global_summary(rows: &[EnrichedRecord]) -> GlobalSummary {
    let mut summary = GlobalSummary::default();
    let mut comunas: BTreeSet<&str> = BTreeSet::new();
    let mut trusts: BTreeSet<&str> = BTreeSet::new();
    let mut low_trusts: BTreeSet<&str> = BTreeSet::new();
    let mut high_trusts: BTreeSet<&str> = BTreeSet::new();

    for row in rows {
        summary.total_budget += row.budget_total;
        summary.total_remaining += row.budget_remaining;
        summary.total_users += row.user_count;
        comunas.insert(row.comuna_display_name.as_str());
        trusts.insert(row.trust_id.as_str());
        match row.stratum {
            StratumGroup::Low => low_trusts.insert(row.trust_id.as_str()),
            StratumGroup::High => high_trusts.insert(row.trust_id.as_str()),
        };
    }

    summary.comuna_count = comunas.len();
    summary.trust_count = trusts.len();
    summary.low_trust_count = low_trusts.len();
    summary.high_trust_count = high_trusts.len();
    summary
}

/// Legalized-user split across the two stratum groups.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StratumBreakdown {
    pub low_users: Count,
    pub high_users: Count,
}

impl StratumBreakdown {
    pub fn total(&self) -> Count {
        self.low_users + self.high_users
    }

    pub fn low_share_pct(&self) -> f64 {
        share_pct(self.low_users, self.total())
    }

    pub fn high_share_pct(&self) -> f64 {
        share_pct(self.high_users, self.total())
    }
}

pub fn stratum_breakdown(rows: &[EnrichedRecord]) -> StratumBreakdown {
    let mut breakdown = StratumBreakdown::default();
    for row in rows {
        match row.stratum {
            StratumGroup::Low => breakdown.low_users += row.user_count,
            StratumGroup::High => breakdown.high_users += row.user_count,
        }
    }
    breakdown
}

fn share_pct(part: Count, total: Count) -> f64 {
    if total == 0 {
        return 0.0;
    }
    part as f64 / total as f64 * 100.0
}
