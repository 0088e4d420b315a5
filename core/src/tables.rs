//! Tabular views over enriched rows: the comuna summary table and the
//! per-comuna trust detail.
//!
//! Money columns carry the display strings the tables show; CSV export
//! writes the same strings, so table and file always agree.

use std::collections::{BTreeMap, BTreeSet};

use crate::aggregate::{utilization_pct, StratumFilter};
use crate::enrich::EnrichedRecord;
use crate::format::format_currency;
use crate::types::{Count, Money};

/// Label used for the closing totals line of the detail table.
pub const TOTAL_LABEL: &str = "**TOTAL**";

/// One line of the comuna summary table, grouped by base name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryRow {
    pub comuna:               String,
    pub cupos_aprox:          Count,
    pub disponible_fidu:      String,
    pub legalizados:          Count,
    pub acumulado_legal:      Count,
    pub otorgado_proyec:      String,
    pub val_proyec_fidu:      String,
    pub presupuesto_restante: String,
    pub participacion:        String,
}

#[derive(Debug, Clone, Copy, Default)]
struct ComunaTotals {
    budget:    Money,
    remaining: Money,
    users:     Count,
    legalized: Count,
}

/// Build the summary table: one row per comuna base name, alphabetical.
/// Approved quota is users times 1.5 rounded to the nearest integer, and
/// consumption below zero reads as zero.
pub fn summary_rows(rows: &[EnrichedRecord], filter: StratumFilter) -> Vec<SummaryRow> {
    let mut totals: BTreeMap<&str, ComunaTotals> = BTreeMap::new();
    for row in rows.iter().filter(|r| filter.accepts(r.stratum)) {
        let entry = totals.entry(row.comuna_base_name.as_str()).or_default();
        entry.budget += row.budget_total;
        entry.remaining += row.budget_remaining;
        entry.users += row.user_count;
        entry.legalized += row.accumulated_legalized;
    }

    totals
        .into_iter()
        .map(|(comuna, t)| {
            let consumed = t.budget.saturating_sub(t.remaining);
            let pct = utilization_pct(t.budget, t.remaining);
            SummaryRow {
                comuna:               comuna.to_string(),
                cupos_aprox:          (t.users as f64 * 1.5).round() as Count,
                disponible_fidu:      format_currency(Some(t.budget as f64)),
                legalizados:          t.users,
                acumulado_legal:      t.legalized,
                otorgado_proyec:      format_currency(Some(consumed as f64)),
                val_proyec_fidu:      if consumed > 0 { "S" } else { "NO" }.to_string(),
                presupuesto_restante: format_currency(Some(t.remaining as f64)),
                participacion:        format!("{pct:.1} %"),
            }
        })
        .collect()
}

/// One line of the per-comuna trust detail table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailRow {
    pub fiducia:             String,
    pub presupuesto_inicial: String,
    pub restante:            String,
    pub consumido:           String,
    pub usuarios:            Count,
}

/// Distinct display names ("NN - NAME") present in the rows, sorted.
pub fn comuna_display_names(rows: &[EnrichedRecord]) -> Vec<String> {
    let names: BTreeSet<&str> = rows.iter().map(|r| r.comuna_display_name.as_str()).collect();
    names.into_iter().map(str::to_string).collect()
}

/// Detail table for one comuna keyed by its display name: one row per
/// trust in fetch order, closed by a totals line. Empty when the name
/// matches nothing.
pub fn detail_rows(rows: &[EnrichedRecord], display_name: &str) -> Vec<DetailRow> {
    let selected: Vec<&EnrichedRecord> = rows
        .iter()
        .filter(|r| r.comuna_display_name == display_name)
        .collect();
    if selected.is_empty() {
        return Vec::new();
    }

    let mut table: Vec<DetailRow> = selected.iter().map(|r| detail_row(r)).collect();

    let budget: Money = selected.iter().map(|r| r.budget_total).sum();
    let remaining: Money = selected.iter().map(|r| r.budget_remaining).sum();
    let users: Count = selected.iter().map(|r| r.user_count).sum();
    table.push(DetailRow {
        fiducia:             TOTAL_LABEL.to_string(),
        presupuesto_inicial: format_currency(Some(budget as f64)),
        restante:            format_currency(Some(remaining as f64)),
        consumido:           format_currency(Some(budget.saturating_sub(remaining) as f64)),
        usuarios:            users,
    });
    table
}

fn detail_row(row: &EnrichedRecord) -> DetailRow {
    let consumed = row.budget_total.saturating_sub(row.budget_remaining);
    DetailRow {
        fiducia:             row.trust_id.clone(),
        presupuesto_inicial: format_currency(Some(row.budget_total as f64)),
        restante:            format_currency(Some(row.budget_remaining as f64)),
        consumido:           format_currency(Some(consumed as f64)),
        usuarios:            row.user_count,
    }
}

/// Headline figures for one comuna's detail view.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ComunaMetrics {
    pub budget_total:     Money,
    pub budget_remaining: Money,
    pub remaining_pct:    f64,
    pub user_count:       Count,
    pub trust_count:      usize,
}

/// Sum one comuna's figures by display name. `None` when the name matches
/// no rows.
pub fn comuna_metrics(rows: &[EnrichedRecord], display_name: &str) -> Option<ComunaMetrics> {
    let selected: Vec<&EnrichedRecord> = rows
        .iter()
        .filter(|r| r.comuna_display_name == display_name)
        .collect();
    if selected.is_empty() {
        return None;
    }

    let budget_total: Money = selected.iter().map(|r| r.budget_total).sum();
    let budget_remaining: Money = selected.iter().map(|r| r.budget_remaining).sum();
    let trusts: BTreeSet<&str> = selected.iter().map(|r| r.trust_id.as_str()).collect();
    let remaining_pct = if budget_total > 0 {
        budget_remaining as f64 / budget_total as f64 * 100.0
    } else {
        0.0
    };
    Some(ComunaMetrics {
        budget_total,
        budget_remaining,
        remaining_pct,
        user_count: selected.iter().map(|r| r.user_count).sum(),
        trust_count: trusts.len(),
    })
}
