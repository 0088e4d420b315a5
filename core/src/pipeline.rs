//! End-to-end render cycles: fetch, enrich, aggregate, format, render.
//!
//! RULE: failures stay local to the cycle. An unreachable data source
//! reports `Unavailable`, an empty period reports `NoData`, and neither
//! ends the process.

use chrono::{DateTime, FixedOffset};
use log::{debug, error, info, warn};

use crate::aggregate::{self, ComunaAggregate, GlobalSummary, StratumBreakdown, StratumFilter};
use crate::citas::{self, CitaRow, CitaShaper, CitaStats};
use crate::clock;
use crate::config::PanelConfig;
use crate::enrich::{self, EnrichedRecord};
use crate::error::PanelResult;
use crate::export;
use crate::render;
use crate::resolver::ComunaResolver;
use crate::state::PanelState;
use crate::store::PanelStore;
use crate::tables::{self, ComunaMetrics, DetailRow, SummaryRow};
use crate::types::Period;

/// What one render cycle produced.
pub enum PanelView {
    /// Rows were fetched and the panel rendered.
    Ready(Box<RenderedPanel>),
    /// The query succeeded but the period has no rows.
    NoData { period: Period },
    /// The data source could not be reached or queried.
    Unavailable { detail: String },
}

/// A rendered panel plus the aggregates behind it.
pub struct RenderedPanel {
    pub html:          String,
    pub summary:       GlobalSummary,
    pub breakdown:     StratumBreakdown,
    pub comunas:       Vec<ComunaAggregate>,
    pub summary_table: Vec<SummaryRow>,
    pub generated_at:  DateTime<FixedOffset>,
}

/// Narrowing applied to a cycle: a stratum group, a single comuna, or
/// both.
#[derive(Debug, Clone, Default)]
pub struct ViewOptions {
    pub stratum: StratumFilter,
    pub comuna:  Option<String>,
}

/// Run one full cycle against the store, reusing cached rows while they
/// are fresh.
pub fn render_cycle(
    store: &PanelStore,
    config: &PanelConfig,
    resolver: &ComunaResolver,
    state: &mut PanelState,
    options: &ViewOptions,
) -> PanelView {
    let rows = match fetch_enriched(store, config, state) {
        Ok(rows) => rows,
        Err(e) => {
            error!("Budget fetch failed: {e}");
            return PanelView::Unavailable {
                detail: e.to_string(),
            };
        }
    };

    if rows.is_empty() {
        info!("Period {} returned no rows", config.period);
        return PanelView::NoData {
            period: config.period,
        };
    }
    debug!("{} rows fetched for period {}", rows.len(), config.period);

    let scoped = apply_comuna_filter(rows, options);
    let comunas = aggregate::aggregate(resolver, &scoped, options.stratum);
    let summary_table = tables::summary_rows(&scoped, options.stratum);
    let visible: Vec<EnrichedRecord> = scoped
        .into_iter()
        .filter(|r| options.stratum.accepts(r.stratum))
        .collect();
    let summary = aggregate::global_summary(&visible);
    let breakdown = aggregate::stratum_breakdown(&visible);

    let generated_at = clock::bogota_now();
    let html = render::render_panel(
        &comunas,
        &summary,
        &breakdown,
        &clock::format_stamp(generated_at),
    );
    state.last_refresh = generated_at;

    PanelView::Ready(Box::new(RenderedPanel {
        html,
        summary,
        breakdown,
        comunas,
        summary_table,
        generated_at,
    }))
}

/// One comuna's drill-down: headline figures, the trust table and its
/// CSV, ready to hand out.
pub struct DetailView {
    pub display_name: String,
    pub metrics:      ComunaMetrics,
    pub rows:         Vec<DetailRow>,
    pub filename:     String,
    pub csv:          String,
}

/// Build the detail view for one comuna display name. `None` when the
/// name matches no rows of the period.
pub fn detail_view(
    store: &PanelStore,
    config: &PanelConfig,
    state: &mut PanelState,
    display_name: &str,
) -> PanelResult<Option<DetailView>> {
    let rows = fetch_enriched(store, config, state)?;
    let Some(metrics) = tables::comuna_metrics(&rows, display_name) else {
        warn!("No rows for comuna '{display_name}'");
        return Ok(None);
    };
    let detail = tables::detail_rows(&rows, display_name);
    let csv = export::detail_csv(&detail)?;
    Ok(Some(DetailView {
        display_name: display_name.to_string(),
        metrics,
        rows: detail,
        filename: export::detail_filename(display_name),
        csv,
    }))
}

/// A citas lookup result: shaped rows, attendance stats and the CSV
/// download.
#[derive(Debug)]
pub struct CitasView {
    pub documento: String,
    pub principal: Option<(String, String)>,
    pub rows:      Vec<CitaRow>,
    pub stats:     CitaStats,
    pub filename:  String,
    pub csv:       String,
}

/// Look up citas by document id. The id is validated before any query
/// runs; an id that matches nothing yields a view with zero rows.
pub fn citas_view(
    store: &PanelStore,
    shaper: &CitaShaper,
    state: &mut PanelState,
    documento: &str,
) -> PanelResult<CitasView> {
    let documento = citas::validate_documento(documento)?;
    let raw = store.fetch_citas(&documento)?;
    let rows = shaper.shape(&raw);
    let stats = citas::cita_stats(&rows);
    let filename = export::citas_filename(&documento, clock::bogota_now());
    let csv = export::citas_csv(&rows)?;
    state.store_citas(&documento, rows.clone());
    Ok(CitasView {
        principal: citas::principal(&rows),
        documento,
        rows,
        stats,
        filename,
        csv,
    })
}

fn fetch_enriched(
    store: &PanelStore,
    config: &PanelConfig,
    state: &mut PanelState,
) -> PanelResult<Vec<EnrichedRecord>> {
    state.cache.fetch(|| {
        let raw = store.fetch_period_rows(&config.table, config.period)?;
        Ok(enrich::enrich(&raw))
    })
}

/// Narrow rows to one comuna base name. An unknown name logs a warning
/// and falls back to the full set, so the panel never goes blank over a
/// bad selection.
fn apply_comuna_filter(rows: Vec<EnrichedRecord>, options: &ViewOptions) -> Vec<EnrichedRecord> {
    let Some(name) = options.comuna.as_deref() else {
        return rows;
    };
    let scoped: Vec<EnrichedRecord> = rows
        .iter()
        .filter(|r| r.comuna_base_name == name)
        .cloned()
        .collect();
    if scoped.is_empty() {
        warn!("No rows for comuna '{name}', showing every comuna");
        return rows;
    }
    scoped
}
