//! End-to-end tests against an in-memory store: render cycles, cache
//! behavior, the detail and citas views.

use std::time::Duration;

use panel_core::aggregate::StratumFilter;
use panel_core::citas::{CitaShaper, RawCita};
use panel_core::config::PanelConfig;
use panel_core::enrich::RawRecord;
use panel_core::error::PanelError;
use panel_core::pipeline::{citas_view, detail_view, render_cycle, PanelView, ViewOptions};
use panel_core::resolver::ComunaResolver;
use panel_core::state::PanelState;
use panel_core::store::PanelStore;

fn budget_record(code: &str, trust: &str, budget: u64, remaining: u64, users: u64) -> RawRecord {
    RawRecord {
        comuna_code: code.to_string(),
        trust_id: trust.to_string(),
        budget_total: Some(budget.to_string()),
        budget_remaining: Some(remaining.to_string()),
        accumulated_legalized: Some("0".to_string()),
        user_count: Some(users.to_string()),
    }
}

/// Migrated in-memory store with one low-stratum and one high-stratum
/// comuna in the configured period.
fn seeded_store() -> (PanelStore, PanelConfig) {
    let store = PanelStore::in_memory().unwrap();
    store.migrate().unwrap();
    let config = PanelConfig::default_test();
    store
        .insert_budget_row(&config.table, &budget_record("13123", "F1", 1000, 400, 10), config.period)
        .unwrap();
    store
        .insert_budget_row(&config.table, &budget_record("16456", "F2", 2000, 1500, 4), config.period)
        .unwrap();
    (store, config)
}

/// State that refetches on every cycle.
fn uncached_state() -> PanelState {
    PanelState::new(Duration::ZERO)
}

fn rendered(view: PanelView) -> panel_core::pipeline::RenderedPanel {
    match view {
        PanelView::Ready(panel) => *panel,
        PanelView::NoData { period } => panic!("expected a panel, period {period} had no data"),
        PanelView::Unavailable { detail } => panic!("expected a panel, source failed: {detail}"),
    }
}

/// A seeded period renders both comunas with dashboard totals.
#[test]
fn cycle_renders_seeded_period() {
    let (store, config) = seeded_store();
    let mut state = uncached_state();
    let resolver = ComunaResolver::new();

    let panel = rendered(render_cycle(
        &store,
        &config,
        &resolver,
        &mut state,
        &ViewOptions::default(),
    ));

    assert_eq!(panel.comunas.len(), 2);
    assert_eq!(panel.summary.trust_count, 2);
    assert_eq!(panel.summary.total_budget, 3000);
    assert_eq!(panel.summary_table.len(), 2);
    assert!(panel.html.contains("SAN JAVIER"));
    assert!(panel.html.contains("BELEN"));
}

/// A period with no rows reports NoData instead of an empty panel.
#[test]
fn cycle_reports_no_data() {
    let store = PanelStore::in_memory().unwrap();
    store.migrate().unwrap();
    let config = PanelConfig::default_test();
    let mut state = uncached_state();
    let resolver = ComunaResolver::new();

    let view = render_cycle(&store, &config, &resolver, &mut state, &ViewOptions::default());
    assert!(matches!(view, PanelView::NoData { period } if period == config.period));
}

/// A store without the schema reports Unavailable; the cycle never
/// panics over a broken source.
#[test]
fn cycle_reports_unavailable_source() {
    let store = PanelStore::in_memory().unwrap();
    let config = PanelConfig::default_test();
    let mut state = uncached_state();
    let resolver = ComunaResolver::new();

    let view = render_cycle(&store, &config, &resolver, &mut state, &ViewOptions::default());
    assert!(matches!(view, PanelView::Unavailable { .. }));
}

/// Narrowing to one comuna scopes panel and stats to its rows.
#[test]
fn comuna_filter_scopes_the_cycle() {
    let (store, config) = seeded_store();
    let mut state = uncached_state();
    let resolver = ComunaResolver::new();
    let options = ViewOptions {
        stratum: StratumFilter::All,
        comuna: Some("SAN JAVIER".to_string()),
    };

    let panel = rendered(render_cycle(&store, &config, &resolver, &mut state, &options));
    assert_eq!(panel.comunas.len(), 1);
    assert_eq!(panel.summary.total_budget, 1000);
    assert_eq!(panel.summary_table.len(), 1);
}

/// An unknown comuna name falls back to the full set instead of a blank
/// panel.
#[test]
fn unknown_comuna_falls_back_to_all() {
    let (store, config) = seeded_store();
    let mut state = uncached_state();
    let resolver = ComunaResolver::new();
    let options = ViewOptions {
        stratum: StratumFilter::All,
        comuna: Some("NO EXISTE".to_string()),
    };

    let panel = rendered(render_cycle(&store, &config, &resolver, &mut state, &options));
    assert_eq!(panel.comunas.len(), 2);
}

/// A stratum filter narrows both the grid and the headline stats.
#[test]
fn stratum_filter_scopes_stats() {
    let (store, config) = seeded_store();
    let mut state = uncached_state();
    let resolver = ComunaResolver::new();
    let options = ViewOptions {
        stratum: StratumFilter::LowStratum,
        comuna: None,
    };

    let panel = rendered(render_cycle(&store, &config, &resolver, &mut state, &options));
    assert_eq!(panel.comunas.len(), 1, "the high-only comuna drops out");
    assert_eq!(panel.summary.total_budget, 1000);
    assert_eq!(panel.breakdown.high_users, 0);
    assert_eq!(panel.breakdown.low_users, 10);
}

/// Within the TTL a cycle reuses cached rows; a manual refresh drops
/// them.
#[test]
fn cache_reuses_rows_until_refresh() {
    let (store, config) = seeded_store();
    let mut state = PanelState::new(Duration::from_secs(3600));
    let resolver = ComunaResolver::new();
    let options = ViewOptions::default();

    let first = rendered(render_cycle(&store, &config, &resolver, &mut state, &options));
    assert_eq!(first.comunas.len(), 2);
    assert!(state.cache.is_fresh());

    store
        .insert_budget_row(&config.table, &budget_record("1123", "F3", 500, 500, 2), config.period)
        .unwrap();

    let second = rendered(render_cycle(&store, &config, &resolver, &mut state, &options));
    assert_eq!(second.comunas.len(), 2, "cached rows must not see the new insert");

    state.refresh_now();
    let third = rendered(render_cycle(&store, &config, &resolver, &mut state, &options));
    assert_eq!(third.comunas.len(), 3, "a forced refresh refetches");
}

/// A zero TTL refetches every cycle.
#[test]
fn zero_ttl_always_refetches() {
    let (store, config) = seeded_store();
    let mut state = uncached_state();
    let resolver = ComunaResolver::new();
    let options = ViewOptions::default();

    rendered(render_cycle(&store, &config, &resolver, &mut state, &options));
    assert!(!state.cache.is_fresh());

    store
        .insert_budget_row(&config.table, &budget_record("1123", "F3", 500, 500, 2), config.period)
        .unwrap();
    let second = rendered(render_cycle(&store, &config, &resolver, &mut state, &options));
    assert_eq!(second.comunas.len(), 3);
}

/// The detail view sums one comuna and ships table plus CSV; an unknown
/// name yields None.
#[test]
fn detail_view_for_one_comuna() {
    let (store, config) = seeded_store();
    let mut state = uncached_state();

    let view = detail_view(&store, &config, &mut state, "13 - SAN JAVIER")
        .unwrap()
        .expect("comuna exists in the period");
    assert_eq!(view.metrics.budget_total, 1000);
    assert_eq!(view.metrics.trust_count, 1);
    assert_eq!(view.rows.len(), 2, "one trust plus the totals line");
    assert_eq!(view.filename, "detalle_13___SAN_JAVIER.csv");
    assert_eq!(view.csv.lines().count(), 3);

    let missing = detail_view(&store, &config, &mut state, "99 - NO EXISTE").unwrap();
    assert!(missing.is_none());
}

/// A malformed document is rejected before any query runs.
#[test]
fn citas_view_rejects_bad_documento() {
    let (store, _) = seeded_store();
    let mut state = uncached_state();
    let shaper = CitaShaper::new();

    let err = citas_view(&store, &shaper, &mut state, "12a34").unwrap_err();
    assert!(matches!(err, PanelError::InvalidDocument { .. }));
}

/// Citas lookup end to end: match by document, order by date, shape for
/// display, remember the result in session state.
#[test]
fn citas_view_round_trip() {
    let (store, _) = seeded_store();
    let mut state = uncached_state();
    let shaper = CitaShaper::new();

    let citas = [
        RawCita {
            nombre: Some("PEREZ GOMEZ JUAN - 123456789".to_string()),
            fecha: Some("2026-09-02".to_string()),
            hora_inicio: Some("14:00:00".to_string()),
            taquilla: Some("TAQ-01".to_string()),
            estado: Some("Programada".to_string()),
        },
        RawCita {
            nombre: Some("PEREZ GOMEZ JUAN - 123456789".to_string()),
            fecha: Some("2026-08-20".to_string()),
            hora_inicio: Some("08:30:00".to_string()),
            taquilla: Some("TAQ-03".to_string()),
            estado: Some("Asistida".to_string()),
        },
        RawCita {
            nombre: Some("RESTREPO LUCIA - 987654321".to_string()),
            fecha: Some("2026-08-21".to_string()),
            hora_inicio: Some("10:15:00".to_string()),
            taquilla: Some("TAQ-02".to_string()),
            estado: Some("No asistida".to_string()),
        },
    ];
    for cita in &citas {
        store.insert_cita(cita).unwrap();
    }

    let view = citas_view(&store, &shaper, &mut state, "123456789").unwrap();

    assert_eq!(view.documento, "123456789");
    assert_eq!(view.rows.len(), 2, "the other holder's cita must not match");
    assert_eq!(view.rows[0].fecha, "20/08/2026", "rows order by date ascending");
    assert_eq!(view.rows[0].hora, "08:30 AM");
    assert_eq!(view.rows[1].fecha, "02/09/2026");
    assert_eq!(
        view.principal,
        Some(("PEREZ GOMEZ JUAN".to_string(), "123456789".to_string()))
    );
    assert_eq!(view.stats.total, 2);
    assert_eq!(view.stats.asistidas, 1);
    assert!(view.filename.starts_with("citas_123456789_"));
    assert!(view.filename.ends_with(".csv"));
    assert!(view.csv.contains("TAQ-03"));

    assert_eq!(state.last_documento, "123456789");
    assert_eq!(state.last_citas.as_ref().map(Vec::len), Some(2));
}

/// A document that matches nothing yields an empty view, not an error.
#[test]
fn citas_view_without_matches() {
    let (store, _) = seeded_store();
    let mut state = uncached_state();
    let shaper = CitaShaper::new();

    let view = citas_view(&store, &shaper, &mut state, "555").unwrap();
    assert!(view.rows.is_empty());
    assert_eq!(view.stats.total, 0);
    assert_eq!(view.principal, None);
}

/// The store hands cells back as raw text and NULLs as absent; the
/// period column isolates reporting periods.
#[test]
fn store_preserves_cells_and_periods() {
    let store = PanelStore::in_memory().unwrap();
    store.migrate().unwrap();
    let config = PanelConfig::default_test();

    let mut odd = budget_record("13123", "F1", 0, 0, 0);
    odd.budget_total = None;
    odd.budget_remaining = Some("abc".to_string());
    store.insert_budget_row(&config.table, &odd, config.period).unwrap();
    store
        .insert_budget_row(&config.table, &budget_record("1123", "F2", 100, 50, 1), config.period - 1)
        .unwrap();

    let rows = store.fetch_period_rows(&config.table, config.period).unwrap();
    assert_eq!(rows.len(), 1, "the other period's row must stay invisible");
    assert_eq!(rows[0].comuna_code, "13123");
    assert_eq!(rows[0].budget_total, None);
    assert_eq!(rows[0].budget_remaining.as_deref(), Some("abc"));

    let earlier = store.fetch_period_rows(&config.table, config.period - 1).unwrap();
    assert_eq!(earlier.len(), 1);
    assert_eq!(earlier[0].comuna_code, "1123");
}
