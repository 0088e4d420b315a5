//! panel-runner: headless renderer for the comuna budget panel.
//!
//! Usage:
//!   panel-runner --db panel.db --out ./out
//!   panel-runner --db panel.db --watch 5 --filter 123
//!   panel-runner --db panel.db --detalle "13 - SAN JAVIER"
//!   panel-runner --db panel.db --documento 123456789
//!   panel-runner --db demo.db --demo

use anyhow::{Context, Result};
use panel_core::{
    aggregate::StratumFilter,
    citas::{CitaShaper, RawCita},
    config::PanelConfig,
    enrich::RawRecord,
    export,
    format::format_currency_full,
    pipeline::{self, PanelView, ViewOptions},
    refresh::RefreshDriver,
    resolver::ComunaResolver,
    state::{Page, PanelState},
    store::PanelStore,
};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    if let Some(db) = flag_value(&args, "--db") {
        // --db wins over the environment.
        env::set_var("PANEL_DB_PATH", db);
    }
    let mut config = PanelConfig::from_env()?;
    if let Some(raw) = flag_value(&args, "--period") {
        config.period = raw.parse().with_context(|| format!("Cannot parse --period '{raw}'"))?;
    }

    let out_dir = PathBuf::from(flag_value(&args, "--out").unwrap_or("."));
    fs::create_dir_all(&out_dir)
        .with_context(|| format!("Cannot create output directory {}", out_dir.display()))?;

    println!("panel-runner - Panel de Fiducias por Comuna");
    println!("  db:      {}", config.db_path);
    println!("  table:   {}", config.table);
    println!("  period:  {}", config.period);
    println!("  out:     {}", out_dir.display());
    println!();

    let store = PanelStore::open(&config.db_path)?;
    store.migrate()?;
    if args.iter().any(|a| a == "--demo") {
        seed_demo(&store, &config)?;
        println!("Demo rows seeded into {}", config.db_path);
        println!();
    }

    let mut state = PanelState::new(Duration::from_secs(config.cache_ttl_secs));

    if let Some(documento) = flag_value(&args, "--documento") {
        state.page = Page::Citas;
        return run_citas(&store, &mut state, documento, &out_dir);
    }
    if let Some(display_name) = flag_value(&args, "--detalle") {
        state.page = Page::Detail;
        return run_detail(&store, &config, &mut state, display_name, &out_dir);
    }

    let options = ViewOptions {
        stratum: parse_filter(flag_value(&args, "--filter"))?,
        comuna:  flag_value(&args, "--comuna").map(str::to_string),
    };
    let cycles: u64 = match flag_value(&args, "--watch") {
        Some(raw) => raw.parse().with_context(|| format!("Cannot parse --watch '{raw}'"))?,
        None => 1,
    };

    let resolver = ComunaResolver::new();
    let driver = RefreshDriver::new(Duration::from_secs(config.refresh_secs));
    let mut failure: Option<anyhow::Error> = None;
    driver.run(|index| {
        if index > 0 {
            state.refresh_now();
        }
        match run_panel_cycle(&store, &config, &resolver, &mut state, &options, &out_dir) {
            Ok(()) => index + 1 < cycles,
            Err(e) => {
                failure = Some(e);
                false
            }
        }
    });
    match failure {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

fn run_panel_cycle(
    store: &PanelStore,
    config: &PanelConfig,
    resolver: &ComunaResolver,
    state: &mut PanelState,
    options: &ViewOptions,
    out_dir: &Path,
) -> Result<()> {
    match pipeline::render_cycle(store, config, resolver, state, options) {
        PanelView::Ready(panel) => {
            let html_path = out_dir.join("panel.html");
            fs::write(&html_path, document_shell(&panel.html))
                .with_context(|| format!("Cannot write {}", html_path.display()))?;

            let csv = export::summary_csv(&panel.summary_table)?;
            let csv_path = out_dir.join(export::summary_filename(config.period));
            fs::write(&csv_path, csv)
                .with_context(|| format!("Cannot write {}", csv_path.display()))?;

            log::info!("Panel written to {}", html_path.display());
            println!(
                "{}",
                serde_json::json!({
                    "generated_at": panel.generated_at.to_rfc3339(),
                    "comunas": panel.comunas.len(),
                    "fiducias": panel.summary.trust_count,
                    "presupuesto_total": panel.summary.total_budget,
                    "usuarios": panel.summary.total_users,
                    "html": html_path.display().to_string(),
                })
            );
        }
        PanelView::NoData { period } => {
            println!(
                "No se encontraron datos para el periodo {period}. \
                 Verifique la conexion a la base de datos."
            );
        }
        PanelView::Unavailable { detail } => {
            eprintln!("Error al conectar con la base de datos: {detail}");
        }
    }
    Ok(())
}

fn run_detail(
    store: &PanelStore,
    config: &PanelConfig,
    state: &mut PanelState,
    display_name: &str,
    out_dir: &Path,
) -> Result<()> {
    let Some(view) = pipeline::detail_view(store, config, state, display_name)? else {
        println!("No se encontraron datos para la comuna {display_name}");
        return Ok(());
    };

    println!("{}", view.display_name);
    println!("  presupuesto total: {}", format_currency_full(view.metrics.budget_total));
    println!(
        "  restante:          {} ({:.1}%)",
        format_currency_full(view.metrics.budget_remaining),
        view.metrics.remaining_pct
    );
    println!("  usuarios:          {}", view.metrics.user_count);
    println!("  fiducias:          {}", view.metrics.trust_count);
    println!();
    for row in &view.rows {
        println!(
            "  {}  {}  {}  {}  {}",
            row.fiducia, row.presupuesto_inicial, row.restante, row.consumido, row.usuarios
        );
    }

    let path = out_dir.join(&view.filename);
    fs::write(&path, &view.csv).with_context(|| format!("Cannot write {}", path.display()))?;
    println!();
    println!("CSV: {}", path.display());
    Ok(())
}

fn run_citas(
    store: &PanelStore,
    state: &mut PanelState,
    documento: &str,
    out_dir: &Path,
) -> Result<()> {
    let shaper = CitaShaper::new();
    let view = pipeline::citas_view(store, &shaper, state, documento)?;

    match &view.principal {
        Some((nombre, doc)) => println!("{nombre}  (documento {doc})"),
        None => println!("Documento {}", view.documento),
    }
    println!("  total citas: {}", view.stats.total);
    println!("  asistidas:   {}", view.stats.asistidas);
    println!();

    if view.rows.is_empty() {
        println!("No se encontraron citas para el documento {}", view.documento);
        return Ok(());
    }
    for row in &view.rows {
        println!("  {}  {}  {}  {}", row.fecha, row.hora, row.taquilla, row.estado);
    }

    let path = out_dir.join(&view.filename);
    fs::write(&path, &view.csv).with_context(|| format!("Cannot write {}", path.display()))?;
    println!();
    println!("CSV: {}", path.display());
    Ok(())
}

fn parse_filter(raw: Option<&str>) -> Result<StratumFilter> {
    match raw {
        None => Ok(StratumFilter::All),
        Some("todos") | Some("Todos") => Ok(StratumFilter::All),
        Some("123") => Ok(StratumFilter::LowStratum),
        Some("456") => Ok(StratumFilter::HighStratum),
        Some(other) => anyhow::bail!("Unknown --filter '{other}' (expected 123, 456 or todos)"),
    }
}

fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2).find(|w| w[0] == flag).map(|w| w[1].as_str())
}

fn document_shell(fragment: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"es\">\n<head>\n\
         <meta charset=\"UTF-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n\
         <title>Panel de Fiducias por Comuna</title>\n\
         </head>\n<body style=\"margin:0;background:#f0f2f6;\">\n{fragment}</body>\n</html>\n"
    )
}

fn seed_demo(store: &PanelStore, config: &PanelConfig) -> Result<()> {
    let budget_rows = [
        ("1123", "FID-801", 2_600_000_000u64, 1_450_000_000u64, 380u64, 412u64),
        ("1123", "FID-802", 900_000_000, 120_000_000, 150, 164),
        ("7123", "FID-803", 1_200_000_000, 540_000_000, 210, 230),
        ("7456", "FID-804", 800_000_000, 705_000_000, 40, 52),
        ("13123", "FID-805", 500_000_000, 200_000_000, 260, 288),
        ("16456", "FID-806", 1_750_000_000, 98_000_000, 300, 310),
        ("90123", "FID-807", 350_000_000, 340_000_000, 12, 15),
    ];
    for (code, trust, budget, remaining, legalized, users) in budget_rows {
        let record = RawRecord {
            comuna_code:           code.to_string(),
            trust_id:              trust.to_string(),
            budget_total:          Some(budget.to_string()),
            budget_remaining:      Some(remaining.to_string()),
            accumulated_legalized: Some(legalized.to_string()),
            user_count:            Some(users.to_string()),
        };
        store.insert_budget_row(&config.table, &record, config.period)?;
    }

    let citas = [
        ("PEREZ GOMEZ JUAN - 123456789", "2026-08-20", "08:30:00", "TAQ-03", "Asistida"),
        ("PEREZ GOMEZ JUAN - 123456789", "2026-09-02", "14:00:00", "TAQ-01", "Programada"),
        ("RESTREPO LUCIA - 987654321", "2026-08-21", "10:15:00", "TAQ-02", "No asistida"),
    ];
    for (nombre, fecha, hora, taquilla, estado) in citas {
        store.insert_cita(&RawCita {
            nombre:      Some(nombre.to_string()),
            fecha:       Some(fecha.to_string()),
            hora_inicio: Some(hora.to_string()),
            taquilla:    Some(taquilla.to_string()),
            estado:      Some(estado.to_string()),
        })?;
    }
    Ok(())
}
