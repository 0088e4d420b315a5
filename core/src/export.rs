//! CSV export of the tabular views.
//!
//! Exports carry the display strings, so a downloaded file reads exactly
//! like the table it came from.

use chrono::{DateTime, FixedOffset};
use csv::Writer;

use crate::citas::CitaRow;
use crate::error::PanelResult;
use crate::tables::{DetailRow, SummaryRow};
use crate::types::Period;

const SUMMARY_HEADER: [&str; 9] = [
    "Comuna",
    "Cupos aprox.",
    "Disponible fidu",
    "Legalizados",
    "Acumulado legal",
    "Otorgado proyec",
    "Val proyec fidu",
    "Presupuesto restante",
    "% participacion",
];

const DETAIL_HEADER: [&str; 5] = [
    "Fiducia",
    "Presupuesto Inicial",
    "Restante",
    "Consumido",
    "Usuarios",
];

const CITAS_HEADER: [&str; 4] = ["Fecha", "Hora", "Taquilla", "Estado"];

/// Serialize the comuna summary table.
pub fn summary_csv(rows: &[SummaryRow]) -> PanelResult<String> {
    let mut writer = Writer::from_writer(Vec::new());
    writer.write_record(SUMMARY_HEADER)?;
    for row in rows {
        writer.write_record([
            row.comuna.as_str(),
            &row.cupos_aprox.to_string(),
            &row.disponible_fidu,
            &row.legalizados.to_string(),
            &row.acumulado_legal.to_string(),
            &row.otorgado_proyec,
            &row.val_proyec_fidu,
            &row.presupuesto_restante,
            &row.participacion,
        ])?;
    }
    finish(writer)
}

/// Serialize one comuna's trust detail table, totals line included.
pub fn detail_csv(rows: &[DetailRow]) -> PanelResult<String> {
    let mut writer = Writer::from_writer(Vec::new());
    writer.write_record(DETAIL_HEADER)?;
    for row in rows {
        writer.write_record([
            row.fiducia.as_str(),
            &row.presupuesto_inicial,
            &row.restante,
            &row.consumido,
            &row.usuarios.to_string(),
        ])?;
    }
    finish(writer)
}

/// Serialize a shaped citas result set. Only the four display columns go
/// out; the holder name and document stay in the result header.
pub fn citas_csv(rows: &[CitaRow]) -> PanelResult<String> {
    let mut writer = Writer::from_writer(Vec::new());
    writer.write_record(CITAS_HEADER)?;
    for row in rows {
        writer.write_record([
            row.fecha.as_str(),
            &row.hora,
            &row.taquilla,
            &row.estado,
        ])?;
    }
    finish(writer)
}

fn finish(writer: Writer<Vec<u8>>) -> PanelResult<String> {
    let bytes = writer
        .into_inner()
        .map_err(|e| anyhow::anyhow!("Cannot flush CSV buffer: {e}"))?;
    let text = String::from_utf8(bytes).map_err(|e| anyhow::anyhow!("CSV is not UTF-8: {e}"))?;
    Ok(text)
}

/// Download name for the summary table of one period.
pub fn summary_filename(period: Period) -> String {
    format!("resumen_comunas_periodo_{period}.csv")
}

/// Download name for one comuna's detail table. Spaces and hyphens in the
/// display name become underscores, so "13 - SAN JAVIER" turns into
/// `detalle_13___SAN_JAVIER.csv`.
pub fn detail_filename(display_name: &str) -> String {
    format!(
        "detalle_{}.csv",
        display_name.replace(' ', "_").replace('-', "_")
    )
}

/// Download name for a citas result set, stamped to the second.
pub fn citas_filename(documento: &str, at: DateTime<FixedOffset>) -> String {
    format!("citas_{documento}_{}.csv", at.format("%Y%m%d_%H%M%S"))
}
