//! Citas lookup shaping: document validation, name extraction and
//! attendance stats.
//!
//! RULE: a document id must pass [`validate_documento`] before any query
//! touches it; shaping never rejects rows, it degrades them to readable
//! placeholders.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{PanelError, PanelResult};

/// Stands in for the holder name when a row carries none.
pub const NAME_UNAVAILABLE: &str = "No disponible";

/// Check a document id before it reaches a query: non-empty and decimal
/// digits only. Returns the trimmed id.
pub fn validate_documento(input: &str) -> PanelResult<String> {
    let trimmed = input.trim();
    if trimmed.is_empty() || !trimmed.chars().all(|c| c.is_ascii_digit()) {
        return Err(PanelError::InvalidDocument {
            input: input.to_string(),
        });
    }
    Ok(trimmed.to_string())
}

/// A cita row as fetched, before shaping. Every column is nullable.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawCita {
    pub nombre:      Option<String>,
    pub fecha:       Option<String>,
    pub hora_inicio: Option<String>,
    pub taquilla:    Option<String>,
    pub estado:      Option<String>,
}

/// A cita row ready for display and export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CitaRow {
    pub nombre_persona: String,
    pub documento:      String,
    pub fecha:          String,
    pub hora:           String,
    pub taquilla:       String,
    pub estado:         String,
}

/// Splits the combined "NAME - DOCUMENT" column citas store their holder
/// in.
pub struct CitaShaper {
    name_doc: Regex,
}

impl CitaShaper {
    pub fn new() -> Self {
        Self {
            // A literal pattern always compiles.
            name_doc: Regex::new(r"(.+?)\s*-\s*(\d+)").unwrap(),
        }
    }

    /// Split a raw holder column into name and document. Text without a
    /// hyphen-digit split keeps everything as the name; a missing column
    /// reads as [`NAME_UNAVAILABLE`].
    pub fn split_nombre(&self, raw: Option<&str>) -> (String, String) {
        let Some(text) = raw else {
            return (NAME_UNAVAILABLE.to_string(), String::new());
        };
        match self.name_doc.captures(text) {
            Some(caps) => (caps[1].trim().to_string(), caps[2].to_string()),
            None => (text.trim().to_string(), String::new()),
        }
    }

    /// Shape fetched rows for display: split the holder column, reformat
    /// date and time, blank out missing cells.
    pub fn shape(&self, rows: &[RawCita]) -> Vec<CitaRow> {
        rows.iter()
            .map(|raw| {
                let (nombre_persona, documento) = self.split_nombre(raw.nombre.as_deref());
                CitaRow {
                    nombre_persona,
                    documento,
                    fecha: raw.fecha.as_deref().map(format_fecha).unwrap_or_default(),
                    hora: raw
                        .hora_inicio
                        .as_deref()
                        .map(format_hora)
                        .unwrap_or_default(),
                    taquilla: raw.taquilla.clone().unwrap_or_default(),
                    estado: raw.estado.clone().unwrap_or_default(),
                }
            })
            .collect()
    }
}

impl Default for CitaShaper {
    fn default() -> Self {
        Self::new()
    }
}

/// Reformat a stored date to `DD/MM/YYYY`. Unparseable input passes
/// through untouched.
pub fn format_fecha(raw: &str) -> String {
    for fmt in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, fmt) {
            return dt.format("%d/%m/%Y").to_string();
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return date.format("%d/%m/%Y").to_string();
    }
    raw.to_string()
}

/// Reformat a stored `HH:MM:SS` time to `HH:MM AM/PM`. Unparseable input
/// passes through untouched.
pub fn format_hora(raw: &str) -> String {
    match NaiveTime::parse_from_str(raw, "%H:%M:%S") {
        Ok(time) => time.format("%I:%M %p").to_string(),
        Err(_) => raw.to_string(),
    }
}

/// Attendance counters over a shaped result set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CitaStats {
    pub total:     usize,
    pub asistidas: usize,
}

/// Count rows whose state mentions "asistida", case-insensitive.
pub fn cita_stats(rows: &[CitaRow]) -> CitaStats {
    let asistidas = rows
        .iter()
        .filter(|r| r.estado.to_lowercase().contains("asistida"))
        .count();
    CitaStats {
        total: rows.len(),
        asistidas,
    }
}

/// First non-empty holder name and document, for the result header.
pub fn principal(rows: &[CitaRow]) -> Option<(String, String)> {
    let nombre = rows
        .iter()
        .map(|r| r.nombre_persona.as_str())
        .find(|n| !n.is_empty())?;
    let documento = rows
        .iter()
        .map(|r| r.documento.as_str())
        .find(|d| !d.is_empty())?;
    Some((nombre.to_string(), documento.to_string()))
}
