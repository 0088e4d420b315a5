//! SQLite persistence layer.
//!
//! RULE: Only store.rs talks to the database.
//! The pipeline calls store methods; nothing else executes SQL.

use rusqlite::{params, types::ValueRef, Connection, Row};

use crate::{citas::RawCita, enrich::RawRecord, error::PanelResult, types::Period};

pub struct PanelStore {
    conn: Connection,
}

impl PanelStore {
    /// Open (or create) the panel database at `path`.
    pub fn open(path: &str) -> PanelResult<Self> {
        let conn = Connection::open(path)?;
        // WAL mode: better concurrent read performance.
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(Self { conn })
    }

    /// Open an in-memory database (used in tests).
    pub fn in_memory() -> PanelResult<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(Self { conn })
    }

    /// Apply all schema migrations in order.
    pub fn migrate(&self) -> PanelResult<()> {
        self.conn
            .execute_batch(include_str!("../../migrations/001_presupuesto.sql"))?;
        self.conn
            .execute_batch(include_str!("../../migrations/002_citas.sql"))?;
        Ok(())
    }

    // ── Budget rows ────────────────────────────────────────────

    /// Fetch every budget row of one reporting period, in insertion
    /// order. The table name comes from configuration, never from user
    /// input.
    pub fn fetch_period_rows(&self, table: &str, period: Period) -> PanelResult<Vec<RawRecord>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT comuna, idfiducia, presupuesto_comuna, restante_presupuesto_comuna,
                    acumulado_legali_comuna, numero_usuarios_comuna
             FROM {table} WHERE periodo = ?1"
        ))?;
        let rows = stmt
            .query_map(params![period as i64], |row| {
                Ok(RawRecord {
                    comuna_code:           cell_text(row, 0)?.unwrap_or_default(),
                    trust_id:              cell_text(row, 1)?.unwrap_or_default(),
                    budget_total:          cell_text(row, 2)?,
                    budget_remaining:      cell_text(row, 3)?,
                    accumulated_legalized: cell_text(row, 4)?,
                    user_count:            cell_text(row, 5)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    pub fn insert_budget_row(&self, table: &str, record: &RawRecord, period: Period) -> PanelResult<()> {
        self.conn.execute(
            &format!(
                "INSERT INTO {table} (comuna, idfiducia, presupuesto_comuna,
                     restante_presupuesto_comuna, acumulado_legali_comuna,
                     numero_usuarios_comuna, periodo)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)"
            ),
            params![
                record.comuna_code,
                record.trust_id,
                record.budget_total,
                record.budget_remaining,
                record.accumulated_legalized,
                record.user_count,
                period as i64,
            ],
        )?;
        Ok(())
    }

    // ── Citas ──────────────────────────────────────────────────

    /// Fetch citas whose combined holder column contains the document.
    /// Callers validate the document as digits-only first; the LIKE
    /// pattern is still bound, never interpolated.
    pub fn fetch_citas(&self, documento: &str) -> PanelResult<Vec<RawCita>> {
        let mut stmt = self.conn.prepare(
            "SELECT nombre, fecha, hora_inicio, taquilla, estado
             FROM citas WHERE nombre LIKE ?1
             ORDER BY fecha ASC, hora_inicio ASC",
        )?;
        let pattern = format!("%{documento}%");
        let rows = stmt
            .query_map(params![pattern], |row| {
                Ok(RawCita {
                    nombre:      cell_text(row, 0)?,
                    fecha:       cell_text(row, 1)?,
                    hora_inicio: cell_text(row, 2)?,
                    taquilla:    cell_text(row, 3)?,
                    estado:      cell_text(row, 4)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    pub fn insert_cita(&self, cita: &RawCita) -> PanelResult<()> {
        self.conn.execute(
            "INSERT INTO citas (nombre, fecha, hora_inicio, taquilla, estado)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![cita.nombre, cita.fecha, cita.hora_inicio, cita.taquilla, cita.estado],
        )?;
        Ok(())
    }
}

/// Read one cell as text whatever its stored affinity. NULL and blobs
/// read as absent; enrichment owns interpreting the text.
fn cell_text(row: &Row<'_>, idx: usize) -> rusqlite::Result<Option<String>> {
    let value = match row.get_ref(idx)? {
        ValueRef::Null => None,
        ValueRef::Integer(n) => Some(n.to_string()),
        ValueRef::Real(x) => Some(x.to_string()),
        ValueRef::Text(bytes) => Some(String::from_utf8_lossy(bytes).into_owned()),
        ValueRef::Blob(_) => None,
    };
    Ok(value)
}
