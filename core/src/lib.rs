//! panel-core: data pipeline behind the comuna budget panel.
//!
//! Rows for one reporting period are fetched from SQLite, enriched with
//! district and stratum columns, aggregated per comuna, and rendered as
//! a self-contained HTML fragment plus tabular views with CSV exports.
//! A second path looks up citas by document id.

pub mod aggregate;
pub mod cache;
pub mod citas;
pub mod clock;
pub mod config;
pub mod enrich;
pub mod error;
pub mod export;
pub mod format;
pub mod pipeline;
pub mod refresh;
pub mod render;
pub mod resolver;
pub mod state;
pub mod status;
pub mod store;
pub mod tables;
pub mod types;
