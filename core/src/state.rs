//! Explicit session state.
//!
//! Navigation, the fetch cache and the last citas lookup live in one
//! struct the driver owns and threads through every cycle. Nothing here
//! hides in globals.

use std::time::Duration;

use chrono::{DateTime, FixedOffset};

use crate::cache::FetchCache;
use crate::citas::CitaRow;
use crate::clock;

/// Pages the panel can show.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Page {
    #[default]
    Overview,
    Detail,
    Citas,
}

pub struct PanelState {
    pub page:           Page,
    pub auto_refresh:   bool,
    pub last_refresh:   DateTime<FixedOffset>,
    pub cache:          FetchCache,
    pub last_documento: String,
    pub last_citas:     Option<Vec<CitaRow>>,
}

impl PanelState {
    pub fn new(cache_ttl: Duration) -> Self {
        Self {
            page:           Page::Overview,
            auto_refresh:   true,
            last_refresh:   clock::bogota_now(),
            cache:          FetchCache::new(cache_ttl),
            last_documento: String::new(),
            last_citas:     None,
        }
    }

    /// Stamp a completed refresh and drop the cached rows so the next
    /// cycle refetches.
    pub fn refresh_now(&mut self) {
        self.last_refresh = clock::bogota_now();
        self.cache.invalidate();
    }

    /// Remember a citas lookup so the page survives navigation.
    pub fn store_citas(&mut self, documento: &str, rows: Vec<CitaRow>) {
        self.last_documento = documento.to_string();
        self.last_citas = Some(rows);
        self.last_refresh = clock::bogota_now();
    }

    pub fn clear_citas(&mut self) {
        self.last_documento.clear();
        self.last_citas = None;
        self.last_refresh = clock::bogota_now();
    }
}
