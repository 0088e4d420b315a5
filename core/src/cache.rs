//! Time-bounded memoization of the fetch step.

use std::time::{Duration, Instant};

use crate::enrich::EnrichedRecord;
use crate::error::PanelResult;

/// Holds one fetch result for a fixed time-to-live. The panel re-renders
/// on a timer; within one TTL window every render reuses the same rows.
pub struct FetchCache {
    ttl:  Duration,
    slot: Option<(Instant, Vec<EnrichedRecord>)>,
}

impl FetchCache {
    pub fn new(ttl: Duration) -> Self {
        Self { ttl, slot: None }
    }

    /// Return the cached rows while they are fresh, otherwise run
    /// `refetch` and cache its result. A failed refetch leaves the slot
    /// empty, so the next call tries again.
    pub fn fetch<F>(&mut self, refetch: F) -> PanelResult<Vec<EnrichedRecord>>
    where
        F: FnOnce() -> PanelResult<Vec<EnrichedRecord>>,
    {
        if let Some((stored_at, rows)) = &self.slot {
            if stored_at.elapsed() < self.ttl {
                return Ok(rows.clone());
            }
        }
        self.slot = None;
        let rows = refetch()?;
        self.slot = Some((Instant::now(), rows.clone()));
        Ok(rows)
    }

    /// Drop the cached rows; the next fetch goes back to the source.
    pub fn invalidate(&mut self) {
        self.slot = None;
    }

    pub fn is_fresh(&self) -> bool {
        self.slot
            .as_ref()
            .is_some_and(|(stored_at, _)| stored_at.elapsed() < self.ttl)
    }
}
