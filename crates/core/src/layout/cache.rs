use tracing::trace;

use super::config::{LayoutConfig, LayoutMode};
use super::engine::{LayoutEngine, LayoutResult};
use crate::model::Activity;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
}

#[derive(Debug, Clone)]
struct CacheEntry {
    snapshot: Vec<Activity>,
    width_bits: u64,
    mode: LayoutMode,
    result: LayoutResult,
}

impl CacheEntry {
    fn matches(&self, activities: &[Activity], width_bits: u64, mode: LayoutMode) -> bool {
        self.width_bits == width_bits && self.mode == mode && self.snapshot == activities
    }
}

/// Memoizes the most recent layout.
///
/// Resize handlers fire far more often than the width actually changes, so
/// repeated calls with the same snapshot, width and mode return the stored
/// result. Any change recomputes from scratch; the cache never adjusts a
/// previous result incrementally.
#[derive(Debug, Clone, Default)]
pub struct LayoutCache {
    engine: LayoutEngine,
    entry: Option<CacheEntry>,
    stats: CacheStats,
}

impl LayoutCache {
    pub fn new(config: LayoutConfig) -> Self {
        Self {
            engine: LayoutEngine::new(config),
            entry: None,
            stats: CacheStats::default(),
        }
    }

    pub fn config(&self) -> &LayoutConfig {
        self.engine.config()
    }

    pub fn stats(&self) -> CacheStats {
        self.stats
    }

    pub fn invalidate(&mut self) {
        self.entry = None;
    }

    pub fn get_or_compute(
        &mut self,
        activities: &[Activity],
        available_width: f64,
        mode: LayoutMode,
    ) -> &LayoutResult {
        let width_bits = available_width.to_bits();
        let entry = match self.entry.take() {
            Some(entry) if entry.matches(activities, width_bits, mode) => {
                self.stats.hits += 1;
                trace!(width = available_width, %mode, "layout cache hit");
                entry
            }
            _ => {
                self.stats.misses += 1;
                trace!(
                    width = available_width,
                    %mode,
                    count = activities.len(),
                    "layout cache miss"
                );
                CacheEntry {
                    snapshot: activities.to_vec(),
                    width_bits,
                    mode,
                    result: self.engine.compute(activities, available_width, mode),
                }
            }
        };
        &self.entry.insert(entry).result
    }
}
