#![forbid(unsafe_code)]

//! Measure cache for original document-space rectangles.
//!
//! A pinned row reports its *current visual* position, not its natural
//! one, so the host measures through a zero-content marker sibling that
//! never goes sticky (see [`DocumentHost::marker_top`]). This cache stores
//! the assembled rectangle per node so a scroll pass touches the host
//! once per row at most.
//!
//! # Invalidation
//!
//! Wholesale only, never per-entry: [`MeasureCache::invalidate_all`] bumps
//! a generation counter (O(1)) and every existing entry becomes stale.
//! The runtime invalidates on viewport resize and on every forest rebuild,
//! since rows appearing or disappearing moves everything below them.
//!
//! [`DocumentHost::marker_top`]: threadpin_core::host::DocumentHost::marker_top

use threadpin_core::geometry::DocRect;
use threadpin_core::host::{DocumentHost, Result};

use crate::forest::NodeId;

#[derive(Debug, Clone, Copy)]
struct Entry {
    rect: DocRect,
    generation: u64,
}

/// Statistics about cache performance.
#[derive(Debug, Clone, Copy, Default)]
pub struct CacheStats {
    /// Valid entries in the current generation.
    pub entries: usize,
    /// Hits since creation or last reset.
    pub hits: u64,
    /// Misses since creation or last reset.
    pub misses: u64,
    /// Hit rate as a fraction (0.0 to 1.0).
    pub hit_rate: f64,
}

/// Generation-invalidated cache of original rectangles, keyed by arena
/// node id.
///
/// An entry is only served when its generation matches the cache's
/// current generation, so a hit is guaranteed to postdate the last
/// invalidation.
#[derive(Debug, Default)]
pub struct MeasureCache {
    entries: Vec<Option<Entry>>,
    generation: u64,
    hits: u64,
    misses: u64,
}

impl MeasureCache {
    /// Create an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached rectangle for `id`, measuring through the host on
    /// a miss.
    ///
    /// Measurement reads the marker's viewport-relative top, adds the
    /// current scroll offset to land in document space, and combines it
    /// with the row's sticky-invariant horizontal box. Propagates
    /// [`HostError`] when the host cannot place a marker.
    ///
    /// [`HostError`]: threadpin_core::host::HostError
    pub fn rect_of<D: DocumentHost>(
        &mut self,
        host: &mut D,
        id: NodeId,
        handle: D::Handle,
    ) -> Result<DocRect> {
        if let Some(Some(entry)) = self.entries.get(id.index())
            && entry.generation == self.generation
        {
            self.hits += 1;
            return Ok(entry.rect);
        }

        self.misses += 1;
        let top = host.marker_top(handle)? + host.scroll_y();
        let rect = DocRect::from_box(top, host.row_box(handle));

        if self.entries.len() <= id.index() {
            self.entries.resize_with(id.index() + 1, || None);
        }
        self.entries[id.index()] = Some(Entry {
            rect,
            generation: self.generation,
        });

        Ok(rect)
    }

    /// Invalidate every entry by bumping the generation.
    ///
    /// O(1); stale entries are overwritten on their next measurement.
    #[inline]
    pub fn invalidate_all(&mut self) {
        self.generation = self.generation.wrapping_add(1);
        tracing::debug!(generation = self.generation, "measure cache invalidated");
    }

    /// Drop all entries and bump the generation, freeing memory.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.generation = self.generation.wrapping_add(1);
    }

    /// Current cache statistics.
    #[must_use]
    pub fn stats(&self) -> CacheStats {
        let entries = self
            .entries
            .iter()
            .flatten()
            .filter(|entry| entry.generation == self.generation)
            .count();
        let total = self.hits + self.misses;
        CacheStats {
            entries,
            hits: self.hits,
            misses: self.misses,
            hit_rate: if total > 0 {
                self.hits as f64 / total as f64
            } else {
                0.0
            },
        }
    }

    /// Reset hit/miss counters.
    #[inline]
    pub fn reset_stats(&mut self) {
        self.hits = 0;
        self.misses = 0;
    }
}
