#![forbid(unsafe_code)]

//! The sticky engine: the coordinator that owns all per-session state.
//!
//! Every piece of mutable state — the forest, the measure cache, the
//! current sticky layout, the settle debouncer — lives in one explicit
//! [`StickyEngine`] value rather than ambient globals. Events flow in
//! through [`StickyEngine::handle_event`]; presentation flows out through
//! the caller's [`RowPresenter`].
//!
//! Dispatch order on a structural change is fixed: rebuild the forest,
//! invalidate the measure cache, then recompute the sticky layout. The
//! cache must be invalidated first because rows appearing or disappearing
//! moves everything below them.
//!
//! Everything is single-threaded and synchronous; each pass runs to
//! completion before the next event is handled.

use std::fmt;
use std::hash::Hash;
use std::time::Instant;

use threadpin_core::event::HostEvent;
use threadpin_core::geometry::Px;
use threadpin_core::host::{DocumentHost, Result, RowPresenter, StickyStyle};
use threadpin_layout::{CacheStats, Forest, MeasureCache, StickyLayout, compute};

use crate::debounce::{SettleConfig, SettleDebouncer};

/// Engine configuration.
#[derive(Debug, Clone, Copy)]
pub struct EngineConfig {
    /// Settle delay for fold/unfold rebuilds.
    pub settle: SettleConfig,
    /// Z-index for depth-0 banners; a banner at depth `d` gets
    /// `z_base - d` so shallower threads stack above deeper ones.
    pub z_base: i32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            settle: SettleConfig::default(),
            z_base: 100,
        }
    }
}

impl EngineConfig {
    /// Set the settle configuration.
    #[must_use]
    pub const fn with_settle(mut self, settle: SettleConfig) -> Self {
        self.settle = settle;
        self
    }

    /// Set the z-index base.
    #[must_use]
    pub const fn with_z_base(mut self, z_base: i32) -> Self {
        self.z_base = z_base;
        self
    }
}

/// Coordinator for one scroll container's sticky behavior.
#[derive(Debug)]
pub struct StickyEngine<H> {
    config: EngineConfig,
    forest: Forest<H>,
    cache: MeasureCache,
    layout: StickyLayout<H>,
    debouncer: SettleDebouncer,
}

impl<H: Copy + Eq + Hash + fmt::Debug> Default for StickyEngine<H> {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl<H: Copy + Eq + Hash + fmt::Debug> StickyEngine<H> {
    /// Create an engine with the given configuration.
    #[must_use]
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            forest: Forest::new(),
            cache: MeasureCache::new(),
            layout: StickyLayout::new(),
            debouncer: SettleDebouncer::new(config.settle),
        }
    }

    /// Drop all session state (forest, cache, layout, pending rebuild).
    ///
    /// The next [`rebuild`] starts from scratch; no presentation is
    /// cleared here because the rows themselves may already be gone.
    ///
    /// [`rebuild`]: StickyEngine::rebuild
    pub fn reset(&mut self) {
        self.forest = Forest::new();
        self.cache.clear();
        self.layout = StickyLayout::new();
        self.debouncer.cancel();
    }

    /// Rebuild the forest from the host's visible rows, then invalidate
    /// geometry and recompute the sticky layout, in that order.
    pub fn rebuild<D, P>(&mut self, host: &mut D, presenter: &mut P) -> Result<()>
    where
        D: DocumentHost<Handle = H>,
        P: RowPresenter<H>,
    {
        let rows = host.visible_rows();
        self.forest = Forest::build(&rows);
        tracing::debug!(
            rows = rows.len(),
            roots = self.forest.roots().len(),
            "forest rebuilt"
        );

        // Fixed dispatch order: geometry invalidation before recompute.
        self.cache.invalidate_all();
        self.refresh(host, presenter)
    }

    /// Recompute the sticky layout and push the difference to the
    /// presenter.
    ///
    /// Rows that lost their assignment are cleared exactly once; current
    /// assignments are (re)applied with their offset, pushed flag, and
    /// depth-derived z-index.
    pub fn refresh<D, P>(&mut self, host: &mut D, presenter: &mut P) -> Result<()>
    where
        D: DocumentHost<Handle = H>,
        P: RowPresenter<H>,
    {
        let next = compute(&self.forest, &mut self.cache, host)?;

        for (handle, _, _) in self.layout.iter() {
            if !next.contains(handle) {
                tracing::trace!(?handle, "sticky cleared");
                presenter.clear_sticky(handle);
            }
        }
        for (handle, pos, depth) in next.iter() {
            presenter.apply_sticky(
                handle,
                StickyStyle {
                    top: pos.top,
                    pushed: pos.pushed,
                    z_index: self.config.z_base - depth as i32,
                },
            );
        }

        self.layout = next;
        Ok(())
    }

    /// Handle one host event.
    ///
    /// Scroll refreshes with cached geometry; resize invalidates first;
    /// a structural change rebuilds immediately; a fold/unfold only arms
    /// the settle debouncer — the rebuild happens on a later
    /// [`poll`](StickyEngine::poll).
    pub fn handle_event<D, P>(
        &mut self,
        event: HostEvent,
        now: Instant,
        host: &mut D,
        presenter: &mut P,
    ) -> Result<()>
    where
        D: DocumentHost<Handle = H>,
        P: RowPresenter<H>,
    {
        match event {
            HostEvent::Scroll => self.refresh(host, presenter),
            HostEvent::Resize => {
                self.cache.invalidate_all();
                self.refresh(host, presenter)
            }
            HostEvent::RowsChanged => self.rebuild(host, presenter),
            HostEvent::FoldToggled => {
                self.debouncer.note(now);
                Ok(())
            }
        }
    }

    /// Fire a pending debounced rebuild once its deadline has passed.
    pub fn poll<D, P>(&mut self, now: Instant, host: &mut D, presenter: &mut P) -> Result<()>
    where
        D: DocumentHost<Handle = H>,
        P: RowPresenter<H>,
    {
        if self.debouncer.poll(now) {
            self.rebuild(host, presenter)
        } else {
            Ok(())
        }
    }

    /// Pinned offset currently assigned to a row, if any.
    #[must_use]
    pub fn sticky_top(&self, handle: H) -> Option<Px> {
        self.layout.sticky_top(handle)
    }

    /// The current sticky layout.
    #[must_use]
    pub fn layout(&self) -> &StickyLayout<H> {
        &self.layout
    }

    /// The current forest.
    #[must_use]
    pub fn forest(&self) -> &Forest<H> {
        &self.forest
    }

    /// Measure-cache statistics.
    #[must_use]
    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use threadpin_core::host::HostError;
    use threadpin_core::testing::{FakeDocument, RecordingPresenter};

    /// Three threads with one nested reply each, 40px rows.
    fn threaded_doc() -> (FakeDocument, Vec<usize>) {
        let mut doc = FakeDocument::new();
        let mut handles = Vec::new();
        let mut top = 0.0;
        for _ in 0..3 {
            handles.push(doc.push_row(0, top, 40.0));
            top += 40.0;
            handles.push(doc.push_row(1, top, 40.0));
            top += 300.0;
        }
        (doc, handles)
    }

    #[test]
    fn rebuild_then_scroll_pins_scrolled_thread_head() {
        let (mut doc, handles) = threaded_doc();
        let mut engine = StickyEngine::new(EngineConfig::default());
        let mut presenter = RecordingPresenter::new();

        engine.rebuild(&mut doc, &mut presenter).unwrap();
        assert!(engine.layout().is_empty());

        doc.set_scroll(100.0);
        engine
            .handle_event(HostEvent::Scroll, Instant::now(), &mut doc, &mut presenter)
            .unwrap();

        // First thread head (document top 0) is pinned at the viewport top.
        assert_eq!(engine.sticky_top(handles[0]), Some(0.0));
        let style = presenter.last_style(handles[0]).unwrap();
        assert_eq!(style.top, 0.0);
        assert!(!style.pushed);
        assert_eq!(style.z_index, 100);
    }

    #[test]
    fn z_index_decreases_with_depth() {
        let mut doc = FakeDocument::new();
        let root = doc.push_row(0, 0.0, 40.0);
        let child = doc.push_row(1, 40.0, 40.0);
        doc.push_row(1, 900.0, 40.0);
        doc.push_row(0, 2000.0, 40.0);
        doc.set_scroll(300.0);

        let mut engine = StickyEngine::new(EngineConfig::default());
        let mut presenter = RecordingPresenter::new();
        engine.rebuild(&mut doc, &mut presenter).unwrap();

        assert_eq!(presenter.last_style(root).unwrap().z_index, 100);
        assert_eq!(presenter.last_style(child).unwrap().z_index, 99);
    }

    #[test]
    fn removed_row_is_cleared_exactly_once() {
        let (mut doc, handles) = threaded_doc();
        doc.set_scroll(100.0);

        let mut engine = StickyEngine::new(EngineConfig::default());
        let mut presenter = RecordingPresenter::new();
        engine.rebuild(&mut doc, &mut presenter).unwrap();
        assert!(engine.sticky_top(handles[0]).is_some());

        // The pinned thread collapses away.
        doc.set_visible(handles[0], false);
        doc.set_visible(handles[1], false);
        engine
            .handle_event(
                HostEvent::RowsChanged,
                Instant::now(),
                &mut doc,
                &mut presenter,
            )
            .unwrap();

        assert!(engine.sticky_top(handles[0]).is_none());
        assert_eq!(presenter.clear_count(handles[0]), 1);

        // Further passes must not clear it again.
        engine
            .handle_event(HostEvent::Scroll, Instant::now(), &mut doc, &mut presenter)
            .unwrap();
        assert_eq!(presenter.clear_count(handles[0]), 1);
    }

    #[test]
    fn scroll_reuses_cached_geometry_but_resize_does_not() {
        let (mut doc, _) = threaded_doc();
        doc.set_scroll(100.0);

        let mut engine = StickyEngine::new(EngineConfig::default());
        let mut presenter = RecordingPresenter::new();
        engine.rebuild(&mut doc, &mut presenter).unwrap();

        let reads_after_rebuild = doc.marker_reads();
        engine
            .handle_event(HostEvent::Scroll, Instant::now(), &mut doc, &mut presenter)
            .unwrap();
        assert_eq!(doc.marker_reads(), reads_after_rebuild, "scroll hits the cache");

        engine
            .handle_event(HostEvent::Resize, Instant::now(), &mut doc, &mut presenter)
            .unwrap();
        assert!(
            doc.marker_reads() > reads_after_rebuild,
            "resize invalidates cached rectangles"
        );
    }

    #[test]
    fn update_twice_yields_identical_assignment() {
        let (mut doc, _) = threaded_doc();
        doc.set_scroll(150.0);

        let mut engine = StickyEngine::new(EngineConfig::default());
        let mut presenter = RecordingPresenter::new();
        engine.rebuild(&mut doc, &mut presenter).unwrap();

        let first: Vec<_> = engine.layout().iter().collect();
        engine
            .handle_event(HostEvent::Scroll, Instant::now(), &mut doc, &mut presenter)
            .unwrap();
        let second: Vec<_> = engine.layout().iter().collect();
        assert_eq!(first, second);
    }

    #[test]
    fn fold_toggle_defers_rebuild_until_settle() {
        let (mut doc, handles) = threaded_doc();
        doc.set_scroll(100.0);

        let config =
            EngineConfig::default().with_settle(SettleConfig::default().with_delay(
                Duration::from_millis(100),
            ));
        let mut engine = StickyEngine::new(config);
        let mut presenter = RecordingPresenter::new();
        engine.rebuild(&mut doc, &mut presenter).unwrap();

        let start = Instant::now();
        doc.set_visible(handles[1], false);
        engine
            .handle_event(HostEvent::FoldToggled, start, &mut doc, &mut presenter)
            .unwrap();

        // Nothing happens before the deadline.
        let forest_len = engine.forest().len();
        engine.poll(start, &mut doc, &mut presenter).unwrap();
        assert_eq!(engine.forest().len(), forest_len);

        engine
            .poll(start + Duration::from_millis(150), &mut doc, &mut presenter)
            .unwrap();
        assert_eq!(engine.forest().len(), forest_len - 1);

        // One-shot: a later poll without a new toggle does nothing.
        let reads = doc.marker_reads();
        engine
            .poll(start + Duration::from_secs(1), &mut doc, &mut presenter)
            .unwrap();
        assert_eq!(doc.marker_reads(), reads);
    }

    #[test]
    fn missing_container_propagates_from_refresh() {
        let (mut doc, _) = threaded_doc();
        doc.set_scroll(100.0);
        doc.fail_marker(true);

        let mut engine = StickyEngine::<usize>::new(EngineConfig::default());
        let mut presenter = RecordingPresenter::new();
        assert!(engine.rebuild(&mut doc, &mut presenter).is_err());
    }

    #[test]
    fn vanished_row_surfaces_stale_handle_on_remeasure() {
        let (mut doc, handles) = threaded_doc();
        doc.set_scroll(100.0);

        let mut engine = StickyEngine::new(EngineConfig::default());
        let mut presenter = RecordingPresenter::new();
        engine.rebuild(&mut doc, &mut presenter).unwrap();

        // The row disappears without a structural notification; the forest
        // still holds its handle, so the next remeasure trips on it.
        doc.remove_row(handles[0]);
        let err = engine
            .handle_event(HostEvent::Resize, Instant::now(), &mut doc, &mut presenter)
            .unwrap_err();
        assert!(matches!(err, HostError::StaleHandle { .. }), "{err}");
    }

    #[test]
    fn reset_drops_session_state() {
        let (mut doc, _) = threaded_doc();
        doc.set_scroll(100.0);

        let mut engine = StickyEngine::new(EngineConfig::default());
        let mut presenter = RecordingPresenter::new();
        engine.rebuild(&mut doc, &mut presenter).unwrap();
        assert!(!engine.forest().is_empty());
        assert!(!engine.layout().is_empty());

        engine.reset();
        assert!(engine.forest().is_empty());
        assert!(engine.layout().is_empty());
        assert_eq!(engine.cache_stats().entries, 0);
    }
}
