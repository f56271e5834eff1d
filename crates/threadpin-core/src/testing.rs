#![forbid(unsafe_code)]

//! Test helpers: a fake document host and a recording presenter.
//!
//! Only available with the `test-helpers` feature. The fake host models a
//! vertically stacked document of rows with explicit depths and
//! document-space geometry; the recording presenter captures every
//! apply/clear call in order so tests can assert on exact presentation
//! traffic.

use crate::geometry::{Px, RowBox};
use crate::host::{DocumentHost, HostError, Result, RowPresenter, RowRef, StickyStyle};

/// One fake row in the document.
#[derive(Debug, Clone, Copy)]
pub struct FakeRow {
    /// Nesting depth, root = 0.
    pub depth: u32,
    /// Document-space top.
    pub top: Px,
    /// Left edge.
    pub left: Px,
    /// Width.
    pub width: Px,
    /// Height.
    pub height: Px,
    /// Whether the row is currently visible (post-filtering).
    pub visible: bool,
}

/// Fake [`DocumentHost`] backed by a vector of rows.
///
/// Handles are plain indices into the row vector. The marker-measurement
/// counter lets tests observe when real measurement (as opposed to a cache
/// hit) took place.
#[derive(Debug, Default)]
pub struct FakeDocument {
    rows: Vec<Option<FakeRow>>,
    scroll_y: Px,
    marker_reads: u64,
    fail_marker: bool,
}

impl FakeDocument {
    /// Create an empty document.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a visible row, returning its handle.
    pub fn push_row(&mut self, depth: u32, top: Px, height: Px) -> usize {
        self.rows.push(Some(FakeRow {
            depth,
            top,
            left: 0.0,
            width: 600.0,
            height,
            visible: true,
        }));
        self.rows.len() - 1
    }

    /// Delete a row outright, leaving its handle dangling.
    ///
    /// Models markup vanishing between a visibility snapshot and the next
    /// measurement; subsequent [`DocumentHost::marker_top`] calls for the
    /// handle report [`HostError::StaleHandle`].
    pub fn remove_row(&mut self, handle: usize) {
        self.rows[handle] = None;
    }

    /// Set the scroll offset.
    pub fn set_scroll(&mut self, scroll_y: Px) {
        self.scroll_y = scroll_y;
    }

    /// Show or hide a row (models upstream collapse filtering).
    pub fn set_visible(&mut self, handle: usize, visible: bool) {
        if let Some(row) = &mut self.rows[handle] {
            row.visible = visible;
        }
    }

    /// Move a row to a new document-space top.
    pub fn set_top(&mut self, handle: usize, top: Px) {
        if let Some(row) = &mut self.rows[handle] {
            row.top = top;
        }
    }

    /// Make all subsequent marker measurements fail, simulating a row with
    /// no parent container.
    pub fn fail_marker(&mut self, fail: bool) {
        self.fail_marker = fail;
    }

    /// Number of marker measurements performed so far.
    #[must_use]
    pub fn marker_reads(&self) -> u64 {
        self.marker_reads
    }

    /// Reset the marker-measurement counter.
    pub fn reset_marker_reads(&mut self) {
        self.marker_reads = 0;
    }
}

impl DocumentHost for FakeDocument {
    type Handle = usize;

    fn visible_rows(&self) -> Vec<RowRef<usize>> {
        self.rows
            .iter()
            .enumerate()
            .filter_map(|(handle, row)| row.as_ref().map(|row| (handle, row)))
            .filter(|(_, row)| row.visible)
            .map(|(handle, row)| RowRef::new(handle, row.depth))
            .collect()
    }

    fn row_box(&self, handle: usize) -> RowBox {
        let row = self.rows[handle].unwrap_or(FakeRow {
            depth: 0,
            top: 0.0,
            left: 0.0,
            width: 0.0,
            height: 0.0,
            visible: false,
        });
        RowBox {
            left: row.left,
            width: row.width,
            height: row.height,
            right: row.left + row.width,
        }
    }

    fn marker_top(&mut self, handle: usize) -> Result<Px> {
        if self.fail_marker {
            return Err(HostError::MissingContainer {
                row: format!("row#{handle}"),
            });
        }
        let Some(row) = &self.rows[handle] else {
            return Err(HostError::StaleHandle {
                row: format!("row#{handle}"),
            });
        };
        self.marker_reads += 1;
        // The marker sits in normal flow, so its viewport-relative top is
        // the row's natural position regardless of any pinning.
        Ok(row.top - self.scroll_y)
    }

    fn scroll_y(&self) -> Px {
        self.scroll_y
    }
}

/// One recorded presenter call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PresenterCall<H> {
    /// `apply_sticky` with the given style.
    Apply {
        /// Target row.
        handle: H,
        /// Applied style.
        style: StickyStyle,
    },
    /// `clear_sticky`.
    Clear {
        /// Target row.
        handle: H,
    },
}

/// [`RowPresenter`] that records every call in order.
#[derive(Debug)]
pub struct RecordingPresenter<H> {
    /// All calls, oldest first.
    pub calls: Vec<PresenterCall<H>>,
}

impl<H> Default for RecordingPresenter<H> {
    fn default() -> Self {
        Self { calls: Vec::new() }
    }
}

impl<H: Copy + PartialEq> RecordingPresenter<H> {
    /// Create an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Style from the most recent `apply_sticky` for the handle, if any.
    #[must_use]
    pub fn last_style(&self, handle: H) -> Option<StickyStyle> {
        self.calls.iter().rev().find_map(|call| match call {
            PresenterCall::Apply { handle: h, style } if *h == handle => Some(*style),
            _ => None,
        })
    }

    /// Number of `clear_sticky` calls for the handle.
    #[must_use]
    pub fn clear_count(&self, handle: H) -> usize {
        self.calls
            .iter()
            .filter(|call| matches!(call, PresenterCall::Clear { handle: h } if *h == handle))
            .count()
    }

    /// Number of `apply_sticky` calls for the handle.
    #[must_use]
    pub fn apply_count(&self, handle: H) -> usize {
        self.calls
            .iter()
            .filter(|call| matches!(call, PresenterCall::Apply { handle: h, .. } if *h == handle))
            .count()
    }

    /// Drop all recorded calls.
    pub fn reset(&mut self) {
        self.calls.clear();
    }
}

impl<H: Copy + PartialEq> RowPresenter<H> for RecordingPresenter<H> {
    fn apply_sticky(&mut self, handle: H, style: StickyStyle) {
        self.calls.push(PresenterCall::Apply { handle, style });
    }

    fn clear_sticky(&mut self, handle: H) {
        self.calls.push(PresenterCall::Clear { handle });
    }
}
