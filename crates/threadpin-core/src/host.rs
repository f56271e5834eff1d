#![forbid(unsafe_code)]

//! Host-side interfaces.
//!
//! The engine never touches markup directly. Everything it needs from the
//! surrounding document — the ordered visible rows, raw geometry, the
//! scroll offset — comes in through [`DocumentHost`], and everything it
//! decides — pin this row at this offset, unpin that one — goes out
//! through [`RowPresenter`]. Visibility filtering (collapsed rows, hidden
//! descendants) happens on the host side before rows reach the engine.

use std::fmt;
use std::hash::Hash;

use crate::geometry::{Px, RowBox};

/// A visible row as reported by the host, in document order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowRef<H> {
    /// Host-owned handle for the row.
    pub handle: H,
    /// Nesting depth; top-level rows are 0.
    pub depth: u32,
}

impl<H> RowRef<H> {
    /// Create a row reference.
    #[inline]
    #[must_use]
    pub const fn new(handle: H, depth: u32) -> Self {
        Self { handle, depth }
    }
}

/// Sticky presentation for one row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StickyStyle {
    /// Pinned offset from the viewport top.
    pub top: Px,
    /// Whether the next sibling is currently shoving the row upward.
    pub pushed: bool,
    /// Stacking order; shallower rows stack above deeper ones.
    pub z_index: i32,
}

/// Read access to the live document.
///
/// Handles are owned by the host; the engine keeps only weak associative
/// data about them (arena indices, cache entries) that is discarded
/// wholesale on every rebuild.
pub trait DocumentHost {
    /// Host-owned row handle.
    type Handle: Copy + Eq + Hash + fmt::Debug;

    /// Ordered sequence of currently visible rows, each with its depth.
    ///
    /// Collapsed rows and hidden descendants of collapsed ancestors have
    /// already been filtered out.
    fn visible_rows(&self) -> Vec<RowRef<Self::Handle>>;

    /// Sticky-invariant components of the row's bounding box.
    fn row_box(&self, handle: Self::Handle) -> RowBox;

    /// Viewport-relative top of the measurement marker for this row.
    ///
    /// The marker is a zero-content sibling inserted immediately before the
    /// row (created on first use, reused thereafter). It is never itself
    /// sticky, so its top reflects true document flow even while the row is
    /// pinned. Fails with [`HostError::MissingContainer`] when the row has
    /// no parent to insert into, or [`HostError::StaleHandle`] when the
    /// handle no longer resolves to a live row (the markup vanished after
    /// the last visibility snapshot). Neither is a recoverable condition
    /// within the current pass.
    fn marker_top(&mut self, handle: Self::Handle) -> Result<Px>;

    /// Current vertical scroll offset of the container.
    fn scroll_y(&self) -> Px;
}

/// Write access to row presentation.
pub trait RowPresenter<H> {
    /// Pin the row at `style.top`, with the pushed flag and stacking order.
    fn apply_sticky(&mut self, handle: H, style: StickyStyle);

    /// Remove any sticky presentation previously applied to the row.
    fn clear_sticky(&mut self, handle: H);
}

/// Errors surfaced by the host while measuring.
#[derive(Debug)]
pub enum HostError {
    /// A row has no parent container to insert a measurement marker into.
    MissingContainer {
        /// Description of the offending row.
        row: String,
    },
    /// A handle no longer resolves to a live row.
    StaleHandle {
        /// Description of the offending handle.
        row: String,
    },
}

impl fmt::Display for HostError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingContainer { row } => {
                write!(f, "no parent container for measurement marker of {row}")
            }
            Self::StaleHandle { row } => write!(f, "stale row handle {row}"),
        }
    }
}

impl std::error::Error for HostError {}

/// Standard result type for host operations.
pub type Result<T> = std::result::Result<T, HostError>;
