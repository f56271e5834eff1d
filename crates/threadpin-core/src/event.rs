#![forbid(unsafe_code)]

//! Host events that drive recomputation.

/// An event from the host document or viewport.
///
/// All recomputation is synchronous and event-driven; the host event loop
/// serializes delivery, so handlers are never reentrant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostEvent {
    /// The scroll container scrolled. Geometry is unchanged; only the
    /// sticky assignment needs recomputing.
    Scroll,
    /// The viewport resized. Cached geometry is stale.
    Resize,
    /// Rows were added or removed. The forest must be rebuilt.
    RowsChanged,
    /// A fold/unfold control was activated. The rebuild is deferred by a
    /// short settle delay so host layout can finish first.
    FoldToggled,
}
