#![forbid(unsafe_code)]

//! Core types for threadpin: document-space geometry, the host traits the
//! engine computes against, and the events that drive recomputation.
//!
//! Nothing in this crate touches markup. Rows are identified by
//! host-owned handles; the engine layers on weak associative data only.

pub mod event;
pub mod geometry;
pub mod host;

#[cfg(any(test, feature = "test-helpers"))]
pub mod testing;

pub use event::HostEvent;
pub use geometry::{DocRect, Px, RowBox};
pub use host::{DocumentHost, HostError, Result, RowPresenter, RowRef, StickyStyle};
