#![forbid(unsafe_code)]

//! threadpin public facade crate.
//!
//! threadpin keeps each thread's top-level comment pinned near the top of
//! a scrolled comment list, nesting banners level by level and letting the
//! next sibling push the current one out of the way. The host supplies
//! visible rows and raw geometry through [`DocumentHost`] and applies the
//! engine's decisions through [`RowPresenter`]; everything in between is
//! pure computation, recomputed wholesale on every scroll, resize, or
//! structural change.
//!
//! # Example
//!
//! ```
//! use std::time::Instant;
//! use threadpin::prelude::*;
//! use threadpin_core::testing::{FakeDocument, RecordingPresenter};
//!
//! let mut doc = FakeDocument::new();
//! let head = doc.push_row(0, 0.0, 40.0);
//! doc.push_row(1, 40.0, 40.0);
//! doc.push_row(0, 900.0, 40.0);
//!
//! let mut engine = StickyEngine::new(EngineConfig::default());
//! let mut presenter = RecordingPresenter::new();
//! engine.rebuild(&mut doc, &mut presenter)?;
//!
//! doc.set_scroll(200.0);
//! engine.handle_event(HostEvent::Scroll, Instant::now(), &mut doc, &mut presenter)?;
//! assert_eq!(engine.sticky_top(head), Some(0.0));
//! # Ok::<(), threadpin::Error>(())
//! ```

use std::fmt;

// --- Core re-exports -------------------------------------------------------

pub use threadpin_core::event::HostEvent;
pub use threadpin_core::geometry::{DocRect, Px, RowBox};
pub use threadpin_core::host::{DocumentHost, HostError, RowPresenter, RowRef, StickyStyle};

// --- Layout re-exports -----------------------------------------------------

pub use threadpin_layout::{CacheStats, Forest, MeasureCache, NodeId, StickyLayout, StickyPos};

// --- Runtime re-exports ----------------------------------------------------

pub use threadpin_runtime::{EngineConfig, SettleConfig, SettleDebouncer, StickyEngine};

#[cfg(feature = "test-helpers")]
pub use threadpin_core::testing;

// --- Errors ---------------------------------------------------------------

/// Top-level error type for threadpin.
#[derive(Debug)]
pub enum Error {
    /// The host could not satisfy a measurement request.
    Host(HostError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Host(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Host(err) => Some(err),
        }
    }
}

impl From<HostError> for Error {
    fn from(err: HostError) -> Self {
        Self::Host(err)
    }
}

/// Standard result type for threadpin APIs.
pub type Result<T> = std::result::Result<T, Error>;

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    //! Common imports for day-to-day usage.
    pub use crate::{
        DocumentHost, EngineConfig, Error, HostEvent, Result, RowPresenter, RowRef, SettleConfig,
        StickyEngine, StickyPos, StickyStyle,
    };
}
