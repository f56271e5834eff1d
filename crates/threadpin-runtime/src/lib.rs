#![forbid(unsafe_code)]

//! Runtime coordinator for threadpin.
//!
//! [`StickyEngine`] owns the per-session state and turns host events into
//! layout passes; [`SettleDebouncer`] defers fold/unfold rebuilds until
//! host layout has settled.

pub mod debounce;
pub mod engine;

pub use debounce::{SettleConfig, SettleDebouncer};
pub use engine::{EngineConfig, StickyEngine};
