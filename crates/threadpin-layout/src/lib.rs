#![forbid(unsafe_code)]

//! Layout core for threadpin: forest reconstruction, original-rect
//! measurement, and the sticky stacking pass.
//!
//! The three pieces compose in dependency order: [`Forest::build`] turns
//! the host's flat visible sequence into a parent/children forest,
//! [`MeasureCache`] supplies each node's document-space rectangle, and
//! [`stacker::compute`] walks the forest to produce the per-pass
//! [`StickyLayout`]. All state here is rebuilt wholesale; none of it
//! outlives the rows it describes.

pub mod forest;
pub mod measure;
pub mod stacker;

pub use forest::{Forest, NodeId};
pub use measure::{CacheStats, MeasureCache};
pub use stacker::{StickyLayout, StickyPos, compute};
