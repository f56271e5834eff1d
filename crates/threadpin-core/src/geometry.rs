#![forbid(unsafe_code)]

//! Geometric primitives in document space.

/// A length or coordinate in CSS pixels.
///
/// Document-space values are fractional (sub-pixel layout), so this is a
/// plain `f64` rather than an integer cell count.
pub type Px = f64;

/// Horizontal components of a row's box.
///
/// These are the parts of a bounding box that vertical sticky offsetting
/// cannot move, so they may be read directly off a row even while the row
/// is pinned.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RowBox {
    /// Left edge in viewport coordinates.
    pub left: Px,
    /// Width of the row.
    pub width: Px,
    /// Height of the row.
    pub height: Px,
    /// Right edge in viewport coordinates.
    pub right: Px,
}

/// A rectangle in document coordinates, unscrolled and sticky-free.
///
/// `top` is absolute document space; the horizontal components come from
/// the live row box. `bottom` is always `top + height`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DocRect {
    /// Top edge in document coordinates.
    pub top: Px,
    /// Left edge.
    pub left: Px,
    /// Width.
    pub width: Px,
    /// Height.
    pub height: Px,
}

impl DocRect {
    /// Create a new rectangle.
    #[inline]
    #[must_use]
    pub const fn new(top: Px, left: Px, width: Px, height: Px) -> Self {
        Self {
            top,
            left,
            width,
            height,
        }
    }

    /// Assemble a document rectangle from a document-space top and the
    /// sticky-invariant horizontal box.
    #[inline]
    #[must_use]
    pub const fn from_box(top: Px, row_box: RowBox) -> Self {
        Self {
            top,
            left: row_box.left,
            width: row_box.width,
            height: row_box.height,
        }
    }

    /// Right edge.
    #[inline]
    #[must_use]
    pub fn right(&self) -> Px {
        self.left + self.width
    }

    /// Bottom edge (`top + height`).
    #[inline]
    #[must_use]
    pub fn bottom(&self) -> Px {
        self.top + self.height
    }

    /// Top edge as seen in the viewport at the given scroll offset,
    /// ignoring any sticky pinning.
    #[inline]
    #[must_use]
    pub fn natural_top(&self, scroll_y: Px) -> Px {
        self.top - scroll_y
    }
}
