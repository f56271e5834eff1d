#![forbid(unsafe_code)]

//! The sticky stacker.
//!
//! One pass walks the forest top-down and decides, level by level, which
//! sibling is pinned (the *holder*), at what offset, and whether the next
//! sibling in document order (the *pusher*) is already shoving it out of
//! its slot. The result is a fresh [`StickyLayout`]; nothing carries over
//! between passes.
//!
//! At each level the visible boundary is the bottom of the enclosing
//! holder's pinned banner (or the viewport top for roots). The first
//! sibling whose natural top lies strictly below that boundary is the
//! pusher; the sibling just before it — or the last sibling when no
//! pusher exists at this level — is the holder candidate. A candidate is
//! only assigned when pinning would actually displace it from its natural
//! position, and the pass then recurses into the holder's children with
//! the tightened pusher/holder context.
//!
//! Ties sit exactly on the boundary and are deliberately inert: the
//! pusher scan uses strict `>` and the early-out uses strict `<`, so a
//! row whose natural top equals the boundary neither pushes nor aborts
//! the level.

use std::collections::HashMap;
use std::hash::Hash;

use threadpin_core::geometry::Px;
use threadpin_core::host::{DocumentHost, Result};

use crate::forest::{Forest, NodeId};
use crate::measure::MeasureCache;

/// Vertical gap between a holder's banner and the next nested banner.
const ITEM_GAP: Px = 0.0;

/// Sticky assignment for one row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StickyPos {
    /// Pinned offset from the viewport top. Negative while being pushed
    /// out (the banner slides up under its pusher).
    pub top: Px,
    /// Whether the pusher is encroaching and the offset was clamped.
    pub pushed: bool,
}

/// The full sticky assignment for one pass, in assignment order.
///
/// Rebuilt wholesale on every update; a row absent from the new layout
/// must have its presentation cleared by the caller.
#[derive(Debug, Clone)]
pub struct StickyLayout<H> {
    order: Vec<H>,
    map: HashMap<H, (StickyPos, u32)>,
}

impl<H: Copy + Eq + Hash> Default for StickyLayout<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H: Copy + Eq + Hash> StickyLayout<H> {
    /// Create an empty layout.
    #[must_use]
    pub fn new() -> Self {
        Self {
            order: Vec::new(),
            map: HashMap::new(),
        }
    }

    /// Assignment for a row, if any.
    #[must_use]
    pub fn get(&self, handle: H) -> Option<StickyPos> {
        self.map.get(&handle).map(|(pos, _)| *pos)
    }

    /// Pinned offset assigned to a row in this pass, if any.
    #[must_use]
    pub fn sticky_top(&self, handle: H) -> Option<Px> {
        self.get(handle).map(|pos| pos.top)
    }

    /// Nesting depth recorded for an assigned row.
    #[must_use]
    pub fn depth(&self, handle: H) -> Option<u32> {
        self.map.get(&handle).map(|(_, depth)| *depth)
    }

    /// Whether the row is assigned.
    #[must_use]
    pub fn contains(&self, handle: H) -> bool {
        self.map.contains_key(&handle)
    }

    /// Number of assigned rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Whether no row is assigned.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Assignments in the order they were made (outermost level first).
    pub fn iter(&self) -> impl Iterator<Item = (H, StickyPos, u32)> + '_ {
        self.order.iter().map(|&handle| {
            let (pos, depth) = self.map[&handle];
            (handle, pos, depth)
        })
    }

    fn insert(&mut self, handle: H, pos: StickyPos, depth: u32) {
        self.order.push(handle);
        self.map.insert(handle, (pos, depth));
    }
}

/// Compute the sticky assignment for the current forest, geometry, and
/// scroll offset.
///
/// The scroll offset is read once at the start of the pass; rows are
/// measured through `cache`, so a pass costs at most one host measurement
/// per visible row.
pub fn compute<D: DocumentHost>(
    forest: &Forest<D::Handle>,
    cache: &mut MeasureCache,
    host: &mut D,
) -> Result<StickyLayout<D::Handle>> {
    let mut layout = StickyLayout::new();
    let scroll_y = host.scroll_y();
    stack_level(
        forest,
        cache,
        host,
        &mut layout,
        forest.roots(),
        scroll_y,
        None,
        None,
    )?;
    Ok(layout)
}

#[allow(clippy::too_many_arguments)]
fn stack_level<D: DocumentHost>(
    forest: &Forest<D::Handle>,
    cache: &mut MeasureCache,
    host: &mut D,
    layout: &mut StickyLayout<D::Handle>,
    siblings: &[NodeId],
    scroll_y: Px,
    pusher: Option<NodeId>,
    holder: Option<NodeId>,
) -> Result<()> {
    // Boundary below which this level's banner may extend: the bottom of
    // the enclosing holder's banner, or the viewport top when the holder
    // was never actually pinned.
    let mut visible_top: Px = 0.0;
    if let Some(holder_id) = holder {
        let height = cache.rect_of(host, holder_id, forest.handle(holder_id))?.height;
        if let Some(top) = layout.sticky_top(forest.handle(holder_id)) {
            visible_top = top + height + ITEM_GAP;
        }
    }

    // First sibling whose natural top lies strictly below the boundary.
    // It is the one that will eventually scroll up and push the current
    // holder out.
    let mut next_pusher_index = None;
    for (i, &id) in siblings.iter().enumerate() {
        let rect = cache.rect_of(host, id, forest.handle(id))?;
        if rect.natural_top(scroll_y) > visible_top {
            next_pusher_index = Some(i);
            break;
        }
    }

    let next_pusher = next_pusher_index.map(|i| siblings[i]).or(pusher);
    let next_holder = match next_pusher_index {
        // Nothing at this level demands pushing yet; the last sibling is
        // the pin candidate.
        None => siblings.last().copied(),
        // The pusher is the first sibling, so there is nothing before it
        // to pin.
        Some(0) => None,
        Some(i) => Some(siblings[i - 1]),
    };

    // Early out: a pusher already above the boundary means nothing at
    // this level (or below it) needs pinning yet.
    if let Some(pusher_id) = next_pusher {
        let rect = cache.rect_of(host, pusher_id, forest.handle(pusher_id))?;
        if rect.natural_top(scroll_y) < visible_top {
            return Ok(());
        }
    }

    let Some(holder_id) = next_holder else {
        return Ok(());
    };

    let rect = cache.rect_of(host, holder_id, forest.handle(holder_id))?;
    let natural_top = rect.natural_top(scroll_y);
    let mut top = visible_top.max(natural_top);
    let mut pushed = false;

    if let Some(pusher_id) = next_pusher {
        let pusher_top = cache
            .rect_of(host, pusher_id, forest.handle(pusher_id))?
            .natural_top(scroll_y);
        if pusher_top - rect.height < top {
            // The pusher is encroaching: clamp so the banner slides out
            // from under it instead of sitting on the boundary.
            top = pusher_top - rect.height;
            pushed = true;
        }
    }

    // A row whose natural position already satisfies stickiness is left
    // unassigned rather than artificially pinned.
    #[allow(clippy::float_cmp)]
    if top != natural_top {
        layout.insert(
            forest.handle(holder_id),
            StickyPos { top, pushed },
            forest.depth(holder_id),
        );
    }

    let children = forest.children(holder_id);
    if !children.is_empty() {
        stack_level(
            forest,
            cache,
            host,
            layout,
            children,
            scroll_y,
            next_pusher,
            Some(holder_id),
        )?;
    }
    Ok(())
}
