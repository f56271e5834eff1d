#![forbid(unsafe_code)]

//! Forest reconstruction from the flat visible sequence.
//!
//! The host reports visible rows in document order, each carrying only its
//! nesting depth. A comment tree is visited depth-first, so consecutive
//! depths can increase by exactly one, stay equal, or drop to any
//! shallower ancestor. [`Forest::build`] replays that walk with an
//! ancestor stack and materializes the parent/children edges.
//!
//! Rebuilds are wholesale: a new forest replaces the old one atomically,
//! never patching edges incrementally. Node ids are arena indices valid
//! only for the generation they were built in.

use smallvec::SmallVec;
use threadpin_core::host::RowRef;

/// Arena index of a node, valid for one forest generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(u32);

impl NodeId {
    /// Index into the node arena.
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone)]
struct Node<H> {
    handle: H,
    depth: u32,
    children: Vec<NodeId>,
}

/// Ordered forest of visible rows.
///
/// Owns no row resources; nodes hold host handles plus tree edges, and the
/// whole structure is discarded on the next rebuild.
#[derive(Debug, Clone)]
pub struct Forest<H> {
    nodes: Vec<Node<H>>,
    roots: Vec<NodeId>,
}

impl<H> Default for Forest<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H> Forest<H> {
    /// Create an empty forest.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            nodes: Vec::new(),
            roots: Vec::new(),
        }
    }

    /// Root nodes in document order.
    #[inline]
    #[must_use]
    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    /// Children of a node in document order.
    #[inline]
    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.index()].children
    }

    /// Nesting depth of a node.
    #[inline]
    #[must_use]
    pub fn depth(&self, id: NodeId) -> u32 {
        self.nodes[id.index()].depth
    }

    /// Total number of nodes.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the forest has no nodes.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

impl<H: Copy + std::fmt::Debug> Forest<H> {
    /// Host handle of a node.
    #[inline]
    #[must_use]
    pub fn handle(&self, id: NodeId) -> H {
        self.nodes[id.index()].handle
    }

    /// Build a forest from the ordered visible sequence.
    ///
    /// For each row, the ancestor stack is popped until the row's depth
    /// equals the stack length; the row then becomes a root (empty stack)
    /// or the last child of the stack top. A depth that still disagrees
    /// with the stack after popping means upstream visibility filtering is
    /// broken; this is logged as an assertion failure and the row is
    /// attached to the nearest ancestor anyway, matching how malformed
    /// input degrades rather than aborting the rebuild.
    #[must_use]
    pub fn build(rows: &[RowRef<H>]) -> Self {
        let mut forest = Self {
            nodes: Vec::with_capacity(rows.len()),
            roots: Vec::new(),
        };
        let mut stack: SmallVec<[NodeId; 8]> = SmallVec::new();

        for row in rows {
            while !stack.is_empty() && (row.depth as usize) < stack.len() {
                stack.pop();
            }

            if row.depth as usize != stack.len() {
                tracing::error!(
                    handle = ?row.handle,
                    depth = row.depth,
                    expected = stack.len(),
                    "visible row depth does not continue the ancestor chain"
                );
            }

            let id = NodeId(forest.nodes.len() as u32);
            forest.nodes.push(Node {
                handle: row.handle,
                depth: row.depth,
                children: Vec::new(),
            });

            match stack.last().copied() {
                None => forest.roots.push(id),
                Some(parent) => forest.nodes[parent.index()].children.push(id),
            }
            stack.push(id);
        }

        forest
    }
}
