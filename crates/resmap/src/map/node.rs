//! Node, link, and terminal types for one directory-level map.

use super::index::{LinkIndex, MapId, NodeIndex, OptionLinkIndex};

/// What a node resolves to once a full name has been consumed there.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Terminal {
    /// Purely structural node.
    #[default]
    Empty,
    /// A file resource, referencing its normalized handler identifier.
    Handler(Box<str>),
    /// A subdirectory, referencing the map compiled for it.
    SubMap(MapId),
}

impl Terminal {
    /// Returns true for a purely structural node.
    #[inline]
    pub fn is_empty(&self) -> bool {
        matches!(self, Terminal::Empty)
    }
}

/// An unmaterialized suffix of an inserted name.
///
/// The suffix is the last `remaining` bytes of `name`. While `remaining > 0`
/// the suffix exists only implicitly, and `terminal` travels with it until
/// the node where its last byte is materialized. `remaining == 0` is the
/// bookkeeping marker for "a name ended exactly here"; the terminal has
/// already landed on the node itself and the inner one is Empty.
#[derive(Debug, Clone)]
pub struct Tail {
    /// The full original name; the suffix is its last `remaining` bytes.
    pub name: Box<str>,
    /// Number of name bytes not yet materialized as links.
    pub remaining: usize,
    /// Carried until the suffix is fully materialized.
    pub terminal: Terminal,
}

impl Tail {
    /// The unmaterialized suffix bytes.
    #[inline]
    pub fn suffix(&self) -> &[u8] {
        &self.name.as_bytes()[self.name.len() - self.remaining..]
    }
}

/// Outgoing-edge state of a node.
///
/// The three states make the laziness invariants structural: only a
/// `Branching` node has real links, and a node carrying an unmaterialized
/// suffix cannot have any.
#[derive(Debug, Clone, Default)]
pub enum NodeState {
    /// Fresh node with nothing recorded below it (an empty map's root).
    #[default]
    Unvisited,
    /// A deferred suffix ends below (or exactly at) this node.
    Deferred(Tail),
    /// At least one materialized link.
    Branching {
        /// Head of this node's link chain.
        head: LinkIndex,
    },
}

/// A state in a map's automaton.
#[derive(Debug, Clone, Default)]
pub struct Node {
    /// Outgoing edges, explicit or deferred.
    pub state: NodeState,
    /// Set at most once, when a name's full path is consumed at this node.
    pub terminal: Terminal,
}

/// A labeled transition between two nodes of the same map.
///
/// Links from one source node form a singly linked chain through `next`, in
/// insertion-reverse order. Chain order affects neither reachability nor the
/// set of matchable strings.
#[derive(Debug, Clone)]
pub struct Link {
    /// Transition byte.
    pub chr: u8,
    /// Next sibling link of the same source node.
    pub next: OptionLinkIndex,
    /// Node this transition leads to.
    pub target: NodeIndex,
}
