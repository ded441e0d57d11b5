//! Per-directory transition tables with lazy leaf splitting.
//!
//! A [`Map`] is the compiled trie for one directory's immediate children.
//! Insertion keeps the tail of each name implicit on the node where it
//! diverged from its siblings; a later sibling that shares part of that tail
//! peels it into real links one character at a time, so explicit nodes exist
//! only where names actually diverge. [`Map::seal`] materializes whatever is
//! still deferred once every sibling is inserted, leaving a plain
//! deterministic automaton for the emitter.

mod index;
mod node;

pub use index::{LinkIndex, MapId, NodeIndex, OptionLinkIndex};
pub use node::{Link, Node, NodeState, Tail, Terminal};

/// The compiled transition table for one directory level.
///
/// Nodes and links live in growable arenas addressed by typed integer
/// handles; no per-cell heap allocation. A map is mutable while its
/// directory's children are being inserted and immutable once sealed.
#[derive(Debug)]
pub struct Map {
    nodes: Vec<Node>,
    links: Vec<Link>,
    sealed: bool,
}

impl Default for Map {
    fn default() -> Self {
        Self::new()
    }
}

impl Map {
    /// Creates an empty map holding only its root node.
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::default()],
            links: Vec::new(),
            sealed: false,
        }
    }

    /// All nodes, in creation order; index 0 is the root.
    #[inline]
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// All links, in creation order.
    #[inline]
    pub fn links(&self) -> &[Link] {
        &self.links
    }

    /// Returns the node at `index`.
    #[inline]
    pub fn node(&self, index: NodeIndex) -> &Node {
        &self.nodes[index.get()]
    }

    #[inline]
    fn node_mut(&mut self, index: NodeIndex) -> &mut Node {
        &mut self.nodes[index.get()]
    }

    /// Inserts one sibling name, resolving to `terminal` when matched.
    ///
    /// Sibling names at one directory level are distinct (the filesystem
    /// guarantees it), so an insertion never collides with an existing
    /// terminal. Insertion order affects only numeric node and link ids,
    /// never the accepted language.
    pub fn insert(&mut self, name: &str, terminal: Terminal) {
        debug_assert!(!self.sealed, "insert into a sealed map");
        debug_assert!(!name.is_empty(), "directory entries have non-empty names");
        let bytes = name.as_bytes();
        let mut at = NodeIndex::ROOT;
        let mut i = 0;
        while i < bytes.len() {
            // a node holding an unmaterialized suffix grows one real edge
            // before anything else can proceed through it
            if self.deferred_remaining(at) > 0 {
                self.peel_one(at);
                continue;
            }
            if let Some(target) = self.follow(at, bytes[i]) {
                at = target;
                i += 1;
                continue;
            }
            if matches!(self.node(at).state, NodeState::Unvisited) {
                // fresh root of an empty map: the whole name stays implicit
                debug_assert_eq!(i, 0, "only an empty map's root is unvisited");
                self.set_tail(at, name, i, terminal);
                return;
            }
            // diverged: one fresh edge, the rest of the name stays implicit
            let fresh = self.add_node();
            self.add_link(at, bytes[i], fresh);
            self.set_tail(fresh, name, i + 1, terminal);
            return;
        }
        // the whole name was consumed walking existing structure
        let node = self.node_mut(at);
        debug_assert!(node.terminal.is_empty(), "duplicate sibling name {name:?}");
        node.terminal = terminal;
        if matches!(node.state, NodeState::Unvisited) {
            node.state = NodeState::Deferred(Tail {
                name: name.into(),
                remaining: 0,
                terminal: Terminal::Empty,
            });
        }
    }

    /// Materializes every remaining deferred suffix.
    ///
    /// The emitted node and link tables carry no suffix column, so a map
    /// must be sealed for the emitted automaton to accept each name in
    /// full. After sealing, every tail has `remaining == 0` and the map is
    /// immutable.
    pub fn seal(&mut self) {
        let mut index = 0;
        while index < self.nodes.len() {
            let at = NodeIndex::new(index);
            // one peel turns the node into a branch point; the shortened
            // tail moves onto a fresh node visited later in this pass
            if self.deferred_remaining(at) > 0 {
                self.peel_one(at);
            }
            index += 1;
        }
        self.sealed = true;
    }

    /// Resolves a name against the sealed automaton.
    ///
    /// Returns [`Terminal::Empty`] when the name is not accepted.
    pub fn lookup(&self, name: &str) -> &Terminal {
        let mut at = NodeIndex::ROOT;
        for &chr in name.as_bytes() {
            match self.follow(at, chr) {
                Some(target) => at = target,
                None => return &Terminal::Empty,
            }
        }
        &self.node(at).terminal
    }

    /// Follows the link labeled `chr` out of `from`, if one exists.
    pub fn follow(&self, from: NodeIndex, chr: u8) -> Option<NodeIndex> {
        let NodeState::Branching { head } = self.node(from).state else {
            return None;
        };
        let mut cursor = Some(head);
        while let Some(index) = cursor {
            let link = &self.links[index.get()];
            if link.chr == chr {
                return Some(link.target);
            }
            cursor = link.next.to_option();
        }
        None
    }

    /// Every name the map accepts, sorted, including still-deferred tails.
    pub fn accepted_names(&self) -> Vec<String> {
        let mut out = Vec::new();
        self.collect_names(NodeIndex::ROOT, String::new(), &mut out);
        out.sort();
        out
    }

    fn collect_names(&self, at: NodeIndex, prefix: String, out: &mut Vec<String>) {
        let node = self.node(at);
        if !node.terminal.is_empty() {
            out.push(prefix.clone());
        }
        if let NodeState::Deferred(tail) = &node.state {
            if tail.remaining > 0 && !tail.terminal.is_empty() {
                let mut full = prefix.clone();
                full.push_str(&String::from_utf8_lossy(tail.suffix()));
                out.push(full);
            }
        }
        if let NodeState::Branching { head } = node.state {
            let mut cursor = Some(head);
            while let Some(index) = cursor {
                let link = &self.links[index.get()];
                let mut next = prefix.clone();
                next.push(link.chr as char);
                self.collect_names(link.target, next, out);
                cursor = link.next.to_option();
            }
        }
    }

    /// Checks the structural invariants; intended for tests.
    ///
    /// Verifies that the root is not terminal, that every node's outgoing
    /// transition bytes are pairwise distinct, and that link targets are in
    /// bounds. Deferred-suffix nodes having no links is structural (the
    /// enum cannot express it) and needs no check.
    pub fn debug_validate(&self) {
        assert!(
            self.node(NodeIndex::ROOT).terminal.is_empty(),
            "root node must not be terminal"
        );
        for (index, node) in self.nodes.iter().enumerate() {
            if let NodeState::Branching { head } = node.state {
                let mut seen = [false; 256];
                let mut cursor = Some(head);
                while let Some(link_index) = cursor {
                    let link = &self.links[link_index.get()];
                    assert!(
                        !seen[link.chr as usize],
                        "duplicate edge {:?} out of node {index}",
                        link.chr as char
                    );
                    seen[link.chr as usize] = true;
                    assert!(link.target.get() < self.nodes.len(), "dangling link target");
                    cursor = link.next.to_option();
                }
            }
        }
    }

    fn deferred_remaining(&self, at: NodeIndex) -> usize {
        match &self.node(at).state {
            NodeState::Deferred(tail) => tail.remaining,
            _ => 0,
        }
    }

    /// Materializes one character of the deferred suffix held by `at`.
    ///
    /// The node becomes a branch point with a single real edge; the
    /// shortened tail, and the terminal it carries, move onto the fresh
    /// target node. A tail that reaches `remaining == 0` drops its terminal
    /// onto the fresh node itself.
    fn peel_one(&mut self, at: NodeIndex) {
        let tail = match std::mem::take(&mut self.node_mut(at).state) {
            NodeState::Deferred(tail) => tail,
            _ => unreachable!("peel_one requires a deferred suffix"),
        };
        debug_assert!(tail.remaining > 0, "nothing left to peel");
        let chr = tail.suffix()[0];
        let fresh = self.add_node();
        self.add_link(at, chr, fresh);
        let node = self.node_mut(fresh);
        if tail.remaining == 1 {
            node.terminal = tail.terminal;
            node.state = NodeState::Deferred(Tail {
                name: tail.name,
                remaining: 0,
                terminal: Terminal::Empty,
            });
        } else {
            node.state = NodeState::Deferred(Tail {
                name: tail.name,
                remaining: tail.remaining - 1,
                terminal: tail.terminal,
            });
        }
    }

    /// Records the not-yet-consumed suffix of `name` on `at`.
    ///
    /// `consumed` bytes of the name were already matched by real links; the
    /// rest stays implicit until a sibling or the sealing pass splits it. A
    /// fully consumed name terminates `at` directly.
    fn set_tail(&mut self, at: NodeIndex, name: &str, consumed: usize, terminal: Terminal) {
        let node = self.node_mut(at);
        debug_assert!(matches!(node.state, NodeState::Unvisited));
        if consumed == name.len() {
            node.terminal = terminal;
            node.state = NodeState::Deferred(Tail {
                name: name.into(),
                remaining: 0,
                terminal: Terminal::Empty,
            });
        } else {
            node.state = NodeState::Deferred(Tail {
                name: name.into(),
                remaining: name.len() - consumed,
                terminal,
            });
        }
    }

    fn add_node(&mut self) -> NodeIndex {
        let index = NodeIndex::new(self.nodes.len());
        self.nodes.push(Node::default());
        index
    }

    fn add_link(&mut self, from: NodeIndex, chr: u8, target: NodeIndex) -> LinkIndex {
        let index = LinkIndex::new(self.links.len());
        let next = match self.node(from).state {
            NodeState::Branching { head } => OptionLinkIndex::some(head),
            _ => OptionLinkIndex::none(),
        };
        self.links.push(Link { chr, next, target });
        self.node_mut(from).state = NodeState::Branching { head: index };
        index
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn handler(name: &str) -> Terminal {
        Terminal::Handler(name.into())
    }

    fn build(names: &[&str]) -> Map {
        let mut map = Map::new();
        for name in names {
            map.insert(name, handler(name));
            map.debug_validate();
        }
        map
    }

    #[test]
    fn empty_directory_compiles_to_bare_root() {
        let mut map = Map::new();
        map.seal();
        map.debug_validate();

        assert_eq!(map.nodes().len(), 1);
        assert!(map.links().is_empty());
        assert!(map.node(NodeIndex::ROOT).terminal.is_empty());
        assert!(map.accepted_names().is_empty());
    }

    #[test]
    fn single_name_stays_fully_deferred_until_sealed() {
        let mut map = Map::new();
        map.insert("index.html", handler("index_html"));
        map.debug_validate();

        // nothing materialized yet: the root holds the whole name
        assert_eq!(map.nodes().len(), 1);
        assert!(map.links().is_empty());
        match &map.node(NodeIndex::ROOT).state {
            NodeState::Deferred(tail) => {
                assert_eq!(&*tail.name, "index.html");
                assert_eq!(tail.remaining, 10);
                assert_eq!(tail.terminal, handler("index_html"));
            }
            state => panic!("expected deferred root, got {state:?}"),
        }
        assert!(map.node(NodeIndex::ROOT).terminal.is_empty());
        assert_eq!(map.accepted_names(), vec!["index.html"]);

        map.seal();
        map.debug_validate();

        // one node per character plus the root, terminal at the end
        assert_eq!(map.nodes().len(), 11);
        assert_eq!(map.links().len(), 10);
        assert_eq!(*map.lookup("index.html"), handler("index_html"));
        assert!(map.lookup("index.htm").is_empty());
        assert!(map.lookup("index.html.bak").is_empty());
    }

    #[test]
    fn sibling_insertion_forces_split() {
        let mut map = build(&["cat.txt", "car.txt", "dog.txt"]);

        // root branches on first characters {c, d}
        let c = map.follow(NodeIndex::ROOT, b'c').expect("c branch");
        let d = map.follow(NodeIndex::ROOT, b'd').expect("d branch");
        assert_ne!(c, d);

        // shared "a", divergence at t vs r: two leaves under "ca"
        let ca = map.follow(c, b'a').expect("a after c");
        assert!(map.follow(ca, b't').is_some());
        assert!(map.follow(ca, b'r').is_some());
        assert!(map.follow(ca, b'x').is_none());

        map.seal();
        map.debug_validate();

        assert_eq!(
            map.accepted_names(),
            vec!["car.txt", "cat.txt", "dog.txt"]
        );
        assert_eq!(*map.lookup("cat.txt"), handler("cat.txt"));
        assert_eq!(*map.lookup("car.txt"), handler("car.txt"));
        assert_eq!(*map.lookup("dog.txt"), handler("dog.txt"));
        assert!(map.lookup("ca").is_empty());
        assert!(map.lookup("cax.txt").is_empty());
    }

    #[test]
    fn insertion_order_changes_ids_only() {
        let names = ["cat.txt", "car.txt", "ca", "carton", "dog.txt"];
        let orders: &[&[&str]] = &[
            &["cat.txt", "car.txt", "ca", "carton", "dog.txt"],
            &["dog.txt", "carton", "ca", "car.txt", "cat.txt"],
            &["ca", "cat.txt", "carton", "dog.txt", "car.txt"],
            &["carton", "dog.txt", "cat.txt", "ca", "car.txt"],
        ];

        let mut expected: Vec<String> = names.iter().map(|n| n.to_string()).collect();
        expected.sort();

        let mut shape = None;
        for order in orders {
            let mut map = build(order);
            map.seal();
            map.debug_validate();

            assert_eq!(map.accepted_names(), expected);
            for name in names {
                assert_eq!(*map.lookup(name), handler(name), "lookup {name:?}");
            }

            // the sealed trie is canonical for the name set, so the shape
            // (node and link counts) must match across insertion orders
            let counts = (map.nodes().len(), map.links().len());
            match shape {
                None => shape = Some(counts),
                Some(expected_counts) => assert_eq!(counts, expected_counts),
            }
        }
    }

    #[test]
    fn exact_prefix_names_all_survive() {
        let orders: &[&[&str]] = &[
            &["a", "ab", "abc"],
            &["abc", "ab", "a"],
            &["ab", "abc", "a"],
            &["ab", "a", "abc"],
        ];
        for order in orders {
            let mut map = build(order);
            map.seal();
            map.debug_validate();

            assert_eq!(map.accepted_names(), vec!["a", "ab", "abc"]);
            assert_eq!(*map.lookup("a"), handler("a"));
            assert_eq!(*map.lookup("ab"), handler("ab"));
            assert_eq!(*map.lookup("abc"), handler("abc"));
            assert!(map.lookup("abcd").is_empty());
            assert!(map.lookup("").is_empty());
        }
    }

    #[test]
    fn name_ending_on_deferred_path_keeps_both_terminals() {
        // "ca" ends in the middle of cat.txt's deferred suffix
        let mut map = build(&["cat.txt", "ca"]);
        map.seal();
        map.debug_validate();

        assert_eq!(map.accepted_names(), vec!["ca", "cat.txt"]);
        assert_eq!(*map.lookup("ca"), handler("ca"));
        assert_eq!(*map.lookup("cat.txt"), handler("cat.txt"));
        assert!(map.lookup("cat").is_empty());
    }

    #[test]
    fn submap_terminal_round_trips() {
        let mut map = Map::new();
        map.insert("img", Terminal::SubMap(MapId::new(1)));
        map.seal();
        map.debug_validate();

        assert_eq!(*map.lookup("img"), Terminal::SubMap(MapId::new(1)));
    }

    #[test]
    fn sealed_map_has_no_unmaterialized_suffixes() {
        let mut map = build(&["alpha.css", "beta.css", "b", "gamma"]);
        map.seal();

        for node in map.nodes() {
            if let NodeState::Deferred(tail) = &node.state {
                assert_eq!(tail.remaining, 0, "sealed map kept an implicit suffix");
            }
        }
    }
}
