//! Ownership of all maps produced during one compilation run.

use fnv::FnvHashSet;

use crate::map::{Map, MapId, Terminal};
use crate::scan::{Entry, EntryKind};

/// Owns every [`Map`] of one run, assigns their sequential ids, and
/// accumulates the handler references the emitter must forward-declare.
///
/// Write-once per run: maps and handlers only accumulate during
/// [`compile`](Self::compile) and are read out afterward. Nothing is shared
/// across runs; the compiled tables are always rebuilt from the filesystem.
#[derive(Debug, Default)]
pub struct MapRegistry {
    maps: Vec<Map>,
    handlers: Vec<Box<str>>,
    seen: FnvHashSet<Box<str>>,
}

impl MapRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Recursively compiles `dir` and every subdirectory into maps.
    ///
    /// A subdirectory is compiled before the parent node referencing it is
    /// finalized, so a `SubMap` terminal always names a finished map. The
    /// first call of a run compiles the root directory as [`MapId`] 0.
    pub fn compile(&mut self, dir: &Entry) -> MapId {
        debug_assert!(dir.is_dir(), "compile takes a directory entry");
        let id = self.add_map();
        for child in dir.children() {
            let terminal = match &child.kind {
                EntryKind::File { handler } => {
                    self.record_handler(handler);
                    Terminal::Handler(handler.clone())
                }
                EntryKind::Directory { .. } => Terminal::SubMap(self.compile(child)),
            };
            self.maps[id.get()].insert(&child.name, terminal);
        }
        self.maps[id.get()].seal();
        id
    }

    /// Records a handler identifier, idempotently.
    ///
    /// Duplicate declarations are harmless; each distinct handler appears
    /// exactly once, in first-seen order, for deterministic emission.
    pub fn record_handler(&mut self, name: &str) {
        if self.seen.insert(name.into()) {
            self.handlers.push(name.into());
        }
    }

    /// All maps, in id order; the slice index equals the [`MapId`].
    #[inline]
    pub fn maps(&self) -> &[Map] {
        &self.maps
    }

    /// Returns the map compiled under `id`.
    #[inline]
    pub fn map(&self, id: MapId) -> &Map {
        &self.maps[id.get()]
    }

    /// Distinct handler references, in first-seen order.
    #[inline]
    pub fn handlers(&self) -> &[Box<str>] {
        &self.handlers
    }

    fn add_map(&mut self) -> MapId {
        let id = MapId::new(self.maps.len());
        self.maps.push(Map::new());
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nested_directories_compile_to_linked_maps() {
        // assets/{a.css, img/{b.png}}
        let tree = Entry::directory(
            "assets",
            vec![
                Entry::file("a.css"),
                Entry::directory("img", vec![Entry::file("b.png")]),
            ],
        );

        let mut registry = MapRegistry::new();
        let root = registry.compile(&tree);

        assert_eq!(root, MapId::new(0));
        assert_eq!(registry.maps().len(), 2);

        let outer = registry.map(root);
        assert_eq!(
            *outer.lookup("a.css"),
            Terminal::Handler("a_css".into())
        );
        let Terminal::SubMap(inner_id) = outer.lookup("img") else {
            panic!("img should reference a sub-map");
        };
        let inner = registry.map(*inner_id);
        assert_eq!(
            *inner.lookup("b.png"),
            Terminal::Handler("b_png".into())
        );

        let expected: Vec<Box<str>> = vec!["a_css".into(), "b_png".into()];
        assert_eq!(registry.handlers(), expected.as_slice());
    }

    #[test]
    fn empty_directory_compiles_to_single_node_map() {
        let tree = Entry::directory("www", Vec::new());
        let mut registry = MapRegistry::new();
        let id = registry.compile(&tree);

        let map = registry.map(id);
        assert_eq!(map.nodes().len(), 1);
        assert!(map.links().is_empty());
        assert!(registry.handlers().is_empty());
    }

    #[test]
    fn handler_recording_is_idempotent() {
        let mut registry = MapRegistry::new();
        registry.record_handler("style_css");
        registry.record_handler("logo_png");
        registry.record_handler("style_css");

        let expected: Vec<Box<str>> = vec!["style_css".into(), "logo_png".into()];
        assert_eq!(registry.handlers(), expected.as_slice());
    }

    #[test]
    fn same_name_in_two_directories_shares_one_handler() {
        // a/b.css and c/b.css normalize to the same identifier
        let tree = Entry::directory(
            "www",
            vec![
                Entry::directory("a", vec![Entry::file("b.css")]),
                Entry::directory("c", vec![Entry::file("b.css")]),
            ],
        );

        let mut registry = MapRegistry::new();
        registry.compile(&tree);

        let expected: Vec<Box<str>> = vec!["b_css".into()];
        assert_eq!(registry.handlers(), expected.as_slice());
    }

    #[test]
    fn children_are_compiled_before_parent_references_them() {
        let tree = Entry::directory(
            "www",
            vec![Entry::directory(
                "a",
                vec![Entry::directory("b", vec![Entry::file("deep.txt")])],
            )],
        );

        let mut registry = MapRegistry::new();
        let root = registry.compile(&tree);
        assert_eq!(registry.maps().len(), 3);

        // every submap id resolves to an already-sealed map
        let Terminal::SubMap(a) = registry.map(root).lookup("a") else {
            panic!("a should reference a sub-map");
        };
        let Terminal::SubMap(b) = registry.map(*a).lookup("b") else {
            panic!("b should reference a sub-map");
        };
        assert_eq!(
            *registry.map(*b).lookup("deep.txt"),
            Terminal::Handler("deep_txt".into())
        );
    }
}
