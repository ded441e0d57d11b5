//! Directory scanning that builds the entry tree fed to the compiler.
//!
//! The walk mirrors the shape of the filesystem: children are collected per
//! directory and sorted by name, so repeated runs hand the compiler the same
//! order and produce identical numeric ids (ordering never affects the
//! accepted language). Unreadable subdirectories degrade to empty
//! directories with a diagnostic; the rest of the tree still compiles.

use std::fs;
use std::path::Path;

use crate::error::{ResmapError, Result};

/// One named entry of the tree handed to the compiler.
#[derive(Debug)]
pub struct Entry {
    /// The filename (not the full path).
    pub name: Box<str>,
    /// File or directory payload.
    pub kind: EntryKind,
}

/// Payload of an [`Entry`].
#[derive(Debug)]
pub enum EntryKind {
    /// A resource file; `handler` is the normalized identifier the emitted
    /// tables reference.
    File { handler: Box<str> },
    /// A subdirectory with its children, sorted by name.
    Directory { children: Vec<Entry> },
}

impl Entry {
    /// Creates a file entry, deriving its handler identifier from the name.
    pub fn file(name: &str) -> Self {
        Self {
            name: name.into(),
            kind: EntryKind::File {
                handler: handler_ident(name),
            },
        }
    }

    /// Creates a directory entry.
    pub fn directory(name: &str, children: Vec<Entry>) -> Self {
        Self {
            name: name.into(),
            kind: EntryKind::Directory { children },
        }
    }

    /// Returns true for a directory entry.
    #[inline]
    pub fn is_dir(&self) -> bool {
        matches!(self.kind, EntryKind::Directory { .. })
    }

    /// The entry's children; empty for files.
    pub fn children(&self) -> &[Entry] {
        match &self.kind {
            EntryKind::Directory { children } => children,
            EntryKind::File { .. } => &[],
        }
    }
}

/// Normalizes a resource name into an identifier usable in generated code.
///
/// Every character outside `[A-Za-z0-9]` becomes `_`, so `index.html`
/// yields `index_html`.
pub fn handler_ident(name: &str) -> Box<str> {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect::<String>()
        .into_boxed_str()
}

/// Scans `root` into an entry tree.
///
/// The returned entry is the root directory itself; its name is the last
/// path component. Fails if `root` is missing or not a directory —
/// unreadable subdirectories deeper in the tree are tolerated and logged
/// instead.
pub fn scan_root(root: &Path) -> Result<Entry> {
    let metadata =
        fs::metadata(root).map_err(|_| ResmapError::RootNotFound(root.to_path_buf()))?;
    if !metadata.is_dir() {
        return Err(ResmapError::NotADirectory(root.to_path_buf()));
    }

    let name = root
        .file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| root.to_string_lossy().into_owned());

    // unlike interior directories, a root we cannot read is fatal
    let read_dir = fs::read_dir(root)?;
    Ok(Entry::directory(&name, scan_children(read_dir)))
}

fn scan_dir(path: &Path, name: &str) -> Entry {
    match fs::read_dir(path) {
        Ok(read_dir) => Entry::directory(name, scan_children(read_dir)),
        Err(err) => {
            log::warn!("cannot read directory {path:?}, skipping its contents: {err}");
            Entry::directory(name, Vec::new())
        }
    }
}

fn scan_children(read_dir: fs::ReadDir) -> Vec<Entry> {
    let mut children = Vec::new();
    for entry in read_dir.flatten() {
        let name = entry.file_name().to_string_lossy().into_owned();
        let path = entry.path();

        // follow symlinks; the server serves whatever they point at
        let metadata = match fs::metadata(&path) {
            Ok(metadata) => metadata,
            Err(err) => {
                log::debug!("cannot stat {path:?}, skipping: {err}");
                continue;
            }
        };

        if metadata.is_dir() {
            log::info!("add directory {name:?}");
            children.push(scan_dir(&path, &name));
        } else if metadata.is_file() {
            log::info!("add file {name:?}");
            children.push(Entry::file(&name));
        }
    }
    children.sort_unstable_by(|a, b| a.name.cmp(&b.name));
    children
}
