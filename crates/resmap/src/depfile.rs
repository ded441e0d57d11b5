//! Makefile dependency fragment emission.
//!
//! Each scanned resource is turned into a C array by the companion
//! `resmap-convert` tool before the server build compiles it. The fragment
//! wires those conversions into the enclosing Makefile: a converter
//! default, the list of generated sources, and one rule per resource.

use std::fmt::Write as _;
use std::io::{self, Write};
use std::path::Path;

use crate::scan::{Entry, EntryKind};

/// Writes the Makefile dependency fragment for a scanned tree.
///
/// `root` is the directory `tree` was scanned from; generated sources land
/// next to the resources they are converted from.
pub fn write_depfile<W: Write>(out: &mut W, root: &Path, tree: &Entry) -> io::Result<()> {
    writeln!(out, "# Generated by resmap-scan. Do not edit.")?;
    writeln!(out)?;
    writeln!(out, "ifeq ($(RESMAP_CONVERTER),)")?;
    writeln!(out, "RESMAP_CONVERTER:=resmap-convert")?;
    writeln!(out, "endif")?;
    writeln!(out)?;

    let mut sources = Vec::new();
    let mut rules = String::new();
    collect(root, tree, &mut sources, &mut rules);

    writeln!(out, "RESMAP_SRCS:={}", sources.join(" "))?;
    writeln!(out)?;
    write!(out, "{rules}")?;
    Ok(())
}

fn collect(dir: &Path, entry: &Entry, sources: &mut Vec<String>, rules: &mut String) {
    for child in entry.children() {
        match &child.kind {
            EntryKind::Directory { .. } => {
                collect(&dir.join(&*child.name), child, sources, rules);
            }
            EntryKind::File { handler } => {
                let source = dir.join(format!("{handler}.c"));
                let input = dir.join(&*child.name);
                let _ = writeln!(rules, "{}: {}", source.display(), input.display());
                let _ = writeln!(rules, "\t$(RESMAP_CONVERTER) -o $@ $<");
                let _ = writeln!(rules);
                sources.push(source.display().to_string());
            }
        }
    }
}
