//! C source emission of the compiled tables.
//!
//! The emitted artifact is compiled into the embedded server build. It
//! forward-declares one `extern` handler per distinct resource and renders
//! every map's node and link tables, paired up in `rm_maps` with map ids as
//! indices. Table sentinels: -1 for "no link chain" and "no submap", NULL
//! for "no handler". A map with no links gets no link table and a NULL slot
//! in the directory table instead of an empty C array.

use std::io::{self, Write};

use crate::map::{Map, NodeState, Terminal};
use crate::registry::MapRegistry;

/// Writes the compiled map tables of a whole run as one C source file.
pub fn write_map_source<W: Write>(out: &mut W, registry: &MapRegistry) -> io::Result<()> {
    writeln!(out, "/* Generated by resmap-scan. Do not edit. */")?;
    writeln!(out)?;
    writeln!(out, "#include <resmap.h>")?;
    writeln!(out)?;

    for handler in registry.handlers() {
        writeln!(out, "extern const RmHandler rm_{handler}_handler;")?;
    }
    if !registry.handlers().is_empty() {
        writeln!(out)?;
    }

    for (id, map) in registry.maps().iter().enumerate() {
        write_node_table(out, id, map)?;
        write_link_table(out, id, map)?;
    }

    writeln!(out, "const RmMap rm_maps[] = {{")?;
    let count = registry.maps().len();
    for (id, map) in registry.maps().iter().enumerate() {
        let links = if map.links().is_empty() {
            "NULL".to_owned()
        } else {
            format!("rm_map_links_{id}")
        };
        let comma = if id + 1 == count { "" } else { "," };
        writeln!(out, "\t{{rm_map_nodes_{id}, {links}}}{comma}")?;
    }
    writeln!(out, "}};")?;
    Ok(())
}

fn write_node_table<W: Write>(out: &mut W, id: usize, map: &Map) -> io::Result<()> {
    writeln!(out, "static const RmMapNode rm_map_nodes_{id}[] = {{")?;
    let count = map.nodes().len();
    for (index, node) in map.nodes().iter().enumerate() {
        let link_head = match node.state {
            NodeState::Branching { head } => head.get() as i64,
            _ => -1,
        };
        let (submap, handler) = match &node.terminal {
            Terminal::Empty => (-1, "NULL".to_owned()),
            Terminal::Handler(name) => (-1, format!("&rm_{name}_handler")),
            Terminal::SubMap(sub) => (sub.get() as i64, "NULL".to_owned()),
        };
        let comma = if index + 1 == count { "" } else { "," };
        writeln!(out, "\t{{{link_head}, {submap}, {handler}}}{comma}")?;
    }
    writeln!(out, "}};")?;
    Ok(())
}

fn write_link_table<W: Write>(out: &mut W, id: usize, map: &Map) -> io::Result<()> {
    if map.links().is_empty() {
        return Ok(());
    }
    writeln!(out, "static const RmMapLink rm_map_links_{id}[] = {{")?;
    let count = map.links().len();
    for (index, link) in map.links().iter().enumerate() {
        let next = link
            .next
            .to_option()
            .map(|next| next.get() as i64)
            .unwrap_or(-1);
        let comma = if index + 1 == count { "" } else { "," };
        writeln!(
            out,
            "\t{{{}, {next}, {}}}{comma}",
            link.chr,
            link.target.get()
        )?;
    }
    writeln!(out, "}};")?;
    Ok(())
}
