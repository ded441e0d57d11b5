//! resmap-scan: compile a static resource directory into dispatch tables.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;

use resmap::{depfile, emit, scan_root, MapRegistry};

/// Compile a directory of static resources into embedded dispatch tables.
#[derive(Debug, Parser)]
#[command(name = "resmap-scan", version)]
struct Args {
    /// Root directory of the static resources.
    root: PathBuf,

    /// Write the compiled map tables as C source to FILE.
    #[arg(short = 'c', long = "map-file", value_name = "FILE")]
    map_file: Option<PathBuf>,

    /// Write a Makefile dependency fragment to FILE.
    #[arg(short = 'm', long = "dep-file", value_name = "FILE")]
    dep_file: Option<PathBuf>,
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    let tree = match scan_root(&args.root) {
        Ok(tree) => tree,
        Err(err) => {
            log::error!("{err}");
            return ExitCode::FAILURE;
        }
    };

    let mut registry = MapRegistry::new();
    registry.compile(&tree);

    // a failed output is reported and skipped; the other still runs
    if let Some(path) = &args.map_file {
        match write_output(path, |out| emit::write_map_source(out, &registry)) {
            Ok(()) => log::info!("generated map file {path:?}"),
            Err(err) => log::error!("cannot write map file {path:?}: {err}"),
        }
    }

    if let Some(path) = &args.dep_file {
        match write_output(path, |out| depfile::write_depfile(out, &args.root, &tree)) {
            Ok(()) => log::info!("generated dependency file {path:?}"),
            Err(err) => log::error!("cannot write dependency file {path:?}: {err}"),
        }
    }

    ExitCode::SUCCESS
}

fn write_output(
    path: &Path,
    write: impl FnOnce(&mut BufWriter<File>) -> io::Result<()>,
) -> io::Result<()> {
    let mut out = BufWriter::new(File::create(path)?);
    write(&mut out)?;
    out.flush()
}
