//! Standalone figure previews.
//!
//! Running a drawing routine outside any document produces a fixed-size
//! PDF next to the current directory, so a routine can be iterated on
//! without a full document build.

use std::path::{Path, PathBuf};

use crate::context::FigureContext;
use crate::errors::Error;
use crate::render::{Format, RenderEngine};
use crate::scripts::EntryPoint;
use crate::style::Style;
use crate::value::ParsedCall;

/// Side length of a standalone preview, inches.
pub const PREVIEW_SIZE: f64 = 4.0;

/// Render a preview of one routine into the current directory and print
/// where it went. Returns the artifact path.
pub fn run_standalone(script_name: &str, entry_point: EntryPoint) -> Result<PathBuf, Error> {
    let path = run_standalone_in(script_name, entry_point, Path::new("."))?;
    println!("Saved figure as {}", path.display());
    Ok(path)
}

/// As [`run_standalone`], but into a chosen directory and without the
/// chatter.
pub fn run_standalone_in(
    script_name: &str,
    entry_point: EntryPoint,
    output_dir: &Path,
) -> Result<PathBuf, Error> {
    let context = FigureContext::standalone(
        script_name,
        entry_point,
        PREVIEW_SIZE,
        PREVIEW_SIZE,
        RenderEngine::new(Style::default()),
        Format::Pdf,
        output_dir.to_path_buf(),
    );
    context.draw(&ParsedCall::default())
}
