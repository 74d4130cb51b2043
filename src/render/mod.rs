//! The rendering engine.
//!
//! Turns a drawing routine plus a resolved geometry into an artifact on
//! disk. The engine owns the base [`Style`] and clones it into every
//! figure, so routines can restyle their own figure freely without
//! affecting the next one.

pub mod patch;
pub mod pdf;
pub mod pgf;

use std::fs;
use std::path::{Path, PathBuf};

use crate::errors::{Error, NotFound, RenderFailure};
use crate::figure::{Bounds, Figure};
use crate::log::debug;
use crate::naming;
use crate::style::Style;

/// Output format of a rendered figure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// Pgf macros, for embedding in a document.
    Pgf,
    /// A standalone single-page PDF, for previewing.
    Pdf,
}

impl Format {
    pub fn extension(self) -> &'static str {
        match self {
            Format::Pgf => "pgf",
            Format::Pdf => "pdf",
        }
    }
}

/// Renders figures against a base style.
#[derive(Debug, Clone, Default)]
pub struct RenderEngine {
    pub base_style: Style,
}

impl RenderEngine {
    pub fn new(base_style: Style) -> Self {
        RenderEngine { base_style }
    }

    /// Run a drawing routine and write the resulting artifact.
    ///
    /// The output file is `<stem>-<w>x<h>.<ext>` inside `output_dir`,
    /// which must already exist; it is never created implicitly, since a
    /// missing output directory usually means the document build is
    /// running from the wrong place. Returns the path of the artifact.
    /// Nothing is written when the routine fails.
    pub fn draw<F>(
        &self,
        render_fn: F,
        stem: &str,
        width: f64,
        height: f64,
        output_dir: &Path,
        format: Format,
    ) -> Result<PathBuf, Error>
    where
        F: FnOnce(&mut Figure) -> Result<(), RenderFailure>,
    {
        if !output_dir.is_dir() {
            return Err(NotFound::OutputDir(output_dir.to_path_buf()).into());
        }

        let mut figure = Figure::new(width, height, self.base_style.clone());
        render_fn(&mut figure)?;
        figure_tweaks(&mut figure);

        let name = naming::with_geometry(stem, width, height);
        let path = output_dir.join(format!("{name}.{}", format.extension()));
        debug!(
            "rendering figure to {:?}, content bounds {:?}",
            path,
            figure.content_bounds()
        );

        match format {
            Format::Pgf => {
                let text = pgf::serialize(&figure);
                fs::write(&path, text).map_err(RenderFailure::from)?;
                patch::patch_pgf_file(&path, image_dir(output_dir))
                    .map_err(RenderFailure::from)?;
            }
            Format::Pdf => pdf::write(&figure, &path)?,
        }

        Ok(path)
    }
}

/// Final adjustments applied to every figure after its routine ran:
/// legend frames pick up the axes frame width so the two always match.
fn figure_tweaks(figure: &mut Figure) {
    let frame_width = figure.style.axes_line_width;
    for axes in figure.axes_mut() {
        if let Some(legend) = axes.legend_config_mut() {
            legend.frame_line_width = frame_width;
        }
    }
}

/// Crop window for serialization: the union of everything drawn, with
/// zero padding, so an artifact ships no surrounding whitespace. An
/// empty or degenerate figure falls back to the full canvas.
pub(crate) fn crop_bounds(figure: &Figure) -> Bounds {
    let size = figure.size();
    match figure.content_bounds() {
        Some(b) if b.width() > 0.0 && b.height() > 0.0 => b,
        _ => Bounds::from_xywh(0.0, 0.0, size.x, size.y),
    }
}

/// Directory prefix for image references inside a pgf artifact. The
/// document is processed from the current directory, so artifacts stored
/// there need no prefix.
fn image_dir(output_dir: &Path) -> Option<&str> {
    if output_dir == Path::new(".") || output_dir.as_os_str().is_empty() {
        None
    } else {
        output_dir.to_str()
    }
}
