//! The document-processing host boundary.
//!
//! The host extracts figure commands from the document, owns the output
//! directory conventions, and tracks dependencies between passes. The
//! core consumes it read-only through the [`Host`] trait and never owns
//! it; one host exists per document-processing session.

use std::fmt;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use crate::errors::ParseError;
use crate::units::PT_PER_INCH;

/// Read-only view of one document-processing session.
///
/// The three dimension accessors return the raw numeric strings the host
/// captured from the document (points; the font size may carry a `pt`
/// suffix). [`Metrics`] converts them once per session.
pub trait Host: fmt::Debug {
    /// Document font size, e.g. `"10"` or `"10pt"`.
    fn font_size(&self) -> String;

    /// Text width in points, as a numeric string.
    fn text_width(&self) -> String;

    /// Line width in points, as a numeric string.
    fn line_width(&self) -> String;

    /// Directory in which finished artifacts are placed.
    fn output_dir(&self) -> PathBuf;

    /// Script subdirectory configured in the document (may be empty).
    fn script_path(&self) -> PathBuf;

    /// Directory of the file currently being processed, when the
    /// relative-path option is active.
    fn current_file_dir(&self) -> Option<PathBuf>;

    /// Open a file for reading through the host, so the host records it
    /// as a dependency of the current pass.
    fn open(&self, path: &Path) -> io::Result<Box<dyn Read>>;

    /// Register an artifact the pipeline created, for cleanup and
    /// dependency bookkeeping.
    fn add_created(&self, path: &Path);
}

/// Document dimensions in the pipeline's working units: font size in
/// points, text and line width in inches.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Metrics {
    pub font_size: f64,
    pub text_width: f64,
    pub line_width: f64,
}

impl Metrics {
    /// Parse the host's raw dimension strings. Fails with a [`ParseError`]
    /// naming the malformed value.
    pub fn from_host(host: &dyn Host) -> Result<Self, ParseError> {
        Ok(Metrics {
            font_size: parse_points(&host.font_size(), "font size")?,
            text_width: parse_points(&host.text_width(), "text width")? / PT_PER_INCH,
            line_width: parse_points(&host.line_width(), "line width")? / PT_PER_INCH,
        })
    }
}

fn parse_points(raw: &str, what: &'static str) -> Result<f64, ParseError> {
    raw.trim()
        .trim_end_matches("pt")
        .trim()
        .parse()
        .map_err(|_| ParseError::Metric {
            what,
            value: raw.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_and_suffixed_points() {
        assert_eq!(parse_points("10", "font size").unwrap(), 10.0);
        assert_eq!(parse_points("10pt", "font size").unwrap(), 10.0);
        assert_eq!(parse_points(" 12.5 pt ", "font size").unwrap(), 12.5);
    }

    #[test]
    fn rejects_garbage() {
        let err = parse_points("huge", "font size").unwrap_err();
        assert!(matches!(err, ParseError::Metric { what: "font size", .. }));
    }
}
