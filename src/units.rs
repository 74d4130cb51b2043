//! Length token resolution.
//!
//! Figure option values arrive as raw text from the document: a bare
//! number, a number with a unit suffix, or a number scaled by a named
//! document dimension. Everything resolves to inches, the canonical unit
//! of the whole pipeline.

use crate::errors::ParseError;
use crate::host::Metrics;

/// TeX points per inch.
pub const PT_PER_INCH: f64 = 72.27;

/// Resolve one length token to inches.
///
/// Forms, tried in order:
/// - trailing `{}` stripped (an artifact of the document command syntax,
///   e.g. `0.5\textwidth{}`), then whitespace trimmed
/// - a bare numeric literal (exponent forms included), interpreted as a
///   multiple of the line width
/// - `<n>pt`, `<n>in`, `<n>cm`, `<n>mm` with fixed conversion constants
/// - `<n>\textwidth`, `<n>\linewidth` scaled by the document dimension
///
/// `options` is the full original option string, carried into errors for
/// diagnosability.
pub fn resolve(token: &str, metrics: &Metrics, options: &str) -> Result<f64, ParseError> {
    let mut s = token.trim();
    if let Some(stripped) = s.strip_suffix("{}") {
        s = stripped.trim_end();
    }

    let unit_error = || ParseError::Unit {
        token: token.trim().to_string(),
        options: options.to_string(),
    };

    // Bare numbers, exponent forms included, scale the line width
    if let Ok(n) = s.parse::<f64>() {
        return Ok(n * metrics.line_width);
    }

    // Split at the first character that can start a unit or dimension name
    let split = s
        .find(|c: char| c.is_ascii_alphabetic() || c == '\\')
        .unwrap_or(s.len());
    let (number, suffix) = s.split_at(split);
    let n: f64 = number.trim().parse().map_err(|_| unit_error())?;

    match suffix.trim() {
        "pt" => Ok(n / PT_PER_INCH),
        "in" => Ok(n),
        "cm" => Ok(n / 2.54),
        "mm" => Ok(n / 25.4),
        "\\textwidth" => Ok(n * metrics.text_width),
        "\\linewidth" => Ok(n * metrics.line_width),
        _ => Err(unit_error()),
    }
}
