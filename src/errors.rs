//! Error types with rich diagnostics using miette
//!
//! Parse errors over the argument grammar carry source spans; everything
//! else carries the offending token or path so a failed document build
//! names exactly what went wrong.

use std::path::PathBuf;

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

// ============================================================================
// Parse Errors
// ============================================================================

/// Errors from the option string, the call-argument literal grammar, or a
/// length token. Always carries the original offending substring.
#[derive(Error, Diagnostic, Debug)]
pub enum ParseError {
    #[error("could not parse argument string")]
    #[diagnostic(code(figtex::parse::arguments))]
    Arguments {
        #[source_code]
        src: NamedSource<String>,
        #[label("{message}")]
        span: SourceSpan,
        message: String,
    },

    #[error("duplicate keyword argument `{name}`")]
    #[diagnostic(code(figtex::parse::duplicate_keyword))]
    DuplicateKeyword {
        name: String,
        #[source_code]
        src: NamedSource<String>,
        #[label("repeated here")]
        span: SourceSpan,
    },

    #[error("unrecognised length `{token}` in figure options `{options}`")]
    #[diagnostic(code(figtex::parse::unit))]
    Unit { token: String, options: String },

    #[error("unknown figure option `{key}` in `{options}`")]
    #[diagnostic(code(figtex::parse::unknown_option))]
    UnknownOption { key: String, options: String },

    #[error("figure option `{key}` given more than once in `{options}`")]
    #[diagnostic(code(figtex::parse::duplicate_option))]
    DuplicateOption { key: String, options: String },

    #[error("too many positional figure options in `{options}`")]
    #[diagnostic(
        code(figtex::parse::too_many_positional),
        help("at most two bare tokens are accepted: width, then height")
    )]
    TooManyPositional { options: String },

    #[error("malformed figure option `{token}` in `{options}`")]
    #[diagnostic(code(figtex::parse::malformed_option))]
    MalformedOption { token: String, options: String },

    #[error("figure options `{options}` produce a non-positive size")]
    #[diagnostic(code(figtex::parse::invalid_geometry))]
    InvalidGeometry { options: String },

    #[error("invalid {what} `{value}` in document context")]
    #[diagnostic(code(figtex::parse::metric))]
    Metric { what: &'static str, value: String },
}

// ============================================================================
// Missing Files
// ============================================================================

/// A script file or output directory is missing. Fatal for the current
/// invocation; never retried.
#[derive(Error, Diagnostic, Debug)]
pub enum NotFound {
    #[error("figure script `{name}` not found (resolved to {resolved:?})")]
    #[diagnostic(code(figtex::not_found::script))]
    Script { name: String, resolved: PathBuf },

    #[error("output directory {0:?} does not exist")]
    #[diagnostic(
        code(figtex::not_found::output_dir),
        help("the output directory is never created implicitly")
    )]
    OutputDir(PathBuf),
}

// ============================================================================
// Contract Violations
// ============================================================================

/// A resolved script has no usable drawing routine behind it.
#[derive(Error, Diagnostic, Debug)]
#[error("script {script:?}: {message}")]
#[diagnostic(code(figtex::contract))]
pub struct ContractViolation {
    pub script: PathBuf,
    pub message: String,
}

// ============================================================================
// Render Failures
// ============================================================================

/// Backend failure while drawing or serializing. Propagated verbatim since
/// diagnosing these requires the original error.
#[derive(Error, Debug)]
pub enum RenderFailure {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Pdf(#[from] lopdf::Error),

    #[error("{0}")]
    Draw(String),
}

// ============================================================================
// Top-Level Error
// ============================================================================

/// Any failure in the figure pipeline. All failures are local and
/// synchronous: either an artifact is fully written or no path is reported.
#[derive(Error, Diagnostic, Debug)]
pub enum Error {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    NotFound(#[from] NotFound),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Contract(#[from] ContractViolation),

    #[error(transparent)]
    #[diagnostic(code(figtex::render))]
    Render(#[from] RenderFailure),
}
