//! Native figure rendering for PythonTeX-style document pipelines.
//!
//! A document carries inline figure commands of the form
//! `\pyfig{script}{options}{arguments}`. Each command names a drawing
//! routine, a requested geometry, and literal call arguments; processing
//! it renders the routine to a pgf artifact and returns the `\input`
//! command that embeds it. Artifacts are named deterministically from the
//! script, the arguments, and the geometry, so unchanged figures are
//! byte-stable across passes.
//!
//! The document side is abstracted behind the [`Host`] trait; drawing
//! routines are compiled in and registered in a [`ScriptRegistry`]. See
//! [`Session::figure`] for the whole pipeline in one call.

use pest_derive::Parser;

/// Parser for the literal call-argument grammar.
#[derive(Parser)]
#[grammar = "figargs.pest"]
pub struct CallParser;

pub mod args;
pub mod context;
pub mod deps;
pub mod errors;
pub mod figure;
pub mod host;
pub mod log;
pub mod naming;
pub mod options;
pub mod render;
pub mod scripts;
pub mod session;
pub mod standalone;
pub mod style;
pub mod units;
pub mod value;

pub use context::FigureContext;
pub use errors::{ContractViolation, Error, NotFound, ParseError, RenderFailure};
pub use figure::{Axes, Bounds, Color, Figure};
pub use host::{Host, Metrics};
pub use options::{GOLDEN_RATIO, ResolvedOptions};
pub use render::{Format, RenderEngine};
pub use scripts::{
    ContextDrawFn, DrawFn, EntryPoint, ScriptLoader, ScriptRegistry, SCRIPT_EXTENSION,
};
pub use session::Session;
pub use standalone::{run_standalone, run_standalone_in};
pub use style::{FontFamily, Style};
pub use units::PT_PER_INCH;
pub use value::{ParsedCall, Value};
