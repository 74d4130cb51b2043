//! Per-call figure context.
//!
//! A [`FigureContext`] is everything one figure command resolved to: the
//! script, its geometry in inches, the output location and format, and
//! the drawing routine to run. Context-aware routines receive it so they
//! can adapt their layout to the requested size.

use std::path::PathBuf;

use crate::errors::Error;
use crate::host::Host;
use crate::naming;
use crate::render::{Format, RenderEngine};
use crate::scripts::{EntryPoint, ScriptLoader, ScriptRegistry};
use crate::value::ParsedCall;

#[derive(Debug)]
pub struct FigureContext<'h> {
    host: Option<&'h dyn Host>,
    /// Script name as given in the document, e.g. `fig.py`.
    pub script_name: String,
    /// Resolved path of the script file, when one was loaded.
    pub script_path: Option<PathBuf>,
    /// Requested figure width in inches.
    pub width: f64,
    /// Requested figure height in inches.
    pub height: f64,
    pub format: Format,
    pub output_dir: PathBuf,
    entry_point: EntryPoint,
    engine: RenderEngine,
}

impl<'h> FigureContext<'h> {
    /// Build a context for a figure command inside a host session. The
    /// script file is resolved and opened here, so a missing file fails
    /// before anything is drawn.
    pub fn load(
        host: &'h dyn Host,
        registry: &ScriptRegistry,
        script_name: &str,
        width: f64,
        height: f64,
        engine: RenderEngine,
        format: Format,
    ) -> Result<Self, Error> {
        let loaded = ScriptLoader::load(host, registry, script_name)?;
        Ok(FigureContext {
            host: Some(host),
            script_name: script_name.to_string(),
            script_path: Some(loaded.path),
            width,
            height,
            format,
            output_dir: host.output_dir(),
            entry_point: loaded.entry,
            engine,
        })
    }

    /// Build a context outside any host, for previewing a single routine.
    pub fn standalone(
        script_name: &str,
        entry_point: EntryPoint,
        width: f64,
        height: f64,
        engine: RenderEngine,
        format: Format,
        output_dir: PathBuf,
    ) -> Self {
        FigureContext {
            host: None,
            script_name: script_name.to_string(),
            script_path: None,
            width,
            height,
            format,
            output_dir,
            entry_point,
            engine,
        }
    }

    /// Run the drawing routine and write the artifact. Returns its path.
    pub fn draw(&self, call: &ParsedCall) -> Result<PathBuf, Error> {
        let stem = naming::figure_stem(&self.script_name, call);
        let entry = self.entry_point;
        let path = self.engine.draw(
            |figure| match entry {
                EntryPoint::Plain(f) => f(figure, call),
                EntryPoint::ContextAware(f) => f(self, figure, call),
            },
            &stem,
            self.width,
            self.height,
            &self.output_dir,
            self.format,
        )?;
        if let Some(host) = self.host {
            host.add_created(&path);
        }
        Ok(path)
    }

    /// Draw the figure and return the command that embeds it in the
    /// document. Pgf artifacts additionally get a provenance header so a
    /// stray file can be traced back to its figure command.
    pub fn draw_and_include(&self, call: &ParsedCall) -> Result<String, Error> {
        let path = self.draw(call)?;
        match self.format {
            Format::Pgf => {
                self.prepend_provenance(&path, call)?;
                Ok(format!("\\input{{{}}}", path.display()))
            }
            Format::Pdf => Ok(format!("\\includegraphics{{{}}}", path.display())),
        }
    }

    fn prepend_provenance(&self, path: &std::path::Path, call: &ParsedCall) -> Result<(), Error> {
        let text = std::fs::read_to_string(path).map_err(crate::errors::RenderFailure::from)?;
        let header = format!(
            "%% {} v{}\n%% {:?}\n%% {:?}\n",
            env!("CARGO_PKG_NAME"),
            env!("CARGO_PKG_VERSION"),
            self,
            call,
        );
        std::fs::write(path, header + &text).map_err(crate::errors::RenderFailure::from)?;
        Ok(())
    }
}
