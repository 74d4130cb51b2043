//! The document-facing session.
//!
//! One [`Session`] lives for one document run. Its [`figure`] method is
//! what the inline figure command expands to: three raw strings straight
//! from the document, each padded with one sentinel character at both
//! ends so leading and trailing whitespace survives the document's own
//! tokenization.
//!
//! [`figure`]: Session::figure

use std::path::Path;

use crate::args;
use crate::errors::Error;
use crate::host::{Host, Metrics};
use crate::log::debug;
use crate::options;
use crate::render::{Format, RenderEngine};
use crate::scripts::{SCRIPT_EXTENSION, ScriptRegistry};
use crate::style::Style;

#[derive(Debug)]
pub struct Session<'h> {
    host: &'h dyn Host,
    registry: ScriptRegistry,
    metrics: Metrics,
    engine: RenderEngine,
}

impl<'h> Session<'h> {
    /// Start a session: parse the document metrics once and derive the
    /// base figure style from the document font size.
    pub fn new(host: &'h dyn Host, registry: ScriptRegistry) -> Result<Self, Error> {
        let metrics = Metrics::from_host(host)?;
        let engine = RenderEngine::new(Style::document(metrics.font_size));
        Ok(Session {
            host,
            registry,
            metrics,
            engine,
        })
    }

    pub fn metrics(&self) -> Metrics {
        self.metrics
    }

    /// Process one figure command and return the embed command for it.
    ///
    /// All three strings carry one padding character at each end. The
    /// script name may be quoted and may omit its extension; options and
    /// arguments are passed to their parsers verbatim after unpadding.
    pub fn figure(
        &self,
        raw_name: &str,
        raw_options: &str,
        raw_args: &str,
    ) -> Result<String, Error> {
        let name = strip_quotes(strip_padding(raw_name).trim());
        let name = ensure_extension(name);
        let options = strip_padding(raw_options);
        let arguments = strip_padding(raw_args);
        debug!("figure command: script={:?} options={:?}", name, options);

        let resolved = options::parse(options, &self.metrics)?;
        let context = crate::context::FigureContext::load(
            self.host,
            &self.registry,
            &name,
            resolved.width,
            resolved.height,
            self.engine.clone(),
            Format::Pgf,
        )?;
        let call = args::evaluate(arguments)?;
        context.draw_and_include(&call)
    }
}

/// Drop the single sentinel character from each end. Too-short input
/// (nothing between the sentinels) unpads to the empty string.
fn strip_padding(raw: &str) -> &str {
    let mut chars = raw.chars();
    if chars.next().is_none() {
        return "";
    }
    if chars.next_back().is_none() {
        return "";
    }
    chars.as_str()
}

/// Strip one matching pair of surrounding quotes, if present.
fn strip_quotes(name: &str) -> &str {
    for quote in ['\'', '"'] {
        if let Some(inner) = name
            .strip_prefix(quote)
            .and_then(|rest| rest.strip_suffix(quote))
        {
            return inner;
        }
    }
    name
}

fn ensure_extension(name: &str) -> String {
    if Path::new(name).extension().is_some() {
        name.to_string()
    } else {
        format!("{name}.{SCRIPT_EXTENSION}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unpadding_drops_one_char_each_end() {
        assert_eq!(strip_padding(".fig.py."), "fig.py");
        assert_eq!(strip_padding("x width=1in x"), " width=1in ");
        assert_eq!(strip_padding(".."), "");
        assert_eq!(strip_padding("."), "");
        assert_eq!(strip_padding(""), "");
    }

    #[test]
    fn unpadding_respects_char_boundaries() {
        assert_eq!(strip_padding("é1é"), "1");
    }

    #[test]
    fn quotes_are_stripped_only_in_pairs() {
        assert_eq!(strip_quotes("'fig'"), "fig");
        assert_eq!(strip_quotes("\"fig\""), "fig");
        assert_eq!(strip_quotes("'fig\""), "'fig\"");
        assert_eq!(strip_quotes("fig"), "fig");
    }

    #[test]
    fn extension_is_appended_when_missing() {
        assert_eq!(ensure_extension("fig"), "fig.py");
        assert_eq!(ensure_extension("fig.py"), "fig.py");
        assert_eq!(ensure_extension("custom.plot"), "custom.plot");
    }
}
