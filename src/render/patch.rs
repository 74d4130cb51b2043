//! Post-processing of serialized pgf output.
//!
//! Two fixups make a raw pgf artifact embeddable:
//!
//! - font family selectors (`\rmfamily`, `\sffamily`) are stripped so the
//!   figure text inherits the surrounding document's face;
//! - image references are rewritten to be resolvable from the document's
//!   directory rather than the artifact's, and their basenames are wrapped
//!   in braces so a dot in the name is not mistaken for an extension.
//!
//! Both fixups are idempotent: patching an already patched artifact leaves
//! it unchanged. The brace wrapping guarantees this for the image rules,
//! since a wrapped basename no longer matches the image pattern.

use std::fs;
use std::io;
use std::path::Path;

use regex_lite::Regex;

use crate::log::warn;

// Groups: (command + opening brace)(basename)(extension + closing brace).
// The basename excludes braces, which is what makes patching idempotent.
const IMAGE_COMMAND: &str = r"(\\(?:pgfimage|includegraphics)(?:\[.+?\])?\{)([^{}]+)(\..+?\})";

/// Apply the embedding fixups to pgf text. `image_dir` is the directory
/// prefix to splice into image references, or `None` when the artifact
/// already lives where the document is processed.
pub fn patch_pgf_text(text: &str, image_dir: Option<&str>) -> String {
    let text = text.replace("\\rmfamily", "").replace("\\sffamily", "");

    let Some(re) = Regex::new(IMAGE_COMMAND).ok() else {
        warn!("image-command pattern failed to compile, skipping image fixups");
        return text;
    };

    let text = match image_dir {
        Some(dir) => re
            .replace_all(&text, format!("${{1}}{dir}/${{2}}${{3}}"))
            .into_owned(),
        None => text,
    };

    re.replace_all(&text, "${1}{${2}}${3}").into_owned()
}

/// Patch a pgf artifact in place.
pub fn patch_pgf_file(path: &Path, image_dir: Option<&str>) -> io::Result<()> {
    let text = fs::read_to_string(path)?;
    fs::write(path, patch_pgf_text(&text, image_dir))
}
