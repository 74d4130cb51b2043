//! Figure option parsing.
//!
//! The option string of a figure command is a comma-separated mix of
//! `key=value` tokens and bare tokens. Recognized keys are exactly
//! `width`, `height`, and `aspect`; the single bare keyword `golden`
//! substitutes the golden ratio for the aspect. Leftover bare tokens
//! fill width, then height, positionally.

use std::collections::BTreeMap;

use crate::errors::ParseError;
use crate::host::Metrics;
use crate::units;

/// The golden ratio, (1 + sqrt 5) / 2.
pub const GOLDEN_RATIO: f64 = 1.618033988749895;

/// Resolved figure geometry in inches, plus a reserved keyword map.
///
/// Invariant: `width` and `height` are positive and finite. `extra` is
/// reserved for forward compatibility and currently always empty: any
/// unrecognized key is a parse error instead.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedOptions {
    pub width: f64,
    pub height: f64,
    pub extra: BTreeMap<String, String>,
}

/// Parse a figure option string against the document metrics.
///
/// When both `height` and `aspect` are given, the explicit height wins
/// and the aspect is ignored. That tie-break is a documented ambiguity
/// downstream documents may rely on either way; it is deliberately not
/// "fixed" by combining the two.
pub fn parse(options: &str, metrics: &Metrics) -> Result<ResolvedOptions, ParseError> {
    let mut width_token: Option<String> = None;
    let mut height_token: Option<String> = None;
    let mut aspect: Option<f64> = None;
    let mut bare: Vec<&str> = Vec::new();

    let original = options;
    let malformed = |token: &str| ParseError::MalformedOption {
        token: token.to_string(),
        options: original.to_string(),
    };
    let duplicate = |key: &str| ParseError::DuplicateOption {
        key: key.to_string(),
        options: original.to_string(),
    };

    if !options.trim().is_empty() {
        for token in options.split(',') {
            let token = token.trim();
            if token.is_empty() {
                return Err(malformed(token));
            }
            if let Some((key, value)) = token.split_once('=') {
                let (key, value) = (key.trim(), value.trim());
                match key {
                    "width" => {
                        if width_token.replace(value.to_string()).is_some() {
                            return Err(duplicate("width"));
                        }
                    }
                    "height" => {
                        if height_token.replace(value.to_string()).is_some() {
                            return Err(duplicate("height"));
                        }
                    }
                    "aspect" => {
                        let parsed: f64 = value.parse().map_err(|_| malformed(token))?;
                        if aspect.replace(parsed).is_some() {
                            return Err(duplicate("aspect"));
                        }
                    }
                    _ => {
                        return Err(ParseError::UnknownOption {
                            key: key.to_string(),
                            options: original.to_string(),
                        });
                    }
                }
            } else if token == "golden" {
                if aspect.replace(GOLDEN_RATIO).is_some() {
                    return Err(duplicate("aspect"));
                }
            } else {
                bare.push(token);
            }
        }
    }

    // Remaining bare tokens fill width then height positionally
    if bare.len() > 2 {
        return Err(ParseError::TooManyPositional {
            options: original.to_string(),
        });
    }
    let mut bare = bare.into_iter();
    if let Some(token) = bare.next() {
        if width_token.replace(token.to_string()).is_some() {
            return Err(duplicate("width"));
        }
    }
    if let Some(token) = bare.next() {
        if height_token.replace(token.to_string()).is_some() {
            return Err(duplicate("height"));
        }
    }

    let width = match width_token {
        Some(token) => units::resolve(&token, metrics, original)?,
        None => metrics.line_width,
    };
    let height = match height_token {
        Some(token) => units::resolve(&token, metrics, original)?,
        None => width / aspect.unwrap_or(1.0),
    };

    if !(width > 0.0 && width.is_finite() && height > 0.0 && height.is_finite()) {
        return Err(ParseError::InvalidGeometry {
            options: original.to_string(),
        });
    }

    Ok(ResolvedOptions {
        width,
        height,
        extra: BTreeMap::new(),
    })
}
