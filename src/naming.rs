//! Deterministic artifact naming.
//!
//! The stem for a saved figure is the script's base name plus its call
//! arguments, filtered to filesystem-safe characters. Combined with the
//! geometry suffix this is stable for a given call, and distinct for two
//! calls whenever their *sanitized* string forms differ. The filter can
//! collide legitimately: `[1, 2, 3]` and `(1, 2, 3)` both sanitize to
//! `1,2,3`. That is an accepted limitation; strengthening the scheme
//! would break reproducibility of existing artifact names.

use std::path::Path;

use crate::value::ParsedCall;

/// Derive the filename stem for one figure call (geometry suffix not
/// included). Positional arguments come first, then `key-value` fragments
/// for keywords, in call order; fragments that sanitize to nothing are
/// dropped entirely.
pub fn figure_stem(script: &str, call: &ParsedCall) -> String {
    let base = Path::new(script)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| script.to_string());

    let fragments: Vec<String> = call
        .args
        .iter()
        .map(|v| v.to_string())
        .chain(call.kwargs.iter().map(|(k, v)| format!("{k}-{v}")))
        .map(|part| sanitize(&part))
        .filter(|part| !part.is_empty())
        .collect();

    if fragments.is_empty() {
        base
    } else {
        format!("{base}-{}", fragments.join("-"))
    }
}

/// Append the `-<width>x<height>` geometry suffix (inches, two decimal
/// places). Part of the artifact-naming contract; disambiguates same-name
/// calls at different sizes.
pub fn with_geometry(stem: &str, width: f64, height: f64) -> String {
    format!("{stem}-{width:.2}x{height:.2}")
}

fn sanitize(part: &str) -> String {
    part.chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | ','))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;

    fn call(args: Vec<Value>, kwargs: Vec<(&str, Value)>) -> ParsedCall {
        ParsedCall {
            args,
            kwargs: kwargs
                .into_iter()
                .map(|(k, v)| (k.to_string(), v))
                .collect(),
        }
    }

    #[test]
    fn bare_script_name() {
        assert_eq!(figure_stem("fig", &call(vec![], vec![])), "fig");
        assert_eq!(figure_stem("fig.py", &call(vec![], vec![])), "fig");
        assert_eq!(figure_stem("scripts/fig.py", &call(vec![], vec![])), "fig");
    }

    #[test]
    fn args_and_kwargs_join_with_dashes() {
        let c = call(vec![Value::Int(1)], vec![("temp", Value::Bool(true))]);
        assert_eq!(figure_stem("fig", &c), "fig-1-temp-True");
    }

    #[test]
    fn containers_sanitize_to_their_items() {
        let list = call(
            vec![Value::List(vec![
                Value::Int(1),
                Value::Int(2),
                Value::Int(3),
            ])],
            vec![],
        );
        assert_eq!(figure_stem("fig", &list), "fig-1,2,3");

        // Tuples sanitize identically: the accepted naming collision
        let tuple = call(
            vec![Value::Tuple(vec![
                Value::Int(1),
                Value::Int(2),
                Value::Int(3),
            ])],
            vec![],
        );
        assert_eq!(figure_stem("fig", &tuple), "fig-1,2,3");

        let dict = call(
            vec![Value::Dict(vec![
                (Value::Str("a".into()), Value::Int(1)),
                (Value::Str("b".into()), Value::Int(2)),
            ])],
            vec![],
        );
        assert_eq!(figure_stem("fig", &dict), "fig-a1,b2");
    }

    #[test]
    fn whitespace_is_dropped() {
        let c = call(vec![Value::Str("test\n".into())], vec![]);
        assert_eq!(figure_stem("fig", &c), "fig-test");
    }

    #[test]
    fn empty_fragments_are_dropped() {
        let c = call(vec![Value::Str("\n".into())], vec![]);
        assert_eq!(figure_stem("fig", &c), "fig");
    }

    #[test]
    fn geometry_suffix_has_two_decimals() {
        assert_eq!(with_geometry("fig", 1.0, 0.618), "fig-1.00x0.62");
        assert_eq!(with_geometry("fig-1", 4.0, 4.0), "fig-1-4.00x4.00");
    }

    #[test]
    fn determinism() {
        let c = call(
            vec![Value::Int(3), Value::Str("x y".into())],
            vec![("k", Value::Float(1.5))],
        );
        assert_eq!(figure_stem("fig", &c), figure_stem("fig", &c));
        assert_eq!(figure_stem("fig", &c), "fig-3-xy-k-1.5");
    }
}
