//! Parse pest pairs from the literal-argument grammar into values.
//!
//! The argument string of a figure command is exactly the argument list of
//! a call expression. The grammar admits literals only, so anything that
//! would resolve a name or run code fails closed as a [`ParseError`].

use miette::NamedSource;
use pest::Parser;
use pest::error::InputLocation;
use pest::iterators::Pair;

use crate::errors::ParseError;
use crate::value::{ParsedCall, Value};
use crate::{CallParser, Rule};

/// Evaluate a call-argument string into positional and keyword values.
pub fn evaluate(expr: &str) -> Result<ParsedCall, ParseError> {
    let mut pairs =
        CallParser::parse(Rule::call, expr).map_err(|e| grammar_error(expr, &e))?;
    let call_pair = pairs.next().unwrap();

    let mut call = ParsedCall::default();
    let mut seen_keyword = false;

    for pair in call_pair.into_inner() {
        if pair.as_rule() != Rule::arg {
            continue; // EOI
        }
        let inner = pair.into_inner().next().unwrap();
        let span = inner.as_span();
        match inner.as_rule() {
            Rule::kwarg => {
                let mut kv = inner.into_inner();
                let name = kv.next().unwrap().as_str().to_string();
                let value = parse_literal(kv.next().unwrap());
                if call.kwargs.iter().any(|(k, _)| *k == name) {
                    return Err(ParseError::DuplicateKeyword {
                        name,
                        src: named_source(expr),
                        span: (span.start(), span.end() - span.start()).into(),
                    });
                }
                call.kwargs.push((name, value));
                seen_keyword = true;
            }
            Rule::literal => {
                if seen_keyword {
                    return Err(ParseError::Arguments {
                        src: named_source(expr),
                        span: (span.start(), span.end() - span.start()).into(),
                        message: "positional argument follows keyword argument".into(),
                    });
                }
                call.args.push(parse_literal(inner));
            }
            _ => unreachable!("arg is kwarg or literal"),
        }
    }

    Ok(call)
}

fn named_source(expr: &str) -> NamedSource<String> {
    NamedSource::new("<arguments>", expr.to_string())
}

fn grammar_error(expr: &str, e: &pest::error::Error<Rule>) -> ParseError {
    let span = match &e.location {
        InputLocation::Pos(p) => (*p, 0).into(),
        InputLocation::Span((s, end)) => (*s, end - s).into(),
    };
    ParseError::Arguments {
        src: named_source(expr),
        span,
        message: "expected a literal argument".into(),
    }
}

fn parse_literal(pair: Pair<Rule>) -> Value {
    let inner = pair.into_inner().next().unwrap();
    match inner.as_rule() {
        Rule::none => Value::None,
        Rule::boolean => Value::Bool(inner.as_str() == "True"),
        Rule::number => parse_number(inner.as_str()),
        Rule::string => {
            let content = inner.into_inner().next().unwrap().as_str();
            Value::Str(unescape(content))
        }
        Rule::paren => parse_literal(inner.into_inner().next().unwrap()),
        Rule::tuple => Value::Tuple(inner.into_inner().map(parse_literal).collect()),
        Rule::list => Value::List(inner.into_inner().map(parse_literal).collect()),
        Rule::dict => Value::Dict(
            inner
                .into_inner()
                .map(|entry| {
                    let mut kv = entry.into_inner();
                    (
                        parse_literal(kv.next().unwrap()),
                        parse_literal(kv.next().unwrap()),
                    )
                })
                .collect(),
        ),
        other => unreachable!("unexpected literal rule: {other:?}"),
    }
}

fn parse_number(s: &str) -> Value {
    if s.contains(['.', 'e', 'E']) {
        Value::Float(s.parse().unwrap())
    } else {
        // Grammar guarantees a decimal integer; oversize ones degrade to float
        s.parse::<i64>()
            .map(Value::Int)
            .unwrap_or_else(|_| Value::Float(s.parse().unwrap()))
    }
}

fn unescape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('\\') => out.push('\\'),
            Some('\'') => out.push('\''),
            Some('"') => out.push('"'),
            // Unknown escapes keep the backslash
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positional_and_keyword() {
        let call = evaluate("1, unknown1='a'").unwrap();
        assert_eq!(call.args, vec![Value::Int(1)]);
        assert_eq!(
            call.kwargs,
            vec![("unknown1".to_string(), Value::Str("a".into()))]
        );
    }

    #[test]
    fn tuple_keyword() {
        let call = evaluate("x=(1, 2, 3), next=4").unwrap();
        assert_eq!(
            call.kwarg("x"),
            Some(&Value::Tuple(vec![
                Value::Int(1),
                Value::Int(2),
                Value::Int(3)
            ]))
        );
        assert_eq!(call.kwarg("next"), Some(&Value::Int(4)));
    }

    #[test]
    fn dict_positional() {
        let call = evaluate("{'a': 1}").unwrap();
        assert_eq!(
            call.args,
            vec![Value::Dict(vec![(Value::Str("a".into()), Value::Int(1))])]
        );
    }

    #[test]
    fn empty_string_is_empty_call() {
        let call = evaluate("").unwrap();
        assert!(call.is_empty());
    }

    #[test]
    fn trailing_comma() {
        let call = evaluate("1, 2,").unwrap();
        assert_eq!(call.args, vec![Value::Int(1), Value::Int(2)]);
    }

    #[test]
    fn grouping_vs_tuple() {
        let call = evaluate("(1), (2,), ()").unwrap();
        assert_eq!(
            call.args,
            vec![
                Value::Int(1),
                Value::Tuple(vec![Value::Int(2)]),
                Value::Tuple(vec![]),
            ]
        );
    }

    #[test]
    fn numbers() {
        let call = evaluate("-1, 2.5, 1e3, .5").unwrap();
        assert_eq!(
            call.args,
            vec![
                Value::Int(-1),
                Value::Float(2.5),
                Value::Float(1000.0),
                Value::Float(0.5),
            ]
        );
    }

    #[test]
    fn none_and_bools() {
        let call = evaluate("None, True, False").unwrap();
        assert_eq!(
            call.args,
            vec![Value::None, Value::Bool(true), Value::Bool(false)]
        );
    }

    #[test]
    fn string_escapes() {
        let call = evaluate(r#"'a\'b', "new\nline""#).unwrap();
        assert_eq!(call.args[0], Value::Str("a'b".into()));
        assert_eq!(call.args[1], Value::Str("new\nline".into()));
    }

    #[test]
    fn rejects_bare_identifier() {
        assert!(evaluate("unknown").is_err());
    }

    #[test]
    fn rejects_call_expression() {
        assert!(evaluate("open('x')").is_err());
    }

    #[test]
    fn rejects_arithmetic() {
        assert!(evaluate("1 + 2").is_err());
    }

    #[test]
    fn rejects_duplicate_keyword() {
        let err = evaluate("a=1, a=2").unwrap_err();
        assert!(matches!(err, ParseError::DuplicateKeyword { .. }));
    }

    #[test]
    fn rejects_positional_after_keyword() {
        assert!(evaluate("a=1, 2").is_err());
    }

    #[test]
    fn nested_containers() {
        let call = evaluate("[[1, 2], {'k': (True, None)}]").unwrap();
        assert_eq!(
            call.args,
            vec![Value::List(vec![
                Value::List(vec![Value::Int(1), Value::Int(2)]),
                Value::Dict(vec![(
                    Value::Str("k".into()),
                    Value::Tuple(vec![Value::Bool(true), Value::None]),
                )]),
            ])]
        );
    }
}
