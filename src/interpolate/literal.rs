// Copyright (c) Chris Gunn.
// Licensed under the MIT license.

// Python-style literals: the form fragments take inside interpolated text.

use std::fmt::Write;

use chumsky::{
    error::Simple,
    primitive::{choice, end, filter, just},
    recursive::recursive,
    text::{self, TextParser},
    Parser,
};

use crate::{
    error::InterpolationError,
    value::{Map, Value},
};

/// Parses a whole literal such as `{'Fn::GetAtt': ['Db', 'Endpoint']}`.
pub(super) fn parse_literal(literal: &str) -> Result<Value, InterpolationError> {
    gen_literal_parser()
        .then_ignore(end())
        .parse(literal)
        .map_err(|errs| InterpolationError::Parse {
            literal: literal.to_string(),
            reason: describe_errors(&errs),
        })
}

pub(super) fn describe_errors(errs: &[Simple<char>]) -> String {
    errs.iter().map(ToString::to_string).collect::<Vec<_>>().join("; ")
}

fn gen_literal_parser() -> impl Parser<char, Value, Error = Simple<char>> {
    recursive(|value| {
        let frac = just('.').chain(text::digits(10));

        let exp = just('e')
            .or(just('E'))
            .chain(just('+').or(just('-')).or_not())
            .chain::<char, _, _>(text::digits(10));

        let number = just('-')
            .or_not()
            .chain::<char, _, _>(text::int(10))
            .chain::<char, _, _>(frac.or_not().flatten())
            .chain::<char, _, _>(exp.or_not().flatten())
            .collect::<String>()
            .try_map(|string, span| {
                let number = match string.parse::<i64>() {
                    Ok(i) => Some(serde_json::Number::from(i)),
                    Err(_) => string.parse::<f64>().ok().and_then(serde_json::Number::from_f64),
                };
                number
                    .map(Value::Number)
                    .ok_or_else(|| Simple::custom(span, format!("invalid number {}", string)))
            })
            .labelled("number");

        let constant = choice((
            just("None").to(Value::Null),
            just("True").to(Value::Bool(true)),
            just("False").to(Value::Bool(false)),
        ));

        let list = value
            .clone()
            .separated_by(just(','))
            .allow_trailing()
            .padded()
            .delimited_by(just('['), just(']'))
            .map(Value::List)
            .labelled("list");

        let entry = gen_string_parser().padded().then_ignore(just(':')).then(value);

        let dict = entry
            .separated_by(just(','))
            .allow_trailing()
            .padded()
            .delimited_by(just('{'), just('}'))
            .map(|entries| Value::Map(entries.into_iter().collect::<Map>()))
            .labelled("dict");

        choice((constant, number, gen_string_parser().map(Value::String), list, dict)).padded()
    })
}

/// A single- or double-quoted string with Python escapes.
pub(super) fn gen_string_parser() -> impl Parser<char, String, Error = Simple<char>> + Clone {
    let escape = just('\\').ignore_then(choice((
        just('\\'),
        just('\''),
        just('"'),
        just('n').to('\n'),
        just('r').to('\r'),
        just('t').to('\t'),
        just('0').to('\0'),
        just('x').ignore_then(gen_hex_escape(2)),
        just('u').ignore_then(gen_hex_escape(4)),
    )));

    let single = just('\'')
        .ignore_then(filter(|c| *c != '\\' && *c != '\'').or(escape.clone()).repeated())
        .then_ignore(just('\''));

    let double = just('"')
        .ignore_then(filter(|c| *c != '\\' && *c != '"').or(escape).repeated())
        .then_ignore(just('"'));

    single.or(double).collect::<String>().labelled("string")
}

fn gen_hex_escape(digits: usize) -> impl Parser<char, char, Error = Simple<char>> + Clone {
    filter(|c: &char| c.is_ascii_hexdigit())
        .repeated()
        .exactly(digits)
        .collect::<String>()
        .try_map(|digits, span| {
            u32::from_str_radix(&digits, 16)
                .ok()
                .and_then(char::from_u32)
                .ok_or_else(|| Simple::custom(span, "invalid unicode character"))
        })
}

/// Writes `value` as a Python literal, the inverse of [`parse_literal`].
pub(super) fn repr(value: &Value) -> String {
    let mut out = String::new();
    write_repr(&mut out, value);
    out
}

fn write_repr(out: &mut String, value: &Value) {
    match value {
        Value::Null => out.push_str("None"),
        Value::Bool(true) => out.push_str("True"),
        Value::Bool(false) => out.push_str("False"),
        Value::Number(number) => {
            let _ = write!(out, "{}", number);
        }
        Value::String(string) => write_string_repr(out, string),
        Value::List(values) => {
            out.push('[');
            for (i, value) in values.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                write_repr(out, value);
            }
            out.push(']');
        }
        Value::Map(map) => write_entries_repr(out, map.iter()),
        Value::Node(node) => {
            let entries = node.entries();
            write_entries_repr(out, entries.iter().map(|(key, value)| (key, value)));
        }
    }
}

fn write_entries_repr<'a>(out: &mut String, entries: impl Iterator<Item = (&'a String, &'a Value)>) {
    out.push('{');
    for (i, (key, value)) in entries.enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        write_string_repr(out, key);
        out.push_str(": ");
        write_repr(out, value);
    }
    out.push('}');
}

// Single quotes unless the string holds a single quote and no double quote.
fn write_string_repr(out: &mut String, string: &str) {
    let quote = if string.contains('\'') && !string.contains('"') { '"' } else { '\'' };
    out.push(quote);
    for c in string.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c == quote => {
                out.push('\\');
                out.push(c);
            }
            c if c.is_control() => {
                let _ = write!(out, "\\x{:02x}", c as u32);
            }
            c => out.push(c),
        }
    }
    out.push(quote);
}
