// Copyright (c) Chris Gunn.
// Licensed under the MIT license.

// The `{{ ... }}` substitution pass run over text before fragments are split out.

use std::ops::Range;

use chumsky::{
    error::Simple,
    primitive::just,
    text::{self, TextParser},
    Parser,
};
use tracing::warn;

use super::literal::{describe_errors, gen_string_parser, repr};
use crate::{
    error::InterpolationError,
    value::{Map, Value},
};

#[derive(Clone, Debug, PartialEq)]
pub(super) enum Placeholder {
    Literal(String),
    Path(Vec<String>),
}

pub(super) struct PlaceholderParser {
    parser: Box<dyn Parser<char, (Placeholder, Range<usize>), Error = Simple<char>>>,
}

impl PlaceholderParser {
    pub fn new() -> PlaceholderParser {
        PlaceholderParser {
            parser: Box::new(gen_placeholder_parser()),
        }
    }

    /// Parses the placeholder at the start of `expr_str`. Returns it with the
    /// byte length it spans.
    pub fn parse(&self, expr_str: &str) -> Result<(Placeholder, usize), Vec<Simple<char>>> {
        let (placeholder, span) = self.parser.parse(expr_str)?;
        // Spans count chars, not bytes.
        let end = expr_str
            .char_indices()
            .nth(span.end)
            .map(|(index, _)| index)
            .unwrap_or(expr_str.len());
        Ok((placeholder, end))
    }
}

fn gen_placeholder_parser() -> impl Parser<char, (Placeholder, Range<usize>), Error = Simple<char>> {
    let literal = gen_string_parser().map(Placeholder::Literal);

    let path = text::ident::<char, Simple<char>>()
        .separated_by(just('.'))
        .at_least(1)
        .map(Placeholder::Path)
        .labelled("variable");

    just("{{")
        .ignore_then(literal.or(path).padded())
        .then_ignore(just("}}"))
        .map_with_span(|placeholder, span| (placeholder, span))
}

/// Replaces every `{{ ... }}` placeholder in `text` with its value from `context`.
pub(super) fn substitute(text: &str, context: &Map) -> Result<String, InterpolationError> {
    let parser = PlaceholderParser::new();

    let mut out = String::with_capacity(text.len());
    let mut curr_index = 0;
    loop {
        let Some(found) = text[curr_index..].find("{{") else {
            break;
        };
        let start = curr_index + found;

        // Add text before the placeholder.
        out.push_str(&text[curr_index..start]);

        // Add placeholder value.
        let (placeholder, len) =
            parser
                .parse(&text[start..])
                .map_err(|errs| InterpolationError::Substitution {
                    offset: start,
                    reason: describe_errors(&errs),
                })?;
        out.push_str(&resolve(&placeholder, context));

        curr_index = start + len;
    }

    // Add text after the last placeholder.
    out.push_str(&text[curr_index..]);
    Ok(out)
}

fn resolve(placeholder: &Placeholder, context: &Map) -> String {
    let path = match placeholder {
        Placeholder::Literal(text) => return text.clone(),
        Placeholder::Path(path) => path,
    };

    let mut segments = path.iter();
    let mut value = segments.next().and_then(|name| context.get(name).cloned());
    for segment in segments {
        value = value.and_then(|value| value.get(segment));
    }

    match value {
        Some(Value::String(text)) => text,
        Some(value) => repr(&value),
        None => {
            warn!(variable = %path.join("."), "undefined variable in placeholder");
            String::new()
        }
    }
}
