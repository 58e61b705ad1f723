// Copyright (c) Chris Gunn.
// Licensed under the MIT license.

//! Turns a text file with embedded function literals into a single
//! `Fn::Join` fragment.
//!
//! Text first goes through a `{{ ... }}` substitution pass. It is then split
//! around every token shaped like `{'Ref': 'AWS::Region'}`. Each token is
//! parsed into a fragment, and the pieces are joined with an empty separator.
//! This is mostly used for EC2 UserData scripts.

mod literal;
mod substitute;


use std::{io::Read, sync::LazyLock};

use regex::Regex;
use tracing::debug;

use crate::{
    error::{Error, InterpolationError},
    functions::join_parts,
    value::{Map, Value},
};

/// A single-key function literal, e.g. `{'Ref': 'AWS::Region'}`.
///
/// The token has to close on `'}` and may not contain dots or braces. A
/// literal whose payload is a list, like `{'Fn::GetAtt': ['Db', 'Endpoint']}`,
/// never matches and stays part of the surrounding text.
static FRAGMENT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\{'[^{^}.]*'\}").unwrap());

/// Only a token that is a fragment from end to end gets evaluated.
static WHOLE_FRAGMENT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\A\{'[^{^}.]*'\}\z").unwrap());

/// Reads all of `reader` and interpolates it. See [`interpolate`].
pub fn templated_read(mut reader: impl Read, context: &Map) -> Result<Map, Error> {
    let mut text = String::new();
    reader.read_to_string(&mut text)?;
    interpolate(&text, context)
}

/// Substitutes `context` into `text`, then joins its literal spans and
/// fragments into one `{"Fn::Join": ["", [..]]}`.
///
/// Text without fragments yields a join of a single element. One trailing
/// line break is dropped from `text` before anything else.
pub fn interpolate(text: &str, context: &Map) -> Result<Map, Error> {
    let text = substitute::substitute(strip_final_newline(text), context)?;
    let parts = fragments(&text)?;
    debug!(parts = parts.len(), "interpolated text");
    Ok(join_parts(Value::from(""), parts))
}

/// Splits `text` around function literals, parsing each one.
///
/// The literal spans either side of a fragment are always kept, even when
/// empty.
pub fn fragments(text: &str) -> Result<Vec<Value>, InterpolationError> {
    let mut tokens = Vec::new();
    let mut curr_index = 0;
    for found in FRAGMENT_RE.find_iter(text) {
        tokens.push(&text[curr_index..found.start()]);
        tokens.push(found.as_str());
        curr_index = found.end();
    }
    tokens.push(&text[curr_index..]);

    tokens.into_iter().map(evaluate).collect()
}

fn strip_final_newline(text: &str) -> &str {
    text.strip_suffix("\r\n")
        .or_else(|| text.strip_suffix('\n'))
        .or_else(|| text.strip_suffix('\r'))
        .unwrap_or(text)
}

fn evaluate(token: &str) -> Result<Value, InterpolationError> {
    if !WHOLE_FRAGMENT_RE.is_match(token) {
        return Ok(Value::from(token));
    }

    literal::parse_literal(token)
}
