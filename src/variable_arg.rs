// Copyright (c) Chris Gunn.
// Licensed under the MIT license.

#[cfg(test)]
mod tests;

use std::cmp::Ordering;

use anyhow::{anyhow, Context, Error};
use cfnplate::Value;
use clap::ArgMatches;

// Used to sort args from clap.
#[derive(Debug)]
pub struct VariableArg {
    pub index: usize,
    pub name: String,
    pub value: Value,
}

impl VariableArg {
    /// Parses `NAME=VALUE`, taking the value as plain text.
    pub fn parse_text(index: usize, arg: &str) -> Result<VariableArg, Error> {
        let (name, value) = split_arg(arg)?;
        Ok(VariableArg {
            index,
            name: name.to_string(),
            value: Value::from(value),
        })
    }

    /// Parses `NAME=JSON`.
    pub fn parse_json(index: usize, arg: &str) -> Result<VariableArg, Error> {
        let (name, value) = split_arg(arg)?;
        let value: serde_json::Value =
            serde_json::from_str(value).with_context(|| format!("invalid JSON value for variable '{}'", name))?;
        Ok(VariableArg {
            index,
            name: name.to_string(),
            value: Value::from(value),
        })
    }
}

fn split_arg(arg: &str) -> Result<(&str, &str), Error> {
    match arg.split_once('=') {
        Some((name, value)) if !name.is_empty() => Ok((name, value)),
        _ => Err(anyhow!("variable '{}' must have the form NAME=VALUE", arg)),
    }
}

/// Collects the `--var` and `--var-json` args in command-line order.
pub fn variable_args(matches: &ArgMatches) -> Result<Vec<VariableArg>, Error> {
    let mut args = Vec::new();

    if let (Some(indices), Some(values)) = (matches.indices_of("var"), matches.get_many::<String>("var")) {
        for (index, value) in indices.zip(values) {
            args.push(VariableArg::parse_text(index, value)?);
        }
    }

    if let (Some(indices), Some(values)) = (matches.indices_of("var-json"), matches.get_many::<String>("var-json")) {
        for (index, value) in indices.zip(values) {
            args.push(VariableArg::parse_json(index, value)?);
        }
    }

    args.sort();
    Ok(args)
}

impl PartialEq for VariableArg {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index
    }
}

impl PartialOrd for VariableArg {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for VariableArg {
    fn cmp(&self, other: &Self) -> Ordering {
        self.index.cmp(&other.index)
    }
}

impl Eq for VariableArg {}
