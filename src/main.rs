// Copyright (c) Chris Gunn.
// Licensed under the MIT license.

mod variable_arg;

use std::{
    fs,
    io::{self, Read},
    path::PathBuf,
};

use anyhow::{Context, Error};
use cfnplate::{functions::base64, interpolate::templated_read, namespace::Options, render::to_canonical_json};
use clap::{value_parser, Arg, ArgAction, Command};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::variable_arg::variable_args;

fn command() -> Command {
    Command::new("cfnplate")
        .about("Interpolates a script into a CloudFormation Fn::Join fragment")
        .arg(
            Arg::new("input")
                .value_name("INPUT")
                .required(true)
                .help("Script to interpolate, or '-' for stdin"),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .value_name("OUTPUT")
                .value_parser(value_parser!(PathBuf))
                .help("Write the fragment here instead of stdout"),
        )
        .arg(
            Arg::new("context")
                .short('c')
                .long("context")
                .value_name("CONTEXT")
                .value_parser(value_parser!(PathBuf))
                .help("JSON object of substitution variables"),
        )
        .arg(
            Arg::new("var")
                .long("var")
                .value_name("NAME=VALUE")
                .action(ArgAction::Append)
                .help("Set a text variable"),
        )
        .arg(
            Arg::new("var-json")
                .long("var-json")
                .value_name("NAME=JSON")
                .action(ArgAction::Append)
                .help("Set a variable from a JSON value"),
        )
        .arg(
            Arg::new("base64")
                .long("base64")
                .action(ArgAction::SetTrue)
                .help("Wrap the fragment in Fn::Base64"),
        )
}

fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .without_time()
        .init();

    let matches = command().get_matches();

    let mut options = match matches.get_one::<PathBuf>("context") {
        Some(path) => {
            let json = fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
            Options::from_json_str(&json).with_context(|| format!("invalid context file {}", path.display()))?
        }
        None => Options::default(),
    };
    let args = variable_args(&matches)?;
    debug!(count = args.len(), "applying variable args");
    options.extend(args.into_iter().map(|arg| (arg.name, arg.value)));

    let input = matches.get_one::<String>("input").map(String::as_str).unwrap_or("-");
    let reader: Box<dyn Read> = match input {
        "-" => Box::new(io::stdin().lock()),
        path => Box::new(fs::File::open(path).with_context(|| format!("failed to open {}", path))?),
    };

    let mut fragment =
        templated_read(reader, options.as_map()).with_context(|| format!("failed to interpolate {}", input))?;
    if matches.get_flag("base64") {
        fragment = base64(fragment);
    }

    let json = to_canonical_json(&fragment)?;
    match matches.get_one::<PathBuf>("output") {
        Some(path) => fs::write(path, json + "\n").with_context(|| format!("failed to write {}", path.display()))?,
        None => println!("{}", json),
    }

    Ok(())
}
