// Copyright (c) Chris Gunn.
// Licensed under the MIT license.

//! Error types for cfnplate.

use std::fmt;

use thiserror::Error;

/// The node operation that rejected a non-node child.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChildOp {
    Add,
    Remove,
}

impl fmt::Display for ChildOp {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ChildOp::Add => f.write_str("add"),
            ChildOp::Remove => f.write_str("remove"),
        }
    }
}

/// Errors raised while building or rendering a template.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid child type for {op}: only nodes can be added or removed")]
    InvalidChild { op: ChildOp },

    #[error("'{kind}' nodes cannot be used as resource attributes")]
    UnknownAttribute { kind: String },

    #[error(transparent)]
    Intrinsic(#[from] IntrinsicError),

    #[error("no CloudFormation template found in namespace")]
    TemplateNotFound,

    #[error(transparent)]
    Interpolation(#[from] InterpolationError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Bad arguments passed to an intrinsic function constructor.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum IntrinsicError {
    #[error("Unable to join on one or less things!")]
    JoinNeedsInput,

    #[error("Index must be a number!")]
    SelectIndexNotNumeric,

    #[error("Unable to select from an empty list!")]
    SelectEmpty,

    #[error("List of selections include null values!")]
    SelectNull,

    #[error("Provided index is invalid!")]
    SelectIndexOutOfRange,

    #[error("Minimum number of conditions for '{function}' condition is 2")]
    TooFewConditions { function: &'static str },

    #[error("Maximum number of conditions for '{function}' condition is 10")]
    TooManyConditions { function: &'static str },
}

/// Failures of the text interpolation utility.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum InterpolationError {
    #[error("malformed placeholder at offset {offset}: {reason}")]
    Substitution { offset: usize, reason: String },

    #[error("malformed function literal {literal:?}: {reason}")]
    Parse { literal: String, reason: String },
}
