// Copyright (c) Chris Gunn.
// Licensed under the MIT license.

//! Builds CloudFormation templates from ordered, self-naming nodes and
//! renders them as canonical JSON.

pub mod elements;
pub mod error;
pub mod functions;
pub mod interpolate;
pub mod namespace;
pub mod node;
pub mod render;
pub mod template;
pub mod value;

pub use error::{Error, IntrinsicError, InterpolationError};
pub use node::{Node, NodeKind};
pub use template::{Section, Template};
pub use value::{Map, Value};

/// Every element constructor and intrinsic function under its bare name,
/// for template scripts.
pub mod prelude {
    pub use crate::{
        elements::{
            add_attributes, condition, ec2_tags, mapping, output, parameter, properties, resource,
            resource_with_attributes, Attribute, Attributes,
        },
        functions::{
            base64, c_and, c_equals, c_if, c_not, c_or, c_ref, find_in_map, get_att, get_azs,
            get_azs_current, join, ref_, select,
        },
        interpolate::{interpolate, templated_read},
        namespace::{Namespace, Options},
        values, Map, Node, NodeKind, Section, Template, Value,
    };
}
