// Copyright (c) Chris Gunn.
// Licensed under the MIT license.

//! The root element of a CloudFormation template.

#[cfg(test)]
mod tests;

use std::{fmt, ops::Deref};

use serde::ser::{Serialize, Serializer};
use tracing::debug;

use crate::{
    error::Error,
    node::{Node, NodeKind},
    render::to_canonical_json,
    value::Value,
};

pub const AWS_TEMPLATE_FORMAT_VERSION: &str = "2010-09-09";

/// The structural sections of a template, in the order they are rendered.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Section {
    Parameters,
    Mappings,
    Conditions,
    Resources,
    Outputs,
    Metadata,
}

impl Section {
    pub const ALL: [Section; 6] = [
        Section::Parameters,
        Section::Mappings,
        Section::Conditions,
        Section::Resources,
        Section::Outputs,
        Section::Metadata,
    ];

    /// The name of the field the section is bound to on the template.
    pub fn slot_name(self) -> &'static str {
        match self {
            Section::Parameters => "parameters",
            Section::Mappings => "mappings",
            Section::Conditions => "conditions",
            Section::Resources => "resources",
            Section::Outputs => "outputs",
            Section::Metadata => "metadata",
        }
    }

    pub fn kind(self) -> NodeKind {
        match self {
            Section::Parameters => NodeKind::Parameters,
            Section::Mappings => NodeKind::Mappings,
            Section::Conditions => NodeKind::Conditions,
            Section::Resources => NodeKind::Resources,
            Section::Outputs => NodeKind::Outputs,
            Section::Metadata => NodeKind::Metadata,
        }
    }
}

/// A complete CloudFormation template.
///
/// Comes pre-loaded with every section CloudFormation accepts, each bound to
/// a named field. Sections left empty are not rendered, since CloudFormation
/// rejects empty top-level mappings.
#[derive(Clone, Debug)]
pub struct Template {
    root: Node,
}

impl Template {
    pub fn new(description: Option<&str>) -> Template {
        let root = Node::new(NodeKind::Template);
        root.insert("AWSTemplateFormatVersion", AWS_TEMPLATE_FORMAT_VERSION);
        if let Some(description) = description.filter(|description| !description.is_empty()) {
            root.insert("Description", description);
        }

        for section in Section::ALL {
            root.bind(section.slot_name(), &Node::new(section.kind()));
        }

        Template { root }
    }

    /// Wraps an existing root node, as found by a namespace search.
    pub(crate) fn from_root(root: Node) -> Option<Template> {
        match root.kind() {
            NodeKind::Template => Some(Template { root }),
            _ => None,
        }
    }

    pub fn root(&self) -> &Node {
        &self.root
    }

    /// The node bound to `section`. An unbound section is re-created empty
    /// and bound again, so a handle is always available.
    pub fn section(&self, section: Section) -> Node {
        match self.root.slot(section.slot_name()) {
            Some(node) => node,
            None => {
                let node = self.root.bind(section.slot_name(), &Node::new(section.kind()));
                self.restore_section_order(section);
                node
            }
        }
    }

    // A fresh binding lands at the end of the root, so every bound section
    // ranked after `rebound` is moved behind it again.
    fn restore_section_order(&self, rebound: Section) {
        let later = Section::ALL.into_iter().skip_while(|section| *section != rebound).skip(1);
        for section in later {
            let Some(node) = self.root.slot(section.slot_name()) else {
                continue;
            };
            let name = node.name();
            if let Some(value) = self.root.remove_key(&name) {
                self.root.insert(name, value);
            }
        }
    }

    pub fn parameters(&self) -> Node {
        self.section(Section::Parameters)
    }

    pub fn mappings(&self) -> Node {
        self.section(Section::Mappings)
    }

    pub fn conditions(&self) -> Node {
        self.section(Section::Conditions)
    }

    pub fn resources(&self) -> Node {
        self.section(Section::Resources)
    }

    pub fn outputs(&self) -> Node {
        self.section(Section::Outputs)
    }

    pub fn metadata(&self) -> Node {
        self.section(Section::Metadata)
    }

    /// Unbinds every bound field whose node is empty, detaching it from the
    /// tree. Returns the names of the unbound fields.
    pub fn prune(&self) -> Vec<String> {
        let mut pruned = Vec::new();
        for (slot, node) in self.root.slots() {
            if node.is_empty() {
                debug!(slot = %slot, "pruning empty template field");
                self.root.unbind(&slot);
                pruned.push(slot);
            }
        }
        pruned
    }

    /// Renders the template as canonical JSON, leaving out empty bound fields.
    ///
    /// The tree is not modified, so rendering again gives the same text.
    pub fn render(&self) -> Result<String, Error> {
        to_canonical_json(self)
    }

    /// Same as [`Template::render`]. Shadows [`Node::to_json`], which would
    /// keep the empty sections.
    pub fn to_json(&self) -> Result<String, Error> {
        self.render()
    }
}

impl Deref for Template {
    type Target = Node;

    fn deref(&self) -> &Node {
        &self.root
    }
}

impl Serialize for Template {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let empty: Vec<Node> = self
            .root
            .slots()
            .into_iter()
            .map(|(_, node)| node)
            .filter(|node| node.is_empty())
            .collect();

        self.root.serialize_filtered(serializer, |_, value| match value {
            Value::Node(node) => empty.iter().any(|empty| empty.ptr_eq(node)),
            _ => false,
        })
    }
}

impl From<Template> for Value {
    fn from(template: Template) -> Value {
        Value::Node(template.root)
    }
}

impl From<&Template> for Value {
    fn from(template: &Template) -> Value {
        Value::Node(template.root.clone())
    }
}

impl fmt::Display for Template {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let json = self.render().map_err(|_| fmt::Error)?;
        f.write_str(&json)
    }
}
