// Copyright (c) Chris Gunn.
// Licensed under the MIT license.

//! Typed template elements built on [`Node`]: resources and their
//! attributes, parameters, mappings, outputs and conditions.


use tracing::debug;

use crate::{
    error::Error,
    node::{Node, NodeKind},
    value::{Map, Value},
};

/// A properties mapping, as found in resources.
pub fn properties<I, K, V>(entries: I) -> Node
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<Value>,
{
    Node::from_entries(NodeKind::Properties, entries)
}

/// A generic resource with a `Type` and optional `Properties`.
///
/// `properties` may be a node, which is added under its own name (normally
/// `Properties`), or a plain map, which is wrapped in a properties node.
/// `Value::Null`, an empty map and an empty node add nothing.
pub fn resource(
    name: impl Into<String>,
    resource_type: impl Into<Value>,
    properties: impl Into<Value>,
) -> Result<Node, Error> {
    let resource = Node::named(NodeKind::Resource, name);
    resource.insert("Type", resource_type);
    add_or_wrap(&resource, NodeKind::Properties, properties.into())?;
    Ok(resource)
}

/// A resource carrying resource attributes (metadata, policies, dependencies).
pub fn resource_with_attributes(
    name: impl Into<String>,
    resource_type: impl Into<Value>,
    properties: impl Into<Value>,
    attributes: impl Into<Attributes>,
) -> Result<Node, Error> {
    let resource = resource(name, resource_type, properties)?;
    add_attributes(&resource, attributes)?;
    Ok(resource)
}

/// Applies resource attributes to an existing resource, flattening nested lists.
pub fn add_attributes(resource: &Node, attributes: impl Into<Attributes>) -> Result<(), Error> {
    match attributes.into() {
        Attributes::One(attribute) => attribute.apply(resource),
        Attributes::Node(node) => Attribute::try_from(node)?.apply(resource),
        Attributes::List(list) => {
            for attributes in list {
                add_attributes(resource, attributes)?;
            }
        }
    }
    Ok(())
}

/// A stack parameter. Extra properties follow `Type` in iteration order.
pub fn parameter<I, K, V>(name: impl Into<String>, parameter_type: impl Into<Value>, properties: I) -> Node
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<Value>,
{
    let parameter = Node::named(NodeKind::Parameter, name);
    parameter.insert("Type", parameter_type);
    parameter.update(properties);
    parameter
}

/// A named entry of the `Mappings` section.
pub fn mapping<I, K, V>(name: impl Into<String>, entries: I) -> Node
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<Value>,
{
    let mapping = Node::from_entries(NodeKind::Mapping, entries);
    mapping.set_name(name);
    mapping
}

/// A stack output, optionally exported for cross-stack references.
pub fn output(
    name: impl Into<String>,
    value: impl Into<Value>,
    description: Option<&str>,
    export_name: Option<Value>,
) -> Node {
    let output = Node::named(NodeKind::Output, name);
    output.insert("Value", value);
    if let Some(description) = description {
        output.insert("Description", description);
    }
    if let Some(export_name) = export_name {
        let mut export = Map::new();
        export.insert("Name".to_string(), export_name);
        output.insert("Export", export);
    }
    output
}

/// A named condition whose body is a condition function, e.g. `c_equals(..)`.
pub fn condition<I, K, V>(name: impl Into<String>, body: I) -> Node
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<Value>,
{
    let condition = Node::from_entries(NodeKind::Condition, body);
    condition.set_name(name);
    condition
}

/// Turns a tag mapping into CloudFormation's verbose `Key`/`Value` list,
/// keeping the mapping's order.
pub fn ec2_tags<I, K, V>(tags: I) -> Vec<Map>
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<Value>,
{
    tags.into_iter()
        .map(|(key, value)| {
            let mut tag = Map::new();
            tag.insert("Key".to_string(), Value::String(key.into()));
            tag.insert("Value".to_string(), value.into());
            tag
        })
        .collect()
}

/// A resource attribute.
///
/// Metadata and the policies are nested under their own key as sub-nodes.
/// The rest contribute a single value under a fixed key.
#[derive(Clone, Debug, PartialEq)]
pub enum Attribute {
    Metadata(Node),
    UpdatePolicy(Node),
    CreationPolicy(Node),
    DependsOn(Value),
    DeletionPolicy(Value),
    Condition(Value),
}

impl Attribute {
    pub fn metadata<I, K, V>(entries: I) -> Attribute
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        Attribute::Metadata(Node::from_entries(NodeKind::Metadata, entries))
    }

    pub fn update_policy<I, K, V>(entries: I) -> Attribute
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        Attribute::UpdatePolicy(Node::from_entries(NodeKind::UpdatePolicy, entries))
    }

    pub fn creation_policy<I, K, V>(entries: I) -> Attribute
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        Attribute::CreationPolicy(Node::from_entries(NodeKind::CreationPolicy, entries))
    }

    pub fn depends_on(value: impl Into<Value>) -> Attribute {
        Attribute::DependsOn(value.into())
    }

    pub fn deletion_policy(value: impl Into<Value>) -> Attribute {
        Attribute::DeletionPolicy(value.into())
    }

    pub fn condition(condition_name: impl Into<Value>) -> Attribute {
        Attribute::Condition(condition_name.into())
    }

    /// The key the attribute is stored under in its resource.
    pub fn key(&self) -> String {
        match self {
            Attribute::Metadata(node) | Attribute::UpdatePolicy(node) | Attribute::CreationPolicy(node) => {
                node.name()
            }
            Attribute::DependsOn(_) => "DependsOn".to_string(),
            Attribute::DeletionPolicy(_) => "DeletionPolicy".to_string(),
            Attribute::Condition(_) => "Condition".to_string(),
        }
    }

    fn apply(&self, resource: &Node) {
        debug!(resource = %resource.name(), attribute = %self.key(), "applying resource attribute");
        match self {
            Attribute::Metadata(node) | Attribute::UpdatePolicy(node) | Attribute::CreationPolicy(node) => {
                resource.add(node);
            }
            Attribute::DependsOn(value) | Attribute::DeletionPolicy(value) | Attribute::Condition(value) => {
                resource.insert(self.key(), value.clone());
            }
        }
    }
}

impl TryFrom<Node> for Attribute {
    type Error = Error;

    fn try_from(node: Node) -> Result<Attribute, Error> {
        match node.kind() {
            NodeKind::Metadata => Ok(Attribute::Metadata(node)),
            NodeKind::UpdatePolicy => Ok(Attribute::UpdatePolicy(node)),
            NodeKind::CreationPolicy => Ok(Attribute::CreationPolicy(node)),
            kind => Err(Error::UnknownAttribute { kind: kind.to_string() }),
        }
    }
}

/// One attribute, a bare attribute node, or an arbitrarily nested list of them.
#[derive(Clone, Debug)]
pub enum Attributes {
    One(Attribute),
    Node(Node),
    List(Vec<Attributes>),
}

impl From<Attribute> for Attributes {
    fn from(attribute: Attribute) -> Attributes {
        Attributes::One(attribute)
    }
}

impl From<Node> for Attributes {
    fn from(node: Node) -> Attributes {
        Attributes::Node(node)
    }
}

impl<T: Into<Attributes>> From<Vec<T>> for Attributes {
    fn from(list: Vec<T>) -> Attributes {
        Attributes::List(list.into_iter().map(Into::into).collect())
    }
}

// Adds `value` to `parent` if it is already a node, else wraps a plain map
// in a new node of `kind` first.
fn add_or_wrap(parent: &Node, kind: NodeKind, value: Value) -> Result<Option<Node>, Error> {
    match value {
        Value::Null => Ok(None),
        Value::Map(map) if map.is_empty() => Ok(None),
        Value::Node(node) if node.is_empty() => Ok(None),
        Value::Map(map) => Ok(Some(parent.add(&Node::from_entries(kind, map)))),
        value => parent.add_value(value).map(Some),
    }
}
