// Copyright (c) Chris Gunn.
// Licensed under the MIT license.

//! The ordered, self-naming mapping every template element is built from.
//!
//! A [`Node`] is a shared handle: cloning it clones the handle, not the tree.
//! A child added to a parent and mutated afterwards is still seen through the
//! parent, and identity survives being stored as a [`Value::Node`].

#[cfg(test)]
mod tests;

use std::{cell::RefCell, fmt, rc::Rc};

use hashlink::LinkedHashMap;
use serde::ser::{Serialize, SerializeMap, Serializer};
use tracing::{debug, warn};

use crate::{
    error::{ChildOp, Error},
    render::to_canonical_json,
    value::{Map, Value},
};

/// The concrete type of a node. Its display name is the node's default name.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Node,
    Template,
    Parameters,
    Mappings,
    Conditions,
    Resources,
    Outputs,
    Metadata,
    Properties,
    Resource,
    Parameter,
    Mapping,
    Output,
    Condition,
    UpdatePolicy,
    CreationPolicy,
    Custom(Rc<str>),
}

impl NodeKind {
    pub fn custom(name: &str) -> NodeKind {
        NodeKind::Custom(Rc::from(name))
    }

    pub fn default_name(&self) -> &str {
        match self {
            NodeKind::Node => "Node",
            NodeKind::Template => "CloudFormationTemplate",
            NodeKind::Parameters => "Parameters",
            NodeKind::Mappings => "Mappings",
            NodeKind::Conditions => "Conditions",
            NodeKind::Resources => "Resources",
            NodeKind::Outputs => "Outputs",
            NodeKind::Metadata => "Metadata",
            NodeKind::Properties => "Properties",
            NodeKind::Resource => "Resource",
            NodeKind::Parameter => "Parameter",
            NodeKind::Mapping => "Mapping",
            NodeKind::Output => "Output",
            NodeKind::Condition => "Condition",
            NodeKind::UpdatePolicy => "UpdatePolicy",
            NodeKind::CreationPolicy => "CreationPolicy",
            NodeKind::Custom(name) => name.as_ref(),
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.default_name())
    }
}

#[derive(Clone)]
pub struct Node(Rc<RefCell<NodeData>>);

struct NodeData {
    kind: NodeKind,
    name: Option<String>,
    entries: Map,
    // Named fields bound with `bind`, in binding order.
    slots: LinkedHashMap<String, Node>,
}

impl Node {
    pub fn new(kind: NodeKind) -> Node {
        Node(Rc::new(RefCell::new(NodeData {
            kind,
            name: None,
            entries: Map::new(),
            slots: LinkedHashMap::new(),
        })))
    }

    pub fn named(kind: NodeKind, name: impl Into<String>) -> Node {
        let node = Node::new(kind);
        node.set_name(name);
        node
    }

    /// Creates a node pre-populated in the iteration order of `entries`.
    pub fn from_entries<I, K, V>(kind: NodeKind, entries: I) -> Node
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        let node = Node::new(kind);
        node.update(entries);
        node
    }

    pub fn kind(&self) -> NodeKind {
        self.0.borrow().kind.clone()
    }

    /// The explicit name if one is set, else the kind's default name.
    pub fn name(&self) -> String {
        let data = self.0.borrow();
        match &data.name {
            Some(name) => name.clone(),
            None => data.kind.default_name().to_string(),
        }
    }

    pub fn set_name(&self, name: impl Into<String>) {
        self.0.borrow_mut().name = Some(name.into());
    }

    /// Reverts the name to the kind's default.
    pub fn clear_name(&self) {
        self.0.borrow_mut().name = None;
    }

    pub fn get(&self, key: &str) -> Option<Value> {
        self.0.borrow().entries.get(key).cloned()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.borrow().entries.contains_key(key)
    }

    /// Sets `key`. An existing key keeps its position.
    pub fn insert(&self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        let (key, value) = (key.into(), value.into());
        self.0.borrow_mut().entries.replace(key, value)
    }

    pub fn update<I, K, V>(&self, entries: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        for (key, value) in entries {
            self.insert(key, value);
        }
    }

    pub fn remove_key(&self, key: &str) -> Option<Value> {
        self.0.borrow_mut().entries.remove(key)
    }

    pub fn len(&self) -> usize {
        self.0.borrow().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.borrow().entries.is_empty()
    }

    pub fn keys(&self) -> Vec<String> {
        self.0.borrow().entries.keys().cloned().collect()
    }

    pub fn entries(&self) -> Vec<(String, Value)> {
        let data = self.0.borrow();
        data.entries.iter().map(|(key, value)| (key.clone(), value.clone())).collect()
    }

    /// Registers `child` under its name, replacing whatever was stored there,
    /// and returns it for chaining.
    ///
    /// Cycles are not detected: adding a node beneath itself makes it
    /// impossible to render.
    pub fn add(&self, child: &Node) -> Node {
        let name = child.name();
        debug!(parent = %self.name(), child = %name, "adding child node");
        self.insert(name, child);
        child.clone()
    }

    /// Like [`Node::add`], for a value that may or may not be a node.
    pub fn add_value(&self, child: impl Into<Value>) -> Result<Node, Error> {
        match child.into() {
            Value::Node(node) => Ok(self.add(&node)),
            _ => Err(Error::InvalidChild { op: ChildOp::Add }),
        }
    }

    /// Removes the entry stored under `child`'s name.
    ///
    /// A missing entry is tolerated: renaming a child after adding it leaves
    /// its old key behind, so there may be nothing to remove.
    pub fn remove(&self, child: &Node) -> Option<Value> {
        let name = child.name();
        let removed = self.remove_key(&name);
        match removed {
            Some(_) => debug!(parent = %self.name(), child = %name, "removed child node"),
            None => warn!(parent = %self.name(), child = %name, "child node not present, nothing to remove"),
        }
        removed
    }

    /// Like [`Node::remove`], for a value that may or may not be a node.
    pub fn remove_value(&self, child: &Value) -> Result<Option<Value>, Error> {
        match child {
            Value::Node(node) => Ok(self.remove(node)),
            _ => Err(Error::InvalidChild { op: ChildOp::Remove }),
        }
    }

    /// Binds `node` to the named field `slot` and registers it as a child.
    ///
    /// A different node previously bound to the slot is removed first.
    pub fn bind(&self, slot: impl Into<String>, node: &Node) -> Node {
        let slot = slot.into();
        let previous = self.slot(&slot);
        if let Some(previous) = previous {
            if !previous.ptr_eq(node) {
                self.remove(&previous);
            }
        }

        debug!(parent = %self.name(), slot = %slot, "binding node");
        self.add(node);
        self.0.borrow_mut().slots.replace(slot, node.clone());
        node.clone()
    }

    /// Clears the named field `slot`, removing its node from the entries.
    pub fn unbind(&self, slot: &str) -> Option<Node> {
        let node = self.0.borrow_mut().slots.remove(slot)?;
        debug!(parent = %self.name(), slot = %slot, "unbinding node");
        self.remove(&node);
        Some(node)
    }

    pub fn slot(&self, slot: &str) -> Option<Node> {
        self.0.borrow().slots.get(slot).cloned()
    }

    pub fn slots(&self) -> Vec<(String, Node)> {
        let data = self.0.borrow();
        data.slots.iter().map(|(slot, node)| (slot.clone(), node.clone())).collect()
    }

    pub fn ptr_eq(&self, other: &Node) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// Renders the node and everything below it as canonical JSON.
    pub fn to_json(&self) -> Result<String, Error> {
        to_canonical_json(self)
    }

    pub(crate) fn entries_eq(&self, map: &Map) -> bool {
        self.0.borrow().entries == *map
    }

    /// Serializes the entries, leaving out the ones `skip` selects.
    pub(crate) fn serialize_filtered<S, F>(&self, serializer: S, mut skip: F) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
        F: FnMut(&str, &Value) -> bool,
    {
        let data = self.0.borrow();
        let mut map = serializer.serialize_map(None)?;
        for (key, value) in &data.entries {
            if skip(key, value) {
                continue;
            }
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Node) -> bool {
        if self.ptr_eq(other) {
            return true;
        }
        self.0.borrow().entries == other.0.borrow().entries
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let data = self.0.borrow();
        f.debug_struct("Node")
            .field("kind", &data.kind)
            .field("name", &data.name)
            .field("entries", &data.entries)
            .finish()
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let json = self.to_json().map_err(|_| fmt::Error)?;
        f.write_str(&json)
    }
}

impl Serialize for Node {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.serialize_filtered(serializer, |_, _| false)
    }
}
