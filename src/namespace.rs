// Copyright (c) Chris Gunn.
// Licensed under the MIT license.

//! The bindings a template script leaves behind, and the options it reads.


use hashlink::LinkedHashMap;
use tracing::debug;

use crate::{
    error::Error,
    template::Template,
    value::{Map, Value},
};

/// Read-only key/value options made available to template scripts.
///
/// What happens when a script asks for a missing key is up to the caller
/// that filled the options in.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Options(Map);

impl Options {
    pub fn new(values: Map) -> Options {
        Options(values)
    }

    /// Parses options from a JSON object, keeping its key order.
    pub fn from_json_str(json: &str) -> Result<Options, Error> {
        let object: serde_json::Map<String, serde_json::Value> = serde_json::from_str(json)?;
        Ok(object.into_iter().collect())
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_map(&self) -> &Map {
        &self.0
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Options {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Options {
        let mut options = Options::default();
        options.extend(iter);
        options
    }
}

/// Later entries overwrite earlier ones in place.
impl<K: Into<String>, V: Into<Value>> Extend<(K, V)> for Options {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.0.replace(key.into(), value.into());
        }
    }
}

/// The named values a template script defined, in definition order, plus
/// the `options` it was given.
#[derive(Clone, Debug, Default)]
pub struct Namespace {
    options: Options,
    bindings: LinkedHashMap<String, Value>,
}

impl Namespace {
    pub fn new(options: Options) -> Namespace {
        Namespace {
            options,
            bindings: LinkedHashMap::new(),
        }
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Binds `name`. Rebinding a name keeps its original position.
    pub fn bind(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.bindings.replace(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.bindings.get(name)
    }

    /// Returns the first bound template root.
    pub fn find_template(&self) -> Result<Template, Error> {
        for (name, value) in &self.bindings {
            let Value::Node(node) = value else {
                continue;
            };
            if let Some(template) = Template::from_root(node.clone()) {
                debug!(binding = %name, "found template");
                return Ok(template);
            }
        }

        Err(Error::TemplateNotFound)
    }
}
