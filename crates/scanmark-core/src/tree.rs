//! Tree document
//!
//! A small named-node tree used as the on-disk shape of the bookmark file and
//! as the opaque settings blob carried by every bookmark. Nodes have a name,
//! an optional scalar value, and ordered children; several children may share
//! a name.
//!
//! The tree renders to JSON through serde:
//!
//! ```text
//! {"name": "modem", "children": [
//!     {"name": "frequency", "value": 121500000},
//!     {"name": "type", "value": "AM"}
//! ]}
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

/// Scalar value held by a node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DataValue {
    Int(i64),
    Float(f64),
    Bool(bool),
    Text(String),
}

impl DataValue {
    /// Integer view of the value; text that parses as an integer is accepted
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            DataValue::Int(v) => Some(*v),
            DataValue::Float(v) if v.fract() == 0.0 => Some(*v as i64),
            DataValue::Text(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Boolean view of the value
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            DataValue::Bool(v) => Some(*v),
            DataValue::Int(v) => Some(*v != 0),
            DataValue::Text(s) => match s.as_str() {
                "true" | "1" => Some(true),
                "false" | "0" => Some(false),
                _ => None,
            },
            DataValue::Float(_) => None,
        }
    }
}

impl fmt::Display for DataValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataValue::Int(v) => write!(f, "{}", v),
            DataValue::Float(v) => write!(f, "{}", v),
            DataValue::Bool(v) => write!(f, "{}", v),
            DataValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for DataValue {
    fn from(v: i64) -> Self {
        DataValue::Int(v)
    }
}

/// Non-finite floats have no JSON form and are kept as text
impl From<f64> for DataValue {
    fn from(v: f64) -> Self {
        if v.is_finite() {
            DataValue::Float(v)
        } else {
            DataValue::Text(v.to_string())
        }
    }
}

impl From<bool> for DataValue {
    fn from(v: bool) -> Self {
        DataValue::Bool(v)
    }
}

impl From<&str> for DataValue {
    fn from(v: &str) -> Self {
        DataValue::Text(v.to_string())
    }
}

impl From<String> for DataValue {
    fn from(v: String) -> Self {
        DataValue::Text(v)
    }
}

/// A node in the tree document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataNode {
    name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    value: Option<DataValue>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    children: Vec<DataNode>,
}

impl DataNode {
    /// Create an empty node
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: None,
            children: Vec::new(),
        }
    }

    /// Create a leaf node holding a value
    pub fn with_value(name: impl Into<String>, value: impl Into<DataValue>) -> Self {
        Self {
            name: name.into(),
            value: Some(value.into()),
            children: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn value(&self) -> Option<&DataValue> {
        self.value.as_ref()
    }

    pub fn set_value(&mut self, value: impl Into<DataValue>) {
        self.value = Some(value.into());
    }

    pub fn children(&self) -> &[DataNode] {
        &self.children
    }

    /// Append an empty child and return it for filling in
    pub fn new_child(&mut self, name: impl Into<String>) -> &mut DataNode {
        self.add_child(DataNode::new(name))
    }

    /// Append an existing node as a child
    pub fn add_child(&mut self, node: DataNode) -> &mut DataNode {
        let idx = self.children.len();
        self.children.push(node);
        &mut self.children[idx]
    }

    /// Append a deep copy of `source` under a new name
    pub fn new_child_clone_from(&mut self, name: impl Into<String>, source: &DataNode) -> &mut DataNode {
        let mut copy = source.clone();
        copy.name = name.into();
        self.add_child(copy)
    }

    pub fn has_child(&self, name: &str) -> bool {
        self.children.iter().any(|c| c.name == name)
    }

    /// First child with the given name
    pub fn child(&self, name: &str) -> Option<&DataNode> {
        self.children.iter().find(|c| c.name == name)
    }

    pub fn child_mut(&mut self, name: &str) -> Option<&mut DataNode> {
        self.children.iter_mut().find(|c| c.name == name)
    }

    /// All children with the given name, in document order
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a DataNode> + 'a {
        self.children.iter().filter(move |c| c.name == name)
    }

    /// Drop every child named `name`, returning how many were removed
    pub fn remove_children(&mut self, name: &str) -> usize {
        let before = self.children.len();
        self.children.retain(|c| c.name != name);
        before - self.children.len()
    }

    /// Set the value of the first child named `name`, adding it if absent
    pub fn set_child(&mut self, name: &str, value: impl Into<DataValue>) {
        match self.child_mut(name) {
            Some(child) => child.set_value(value),
            None => {
                self.add_child(DataNode::with_value(name, value));
            }
        }
    }

    /// Integer value of the first child named `name`
    pub fn get_i64(&self, name: &str) -> Option<i64> {
        self.child(name)?.value()?.as_i64()
    }

    /// Text rendering of the first child named `name`
    pub fn get_text(&self, name: &str) -> Option<String> {
        self.child(name)?.value().map(|v| v.to_string())
    }

    pub fn get_bool(&self, name: &str) -> Option<bool> {
        self.child(name)?.value()?.as_bool()
    }
}

/// A whole document: a single root node
#[derive(Debug, Clone, PartialEq)]
pub struct DataTree {
    root: DataNode,
}

impl DataTree {
    /// Create a document with an empty root
    pub fn new(root_name: impl Into<String>) -> Self {
        Self {
            root: DataNode::new(root_name),
        }
    }

    pub fn root(&self) -> &DataNode {
        &self.root
    }

    pub fn root_mut(&mut self) -> &mut DataNode {
        &mut self.root
    }

    /// Parse a document from its JSON rendering
    pub fn parse(text: &str) -> Result<Self, serde_json::Error> {
        let root = serde_json::from_str(text)?;
        Ok(Self { root })
    }

    /// Render the document as pretty-printed JSON
    pub fn render(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.root)
    }
}
