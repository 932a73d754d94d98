//! # Source trees
//!
//! The extraction phase does not read HDF5 files itself. Instead it walks any
//! type implementing [`SourceNode`]: a read-only view of one node in the
//! hierarchical file (its name, internal path, dataset shape, attributes, and
//! children). An actual HDF5 reader sits outside this crate and either
//! implements the trait directly over its handles or materializes the
//! metadata into the bundled [`MemoryNode`] tree.
//!
//! All lookups are by exact conventional name. Absence of an optional name is
//! not an error (`get` returns `None`); absence of a required one surfaces as
//! a [`SourceError`] through [`SourceNode::require`].

use derive_more::{Constructor, Display, From};

/// errors raised while reading the source tree: a conventionally required
/// name is missing, or an attribute value cannot be interpreted.
#[derive(Debug, thiserror::Error, From)]
pub enum SourceError {
    #[error("{0}")]
    MissingChild(MissingChild),
    #[error("{0}")]
    MissingAttribute(MissingAttribute),
    #[error("{0}")]
    MalformedAttribute(MalformedAttribute),
}

#[derive(From, Display, Debug, Constructor)]
#[display(fmt = "missing child `{child_name}` in `{parent_name}`")]
pub struct MissingChild {
    parent_name: String,
    child_name: String,
}

#[derive(From, Display, Debug, Constructor)]
#[display(fmt = "missing attribute `{attribute_name}` on `{node_name}`")]
pub struct MissingAttribute {
    node_name: String,
    attribute_name: String,
}

#[derive(From, Display, Debug, Constructor)]
#[display(
    fmt = "attribute `{attribute_name}` on `{node_name}` has unparsable value `{value}`"
)]
pub struct MalformedAttribute {
    node_name: String,
    attribute_name: String,
    value: String,
}

/// read-only view of one node of the hierarchical simulation output
pub trait SourceNode: Sized {
    /// the node's own name (for the root node, the file name)
    fn name(&self) -> &str;

    /// the node's internal path within the file, such as `/geometry/vertices`
    fn path(&self) -> &str;

    /// the dataset shape; empty for pure groups
    fn shape(&self) -> Vec<usize>;

    fn has_attribute(&self, name: &str) -> bool;

    /// fetch an attribute as an integer
    fn attribute_integer(&self, name: &str) -> Result<i64, SourceError>;

    /// fetch an attribute as a string
    fn attribute_string(&self, name: &str) -> Result<String, SourceError>;

    fn get(&self, name: &str) -> Option<&Self>;

    fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// children, in file order
    fn items(&self) -> Vec<&Self>;

    /// the raw floating point contents of the dataset. Only ever called for
    /// the conventional `time` dataset.
    fn raw_data(&self) -> Result<Vec<f64>, SourceError>;

    /// fetch a child that the format conventions require to exist
    fn require(&self, name: &str) -> Result<&Self, SourceError> {
        self.get(name)
            .ok_or_else(|| MissingChild::new(self.name().to_string(), name.to_string()).into())
    }
}

/// a single attribute value as stored in the file
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeValue {
    Integer(i64),
    Text(String),
}

impl From<i64> for AttributeValue {
    fn from(x: i64) -> Self {
        AttributeValue::Integer(x)
    }
}

impl From<&str> for AttributeValue {
    fn from(x: &str) -> Self {
        AttributeValue::Text(x.to_string())
    }
}

/// An in-memory snapshot of the metadata of a hierarchical file.
///
/// Child paths are rebased when a node is attached with
/// [`with_child`](MemoryNode::with_child), so a tree assembled bottom-up ends
/// with HDF5-style paths (`/geometry/vertices`) regardless of construction
/// order. The root node's name doubles as the file name and its path stays
/// empty.
#[derive(Debug, Clone, Default)]
pub struct MemoryNode {
    name: String,
    path: String,
    shape: Vec<usize>,
    attributes: Vec<(String, AttributeValue)>,
    children: Vec<MemoryNode>,
    values: Vec<f64>,
}

impl MemoryNode {
    /// a group node: children only, no shape
    pub fn group(name: &str) -> Self {
        MemoryNode {
            name: name.to_string(),
            ..MemoryNode::default()
        }
    }

    /// a dataset node with the given shape
    pub fn dataset(name: &str, shape: Vec<usize>) -> Self {
        MemoryNode {
            name: name.to_string(),
            shape,
            ..MemoryNode::default()
        }
    }

    /// a dataset node carrying raw values (used for the `time` dataset)
    pub fn values(name: &str, values: Vec<f64>) -> Self {
        MemoryNode {
            name: name.to_string(),
            shape: vec![values.len()],
            values,
            ..MemoryNode::default()
        }
    }

    pub fn with_attribute(mut self, name: &str, value: impl Into<AttributeValue>) -> Self {
        self.attributes.push((name.to_string(), value.into()));
        self
    }

    pub fn with_child(mut self, mut child: MemoryNode) -> Self {
        child.rebase(&self.path);
        self.children.push(child);
        self
    }

    // recompute this node's path (and its descendants') under a new parent
    fn rebase(&mut self, parent_path: &str) {
        self.path = format!("{}/{}", parent_path, self.name);
        let path = self.path.clone();
        for child in self.children.iter_mut() {
            child.rebase(&path);
        }
    }

    fn attribute(&self, name: &str) -> Option<&AttributeValue> {
        self.attributes
            .iter()
            .find(|(attribute_name, _)| attribute_name == name)
            .map(|(_, value)| value)
    }
}

impl SourceNode for MemoryNode {
    fn name(&self) -> &str {
        &self.name
    }

    fn path(&self) -> &str {
        &self.path
    }

    fn shape(&self) -> Vec<usize> {
        self.shape.clone()
    }

    fn has_attribute(&self, name: &str) -> bool {
        self.attribute(name).is_some()
    }

    fn attribute_integer(&self, name: &str) -> Result<i64, SourceError> {
        match self.attribute(name) {
            Some(AttributeValue::Integer(value)) => Ok(*value),
            Some(AttributeValue::Text(text)) => text.parse().map_err(|_| {
                MalformedAttribute::new(self.name.clone(), name.to_string(), text.clone()).into()
            }),
            None => Err(MissingAttribute::new(self.name.clone(), name.to_string()).into()),
        }
    }

    fn attribute_string(&self, name: &str) -> Result<String, SourceError> {
        match self.attribute(name) {
            Some(AttributeValue::Text(text)) => Ok(text.clone()),
            Some(AttributeValue::Integer(value)) => Ok(value.to_string()),
            None => Err(MissingAttribute::new(self.name.clone(), name.to_string()).into()),
        }
    }

    fn get(&self, name: &str) -> Option<&Self> {
        self.children.iter().find(|child| child.name == name)
    }

    fn items(&self) -> Vec<&Self> {
        self.children.iter().collect()
    }

    fn raw_data(&self) -> Result<Vec<f64>, SourceError> {
        Ok(self.values.clone())
    }
}
