//! Nested configuration tree

use indexmap::IndexMap;

/// An ordered mapping from key to child node
pub type ConfigTable = IndexMap<String, ConfigNode>;

/// A node of a parsed configuration file
///
/// Leaves hold the string rendering of a scalar; tables keep their keys in
/// document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigNode {
    /// Leaf scalar
    Value(String),
    /// Internal node
    Table(ConfigTable),
}

impl ConfigNode {
    /// Build a leaf node
    pub fn value(value: impl Into<String>) -> Self {
        ConfigNode::Value(value.into())
    }

    /// Borrow the table if this node is internal
    pub fn as_table(&self) -> Option<&ConfigTable> {
        match self {
            ConfigNode::Table(table) => Some(table),
            ConfigNode::Value(_) => None,
        }
    }

    pub fn is_table(&self) -> bool {
        matches!(self, ConfigNode::Table(_))
    }
}

impl From<&str> for ConfigNode {
    fn from(value: &str) -> Self {
        ConfigNode::Value(value.to_string())
    }
}

impl From<String> for ConfigNode {
    fn from(value: String) -> Self {
        ConfigNode::Value(value)
    }
}

impl From<ConfigTable> for ConfigNode {
    fn from(table: ConfigTable) -> Self {
        ConfigNode::Table(table)
    }
}
