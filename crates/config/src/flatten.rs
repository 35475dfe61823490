//! Nested tree flattening

use serde::{Deserialize, Serialize};
use tracing::warn;
use types::{ConfigNode, ConfigTable, EnvflatError, FlatConfig, Result};

/// Default join string between path segments
pub const DEFAULT_SEPARATOR: &str = ".";

/// What to do when two tree paths flatten to the same key
///
/// This only happens when a raw key contains the separator, e.g. a YAML key
/// `"a.b"` next to a table `a` with child `b`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CollisionPolicy {
    /// Later-visited entry wins; the key keeps its first position
    #[default]
    Overwrite,
    /// Fail with [`EnvflatError::KeyCollision`]
    Reject,
}

/// Converts nested configuration trees into [`FlatConfig`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Flattener {
    separator: String,
    policy: CollisionPolicy,
}

impl Flattener {
    pub fn new(separator: impl Into<String>, policy: CollisionPolicy) -> Self {
        Self {
            separator: separator.into(),
            policy,
        }
    }

    pub fn separator(&self) -> &str {
        &self.separator
    }

    pub fn policy(&self) -> CollisionPolicy {
        self.policy
    }

    /// Flatten a tree in depth-first pre-order
    pub fn flatten(&self, tree: &ConfigTable) -> Result<FlatConfig> {
        let mut flat = FlatConfig::new();
        self.flatten_into(tree, None, &mut flat)?;
        Ok(flat)
    }

    fn flatten_into(
        &self,
        table: &ConfigTable,
        parent: Option<&str>,
        flat: &mut FlatConfig,
    ) -> Result<()> {
        for (key, node) in table {
            let new_key = match parent {
                Some(parent) if !parent.is_empty() => {
                    format!("{}{}{}", parent, self.separator, key)
                }
                _ => key.clone(),
            };

            match node {
                ConfigNode::Table(child) => self.flatten_into(child, Some(new_key.as_str()), flat)?,
                ConfigNode::Value(value) => self.emit(flat, new_key, value)?,
            }
        }
        Ok(())
    }

    fn emit(&self, flat: &mut FlatConfig, key: String, value: &str) -> Result<()> {
        if flat.contains_key(&key) {
            match self.policy {
                CollisionPolicy::Reject => return Err(EnvflatError::KeyCollision { key }),
                CollisionPolicy::Overwrite => {
                    warn!(key = %key, "Flattened key collision, keeping the later value");
                }
            }
        }
        flat.insert(key, value);
        Ok(())
    }
}

impl Default for Flattener {
    fn default() -> Self {
        Self::new(DEFAULT_SEPARATOR, CollisionPolicy::Overwrite)
    }
}

/// Flatten `tree` joining path segments with `separator`
///
/// Collisions resolve last-write-wins, so this never fails.
pub fn flatten(tree: &ConfigTable, separator: &str) -> FlatConfig {
    Flattener::new(separator, CollisionPolicy::Overwrite)
        .flatten(tree)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table<const N: usize>(entries: [(&str, ConfigNode); N]) -> ConfigTable {
        entries
            .into_iter()
            .map(|(key, node)| (key.to_string(), node))
            .collect()
    }

    fn sample_tree() -> ConfigTable {
        table([
            (
                "db",
                table([("host", "localhost".into()), ("port", "5432".into())]).into(),
            ),
            (
                "app",
                table([
                    ("name", "envflat".into()),
                    ("log", table([("level", "info".into())]).into()),
                ])
                .into(),
            ),
            ("debug", "false".into()),
        ])
    }

    #[test]
    fn test_flatten_nested_tree() {
        let flat = flatten(&sample_tree(), DEFAULT_SEPARATOR);

        assert_eq!(flat.len(), 5);
        assert_eq!(flat.get("db.host"), Some("localhost"));
        assert_eq!(flat.get("db.port"), Some("5432"));
        assert_eq!(flat.get("app.log.level"), Some("info"));
        assert_eq!(flat.get("debug"), Some("false"));
    }

    #[test]
    fn test_flatten_preserves_preorder() {
        let flat = flatten(&sample_tree(), DEFAULT_SEPARATOR);
        let keys: Vec<_> = flat.keys().map(String::as_str).collect();
        assert_eq!(
            keys,
            vec!["db.host", "db.port", "app.name", "app.log.level", "debug"]
        );
    }

    #[test]
    fn test_flatten_empty_tree() {
        assert!(flatten(&ConfigTable::new(), DEFAULT_SEPARATOR).is_empty());
    }

    #[test]
    fn test_flatten_is_identity_on_flat_tree() {
        let tree = table([("db.host", "localhost".into()), ("port", "5432".into())]);
        let flat = flatten(&tree, DEFAULT_SEPARATOR);

        let expected: FlatConfig = [("db.host", "localhost"), ("port", "5432")]
            .into_iter()
            .collect();
        assert_eq!(flat, expected);
    }

    #[test]
    fn test_empty_nested_table_contributes_nothing() {
        let tree = table([("empty", ConfigTable::new().into()), ("x", "1".into())]);
        let flat = flatten(&tree, DEFAULT_SEPARATOR);
        assert_eq!(flat.keys().collect::<Vec<_>>(), vec!["x"]);
    }

    #[test]
    fn test_custom_separator() {
        let flat = flatten(&sample_tree(), "__");
        assert_eq!(flat.get("app__log__level"), Some("info"));
        assert!(!flat.contains_key("app.log.level"));
    }

    #[test]
    fn test_collision_overwrite_keeps_later_value() {
        let tree = table([
            ("a.b", "raw".into()),
            ("a", table([("b", "nested".into())]).into()),
            ("c", "1".into()),
        ]);

        let flat = Flattener::default().flatten(&tree).unwrap();
        assert_eq!(flat.len(), 2);
        assert_eq!(flat.get("a.b"), Some("nested"));
        assert_eq!(flat.keys().collect::<Vec<_>>(), vec!["a.b", "c"]);
    }

    #[test]
    fn test_collision_reject() {
        let tree = table([
            ("a", table([("b", "nested".into())]).into()),
            ("a.b", "raw".into()),
        ]);

        let result = Flattener::new(".", CollisionPolicy::Reject).flatten(&tree);
        match result {
            Err(EnvflatError::KeyCollision { key }) => assert_eq!(key, "a.b"),
            other => panic!("expected key collision, got {:?}", other),
        }
    }

    #[test]
    fn test_reject_policy_allows_distinct_keys() {
        let flat = Flattener::new(".", CollisionPolicy::Reject)
            .flatten(&sample_tree())
            .unwrap();
        assert_eq!(flat.len(), 5);
    }
}
