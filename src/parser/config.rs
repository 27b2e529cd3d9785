//! Tree descriptions in the shape the behavior3 editor exports them.
//!
//! The same structures can be read from JSON or YAML.

use crate::{error::LoadError, Value};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeConfig {
    pub id: String,
    /// The type name of the node, looked up in the [`crate::Registry`].
    pub name: String,
    pub title: String,
    pub category: String,
    pub description: String,
    pub children: Vec<String>,
    pub child: Option<String>,
    pub properties: HashMap<String, Value>,
}

impl NodeConfig {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    pub fn property(&self, key: &str) -> Option<&Value> {
        self.properties.get(key)
    }

    /// Ids of the children in the order they are ticked.
    pub fn child_ids(&self) -> impl Iterator<Item = &str> {
        self.children
            .iter()
            .chain(self.child.iter())
            .map(String::as_str)
    }

    /// A string property, or an empty string if it is absent or not a string.
    pub fn get_str(&self, key: &str) -> &str {
        self.property(key).and_then(Value::as_str).unwrap_or("")
    }

    /// An integer property, or 0 if it is absent or not an integer.
    pub fn get_i64(&self, key: &str) -> i64 {
        self.try_i64(key).unwrap_or(0)
    }

    /// A float property, or 0 if it is absent or not a number.
    pub fn get_f64(&self, key: &str) -> f64 {
        match self.property(key) {
            Some(Value::Float(f)) => *f,
            Some(Value::Int(i)) => *i as f64,
            Some(Value::UInt(u)) => *u as f64,
            Some(Value::Str(s)) => s.trim().parse().unwrap_or(0.),
            _ => 0.,
        }
    }

    /// A boolean property, or false if it is absent or not a boolean.
    pub fn get_bool(&self, key: &str) -> bool {
        match self.property(key) {
            Some(Value::Bool(b)) => *b,
            Some(Value::Str(s)) => s.trim() == "true",
            _ => false,
        }
    }

    /// An integer property, if present and readable as one.
    ///
    /// Editors tend to write numbers as floats or strings, so integral
    /// floats and numeric strings are accepted.
    pub fn try_i64(&self, key: &str) -> Option<i64> {
        match self.property(key)? {
            Value::Float(f) if f.fract() == 0. => Some(*f as i64),
            Value::Str(s) => s.trim().parse().ok(),
            value => value.to_i64(),
        }
    }

    /// Like [`Self::get_str`], but a missing or empty property is an error.
    pub fn require_str(&self, key: &str) -> Result<&str, LoadError> {
        match self.get_str(key) {
            "" => Err(LoadError::Property {
                node: self.id.clone(),
                property: key.to_owned(),
                reason: "missing or not a string".to_owned(),
            }),
            value => Ok(value),
        }
    }

    /// Like [`Self::try_i64`], but a missing or malformed property is an error.
    pub fn require_i64(&self, key: &str) -> Result<i64, LoadError> {
        let value = self.property(key).ok_or_else(|| LoadError::Property {
            node: self.id.clone(),
            property: key.to_owned(),
            reason: "missing".to_owned(),
        })?;
        self.try_i64(key).ok_or_else(|| LoadError::Property {
            node: self.id.clone(),
            property: key.to_owned(),
            reason: format!("expected an integer, found {} {}", value.kind(), value),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TreeConfig {
    pub id: String,
    pub title: String,
    pub description: String,
    /// Id of the root node in `nodes`.
    pub root: String,
    pub properties: HashMap<String, Value>,
    pub nodes: HashMap<String, NodeConfig>,
}

impl TreeConfig {
    pub fn from_json(source: &str) -> Result<Self, LoadError> {
        Ok(serde_json::from_str(source)?)
    }

    pub fn from_yaml(source: &str) -> Result<Self, LoadError> {
        Ok(serde_yaml::from_str(source)?)
    }
}

/// A node type declared in the editor, so that trees using it can be edited.
/// Loading a tree still needs a constructor for it in the [`crate::Registry`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CustomNodeConfig {
    pub name: String,
    pub category: String,
    pub title: String,
    pub description: String,
    pub properties: HashMap<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectData {
    pub trees: Vec<TreeConfig>,
    pub custom_nodes: Vec<CustomNodeConfig>,
}

/// A set of trees which can refer to each other as subtrees.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectConfig {
    pub name: String,
    pub data: ProjectData,
}

impl ProjectConfig {
    pub fn from_json(source: &str) -> Result<Self, LoadError> {
        Ok(serde_json::from_str(source)?)
    }

    pub fn from_yaml(source: &str) -> Result<Self, LoadError> {
        Ok(serde_yaml::from_str(source)?)
    }

    pub fn tree(&self, id: &str) -> Option<&TreeConfig> {
        self.data.trees.iter().find(|tree| tree.id == id)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_typed_properties() {
        let config = NodeConfig::new("1", "Wait")
            .with_property("int", 5)
            .with_property("float", 2.0)
            .with_property("text", "12")
            .with_property("word", "twelve")
            .with_property("flag", true);

        assert_eq!(config.get_i64("int"), 5);
        assert_eq!(config.get_i64("float"), 2);
        assert_eq!(config.get_i64("text"), 12);
        assert_eq!(config.get_i64("word"), 0);
        assert_eq!(config.get_i64("missing"), 0);
        assert_eq!(config.get_f64("int"), 5.);
        assert_eq!(config.get_str("word"), "twelve");
        assert_eq!(config.get_str("int"), "");
        assert!(config.get_bool("flag"));
        assert!(!config.get_bool("int"));
    }

    #[test]
    fn test_require_i64() {
        let config = NodeConfig::new("1", "Wait").with_property("word", "twelve");
        assert!(matches!(
            config.require_i64("missing"),
            Err(LoadError::Property { reason, .. }) if reason == "missing"
        ));
        assert!(matches!(
            config.require_i64("word"),
            Err(LoadError::Property { property, .. }) if property == "word"
        ));
    }

    #[test]
    fn test_tree_from_yaml() {
        let tree = TreeConfig::from_yaml(
            r#"
id: tree1
root: a
nodes:
  a:
    id: a
    name: Sequence
    children: [b]
  b:
    id: b
    name: Wait
    properties:
      milliseconds: 10
"#,
        )
        .unwrap();
        assert_eq!(tree.root, "a");
        assert_eq!(tree.nodes["a"].child_ids().collect::<Vec<_>>(), vec!["b"]);
        assert_eq!(tree.nodes["b"].get_i64("milliseconds"), 10);
    }

    #[test]
    fn test_project_from_json() {
        let project = ProjectConfig::from_json(
            r#"{
                "name": "demo",
                "scope": "project",
                "data": {
                    "version": "0.3.0",
                    "trees": [{ "id": "t1", "root": "1", "nodes": {} }],
                    "custom_nodes": [{ "name": "Attack", "category": "action" }]
                }
            }"#,
        )
        .unwrap();
        assert_eq!(project.name, "demo");
        assert!(project.tree("t1").is_some());
        assert!(project.tree("t2").is_none());
        assert_eq!(project.data.custom_nodes[0].name, "Attack");
        assert_eq!(project.data.custom_nodes[0].category, "action");
    }
}
