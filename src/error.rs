use thiserror::Error;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AddChildError {
    #[error("Attempted to add too many nodes")]
    TooManyNodes,
}

pub type AddChildResult = Result<(), AddChildError>;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum LoadError {
    #[error("Failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("The tree {0:?} has no root node")]
    MissingRoot(String),
    #[error("Node type or subtree name not found {0:?}")]
    MissingNode(String),
    #[error("Node {node:?} refers to a child {child:?} that is not defined")]
    MissingChild { node: String, child: String },
    #[error("Subtree {node:?} includes itself")]
    InfiniteRecursion { node: String },
    #[error("Node {node:?} is its own ancestor in tree {tree:?}")]
    Cycle { tree: String, node: String },
    #[error("Node {node:?} has an invalid property {property:?}: {reason}")]
    Property {
        node: String,
        property: String,
        reason: String,
    },
    #[error("{0} to {1}")]
    AddChildError(AddChildError, String),
}

#[derive(Debug, Error, PartialEq)]
pub enum BlackboardError {
    #[error("Blackboard key {key:?} holds a {found}, not a {expected}")]
    TypeMismatch {
        key: String,
        expected: &'static str,
        found: &'static str,
    },
}
