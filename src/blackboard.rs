use crate::{error::BlackboardError, Value};
use std::collections::HashMap;

/// A flat key-value store. Every scope of a [`Blackboard`] is one of these.
#[derive(Default, Debug, Clone)]
pub struct Memory {
    values: HashMap<String, Value>,
}

impl Memory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    pub fn set(&mut self, key: impl Into<String>, value: Value) {
        self.values.insert(key.into(), value);
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.values.remove(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }
}

/// A node that stayed open at the end of a traversal, with the depth it was
/// entered at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenNode {
    pub id: String,
    pub depth: usize,
}

/// Traversal bookkeeping of one tree, owned by that tree's memory.
#[derive(Default, Debug, Clone)]
pub struct TreeData {
    /// Open nodes in the order they were entered.
    pub open_nodes: Vec<OpenNode>,
    /// Deepest nesting level reached by the last traversal.
    pub traversal_depth: usize,
    /// Number of traversals completed so far.
    pub traversal_cycle: u64,
}

impl TreeData {
    pub fn is_open(&self, node_id: &str) -> bool {
        self.open_nodes.iter().any(|open| open.id == node_id)
    }
}

#[derive(Default, Debug)]
struct TreeMemory {
    memory: Memory,
    tree_data: TreeData,
    node_memory: HashMap<String, Memory>,
}

/// Persistence hook for a [`Blackboard`].
///
/// Every mutating call on the blackboard is mirrored to the storage with the
/// scope it was made in, and [`Blackboard::with_storage`] replays
/// [`Storage::for_each`] to rebuild the in-memory state.
/// Empty scope strings stand for "no scope".
pub trait Storage: Send {
    fn set(&mut self, key: &str, value: &Value, tree_scope: &str, node_scope: &str);

    fn remove(&mut self, key: &str, tree_scope: &str, node_scope: &str);

    fn for_each(&self, visit: &mut dyn FnMut(&str, &Value, &str, &str));
}

/// Blackboard is the memory of behavior trees, split into 3 scopes.
///
/// * The global scope is shared by every tree ticked with this blackboard.
/// * The tree scope is shared by all nodes of one tree.
/// * The node scope is private to a single node of a single tree.
///
/// The scope is selected by the `tree_scope` and `node_scope` arguments,
/// where an empty string means the scope is not given.
///
/// ```
/// # use behavior3_lite::{Blackboard, Value};
/// let mut bb = Blackboard::new();
/// bb.set_mem("key", "global".into());
/// bb.set_tree("key", "tree".into(), "tree1");
/// bb.set("key", "node".into(), "tree1", "node1");
///
/// assert_eq!(bb.get_mem("key"), Some(&Value::from("global")));
/// assert_eq!(bb.get("key", "tree1", ""), Some(&Value::from("tree")));
/// assert_eq!(bb.get("key", "tree1", "node1"), Some(&Value::from("node")));
/// ```
///
/// # Node scope without a tree scope
///
/// If only `node_scope` is given, the access falls through to the global
/// scope. Node identities are only unique within a tree, so there is no
/// node scope to address without one.
/// Code written against this blackboard relies on the fall through,
/// e.g. a node running outside of any tree shares the global memory.
///
/// # Implementation note
///
/// Tree and node memories are created on first write and live as long as the
/// blackboard. Reads never create them, so reading an unknown scope is just
/// a miss.
#[derive(Default)]
pub struct Blackboard {
    storage: Option<Box<dyn Storage>>,
    base_memory: Memory,
    tree_memory: HashMap<String, TreeMemory>,
}

impl Blackboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a blackboard backed by `storage`, replaying its entries into
    /// the matching scopes.
    ///
    /// Traversal bookkeeping is not stored. The first tick of a tree after
    /// hydration rebuilds its open nodes from their restored `isOpen` flags,
    /// so a branch left running is still closed if it gets abandoned.
    pub fn with_storage(storage: Box<dyn Storage>) -> Self {
        let mut ret = Self::default();
        storage.for_each(&mut |key, value, tree_scope, node_scope| {
            ret.memory_mut(tree_scope, node_scope)
                .set(key, value.clone());
        });
        tracing::debug!(
            global = ret.base_memory.len(),
            trees = ret.tree_memory.len(),
            "Blackboard hydrated from storage"
        );
        ret.storage = Some(storage);
        ret
    }

    fn memory(&self, tree_scope: &str, node_scope: &str) -> Option<&Memory> {
        if tree_scope.is_empty() {
            return Some(&self.base_memory);
        }
        let tree = self.tree_memory.get(tree_scope)?;
        if node_scope.is_empty() {
            Some(&tree.memory)
        } else {
            tree.node_memory.get(node_scope)
        }
    }

    fn memory_mut(&mut self, tree_scope: &str, node_scope: &str) -> &mut Memory {
        if tree_scope.is_empty() {
            return &mut self.base_memory;
        }
        let tree = self.tree_memory.entry(tree_scope.to_owned()).or_default();
        if node_scope.is_empty() {
            &mut tree.memory
        } else {
            tree.node_memory.entry(node_scope.to_owned()).or_default()
        }
    }

    pub fn set(&mut self, key: &str, value: Value, tree_scope: &str, node_scope: &str) {
        if let Some(storage) = self.storage.as_mut() {
            storage.set(key, &value, tree_scope, node_scope);
        }
        self.memory_mut(tree_scope, node_scope).set(key, value);
    }

    pub fn set_mem(&mut self, key: &str, value: Value) {
        self.set(key, value, "", "")
    }

    pub fn set_tree(&mut self, key: &str, value: Value, tree_scope: &str) {
        self.set(key, value, tree_scope, "")
    }

    pub fn get(&self, key: &str, tree_scope: &str, node_scope: &str) -> Option<&Value> {
        self.memory(tree_scope, node_scope)?.get(key)
    }

    pub fn get_mem(&self, key: &str) -> Option<&Value> {
        self.base_memory.get(key)
    }

    pub fn contains(&self, key: &str, tree_scope: &str, node_scope: &str) -> bool {
        self.get(key, tree_scope, node_scope).is_some()
    }

    pub fn remove(&mut self, key: &str, tree_scope: &str, node_scope: &str) -> Option<Value> {
        if let Some(storage) = self.storage.as_mut() {
            storage.remove(key, tree_scope, node_scope);
        }
        self.memory_mut(tree_scope, node_scope).remove(key)
    }

    pub fn remove_mem(&mut self, key: &str) -> Option<Value> {
        self.remove(key, "", "")
    }

    /// Traversal bookkeeping of a tree, if the tree was ever ticked with
    /// this blackboard.
    pub fn tree_data(&self, tree_scope: &str) -> Option<&TreeData> {
        self.tree_memory.get(tree_scope).map(|tree| &tree.tree_data)
    }

    pub(crate) fn tree_data_mut(&mut self, tree_scope: &str) -> &mut TreeData {
        &mut self
            .tree_memory
            .entry(tree_scope.to_owned())
            .or_default()
            .tree_data
    }

    fn get_typed<T: Default>(
        &self,
        key: &str,
        tree_scope: &str,
        node_scope: &str,
        expected: &'static str,
        f: impl FnOnce(&Value) -> Option<T>,
    ) -> Result<T, BlackboardError> {
        let Some(value) = self.get(key, tree_scope, node_scope) else {
            return Ok(T::default());
        };
        f(value).ok_or_else(|| BlackboardError::TypeMismatch {
            key: key.to_owned(),
            expected,
            found: value.kind(),
        })
    }

    pub fn get_bool(
        &self,
        key: &str,
        tree_scope: &str,
        node_scope: &str,
    ) -> Result<bool, BlackboardError> {
        self.get_typed(key, tree_scope, node_scope, "bool", Value::as_bool)
    }

    pub fn get_i64(
        &self,
        key: &str,
        tree_scope: &str,
        node_scope: &str,
    ) -> Result<i64, BlackboardError> {
        self.get_typed(key, tree_scope, node_scope, "int", Value::as_i64)
    }

    pub fn get_u64(
        &self,
        key: &str,
        tree_scope: &str,
        node_scope: &str,
    ) -> Result<u64, BlackboardError> {
        self.get_typed(key, tree_scope, node_scope, "uint", Value::as_u64)
    }

    pub fn get_f64(
        &self,
        key: &str,
        tree_scope: &str,
        node_scope: &str,
    ) -> Result<f64, BlackboardError> {
        self.get_typed(key, tree_scope, node_scope, "float", Value::as_f64)
    }

    pub fn get_string(
        &self,
        key: &str,
        tree_scope: &str,
        node_scope: &str,
    ) -> Result<String, BlackboardError> {
        self.get_typed(key, tree_scope, node_scope, "string", |v| {
            v.as_str().map(str::to_owned)
        })
    }

    /// Like [`Self::get_i64`], but also accepts an unsigned value in range.
    pub fn get_i64_lossy(
        &self,
        key: &str,
        tree_scope: &str,
        node_scope: &str,
    ) -> Result<i64, BlackboardError> {
        self.get_typed(key, tree_scope, node_scope, "int", Value::to_i64)
    }

    /// Like [`Self::get_u64`], but also accepts a non-negative signed value.
    pub fn get_u64_lossy(
        &self,
        key: &str,
        tree_scope: &str,
        node_scope: &str,
    ) -> Result<u64, BlackboardError> {
        self.get_typed(key, tree_scope, node_scope, "uint", Value::to_u64)
    }
}

impl std::fmt::Debug for Blackboard {
    fn fmt(&self, fmt: &mut std::fmt::Formatter) -> std::fmt::Result {
        fmt.debug_struct("Blackboard")
            .field("has_storage", &self.storage.is_some())
            .field("base_memory", &self.base_memory)
            .field("trees", &self.tree_memory.keys().collect::<Vec<_>>())
            .finish()
    }
}
