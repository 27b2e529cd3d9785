use crate::{blackboard::OpenNode, Blackboard, Node, Value};
use std::sync::atomic::{AtomicI64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

/// Source of time for time based nodes, in milliseconds.
pub trait Clock {
    fn now_millis(&self) -> i64;
}

/// Wall clock time since the Unix epoch.
#[derive(Default, Debug, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as i64)
            .unwrap_or(0)
    }
}

/// A clock that only moves when told to. Useful for simulations and tests.
#[derive(Default, Debug)]
pub struct ManualClock(AtomicI64);

impl ManualClock {
    pub fn new(millis: i64) -> Self {
        Self(AtomicI64::new(millis))
    }

    pub fn set(&self, millis: i64) {
        self.0.store(millis, Ordering::SeqCst);
    }

    pub fn advance(&self, millis: i64) {
        self.0.fetch_add(millis, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_millis(&self) -> i64 {
        self.0.load(Ordering::SeqCst)
    }
}

/// The context of a single traversal of a tree.
///
/// A `Tick` is created by [`crate::BehaviorTree::tick`] and passed down to
/// every node it executes. Nodes keep state across ticks through
/// [`Tick::blackboard`], usually in their own node scope with
/// [`Tick::node_get`] and [`Tick::node_set`].
pub struct Tick<'a> {
    pub blackboard: &'a mut Blackboard,
    tree_id: &'a str,
    frame_id: i64,
    clock: &'a dyn Clock,
    depth: usize,
    max_depth: usize,
    node_count: usize,
    open_nodes: Vec<OpenNode>,
    last_subtree: Option<String>,
}

impl<'a> Tick<'a> {
    pub fn new(
        blackboard: &'a mut Blackboard,
        tree_id: &'a str,
        frame_id: i64,
        clock: &'a dyn Clock,
    ) -> Self {
        Self {
            blackboard,
            tree_id,
            frame_id,
            clock,
            depth: 0,
            max_depth: 0,
            node_count: 0,
            open_nodes: vec![],
            last_subtree: None,
        }
    }

    pub fn tree_id(&self) -> &'a str {
        self.tree_id
    }

    pub fn frame_id(&self) -> i64 {
        self.frame_id
    }

    pub fn now_millis(&self) -> i64 {
        self.clock.now_millis()
    }

    /// Current nesting level; the root is executed at depth 1.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Number of node visits so far in this traversal.
    pub fn node_count(&self) -> usize {
        self.node_count
    }

    /// Id of the subtree most recently entered in this traversal.
    pub fn last_subtree(&self) -> Option<&str> {
        self.last_subtree.as_deref()
    }

    pub(crate) fn set_last_subtree(&mut self, id: &str) {
        self.last_subtree = Some(id.to_owned());
    }

    pub fn node_get(&self, node: &Node, key: &str) -> Option<&Value> {
        self.blackboard.get(key, self.tree_id, node.id())
    }

    pub fn node_set(&mut self, node: &Node, key: &str, value: impl Into<Value>) {
        self.blackboard
            .set(key, value.into(), self.tree_id, node.id())
    }

    pub(crate) fn is_open(&self, node: &Node) -> bool {
        matches!(self.node_get(node, IS_OPEN), Some(Value::Bool(true)))
    }

    pub(crate) fn enter_node(&mut self, node: &Node) {
        self.depth += 1;
        self.max_depth = self.max_depth.max(self.depth);
        self.node_count += 1;
        if !self.is_listed_open(node.id()) {
            self.open_nodes.push(OpenNode {
                id: node.id().to_owned(),
                depth: self.depth,
            });
        }
    }

    pub(crate) fn open_node(&mut self, node: &Node) {
        tracing::trace!(tree = self.tree_id, node = node.id(), "open");
        self.node_set(node, IS_OPEN, true);
    }

    pub(crate) fn close_node(&mut self, node: &Node) {
        tracing::trace!(tree = self.tree_id, node = node.id(), "close");
        self.node_set(node, IS_OPEN, false);
        self.open_nodes.retain(|open| open.id != node.id());
    }

    pub(crate) fn exit_node(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    pub(crate) fn is_listed_open(&self, node_id: &str) -> bool {
        self.open_nodes.iter().any(|open| open.id == node_id)
    }

    /// Consumes the tick, returning the nodes left open and the deepest
    /// level reached.
    pub(crate) fn finish(self) -> (Vec<OpenNode>, usize) {
        (self.open_nodes, self.max_depth)
    }
}

pub(crate) const IS_OPEN: &str = "isOpen";
