//! # behavior3-lite (Rust crate)
//!
//! A behavior tree runtime in the tradition of [behavior3](https://github.com/behavior3/behavior3js),
//! with a scoped blackboard that keeps every bit of runtime state out of the nodes.
//!
//!
//! ## Overview
//!
//! A behavior tree is evaluated once per frame by [`BehaviorTree::tick`], which returns a
//! [`Status`]: `Success`, `Failure`, `Running` or `Error`.
//! `Running` is just a return value, telling the caller to tick again on a later frame.
//!
//! The tree itself is immutable while ticking.
//! All the state a node needs across frames lives in a [`Blackboard`], keyed by
//! the tree id and the node id.
//! This means a single tree can drive any number of entities, each with its own blackboard.
//!
//!
//! ## How it looks like
//!
//! First, you define your own leaf node.
//! A node implements [`BehaviorNode`], of which only `category` and `on_tick` are required.
//!
//! ```rust
//! use ::behavior3_lite::{BehaviorNode, Category, Node, Status, Tick};
//!
//! struct CountDown;
//!
//! impl BehaviorNode for CountDown {
//!     fn category(&self) -> Category {
//!         Category::Action
//!     }
//!
//!     fn on_open(&self, node: &Node, tick: &mut Tick) {
//!         tick.node_set(node, "left", 3);
//!     }
//!
//!     fn on_tick(&self, node: &Node, tick: &mut Tick) -> Status {
//!         let left = tick.node_get(node, "left").and_then(|v| v.as_i64()).unwrap_or(0);
//!         if left <= 0 {
//!             return Status::Success;
//!         }
//!         tick.node_set(node, "left", left - 1);
//!         Status::Running
//!     }
//! }
//! ```
//!
//! Then, you build a tree and tick it with a blackboard.
//!
//! ```rust
//! # use ::behavior3_lite::*;
//! # struct CountDown;
//! # impl BehaviorNode for CountDown {
//! #     fn category(&self) -> Category { Category::Action }
//! #     fn on_tick(&self, _: &Node, _: &mut Tick) -> Status { Status::Success }
//! # }
//! let mut root = Node::new("root", SequenceNode);
//! root.add_child(Node::new("count", CountDown)).unwrap();
//! root.add_child(Node::new("done", SucceederNode)).unwrap();
//! let tree = BehaviorTree::new("tree", root);
//!
//! let mut blackboard = Blackboard::new();
//! let mut frame = 0;
//! while tree.tick(frame, &mut blackboard) == Status::Running {
//!     frame += 1;
//! }
//! ```
//!
//!
//! ## Node lifecycle
//!
//! [`Node::execute`] drives every node through the same hooks:
//!
//! 1. `on_enter` on every visit.
//! 2. `on_open` if the node is not open yet for this tree.
//! 3. `on_tick`, returning the status.
//! 4. `on_close` if the status is anything but `Running`.
//! 5. `on_exit` on every visit.
//!
//! If a composite stops ticking a child that was `Running` (for example, a higher
//! priority branch of a [`PriorityNode`] took over), the tree closes that child
//! at the end of the tick, so `on_close` always pairs with `on_open`.
//!
//!
//! ## Loading trees from a file
//!
//! Trees can be written in the behavior3 editor's JSON format (or the same
//! structure in YAML) and instantiated with a [`Registry`] of node constructors.
//!
//! ```rust
//! # use ::behavior3_lite::*;
//! # (|| -> Result<(), error::LoadError> {
//! let source = r#"{
//!     "id": "patrol",
//!     "root": "1",
//!     "nodes": {
//!         "1": { "id": "1", "name": "Sequence", "children": ["2", "3"] },
//!         "2": { "id": "2", "name": "Wait", "properties": { "milliseconds": 100 } },
//!         "3": { "id": "3", "name": "Log", "properties": { "info": "arrived" } }
//!     }
//! }"#;
//! let registry = Registry::default();
//! let tree = load_tree(&TreeConfig::from_json(source)?, &registry)?;
//! # Ok(())
//! # })().unwrap();
//! ```
//!
//! Custom nodes are registered by name.
//!
//! ```rust
//! # use ::behavior3_lite::*;
//! # struct CountDown;
//! # impl BehaviorNode for CountDown {
//! #     fn category(&self) -> Category { Category::Action }
//! #     fn on_tick(&self, _: &Node, _: &mut Tick) -> Status { Status::Success }
//! # }
//! let mut registry = Registry::default();
//! registry.register("CountDown", boxify(|| CountDown));
//! ```
//!
//! Built-in nodes are registered by default, e.g. `Sequence`, `Priority`, `Parallel`,
//! `Inverter`, `Wait` and `Log`.
//!
//!
//! ## Concurrency
//!
//! Ticking is synchronous and single threaded per call.
//! [`BehaviorTree`] is `Send + Sync`, so a tree behind an `Arc` can be ticked from
//! several threads as long as each thread uses its own [`Blackboard`].
//! The blackboard itself has no internal locking.

mod blackboard;
pub mod error;
mod node;
mod nodes;
pub mod parser;
mod registry;
mod tick;
mod tree;
mod value;

pub use crate::blackboard::{Blackboard, Memory, OpenNode, Storage, TreeData};
pub use crate::node::Node;
pub use crate::nodes::{
    ErrorNode, FailerNode, ForceFailureNode, ForceSuccessNode, InverterNode, IsTrueNode,
    LimiterNode, LogNode, MaxTimeNode, MemPriorityNode, ParallelNode, PriorityNode,
    RepeatUntilFailureNode, RepeatUntilSuccessNode, RepeaterNode, RunnerNode, SequenceNode,
    SetBoolNode, SubTreeNode, SucceederNode, WaitNode,
};
pub use crate::{
    parser::{load_project, load_tree, NodeConfig, ProjectConfig, TreeConfig},
    registry::{boxify, Constructor, Registry},
    tick::{Clock, ManualClock, SystemClock, Tick},
    tree::BehaviorTree,
    value::Value,
};

#[derive(PartialEq, Eq, Debug, Clone, Copy, Hash)]
pub enum Status {
    Success,
    Failure,
    /// The node should keep running in the next tick
    Running,
    /// Something went wrong, but the tree keeps going. It is up to the
    /// parents how to react to it.
    Error,
}

impl Status {
    pub fn is_running(self) -> bool {
        matches!(self, Self::Running)
    }
}

#[derive(PartialEq, Eq, Debug, Clone, Copy, Hash)]
pub enum Category {
    Composite,
    Decorator,
    Action,
    Condition,
}

#[derive(PartialEq, Eq, Debug, Clone, Copy)]
pub enum NumChildren {
    Finite(usize),
    Infinite,
}

impl PartialOrd for NumChildren {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(match (self, other) {
            (NumChildren::Finite(_), NumChildren::Infinite) => std::cmp::Ordering::Less,
            (NumChildren::Infinite, NumChildren::Finite(_)) => std::cmp::Ordering::Greater,
            (NumChildren::Finite(lhs), NumChildren::Finite(rhs)) => lhs.cmp(rhs),
            (NumChildren::Infinite, NumChildren::Infinite) => return None,
        })
    }
}

/// The behavior of a node.
///
/// The hooks take `&self`: a behavior must not keep runtime state in its
/// fields, since the same node may be ticked for many blackboards.
/// Store it in the blackboard instead, see [`Tick::node_set`].
/// Fields are for configuration read once in [`BehaviorNode::initialize`].
pub trait BehaviorNode: Send + Sync {
    fn category(&self) -> Category;

    fn max_children(&self) -> NumChildren {
        match self.category() {
            Category::Composite => NumChildren::Infinite,
            Category::Decorator => NumChildren::Finite(1),
            Category::Action | Category::Condition => NumChildren::Finite(0),
        }
    }

    /// Read the properties of the node config. Called once while loading.
    fn initialize(&mut self, _config: &NodeConfig) -> Result<(), error::LoadError> {
        Ok(())
    }

    fn on_enter(&self, _node: &Node, _tick: &mut Tick) {}

    fn on_open(&self, _node: &Node, _tick: &mut Tick) {}

    fn on_tick(&self, node: &Node, tick: &mut Tick) -> Status;

    fn on_close(&self, _node: &Node, _tick: &mut Tick) {}

    fn on_exit(&self, _node: &Node, _tick: &mut Tick) {}
}
