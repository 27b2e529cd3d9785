mod action;
mod composite;
mod decorator;

pub use self::{
    action::{
        ErrorNode, FailerNode, IsTrueNode, LogNode, RunnerNode, SetBoolNode, SucceederNode,
        WaitNode,
    },
    composite::{MemPriorityNode, ParallelNode, PriorityNode, SequenceNode},
    decorator::{
        ForceFailureNode, ForceSuccessNode, InverterNode, LimiterNode, MaxTimeNode,
        RepeatUntilFailureNode, RepeatUntilSuccessNode, RepeaterNode,
    },
};

use crate::{BehaviorNode, Category, Node, Status, Tick};

pub(crate) const RUNNING_CHILD: &str = "runningChild";
pub(crate) const START_TIME: &str = "startTime";
pub(crate) const LOOP_COUNT: &str = "i";

/// SubTreeNode is a container for a tree included in another one.
///
/// The included tree is copied in as the only child of this node when loading,
/// with node ids prefixed by the id of this node.
pub struct SubTreeNode;

impl BehaviorNode for SubTreeNode {
    fn category(&self) -> Category {
        Category::Decorator
    }

    fn on_enter(&self, node: &Node, tick: &mut Tick) {
        tick.set_last_subtree(node.id());
    }

    fn on_tick(&self, node: &Node, tick: &mut Tick) -> Status {
        tick_child(node, tick)
    }
}

/// Execute the only child of a decorator.
///
/// A decorator without a child is a broken tree, which is reported as an
/// error status rather than a failure.
pub(crate) fn tick_child(node: &Node, tick: &mut Tick) -> Status {
    if let Some(child) = node.child() {
        child.execute(tick)
    } else {
        tracing::warn!(node = node.id(), "Decorator has no child");
        Status::Error
    }
}

/// Index of the child a composite with memory resumes from.
pub(crate) fn running_child(node: &Node, tick: &Tick) -> usize {
    tick.node_get(node, RUNNING_CHILD)
        .and_then(|v| v.to_u64())
        .unwrap_or(0) as usize
}

/// Elapsed milliseconds since `START_TIME` was recorded in the node scope.
pub(crate) fn elapsed_millis(node: &Node, tick: &Tick) -> i64 {
    let start = tick
        .node_get(node, START_TIME)
        .and_then(|v| v.as_i64())
        .unwrap_or_else(|| tick.now_millis());
    tick.now_millis() - start
}

#[cfg(test)]
mod test;
