use super::{running_child, RUNNING_CHILD};
use crate::{error::LoadError, BehaviorNode, Category, Node, NodeConfig, Status, Tick};

/// Ticks children from left to right until one of them does not succeed.
///
/// If a child returns `Running`, the next tick resumes from that child
/// instead of starting over.
pub struct SequenceNode;

impl BehaviorNode for SequenceNode {
    fn category(&self) -> Category {
        Category::Composite
    }

    fn on_open(&self, node: &Node, tick: &mut Tick) {
        tick.node_set(node, RUNNING_CHILD, 0usize);
    }

    fn on_tick(&self, node: &Node, tick: &mut Tick) -> Status {
        let from = running_child(node, tick);
        for (i, child) in node.children().iter().enumerate().skip(from) {
            match child.execute(tick) {
                Status::Success => (),
                Status::Running => {
                    tick.node_set(node, RUNNING_CHILD, i);
                    return Status::Running;
                }
                status => return status,
            }
        }
        Status::Success
    }
}

/// Ticks children from left to right until one of them does not fail.
///
/// Every tick starts over from the first child, so a higher priority child
/// can take over from a running lower priority one.
pub struct PriorityNode;

impl BehaviorNode for PriorityNode {
    fn category(&self) -> Category {
        Category::Composite
    }

    fn on_tick(&self, node: &Node, tick: &mut Tick) -> Status {
        for child in node.children() {
            match child.execute(tick) {
                Status::Failure => (),
                status => return status,
            }
        }
        Status::Failure
    }
}

/// A [`PriorityNode`] that resumes from the running child.
pub struct MemPriorityNode;

impl BehaviorNode for MemPriorityNode {
    fn category(&self) -> Category {
        Category::Composite
    }

    fn on_open(&self, node: &Node, tick: &mut Tick) {
        tick.node_set(node, RUNNING_CHILD, 0usize);
    }

    fn on_tick(&self, node: &Node, tick: &mut Tick) -> Status {
        let from = running_child(node, tick);
        for (i, child) in node.children().iter().enumerate().skip(from) {
            match child.execute(tick) {
                Status::Failure => (),
                Status::Running => {
                    tick.node_set(node, RUNNING_CHILD, i);
                    return Status::Running;
                }
                status => return status,
            }
        }
        Status::Failure
    }
}

const MAX_SUCCESS_COUNT: &str = "MaxSuccessCount";

/// Ticks every child once and succeeds if enough of them succeeded.
///
/// The number of required successes is the `MaxSuccessCount` property,
/// which defaults to all of the children.
/// This node never returns `Running`; children which are still running stay
/// open and are ticked again next time.
#[derive(Default)]
pub struct ParallelNode {
    threshold: Option<usize>,
}

impl ParallelNode {
    pub fn with_threshold(threshold: usize) -> Self {
        Self {
            threshold: Some(threshold),
        }
    }
}

impl BehaviorNode for ParallelNode {
    fn category(&self) -> Category {
        Category::Composite
    }

    fn initialize(&mut self, config: &NodeConfig) -> Result<(), LoadError> {
        if config.property(MAX_SUCCESS_COUNT).is_none() {
            return Ok(());
        }
        match config.try_i64(MAX_SUCCESS_COUNT) {
            Some(n) if n >= 0 => self.threshold = Some(n as usize),
            _ => tracing::warn!(
                node = config.id.as_str(),
                "Malformed {}, requiring all children to succeed",
                MAX_SUCCESS_COUNT
            ),
        }
        Ok(())
    }

    fn on_tick(&self, node: &Node, tick: &mut Tick) -> Status {
        let count = node.children().len();
        let required = match self.threshold {
            Some(n) if n <= count => n,
            _ => count,
        };
        let succeeded = node
            .children()
            .iter()
            .map(|child| child.execute(tick))
            .filter(|status| *status == Status::Success)
            .count();
        if succeeded >= required {
            Status::Success
        } else {
            Status::Failure
        }
    }
}
