use super::{elapsed_millis, tick_child, LOOP_COUNT, START_TIME};
use crate::{error::LoadError, BehaviorNode, Category, Node, NodeConfig, Status, Tick};

const MAX_LOOP: &str = "maxLoop";
const MAX_TIME: &str = "maxTime";

pub struct InverterNode;

impl BehaviorNode for InverterNode {
    fn category(&self) -> Category {
        Category::Decorator
    }

    fn on_tick(&self, node: &Node, tick: &mut Tick) -> Status {
        match tick_child(node, tick) {
            Status::Success => Status::Failure,
            Status::Failure => Status::Success,
            status => status,
        }
    }
}

/// Succeeds whatever the child returns, once the child is done running.
pub struct ForceSuccessNode;

impl BehaviorNode for ForceSuccessNode {
    fn category(&self) -> Category {
        Category::Decorator
    }

    fn on_tick(&self, node: &Node, tick: &mut Tick) -> Status {
        match tick_child(node, tick) {
            Status::Running => Status::Running,
            Status::Error if node.child().is_none() => Status::Error,
            _ => Status::Success,
        }
    }
}

/// Fails whatever the child returns, once the child is done running.
pub struct ForceFailureNode;

impl BehaviorNode for ForceFailureNode {
    fn category(&self) -> Category {
        Category::Decorator
    }

    fn on_tick(&self, node: &Node, tick: &mut Tick) -> Status {
        match tick_child(node, tick) {
            Status::Running => Status::Running,
            Status::Error if node.child().is_none() => Status::Error,
            _ => Status::Failure,
        }
    }
}

/// Counts a finished run of the child in the node scope, and reports whether
/// `max_loop` runs were reached. A negative `max_loop` never does.
fn count_loop(node: &Node, tick: &mut Tick, max_loop: i64) -> bool {
    let count = tick
        .node_get(node, LOOP_COUNT)
        .and_then(|v| v.as_i64())
        .unwrap_or(0)
        + 1;
    tick.node_set(node, LOOP_COUNT, count);
    0 <= max_loop && max_loop <= count
}

/// Runs the child `maxLoop` times, one run per tick, and then returns the
/// status of the last run.
pub struct RepeaterNode {
    max_loop: i64,
}

impl RepeaterNode {
    /// A negative `max_loop` repeats forever.
    pub fn new(max_loop: i64) -> Self {
        Self { max_loop }
    }
}

impl Default for RepeaterNode {
    fn default() -> Self {
        Self::new(-1)
    }
}

impl BehaviorNode for RepeaterNode {
    fn category(&self) -> Category {
        Category::Decorator
    }

    fn initialize(&mut self, config: &NodeConfig) -> Result<(), LoadError> {
        self.max_loop = config.try_i64(MAX_LOOP).unwrap_or(-1);
        Ok(())
    }

    fn on_open(&self, node: &Node, tick: &mut Tick) {
        tick.node_set(node, LOOP_COUNT, 0);
    }

    fn on_tick(&self, node: &Node, tick: &mut Tick) -> Status {
        if self.max_loop == 0 {
            return Status::Success;
        }
        match tick_child(node, tick) {
            status @ (Status::Success | Status::Failure) => {
                if count_loop(node, tick, self.max_loop) {
                    status
                } else {
                    Status::Running
                }
            }
            status => status,
        }
    }
}

/// Runs the child until it fails, at most `maxLoop` times.
///
/// Returns `Failure` when the child fails, and `Success` if the child kept
/// succeeding until the limit.
pub struct RepeatUntilFailureNode {
    max_loop: i64,
}

impl RepeatUntilFailureNode {
    pub fn new(max_loop: i64) -> Self {
        Self { max_loop }
    }
}

impl Default for RepeatUntilFailureNode {
    fn default() -> Self {
        Self::new(-1)
    }
}

impl BehaviorNode for RepeatUntilFailureNode {
    fn category(&self) -> Category {
        Category::Decorator
    }

    fn initialize(&mut self, config: &NodeConfig) -> Result<(), LoadError> {
        self.max_loop = config.try_i64(MAX_LOOP).unwrap_or(-1);
        Ok(())
    }

    fn on_open(&self, node: &Node, tick: &mut Tick) {
        tick.node_set(node, LOOP_COUNT, 0);
    }

    fn on_tick(&self, node: &Node, tick: &mut Tick) -> Status {
        match tick_child(node, tick) {
            Status::Success => {
                if count_loop(node, tick, self.max_loop) {
                    Status::Success
                } else {
                    Status::Running
                }
            }
            status => status,
        }
    }
}

/// Runs the child until it succeeds, at most `maxLoop` times.
///
/// Returns `Success` when the child succeeds, and `Failure` if the child kept
/// failing until the limit.
pub struct RepeatUntilSuccessNode {
    max_loop: i64,
}

impl RepeatUntilSuccessNode {
    pub fn new(max_loop: i64) -> Self {
        Self { max_loop }
    }
}

impl Default for RepeatUntilSuccessNode {
    fn default() -> Self {
        Self::new(-1)
    }
}

impl BehaviorNode for RepeatUntilSuccessNode {
    fn category(&self) -> Category {
        Category::Decorator
    }

    fn initialize(&mut self, config: &NodeConfig) -> Result<(), LoadError> {
        self.max_loop = config.try_i64(MAX_LOOP).unwrap_or(-1);
        Ok(())
    }

    fn on_open(&self, node: &Node, tick: &mut Tick) {
        tick.node_set(node, LOOP_COUNT, 0);
    }

    fn on_tick(&self, node: &Node, tick: &mut Tick) -> Status {
        match tick_child(node, tick) {
            Status::Failure => {
                if count_loop(node, tick, self.max_loop) {
                    Status::Failure
                } else {
                    Status::Running
                }
            }
            status => status,
        }
    }
}

/// Lets the child finish at most `maxLoop` times for the lifetime of the
/// blackboard, and fails afterwards without ticking it.
///
/// Unlike the repeaters, the count is not reset when the node is opened again.
pub struct LimiterNode {
    max_loop: i64,
}

impl LimiterNode {
    pub fn new(max_loop: i64) -> Self {
        Self { max_loop }
    }
}

impl Default for LimiterNode {
    fn default() -> Self {
        Self::new(1)
    }
}

impl BehaviorNode for LimiterNode {
    fn category(&self) -> Category {
        Category::Decorator
    }

    fn initialize(&mut self, config: &NodeConfig) -> Result<(), LoadError> {
        self.max_loop = config.require_i64(MAX_LOOP)?;
        Ok(())
    }

    fn on_tick(&self, node: &Node, tick: &mut Tick) -> Status {
        let count = tick
            .node_get(node, LOOP_COUNT)
            .and_then(|v| v.as_i64())
            .unwrap_or(0);
        if count >= self.max_loop {
            return Status::Failure;
        }
        let status = tick_child(node, tick);
        if matches!(status, Status::Success | Status::Failure) {
            tick.node_set(node, LOOP_COUNT, count + 1);
        }
        status
    }
}

/// Fails if the child keeps running for longer than `maxTime` milliseconds.
///
/// The child and everything open below it are closed when the time runs out.
pub struct MaxTimeNode {
    max_time: i64,
}

impl MaxTimeNode {
    pub fn new(max_time: i64) -> Self {
        Self { max_time }
    }
}

impl Default for MaxTimeNode {
    fn default() -> Self {
        Self::new(0)
    }
}

impl BehaviorNode for MaxTimeNode {
    fn category(&self) -> Category {
        Category::Decorator
    }

    fn initialize(&mut self, config: &NodeConfig) -> Result<(), LoadError> {
        self.max_time = config.require_i64(MAX_TIME)?;
        Ok(())
    }

    fn on_open(&self, node: &Node, tick: &mut Tick) {
        let now = tick.now_millis();
        tick.node_set(node, START_TIME, now);
    }

    fn on_tick(&self, node: &Node, tick: &mut Tick) -> Status {
        let status = tick_child(node, tick);
        if status.is_running() && self.max_time < elapsed_millis(node, tick) {
            if let Some(child) = node.child() {
                child.close_branch(tick);
            }
            return Status::Failure;
        }
        status
    }
}
