use super::{elapsed_millis, START_TIME};
use crate::{error::LoadError, BehaviorNode, Category, Node, NodeConfig, Status, Tick, Value};

pub struct SucceederNode;

impl BehaviorNode for SucceederNode {
    fn category(&self) -> Category {
        Category::Action
    }

    fn on_tick(&self, _node: &Node, _tick: &mut Tick) -> Status {
        Status::Success
    }
}

pub struct FailerNode;

impl BehaviorNode for FailerNode {
    fn category(&self) -> Category {
        Category::Action
    }

    fn on_tick(&self, _node: &Node, _tick: &mut Tick) -> Status {
        Status::Failure
    }
}

pub struct RunnerNode;

impl BehaviorNode for RunnerNode {
    fn category(&self) -> Category {
        Category::Action
    }

    fn on_tick(&self, _node: &Node, _tick: &mut Tick) -> Status {
        Status::Running
    }
}

pub struct ErrorNode;

impl BehaviorNode for ErrorNode {
    fn category(&self) -> Category {
        Category::Action
    }

    fn on_tick(&self, _node: &Node, _tick: &mut Tick) -> Status {
        Status::Error
    }
}

const MILLISECONDS: &str = "milliseconds";

/// Keeps running until `milliseconds` have passed since it was opened.
#[derive(Default)]
pub struct WaitNode {
    milliseconds: i64,
}

impl WaitNode {
    pub fn new(milliseconds: i64) -> Self {
        Self { milliseconds }
    }
}

impl BehaviorNode for WaitNode {
    fn category(&self) -> Category {
        Category::Action
    }

    fn initialize(&mut self, config: &NodeConfig) -> Result<(), LoadError> {
        self.milliseconds = config.require_i64(MILLISECONDS)?;
        Ok(())
    }

    fn on_open(&self, node: &Node, tick: &mut Tick) {
        let now = tick.now_millis();
        tick.node_set(node, START_TIME, now);
    }

    fn on_tick(&self, node: &Node, tick: &mut Tick) -> Status {
        if self.milliseconds <= elapsed_millis(node, tick) {
            Status::Success
        } else {
            Status::Running
        }
    }
}

/// Logs the `info` property and succeeds.
#[derive(Default)]
pub struct LogNode {
    info: String,
}

impl LogNode {
    pub fn new(info: impl Into<String>) -> Self {
        Self { info: info.into() }
    }
}

impl BehaviorNode for LogNode {
    fn category(&self) -> Category {
        Category::Action
    }

    fn initialize(&mut self, config: &NodeConfig) -> Result<(), LoadError> {
        self.info = config.get_str("info").to_owned();
        Ok(())
    }

    fn on_tick(&self, node: &Node, tick: &mut Tick) -> Status {
        tracing::info!(
            tree = tick.tree_id(),
            node = node.id(),
            subtree = tick.last_subtree(),
            "{}",
            self.info
        );
        Status::Success
    }
}

const KEY: &str = "key";
const VALUE: &str = "value";

/// Succeeds if the blackboard variable `key` is `true`.
///
/// The variable is looked up in the tree scope first, then in the global scope.
/// A variable of another type is an error.
#[derive(Default)]
pub struct IsTrueNode {
    key: String,
}

impl IsTrueNode {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }
}

impl BehaviorNode for IsTrueNode {
    fn category(&self) -> Category {
        Category::Condition
    }

    fn initialize(&mut self, config: &NodeConfig) -> Result<(), LoadError> {
        self.key = config.require_str(KEY)?.to_owned();
        Ok(())
    }

    fn on_tick(&self, node: &Node, tick: &mut Tick) -> Status {
        let value = tick
            .blackboard
            .get(&self.key, tick.tree_id(), "")
            .or_else(|| tick.blackboard.get_mem(&self.key));
        match value {
            Some(Value::Bool(true)) => Status::Success,
            None | Some(Value::Bool(false)) => Status::Failure,
            Some(value) => {
                tracing::warn!(
                    node = node.id(),
                    key = self.key.as_str(),
                    found = value.kind(),
                    "IsTrue on a non-boolean variable"
                );
                Status::Error
            }
        }
    }
}

/// Sets the tree scoped blackboard variable `key` to `value`.
#[derive(Default)]
pub struct SetBoolNode {
    key: String,
    value: bool,
}

impl SetBoolNode {
    pub fn new(key: impl Into<String>, value: bool) -> Self {
        Self {
            key: key.into(),
            value,
        }
    }
}

impl BehaviorNode for SetBoolNode {
    fn category(&self) -> Category {
        Category::Action
    }

    fn initialize(&mut self, config: &NodeConfig) -> Result<(), LoadError> {
        self.key = config.require_str(KEY)?.to_owned();
        self.value = config.get_bool(VALUE);
        Ok(())
    }

    fn on_tick(&self, _node: &Node, tick: &mut Tick) -> Status {
        let tree = tick.tree_id();
        tick.blackboard.set_tree(&self.key, self.value.into(), tree);
        Status::Success
    }
}
