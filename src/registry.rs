use super::{
    nodes::{
        ErrorNode, FailerNode, ForceFailureNode, ForceSuccessNode, InverterNode, IsTrueNode,
        LimiterNode, LogNode, MaxTimeNode, MemPriorityNode, ParallelNode, PriorityNode,
        RepeatUntilFailureNode, RepeatUntilSuccessNode, RepeaterNode, RunnerNode, SequenceNode,
        SetBoolNode, SucceederNode, WaitNode,
    },
    BehaviorNode,
};
use std::collections::HashMap;

pub type Constructor = Box<dyn Fn() -> Box<dyn BehaviorNode> + Send + Sync>;

pub fn boxify<T>(cons: impl (Fn() -> T) + Send + Sync + 'static) -> Constructor
where
    T: BehaviorNode + 'static,
{
    Box::new(move || Box::new(cons()))
}

/// Constructors of node types by the name used in tree descriptions.
pub struct Registry {
    node_types: HashMap<String, Constructor>,
}

impl Default for Registry {
    fn default() -> Self {
        let mut ret = Self::empty();
        ret.register("Sequence", boxify(|| SequenceNode));
        ret.register("MemSequence", boxify(|| SequenceNode));
        ret.register("Priority", boxify(|| PriorityNode));
        ret.register("MemPriority", boxify(|| MemPriorityNode));
        ret.register("Parallel", boxify(ParallelNode::default));
        ret.register("Inverter", boxify(|| InverterNode));
        ret.register("ForceSuccess", boxify(|| ForceSuccessNode));
        ret.register("ForceFailure", boxify(|| ForceFailureNode));
        ret.register("Repeater", boxify(RepeaterNode::default));
        ret.register("RepeatUntilFailure", boxify(RepeatUntilFailureNode::default));
        ret.register("RepeatUntilSuccess", boxify(RepeatUntilSuccessNode::default));
        ret.register("Limiter", boxify(LimiterNode::default));
        ret.register("MaxTime", boxify(MaxTimeNode::default));
        ret.register("Succeeder", boxify(|| SucceederNode));
        ret.register("Failer", boxify(|| FailerNode));
        ret.register("Runner", boxify(|| RunnerNode));
        ret.register("Error", boxify(|| ErrorNode));
        ret.register("Wait", boxify(WaitNode::default));
        ret.register("Log", boxify(LogNode::default));
        ret.register("IsTrue", boxify(IsTrueNode::default));
        ret.register("SetBool", boxify(SetBoolNode::default));
        ret
    }
}

impl Registry {
    /// A registry without the built-in nodes.
    pub fn empty() -> Self {
        Self {
            node_types: HashMap::new(),
        }
    }

    pub fn register(&mut self, type_name: impl ToString, constructor: Constructor) {
        let type_name = type_name.to_string();
        if self.node_types.contains_key(&type_name) {
            tracing::warn!(node_type = type_name.as_str(), "Replacing registered node type");
        }
        self.node_types.insert(type_name, constructor);
    }

    pub fn contains(&self, type_name: &str) -> bool {
        self.node_types.contains_key(type_name)
    }

    pub fn build(&self, type_name: &str) -> Option<Box<dyn BehaviorNode>> {
        self.node_types
            .get(type_name)
            .map(|constructor| constructor())
    }
}
