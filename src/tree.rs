use crate::{tick::IS_OPEN, Blackboard, Clock, Node, OpenNode, Status, SystemClock, Tick, Value};
use std::collections::HashMap;

/// A tree of nodes with an identity.
///
/// The id is the tree scope of every blackboard this tree is ticked with,
/// so one `BehaviorTree` can be ticked against many blackboards without
/// them interfering with each other.
pub struct BehaviorTree {
    id: String,
    title: String,
    description: String,
    properties: HashMap<String, Value>,
    root: Node,
}

impl BehaviorTree {
    pub fn new(id: impl Into<String>, root: Node) -> Self {
        Self {
            id: id.into(),
            title: String::new(),
            description: String::new(),
            properties: HashMap::new(),
            root,
        }
    }

    pub(crate) fn with_meta(
        mut self,
        title: String,
        description: String,
        properties: HashMap<String, Value>,
    ) -> Self {
        self.title = title;
        self.description = description;
        self.properties = properties;
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn properties(&self) -> &HashMap<String, Value> {
        &self.properties
    }

    pub fn root(&self) -> &Node {
        &self.root
    }

    /// Evaluate the tree once with the wall clock.
    pub fn tick(&self, frame_id: i64, blackboard: &mut Blackboard) -> Status {
        self.tick_with_clock(frame_id, blackboard, &SystemClock)
    }

    /// Evaluate the tree once.
    ///
    /// After the root returns, nodes that were open after the previous tick
    /// but were not visited again in this one are closed, the most recently
    /// opened first.
    pub fn tick_with_clock(
        &self,
        frame_id: i64,
        blackboard: &mut Blackboard,
        clock: &dyn Clock,
    ) -> Status {
        let last_open = match blackboard.tree_data(&self.id) {
            Some(data) if data.traversal_cycle > 0 => data.open_nodes.clone(),
            // Never ticked with this blackboard, but the open flags may have
            // been restored from storage
            _ => {
                let mut open = vec![];
                collect_open(&self.root, &self.id, blackboard, 1, &mut open);
                open
            }
        };

        let mut tick = Tick::new(blackboard, &self.id, frame_id, clock);
        let status = self.root.execute(&mut tick);

        let abandoned: Vec<OpenNode> = last_open
            .into_iter()
            .rev()
            .filter(|open| !tick.is_listed_open(&open.id))
            .collect();
        for abandoned in abandoned {
            if let Some(node) = self.root.find(&abandoned.id) {
                tracing::debug!(
                    tree = self.id.as_str(),
                    node = node.id(),
                    depth = abandoned.depth,
                    "Closing abandoned node"
                );
                node.close(&mut tick);
            }
        }

        let (open_nodes, max_depth) = tick.finish();
        let data = blackboard.tree_data_mut(&self.id);
        data.open_nodes = open_nodes;
        data.traversal_depth = max_depth;
        data.traversal_cycle += 1;

        tracing::trace!(
            tree = self.id.as_str(),
            frame_id,
            ?status,
            cycle = data.traversal_cycle,
            "tick"
        );
        status
    }
}

/// Nodes whose open flag is set, in the order a traversal enters them.
fn collect_open(
    node: &Node,
    tree_id: &str,
    blackboard: &Blackboard,
    depth: usize,
    open: &mut Vec<OpenNode>,
) {
    if let Some(Value::Bool(true)) = blackboard.get(IS_OPEN, tree_id, node.id()) {
        open.push(OpenNode {
            id: node.id().to_owned(),
            depth,
        });
    }
    for child in node.children() {
        collect_open(child, tree_id, blackboard, depth + 1, open);
    }
}

impl std::fmt::Debug for BehaviorTree {
    fn fmt(&self, fmt: &mut std::fmt::Formatter) -> std::fmt::Result {
        fmt.debug_struct("BehaviorTree")
            .field("id", &self.id)
            .field("title", &self.title)
            .field("root", &self.root)
            .finish()
    }
}
