use ::behavior3_lite::{
    BehaviorNode, BehaviorTree, Blackboard, Category, ManualClock, Node,
    PriorityNode, SequenceNode, SetBoolNode, Status, Tick, WaitNode,
};
use tracing_subscriber::{fmt, EnvFilter};

/// Walks one step per tick toward the `target` position in the tree scope.
struct WalkNode;

impl BehaviorNode for WalkNode {
    fn category(&self) -> Category {
        Category::Action
    }

    fn on_tick(&self, _node: &Node, tick: &mut Tick) -> Status {
        let tree = tick.tree_id();
        let (Ok(position), Ok(target)) = (
            tick.blackboard.get_i64("position", tree, ""),
            tick.blackboard.get_i64("target", tree, ""),
        ) else {
            return Status::Error;
        };
        if position == target {
            return Status::Success;
        }
        let position = position + (target - position).signum();
        println!("Walking to {}", position);
        tick.blackboard.set_tree("position", position.into(), tree);
        Status::Running
    }
}

/// Succeeds if the tree scope variable `arrived` was set.
struct ArrivedNode;

impl BehaviorNode for ArrivedNode {
    fn category(&self) -> Category {
        Category::Condition
    }

    fn on_tick(&self, _node: &Node, tick: &mut Tick) -> Status {
        match tick.blackboard.get_bool("arrived", tick.tree_id(), "") {
            Ok(true) => Status::Success,
            Ok(false) => Status::Failure,
            Err(e) => {
                tracing::warn!("{}", e);
                Status::Error
            }
        }
    }
}

fn main() -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(env_filter).init();

    let mut walk = Node::new("walk", SequenceNode);
    walk.add_child(Node::new("step", WalkNode))?;
    walk.add_child(Node::new("rest", WaitNode::new(200)))?;
    walk.add_child(Node::new("arrive", SetBoolNode::new("arrived", true)))?;

    let mut root = Node::new("root", PriorityNode);
    root.add_child(Node::new("idle", ArrivedNode))?;
    root.add_child(walk)?;
    let tree = BehaviorTree::new("walker", root);
    println!("{:#?}", tree);

    let clock = ManualClock::new(0);
    let mut bb = Blackboard::new();
    bb.set_tree("position", 0i64.into(), "walker");
    bb.set_tree("target", 3i64.into(), "walker");

    for frame in 0..10 {
        let status = tree.tick_with_clock(frame, &mut bb, &clock);
        println!("frame {}: {:?}", frame, status);
        clock.advance(100);
    }

    Ok(())
}
