use super::*;
use crate::{BehaviorTree, Blackboard, ManualClock, NodeConfig, Value};
use std::sync::{Arc, Mutex};

type Log = Arc<Mutex<Vec<String>>>;
type Handle = Arc<Mutex<Status>>;

/// A leaf which logs its hooks and returns whatever its handle is set to.
struct Scripted {
    name: &'static str,
    status: Handle,
    log: Log,
}

impl Scripted {
    fn push(&self, event: &str) {
        self.log
            .lock()
            .unwrap()
            .push(format!("{}:{}", event, self.name));
    }
}

impl BehaviorNode for Scripted {
    fn category(&self) -> Category {
        Category::Action
    }

    fn on_open(&self, _node: &Node, _tick: &mut Tick) {
        self.push("open");
    }

    fn on_tick(&self, _node: &Node, _tick: &mut Tick) -> Status {
        self.push("tick");
        *self.status.lock().unwrap()
    }

    fn on_close(&self, _node: &Node, _tick: &mut Tick) {
        self.push("close");
    }
}

fn scripted(log: &Log, name: &'static str, status: Status) -> (Node, Handle) {
    let handle = Arc::new(Mutex::new(status));
    let node = Node::new(
        name,
        Scripted {
            name,
            status: handle.clone(),
            log: log.clone(),
        },
    );
    (node, handle)
}

fn events(log: &Log, kind: &str) -> Vec<String> {
    let prefix = format!("{}:", kind);
    log.lock()
        .unwrap()
        .iter()
        .filter(|event| event.starts_with(&prefix))
        .cloned()
        .collect()
}

fn composite(
    mut root: Node,
    statuses: &[(&'static str, Status)],
    log: &Log,
) -> (BehaviorTree, Vec<Handle>) {
    let mut handles = vec![];
    for (name, status) in statuses {
        let (node, handle) = scripted(log, name, *status);
        root.add_child(node).unwrap();
        handles.push(handle);
    }
    (BehaviorTree::new("tree", root), handles)
}

fn decorated(decorator: Node, status: Status, log: &Log) -> (BehaviorTree, Handle) {
    let (tree, mut handles) = composite(decorator, &[("a", status)], log);
    (tree, handles.remove(0))
}

#[test]
fn test_sequence() {
    let log = Log::default();
    let (tree, _) = composite(
        Node::new("root", SequenceNode),
        &[
            ("a", Status::Success),
            ("b", Status::Success),
            ("c", Status::Failure),
            ("d", Status::Success),
        ],
        &log,
    );

    assert_eq!(tree.tick(0, &mut Blackboard::new()), Status::Failure);
    assert_eq!(events(&log, "open"), vec!["open:a", "open:b", "open:c"]);
    assert_eq!(events(&log, "tick"), vec!["tick:a", "tick:b", "tick:c"]);
}

#[test]
fn test_sequence_success() {
    let log = Log::default();
    let (tree, _) = composite(
        Node::new("root", SequenceNode),
        &[("a", Status::Success), ("b", Status::Success)],
        &log,
    );
    assert_eq!(tree.tick(0, &mut Blackboard::new()), Status::Success);
}

#[test]
fn test_sequence_resumes_running_child() {
    let log = Log::default();
    let (tree, handles) = composite(
        Node::new("root", SequenceNode),
        &[("a", Status::Success), ("b", Status::Running)],
        &log,
    );
    let mut bb = Blackboard::new();

    assert_eq!(tree.tick(0, &mut bb), Status::Running);
    assert_eq!(tree.tick(1, &mut bb), Status::Running);

    // Ticking again does not restart from the first child
    assert_eq!(events(&log, "tick"), vec!["tick:a", "tick:b", "tick:b"]);
    assert_eq!(events(&log, "open"), vec!["open:a", "open:b"]);

    *handles[1].lock().unwrap() = Status::Success;
    assert_eq!(tree.tick(2, &mut bb), Status::Success);
    assert_eq!(tree.tick(3, &mut bb), Status::Success);
    assert_eq!(
        events(&log, "tick"),
        vec!["tick:a", "tick:b", "tick:b", "tick:b", "tick:a", "tick:b"]
    );
}

#[test]
fn test_sequence_error() {
    let log = Log::default();
    let (tree, _) = composite(
        Node::new("root", SequenceNode),
        &[("a", Status::Success), ("b", Status::Error), ("c", Status::Success)],
        &log,
    );
    assert_eq!(tree.tick(0, &mut Blackboard::new()), Status::Error);
    assert_eq!(events(&log, "tick"), vec!["tick:a", "tick:b"]);
}

#[test]
fn test_priority() {
    let log = Log::default();
    let (tree, _) = composite(
        Node::new("root", PriorityNode),
        &[
            ("a", Status::Failure),
            ("b", Status::Success),
            ("c", Status::Success),
        ],
        &log,
    );
    assert_eq!(tree.tick(0, &mut Blackboard::new()), Status::Success);
    assert_eq!(events(&log, "tick"), vec!["tick:a", "tick:b"]);
}

#[test]
fn test_priority_fail() {
    let log = Log::default();
    let (tree, _) = composite(
        Node::new("root", PriorityNode),
        &[("a", Status::Failure), ("b", Status::Failure)],
        &log,
    );
    assert_eq!(tree.tick(0, &mut Blackboard::new()), Status::Failure);

    let (tree, _) = composite(
        Node::new("root", PriorityNode),
        &[("a", Status::Error), ("b", Status::Success)],
        &log,
    );
    assert_eq!(tree.tick(0, &mut Blackboard::new()), Status::Error);
}

#[test]
fn test_priority_restarts() {
    let log = Log::default();
    let (tree, _) = composite(
        Node::new("root", PriorityNode),
        &[("a", Status::Failure), ("b", Status::Running)],
        &log,
    );
    let mut bb = Blackboard::new();
    assert_eq!(tree.tick(0, &mut bb), Status::Running);
    assert_eq!(tree.tick(1, &mut bb), Status::Running);
    assert_eq!(
        events(&log, "tick"),
        vec!["tick:a", "tick:b", "tick:a", "tick:b"]
    );
}

#[test]
fn test_mem_priority_resumes() {
    let log = Log::default();
    let (tree, _) = composite(
        Node::new("root", MemPriorityNode),
        &[("a", Status::Failure), ("b", Status::Running)],
        &log,
    );
    let mut bb = Blackboard::new();
    assert_eq!(tree.tick(0, &mut bb), Status::Running);
    assert_eq!(tree.tick(1, &mut bb), Status::Running);
    assert_eq!(events(&log, "tick"), vec!["tick:a", "tick:b", "tick:b"]);
}

const MIXED: [(&str, Status); 3] = [
    ("a", Status::Success),
    ("b", Status::Failure),
    ("c", Status::Success),
];

#[test]
fn test_parallel() {
    let log = Log::default();
    let (tree, _) = composite(Node::new("root", ParallelNode::default()), &MIXED, &log);
    assert_eq!(tree.tick(0, &mut Blackboard::new()), Status::Failure);
    // No short circuit
    assert_eq!(events(&log, "tick"), vec!["tick:a", "tick:b", "tick:c"]);

    let (tree, _) = composite(Node::new("root", ParallelNode::with_threshold(2)), &MIXED, &log);
    assert_eq!(tree.tick(0, &mut Blackboard::new()), Status::Success);
}

#[test]
fn test_parallel_threshold_property() {
    let log = Log::default();
    let mut parallel = ParallelNode::default();
    parallel
        .initialize(&NodeConfig::new("root", "Parallel").with_property("MaxSuccessCount", "2"))
        .unwrap();
    let (tree, _) = composite(Node::new("root", parallel), &MIXED, &log);
    assert_eq!(tree.tick(0, &mut Blackboard::new()), Status::Success);

    // A malformed threshold falls back to requiring all children
    let mut parallel = ParallelNode::default();
    parallel
        .initialize(&NodeConfig::new("root", "Parallel").with_property("MaxSuccessCount", "two"))
        .unwrap();
    let (tree, _) = composite(Node::new("root", parallel), &MIXED, &log);
    assert_eq!(tree.tick(0, &mut Blackboard::new()), Status::Failure);

    // So does a negative one, which would otherwise be met by no success at all
    let mut parallel = ParallelNode::default();
    parallel
        .initialize(&NodeConfig::new("root", "Parallel").with_property("MaxSuccessCount", -1))
        .unwrap();
    let (tree, _) = composite(Node::new("root", parallel), &MIXED, &log);
    assert_eq!(tree.tick(0, &mut Blackboard::new()), Status::Failure);
}

#[test]
fn test_parallel_threshold_above_children() {
    let log = Log::default();
    let all_success = [
        ("a", Status::Success),
        ("b", Status::Success),
        ("c", Status::Success),
    ];

    // Requiring more successes than there are children means all of them
    let (tree, _) = composite(
        Node::new("root", ParallelNode::with_threshold(5)),
        &all_success,
        &log,
    );
    assert_eq!(tree.tick(0, &mut Blackboard::new()), Status::Success);

    let (tree, _) = composite(Node::new("root", ParallelNode::with_threshold(5)), &MIXED, &log);
    assert_eq!(tree.tick(0, &mut Blackboard::new()), Status::Failure);
}

#[test]
fn test_parallel_never_running() {
    let log = Log::default();
    let (tree, _) = composite(
        Node::new("root", ParallelNode::with_threshold(1)),
        &[("a", Status::Running), ("b", Status::Success)],
        &log,
    );
    let mut bb = Blackboard::new();
    assert_eq!(tree.tick(0, &mut bb), Status::Success);
    // The running child stays open
    assert!(bb.tree_data("tree").unwrap().is_open("a"));
    assert!(!bb.tree_data("tree").unwrap().is_open("root"));
}

#[test]
fn test_inverter() {
    for (child, expected) in [
        (Status::Success, Status::Failure),
        (Status::Failure, Status::Success),
        (Status::Running, Status::Running),
        (Status::Error, Status::Error),
    ] {
        let log = Log::default();
        let (tree, _) = decorated(Node::new("root", InverterNode), child, &log);
        assert_eq!(tree.tick(0, &mut Blackboard::new()), expected);
    }
}

#[test]
fn test_force_success_failure() {
    for child in [Status::Success, Status::Failure, Status::Error] {
        let log = Log::default();
        let (tree, _) = decorated(Node::new("root", ForceSuccessNode), child, &log);
        assert_eq!(tree.tick(0, &mut Blackboard::new()), Status::Success);
        let (tree, _) = decorated(Node::new("root", ForceFailureNode), child, &log);
        assert_eq!(tree.tick(0, &mut Blackboard::new()), Status::Failure);
    }

    let log = Log::default();
    let (tree, _) = decorated(Node::new("root", ForceSuccessNode), Status::Running, &log);
    assert_eq!(tree.tick(0, &mut Blackboard::new()), Status::Running);
}

#[test]
fn test_decorator_without_child() {
    let tree = BehaviorTree::new("tree", Node::new("root", InverterNode));
    assert_eq!(tree.tick(0, &mut Blackboard::new()), Status::Error);
    let tree = BehaviorTree::new("tree", Node::new("root", ForceSuccessNode));
    assert_eq!(tree.tick(0, &mut Blackboard::new()), Status::Error);
}

#[test]
fn test_decorator_too_many_children() {
    let log = Log::default();
    let mut root = Node::new("root", InverterNode);
    root.add_child(scripted(&log, "a", Status::Success).0).unwrap();
    assert!(root.add_child(scripted(&log, "b", Status::Success).0).is_err());

    let mut leaf = Node::new("leaf", SucceederNode);
    assert!(leaf.add_child(scripted(&log, "c", Status::Success).0).is_err());
}

#[test]
fn test_repeater() {
    let log = Log::default();
    let (tree, _) = decorated(Node::new("root", RepeaterNode::new(3)), Status::Success, &log);
    let mut bb = Blackboard::new();
    assert_eq!(tree.tick(0, &mut bb), Status::Running);
    assert_eq!(tree.tick(1, &mut bb), Status::Running);
    assert_eq!(tree.tick(2, &mut bb), Status::Success);
    assert_eq!(events(&log, "tick").len(), 3);

    // It starts over once it is done
    assert_eq!(tree.tick(3, &mut bb), Status::Running);
}

#[test]
fn test_repeater_stops_on_error() {
    let log = Log::default();
    let (tree, _) = decorated(Node::new("root", RepeaterNode::new(3)), Status::Error, &log);
    assert_eq!(tree.tick(0, &mut Blackboard::new()), Status::Error);
}

#[test]
fn test_repeat_until_success() {
    let log = Log::default();
    let (tree, handle) = decorated(
        Node::new("root", RepeatUntilSuccessNode::new(3)),
        Status::Failure,
        &log,
    );
    let mut bb = Blackboard::new();
    assert_eq!(tree.tick(0, &mut bb), Status::Running);
    assert_eq!(tree.tick(1, &mut bb), Status::Running);
    assert_eq!(tree.tick(2, &mut bb), Status::Failure);

    *handle.lock().unwrap() = Status::Success;
    assert_eq!(tree.tick(3, &mut bb), Status::Success);
}

#[test]
fn test_repeat_until_failure() {
    let log = Log::default();
    let (tree, handle) = decorated(
        Node::new("root", RepeatUntilFailureNode::new(-1)),
        Status::Success,
        &log,
    );
    let mut bb = Blackboard::new();
    for frame in 0..5 {
        assert_eq!(tree.tick(frame, &mut bb), Status::Running);
    }
    *handle.lock().unwrap() = Status::Failure;
    assert_eq!(tree.tick(5, &mut bb), Status::Failure);
}

#[test]
fn test_limiter() {
    let log = Log::default();
    let (tree, _) = decorated(Node::new("root", LimiterNode::new(2)), Status::Success, &log);
    let mut bb = Blackboard::new();
    assert_eq!(tree.tick(0, &mut bb), Status::Success);
    assert_eq!(tree.tick(1, &mut bb), Status::Success);
    assert_eq!(tree.tick(2, &mut bb), Status::Failure);
    assert_eq!(events(&log, "tick").len(), 2);

    // The count belongs to the blackboard
    assert_eq!(tree.tick(0, &mut Blackboard::new()), Status::Success);
}

#[test]
fn test_limiter_requires_max_loop() {
    assert!(LimiterNode::default()
        .initialize(&NodeConfig::new("1", "Limiter"))
        .is_err());
}

#[test]
fn test_max_time() {
    let log = Log::default();
    let (tree, _) = decorated(Node::new("root", MaxTimeNode::new(100)), Status::Running, &log);
    let clock = ManualClock::new(1000);
    let mut bb = Blackboard::new();

    assert_eq!(tree.tick_with_clock(0, &mut bb, &clock), Status::Running);
    clock.advance(100);
    assert_eq!(tree.tick_with_clock(1, &mut bb, &clock), Status::Running);
    clock.advance(1);
    assert_eq!(tree.tick_with_clock(2, &mut bb, &clock), Status::Failure);
    assert_eq!(events(&log, "close"), vec!["close:a"]);
    assert!(bb.tree_data("tree").unwrap().open_nodes.is_empty());

    // The child is opened again with the decorator
    assert_eq!(tree.tick_with_clock(3, &mut bb, &clock), Status::Running);
    assert_eq!(events(&log, "open"), vec!["open:a", "open:a"]);
}

#[test]
fn test_wait() {
    let mut wait = WaitNode::default();
    wait.initialize(&NodeConfig::new("wait", "Wait").with_property("milliseconds", 100))
        .unwrap();
    let tree = BehaviorTree::new("tree", Node::new("wait", wait));
    let clock = ManualClock::new(0);
    let mut bb = Blackboard::new();

    assert_eq!(tree.tick_with_clock(0, &mut bb, &clock), Status::Running);
    clock.advance(50);
    assert_eq!(tree.tick_with_clock(1, &mut bb, &clock), Status::Running);
    clock.advance(50);
    assert_eq!(tree.tick_with_clock(2, &mut bb, &clock), Status::Success);

    // The start time was recorded in the node scope
    assert_eq!(bb.get_i64(START_TIME, "tree", "wait"), Ok(0));
}

#[test]
fn test_wait_requires_milliseconds() {
    let mut wait = WaitNode::default();
    let err = wait
        .initialize(&NodeConfig::new("wait", "Wait").with_property("milliseconds", "soon"))
        .unwrap_err();
    assert!(err.to_string().contains("milliseconds"));
}

#[test]
fn test_set_bool_is_true() {
    let mut root = Node::new("root", SequenceNode);
    root.add_child(Node::new("set", SetBoolNode::new("flag", true)))
        .unwrap();
    root.add_child(Node::new("check", IsTrueNode::new("flag")))
        .unwrap();
    let tree = BehaviorTree::new("tree", root);
    let mut bb = Blackboard::new();

    assert_eq!(tree.tick(0, &mut bb), Status::Success);
    assert_eq!(bb.get("flag", "tree", ""), Some(&Value::Bool(true)));
}

#[test]
fn test_is_true_scopes() {
    let tree = BehaviorTree::new("tree", Node::new("check", IsTrueNode::new("flag")));
    let mut bb = Blackboard::new();
    assert_eq!(tree.tick(0, &mut bb), Status::Failure);

    bb.set_mem("flag", true.into());
    assert_eq!(tree.tick(1, &mut bb), Status::Success);

    // The tree scope shadows the global one
    bb.set_tree("flag", false.into(), "tree");
    assert_eq!(tree.tick(2, &mut bb), Status::Failure);

    bb.set_tree("flag", Value::Int(1), "tree");
    assert_eq!(tree.tick(3, &mut bb), Status::Error);
}

#[test]
fn test_action_leaves() {
    for (node, expected) in [
        (Node::new("leaf", SucceederNode), Status::Success),
        (Node::new("leaf", FailerNode), Status::Failure),
        (Node::new("leaf", RunnerNode), Status::Running),
        (Node::new("leaf", ErrorNode), Status::Error),
        (Node::new("leaf", LogNode::new("hello")), Status::Success),
    ] {
        let tree = BehaviorTree::new("tree", node);
        assert_eq!(tree.tick(0, &mut Blackboard::new()), expected);
    }
}
