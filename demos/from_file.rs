use ::behavior3_lite::{
    boxify, error::LoadError, load_project, BehaviorNode, Blackboard, Category, Node,
    NodeConfig, ProjectConfig, Registry, Status, Tick,
};
use std::fs;
use tracing_subscriber::{fmt, EnvFilter};

/// Prints the `info` property together with the subtree it runs in.
#[derive(Default)]
struct PrintNode {
    info: String,
}

impl BehaviorNode for PrintNode {
    fn category(&self) -> Category {
        Category::Action
    }

    fn initialize(&mut self, config: &NodeConfig) -> Result<(), LoadError> {
        self.info = config.get_str("info").to_owned();
        Ok(())
    }

    fn on_tick(&self, _node: &Node, tick: &mut Tick) -> Status {
        println!(
            "frame {} [{}]: {}",
            tick.frame_id(),
            tick.last_subtree().unwrap_or("-"),
            self.info
        );
        Status::Success
    }
}

fn main() -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(env_filter).init();

    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "demos/example.b3.json".to_owned());
    let project = ProjectConfig::from_json(&fs::read_to_string(&path)?)?;

    let mut registry = Registry::default();
    registry.register("Print", boxify(PrintNode::default));

    let trees = load_project(&project, &registry)?;
    for tree in &trees {
        println!("{:#?}", tree);
    }

    let Some(first) = trees.first() else {
        anyhow::bail!("{} has no trees", path);
    };

    let mut bb = Blackboard::new();
    for frame in 0..5 {
        let status = first.tick(frame, &mut bb);
        println!("frame {}: {:?}", frame, status);
    }

    Ok(())
}
