mod config;
mod loader;

pub use self::{
    config::{CustomNodeConfig, NodeConfig, ProjectConfig, ProjectData, TreeConfig},
    loader::{load_project, load_tree},
};
