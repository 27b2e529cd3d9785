use super::config::{NodeConfig, ProjectConfig, TreeConfig};
use crate::{error::LoadError, nodes::SubTreeNode, BehaviorTree, Node, Registry};

/// Instantiate a behavior tree from its description.
///
/// Nodes are built by the `registry` and initialized with their properties,
/// so a malformed property fails here instead of while ticking.
/// A standalone tree cannot refer to subtrees; use [`load_project`] for that.
pub fn load_tree(tree: &TreeConfig, registry: &Registry) -> Result<BehaviorTree, LoadError> {
    load_with_subtrees(tree, registry, &[])
}

/// Instantiate every tree of a project, in the order they are declared.
///
/// A node whose name is the id of another tree in the project is replaced by
/// a copy of that tree, wrapped in a [`SubTreeNode`].
pub fn load_project(
    project: &ProjectConfig,
    registry: &Registry,
) -> Result<Vec<BehaviorTree>, LoadError> {
    project
        .data
        .trees
        .iter()
        .map(|tree| load_with_subtrees(tree, registry, &project.data.trees))
        .collect()
}

fn load_with_subtrees(
    tree: &TreeConfig,
    registry: &Registry,
    subtrees: &[TreeConfig],
) -> Result<BehaviorTree, LoadError> {
    let root = tree
        .nodes
        .get(&tree.root)
        .ok_or_else(|| LoadError::MissingRoot(tree.id.clone()))?;

    let top = TreeStack {
        name: &tree.id,
        parent: None,
    };
    let path = TreeStack {
        name: &tree.root,
        parent: None,
    };
    let loader = Loader {
        registry,
        subtrees,
    };
    let root = loader.load_recurse(tree, root, "", &top, &path)?;
    tracing::debug!(tree = tree.id.as_str(), nodes = tree.nodes.len(), "Loaded tree");

    Ok(BehaviorTree::new(tree.id.clone(), root).with_meta(
        tree.title.clone(),
        tree.description.clone(),
        tree.properties.clone(),
    ))
}

/// A chain of names linked through the call stack of `load_recurse`.
///
/// It holds either the trees being expanded, or the node ids from the root
/// of the current tree down to the node being loaded. A name which is
/// already on the chain would be loaded forever.
struct TreeStack<'a, 'src> {
    name: &'src str,
    parent: Option<&'a TreeStack<'a, 'src>>,
}

impl<'a, 'src> TreeStack<'a, 'src> {
    fn find(&self, name: &str) -> bool {
        if self.name == name {
            true
        } else if let Some(parent) = self.parent {
            parent.find(name)
        } else {
            false
        }
    }
}

struct Loader<'a> {
    registry: &'a Registry,
    subtrees: &'a [TreeConfig],
}

impl<'a> Loader<'a> {
    /// `prefix` namespaces the ids of nodes copied from a subtree, so the
    /// same subtree used twice keeps two separate node scopes.
    fn load_recurse(
        &self,
        tree: &'a TreeConfig,
        config: &'a NodeConfig,
        prefix: &str,
        parent_stack: &TreeStack,
        path: &TreeStack,
    ) -> Result<Node, LoadError> {
        let id = format!("{}{}", prefix, config.id);

        let subtree = self.subtrees.iter().find(|sub| sub.id == config.name);
        let use_subtree = subtree.is_some()
            && (config.category == "tree" || !self.registry.contains(&config.name));

        if let Some(subtree) = subtree.filter(|_| use_subtree) {
            // Prevent infinite recursion
            if parent_stack.find(&subtree.id) {
                return Err(LoadError::InfiniteRecursion {
                    node: subtree.id.clone(),
                });
            }
            let tree_stack = TreeStack {
                name: &subtree.id,
                parent: Some(parent_stack),
            };
            let root = subtree
                .nodes
                .get(&subtree.root)
                .ok_or_else(|| LoadError::MissingRoot(subtree.id.clone()))?;
            let inner_path = TreeStack {
                name: &subtree.root,
                parent: None,
            };
            let inner = self.load_recurse(
                subtree,
                root,
                &format!("{}/", id),
                &tree_stack,
                &inner_path,
            )?;
            let mut node = Node::new_raw_with_name(
                id,
                config.name.clone(),
                config.title.clone(),
                Box::new(SubTreeNode),
            );
            node.add_child(inner)
                .map_err(|e| LoadError::AddChildError(e, config.name.clone()))?;
            // A subtree reference has no children of its own.
            return Ok(node);
        }

        let mut behavior = self
            .registry
            .build(&config.name)
            .ok_or_else(|| LoadError::MissingNode(config.name.clone()))?;
        behavior.initialize(config)?;
        let mut ret =
            Node::new_raw_with_name(id, config.name.clone(), config.title.clone(), behavior);

        for child_id in config.child_ids() {
            let child_config = tree.nodes.get(child_id).ok_or_else(|| LoadError::MissingChild {
                node: config.id.clone(),
                child: child_id.to_owned(),
            })?;
            if path.find(child_id) {
                return Err(LoadError::Cycle {
                    tree: tree.id.clone(),
                    node: child_id.to_owned(),
                });
            }
            let child_path = TreeStack {
                name: child_id,
                parent: Some(path),
            };
            let child = self.load_recurse(tree, child_config, prefix, parent_stack, &child_path)?;
            ret.add_child(child)
                .map_err(|e| LoadError::AddChildError(e, config.name.clone()))?;
        }

        Ok(ret)
    }
}
