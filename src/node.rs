use crate::{
    error::{AddChildError, AddChildResult},
    BehaviorNode, Category, NumChildren, Status, Tick,
};

/// A node in a tree: the identity and children of a [`BehaviorNode`].
///
/// The shape of a tree is fixed once it is built, and nothing here changes
/// while ticking.
pub struct Node {
    id: String,
    /// Name of the type of the node
    name: String,
    title: String,
    behavior: Box<dyn BehaviorNode>,
    children: Vec<Node>,
}

impl Node {
    pub fn new(id: impl Into<String>, behavior: impl BehaviorNode + 'static) -> Self {
        Self::new_raw(id, Box::new(behavior))
    }

    pub fn new_raw(id: impl Into<String>, behavior: Box<dyn BehaviorNode>) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            title: String::new(),
            behavior,
            children: vec![],
        }
    }

    pub(crate) fn new_raw_with_name(
        id: String,
        name: String,
        title: String,
        behavior: Box<dyn BehaviorNode>,
    ) -> Self {
        Self {
            id,
            name,
            title,
            behavior,
            children: vec![],
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn add_child(&mut self, child: Node) -> AddChildResult {
        if NumChildren::Finite(self.children.len()) < self.behavior.max_children() {
            self.children.push(child);
            Ok(())
        } else {
            Err(AddChildError::TooManyNodes)
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn category(&self) -> Category {
        self.behavior.category()
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }

    /// The only child of a decorator.
    pub fn child(&self) -> Option<&Node> {
        self.children.first()
    }

    /// Depth first search for a node with the given id.
    pub fn find(&self, id: &str) -> Option<&Node> {
        if self.id == id {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(id))
    }

    /// Run the node through its lifecycle hooks and return the status of
    /// `on_tick`.
    ///
    /// Composites and decorators call this on their children, never
    /// `on_tick` directly.
    pub fn execute(&self, tick: &mut Tick) -> Status {
        tick.enter_node(self);
        self.behavior.on_enter(self, tick);

        if !tick.is_open(self) {
            tick.open_node(self);
            self.behavior.on_open(self, tick);
        }

        let status = self.behavior.on_tick(self, tick);

        if !status.is_running() {
            self.close(tick);
        }

        self.behavior.on_exit(self, tick);
        tick.exit_node();
        status
    }

    /// Close the node if it is open, running `on_close`.
    ///
    /// Used on nodes that were left `Running` but will not be ticked again,
    /// like a child abandoned by its parent.
    pub fn close(&self, tick: &mut Tick) {
        if tick.is_open(self) {
            self.behavior.on_close(self, tick);
            tick.close_node(self);
        }
    }

    /// Close this node and every open node below it, deepest first.
    pub fn close_branch(&self, tick: &mut Tick) {
        for child in self.children.iter().rev() {
            child.close_branch(tick);
        }
        self.close(tick);
    }
}

impl std::fmt::Debug for Node {
    fn fmt(&self, fmt: &mut std::fmt::Formatter) -> std::fmt::Result {
        fmt.debug_struct("Node")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("category", &self.category())
            .field("children", &self.children)
            .finish()
    }
}
