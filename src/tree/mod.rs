//! The navigable command tree.
//!
//! Commands form a hierarchy of Nav nodes (directories, containing child
//! nodes) and Action leaves (runnable commands). The tree is assembled once
//! at startup and never mutated afterwards; the shell only reads it.
//!
//! Nodes live in an arena indexed by [`NodeId`], which keeps parent
//! navigation (`..`) cheap and avoids reference cycles.

pub mod registry;
pub mod walk;

/// Stable handle to a node in a [`CommandTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

/// Node classification. Every node has exactly one kind.
#[derive(Debug)]
pub enum NodeKind {
    /// A directory node; contains child nodes in declaration order.
    Nav {
        /// Children, in the order they were registered.
        children: Vec<NodeId>,
    },
    /// A leaf command.
    Action,
}

/// A single command-tree node.
#[derive(Debug)]
pub struct CommandNode {
    /// Node name, matched first during resolution.
    pub name: String,
    /// Parent node. The root is its own parent.
    pub parent: NodeId,
    /// Alternate names, matched after every child's primary name.
    pub aliases: Vec<String>,
    /// One-line description shown by `help`.
    pub help: String,
    /// Nav or Action.
    pub kind: NodeKind,
}

impl CommandNode {
    /// Whether this node is a directory.
    #[must_use]
    pub fn is_nav(&self) -> bool {
        matches!(self.kind, NodeKind::Nav { .. })
    }
}

/// Arena-backed command tree.
#[derive(Debug)]
pub struct CommandTree {
    nodes: Vec<CommandNode>,
}

impl CommandTree {
    /// Create a tree containing only a root directory.
    #[must_use]
    pub fn new(root_name: impl Into<String>, help: impl Into<String>) -> Self {
        let root = CommandNode {
            name: root_name.into(),
            parent: NodeId(0),
            aliases: Vec::new(),
            help: help.into(),
            kind: NodeKind::Nav {
                children: Vec::new(),
            },
        };
        Self { nodes: vec![root] }
    }

    /// The root directory.
    #[must_use]
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Add a directory under `parent`.
    ///
    /// # Panics
    ///
    /// Panics if `parent` is not a Nav node; attaching children to a leaf is
    /// an assembly bug.
    pub fn add_nav(
        &mut self,
        parent: NodeId,
        name: impl Into<String>,
        aliases: &[&str],
        help: impl Into<String>,
    ) -> NodeId {
        self.add_node(parent, name.into(), aliases, help.into(), true)
    }

    /// Add an action leaf under `parent`.
    ///
    /// # Panics
    ///
    /// Panics if `parent` is not a Nav node.
    pub fn add_action(
        &mut self,
        parent: NodeId,
        name: impl Into<String>,
        aliases: &[&str],
        help: impl Into<String>,
    ) -> NodeId {
        self.add_node(parent, name.into(), aliases, help.into(), false)
    }

    fn add_node(
        &mut self,
        parent: NodeId,
        name: String,
        aliases: &[&str],
        help: String,
        nav: bool,
    ) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(CommandNode {
            name,
            parent,
            aliases: aliases.iter().map(|a| (*a).to_string()).collect(),
            help,
            kind: if nav {
                NodeKind::Nav {
                    children: Vec::new(),
                }
            } else {
                NodeKind::Action
            },
        });

        match &mut self.nodes[parent.0].kind {
            NodeKind::Nav { children } => children.push(id),
            NodeKind::Action => panic!(
                "command tree assembly error: '{}' is an action and cannot hold children",
                self.nodes[parent.0].name
            ),
        }
        id
    }

    /// Borrow a node.
    #[must_use]
    pub fn node(&self, id: NodeId) -> &CommandNode {
        &self.nodes[id.0]
    }

    /// Parent of a node. The root's parent is itself.
    #[must_use]
    pub fn parent_of(&self, id: NodeId) -> NodeId {
        self.nodes[id.0].parent
    }

    /// Children of a directory, in declaration order. Empty for leaves.
    #[must_use]
    pub fn children_of(&self, id: NodeId) -> &[NodeId] {
        match &self.nodes[id.0].kind {
            NodeKind::Nav { children } => children,
            NodeKind::Action => &[],
        }
    }

    /// Resolve a token against a directory's children.
    ///
    /// Primary names are checked for every child (declaration order) before
    /// any aliases are considered; the first match wins.
    #[must_use]
    pub fn find_child(&self, dir: NodeId, token: &str) -> Option<NodeId> {
        let children = self.children_of(dir);
        children
            .iter()
            .find(|id| self.nodes[id.0].name == token)
            .or_else(|| {
                children
                    .iter()
                    .find(|id| self.nodes[id.0].aliases.iter().any(|a| a == token))
            })
            .copied()
    }

    /// Slash-separated absolute path of a node, for the prompt.
    #[must_use]
    pub fn path_of(&self, id: NodeId) -> String {
        let mut parts = Vec::new();
        let mut cur = id;
        while cur != self.root() {
            parts.push(self.nodes[cur.0].name.clone());
            cur = self.parent_of(cur);
        }
        parts.reverse();
        format!("/{}", parts.join("/"))
    }
}
