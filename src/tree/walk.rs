//! Path resolution against the command tree.
//!
//! A submitted line is whitespace-tokenized and resolved recursively from
//! the shell's current directory. Builtins are intercepted before any tree
//! lookup, so they are reachable from every directory; a tree node sharing
//! a builtin's name is deliberately unreachable by name.

use super::{CommandTree, NodeId, NodeKind};

/// Commands recognized from any directory, independent of tree position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Builtin {
    /// Context help for the current directory or a named path.
    Help,
    /// Newest-first listing of submitted lines.
    History,
    /// Clear the shell scrollback.
    Clear,
    /// Leave the shell.
    Quit,
}

impl Builtin {
    /// Exact-token lookup in the process-wide builtin table.
    #[must_use]
    pub fn lookup(token: &str) -> Option<Self> {
        match token {
            "help" => Some(Self::Help),
            "history" => Some(Self::History),
            "clear" => Some(Self::Clear),
            "quit" | "exit" => Some(Self::Quit),
            _ => None,
        }
    }

    /// The canonical name, for help output.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Help => "help",
            Self::History => "history",
            Self::Clear => "clear",
            Self::Quit => "quit",
        }
    }

    /// All builtins, in help-listing order.
    #[must_use]
    pub fn all() -> &'static [Self] {
        &[Self::Help, Self::History, Self::Clear, Self::Quit]
    }
}

/// Classification of a resolution attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalkStatus {
    /// Resolution ended on a directory.
    Nav,
    /// Resolution ended on an action leaf.
    Action,
    /// A builtin intercepted the walk.
    Builtin,
    /// A token matched nothing.
    Invalid,
    /// Internal resolution failure. Not produced by the current walker;
    /// kept so callers handle the full classification.
    Error,
}

/// Outcome of resolving one input line. Recomputed per line, never stored.
#[derive(Debug)]
pub struct WalkResult {
    /// The node resolution ended on. For `Invalid` this is the deepest
    /// directory reached, so partial navigation can persist.
    pub node: Option<NodeId>,
    /// Outcome classification.
    pub status: WalkStatus,
    /// Error text for `Invalid`/`Error`.
    pub error: Option<String>,
    /// The intercepted builtin, for `Builtin`.
    pub builtin: Option<Builtin>,
    /// Unconsumed tokens, forwarded to the resolved action or builtin as
    /// its arguments.
    pub rest: Vec<String>,
}

impl WalkResult {
    fn nav(node: NodeId) -> Self {
        Self {
            node: Some(node),
            status: WalkStatus::Nav,
            error: None,
            builtin: None,
            rest: Vec::new(),
        }
    }
}

/// Resolve `tokens` against the tree starting from directory `dir`.
///
/// Recursion per token keeps multi-hop navigation (`a b c`) and mid-path
/// actions symmetric, and keeps builtin interception independent of depth.
#[must_use]
pub fn walk(tree: &CommandTree, dir: NodeId, tokens: &[&str]) -> WalkResult {
    let Some((token, rest)) = tokens.split_first() else {
        // Bare Enter with no new path: stay here.
        return WalkResult::nav(dir);
    };

    let token = token.trim();
    if token.is_empty() {
        return walk(tree, dir, rest);
    }

    // Builtins intercept before tree lookup and win any name collision.
    if let Some(builtin) = Builtin::lookup(token) {
        return WalkResult {
            node: Some(dir),
            status: WalkStatus::Builtin,
            error: None,
            builtin: Some(builtin),
            rest: rest.iter().map(|t| (*t).to_string()).collect(),
        };
    }

    if token == ".." {
        return walk(tree, tree.parent_of(dir), rest);
    }

    if let Some(child) = tree.find_child(dir, token) {
        return match tree.node(child).kind {
            NodeKind::Action => WalkResult {
                node: Some(child),
                status: WalkStatus::Action,
                error: None,
                builtin: None,
                // Remaining tokens are the action's problem (SetArgs).
                rest: rest.iter().map(|t| (*t).to_string()).collect(),
            },
            NodeKind::Nav { .. } => walk(tree, child, rest),
        };
    }

    WalkResult {
        node: Some(dir),
        status: WalkStatus::Invalid,
        error: Some(format!(
            "unknown command '{token}' (type 'help' for available commands)"
        )),
        builtin: None,
        rest: Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::CommandTree;

    fn sample_tree() -> (CommandTree, NodeId, NodeId, NodeId) {
        let mut tree = CommandTree::new("root", "top level");
        let macros = tree.add_nav(tree.root(), "macros", &["m"], "macros");
        let list = tree.add_action(macros, "list", &["ls"], "list macros");
        let kits = tree.add_nav(tree.root(), "kits", &[], "kits");
        (tree, macros, list, kits)
    }

    #[test]
    fn test_zero_tokens_is_stay_here() {
        let (tree, macros, _, _) = sample_tree();
        let result = walk(&tree, macros, &[]);
        assert_eq!(result.status, WalkStatus::Nav);
        assert_eq!(result.node, Some(macros));
    }

    #[test]
    fn test_dotdot_at_root_stays_at_root() {
        let (tree, _, _, _) = sample_tree();
        let result = walk(&tree, tree.root(), &[".."]);
        assert_eq!(result.status, WalkStatus::Nav);
        assert_eq!(result.node, Some(tree.root()));
    }

    #[test]
    fn test_multi_hop_navigation() {
        let (tree, macros, _, _) = sample_tree();
        let result = walk(&tree, tree.root(), &["macros"]);
        assert_eq!(result.status, WalkStatus::Nav);
        assert_eq!(result.node, Some(macros));
    }

    #[test]
    fn test_action_stops_and_forwards_tokens() {
        let (tree, _, list, _) = sample_tree();
        let result = walk(&tree, tree.root(), &["macros", "list", "--json", "foo"]);
        assert_eq!(result.status, WalkStatus::Action);
        assert_eq!(result.node, Some(list));
        assert_eq!(result.rest, vec!["--json", "foo"]);
    }

    #[test]
    fn test_alias_resolution_mid_path() {
        let (tree, _, list, _) = sample_tree();
        let result = walk(&tree, tree.root(), &["m", "ls"]);
        assert_eq!(result.status, WalkStatus::Action);
        assert_eq!(result.node, Some(list));
    }

    #[test]
    fn test_unknown_token_names_the_token() {
        let (tree, _, _, _) = sample_tree();
        let result = walk(&tree, tree.root(), &["macros", "bogus"]);
        assert_eq!(result.status, WalkStatus::Invalid);
        assert!(result.error.unwrap().contains("unknown command 'bogus'"));
    }

    #[test]
    fn test_invalid_keeps_partial_navigation() {
        let (tree, macros, _, _) = sample_tree();
        // 'macros' resolves, 'bogus' does not: the reached directory is
        // reported so the shell can keep the partial move.
        let result = walk(&tree, tree.root(), &["macros", "bogus"]);
        assert_eq!(result.node, Some(macros));
    }

    #[test]
    fn test_builtin_intercepts_from_any_directory() {
        let (tree, macros, _, _) = sample_tree();
        let result = walk(&tree, macros, &["help", "extra"]);
        assert_eq!(result.status, WalkStatus::Builtin);
        assert_eq!(result.builtin, Some(Builtin::Help));
        assert_eq!(result.rest, vec!["extra"]);
    }

    #[test]
    fn test_builtin_shadows_tree_node() {
        let mut tree = CommandTree::new("root", "");
        tree.add_action(tree.root(), "history", &[], "never reachable");
        let result = walk(&tree, tree.root(), &["history"]);
        // The builtin wins; the tree node with the same name is shadowed.
        assert_eq!(result.status, WalkStatus::Builtin);
        assert_eq!(result.builtin, Some(Builtin::History));
    }

    #[test]
    fn test_blank_tokens_are_skipped() {
        let (tree, macros, _, _) = sample_tree();
        let result = walk(&tree, tree.root(), &["", "  ", "macros"]);
        assert_eq!(result.status, WalkStatus::Nav);
        assert_eq!(result.node, Some(macros));
    }
}
