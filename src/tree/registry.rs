//! Lookup from tree node identity to its interactive model.
//!
//! Keyed by `(parent-name, node-name)` so same-named leaves under
//! different parents stay distinct. Built once at tree-assembly time and
//! treated as read-only structure afterwards (models themselves are
//! mutable; the key set is not).

use indexmap::IndexMap;

use super::{CommandTree, NodeId};
use crate::shell::action::Action;

/// Value-type identity of a tree node.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RegistryKey {
    /// Name of the node's parent.
    pub parent: String,
    /// Name of the node itself.
    pub name: String,
}

impl RegistryKey {
    /// Key for an arbitrary pair of names.
    #[must_use]
    pub fn new(parent: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            parent: parent.into(),
            name: name.into(),
        }
    }

    /// Key for a node in a tree.
    #[must_use]
    pub fn for_node(tree: &CommandTree, id: NodeId) -> Self {
        let node = tree.node(id);
        let parent = tree.node(tree.parent_of(id));
        Self::new(parent.name.clone(), node.name.clone())
    }
}

/// Maps Action nodes to their bolted-on interactive models.
#[derive(Default)]
pub struct ActionRegistry {
    models: IndexMap<RegistryKey, Box<dyn Action>>,
}

impl ActionRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a model for a node identity.
    pub fn register(&mut self, key: RegistryKey, model: Box<dyn Action>) {
        self.models.insert(key, model);
    }

    /// Borrow a model.
    #[must_use]
    pub fn get(&self, key: &RegistryKey) -> Option<&dyn Action> {
        self.models.get(key).map(|model| &**model)
    }

    /// Borrow a model mutably.
    pub fn get_mut(&mut self, key: &RegistryKey) -> Option<&mut Box<dyn Action>> {
        self.models.get_mut(key)
    }

    /// Whether a node identity has a registered model.
    #[must_use]
    pub fn contains(&self, key: &RegistryKey) -> bool {
        self.models.contains_key(key)
    }

    /// Number of registered models.
    #[must_use]
    pub fn len(&self) -> usize {
        self.models.len()
    }

    /// Whether the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shell::action::{ArgOutcome, Effect, SessionContext};
    use crate::tui::events::Event;
    use crate::tui::theme::Theme;
    use ratatui::text::Text;

    struct NullAction;
    impl Action for NullAction {
        fn update(&mut self, _ev: &Event) -> Effect {
            Effect::None
        }
        fn view(&self, _theme: &Theme) -> Text<'static> {
            Text::default()
        }
        fn done(&self) -> bool {
            true
        }
        fn reset(&mut self) -> crate::error::Result<()> {
            Ok(())
        }
        fn set_args(
            &mut self,
            _ctx: &SessionContext,
            _tokens: &[String],
        ) -> crate::error::Result<ArgOutcome> {
            Ok(ArgOutcome::accepted())
        }
    }

    #[test]
    fn test_same_name_different_parent() {
        let mut registry = ActionRegistry::new();
        registry.register(RegistryKey::new("macros", "list"), Box::new(NullAction));
        registry.register(RegistryKey::new("kits", "list"), Box::new(NullAction));

        assert_eq!(registry.len(), 2);
        assert!(registry.contains(&RegistryKey::new("macros", "list")));
        assert!(registry.contains(&RegistryKey::new("kits", "list")));
        assert!(!registry.contains(&RegistryKey::new("dashboards", "list")));
    }

    #[test]
    fn test_key_for_node() {
        let mut tree = CommandTree::new("root", "");
        let macros = tree.add_nav(tree.root(), "macros", &[], "");
        let list = tree.add_action(macros, "list", &[], "");

        let key = RegistryKey::for_node(&tree, list);
        assert_eq!(key, RegistryKey::new("macros", "list"));
    }
}
