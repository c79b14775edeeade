//! Leaf actions and tree assembly.
//!
//! [`assemble`] builds the full command tree and registers every Action
//! node's interactive model. Assembly is the one place where the
//! tree-vs-registry invariant is established: every Action leaf added here
//! must be registered, or dispatch will (deliberately) panic later.

pub mod query;
pub mod scaffold;

use crate::tree::registry::{ActionRegistry, RegistryKey};
use crate::tree::{CommandTree, NodeId};

use query::QueryAction;
use scaffold::{Entity, ScaffoldAction, Verb};

/// Build the command tree and its action registry.
#[must_use]
pub fn assemble() -> (CommandTree, ActionRegistry) {
    let mut tree = CommandTree::new("trawl", "remote log search client");
    let mut registry = ActionRegistry::new();
    let root = tree.root();

    let query = tree.add_action(
        root,
        "query",
        &["q", "search"],
        "submit a search and browse the results",
    );
    registry.register(
        RegistryKey::for_node(&tree, query),
        Box::new(QueryAction::new()),
    );

    let macros = tree.add_nav(root, "macros", &["m"], "saved query expansions");
    scaffold_leaf(&mut tree, &mut registry, macros, "list", &["ls"], "list macros", Entity::Macros, Verb::List);
    scaffold_leaf(&mut tree, &mut registry, macros, "create", &["add"], "create a macro", Entity::Macros, Verb::Create);
    scaffold_leaf(&mut tree, &mut registry, macros, "delete", &["rm"], "delete a macro", Entity::Macros, Verb::Delete);

    let kits = tree.add_nav(root, "kits", &[], "installed content kits");
    scaffold_leaf(&mut tree, &mut registry, kits, "list", &["ls"], "list kits", Entity::Kits, Verb::List);
    scaffold_leaf(&mut tree, &mut registry, kits, "info", &["show"], "show one kit", Entity::Kits, Verb::Info);
    scaffold_leaf(&mut tree, &mut registry, kits, "delete", &["rm"], "delete a kit", Entity::Kits, Verb::Delete);

    let dashboards = tree.add_nav(root, "dashboards", &["db"], "saved dashboards");
    scaffold_leaf(&mut tree, &mut registry, dashboards, "list", &["ls"], "list dashboards", Entity::Dashboards, Verb::List);
    scaffold_leaf(&mut tree, &mut registry, dashboards, "delete", &["rm"], "delete a dashboard", Entity::Dashboards, Verb::Delete);

    let extractors = tree.add_nav(root, "extractors", &["ex"], "field extractors");
    scaffold_leaf(&mut tree, &mut registry, extractors, "list", &["ls"], "list extractors", Entity::Extractors, Verb::List);
    scaffold_leaf(&mut tree, &mut registry, extractors, "create", &["add"], "create an extractor", Entity::Extractors, Verb::Create);
    scaffold_leaf(&mut tree, &mut registry, extractors, "delete", &["rm"], "delete an extractor", Entity::Extractors, Verb::Delete);

    let scheduled = tree.add_nav(root, "scheduled", &["sched"], "recurring searches");
    scaffold_leaf(&mut tree, &mut registry, scheduled, "list", &["ls"], "list scheduled searches", Entity::Scheduled, Verb::List);
    scaffold_leaf(&mut tree, &mut registry, scheduled, "delete", &["rm"], "delete a scheduled search", Entity::Scheduled, Verb::Delete);

    (tree, registry)
}

#[allow(clippy::too_many_arguments)]
fn scaffold_leaf(
    tree: &mut CommandTree,
    registry: &mut ActionRegistry,
    parent: NodeId,
    name: &str,
    aliases: &[&str],
    help: &str,
    entity: Entity,
    verb: Verb,
) {
    let node = tree.add_action(parent, name, aliases, help);
    registry.register(
        RegistryKey::for_node(tree, node),
        Box::new(ScaffoldAction::new(entity, verb)),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::NodeKind;

    /// Every Action leaf in the assembled tree must have a registered
    /// model; a miss panics at dispatch time.
    #[test]
    fn test_every_action_is_registered() {
        let (tree, registry) = assemble();

        let mut stack = vec![tree.root()];
        let mut actions = 0;
        while let Some(id) = stack.pop() {
            match &tree.node(id).kind {
                NodeKind::Nav { children } => stack.extend(children.iter().copied()),
                NodeKind::Action => {
                    actions += 1;
                    let key = RegistryKey::for_node(&tree, id);
                    assert!(
                        registry.contains(&key),
                        "action '{}' missing from the registry",
                        tree.node(id).name
                    );
                }
            }
        }
        assert_eq!(actions, registry.len());
        assert!(actions > 10);
    }

    #[test]
    fn test_same_leaf_names_under_different_parents() {
        let (tree, _) = assemble();
        let macros = tree.find_child(tree.root(), "macros").unwrap();
        let kits = tree.find_child(tree.root(), "kits").unwrap();
        let macros_list = tree.find_child(macros, "list").unwrap();
        let kits_list = tree.find_child(kits, "list").unwrap();
        assert_ne!(macros_list, kits_list);
        assert_ne!(
            RegistryKey::for_node(&tree, macros_list),
            RegistryKey::for_node(&tree, kits_list)
        );
    }
}
