//! Builtin commands, reachable from every directory.
//!
//! Builtins resolve ahead of tree lookup (see [`crate::tree::walk`]), so
//! they always win a name collision with a tree node.

use crate::tree::walk::{walk, Builtin, WalkStatus};
use crate::tree::NodeId;

use super::Shell;

impl Shell {
    /// Execute a builtin. Builtins are synchronous and one-shot; the shell
    /// stays at the prompt.
    pub(super) fn run_builtin(&mut self, builtin: Builtin, args: &[String]) {
        match builtin {
            Builtin::Help => self.builtin_help(args),
            Builtin::History => self.builtin_history(),
            Builtin::Clear => self.scrollback.clear(),
            Builtin::Quit => self.quit(),
        }
    }

    fn builtin_history(&mut self) {
        let records = self.history.records();
        if records.is_empty() {
            self.print("no history yet".to_string());
            return;
        }
        for (i, record) in records.iter().enumerate() {
            self.print(format!("{:>4}  {record}", i + 1));
        }
    }

    fn builtin_help(&mut self, args: &[String]) {
        if args.is_empty() {
            for line in self.help_lines(self.dir) {
                self.print(line);
            }
            return;
        }

        let tokens: Vec<&str> = args.iter().map(String::as_str).collect();
        // `help quit` and friends describe the builtin itself.
        if tokens.len() == 1 {
            if let Some(builtin) = Builtin::lookup(tokens[0]) {
                self.print(format!(
                    "{} - {}",
                    builtin.name(),
                    builtin_help_text(builtin)
                ));
                return;
            }
        }

        let result = walk(&self.tree, self.dir, &tokens);
        match result.status {
            WalkStatus::Nav | WalkStatus::Action => {
                if let Some(node) = result.node {
                    for line in self.help_lines(node) {
                        self.print(line);
                    }
                }
            }
            WalkStatus::Builtin => {
                if let Some(builtin) = result.builtin {
                    self.print(format!(
                        "{} - {}",
                        builtin.name(),
                        builtin_help_text(builtin)
                    ));
                }
            }
            WalkStatus::Invalid | WalkStatus::Error => {
                if let Some(error) = result.error {
                    self.print(error);
                }
            }
        }
    }

    fn help_lines(&self, id: NodeId) -> Vec<String> {
        let node = self.tree.node(id);
        let path = self.tree.path_of(id);

        let mut lines = vec![format!("{path} - {}", node.help)];
        if !node.is_nav() {
            return lines;
        }

        for &child_id in self.tree.children_of(id) {
            let child = self.tree.node(child_id);
            let marker = if child.is_nav() { "/" } else { "" };
            let aliases = if child.aliases.is_empty() {
                String::new()
            } else {
                format!(" ({})", child.aliases.join(", "))
            };
            lines.push(format!(
                "  {}{marker}{aliases} - {}",
                child.name, child.help
            ));
        }

        let builtins: Vec<&str> = Builtin::all().iter().map(|b| b.name()).collect();
        lines.push(format!("builtins: {}", builtins.join(", ")));
        lines
    }
}

fn builtin_help_text(builtin: Builtin) -> &'static str {
    match builtin {
        Builtin::Help => "show help for the current directory or a named command",
        Builtin::History => "list submitted commands, newest first",
        Builtin::Clear => "clear the scrollback",
        Builtin::Quit => "leave the shell",
    }
}
