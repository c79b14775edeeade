//! One-shot CRUD scaffolds over the remote entities.
//!
//! These are the generic list/create/delete leaves (macros, kits,
//! dashboards, extractors, scheduled searches). They satisfy the same
//! interactive contract as richer models but finish synchronously inside
//! `set_args`: the remote call runs, its rendering is emitted as a startup
//! effect, and the shell reclaims the prompt immediately.

use ratatui::text::Text;

use crate::error::{Result, TrawlError};
use crate::remote::{CreateExtractor, CreateMacro, RemoteClient};
use crate::shell::action::{Action, ArgOutcome, Effect, SessionContext};
use crate::tui::events::Event;
use crate::tui::theme::Theme;

/// Remote entity kinds the scaffolds operate on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    /// Saved query expansions.
    Macros,
    /// Installed content kits.
    Kits,
    /// Saved dashboards.
    Dashboards,
    /// Field extractors.
    Extractors,
    /// Recurring searches.
    Scheduled,
}

/// Operations a scaffold can perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verb {
    /// List all entities of the kind.
    List,
    /// Show one entity by ID.
    Info,
    /// Create an entity from positional arguments.
    Create,
    /// Delete an entity by ID.
    Delete,
}

/// A generic one-shot CRUD leaf.
pub struct ScaffoldAction {
    entity: Entity,
    verb: Verb,
    finished: bool,
}

impl ScaffoldAction {
    /// Create a scaffold for an entity/verb pair.
    #[must_use]
    pub fn new(entity: Entity, verb: Verb) -> Self {
        Self {
            entity,
            verb,
            finished: false,
        }
    }
}

impl Action for ScaffoldAction {
    fn update(&mut self, _ev: &Event) -> Effect {
        Effect::None
    }

    fn view(&self, _theme: &Theme) -> Text<'static> {
        Text::default()
    }

    fn done(&self) -> bool {
        self.finished
    }

    fn reset(&mut self) -> Result<()> {
        self.finished = false;
        Ok(())
    }

    fn set_args(&mut self, ctx: &SessionContext, tokens: &[String]) -> Result<ArgOutcome> {
        match execute(&ctx.client, self.entity, self.verb, tokens) {
            Ok(output) => {
                self.finished = true;
                Ok(ArgOutcome::with_startup(Effect::Print(output)))
            }
            // Usage mistakes keep the prompt without a handoff.
            Err(TrawlError::InvalidArgument { .. }) => Ok(ArgOutcome::invalid(
                usage(self.entity, self.verb).to_string(),
            )),
            // Remote failures are recoverable: report them and finish.
            Err(err) => {
                self.finished = true;
                Ok(ArgOutcome::with_startup(Effect::Print(err.to_string())))
            }
        }
    }
}

/// Run the remote operation and render its outcome as display text.
pub fn execute(
    client: &RemoteClient,
    entity: Entity,
    verb: Verb,
    tokens: &[String],
) -> Result<String> {
    match (entity, verb) {
        (Entity::Macros, Verb::List) => {
            let macros = client.list_macros()?;
            Ok(render_rows(
                &["ID", "NAME", "EXPANSION"],
                macros
                    .iter()
                    .map(|m| vec![m.id.clone(), m.name.clone(), m.expansion.clone()]),
            ))
        }
        (Entity::Macros, Verb::Create) => {
            let [name, expansion, rest @ ..] = tokens else {
                return Err(TrawlError::invalid_arg("macro", "name and expansion required"));
            };
            let created = client.create_macro(&CreateMacro {
                name: name.clone(),
                expansion: expansion.clone(),
                description: rest.join(" "),
            })?;
            Ok(format!("created macro {} ({})", created.name, created.id))
        }
        (Entity::Macros, Verb::Delete) => {
            let id = single_id(tokens, "macro")?;
            client.delete_macro(id)?;
            Ok(format!("deleted macro {id}"))
        }
        (Entity::Kits, Verb::List) => {
            let kits = client.list_kits()?;
            Ok(render_rows(
                &["ID", "NAME", "VERSION"],
                kits.iter()
                    .map(|k| vec![k.id.clone(), k.name.clone(), k.version.clone()]),
            ))
        }
        (Entity::Kits, Verb::Info) => {
            let id = single_id(tokens, "kit")?;
            let kit = client.get_kit(id)?;
            Ok(format!(
                "{} ({})\nversion: {}\n{}",
                kit.name, kit.id, kit.version, kit.description
            ))
        }
        (Entity::Kits, Verb::Delete) => {
            let id = single_id(tokens, "kit")?;
            client.delete_kit(id)?;
            Ok(format!("deleted kit {id}"))
        }
        (Entity::Dashboards, Verb::List) => {
            let dashboards = client.list_dashboards()?;
            Ok(render_rows(
                &["ID", "NAME", "DESCRIPTION"],
                dashboards
                    .iter()
                    .map(|d| vec![d.id.clone(), d.name.clone(), d.description.clone()]),
            ))
        }
        (Entity::Dashboards, Verb::Delete) => {
            let id = single_id(tokens, "dashboard")?;
            client.delete_dashboard(id)?;
            Ok(format!("deleted dashboard {id}"))
        }
        (Entity::Extractors, Verb::List) => {
            let extractors = client.list_extractors()?;
            Ok(render_rows(
                &["ID", "NAME", "TAG", "EXPRESSION"],
                extractors.iter().map(|e| {
                    vec![
                        e.id.clone(),
                        e.name.clone(),
                        e.tag.clone(),
                        e.expression.clone(),
                    ]
                }),
            ))
        }
        (Entity::Extractors, Verb::Create) => {
            let [name, tag, expression] = tokens else {
                return Err(TrawlError::invalid_arg(
                    "extractor",
                    "name, tag and expression required",
                ));
            };
            let created = client.create_extractor(&CreateExtractor {
                name: name.clone(),
                tag: tag.clone(),
                expression: expression.clone(),
            })?;
            Ok(format!("created extractor {} ({})", created.name, created.id))
        }
        (Entity::Extractors, Verb::Delete) => {
            let id = single_id(tokens, "extractor")?;
            client.delete_extractor(id)?;
            Ok(format!("deleted extractor {id}"))
        }
        (Entity::Scheduled, Verb::List) => {
            let scheduled = client.list_scheduled()?;
            Ok(render_rows(
                &["ID", "NAME", "CRON", "QUERY"],
                scheduled.iter().map(|s| {
                    vec![s.id.clone(), s.name.clone(), s.cron.clone(), s.query.clone()]
                }),
            ))
        }
        (Entity::Scheduled, Verb::Delete) => {
            let id = single_id(tokens, "scheduled search")?;
            client.delete_scheduled(id)?;
            Ok(format!("deleted scheduled search {id}"))
        }
        (entity, verb) => unreachable!("no scaffold for {entity:?} {verb:?}"),
    }
}

/// Usage string for a scaffold, shown on argument mistakes.
#[must_use]
pub fn usage(entity: Entity, verb: Verb) -> &'static str {
    match (entity, verb) {
        (Entity::Macros, Verb::Create) => "usage: create <name> <expansion> [description...]",
        (Entity::Macros, Verb::Delete) => "usage: delete <macro-id>",
        (Entity::Kits, Verb::Info) => "usage: info <kit-id>",
        (Entity::Kits, Verb::Delete) => "usage: delete <kit-id>",
        (Entity::Dashboards, Verb::Delete) => "usage: delete <dashboard-id>",
        (Entity::Extractors, Verb::Create) => "usage: create <name> <tag> <expression>",
        (Entity::Extractors, Verb::Delete) => "usage: delete <extractor-id>",
        (Entity::Scheduled, Verb::Delete) => "usage: delete <scheduled-search-id>",
        _ => "this command takes no arguments",
    }
}

fn single_id<'t>(tokens: &'t [String], kind: &str) -> Result<&'t str> {
    match tokens {
        [id] => Ok(id.as_str()),
        _ => Err(TrawlError::invalid_arg(kind, "exactly one ID required")),
    }
}

/// Render rows as aligned columns under a header.
fn render_rows<I>(header: &[&str], rows: I) -> String
where
    I: Iterator<Item = Vec<String>>,
{
    let rows: Vec<Vec<String>> = rows.collect();
    if rows.is_empty() {
        return "no entries".to_string();
    }

    let mut widths: Vec<usize> = header.iter().map(|h| h.len()).collect();
    for row in &rows {
        for (i, cell) in row.iter().enumerate() {
            widths[i] = widths[i].max(cell.len());
        }
    }

    let fmt_row = |cells: Vec<String>| {
        cells
            .iter()
            .enumerate()
            .map(|(i, cell)| format!("{cell:<width$}", width = widths[i]))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let mut out = vec![fmt_row(header.iter().map(|h| (*h).to_string()).collect())];
    out.extend(rows.into_iter().map(fmt_row));
    out.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_render_rows_aligns_columns() {
        let rows = vec![
            vec!["1".to_string(), "short".to_string()],
            vec!["42".to_string(), "a-much-longer-name".to_string()],
        ];
        let out = render_rows(&["ID", "NAME"], rows.into_iter());
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "ID  NAME");
        assert_eq!(lines[1], "1   short");
        assert_eq!(lines[2], "42  a-much-longer-name");
    }

    #[test]
    fn test_render_rows_empty() {
        assert_eq!(render_rows(&["ID"], Vec::new().into_iter()), "no entries");
    }

    #[test]
    fn test_single_id() {
        let one = vec!["abc".to_string()];
        assert_eq!(single_id(&one, "kit").unwrap(), "abc");
        assert!(single_id(&[], "kit").is_err());
        let two = vec!["a".to_string(), "b".to_string()];
        assert!(single_id(&two, "kit").is_err());
    }
}
