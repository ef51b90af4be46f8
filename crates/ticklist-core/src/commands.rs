use std::io;

use anyhow::anyhow;
use chrono::{Local, Utc};
use ticklist_store::view::display_order;
use ticklist_store::{Outcome, Storage, TaskId, TaskStore};
use tracing::{debug, info, instrument, warn};

use crate::cli::Invocation;
use crate::render::Renderer;
use crate::shell;

pub fn known_command_names() -> Vec<&'static str> {
    vec![
        "add", "list", "edit", "done", "toggle", "delete", "shell", "help", "version",
    ]
}

/// Exact name, or the single known name starting with `token`.
pub fn expand_command_abbrev<'a>(token: &'a str, known: &[&'a str]) -> Option<&'a str> {
    if known.contains(&token) {
        return Some(token);
    }

    let mut matches = known.iter().copied().filter(|name| name.starts_with(token));
    let first = matches.next()?;
    if matches.next().is_some() {
        None
    } else {
        Some(first)
    }
}

#[instrument(skip(store, renderer, inv))]
pub fn dispatch<S: Storage>(
    store: &mut TaskStore<S>,
    renderer: &Renderer,
    inv: Invocation,
) -> anyhow::Result<()> {
    debug!(command = %inv.command, args = ?inv.args, "dispatching command");

    match inv.command.as_str() {
        "add" => cmd_add(store, renderer, &inv.args),
        "list" => cmd_list(store, renderer),
        "edit" => cmd_edit(store, renderer, &inv.args),
        "done" | "toggle" => cmd_toggle(store, renderer, &inv.args),
        "delete" => cmd_delete(store, renderer, &inv.args),
        "shell" => {
            let stdin = io::stdin();
            shell::run(store, renderer, stdin.lock(), io::stdout())
        }
        "help" => {
            print!("{}", help_text());
            Ok(())
        }
        "version" => {
            println!("{}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        other => Err(anyhow!("unknown command: {other}")),
    }
}

#[instrument(skip(store, renderer, args))]
fn cmd_add<S: Storage>(
    store: &mut TaskStore<S>,
    renderer: &Renderer,
    args: &[String],
) -> anyhow::Result<()> {
    info!("command add");

    let (title, due) = parse_title_and_due(args);
    let outcome = store.add_task(&title, due.as_deref().unwrap_or_default(), Utc::now())?;
    if let Outcome::Added(id) = outcome {
        debug!(id, count = store.tasks().len(), "task added");
    }
    report(renderer, &outcome)
}

#[instrument(skip(store, renderer))]
fn cmd_list<S: Storage>(store: &TaskStore<S>, renderer: &Renderer) -> anyhow::Result<()> {
    info!("command list");
    renderer.print_board(store.tasks(), Local::now().date_naive())
}

#[instrument(skip(store, renderer, args))]
fn cmd_edit<S: Storage>(
    store: &mut TaskStore<S>,
    renderer: &Renderer,
    args: &[String],
) -> anyhow::Result<()> {
    info!("command edit");

    let (selector, rest) = args
        .split_first()
        .ok_or_else(|| anyhow!("edit requires a task selector"))?;
    let (title, due) = parse_title_and_due(rest);
    if title.is_empty() && due.is_none() {
        return Err(anyhow!("edit requires a new title or due:DATE"));
    }

    let id = resolve_selector(store, selector)?;
    let started = store.start_edit(id);
    if started != Outcome::EditStarted(id) {
        return report(renderer, &started);
    }

    let draft = store.form().clone();
    let title = if title.is_empty() { draft.title } else { title };
    let due = due.unwrap_or(draft.due_date);
    let outcome = store.commit_edit(id, &title, &due)?;
    report(renderer, &outcome)
}

#[instrument(skip(store, renderer, args))]
fn cmd_toggle<S: Storage>(
    store: &mut TaskStore<S>,
    renderer: &Renderer,
    args: &[String],
) -> anyhow::Result<()> {
    info!("command done");

    if args.is_empty() {
        return Err(anyhow!("done requires at least one task selector"));
    }
    let ids = resolve_selectors(store, args)?;
    for id in ids {
        let outcome = store.toggle_complete(id)?;
        report(renderer, &outcome)?;
    }
    Ok(())
}

#[instrument(skip(store, renderer, args))]
fn cmd_delete<S: Storage>(
    store: &mut TaskStore<S>,
    renderer: &Renderer,
    args: &[String],
) -> anyhow::Result<()> {
    info!("command delete");

    if args.is_empty() {
        return Err(anyhow!("delete requires at least one task selector"));
    }
    let ids = resolve_selectors(store, args)?;
    for id in ids {
        let outcome = store.delete_task(id)?;
        report(renderer, &outcome)?;
    }
    Ok(())
}

/// Prints the notice for `outcome`; unknown ids get a plain warning line.
pub fn report(renderer: &Renderer, outcome: &Outcome) -> anyhow::Result<()> {
    if let Outcome::NotFound(id) = outcome {
        warn!(id, "no task with that id");
        eprintln!("No task with id {id}.");
        return Ok(());
    }
    if let Some(notice) = outcome.notice() {
        renderer.print_notice(&notice)?;
    }
    Ok(())
}

/// Splits words into a title and an optional `due:` value (last one wins).
pub fn parse_title_and_due(args: &[String]) -> (String, Option<String>) {
    let mut words = Vec::with_capacity(args.len());
    let mut due = None;

    for arg in args {
        if let Some(value) = arg.strip_prefix("due:") {
            due = Some(value.to_string());
        } else {
            words.push(arg.as_str());
        }
    }

    (words.join(" ").trim().to_string(), due)
}

/// A selector is either the `#n` row position from the last listing (with or
/// without `#`) or a full task id. Ids are millisecond timestamps, so the two
/// ranges never overlap in practice.
pub fn resolve_selector<S: Storage>(store: &TaskStore<S>, token: &str) -> anyhow::Result<TaskId> {
    let digits = token.strip_prefix('#').unwrap_or(token);
    let value: u64 = digits
        .parse()
        .map_err(|_| anyhow!("invalid task selector: {token}"))?;

    let order = display_order(store.tasks());
    let position = usize::try_from(value).ok().filter(|p| (1..=order.len()).contains(p));
    match position {
        Some(position) => Ok(order[position - 1]),
        None => Ok(value),
    }
}

/// Resolves every selector against the current ordering before any mutation,
/// so positions refer to the listing the user saw.
fn resolve_selectors<S: Storage>(
    store: &TaskStore<S>,
    tokens: &[String],
) -> anyhow::Result<Vec<TaskId>> {
    tokens
        .iter()
        .map(|token| resolve_selector(store, token))
        .collect()
}

pub fn help_text() -> &'static str {
    "\
usage: ticklist [-v] [-q] [--rc KEY=VALUE] [--config PATH] [--data DIR] [COMMAND] [ARGS...]

commands:
  add <title...> due:<date>            add a task
  list                                 show tasks in progress and completed tasks
  edit <sel> [title...] [due:<date>]   change a task's title and/or due date
  done <sel>...                        toggle completion (alias: toggle)
  delete <sel>...                      delete tasks
  shell                                interactive session
  help | version

<sel> is a row number from `list` (e.g. 2 or #2) or a full task id.
"
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use ticklist_store::{MemoryStorage, Outcome, TaskStore};

    use super::{expand_command_abbrev, known_command_names, parse_title_and_due, resolve_selector};

    #[test]
    fn abbreviations_expand_only_when_unique() {
        let known = known_command_names();
        assert_eq!(expand_command_abbrev("a", &known), Some("add"));
        assert_eq!(expand_command_abbrev("del", &known), Some("delete"));
        assert_eq!(expand_command_abbrev("d", &known), None);
        assert_eq!(expand_command_abbrev("list", &known), Some("list"));
        assert_eq!(expand_command_abbrev("zzz", &known), None);
    }

    #[test]
    fn title_and_due_are_split() {
        let args: Vec<String> = ["Buy", "due:2024-01-01", "milk"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(
            parse_title_and_due(&args),
            ("Buy milk".to_string(), Some("2024-01-01".to_string()))
        );
        assert_eq!(parse_title_and_due(&[]), (String::new(), None));
    }

    #[test]
    fn selectors_accept_positions_and_ids() {
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap();
        let mut store = TaskStore::load(MemoryStorage::new(), "tasks").expect("load");
        let Outcome::Added(first) = store.add_task("a", "2024-01-01", now).expect("add") else {
            panic!("expected add");
        };
        let Outcome::Added(second) = store.add_task("b", "2024-01-01", now).expect("add") else {
            panic!("expected add");
        };
        store.toggle_complete(first).expect("toggle");

        assert_eq!(resolve_selector(&store, "1").expect("sel"), second);
        assert_eq!(resolve_selector(&store, "#2").expect("sel"), first);
        assert_eq!(
            resolve_selector(&store, &first.to_string()).expect("sel"),
            first
        );
        assert_eq!(resolve_selector(&store, "99").expect("sel"), 99);
        assert!(resolve_selector(&store, "x").is_err());
    }
}
