//! Line-driven session that keeps the shared create/edit form alive between
//! commands, the way the web widget does between clicks.

use std::io::{BufRead, Write};

use anyhow::anyhow;
use chrono::{Local, Utc};
use ticklist_store::{FormMode, Outcome, SaveFailed, Storage, TaskStore};
use tracing::{debug, instrument};

use crate::commands::resolve_selector;
use crate::render::Renderer;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

#[instrument(skip_all)]
pub fn run<S, R, W>(
    store: &mut TaskStore<S>,
    renderer: &Renderer,
    input: R,
    mut out: W,
) -> anyhow::Result<()>
where
    S: Storage,
    R: BufRead,
    W: Write,
{
    writeln!(out, "ticklist shell; type `help` for commands")?;
    write_prompt(store, &mut out)?;

    for line in input.lines() {
        let line = line?;
        match step(store, renderer, line.trim(), &mut out) {
            Ok(Flow::Quit) => break,
            Ok(Flow::Continue) => {}
            Err(err) => {
                if let Some(outcome) = SaveFailed::outcome_of(&err) {
                    write_outcome(renderer, outcome, &mut out)?;
                }
                writeln!(out, "error: {err:#}")?;
            }
        }
        write_prompt(store, &mut out)?;
    }

    writeln!(out)?;
    Ok(())
}

fn step<S: Storage, W: Write>(
    store: &mut TaskStore<S>,
    renderer: &Renderer,
    line: &str,
    out: &mut W,
) -> anyhow::Result<Flow> {
    let (command, rest) = line
        .split_once(char::is_whitespace)
        .map_or((line, ""), |(command, rest)| (command, rest.trim()));
    debug!(command, "shell command");

    let outcome = match command {
        "" => return Ok(Flow::Continue),
        "quit" | "exit" => return Ok(Flow::Quit),
        "help" => {
            write!(out, "{}", SHELL_HELP)?;
            return Ok(Flow::Continue);
        }
        "list" => {
            renderer.write_board(&mut *out, store.tasks(), Local::now().date_naive())?;
            return Ok(Flow::Continue);
        }
        "form" => {
            renderer.write_form(&mut *out, store.form())?;
            return Ok(Flow::Continue);
        }
        "title" => {
            store.set_title(rest);
            return Ok(Flow::Continue);
        }
        "due" => {
            store.set_due_date(rest);
            return Ok(Flow::Continue);
        }
        "submit" => store.submit(Utc::now())?,
        "cancel" => store.cancel_edit(),
        "edit" => {
            let id = resolve_selector(store, required(rest, "edit")?)?;
            let outcome = store.start_edit(id);
            if outcome == Outcome::EditStarted(id) {
                renderer.write_form(&mut *out, store.form())?;
            }
            outcome
        }
        "done" | "toggle" => {
            let id = resolve_selector(store, required(rest, "done")?)?;
            store.toggle_complete(id)?
        }
        "delete" => {
            let id = resolve_selector(store, required(rest, "delete")?)?;
            store.delete_task(id)?
        }
        other => return Err(anyhow!("unknown shell command: {other} (try `help`)")),
    };

    write_outcome(renderer, &outcome, out)?;
    Ok(Flow::Continue)
}

fn write_outcome<W: Write>(
    renderer: &Renderer,
    outcome: &Outcome,
    out: &mut W,
) -> anyhow::Result<()> {
    match outcome {
        Outcome::NotFound(id) => writeln!(out, "No task with id {id}.")?,
        Outcome::NotEditing => writeln!(out, "Not editing a task.")?,
        _ => {
            if let Some(notice) = outcome.notice() {
                renderer.write_notice(&mut *out, &notice)?;
            }
        }
    }
    Ok(())
}

fn required<'a>(rest: &'a str, command: &str) -> anyhow::Result<&'a str> {
    if rest.is_empty() {
        Err(anyhow!("{command} requires a task selector"))
    } else {
        Ok(rest)
    }
}

fn write_prompt<S: Storage, W: Write>(store: &TaskStore<S>, out: &mut W) -> anyhow::Result<()> {
    match store.form().mode {
        FormMode::Create => write!(out, "[add] > ")?,
        FormMode::Edit(id) => write!(out, "[edit {id}] > ")?,
    }
    out.flush()?;
    Ok(())
}

const SHELL_HELP: &str = "\
  title <text>     set the form title
  due <date>       set the form due date
  submit           Add Task / Update Task, depending on the form mode
  edit <sel>       load a task into the form
  cancel           leave edit mode without saving
  done <sel>       toggle completion
  delete <sel>     delete a task
  list             show tasks
  form             show the form
  quit
";
