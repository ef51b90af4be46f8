use std::io::{self, IsTerminal, Write};

use anyhow::anyhow;
use chrono::NaiveDate;
use ticklist_store::view::{Section, partition};
use ticklist_store::{Form, FormMode, Level, Notice, Task};
use unicode_width::UnicodeWidthStr;

use crate::config::Config;

#[derive(Debug, Clone)]
pub struct Renderer {
    color: bool,
}

impl Renderer {
    pub fn new(cfg: &Config) -> anyhow::Result<Self> {
        let color_cfg = cfg.get("color").unwrap_or_else(|| "on".to_string());
        let color = match color_cfg.to_ascii_lowercase().as_str() {
            "on" | "yes" | "true" | "1" => io::stdout().is_terminal(),
            "off" | "no" | "false" | "0" => false,
            other => return Err(anyhow!("invalid color setting: {other}")),
        };

        Ok(Self { color })
    }

    pub fn plain() -> Self {
        Self { color: false }
    }

    #[tracing::instrument(skip(self, tasks))]
    pub fn print_board(&self, tasks: &[Task], today: NaiveDate) -> anyhow::Result<()> {
        let out = io::stdout().lock();
        self.write_board(out, tasks, today)
    }

    /// Both sections, incomplete first. Row numbers continue across sections
    /// so `#n` is a stable selector for the listing just printed.
    pub fn write_board<W: Write>(
        &self,
        mut out: W,
        tasks: &[Task],
        today: NaiveDate,
    ) -> anyhow::Result<()> {
        let (incomplete, completed) = partition(tasks);
        let mut position = 1usize;

        for (section, group) in [
            (Section::Incomplete, incomplete),
            (Section::Completed, completed),
        ] {
            let heading = match section {
                Section::Incomplete => self.paint(section.heading(), "1;33"),
                Section::Completed => self.paint(section.heading(), "1;32"),
            };
            writeln!(out, "{heading}")?;

            if group.is_empty() {
                writeln!(out, "{}", section.empty_placeholder())?;
                writeln!(out)?;
                continue;
            }

            let mut rows = Vec::with_capacity(group.len());
            for task in group {
                rows.push(self.task_row(position, task, today));
                position += 1;
            }

            let headers = vec![
                "#".to_string(),
                "".to_string(),
                "Title".to_string(),
                "Due".to_string(),
                "ID".to_string(),
            ];
            write_table(&mut out, headers, rows)?;
            writeln!(out)?;
        }

        Ok(())
    }

    fn task_row(&self, position: usize, task: &Task, today: NaiveDate) -> Vec<String> {
        let checkbox = if task.is_completed { "[x]" } else { "[ ]" };

        let title = if task.is_completed {
            self.paint(&task.title, "2;9")
        } else {
            task.title.clone()
        };

        let due = format!("({})", task.due_date);
        let due = if !task.is_completed && is_overdue(&task.due_date, today) {
            self.paint(&due, "31")
        } else {
            self.paint(&due, "90")
        };

        vec![
            self.paint(&position.to_string(), "33"),
            checkbox.to_string(),
            title,
            due,
            task.id.to_string(),
        ]
    }

    /// Success and info go to stdout, errors to stderr.
    pub fn print_notice(&self, notice: &Notice) -> anyhow::Result<()> {
        if notice.level == Level::Error {
            self.write_notice(io::stderr().lock(), notice)
        } else {
            self.write_notice(io::stdout().lock(), notice)
        }
    }

    pub fn write_notice<W: Write>(&self, mut out: W, notice: &Notice) -> anyhow::Result<()> {
        let code = match notice.level {
            Level::Success => "32",
            Level::Error => "31",
            Level::Info => "34",
        };
        writeln!(out, "{}", self.paint(&notice.message, code))?;
        Ok(())
    }

    pub fn write_form<W: Write>(&self, mut out: W, form: &Form) -> anyhow::Result<()> {
        match form.mode {
            FormMode::Create => writeln!(out, "mode      create")?,
            FormMode::Edit(id) => writeln!(out, "mode      edit {id}")?,
        }
        writeln!(out, "title     {}", form.title)?;
        writeln!(out, "due       {}", form.due_date)?;
        writeln!(out, "submit    {}", form.submit_label())?;
        Ok(())
    }

    fn paint(&self, text: &str, code: &str) -> String {
        if !self.color {
            return text.to_string();
        }
        format!("\x1b[{code}m{text}\x1b[0m")
    }
}

/// Only `YYYY-MM-DD` due dates are compared; anything else is never overdue.
pub fn is_overdue(due_date: &str, today: NaiveDate) -> bool {
    NaiveDate::parse_from_str(due_date.trim(), "%Y-%m-%d")
        .map(|due| due < today)
        .unwrap_or(false)
}

fn write_table<W: Write>(
    mut writer: W,
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
) -> anyhow::Result<()> {
    let mut widths: Vec<usize> = headers
        .iter()
        .map(|header| UnicodeWidthStr::width(header.as_str()))
        .collect();

    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(UnicodeWidthStr::width(strip_ansi(cell).as_str()));
        }
    }

    let header_line: Vec<String> = headers
        .iter()
        .zip(&widths)
        .map(|(header, width)| format!("{header:width$}"))
        .collect();
    writeln!(writer, "{}", header_line.join(" ").trim_end())?;

    let rule: Vec<String> = widths.iter().map(|width| "-".repeat(*width)).collect();
    writeln!(writer, "{}", rule.join(" "))?;

    for row in rows {
        let cells: Vec<String> = row
            .iter()
            .zip(&widths)
            .map(|(cell, width)| {
                let visible = UnicodeWidthStr::width(strip_ansi(cell).as_str());
                format!("{cell}{}", " ".repeat(width.saturating_sub(visible)))
            })
            .collect();
        writeln!(writer, "{}", cells.join(" ").trim_end())?;
    }

    Ok(())
}

fn strip_ansi(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut escaped = false;

    for ch in s.chars() {
        if escaped {
            if ch == 'm' {
                escaped = false;
            }
            continue;
        }

        if ch == '\x1b' {
            escaped = true;
            continue;
        }

        out.push(ch);
    }

    out
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use ticklist_store::{Form, FormMode, Task};

    use super::{Renderer, is_overdue, strip_ansi};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 10).unwrap()
    }

    #[test]
    fn board_lists_sections_with_continuous_positions() {
        let tasks = vec![
            Task {
                id: 11,
                title: "Buy milk".to_string(),
                due_date: "2024-01-01".to_string(),
                is_completed: true,
            },
            Task::new_incomplete(22, "Call mum".to_string(), "2024-02-01".to_string()),
        ];

        let mut out = Vec::new();
        Renderer::plain()
            .write_board(&mut out, &tasks, today())
            .expect("render");
        let text = String::from_utf8(out).expect("utf8");

        let progress = text.find("Tasks in Progress").expect("progress heading");
        let done = text.find("Completed Tasks").expect("completed heading");
        assert!(progress < done);
        assert!(text.contains("1 [ ] Call mum (2024-02-01) 22"));
        assert!(text.contains("2 [x] Buy milk (2024-01-01) 11"));
    }

    #[test]
    fn empty_board_shows_placeholders() {
        let mut out = Vec::new();
        Renderer::plain()
            .write_board(&mut out, &[], today())
            .expect("render");
        let text = String::from_utf8(out).expect("utf8");
        assert!(text.contains("No task at hand"));
        assert!(text.contains("No completed task for now"));
    }

    #[test]
    fn form_shows_submit_label_for_mode() {
        let form = Form {
            title: "x".to_string(),
            due_date: "2024-01-01".to_string(),
            mode: FormMode::Edit(5),
        };
        let mut out = Vec::new();
        Renderer::plain().write_form(&mut out, &form).expect("render");
        let text = String::from_utf8(out).expect("utf8");
        assert!(text.contains("mode      edit 5"));
        assert!(text.contains("submit    Update Task"));
    }

    #[test]
    fn overdue_only_for_parseable_past_dates() {
        assert!(is_overdue("2024-01-09", today()));
        assert!(!is_overdue("2024-01-10", today()));
        assert!(!is_overdue("next friday", today()));
        assert_eq!(strip_ansi("\x1b[31mred\x1b[0m"), "red");
    }
}
