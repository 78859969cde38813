//! Interactive line-oriented session over one [`TodoController`].
//!
//! # Responsibility
//! - Parse one input line into a list action and apply it.
//! - Track inline edit mode for a single row.
//! - Re-render the list after every action.
//!
//! # Invariants
//! - Output is returned as lines; the session never touches stdin/stdout.
//! - While editing, the next line commits or cancels; blank commits keep
//!   edit mode open.

use crate::render::{render_edit_prompt, render_list, render_status};
use kvtodo_core::{
    normalize_task_text, KvGateway, LiteralText, StatusNotice, TaskFilter, TaskId, TaskRow,
    TodoController,
};

pub const LOADING_INDICATOR: &str = "Loading todos...";
const CANCEL_EDIT: &str = ":cancel";
const ESCAPE: &str = "\u{1b}";

const HELP: &[&str] = &[
    "Commands:",
    "  add <text>                     add a todo",
    "  toggle <id>                    mark done / not done",
    "  edit <id> [text]               edit inline, or replace text directly",
    "  delete <id>                    remove a todo",
    "  filter <all|active|completed>  change the visible selection",
    "  clear                          remove all completed todos",
    "  list                           show the list again",
    "  help                           show this help",
    "  quit                           leave",
];

/// One parsed input line.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    Add(String),
    Toggle(TaskId),
    Edit(TaskId, Option<String>),
    Delete(TaskId),
    Filter(TaskFilter),
    Clear,
    List,
    Help,
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Browse,
    Editing(TaskId),
}

/// Output of handling one line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reply {
    pub lines: Vec<String>,
    pub quit: bool,
}

impl Reply {
    fn lines(lines: Vec<String>) -> Self {
        Self { lines, quit: false }
    }
}

pub struct Session<G: KvGateway> {
    controller: TodoController<G>,
    mode: Mode,
}

impl<G: KvGateway> Session<G> {
    pub fn new(controller: TodoController<G>) -> Self {
        Self {
            controller,
            mode: Mode::Browse,
        }
    }

    /// Loads stored state and renders the first frame.
    pub fn start(&mut self) -> Vec<String> {
        let notice = self.controller.load();
        self.frame(Some(&notice))
    }

    pub fn prompt(&self) -> &'static str {
        match self.mode {
            Mode::Browse => "> ",
            Mode::Editing(_) => "edit> ",
        }
    }

    #[cfg(test)]
    pub fn controller(&self) -> &TodoController<G> {
        &self.controller
    }

    pub fn handle_line(&mut self, line: &str) -> Reply {
        if let Mode::Editing(id) = self.mode {
            return Reply::lines(self.commit_edit(id, line));
        }

        let command = match parse_command(line) {
            Ok(Some(command)) => command,
            Ok(None) => return Reply::default(),
            Err(message) => {
                return Reply::lines(vec![render_status(&StatusNotice::error(message))]);
            }
        };

        match command {
            Command::Quit => Reply {
                lines: Vec::new(),
                quit: true,
            },
            Command::Help => Reply::lines(HELP.iter().map(|line| (*line).to_string()).collect()),
            Command::List => Reply::lines(self.frame(None)),
            Command::Add(text) => {
                let notice = self.controller.add(&text);
                Reply::lines(self.frame(Some(&notice)))
            }
            Command::Toggle(id) => {
                let notice = self
                    .controller
                    .toggle(id)
                    .unwrap_or_else(|| not_found(id));
                Reply::lines(self.frame(Some(&notice)))
            }
            Command::Delete(id) => {
                let notice = self.controller.remove(id);
                Reply::lines(self.frame(Some(&notice)))
            }
            Command::Filter(filter) => {
                self.controller.set_filter(filter);
                Reply::lines(self.frame(None))
            }
            Command::Clear => {
                let outcome = self.controller.clear_completed();
                Reply::lines(self.frame(Some(&outcome.notice)))
            }
            Command::Edit(id, Some(text)) => {
                let notice = self
                    .controller
                    .edit(id, &text)
                    .unwrap_or_else(|| not_found(id));
                Reply::lines(self.frame(Some(&notice)))
            }
            Command::Edit(id, None) => Reply::lines(self.begin_edit(id)),
        }
    }

    fn begin_edit(&mut self, id: TaskId) -> Vec<String> {
        let Some(row) = self.find_row(id) else {
            return vec![render_status(&not_found(id))];
        };
        self.mode = Mode::Editing(id);
        render_edit_prompt(&row)
    }

    fn commit_edit(&mut self, id: TaskId, line: &str) -> Vec<String> {
        let trimmed = line.trim();
        if trimmed == CANCEL_EDIT || trimmed == ESCAPE {
            self.mode = Mode::Browse;
            return self.frame(None);
        }

        let blank = normalize_task_text(line).is_err();
        match self.controller.edit(id, line) {
            Some(notice) if blank => vec![render_status(&notice)],
            Some(notice) => {
                self.mode = Mode::Browse;
                self.frame(Some(&notice))
            }
            None => {
                self.mode = Mode::Browse;
                self.frame(Some(&not_found(id)))
            }
        }
    }

    fn find_row(&self, id: TaskId) -> Option<TaskRow> {
        self.controller
            .tasks()
            .iter()
            .find(|task| task.id == id)
            .map(|task| TaskRow {
                id: task.id,
                text: LiteralText::new(task.text.as_str()),
                completed: task.completed,
            })
    }

    fn frame(&self, notice: Option<&StatusNotice>) -> Vec<String> {
        let mut lines = render_list(&self.controller.view());
        if let Some(notice) = notice {
            lines.push(render_status(notice));
        }
        lines
    }
}

fn not_found(id: TaskId) -> StatusNotice {
    StatusNotice::error(format!("No todo with id {id}"))
}

fn parse_command(line: &str) -> Result<Option<Command>, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (name, rest) = line
        .split_once(char::is_whitespace)
        .map_or((line, ""), |(name, rest)| (name, rest.trim()));

    let command = match name.to_ascii_lowercase().as_str() {
        "add" | "a" => Command::Add(rest.to_string()),
        "toggle" | "t" => Command::Toggle(parse_id(rest)?),
        "delete" | "del" | "rm" => Command::Delete(parse_id(rest)?),
        "edit" | "e" => {
            let (id, text) = rest
                .split_once(char::is_whitespace)
                .map_or((rest, None), |(id, text)| (id, Some(text.to_string())));
            Command::Edit(parse_id(id)?, text)
        }
        "filter" | "f" => Command::Filter(
            rest.parse::<TaskFilter>()
                .map_err(|err| err.to_string())?,
        ),
        "clear" => Command::Clear,
        "list" | "ls" => Command::List,
        "help" | "?" => Command::Help,
        "quit" | "exit" | "q" => Command::Quit,
        other => return Err(format!("Unknown command `{other}`; type `help`")),
    };
    Ok(Some(command))
}

fn parse_id(value: &str) -> Result<TaskId, String> {
    value
        .trim()
        .trim_start_matches('#')
        .parse::<TaskId>()
        .map_err(|_| format!("Invalid todo id `{}`", value.trim()))
}
