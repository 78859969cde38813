//! Terminal rendering of a [`ListView`].
//!
//! Task text is only ever written through `LiteralText`'s `Display`, so
//! stored text cannot emit terminal control sequences.

use kvtodo_core::{ListView, StatusNotice, TaskFilter, TaskRow};

const EMPTY_STATE: &str = "  No todos to show.";

/// Renders one full frame: filter selector, rows, footer.
pub fn render_list(view: &ListView) -> Vec<String> {
    let mut lines = Vec::with_capacity(view.rows.len() + 3);
    lines.push(render_filter_bar(view.filter));

    if view.is_empty() {
        lines.push(EMPTY_STATE.to_string());
    } else {
        lines.extend(view.rows.iter().map(render_row));
    }

    let clear = if view.clear_enabled() {
        format!("clear completed ({})", view.completed)
    } else {
        "clear completed (disabled)".to_string()
    };
    lines.push(format!("{} | {}", view.remaining_label(), clear));
    lines
}

/// Renders the inline edit field for one row.
pub fn render_edit_prompt(row: &TaskRow) -> Vec<String> {
    vec![
        format!("Editing #{}: {}", row.id, row.text),
        "Enter the new text to save, or `:cancel` to discard.".to_string(),
    ]
}

pub fn render_status(notice: &StatusNotice) -> String {
    notice.to_string()
}

fn render_filter_bar(active: TaskFilter) -> String {
    let labels: Vec<String> = TaskFilter::ALL
        .iter()
        .map(|filter| {
            if *filter == active {
                format!("[{filter}]")
            } else {
                filter.to_string()
            }
        })
        .collect();
    format!("Filter: {}", labels.join(" "))
}

fn render_row(row: &TaskRow) -> String {
    let checkbox = if row.completed { "[x]" } else { "[ ]" };
    format!("  {checkbox} #{} {}", row.id, row.text)
}
