//! The two list panels: repositories (left) and worktrees (right).

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget, Wrap},
};

use crate::config::Repository;
use crate::git::Worktree;

fn panel_block(title: &str, active: bool) -> Block<'static> {
    let border = if active {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    Block::default()
        .title(format!(" {} ", title))
        .borders(Borders::ALL)
        .border_style(border)
}

fn selection_style(selected: bool, active: bool) -> Style {
    if selected && active {
        Style::default()
            .fg(Color::Black)
            .bg(Color::Cyan)
            .add_modifier(Modifier::BOLD)
    } else if selected {
        Style::default().add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    }
}

/// Left panel: the registered repositories.
pub struct ReposPanel<'a> {
    pub repositories: &'a [Repository],
    /// Parallel to `repositories`: whether a post-create script is stored
    pub has_script: &'a [bool],
    pub selected: usize,
    pub active: bool,
}

impl Widget for ReposPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = panel_block("Repositories", self.active);
        let inner = block.inner(area);
        block.render(area, buf);

        if self.repositories.is_empty() {
            Paragraph::new(vec![
                Line::from(Span::styled(
                    "No repositories yet",
                    Style::default().fg(Color::DarkGray),
                )),
                Line::from(Span::styled(
                    "Press '+' to add one",
                    Style::default().fg(Color::DarkGray),
                )),
            ])
            .render(inner, buf);
            return;
        }

        let visible_rows = inner.height as usize;
        let first = scroll_offset(self.selected, self.repositories.len(), visible_rows);

        for (screen_row, idx) in (first..self.repositories.len())
            .enumerate()
            .take(visible_rows)
        {
            let repo = &self.repositories[idx];
            let marker = if idx == self.selected { "> " } else { "  " };
            let script_tag = if self.has_script.get(idx).copied().unwrap_or(false) {
                " [s]"
            } else {
                ""
            };
            let line = format!("{}{} ({}){}", marker, repo.name, repo.kind, script_tag);
            let line_area = Rect::new(inner.x, inner.y + screen_row as u16, inner.width, 1);
            Paragraph::new(Line::from(Span::styled(
                line,
                selection_style(idx == self.selected, self.active),
            )))
            .render(line_area, buf);
        }
    }
}

/// Right panel: the selected repository's worktrees plus the note preview.
pub struct WorktreesPanel<'a> {
    pub worktrees: &'a [Worktree],
    pub selected: usize,
    pub active: bool,
    pub repo_name: Option<&'a str>,
    /// Stored note of the selected worktree, empty when none
    pub note: &'a str,
}

/// Longest note preview shown under the list.
const NOTE_PREVIEW_LEN: usize = 200;

impl Widget for WorktreesPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let title = match self.repo_name {
            Some(name) => format!("Worktrees — {}", name),
            None => "Worktrees".to_string(),
        };
        let block = panel_block(&title, self.active);
        let inner = block.inner(area);
        block.render(area, buf);

        if self.worktrees.is_empty() {
            let hint = if self.repo_name.is_none() {
                "Select a repository first"
            } else {
                "No worktrees yet — press '+' to add one"
            };
            Paragraph::new(Line::from(Span::styled(
                hint,
                Style::default().fg(Color::DarkGray),
            )))
            .render(inner, buf);
            return;
        }

        // Reserve the bottom rows for the note preview
        let note_rows: u16 = if inner.height > 6 { 3 } else { 0 };
        let list_area = Rect::new(
            inner.x,
            inner.y,
            inner.width,
            inner.height.saturating_sub(note_rows),
        );

        let visible_rows = list_area.height as usize;
        let first = scroll_offset(self.selected, self.worktrees.len(), visible_rows);

        for (screen_row, idx) in (first..self.worktrees.len())
            .enumerate()
            .take(visible_rows)
        {
            let wt = &self.worktrees[idx];
            let marker = if idx == self.selected { "> " } else { "  " };
            let primary_tag = if idx == 0 { " (primary)" } else { "" };
            let line = format!("{}{} [{}]{}", marker, wt.name, wt.branch, primary_tag);
            let line_area = Rect::new(list_area.x, list_area.y + screen_row as u16, list_area.width, 1);
            Paragraph::new(Line::from(Span::styled(
                line,
                selection_style(idx == self.selected, self.active),
            )))
            .render(line_area, buf);
        }

        if note_rows > 0 {
            let note_area = Rect::new(
                inner.x,
                inner.bottom().saturating_sub(note_rows),
                inner.width,
                note_rows,
            );
            Paragraph::new(vec![
                Line::from(Span::styled(
                    "Notes:",
                    Style::default()
                        .fg(Color::DarkGray)
                        .add_modifier(Modifier::BOLD),
                )),
                Line::from(Span::styled(
                    note_preview(self.note),
                    Style::default()
                        .fg(Color::Gray)
                        .add_modifier(Modifier::ITALIC),
                )),
            ])
            .wrap(Wrap { trim: true })
            .render(note_area, buf);
        }
    }
}

/// First visible index so that `selected` stays on screen.
fn scroll_offset(selected: usize, len: usize, visible: usize) -> usize {
    if visible == 0 || len <= visible {
        0
    } else if selected >= visible {
        (selected - visible + 1).min(len - visible)
    } else {
        0
    }
}

/// Flatten and truncate a note for the single-line preview.
fn note_preview(note: &str) -> String {
    if note.is_empty() {
        return "(no notes — press 'n' to add)".to_string();
    }
    let flat = note.replace('\n', " ");
    if flat.len() > NOTE_PREVIEW_LEN {
        format!("{}...", &flat[..NOTE_PREVIEW_LEN])
    } else {
        flat
    }
}
