//! Confirmation dialogs for the two destructive operations.
//!
//! These dialogs hold only display data; the `y`/`n`/`Esc` key handling is
//! mode-global and lives in the keyboard handler.

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Widget, Wrap},
};

/// State for the delete-worktree confirmation.
#[derive(Debug, Clone)]
pub struct ConfirmDeleteWorktreeState {
    pub worktree_name: String,
    pub branch: String,
}

/// State for the delete-repository confirmation.
#[derive(Debug, Clone)]
pub struct ConfirmDeleteRepoState {
    pub repo_name: String,
}

fn centered(total: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(total.width.saturating_sub(4));
    let height = height.min(total.height.saturating_sub(4));
    let x = (total.width.saturating_sub(width)) / 2;
    let y = (total.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width, height)
}

fn render_confirm(area: Rect, buf: &mut Buffer, title: &str, warning: &str, detail: &str) {
    if area.width < 24 || area.height < 6 {
        return;
    }

    Clear.render(area, buf);

    let block = Block::default()
        .title(title.to_string())
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Red));
    let inner = block.inner(area);
    block.render(area, buf);

    let body = Paragraph::new(vec![
        Line::from(Span::raw(warning.to_string())),
        Line::from(""),
        Line::from(Span::styled(
            detail.to_string(),
            Style::default().fg(Color::Yellow),
        )),
    ])
    .wrap(Wrap { trim: true });
    let body_area = Rect::new(inner.x, inner.y, inner.width, inner.height.saturating_sub(1));
    body.render(body_area, buf);

    let help = Paragraph::new(Line::from(vec![
        Span::styled(
            " y ",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ),
        Span::raw("confirm "),
        Span::styled(
            " n/Esc ",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ),
        Span::raw("cancel"),
    ]))
    .style(Style::default().fg(Color::DarkGray))
    .alignment(Alignment::Center);
    let help_area = Rect::new(inner.x, inner.bottom().saturating_sub(1), inner.width, 1);
    help.render(help_area, buf);
}

/// Widget for the delete-worktree confirmation.
pub struct ConfirmDeleteWorktreeModal<'a> {
    state: &'a ConfirmDeleteWorktreeState,
}

impl<'a> ConfirmDeleteWorktreeModal<'a> {
    pub fn new(state: &'a ConfirmDeleteWorktreeState) -> Self {
        Self { state }
    }

    pub fn calculate_area(total: Rect) -> Rect {
        centered(total, 56, 9)
    }
}

impl Widget for ConfirmDeleteWorktreeModal<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        render_confirm(
            area,
            buf,
            " Confirm Delete ",
            &format!(
                "Delete worktree '{}' and branch '{}'?",
                self.state.worktree_name, self.state.branch
            ),
            "The branch is deleted even if unmerged.",
        );
    }
}

/// Widget for the delete-repository confirmation.
pub struct ConfirmDeleteRepoModal<'a> {
    state: &'a ConfirmDeleteRepoState,
}

impl<'a> ConfirmDeleteRepoModal<'a> {
    pub fn new(state: &'a ConfirmDeleteRepoState) -> Self {
        Self { state }
    }

    pub fn calculate_area(total: Rect) -> Rect {
        centered(total, 60, 9)
    }
}

impl Widget for ConfirmDeleteRepoModal<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        render_confirm(
            area,
            buf,
            " Confirm Delete Repository ",
            &format!(
                "Delete repository '{}' with all its worktrees and branches?",
                self.state.repo_name
            ),
            "The repository directory is removed from disk.",
        );
    }
}
