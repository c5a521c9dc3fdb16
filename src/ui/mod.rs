//! Terminal UI: layout, panels, dialogs and toasts.

pub mod editor;
pub mod modal;
pub mod panes;
pub mod toast;

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::app::{App, Mode, Pane};

use editor::EditorModal;
use modal::{
    AddRepoModal, AddWorktreeModal, ConfirmDeleteRepoModal, ConfirmDeleteWorktreeModal,
};
use panes::{ReposPanel, WorktreesPanel};
use toast::render_toasts;

/// Split the frame: panels over a one-line help bar, panels 40/60.
fn create_layout(area: Rect) -> (Rect, Rect, Rect) {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(area);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(vertical[0]);

    (horizontal[0], horizontal[1], vertical[1])
}

pub fn draw_ui(frame: &mut Frame, app: &App) {
    let area = frame.area();
    if area.width < 40 || area.height < 10 {
        frame.render_widget(
            Paragraph::new("Terminal too small. Please resize."),
            area,
        );
        return;
    }

    let (repos_area, worktrees_area, help_area) = create_layout(area);

    let has_script: Vec<bool> = app
        .config
        .repositories
        .iter()
        .map(|r| app.store.has_repo_script(&r.name))
        .collect();
    frame.render_widget(
        ReposPanel {
            repositories: &app.config.repositories,
            has_script: &has_script,
            selected: app.selected_repo,
            active: app.pane == Pane::Repos,
        },
        repos_area,
    );

    let repo_name = app.selected_repository().map(|r| r.name.clone());
    let note = match (app.selected_repository(), app.selected_worktree_entry()) {
        (Some(repo), Some(wt)) => app
            .store
            .worktree_note(&repo.name, &wt.name)
            .unwrap_or_default(),
        _ => String::new(),
    };
    frame.render_widget(
        WorktreesPanel {
            worktrees: &app.worktrees,
            selected: app.selected_worktree,
            active: app.pane == Pane::Worktrees,
            repo_name: repo_name.as_deref(),
            note: &note,
        },
        worktrees_area,
    );

    draw_help_bar(frame, help_area);

    if !app.toasts.is_empty() {
        render_toasts(frame, area, &app.toasts);
    }

    // Dialogs render last, on top of everything
    match &app.mode {
        Mode::Normal => {}
        Mode::AddRepo(state) => {
            let modal_area = AddRepoModal::calculate_area(area);
            frame.render_widget(AddRepoModal::new(state), modal_area);
        }
        Mode::AddWorktree(state) => {
            let modal_area = AddWorktreeModal::calculate_area(area);
            frame.render_widget(AddWorktreeModal::new(state), modal_area);
        }
        Mode::ConfirmDeleteWorktree(state) => {
            let modal_area = ConfirmDeleteWorktreeModal::calculate_area(area);
            frame.render_widget(ConfirmDeleteWorktreeModal::new(state), modal_area);
        }
        Mode::ConfirmDeleteRepo(state) => {
            let modal_area = ConfirmDeleteRepoModal::calculate_area(area);
            frame.render_widget(ConfirmDeleteRepoModal::new(state), modal_area);
        }
        Mode::EditNotes(state) | Mode::EditScript(state) => {
            let modal_area = EditorModal::calculate_area(area);
            frame.render_widget(EditorModal::new(state), modal_area);
        }
    }
}

fn draw_help_bar(frame: &mut Frame, area: Rect) {
    let entries: &[(&str, &str)] = &[
        ("j/k", "nav"),
        ("Tab", "pane"),
        ("+", "add"),
        ("-", "delete"),
        ("n", "notes"),
        ("s", "script"),
        ("y", "yank"),
        ("Enter", "open"),
        ("q", "quit"),
    ];
    let mut spans = Vec::new();
    for (keys, action) in entries {
        spans.push(Span::styled(
            format!(" {} ", keys),
            Style::default().fg(Color::Cyan),
        ));
        spans.push(Span::raw(format!("{} ", action)));
    }
    frame.render_widget(
        Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::DarkGray)),
        area,
    );
}
