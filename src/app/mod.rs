//! Application state: the repository/worktree lists, the selection cursor
//! pair, and the interaction mode.

mod actions;
mod navigation;
mod state;

use tracing::warn;

use crate::config::{Config, ConfigStore, Repository};
use crate::git::{self, Worktree};
use crate::ui::editor::EditorState;
use crate::ui::modal::{
    AddRepoDialogState, AddWorktreeDialogState, ConfirmDeleteRepoState, ConfirmDeleteWorktreeState,
};
use crate::ui::toast::{ToastKind, ToastManager};

pub use state::{clamp_cursor, wrap_next, wrap_prev, Pane};

/// Interaction mode — a closed set of states with per-state key routing.
/// Transitions only go Normal -> dialog/editor and back.
pub enum Mode {
    Normal,
    AddRepo(Box<AddRepoDialogState>),
    AddWorktree(Box<AddWorktreeDialogState>),
    ConfirmDeleteWorktree(ConfirmDeleteWorktreeState),
    ConfirmDeleteRepo(ConfirmDeleteRepoState),
    EditNotes(Box<EditorState>),
    EditScript(Box<EditorState>),
}

/// Application state
pub struct App {
    /// Handle to the on-disk config/notes/scripts store
    pub store: ConfigStore,
    pub config: Config,
    /// Worktrees of the selected repository, re-derived from git after every
    /// mutation; element 0 is the primary worktree
    pub worktrees: Vec<Worktree>,
    pub selected_repo: usize,
    pub selected_worktree: usize,
    pub pane: Pane,
    pub mode: Mode,
    pub toasts: ToastManager,
    pub should_quit: bool,
}

impl App {
    pub fn new(store: ConfigStore, config: Config) -> Self {
        let mut app = Self {
            store,
            config,
            worktrees: Vec::new(),
            selected_repo: 0,
            selected_worktree: 0,
            pane: Pane::Repos,
            mode: Mode::Normal,
            toasts: ToastManager::new(),
            should_quit: false,
        };
        app.reload_worktrees();
        app
    }

    /// The selected repository, if any.
    pub fn selected_repository(&self) -> Option<&Repository> {
        self.config.repositories.get(self.selected_repo)
    }

    /// The selected worktree, if any.
    pub fn selected_worktree_entry(&self) -> Option<&Worktree> {
        self.worktrees.get(self.selected_worktree)
    }

    /// Re-derive the worktree list from git for the selected repository and
    /// clamp the worktree cursor. A repository whose path is gone, or a git
    /// failure, degrades to an empty list — browsing must stay possible.
    pub fn reload_worktrees(&mut self) {
        self.worktrees = match self.selected_repository() {
            Some(repo) if repo.path.exists() => match git::list_worktrees(&repo.path) {
                Ok(wts) => wts,
                Err(e) => {
                    warn!(repo = %repo.name, error = %e, "failed to list worktrees");
                    Vec::new()
                }
            },
            _ => Vec::new(),
        };
        self.selected_worktree = clamp_cursor(self.selected_worktree, self.worktrees.len());
    }

    pub fn is_dialog_open(&self) -> bool {
        !matches!(self.mode, Mode::Normal)
    }

    pub fn toast_info(&mut self, message: impl Into<String>) {
        self.toasts.push(message, ToastKind::Info);
    }

    pub fn toast_success(&mut self, message: impl Into<String>) {
        self.toasts.push(message, ToastKind::Success);
    }

    pub fn toast_warning(&mut self, message: impl Into<String>) {
        self.toasts.push(message, ToastKind::Warning);
    }

    pub fn toast_error(&mut self, message: impl Into<String>) {
        self.toasts.push(message, ToastKind::Error);
    }
}
