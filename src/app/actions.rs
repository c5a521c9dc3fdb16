//! Lifecycle workflows: everything a committed dialog or a Normal-mode
//! action key performs against git, the filesystem and the store.

use std::path::PathBuf;

use tracing::{info, warn};

use crate::config::{RepoKind, Repository};
use crate::error::Error;
use crate::git::{self, ScriptVars};
use crate::naming::{sanitize, worktree_dir_name};
use crate::ui::editor::{EditTarget, EditorState};
use crate::ui::modal::{
    AddRepoDialogState, AddWorktreeDialogState, ConfirmDeleteRepoState, ConfirmDeleteWorktreeState,
};

use super::{clamp_cursor, App, Mode};

impl App {
    // =========================================================================
    // Dialog transitions (Normal -> dialog)
    // =========================================================================

    pub fn open_add_repo_dialog(&mut self) {
        self.mode = Mode::AddRepo(Box::new(AddRepoDialogState::default()));
    }

    pub fn open_add_worktree_dialog(&mut self) {
        let Some(repo) = self.selected_repository() else {
            return;
        };
        // Autocomplete is best-effort: a listing failure degrades to no
        // suggestions, never blocks the dialog
        let branches = git::list_branches(&repo.path).unwrap_or_default();
        self.mode = Mode::AddWorktree(Box::new(AddWorktreeDialogState::new(
            repo.name.clone(),
            branches,
        )));
    }

    /// Open the delete-worktree confirmation. The primary worktree is
    /// rejected here, before any prompt is offered.
    pub fn open_confirm_delete_worktree(&mut self) {
        if self.selected_repository().is_none() || self.worktrees.is_empty() {
            return;
        }
        if self.selected_worktree == 0 {
            self.toast_warning("The primary worktree cannot be deleted");
            return;
        }
        let Some(wt) = self.selected_worktree_entry() else {
            return;
        };
        self.mode = Mode::ConfirmDeleteWorktree(ConfirmDeleteWorktreeState {
            worktree_name: wt.name.clone(),
            branch: wt.branch.clone(),
        });
    }

    pub fn open_confirm_delete_repo(&mut self) {
        let Some(repo) = self.selected_repository() else {
            return;
        };
        self.mode = Mode::ConfirmDeleteRepo(ConfirmDeleteRepoState {
            repo_name: repo.name.clone(),
        });
    }

    pub fn open_notes_editor(&mut self) {
        let (Some(repo), Some(wt)) = (self.selected_repository(), self.selected_worktree_entry())
        else {
            return;
        };
        let (repo_name, worktree_name) = (repo.name.clone(), wt.name.clone());
        let current = match self.store.worktree_note(&repo_name, &worktree_name) {
            Ok(text) => text,
            Err(e) => {
                self.toast_error(format!("Failed to load notes: {}", e));
                return;
            }
        };
        self.mode = Mode::EditNotes(Box::new(EditorState::new(
            EditTarget::Notes {
                repo_name,
                worktree_name,
            },
            &current,
        )));
    }

    pub fn open_script_editor(&mut self) {
        let Some(repo) = self.selected_repository() else {
            return;
        };
        let repo_name = repo.name.clone();
        let current = match self.store.repo_script(&repo_name) {
            Ok(text) => text,
            Err(e) => {
                self.toast_error(format!("Failed to load script: {}", e));
                return;
            }
        };
        self.mode = Mode::EditScript(Box::new(EditorState::new(
            EditTarget::Script { repo_name },
            &current,
        )));
    }

    /// Cancel whatever dialog or editor is open.
    pub fn cancel_dialog(&mut self) {
        self.mode = Mode::Normal;
    }

    // =========================================================================
    // Add repository
    // =========================================================================

    /// Commit the add-repository dialog. Validation failures keep the dialog
    /// open; external failures return to Normal with an error banner.
    pub fn commit_add_repo(&mut self) {
        let values = match &self.mode {
            Mode::AddRepo(dialog) => dialog.values(),
            _ => return,
        };
        let (name, kind, path_or_url) = match values {
            Ok(v) => v,
            Err(e) => {
                self.set_add_repo_error(e.to_string());
                return;
            }
        };

        if self.config.repo_names().any(|n| n == name) {
            self.set_add_repo_error("Repository with this name already exists".to_string());
            return;
        }

        let (path, url) = match kind {
            RepoKind::Local => {
                let path = PathBuf::from(&path_or_url);
                if !path.exists() {
                    self.set_add_repo_error("Path does not exist".to_string());
                    return;
                }
                (path, String::new())
            }
            RepoKind::Remote => {
                let target = self.config.root_directory.join(sanitize(&name));
                match git::clone(&path_or_url, &target) {
                    Ok(()) => {}
                    Err(Error::Validation(msg)) => {
                        self.set_add_repo_error(msg);
                        return;
                    }
                    Err(e) => {
                        // Clone failure aborts registration entirely
                        self.mode = Mode::Normal;
                        self.toast_error(format!("Failed to clone repository: {}", e));
                        return;
                    }
                }
                (target, path_or_url)
            }
        };

        self.config.repositories.push(Repository {
            name: name.clone(),
            path,
            kind,
            url,
        });
        if let Err(e) = self.store.save(&self.config) {
            self.mode = Mode::Normal;
            self.toast_error(format!("Failed to save config: {}", e));
            return;
        }

        self.selected_repo = self.config.repositories.len() - 1;
        self.selected_worktree = 0;
        self.reload_worktrees();
        self.mode = Mode::Normal;
        info!(repo = %name, "repository added");
        self.toast_success(format!("Repository '{}' added", name));
    }

    fn set_add_repo_error(&mut self, message: String) {
        if let Mode::AddRepo(ref mut dialog) = self.mode {
            dialog.error_message = Some(message);
        }
    }

    // =========================================================================
    // Add worktree
    // =========================================================================

    /// Commit the add-worktree dialog via the save key: validate the field,
    /// then run the creation workflow.
    pub fn commit_add_worktree_dialog(&mut self) {
        let branch = match &self.mode {
            Mode::AddWorktree(dialog) => dialog.validate(),
            _ => return,
        };
        match branch {
            Ok(branch) => self.commit_add_worktree(&branch),
            Err(e) => self.set_add_worktree_error(e.to_string()),
        }
    }

    /// Create a worktree for `branch` in the selected repository.
    ///
    /// The branch is created from a base reference only when it does not
    /// already exist: `origin/main` (falling back to `origin/master`) for
    /// remote repositories, the currently checked-out branch for local ones.
    pub fn commit_add_worktree(&mut self, branch: &str) {
        let Some(repo) = self.selected_repository().cloned() else {
            self.mode = Mode::Normal;
            self.toast_error("No repository selected");
            return;
        };

        let target = self
            .config
            .root_directory
            .join(worktree_dir_name(&repo.name, branch));
        if target.exists() {
            self.set_add_worktree_error(format!("Path already exists: {}", target.display()));
            return;
        }
        if let Err(e) = std::fs::create_dir_all(&self.config.root_directory) {
            self.mode = Mode::Normal;
            self.toast_error(format!("Failed to create root directory: {}", e));
            return;
        }

        let base = if git::branch_exists(&repo.path, branch) {
            None
        } else {
            match self.resolve_base_ref(&repo) {
                Ok(base) => Some(base),
                Err(e) => {
                    self.mode = Mode::Normal;
                    self.toast_error(format!("Failed to resolve base branch: {}", e));
                    return;
                }
            }
        };

        if let Err(e) = git::add_worktree(&repo.path, &target, branch, base.as_deref()) {
            self.mode = Mode::Normal;
            self.toast_error(format!("Failed to create worktree: {}", e));
            return;
        }

        // Reload from git rather than appending in memory, so the displayed
        // list always reflects ground truth
        match git::list_worktrees(&repo.path) {
            Ok(wts) => self.worktrees = wts,
            Err(e) => {
                self.mode = Mode::Normal;
                self.toast_error(format!("Failed to list worktrees: {}", e));
                return;
            }
        }
        if let Some(idx) = self.worktrees.iter().position(|wt| wt.branch == branch) {
            self.selected_worktree = idx;
        }

        self.mode = Mode::Normal;
        info!(repo = %repo.name, branch, "worktree created");

        // Post-create script runs after the reload; its failure is reported
        // but never undoes the worktree
        let script = match self.store.repo_script(&repo.name) {
            Ok(script) => script,
            Err(e) => {
                self.toast_error(format!("Worktree created, but loading its script failed: {}", e));
                return;
            }
        };
        if !script.is_empty() {
            let new_wt = self.worktrees.iter().find(|wt| wt.branch == branch).cloned();
            if let Some(wt) = new_wt {
                let wt_path = wt.path.to_string_lossy();
                let vars = ScriptVars {
                    repo_name: &repo.name,
                    branch,
                    worktree_path: &wt_path,
                    worktree_name: &wt.name,
                };
                if let Err(e) = git::run_post_create_script(&script, &vars, &wt.path) {
                    warn!(repo = %repo.name, branch, error = %e, "post-create script failed");
                    self.toast_error(format!("Worktree created but script failed: {}", e));
                    return;
                }
            }
        }

        self.toast_success(format!("Worktree '{}' created", branch));
    }

    /// Base reference for a branch that does not exist yet.
    fn resolve_base_ref(&self, repo: &Repository) -> crate::error::Result<String> {
        match repo.kind {
            RepoKind::Remote => {
                if git::remote_ref_exists(&repo.path, "origin/main") {
                    Ok("origin/main".to_string())
                } else {
                    Ok("origin/master".to_string())
                }
            }
            RepoKind::Local => git::current_branch(&repo.path),
        }
    }

    fn set_add_worktree_error(&mut self, message: String) {
        if let Mode::AddWorktree(ref mut dialog) = self.mode {
            dialog.error_message = Some(message);
        }
    }

    // =========================================================================
    // Delete worktree
    // =========================================================================

    /// Carry out a confirmed worktree deletion: remove the worktree, then
    /// force-delete its branch, then drop its note.
    ///
    /// Removal failure aborts the whole step; a branch-deletion failure after
    /// successful removal is tolerated (the worktree is already gone).
    pub fn confirm_delete_worktree(&mut self) {
        self.mode = Mode::Normal;

        let Some(repo) = self.selected_repository().cloned() else {
            self.toast_error("No repository selected");
            return;
        };
        // The selection may have raced with the listing; re-check both ends
        let Some(wt) = self.selected_worktree_entry().cloned() else {
            self.toast_error("No worktree selected");
            return;
        };
        if self.selected_worktree == 0 {
            self.toast_warning("The primary worktree cannot be deleted");
            return;
        }

        if let Err(e) = git::remove_worktree(&repo.path, &wt.path) {
            self.toast_error(format!("Failed to remove worktree: {}", e));
            return;
        }

        let mut branch_failure = None;
        if let Err(e) = git::delete_branch(&repo.path, &wt.branch) {
            warn!(repo = %repo.name, branch = %wt.branch, error = %e, "branch deletion failed");
            branch_failure = Some(e);
        }

        if let Err(e) = self.store.delete_worktree_note(&repo.name, &wt.name) {
            warn!(repo = %repo.name, worktree = %wt.name, error = %e, "note deletion failed");
        }

        self.reload_worktrees();
        info!(repo = %repo.name, worktree = %wt.name, "worktree deleted");
        match branch_failure {
            Some(e) => self.toast_warning(format!(
                "Worktree removed, but deleting branch '{}' failed: {}",
                wt.branch, e
            )),
            None => self.toast_success(format!("Worktree '{}' deleted", wt.name)),
        }
    }

    // =========================================================================
    // Delete repository
    // =========================================================================

    /// Carry out a confirmed repository deletion.
    ///
    /// Every non-primary worktree is removed first (branches best-effort); if
    /// any worktree removal fails the whole deletion aborts with the
    /// accumulated errors and the repository stays registered. Otherwise the
    /// repository directory, all notes, the script and the record go.
    pub fn confirm_delete_repository(&mut self) {
        self.mode = Mode::Normal;

        let Some(repo) = self.selected_repository().cloned() else {
            self.toast_error("No repository selected");
            return;
        };

        let worktrees = if repo.path.exists() {
            match git::list_worktrees(&repo.path) {
                Ok(wts) => wts,
                Err(e) => {
                    self.toast_error(format!(
                        "Failed to list worktrees: {}\nRepository kept.",
                        e
                    ));
                    return;
                }
            }
        } else {
            // Directory already gone; nothing to unwind
            Vec::new()
        };

        let mut failures = Vec::new();
        for wt in worktrees.iter().skip(1) {
            if let Err(e) = git::remove_worktree(&repo.path, &wt.path) {
                failures.push(format!("Failed to remove worktree '{}': {}", wt.name, e));
                continue;
            }
            // The worktree is gone and the whole directory is about to
            // follow, so a leftover branch is harmless
            if let Err(e) = git::delete_branch(&repo.path, &wt.branch) {
                warn!(repo = %repo.name, branch = %wt.branch, error = %e,
                    "branch deletion failed during repository removal");
            }
        }

        if !failures.is_empty() {
            self.toast_error(format!(
                "Errors during deletion:\n{}\nRepository kept.",
                failures.join("\n")
            ));
            return;
        }

        match git::delete_repository_dir(&repo.path) {
            Ok(()) | Err(Error::NotFound(_)) => {}
            Err(e) => {
                self.toast_error(format!(
                    "Failed to delete repository: {}\nRepository kept.",
                    e
                ));
                return;
            }
        }

        for wt in &worktrees {
            if let Err(e) = self.store.delete_worktree_note(&repo.name, &wt.name) {
                warn!(repo = %repo.name, worktree = %wt.name, error = %e, "note deletion failed");
            }
        }
        if let Err(e) = self.store.delete_repo_script(&repo.name) {
            warn!(repo = %repo.name, error = %e, "script deletion failed");
        }

        self.config.repositories.remove(self.selected_repo);
        if let Err(e) = self.store.save(&self.config) {
            self.toast_error(format!("Failed to save config: {}", e));
            return;
        }

        self.selected_repo = clamp_cursor(self.selected_repo, self.config.repositories.len());
        self.selected_worktree = 0;
        self.reload_worktrees();
        info!(repo = %repo.name, "repository deleted");
        self.toast_success(format!("Repository '{}' deleted", repo.name));
    }

    // =========================================================================
    // Yank, open script, inline edits
    // =========================================================================

    /// The yank template filled in for the selected worktree, or `None` when
    /// nothing is selected. Pure text transform; no git involved.
    pub fn yank_text(&self) -> Option<String> {
        let repo = self.selected_repository()?;
        let wt = self.selected_worktree_entry()?;

        let template = if self.config.yank_template.trim().is_empty() {
            "${worktree_path}"
        } else {
            self.config.yank_template.as_str()
        };
        let wt_path = wt.path.to_string_lossy();
        let vars = ScriptVars {
            repo_name: &repo.name,
            branch: &wt.branch,
            worktree_path: &wt_path,
            worktree_name: &wt.name,
        };
        Some(git::substitute_vars(template, &vars))
    }

    /// Put the filled yank template on the clipboard.
    pub fn yank_selected(&mut self) {
        let Some(text) = self.yank_text() else {
            return;
        };

        match arboard::Clipboard::new() {
            Ok(mut clipboard) => {
                if clipboard.set_text(text).is_ok() {
                    self.toast_success("Copied to clipboard");
                } else {
                    self.toast_error("Failed to copy");
                }
            }
            Err(_) => self.toast_error("Clipboard unavailable"),
        }
    }

    /// Run the configured open script for the selected worktree, detached.
    pub fn run_open_script(&mut self) {
        let (repo, wt) = match (self.selected_repository(), self.selected_worktree_entry()) {
            (Some(repo), Some(wt)) => (repo.clone(), wt.clone()),
            _ => return,
        };

        let script_path = self.config.open_script.trim().to_string();
        if script_path.is_empty() {
            self.toast_info("Set 'open_script' to a script file path in config.toml");
            return;
        }
        let script_path = expand_home(&script_path);
        let script = match std::fs::read_to_string(&script_path) {
            Ok(s) => s,
            Err(e) => {
                self.toast_error(format!(
                    "Failed to read script file {}: {}",
                    script_path.display(),
                    e
                ));
                return;
            }
        };

        let wt_path = wt.path.to_string_lossy();
        let vars = ScriptVars {
            repo_name: &repo.name,
            branch: &wt.branch,
            worktree_path: &wt_path,
            worktree_name: &wt.name,
        };
        match git::spawn_open_script(&script, &vars, &wt.path) {
            Ok(()) => self.toast_success("Script started"),
            Err(e) => self.toast_error(format!("Failed to run script: {}", e)),
        }
    }

    /// Save the open inline editor through the store and return to Normal.
    pub fn commit_inline_edit(&mut self) {
        let (target, text) = match &self.mode {
            Mode::EditNotes(editor) | Mode::EditScript(editor) => {
                (editor.target.clone(), editor.text())
            }
            _ => return,
        };
        self.mode = Mode::Normal;

        match target {
            EditTarget::Notes {
                repo_name,
                worktree_name,
            } => match self.store.set_worktree_note(&repo_name, &worktree_name, &text) {
                Ok(()) => self.toast_success("Notes saved"),
                Err(e) => self.toast_error(format!("Failed to save notes: {}", e)),
            },
            EditTarget::Script { repo_name } => {
                match self.store.set_repo_script(&repo_name, &text) {
                    Ok(()) => self.toast_success("Post-create script saved"),
                    Err(e) => self.toast_error(format!("Failed to save script: {}", e)),
                }
            }
        }
    }
}

fn expand_home(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}
