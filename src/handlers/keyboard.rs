//! Keystroke routing for the modal state machine.
//!
//! Every key is interpreted by the active [`Mode`]'s table. Mode-global keys
//! (quit, cancel, save, confirm) are checked before free-text routing, and
//! dispatch is by dialog type: `y`/`n` confirm or cancel only in the two
//! confirmation dialogs — in the free-text dialogs they are literal input.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::app::{App, Mode, Pane};
use crate::ui::modal::AddWorktreeKeyResult;

/// Action returned from key handling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Continue,
    Quit,
}

pub fn handle_key_event(app: &mut App, key: KeyEvent) -> KeyAction {
    match app.mode {
        Mode::Normal => handle_normal_key(app, key),
        Mode::AddRepo(_) => handle_add_repo_key(app, key),
        Mode::AddWorktree(_) => handle_add_worktree_key(app, key),
        Mode::ConfirmDeleteWorktree(_) => handle_confirm_key(app, key, ConfirmKind::Worktree),
        Mode::ConfirmDeleteRepo(_) => handle_confirm_key(app, key, ConfirmKind::Repo),
        Mode::EditNotes(_) | Mode::EditScript(_) => handle_editor_key(app, key),
    }
}

fn handle_normal_key(app: &mut App, key: KeyEvent) -> KeyAction {
    // Quit is reachable only from Normal mode; dialogs cancel with Esc first
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return KeyAction::Quit;
    }
    match key.code {
        KeyCode::Char('q') => return KeyAction::Quit,

        KeyCode::Tab => app.toggle_pane(),
        KeyCode::Char('h') => app.focus_pane(Pane::Repos),
        KeyCode::Char('l') => app.focus_pane(Pane::Worktrees),

        KeyCode::Char('j') | KeyCode::Down => app.navigate_down(),
        KeyCode::Char('k') | KeyCode::Up => app.navigate_up(),

        KeyCode::Char('+') => match app.pane {
            Pane::Repos => app.open_add_repo_dialog(),
            Pane::Worktrees => app.open_add_worktree_dialog(),
        },
        KeyCode::Char('-') => match app.pane {
            Pane::Repos => app.open_confirm_delete_repo(),
            Pane::Worktrees => app.open_confirm_delete_worktree(),
        },

        KeyCode::Char('n') => {
            if app.pane == Pane::Worktrees {
                app.open_notes_editor();
            }
        }
        KeyCode::Char('s') => {
            if app.pane == Pane::Repos {
                app.open_script_editor();
            }
        }
        KeyCode::Char('y') => {
            if app.pane == Pane::Worktrees {
                app.yank_selected();
            }
        }
        KeyCode::Enter => {
            if app.pane == Pane::Worktrees {
                app.run_open_script();
            }
        }
        _ => {}
    }
    KeyAction::Continue
}

fn handle_add_repo_key(app: &mut App, key: KeyEvent) -> KeyAction {
    match (key.code, key.modifiers) {
        (KeyCode::Esc, _) => app.cancel_dialog(),
        (KeyCode::Char('s'), KeyModifiers::CONTROL) => app.commit_add_repo(),
        _ => {
            if let Mode::AddRepo(ref mut dialog) = app.mode {
                dialog.handle_key(key);
            }
        }
    }
    KeyAction::Continue
}

fn handle_add_worktree_key(app: &mut App, key: KeyEvent) -> KeyAction {
    match (key.code, key.modifiers) {
        (KeyCode::Esc, _) => app.cancel_dialog(),
        (KeyCode::Char('s'), KeyModifiers::CONTROL) => app.commit_add_worktree_dialog(),
        _ => {
            let result = if let Mode::AddWorktree(ref mut dialog) = app.mode {
                dialog.handle_key(key)
            } else {
                AddWorktreeKeyResult::Continue
            };
            if let AddWorktreeKeyResult::Commit(branch) = result {
                app.commit_add_worktree(&branch);
            }
        }
    }
    KeyAction::Continue
}

enum ConfirmKind {
    Worktree,
    Repo,
}

fn handle_confirm_key(app: &mut App, key: KeyEvent, kind: ConfirmKind) -> KeyAction {
    match key.code {
        // Here, and only here, y/n mean confirm/cancel
        KeyCode::Char('y') => match kind {
            ConfirmKind::Worktree => app.confirm_delete_worktree(),
            ConfirmKind::Repo => app.confirm_delete_repository(),
        },
        KeyCode::Char('n') | KeyCode::Esc => app.cancel_dialog(),
        _ => {}
    }
    KeyAction::Continue
}

fn handle_editor_key(app: &mut App, key: KeyEvent) -> KeyAction {
    match (key.code, key.modifiers) {
        (KeyCode::Esc, _) => app.cancel_dialog(),
        (KeyCode::Char('s'), KeyModifiers::CONTROL) => app.commit_inline_edit(),
        _ => {
            if let Mode::EditNotes(ref mut editor) | Mode::EditScript(ref mut editor) = app.mode {
                editor.handle_key(key);
            }
        }
    }
    KeyAction::Continue
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::test_support::{app_with_repos, fake_worktrees};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    #[test]
    fn q_quits_only_from_normal_mode() {
        let (_dir, mut app) = app_with_repos(1);
        assert_eq!(handle_key_event(&mut app, key(KeyCode::Char('q'))), KeyAction::Quit);

        app.open_add_repo_dialog();
        assert_eq!(
            handle_key_event(&mut app, key(KeyCode::Char('q'))),
            KeyAction::Continue
        );
        // 'q' landed in the name field instead
        match &app.mode {
            Mode::AddRepo(dialog) => assert_eq!(dialog.name.value, "q"),
            _ => panic!("dialog should still be open"),
        }
    }

    #[test]
    fn ctrl_c_quits_from_normal_but_not_from_a_dialog() {
        let (_dir, mut app) = app_with_repos(1);
        assert_eq!(handle_key_event(&mut app, ctrl('c')), KeyAction::Quit);

        app.open_add_repo_dialog();
        assert_eq!(handle_key_event(&mut app, ctrl('c')), KeyAction::Continue);
        assert!(matches!(app.mode, Mode::AddRepo(_)));
    }

    #[test]
    fn plus_opens_the_dialog_for_the_active_pane() {
        let (_dir, mut app) = app_with_repos(1);
        handle_key_event(&mut app, key(KeyCode::Char('+')));
        assert!(matches!(app.mode, Mode::AddRepo(_)));

        app.cancel_dialog();
        handle_key_event(&mut app, key(KeyCode::Tab));
        handle_key_event(&mut app, key(KeyCode::Char('+')));
        assert!(matches!(app.mode, Mode::AddWorktree(_)));
    }

    #[test]
    fn plus_in_worktrees_pane_needs_a_repository() {
        let (_dir, mut app) = app_with_repos(0);
        handle_key_event(&mut app, key(KeyCode::Tab));
        handle_key_event(&mut app, key(KeyCode::Char('+')));
        assert!(matches!(app.mode, Mode::Normal));
    }

    #[test]
    fn minus_on_primary_worktree_never_opens_confirmation() {
        let (_dir, mut app) = app_with_repos(1);
        app.worktrees = fake_worktrees(&["main", "feat"]);
        handle_key_event(&mut app, key(KeyCode::Tab));
        handle_key_event(&mut app, key(KeyCode::Char('-')));
        assert!(matches!(app.mode, Mode::Normal));

        handle_key_event(&mut app, key(KeyCode::Char('j')));
        handle_key_event(&mut app, key(KeyCode::Char('-')));
        assert!(matches!(app.mode, Mode::ConfirmDeleteWorktree(_)));
    }

    #[test]
    fn n_cancels_confirmation_but_is_text_in_add_dialogs() {
        let (_dir, mut app) = app_with_repos(1);
        app.worktrees = fake_worktrees(&["main", "feat"]);
        app.selected_worktree = 1;
        app.open_confirm_delete_worktree();
        handle_key_event(&mut app, key(KeyCode::Char('n')));
        assert!(matches!(app.mode, Mode::Normal));

        app.open_add_worktree_dialog();
        handle_key_event(&mut app, key(KeyCode::Char('n')));
        handle_key_event(&mut app, key(KeyCode::Char('y')));
        match &app.mode {
            Mode::AddWorktree(dialog) => assert_eq!(dialog.branch.value, "ny"),
            _ => panic!("add-worktree dialog should still be open"),
        }
    }

    #[test]
    fn esc_cancels_every_dialog_kind() {
        let (_dir, mut app) = app_with_repos(1);
        app.worktrees = fake_worktrees(&["main", "feat"]);

        app.open_add_repo_dialog();
        handle_key_event(&mut app, key(KeyCode::Esc));
        assert!(matches!(app.mode, Mode::Normal));

        app.open_add_worktree_dialog();
        handle_key_event(&mut app, key(KeyCode::Esc));
        assert!(matches!(app.mode, Mode::Normal));

        app.open_confirm_delete_repo();
        handle_key_event(&mut app, key(KeyCode::Esc));
        assert!(matches!(app.mode, Mode::Normal));

        app.selected_worktree = 1;
        app.open_notes_editor();
        handle_key_event(&mut app, key(KeyCode::Esc));
        assert!(matches!(app.mode, Mode::Normal));
    }

    #[test]
    fn editor_discards_on_escape_and_saves_on_ctrl_s() {
        let (_dir, mut app) = app_with_repos(1);
        app.worktrees = fake_worktrees(&["main", "feat"]);
        app.selected_worktree = 1;

        app.open_notes_editor();
        for c in "draft".chars() {
            handle_key_event(&mut app, key(KeyCode::Char(c)));
        }
        handle_key_event(&mut app, key(KeyCode::Esc));
        assert_eq!(app.store.worktree_note("repo-0", "feat").unwrap(), "");

        app.open_notes_editor();
        for c in "kept".chars() {
            handle_key_event(&mut app, key(KeyCode::Char(c)));
        }
        handle_key_event(&mut app, ctrl('s'));
        assert_eq!(app.store.worktree_note("repo-0", "feat").unwrap(), "kept");
    }

    #[test]
    fn s_opens_script_editor_only_in_repos_pane() {
        let (_dir, mut app) = app_with_repos(1);
        handle_key_event(&mut app, key(KeyCode::Char('s')));
        assert!(matches!(app.mode, Mode::EditScript(_)));

        app.cancel_dialog();
        handle_key_event(&mut app, key(KeyCode::Tab));
        handle_key_event(&mut app, key(KeyCode::Char('s')));
        assert!(matches!(app.mode, Mode::Normal));
    }

    #[test]
    fn normal_navigation_keys_move_the_repo_cursor() {
        let (_dir, mut app) = app_with_repos(3);
        handle_key_event(&mut app, key(KeyCode::Char('j')));
        handle_key_event(&mut app, key(KeyCode::Down));
        assert_eq!(app.selected_repo, 2);
        handle_key_event(&mut app, key(KeyCode::Char('k')));
        assert_eq!(app.selected_repo, 1);
    }
}
