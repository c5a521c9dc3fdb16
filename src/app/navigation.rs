//! Cursor movement over the two linked lists.
//!
//! Moving wraps circularly; switching the repository resets the worktree
//! cursor and re-derives the worktree list from git.

use super::{wrap_next, wrap_prev, App, Pane};

impl App {
    pub fn next_repo(&mut self) {
        if self.config.repositories.is_empty() {
            return;
        }
        self.selected_repo = wrap_next(self.selected_repo, self.config.repositories.len());
        self.selected_worktree = 0;
        self.reload_worktrees();
    }

    pub fn prev_repo(&mut self) {
        if self.config.repositories.is_empty() {
            return;
        }
        self.selected_repo = wrap_prev(self.selected_repo, self.config.repositories.len());
        self.selected_worktree = 0;
        self.reload_worktrees();
    }

    pub fn next_worktree(&mut self) {
        self.selected_worktree = wrap_next(self.selected_worktree, self.worktrees.len());
    }

    pub fn prev_worktree(&mut self) {
        self.selected_worktree = wrap_prev(self.selected_worktree, self.worktrees.len());
    }

    pub fn toggle_pane(&mut self) {
        self.pane = self.pane.toggle();
    }

    pub fn focus_pane(&mut self, pane: Pane) {
        self.pane = pane;
    }

    /// Move within the active pane.
    pub fn navigate_down(&mut self) {
        match self.pane {
            Pane::Repos => self.next_repo(),
            Pane::Worktrees => self.next_worktree(),
        }
    }

    pub fn navigate_up(&mut self) {
        match self.pane {
            Pane::Repos => self.prev_repo(),
            Pane::Worktrees => self.prev_worktree(),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::app::test_support::{app_with_repos, fake_worktrees};
    use crate::app::Pane;

    #[test]
    fn repo_navigation_wraps_circularly() {
        let (_dir, mut app) = app_with_repos(3);
        assert_eq!(app.selected_repo, 0);
        app.next_repo();
        app.next_repo();
        assert_eq!(app.selected_repo, 2);
        app.next_repo();
        assert_eq!(app.selected_repo, 0);
        app.prev_repo();
        assert_eq!(app.selected_repo, 2);
    }

    #[test]
    fn switching_repo_resets_worktree_cursor() {
        let (_dir, mut app) = app_with_repos(2);
        app.worktrees = fake_worktrees(&["main", "feat-a", "feat-b"]);
        app.selected_worktree = 2;
        app.next_repo();
        assert_eq!(app.selected_worktree, 0);
    }

    #[test]
    fn worktree_navigation_wraps_circularly() {
        let (_dir, mut app) = app_with_repos(1);
        app.worktrees = fake_worktrees(&["main", "feat-a"]);
        app.next_worktree();
        assert_eq!(app.selected_worktree, 1);
        app.next_worktree();
        assert_eq!(app.selected_worktree, 0);
        app.prev_worktree();
        assert_eq!(app.selected_worktree, 1);
    }

    #[test]
    fn navigation_on_empty_lists_is_a_no_op() {
        let (_dir, mut app) = app_with_repos(0);
        app.next_repo();
        app.prev_repo();
        app.next_worktree();
        app.prev_worktree();
        assert_eq!(app.selected_repo, 0);
        assert_eq!(app.selected_worktree, 0);
    }

    #[test]
    fn pane_switching() {
        let (_dir, mut app) = app_with_repos(1);
        assert_eq!(app.pane, Pane::Repos);
        app.toggle_pane();
        assert_eq!(app.pane, Pane::Worktrees);
        app.focus_pane(Pane::Repos);
        assert_eq!(app.pane, Pane::Repos);
    }

    #[test]
    fn navigate_routes_by_active_pane() {
        let (_dir, mut app) = app_with_repos(2);
        app.navigate_down();
        assert_eq!(app.selected_repo, 1);
        app.focus_pane(Pane::Worktrees);
        app.worktrees = crate::app::test_support::fake_worktrees(&["main", "x"]);
        app.navigate_down();
        assert_eq!(app.selected_worktree, 1);
        // Repo cursor untouched by worktree navigation
        assert_eq!(app.selected_repo, 1);
    }
}
