//! Modal dialog components for the TUI.

pub mod add_repo;
pub mod add_worktree;
pub mod confirm;
pub mod input;

pub use add_repo::{AddRepoDialogState, AddRepoModal};
pub use add_worktree::{AddWorktreeDialogState, AddWorktreeKeyResult, AddWorktreeModal};
pub use confirm::{
    ConfirmDeleteRepoModal, ConfirmDeleteRepoState, ConfirmDeleteWorktreeModal,
    ConfirmDeleteWorktreeState,
};
pub use input::TextField;
