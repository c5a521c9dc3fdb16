//! Add-worktree dialog with branch autocomplete.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Widget},
};

use crate::error::Error;

use super::input::TextField;

/// How many branch suggestions are shown at once.
const MAX_SUGGESTIONS: usize = 5;

/// Outcome of a key routed into the dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddWorktreeKeyResult {
    Continue,
    /// Enter pressed with a committable branch name
    Commit(String),
}

/// State for the add-worktree dialog: one branch field plus a suggestion
/// list fed from the repository's known branches.
pub struct AddWorktreeDialogState {
    pub branch: TextField,
    /// Known branches for autocomplete (may be empty when listing failed)
    pub branches: Vec<String>,
    /// Highlighted entry within the current suggestions
    pub highlighted: Option<usize>,
    pub error_message: Option<String>,
    /// Repository name shown in the title
    pub repo_name: String,
}

impl AddWorktreeDialogState {
    pub fn new(repo_name: String, branches: Vec<String>) -> Self {
        Self {
            branch: TextField::default(),
            branches,
            highlighted: None,
            error_message: None,
            repo_name,
        }
    }

    /// Branches matching the current input, capped at [`MAX_SUGGESTIONS`].
    pub fn suggestions(&self) -> Vec<&str> {
        let needle = self.branch.trimmed();
        self.branches
            .iter()
            .filter(|b| needle.is_empty() || b.contains(needle))
            .map(String::as_str)
            .take(MAX_SUGGESTIONS)
            .collect()
    }

    /// Route a key. Up/Down move the suggestion highlight, Tab completes the
    /// highlighted (or first) suggestion into the field, Enter commits.
    pub fn handle_key(&mut self, key: KeyEvent) -> AddWorktreeKeyResult {
        match key.code {
            KeyCode::Down => {
                let count = self.suggestions().len();
                if count > 0 {
                    self.highlighted = Some(match self.highlighted {
                        Some(i) => (i + 1) % count,
                        None => 0,
                    });
                }
            }
            KeyCode::Up => {
                let count = self.suggestions().len();
                if count > 0 {
                    self.highlighted = Some(match self.highlighted {
                        Some(i) => (i + count - 1) % count,
                        None => count - 1,
                    });
                }
            }
            KeyCode::Tab => {
                let completion = {
                    let suggestions = self.suggestions();
                    self.highlighted
                        .and_then(|i| suggestions.get(i).copied())
                        .or_else(|| suggestions.first().copied())
                        .map(str::to_string)
                };
                if let Some(branch) = completion {
                    self.branch.set(branch);
                    self.highlighted = None;
                }
            }
            KeyCode::Enter => {
                let picked = self
                    .highlighted
                    .and_then(|i| self.suggestions().get(i).copied().map(str::to_string));
                if let Some(branch) = picked {
                    self.branch.set(branch);
                    self.highlighted = None;
                }
                match self.validate() {
                    Ok(branch) => return AddWorktreeKeyResult::Commit(branch),
                    Err(e) => self.error_message = Some(e.to_string()),
                }
            }
            _ => {
                if self.branch.handle_key(key) {
                    self.error_message = None;
                    self.highlighted = None;
                }
            }
        }
        AddWorktreeKeyResult::Continue
    }

    /// Validate the branch name for commit.
    pub fn validate(&self) -> Result<String, Error> {
        let branch = self.branch.trimmed();
        if branch.is_empty() {
            return Err(Error::Validation("Branch name is required".to_string()));
        }
        if branch.contains(' ') {
            return Err(Error::Validation(
                "Branch name cannot contain spaces".to_string(),
            ));
        }
        Ok(branch.to_string())
    }
}

/// Widget rendering the add-worktree dialog.
pub struct AddWorktreeModal<'a> {
    state: &'a AddWorktreeDialogState,
}

impl<'a> AddWorktreeModal<'a> {
    pub fn new(state: &'a AddWorktreeDialogState) -> Self {
        Self { state }
    }

    pub fn calculate_area(total: Rect) -> Rect {
        let width = 58u16.min(total.width.saturating_sub(4));
        let height = 15u16.min(total.height.saturating_sub(4));
        let x = (total.width.saturating_sub(width)) / 2;
        let y = (total.height.saturating_sub(height)) / 2;
        Rect::new(x, y, width, height)
    }
}

impl Widget for AddWorktreeModal<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width < 26 || area.height < 9 {
            return;
        }

        Clear.render(area, buf);

        let title = format!(" New Worktree — {} ", self.state.repo_name);
        let block = Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan));
        let inner = block.inner(area);
        block.render(area, buf);

        let chunks = Layout::vertical([
            Constraint::Length(1),                      // Label
            Constraint::Length(3),                      // Input
            Constraint::Length(1),                      // Error / hint
            Constraint::Length(MAX_SUGGESTIONS as u16), // Suggestions
            Constraint::Min(0),
            Constraint::Length(1), // Help bar
        ])
        .split(inner);

        Paragraph::new("Branch name:")
            .style(Style::default().fg(Color::White))
            .render(chunks[0], buf);

        let input_block = Block::default()
            .borders(Borders::ALL)
            .border_style(if self.state.error_message.is_some() {
                Style::default().fg(Color::Red)
            } else {
                Style::default().fg(Color::Yellow)
            });
        let input_inner = input_block.inner(chunks[1]);
        input_block.render(chunks[1], buf);
        self.state.branch.render(input_inner, buf, true);

        if let Some(ref error) = self.state.error_message {
            Paragraph::new(Line::from(Span::styled(
                error.clone(),
                Style::default().fg(Color::Red),
            )))
            .render(chunks[2], buf);
        } else {
            Paragraph::new(Line::from(Span::styled(
                "Missing branches are created automatically",
                Style::default().fg(Color::DarkGray),
            )))
            .render(chunks[2], buf);
        }

        let suggestions = self.state.suggestions();
        for (i, branch) in suggestions.iter().enumerate() {
            let line_area = Rect::new(
                chunks[3].x,
                chunks[3].y + i as u16,
                chunks[3].width,
                1,
            );
            let style = if self.state.highlighted == Some(i) {
                Style::default().fg(Color::Black).bg(Color::Cyan)
            } else {
                Style::default().fg(Color::DarkGray)
            };
            Paragraph::new(Line::from(Span::styled(format!("  {}", branch), style)))
                .render(line_area, buf);
        }

        let help = Paragraph::new(Line::from(vec![
            Span::styled(
                " Enter ",
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            ),
            Span::raw("create "),
            Span::styled(
                " Tab ",
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            ),
            Span::raw("complete "),
            Span::styled(
                " Esc ",
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            ),
            Span::raw("cancel"),
        ]))
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center);
        help.render(chunks[5], buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn dialog(branches: &[&str]) -> AddWorktreeDialogState {
        AddWorktreeDialogState::new(
            "demo".to_string(),
            branches.iter().map(|s| s.to_string()).collect(),
        )
    }

    #[test]
    fn suggestions_filter_by_substring() {
        let mut d = dialog(&["main", "feat-x", "feat-y", "fix-1"]);
        for c in "feat".chars() {
            d.handle_key(key(KeyCode::Char(c)));
        }
        assert_eq!(d.suggestions(), vec!["feat-x", "feat-y"]);
    }

    #[test]
    fn tab_completes_first_suggestion() {
        let mut d = dialog(&["main", "feat-x"]);
        for c in "fe".chars() {
            d.handle_key(key(KeyCode::Char(c)));
        }
        d.handle_key(key(KeyCode::Tab));
        assert_eq!(d.branch.value, "feat-x");
    }

    #[test]
    fn arrows_cycle_highlight_with_wraparound() {
        let mut d = dialog(&["a", "b", "c"]);
        d.handle_key(key(KeyCode::Down));
        assert_eq!(d.highlighted, Some(0));
        d.handle_key(key(KeyCode::Down));
        d.handle_key(key(KeyCode::Down));
        assert_eq!(d.highlighted, Some(2));
        d.handle_key(key(KeyCode::Down));
        assert_eq!(d.highlighted, Some(0));
        d.handle_key(key(KeyCode::Up));
        assert_eq!(d.highlighted, Some(2));
    }

    #[test]
    fn enter_commits_trimmed_branch() {
        let mut d = dialog(&[]);
        for c in " feat-z ".chars() {
            d.handle_key(key(KeyCode::Char(c)));
        }
        match d.handle_key(key(KeyCode::Enter)) {
            AddWorktreeKeyResult::Commit(branch) => assert_eq!(branch, "feat-z"),
            other => panic!("expected commit, got {:?}", other),
        }
    }

    #[test]
    fn enter_on_highlighted_suggestion_commits_it() {
        let mut d = dialog(&["main", "feat-x"]);
        d.handle_key(key(KeyCode::Down));
        d.handle_key(key(KeyCode::Down));
        match d.handle_key(key(KeyCode::Enter)) {
            AddWorktreeKeyResult::Commit(branch) => assert_eq!(branch, "feat-x"),
            other => panic!("expected commit, got {:?}", other),
        }
    }

    #[test]
    fn empty_or_spaced_branch_is_rejected() {
        let mut d = dialog(&[]);
        assert_eq!(
            d.handle_key(key(KeyCode::Enter)),
            AddWorktreeKeyResult::Continue
        );
        assert!(d.error_message.is_some());

        let mut d = dialog(&[]);
        for c in "bad name".chars() {
            d.handle_key(key(KeyCode::Char(c)));
        }
        assert_eq!(
            d.handle_key(key(KeyCode::Enter)),
            AddWorktreeKeyResult::Continue
        );
        assert!(d.error_message.unwrap().contains("spaces"));
    }

    #[test]
    fn typing_clears_highlight() {
        let mut d = dialog(&["main"]);
        d.handle_key(key(KeyCode::Down));
        assert!(d.highlighted.is_some());
        d.handle_key(key(KeyCode::Char('x')));
        assert!(d.highlighted.is_none());
    }
}
