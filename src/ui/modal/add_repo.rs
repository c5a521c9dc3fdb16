//! Add-repository dialog.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Widget},
};

use crate::config::{infer_repo_kind, RepoKind};
use crate::error::Error;

use super::input::TextField;

const FIELD_COUNT: usize = 2;

/// State for the add-repository dialog: a name field and a path/URL field.
pub struct AddRepoDialogState {
    pub name: TextField,
    pub path_or_url: TextField,
    /// Which field has focus (0 = name, 1 = path/URL)
    pub focus: usize,
    pub error_message: Option<String>,
}

impl Default for AddRepoDialogState {
    fn default() -> Self {
        Self {
            name: TextField::default(),
            path_or_url: TextField::default(),
            focus: 0,
            error_message: None,
        }
    }
}

impl AddRepoDialogState {
    /// Route a key: directional/Tab-like keys move field focus with
    /// wraparound, everything else edits the focused field.
    pub fn handle_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Tab | KeyCode::Down | KeyCode::Enter => {
                self.focus = (self.focus + 1) % FIELD_COUNT;
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.focus = (self.focus + FIELD_COUNT - 1) % FIELD_COUNT;
            }
            _ => {
                let consumed = match self.focus {
                    0 => self.name.handle_key(key),
                    _ => self.path_or_url.handle_key(key),
                };
                if consumed {
                    self.error_message = None;
                }
            }
        }
    }

    /// Validate the inputs, returning `(name, kind, path_or_url)`.
    pub fn values(&self) -> Result<(String, RepoKind, String), Error> {
        let name = self.name.trimmed();
        let path_or_url = self.path_or_url.trimmed();
        if name.is_empty() {
            return Err(Error::Validation("Name is required".to_string()));
        }
        if path_or_url.is_empty() {
            return Err(Error::Validation("Path or URL is required".to_string()));
        }
        Ok((
            name.to_string(),
            infer_repo_kind(path_or_url),
            path_or_url.to_string(),
        ))
    }
}

/// Widget rendering the add-repository dialog.
pub struct AddRepoModal<'a> {
    state: &'a AddRepoDialogState,
}

impl<'a> AddRepoModal<'a> {
    pub fn new(state: &'a AddRepoDialogState) -> Self {
        Self { state }
    }

    pub fn calculate_area(total: Rect) -> Rect {
        let width = 62u16.min(total.width.saturating_sub(4));
        let height = 13u16.min(total.height.saturating_sub(4));
        let x = (total.width.saturating_sub(width)) / 2;
        let y = (total.height.saturating_sub(height)) / 2;
        Rect::new(x, y, width, height)
    }
}

impl Widget for AddRepoModal<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width < 30 || area.height < 10 {
            return;
        }

        Clear.render(area, buf);

        let block = Block::default()
            .title(" Add Repository ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan));
        let inner = block.inner(area);
        block.render(area, buf);

        let chunks = Layout::vertical([
            Constraint::Length(1), // Name label
            Constraint::Length(3), // Name input
            Constraint::Length(1), // Path/URL label
            Constraint::Length(3), // Path/URL input
            Constraint::Length(1), // Kind hint / error
            Constraint::Min(0),
            Constraint::Length(1), // Help bar
        ])
        .split(inner);

        Paragraph::new("Name:")
            .style(Style::default().fg(Color::White))
            .render(chunks[0], buf);
        render_field(&self.state.name, self.state.focus == 0, chunks[1], buf);

        Paragraph::new("Path or URL:")
            .style(Style::default().fg(Color::White))
            .render(chunks[2], buf);
        render_field(&self.state.path_or_url, self.state.focus == 1, chunks[3], buf);

        if let Some(ref error) = self.state.error_message {
            Paragraph::new(Line::from(Span::styled(
                error.clone(),
                Style::default().fg(Color::Red),
            )))
            .render(chunks[4], buf);
        } else {
            let hint = self.state.path_or_url.trimmed();
            if !hint.is_empty() {
                let kind = infer_repo_kind(hint);
                Paragraph::new(Line::from(Span::styled(
                    format!("will be added as: {}", kind),
                    Style::default().fg(Color::DarkGray),
                )))
                .render(chunks[4], buf);
            }
        }

        let help = Paragraph::new(Line::from(vec![
            Span::styled(
                " Tab ",
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            ),
            Span::raw("next field "),
            Span::styled(
                " C-s ",
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            ),
            Span::raw("save "),
            Span::styled(
                " Esc ",
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            ),
            Span::raw("cancel"),
        ]))
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center);
        help.render(chunks[6], buf);
    }
}

fn render_field(field: &TextField, focused: bool, area: Rect, buf: &mut Buffer) {
    let border = if focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let block = Block::default().borders(Borders::ALL).border_style(border);
    let inner = block.inner(area);
    block.render(area, buf);
    field.render(inner, buf, focused);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn typed(state: &mut AddRepoDialogState, text: &str) {
        for c in text.chars() {
            state.handle_key(key(KeyCode::Char(c)));
        }
    }

    #[test]
    fn focus_wraps_both_directions() {
        let mut s = AddRepoDialogState::default();
        assert_eq!(s.focus, 0);
        s.handle_key(key(KeyCode::Tab));
        assert_eq!(s.focus, 1);
        s.handle_key(key(KeyCode::Tab));
        assert_eq!(s.focus, 0);
        s.handle_key(key(KeyCode::BackTab));
        assert_eq!(s.focus, 1);
        s.handle_key(key(KeyCode::Up));
        assert_eq!(s.focus, 0);
    }

    #[test]
    fn enter_moves_focus_not_text() {
        let mut s = AddRepoDialogState::default();
        typed(&mut s, "demo");
        s.handle_key(key(KeyCode::Enter));
        assert_eq!(s.focus, 1);
        assert_eq!(s.name.value, "demo");
        assert!(s.path_or_url.value.is_empty());
    }

    #[test]
    fn y_and_n_are_literal_text_here() {
        let mut s = AddRepoDialogState::default();
        typed(&mut s, "yn");
        assert_eq!(s.name.value, "yn");
    }

    #[test]
    fn values_require_both_fields() {
        let mut s = AddRepoDialogState::default();
        assert!(s.values().is_err());
        typed(&mut s, "demo");
        assert!(s.values().is_err());
        s.handle_key(key(KeyCode::Tab));
        typed(&mut s, "/src/demo");
        let (name, kind, path) = s.values().unwrap();
        assert_eq!(name, "demo");
        assert_eq!(kind, RepoKind::Local);
        assert_eq!(path, "/src/demo");
    }

    #[test]
    fn url_input_infers_remote() {
        let mut s = AddRepoDialogState::default();
        typed(&mut s, "demo");
        s.handle_key(key(KeyCode::Tab));
        typed(&mut s, "git@github.com:u/demo.git");
        let (_, kind, _) = s.values().unwrap();
        assert_eq!(kind, RepoKind::Remote);
    }
}
