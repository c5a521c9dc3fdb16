//! Single-line text input shared by the dialog fields.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

/// A line of editable text with a cursor.
#[derive(Debug, Clone, Default)]
pub struct TextField {
    pub value: String,
    pub cursor: usize,
}

impl TextField {
    /// Apply an editing key. Returns true when the key was consumed.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Char(c) => {
                self.value.insert(self.cursor, c);
                self.cursor += 1;
            }
            KeyCode::Backspace => {
                if self.cursor > 0 {
                    self.cursor -= 1;
                    self.value.remove(self.cursor);
                }
            }
            KeyCode::Delete => {
                if self.cursor < self.value.len() {
                    self.value.remove(self.cursor);
                }
            }
            KeyCode::Left => self.cursor = self.cursor.saturating_sub(1),
            KeyCode::Right => self.cursor = (self.cursor + 1).min(self.value.len()),
            KeyCode::Home => self.cursor = 0,
            KeyCode::End => self.cursor = self.value.len(),
            _ => return false,
        }
        true
    }

    pub fn trimmed(&self) -> &str {
        self.value.trim()
    }

    /// Replace the contents, placing the cursor at the end.
    pub fn set(&mut self, value: impl Into<String>) {
        self.value = value.into();
        self.cursor = self.value.len();
    }

    /// Render the value into `area`, scrolled so the cursor stays visible.
    /// The cursor cell is drawn inverted when `focused`.
    pub fn render(&self, area: Rect, buf: &mut Buffer, focused: bool) {
        let available = area.width as usize;
        if available == 0 {
            return;
        }

        let (visible, cursor_offset) = if self.value.len() <= available {
            (self.value.as_str(), self.cursor)
        } else {
            let start = if self.cursor >= available {
                self.cursor - available + 1
            } else {
                0
            };
            let end = (start + available).min(self.value.len());
            (&self.value[start..end], self.cursor - start)
        };

        let mut spans = Vec::new();
        for (i, c) in visible.chars().enumerate() {
            if focused && i == cursor_offset {
                spans.push(Span::styled(
                    c.to_string(),
                    Style::default().bg(Color::White).fg(Color::Black),
                ));
            } else {
                spans.push(Span::raw(c.to_string()));
            }
        }
        if focused && cursor_offset >= visible.len() {
            spans.push(Span::styled(" ", Style::default().bg(Color::White)));
        }

        Paragraph::new(Line::from(spans)).render(area, buf);
    }
}
