//! Inline multi-line editor for worktree notes and post-create scripts.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Widget},
};

/// What the edited text is saved as.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditTarget {
    Notes {
        repo_name: String,
        worktree_name: String,
    },
    Script {
        repo_name: String,
    },
}

/// A small line-based text buffer with a (row, col) cursor.
pub struct EditorState {
    pub target: EditTarget,
    pub lines: Vec<String>,
    pub row: usize,
    pub col: usize,
}

impl EditorState {
    pub fn new(target: EditTarget, content: &str) -> Self {
        let lines: Vec<String> = if content.is_empty() {
            vec![String::new()]
        } else {
            content.lines().map(str::to_string).collect()
        };
        let row = lines.len() - 1;
        let col = lines[row].len();
        Self {
            target,
            lines,
            row,
            col,
        }
    }

    /// The buffer joined back into text, trailing whitespace trimmed.
    pub fn text(&self) -> String {
        self.lines.join("\n").trim().to_string()
    }

    pub fn title(&self) -> String {
        match &self.target {
            EditTarget::Notes { worktree_name, .. } => format!(" Notes — {} ", worktree_name),
            EditTarget::Script { repo_name } => {
                format!(" Post-create script — {} ", repo_name)
            }
        }
    }

    /// Apply an editing key. Save/cancel are mode-global and handled by the
    /// keyboard handler, not here.
    pub fn handle_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char(c) => {
                self.lines[self.row].insert(self.col, c);
                self.col += 1;
            }
            KeyCode::Enter => {
                let rest = self.lines[self.row].split_off(self.col);
                self.lines.insert(self.row + 1, rest);
                self.row += 1;
                self.col = 0;
            }
            KeyCode::Backspace => {
                if self.col > 0 {
                    self.col -= 1;
                    self.lines[self.row].remove(self.col);
                } else if self.row > 0 {
                    // Join with the previous line
                    let current = self.lines.remove(self.row);
                    self.row -= 1;
                    self.col = self.lines[self.row].len();
                    self.lines[self.row].push_str(&current);
                }
            }
            KeyCode::Delete => {
                if self.col < self.lines[self.row].len() {
                    self.lines[self.row].remove(self.col);
                } else if self.row + 1 < self.lines.len() {
                    let next = self.lines.remove(self.row + 1);
                    self.lines[self.row].push_str(&next);
                }
            }
            KeyCode::Left => {
                if self.col > 0 {
                    self.col -= 1;
                } else if self.row > 0 {
                    self.row -= 1;
                    self.col = self.lines[self.row].len();
                }
            }
            KeyCode::Right => {
                if self.col < self.lines[self.row].len() {
                    self.col += 1;
                } else if self.row + 1 < self.lines.len() {
                    self.row += 1;
                    self.col = 0;
                }
            }
            KeyCode::Up => {
                if self.row > 0 {
                    self.row -= 1;
                    self.col = self.col.min(self.lines[self.row].len());
                }
            }
            KeyCode::Down => {
                if self.row + 1 < self.lines.len() {
                    self.row += 1;
                    self.col = self.col.min(self.lines[self.row].len());
                }
            }
            KeyCode::Home => self.col = 0,
            KeyCode::End => self.col = self.lines[self.row].len(),
            _ => {}
        }
    }
}

/// Widget rendering the inline editor as a centered overlay.
pub struct EditorModal<'a> {
    state: &'a EditorState,
}

impl<'a> EditorModal<'a> {
    pub fn new(state: &'a EditorState) -> Self {
        Self { state }
    }

    pub fn calculate_area(total: Rect) -> Rect {
        let width = (total.width * 70 / 100).max(40).min(total.width.saturating_sub(4));
        let height = (total.height * 60 / 100)
            .max(10)
            .min(total.height.saturating_sub(4));
        let x = (total.width.saturating_sub(width)) / 2;
        let y = (total.height.saturating_sub(height)) / 2;
        Rect::new(x, y, width, height)
    }
}

impl Widget for EditorModal<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width < 24 || area.height < 6 {
            return;
        }

        Clear.render(area, buf);

        let block = Block::default()
            .title(self.state.title())
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan));
        let inner = block.inner(area);
        block.render(area, buf);

        let text_area = Rect::new(inner.x, inner.y, inner.width, inner.height.saturating_sub(1));

        // Scroll vertically to keep the cursor row visible
        let visible_rows = text_area.height as usize;
        let first_row = if self.state.row >= visible_rows {
            self.state.row - visible_rows + 1
        } else {
            0
        };

        for (screen_row, line_idx) in (first_row..self.state.lines.len())
            .enumerate()
            .take(visible_rows)
        {
            let line = &self.state.lines[line_idx];
            let line_area = Rect::new(
                text_area.x,
                text_area.y + screen_row as u16,
                text_area.width,
                1,
            );
            if line_idx == self.state.row {
                let mut spans = Vec::new();
                for (i, c) in line.chars().enumerate() {
                    if i == self.state.col {
                        spans.push(Span::styled(
                            c.to_string(),
                            Style::default().bg(Color::White).fg(Color::Black),
                        ));
                    } else {
                        spans.push(Span::raw(c.to_string()));
                    }
                }
                if self.state.col >= line.len() {
                    spans.push(Span::styled(" ", Style::default().bg(Color::White)));
                }
                Paragraph::new(Line::from(spans)).render(line_area, buf);
            } else {
                Paragraph::new(Line::from(Span::raw(line.clone()))).render(line_area, buf);
            }
        }

        let help = Paragraph::new(Line::from(vec![
            Span::styled(
                " C-s ",
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            ),
            Span::raw("save "),
            Span::styled(
                " Esc ",
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            ),
            Span::raw("discard"),
        ]))
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center);
        let help_area = Rect::new(inner.x, inner.bottom().saturating_sub(1), inner.width, 1);
        help.render(help_area, buf);
    }
}
