//! Toast notifications: the success/error banners workflows report through.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Info,
    Success,
    Warning,
    Error,
}

impl ToastKind {
    fn color(self) -> Color {
        match self {
            ToastKind::Info => Color::Cyan,
            ToastKind::Success => Color::Green,
            ToastKind::Warning => Color::Yellow,
            ToastKind::Error => Color::Red,
        }
    }

    fn icon(self) -> &'static str {
        match self {
            ToastKind::Info => "i",
            ToastKind::Success => "ok",
            ToastKind::Warning => "!",
            ToastKind::Error => "x",
        }
    }

    /// Errors linger longer than routine feedback.
    fn duration(self) -> Duration {
        match self {
            ToastKind::Error => Duration::from_secs(8),
            ToastKind::Warning => Duration::from_secs(5),
            _ => Duration::from_secs(3),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Toast {
    pub message: String,
    pub kind: ToastKind,
    created_at: Instant,
}

impl Toast {
    fn is_expired(&self) -> bool {
        self.created_at.elapsed() >= self.kind.duration()
    }
}

/// FIFO queue of active toasts, trimmed to a small visible window.
pub struct ToastManager {
    queue: VecDeque<Toast>,
    max_visible: usize,
}

impl ToastManager {
    pub fn new() -> Self {
        Self {
            queue: VecDeque::new(),
            max_visible: 4,
        }
    }

    pub fn push(&mut self, message: impl Into<String>, kind: ToastKind) {
        self.queue.push_back(Toast {
            message: message.into(),
            kind,
            created_at: Instant::now(),
        });
        while self.queue.len() > self.max_visible {
            self.queue.pop_front();
        }
    }

    /// Drop expired toasts; called once per event-loop tick.
    pub fn update(&mut self) {
        self.queue.retain(|t| !t.is_expired());
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &Toast> {
        self.queue.iter()
    }
}

impl Default for ToastManager {
    fn default() -> Self {
        Self::new()
    }
}

/// Render the queue bottom-right, newest at the bottom. Multi-line error
/// messages (accumulated deletion failures) get a taller box.
pub fn render_toasts(frame: &mut Frame, area: Rect, manager: &ToastManager) {
    let width = 44u16.min(area.width.saturating_sub(4));
    let gap = 1u16;
    let mut bottom = area.bottom().saturating_sub(1);

    for toast in manager.iter().rev() {
        let line_count = toast.message.lines().count().max(1) as u16;
        // Account for wrapping of long single lines
        let wrapped = (toast.message.len() as u16 / width.saturating_sub(4).max(1)) + line_count;
        let height = (wrapped + 2).min(8);
        if bottom < area.top() + height {
            break;
        }
        let toast_area = Rect::new(
            area.right().saturating_sub(width + 2),
            bottom.saturating_sub(height),
            width,
            height,
        );

        frame.render_widget(Clear, toast_area);

        let color = toast.kind.color();
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(color));
        let text = Paragraph::new(
            toast
                .message
                .lines()
                .enumerate()
                .map(|(i, l)| {
                    if i == 0 {
                        Line::from(vec![
                            Span::styled(
                                toast.kind.icon(),
                                Style::default().fg(color).add_modifier(Modifier::BOLD),
                            ),
                            Span::raw(" "),
                            Span::raw(l.to_string()),
                        ])
                    } else {
                        Line::from(Span::raw(l.to_string()))
                    }
                })
                .collect::<Vec<_>>(),
        )
        .block(block)
        .wrap(Wrap { trim: false });
        frame.render_widget(text, toast_area);

        bottom = toast_area.y.saturating_sub(gap);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn queue_is_trimmed_to_max_visible() {
        let mut m = ToastManager::new();
        for i in 0..10 {
            m.push(format!("msg {}", i), ToastKind::Info);
        }
        assert_eq!(m.iter().count(), 4);
        // Oldest entries were dropped
        assert_eq!(m.iter().next().unwrap().message, "msg 6");
    }

    #[test]
    fn update_keeps_fresh_toasts() {
        let mut m = ToastManager::new();
        m.push("hello", ToastKind::Success);
        m.update();
        assert!(!m.is_empty());
    }
}
