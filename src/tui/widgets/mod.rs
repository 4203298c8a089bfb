pub mod chat_list;
pub mod chat_row;
pub mod composer;
pub mod help_popup;
pub mod input_dialog;
pub mod message_view;
pub mod status_bar;

use ratatui::{
    style::{Color, Style},
    text::{Line, Span},
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::tui::input_handler::TextField;

/// Cut `text` to at most `width` columns, marking the cut with an ellipsis
pub(crate) fn truncate_to_width(text: &str, width: usize) -> String {
    if text.width() <= width {
        return text.to_string();
    }
    if width == 0 {
        return String::new();
    }
    let mut out = String::new();
    let mut used = 0;
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > width - 1 {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push('…');
    out
}

/// Greedy word wrap to `width` columns. Words longer than a line are split.
pub(crate) fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();
    for paragraph in text.split('\n') {
        let mut line = String::new();
        let mut line_width = 0;
        for word in paragraph.split_whitespace() {
            let word_width = word.width();
            let gap = usize::from(line_width > 0);
            if line_width + gap + word_width <= width {
                if gap == 1 {
                    line.push(' ');
                }
                line.push_str(word);
                line_width += gap + word_width;
                continue;
            }
            if line_width > 0 {
                lines.push(std::mem::take(&mut line));
                line_width = 0;
            }
            for c in word.chars() {
                let w = c.width().unwrap_or(0);
                if line_width + w > width && line_width > 0 {
                    lines.push(std::mem::take(&mut line));
                    line_width = 0;
                }
                line.push(c);
                line_width += w;
            }
        }
        lines.push(line);
    }
    lines
}

/// One-line view of a text field with a block cursor, scrolled so the
/// cursor stays within `width` characters.
pub(crate) fn input_line(field: &TextField, width: usize, show_cursor: bool) -> Line<'static> {
    let chars: Vec<char> = field.value().chars().collect();
    let cursor = field.cursor().min(chars.len());
    let width = width.max(1);

    // Calculate visible window of characters
    let start = if chars.len() >= width {
        let start = cursor.saturating_sub(width / 2);
        start.min(chars.len().saturating_sub(width - 1))
    } else {
        0
    };
    let end = (start + width).min(chars.len());

    let before: String = chars[start..cursor].iter().collect();
    if !show_cursor {
        let text: String = chars[start..end].iter().collect();
        return Line::from(text);
    }
    let cursor_char = chars.get(cursor).copied().unwrap_or(' ');
    let after: String = chars
        .get(cursor + 1..end.max(cursor + 1))
        .map(|rest| rest.iter().collect())
        .unwrap_or_default();

    Line::from(vec![
        Span::raw(before),
        Span::styled(
            cursor_char.to_string(),
            Style::default().bg(Color::White).fg(Color::Black),
        ),
        Span::raw(after),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEvent};

    #[test]
    fn test_truncate_to_width() {
        assert_eq!(truncate_to_width("Team Alpha", 20), "Team Alpha");
        assert_eq!(truncate_to_width("Team Alpha", 6), "Team …");
        assert_eq!(truncate_to_width("👋👋👋", 4), "👋…");
        assert_eq!(truncate_to_width("abc", 0), "");
    }

    #[test]
    fn test_wrap_text() {
        assert_eq!(
            wrap_text("Don’t forget the meeting tomorrow!", 12),
            vec!["Don’t forget", "the meeting", "tomorrow!"]
        );
        assert_eq!(wrap_text("abcdefgh", 3), vec!["abc", "def", "gh"]);
        assert_eq!(wrap_text("", 10), vec![""]);
    }

    #[test]
    fn test_input_line_keeps_cursor_visible() {
        let mut field = TextField::new();
        for c in "abcdefghijklmnopqrstuvwxyz".chars() {
            field.handle_key(KeyEvent::from(KeyCode::Char(c)));
        }
        let line = input_line(&field, 10, true);
        let text: String = line.spans.iter().map(|s| s.content.as_ref()).collect();
        assert!(text.ends_with("z "));
        assert!(text.chars().count() <= 10);

        let plain = input_line(&TextField::new(), 10, false);
        assert_eq!(plain.width(), 0);
    }
}
