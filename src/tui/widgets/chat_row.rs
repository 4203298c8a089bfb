use ratatui::text::{Line, Span};
use unicode_width::UnicodeWidthStr;

use chatbook_common::Chat;

use crate::tui::theme::TuiTheme;

use super::truncate_to_width;

/// How a conversation row is drawn
#[derive(Debug, Clone, Copy, Default)]
pub struct ChatRowOptions {
    /// The conversation open in the message pane
    pub is_active: bool,
    /// The row under the list cursor
    pub is_selected: bool,
}

/// Lines for one conversation: title with the last message time, then the
/// preview, padded with blanks to exactly `height` lines.
pub fn render_chat_row(
    theme: &TuiTheme,
    chat: &Chat,
    width: u16,
    height: usize,
    options: ChatRowOptions,
) -> Vec<Line<'static>> {
    let width = usize::from(width);
    let marker = if options.is_selected { " >" } else { "  " };
    let marker_style = if options.is_selected {
        theme.info
    } else {
        theme.muted
    };
    let title_style = if options.is_active {
        theme.active
    } else {
        theme.title
    };

    let time = chat
        .last_message()
        .map(|m| m.time_label())
        .unwrap_or_default();
    let time_width = if time.is_empty() { 0 } else { time.width() + 1 };
    let title_width = width.saturating_sub(3 + time_width);
    let title = truncate_to_width(&chat.title, title_width);
    let gap = width.saturating_sub(3 + title.width() + time.width());

    let mut title_line = Line::from(vec![
        Span::styled(marker, marker_style),
        Span::raw(" "),
        Span::styled(title, title_style),
        Span::raw(" ".repeat(gap)),
        Span::styled(time, theme.muted),
    ]);

    let preview = truncate_to_width(chat.preview(), width.saturating_sub(3));
    let mut preview_line = Line::from(vec![
        Span::raw("   "),
        Span::styled(preview, theme.muted),
    ]);

    if options.is_selected {
        title_line = title_line.style(theme.selected);
        preview_line = preview_line.style(theme.selected);
    }

    let mut lines = vec![title_line, preview_line];
    lines.truncate(height);
    lines.resize(height, Line::default());
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ThemeColors;
    use chatbook_common::{Message, Sender};

    fn text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    fn theme() -> TuiTheme {
        TuiTheme::from(&ThemeColors::default())
    }

    #[test]
    fn test_row_is_padded_to_height() {
        let chat = Chat::new("c1".into(), "Ideas".into());
        let lines = render_chat_row(&theme(), &chat, 30, 3, ChatRowOptions::default());
        assert_eq!(lines.len(), 3);
        assert!(text(&lines[0]).contains("Ideas"));
        assert!(text(&lines[1]).contains("No messages"));
        assert_eq!(lines[2].width(), 0);

        let short = render_chat_row(&theme(), &chat, 30, 1, ChatRowOptions::default());
        assert_eq!(short.len(), 1);
    }

    #[test]
    fn test_long_title_is_truncated_to_width() {
        let mut chat = Chat::new("c1".into(), "A very long conversation title".into());
        chat.messages.push(Message::new(
            "m1".into(),
            "c1".into(),
            Sender::Other,
            "Hello there, this preview is long too".into(),
        ));
        let options = ChatRowOptions {
            is_active: true,
            is_selected: true,
        };
        let lines = render_chat_row(&theme(), &chat, 24, 2, options);
        assert!(lines.iter().all(|l| l.width() <= 24));
        assert!(text(&lines[0]).starts_with(" >"));
        assert!(text(&lines[0]).contains('…'));
        assert!(text(&lines[1]).ends_with('…'));
    }
}
