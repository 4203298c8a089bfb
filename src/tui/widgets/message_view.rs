use ratatui::{
    layout::{Alignment, Margin, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState},
    Frame,
};

use chatbook_common::{Chat, Sender};

use crate::tui::app::App;
use crate::tui::theme::TuiTheme;

use super::wrap_text;

const INDENT: &str = "    ";

/// Lay out every message of `chat` for a pane `width` columns wide.
/// The other party's messages sit on the left under their initials,
/// own messages are right-aligned.
pub fn message_lines(chat: &Chat, width: u16, theme: &TuiTheme) -> Vec<Line<'static>> {
    if chat.messages.is_empty() {
        return vec![
            Line::from(""),
            Line::styled("Say hi 👋", theme.muted).centered(),
        ];
    }

    let width = usize::from(width).max(1);
    let bubble_width = (width * 3 / 4).max(1);
    let mut lines = Vec::new();

    for message in &chat.messages {
        match message.sender_id {
            Sender::Other => {
                lines.push(Line::from(vec![
                    Span::styled(
                        format!("[{}] ", message.sender_id.initials()),
                        theme.active,
                    ),
                    Span::styled(
                        message.sender_id.label(),
                        theme.incoming.add_modifier(Modifier::BOLD),
                    ),
                ]));
                let wrap = bubble_width.saturating_sub(INDENT.len()).max(1);
                for chunk in wrap_text(&message.content, wrap) {
                    lines.push(Line::from(vec![
                        Span::raw(INDENT),
                        Span::styled(chunk, theme.incoming),
                    ]));
                }
                lines.push(Line::from(vec![
                    Span::raw(INDENT),
                    Span::styled(message.time_label(), theme.muted),
                ]));
            }
            Sender::Me => {
                for chunk in wrap_text(&message.content, bubble_width) {
                    lines.push(Line::styled(chunk, theme.outgoing).right_aligned());
                }
                lines.push(Line::styled(message.time_label(), theme.muted).right_aligned());
            }
        }
        lines.push(Line::from(""));
    }
    lines.pop();
    lines
}

pub fn render_message_view(frame: &mut Frame, app: &App, panel: Rect, area: Rect) {
    let Some(chat) = app.store.active_chat() else {
        let block = Block::default()
            .title(" Messages ")
            .borders(Borders::ALL)
            .border_style(app.theme.border);
        frame.render_widget(block, panel);
        let empty = Paragraph::new(vec![Line::from(""), Line::from("No chat selected")])
            .style(app.theme.muted)
            .alignment(Alignment::Center);
        frame.render_widget(empty, area);
        return;
    };

    let block = Block::default()
        .title(Span::styled(format!(" {} ", chat.title), app.theme.title))
        .borders(Borders::ALL)
        .border_style(app.theme.border);
    frame.render_widget(block, panel);

    let lines = message_lines(chat, area.width, &app.theme);
    let total = lines.len();
    let viewport = usize::from(area.height);

    // Pinned to the newest message unless scrolled back
    let max_scroll = total.saturating_sub(viewport);
    let scroll = max_scroll.saturating_sub(usize::from(app.message_scroll));
    let scroll = u16::try_from(scroll).unwrap_or(u16::MAX);
    frame.render_widget(Paragraph::new(lines).scroll((scroll, 0)), area);

    if total > viewport {
        let scrollbar = Scrollbar::new(ScrollbarOrientation::VerticalRight)
            .begin_symbol(None)
            .end_symbol(None);
        let mut scrollbar_state = ScrollbarState::new(max_scroll).position(usize::from(scroll));
        frame.render_stateful_widget(
            scrollbar,
            panel.inner(Margin::new(0, 1)),
            &mut scrollbar_state,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ThemeColors;
    use chatbook_common::Message;

    fn text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    fn chat_with(messages: &[(Sender, &str)]) -> Chat {
        let mut chat = Chat::new("c1".into(), "Team Alpha".into());
        for (i, (sender, content)) in messages.iter().enumerate() {
            chat.messages.push(Message::new(
                format!("m{}", i),
                "c1".into(),
                *sender,
                content.to_string(),
            ));
        }
        chat
    }

    #[test]
    fn test_empty_chat_invites_first_message() {
        let theme = TuiTheme::from(&ThemeColors::default());
        let lines = message_lines(&chat_with(&[]), 40, &theme);
        assert_eq!(text(&lines[1]), "Say hi 👋");
    }

    #[test]
    fn test_message_layout_by_sender() {
        let theme = TuiTheme::from(&ThemeColors::default());
        let chat = chat_with(&[(Sender::Other, "Hello"), (Sender::Me, "Hi back")]);
        let lines = message_lines(&chat, 40, &theme);

        // [B] Bot, body, time, blank, body, time
        assert_eq!(lines.len(), 6);
        assert_eq!(text(&lines[0]), "[B] Bot");
        assert_eq!(text(&lines[1]), "    Hello");
        assert_eq!(lines[3].width(), 0);
        assert_eq!(text(&lines[4]), "Hi back");
        assert_eq!(lines[4].alignment, Some(Alignment::Right));
        assert_eq!(lines[5].alignment, Some(Alignment::Right));
    }

    #[test]
    fn test_long_messages_wrap() {
        let theme = TuiTheme::from(&ThemeColors::default());
        let chat = chat_with(&[(Sender::Me, "one two three four five six seven")]);
        let lines = message_lines(&chat, 20, &theme);
        // 15 column bubble
        assert!(lines.len() > 2);
        assert!(lines.iter().all(|l| l.width() <= 15));
    }
}
