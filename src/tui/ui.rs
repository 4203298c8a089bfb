use ratatui::{
    layout::{Constraint, Direction, Layout, Margin, Rect},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use super::app::{App, PopupState};
use super::widgets::{
    chat_list::render_chat_list, composer::render_composer, help_popup::render_help_popup,
    input_dialog::render_confirm_dialog, input_dialog::render_input_dialog,
    message_view::render_message_view, status_bar::render_status_bar,
};

/// Screen regions shared by rendering and input handling
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScreenLayout {
    pub header: Rect,
    /// Bordered conversation list panel
    pub list_panel: Rect,
    /// Scrollable rows inside the list panel
    pub list: Rect,
    pub messages_panel: Rect,
    pub messages: Rect,
    pub composer: Rect,
    pub status: Rect,
}

pub fn screen_layout(area: Rect) -> ScreenLayout {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Header
            Constraint::Min(3),    // Content
            Constraint::Length(2), // Status bar
        ])
        .split(area);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(38), Constraint::Min(20)])
        .split(rows[1]);

    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(3)])
        .split(columns[1]);

    let inset = Margin::new(1, 1);
    ScreenLayout {
        header: rows[0],
        list_panel: columns[0],
        list: columns[0].inner(inset),
        messages_panel: right[0],
        messages: right[0].inner(inset),
        composer: right[1],
        status: rows[2],
    }
}

/// Render the entire UI
pub fn render(frame: &mut Frame, app: &App) {
    let layout = screen_layout(frame.area());

    render_header(frame, app, layout.header);
    render_chat_list(frame, app, layout.list_panel, layout.list);
    render_message_view(frame, app, layout.messages_panel, layout.messages);
    render_composer(frame, app, layout.composer);
    render_status_bar(frame, app, layout.status);

    // Render popup if active
    if let Some(ref popup) = app.popup {
        render_popup(frame, app, popup);
    }
}

fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let mut spans = vec![
        Span::styled("  chatbook", app.theme.title),
        Span::raw("  "),
    ];

    if app.search.open {
        let input = &app.search.input;
        let (before, after) = split_at_char(input.value(), input.cursor());
        spans.push(Span::styled("/", app.theme.warning));
        spans.push(Span::raw(before.to_string()));
        spans.push(Span::styled("▏", app.theme.warning));
        spans.push(Span::raw(after.to_string()));
        spans.push(Span::styled("  (Enter keep · Esc clear)", app.theme.muted));
    } else if app.search.is_filtering() {
        spans.push(Span::styled(
            format!("[Search: {}]", app.search.applied),
            app.theme.warning,
        ));
        spans.push(Span::styled(" (/ to edit)", app.theme.muted));
    } else {
        spans.push(Span::styled("Search chats... (/)", app.theme.muted));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_popup(frame: &mut Frame, app: &App, popup: &PopupState) {
    match popup {
        PopupState::Help => render_help_popup(frame, app),
        PopupState::NewChat { input } => {
            render_input_dialog(frame, app, "New chat", "Title is required", input)
        }
        PopupState::ConfirmDelete { title, .. } => render_confirm_dialog(
            frame,
            app,
            "Delete chat",
            &format!("Delete \"{}\"? This cannot be undone.", title),
            "Delete",
        ),
    }
}

/// Split `text` at a character index
pub fn split_at_char(text: &str, index: usize) -> (&str, &str) {
    let byte = text
        .char_indices()
        .nth(index)
        .map(|(i, _)| i)
        .unwrap_or(text.len());
    text.split_at(byte)
}

/// Helper function to create a centered rect
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width.min(area.width), height.min(area.height))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_regions() {
        let layout = screen_layout(Rect::new(0, 0, 100, 40));
        assert_eq!(layout.header.height, 1);
        assert_eq!(layout.status.height, 2);
        assert_eq!(layout.list_panel.height, 37);
        assert_eq!(layout.list.height, 35);
        assert_eq!(layout.composer.height, 3);
        assert!(layout.list.width < layout.list_panel.width);
        assert_eq!(layout.messages_panel.x, layout.list_panel.right());
    }

    #[test]
    fn test_split_at_char() {
        assert_eq!(split_at_char("héllo", 2), ("hé", "llo"));
        assert_eq!(split_at_char("abc", 10), ("abc", ""));
    }

    #[test]
    fn test_centered_rect_clamps() {
        let area = Rect::new(0, 0, 20, 10);
        assert_eq!(centered_rect(10, 4, area), Rect::new(5, 3, 10, 4));
        assert_eq!(centered_rect(50, 40, area), Rect::new(0, 0, 20, 10));
    }
}
