use ratatui::{
    layout::{Alignment, Margin, Rect},
    text::Line,
    widgets::{Block, Borders, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState},
    Frame,
};

use crate::tui::app::{App, Focus};

use super::chat_row::{render_chat_row, ChatRowOptions};

/// Render the conversation list. Only rows inside the list window are
/// built; the spacer above them is skipped by scrolling the paragraph.
pub fn render_chat_list(frame: &mut Frame, app: &App, panel: Rect, area: Rect) {
    let focused = app.focus == Focus::List && !app.search.open;
    let total = app.store.len();
    let title = if app.search.is_filtering() {
        format!(" Chats ({} of {}) ", app.visible.len(), total)
    } else {
        format!(" Chats ({}) ", total)
    };
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(if focused {
            app.theme.focused_border
        } else {
            app.theme.border
        });
    frame.render_widget(block, panel);

    if app.visible.is_empty() {
        let text = if app.search.is_filtering() {
            "No chats match"
        } else {
            "No chats. Press n to start one."
        };
        let empty = Paragraph::new(vec![Line::from(""), Line::from(text)])
            .style(app.theme.muted)
            .alignment(Alignment::Center);
        frame.render_widget(empty, area);
        return;
    }

    let row_height = app.list.row_height().round().max(1.0) as usize;
    let window = app.list.window();
    let range = window.range.clamp_to(app.visible.len());
    let active_id = app.store.active_id();

    let mut lines: Vec<Line> = Vec::with_capacity(range.len() * row_height + 1);
    for (offset, &store_index) in app.list.visible(&app.visible).iter().enumerate() {
        let Some(chat) = app.store.get(store_index) else {
            continue;
        };
        let options = ChatRowOptions {
            is_active: active_id == Some(chat.id.as_str()),
            is_selected: range.start + offset == app.cursor,
        };
        lines.extend(render_chat_row(
            &app.theme,
            chat,
            area.width,
            row_height,
            options,
        ));
    }

    // Sentinel row after the last item
    if range.end == app.visible.len() {
        let sentinel = if app.list.is_loading() {
            Line::styled("   Loading...", app.theme.warning)
        } else if app.list.loader().is_disarmed() {
            Line::styled("   All chats loaded", app.theme.muted)
        } else {
            Line::default()
        };
        lines.push(sentinel);
    }

    let scroll = (app.list.scroll_offset() - window.top_spacer).max(0.0).round() as u16;
    frame.render_widget(Paragraph::new(lines).scroll((scroll, 0)), area);

    let content_height = app.list.content_height().ceil() as usize;
    let viewport = usize::from(area.height);
    if content_height > viewport {
        let scrollbar = Scrollbar::new(ScrollbarOrientation::VerticalRight)
            .begin_symbol(None)
            .end_symbol(None);
        let mut scrollbar_state = ScrollbarState::new(content_height - viewport)
            .position(app.list.scroll_offset().round() as usize);
        frame.render_stateful_widget(
            scrollbar,
            panel.inner(Margin::new(0, 1)),
            &mut scrollbar_state,
        );
    }
}

#[cfg(test)]
mod tests {
    use std::time::Instant;

    use crossterm::event::{KeyCode, KeyEvent};
    use ratatui::{backend::TestBackend, Terminal};

    use crate::tui::app::tests::harness;
    use crate::tui::ui;

    fn screen(terminal: &Terminal<TestBackend>) -> String {
        let buffer = terminal.backend().buffer();
        buffer
            .content()
            .chunks(usize::from(buffer.area.width))
            .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_renders_only_windowed_rows() {
        let mut h = harness();
        let app = &mut h.app;
        app.frame(Instant::now());

        let mut terminal = Terminal::new(TestBackend::new(100, 40)).unwrap();
        terminal.draw(|frame| ui::render(frame, app)).unwrap();
        let text = screen(&terminal);
        assert!(text.contains("Chats (14)"));
        assert!(text.contains("Personal"));

        // Scroll to the end: the first row leaves the window entirely
        app.select_last();
        app.frame(Instant::now());
        terminal.draw(|frame| ui::render(frame, app)).unwrap();
        let text = screen(&terminal);
        let last = app.store.get(app.visible[13]).unwrap().title.clone();
        assert!(text.contains(&last));
        assert!(text.contains("Loading..."));
    }

    #[test]
    fn test_empty_search_result() {
        let mut h = harness();
        let app = &mut h.app;
        for c in "zzzz-no-such-chat".chars() {
            app.search.input.handle_key(KeyEvent::from(KeyCode::Char(c)));
        }
        app.apply_search();
        app.frame(Instant::now());

        let mut terminal = Terminal::new(TestBackend::new(100, 40)).unwrap();
        terminal.draw(|frame| ui::render(frame, app)).unwrap();
        let text = screen(&terminal);
        assert!(text.contains("No chats match"));
        assert!(text.contains("Chats (0 of 14)"));
    }
}
