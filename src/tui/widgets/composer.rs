use ratatui::{
    layout::Rect,
    text::Line,
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::tui::app::{App, Focus};

use super::input_line;

pub fn render_composer(frame: &mut Frame, app: &App, area: Rect) {
    let focused = app.focus == Focus::Composer && app.popup.is_none();
    let block = Block::default()
        .title(" Message ")
        .borders(Borders::ALL)
        .border_style(if focused {
            app.theme.focused_border
        } else {
            app.theme.border
        });
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let width = usize::from(inner.width.saturating_sub(1));
    let line = if focused {
        input_line(&app.composer, width, true)
    } else if app.composer.value().is_empty() {
        let hint = if app.store.active_chat().is_some() {
            "Type a message... (i)"
        } else {
            "Open a chat to send messages"
        };
        Line::styled(hint, app.theme.muted)
    } else {
        input_line(&app.composer, width, false)
    };

    frame.render_widget(Paragraph::new(line), inner);
}
