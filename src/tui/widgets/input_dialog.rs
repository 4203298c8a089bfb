use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::tui::app::App;
use crate::tui::input_handler::TextField;
use crate::tui::ui::centered_rect;

use super::input_line;

fn key_hints(confirm: &str) -> Line<'static> {
    Line::from(vec![
        Span::raw("  "),
        Span::styled("[Enter]", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(format!(" {}  ", confirm)),
        Span::styled("[Esc]", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(" Cancel"),
    ])
}

pub fn render_input_dialog(
    frame: &mut Frame,
    app: &App,
    title: &str,
    hint: &str,
    input: &TextField,
) {
    let width = 50.min(frame.area().width.saturating_sub(4));
    let area = centered_rect(width, 8, frame.area());

    let block = Block::default()
        .title(format!(" {} ", title))
        .borders(Borders::ALL)
        .border_style(app.theme.focused_border)
        .style(Style::default().bg(Color::Black));

    let inner = block.inner(area);
    frame.render_widget(Clear, area);
    frame.render_widget(block, area);

    let input_width = usize::from(inner.width.saturating_sub(4));
    let mut field = input_line(input, input_width, true);
    field.spans.insert(0, Span::raw("  "));

    let hint_style = if input.is_blank() {
        app.theme.muted
    } else {
        app.theme.success
    };

    let text = vec![
        Line::from(""),
        field,
        Line::from(""),
        Line::from(Span::styled(format!("  {}", hint), hint_style)),
        Line::from(""),
        key_hints("Confirm"),
    ];

    frame.render_widget(Paragraph::new(text), inner);
}

pub fn render_confirm_dialog(
    frame: &mut Frame,
    app: &App,
    title: &str,
    description: &str,
    confirm_label: &str,
) {
    let width = 50.min(frame.area().width.saturating_sub(4));
    let area = centered_rect(width, 8, frame.area());

    let block = Block::default()
        .title(format!(" {} ", title))
        .borders(Borders::ALL)
        .border_style(app.theme.error)
        .style(Style::default().bg(Color::Black));

    let inner = block.inner(area);
    frame.render_widget(Clear, area);
    frame.render_widget(block, area);

    let text = vec![
        Line::from(""),
        Line::from(format!("  {}", description)),
        Line::from(""),
        key_hints(confirm_label),
    ];

    frame.render_widget(Paragraph::new(text).wrap(Wrap { trim: false }), inner);
}
