use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::tui::app::App;
use crate::tui::ui::centered_rect;

const SECTIONS: &[(&str, &[(&str, &str)])] = &[
    (
        "Chat list",
        &[
            ("j/↓", "Move down"),
            ("k/↑", "Move up"),
            ("PgDn/PgUp", "Page down / up"),
            ("g / G", "Go to top / bottom"),
            ("Enter", "Open chat"),
            ("n", "New chat"),
            ("d", "Delete chat"),
            ("/", "Search chats"),
        ],
    ),
    (
        "Messages",
        &[
            ("i / Tab", "Write a message"),
            ("Enter", "Send (while writing)"),
            ("Esc", "Back to the list"),
            ("J / K", "Scroll messages"),
        ],
    ),
    (
        "General",
        &[("?", "Toggle help"), ("q / Ctrl+C", "Quit")],
    ),
];

pub fn render_help_popup(frame: &mut Frame, app: &App) {
    let area = centered_rect(50, 24, frame.area());

    let block = Block::default()
        .title(" Keybindings ")
        .borders(Borders::ALL)
        .border_style(app.theme.border)
        .style(Style::default().bg(Color::Black));

    let key_style = Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD);
    let section_style = Style::default()
        .fg(Color::White)
        .add_modifier(Modifier::BOLD);

    let mut text = vec![Line::from("")];
    for (section, bindings) in SECTIONS {
        text.push(Line::from(Span::styled(format!("  {}", section), section_style)));
        for (key, desc) in *bindings {
            text.push(Line::from(vec![
                Span::styled(format!("    {:<12}", key), key_style),
                Span::styled(*desc, app.theme.muted),
            ]));
        }
        text.push(Line::from(""));
    }
    text.push(Line::from(Span::styled(
        "  Press any key to close",
        app.theme.muted,
    )));

    frame.render_widget(Clear, area);
    frame.render_widget(Paragraph::new(text).block(block), area);
}
