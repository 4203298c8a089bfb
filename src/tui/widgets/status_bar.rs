use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::tui::app::{App, Focus, StatusKind};

pub fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(1)])
        .split(area);

    // Stats line or status message
    if let Some(ref msg) = app.status_message {
        let style = match msg.kind {
            StatusKind::Success => app.theme.success,
            StatusKind::Error => app.theme.error,
            StatusKind::Info => app.theme.info,
        };
        let line = Line::from(vec![Span::raw("  "), Span::styled(&msg.text, style)]);
        frame.render_widget(Paragraph::new(line), chunks[0]);
    } else {
        let (state, state_style) = if app.list.is_loading() {
            ("loading more", app.theme.warning)
        } else if app.list.loader().is_disarmed() {
            ("all loaded", app.theme.success)
        } else {
            ("scroll for more", app.theme.muted)
        };
        let mut stats = vec![
            Span::raw("  "),
            Span::styled(format!("{}", app.visible.len()), app.theme.info),
            Span::styled(format!("/{} chats", app.store.len()), app.theme.muted),
        ];
        let fetched = app.list.loader().total_loaded();
        if fetched > 0 {
            stats.push(Span::styled(format!(" ({} fetched)", fetched), app.theme.muted));
        }
        stats.push(Span::styled(" · ", app.theme.muted));
        stats.push(Span::styled(state, state_style));
        let stats_line = Line::from(stats);
        frame.render_widget(Paragraph::new(stats_line), chunks[0]);
    }

    // Keybindings line
    let keybindings = if app.search.open {
        vec![("Enter", "Keep filter"), ("Esc", "Clear")]
    } else {
        match app.focus {
            Focus::List => vec![
                ("?", "Help"),
                ("n", "New"),
                ("d", "Delete"),
                ("/", "Search"),
                ("i", "Write"),
                ("q", "Quit"),
            ],
            Focus::Composer => vec![("Enter", "Send"), ("Esc", "Back")],
        }
    };

    let mut spans: Vec<Span> = vec![Span::raw("  ")];
    for (i, (key, desc)) in keybindings.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled("  ", app.theme.muted));
        }
        spans.push(Span::styled(
            format!("[{}]", key),
            app.theme.muted.add_modifier(Modifier::BOLD),
        ));
        spans.push(Span::styled(format!(" {}", desc), app.theme.muted));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), chunks[1]);
}

#[cfg(test)]
mod tests {
    use std::time::Instant;

    use chatbook_common::list::LoaderPhase;
    use chatbook_common::sample;
    use ratatui::{backend::TestBackend, Terminal};

    use crate::tui::app::tests::harness;
    use crate::tui::event::Event;
    use crate::tui::ui;

    fn stats_row(terminal: &Terminal<TestBackend>) -> String {
        let buffer = terminal.backend().buffer();
        let width = usize::from(buffer.area.width);
        let rows: Vec<String> = buffer
            .content()
            .chunks(width)
            .map(|row| row.iter().map(|cell| cell.symbol()).collect())
            .collect();
        rows[rows.len() - 2].clone()
    }

    #[test]
    fn test_stats_count_fetched_chats() {
        let mut h = harness();
        let app = &mut h.app;
        let now = Instant::now();
        app.frame(now);

        let mut terminal = Terminal::new(TestBackend::new(100, 40)).unwrap();
        terminal.draw(|frame| ui::render(frame, app)).unwrap();
        let line = stats_row(&terminal);
        assert!(line.contains("14/14 chats"));
        assert!(!line.contains("fetched"));

        app.select_last();
        app.frame(now);
        let LoaderPhase::Loading { ticket, .. } = app.list.loader().phase() else {
            panic!("expected a load in flight");
        };
        let batch = sample::load_batch(&mut rand::thread_rng(), 12);
        app.handle_event(Event::BatchLoaded { ticket, result: Ok(batch) }, now)
            .unwrap();
        terminal.draw(|frame| ui::render(frame, app)).unwrap();
        assert!(stats_row(&terminal).contains("26/26 chats (12 fetched)"));
    }
}
