use ratatui::style::{Color, Modifier, Style};

use crate::config::{Rgb, ThemeColors};

fn fg(rgb: Rgb) -> Style {
    Style::default().fg(Color::Rgb(rgb.r, rgb.g, rgb.b))
}

/// TUI theme with ratatui styles
#[derive(Debug, Clone)]
pub struct TuiTheme {
    pub muted: Style,
    pub success: Style,
    pub warning: Style,
    pub error: Style,
    pub info: Style,
    /// Title of the active conversation
    pub active: Style,
    /// Row under the list cursor
    pub selected: Style,
    pub border: Style,
    pub focused_border: Style,
    pub title: Style,
    /// The other party's messages
    pub incoming: Style,
    /// Own messages
    pub outgoing: Style,
}

impl From<&ThemeColors> for TuiTheme {
    fn from(colors: &ThemeColors) -> Self {
        Self {
            muted: fg(colors.muted),
            success: fg(colors.success),
            warning: fg(colors.warning),
            error: fg(colors.error),
            info: fg(colors.info),
            active: fg(colors.accent).add_modifier(Modifier::BOLD),
            selected: Style::default()
                .bg(Color::Rgb(50, 50, 70))
                .add_modifier(Modifier::BOLD),
            border: Style::default().fg(Color::Rgb(80, 80, 100)),
            focused_border: fg(colors.accent),
            title: Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
            incoming: fg(colors.info),
            outgoing: fg(colors.success),
        }
    }
}
