use std::time::Instant;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::{Position, Rect};

use crate::error::Result;

use super::app::{App, Focus, PopupState};
use super::input_handler::InputResult;

/// Lines moved per wheel notch in the message pane
const MESSAGE_WHEEL_STEP: i32 = 3;

/// Handle a key event
pub fn handle_key_event(app: &mut App, key: KeyEvent, now: Instant) -> Result<()> {
    // Ctrl+C quits from anywhere
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.quit();
        return Ok(());
    }

    // 1. Popups take all input
    if app.popup.is_some() {
        return handle_popup_key(app, key);
    }

    // 2. Search overlay
    if app.search.open {
        return handle_search_key(app, key, now);
    }

    // 3. Composer focused
    if app.focus == Focus::Composer {
        return handle_composer_key(app, key);
    }

    // 4. List shortcuts
    handle_list_key(app, key)
}

fn handle_popup_key(app: &mut App, key: KeyEvent) -> Result<()> {
    let Some(popup) = app.popup.take() else {
        return Ok(());
    };
    match popup {
        // Any key dismisses help
        PopupState::Help => {}
        PopupState::NewChat { mut input } => match input.handle_key(key) {
            InputResult::Submit if !input.is_blank() => app.create_chat(input.value()),
            InputResult::Cancel => {}
            _ => app.popup = Some(PopupState::NewChat { input }),
        },
        PopupState::ConfirmDelete { id, title } => match key.code {
            KeyCode::Enter | KeyCode::Char('y') => app.delete_chat(&id),
            KeyCode::Esc | KeyCode::Char('n') => {}
            _ => app.popup = Some(PopupState::ConfirmDelete { id, title }),
        },
    }
    Ok(())
}

fn handle_search_key(app: &mut App, key: KeyEvent, now: Instant) -> Result<()> {
    match app.search.input.handle_key(key) {
        InputResult::Edited => app.on_search_edited(now),
        InputResult::Submit => {
            app.apply_search();
            app.close_search(false);
        }
        InputResult::Cancel => app.close_search(true),
        InputResult::Ignored => {}
    }
    Ok(())
}

fn handle_composer_key(app: &mut App, key: KeyEvent) -> Result<()> {
    match key.code {
        KeyCode::Tab => app.focus = Focus::List,
        _ => match app.composer.handle_key(key) {
            InputResult::Submit => app.send_message(),
            InputResult::Cancel => app.focus = Focus::List,
            InputResult::Edited | InputResult::Ignored => {}
        },
    }
    Ok(())
}

fn handle_list_key(app: &mut App, key: KeyEvent) -> Result<()> {
    // Ctrl shortcuts should not trigger single-char shortcuts
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return Ok(());
    }

    match key.code {
        // Quit
        KeyCode::Char('q') => app.quit(),
        KeyCode::Esc => {
            if app.search.is_filtering() {
                app.close_search(true);
            }
        }

        // Navigation
        KeyCode::Char('j') | KeyCode::Down => app.move_cursor(1),
        KeyCode::Char('k') | KeyCode::Up => app.move_cursor(-1),
        KeyCode::PageDown => app.move_cursor(app.page_rows()),
        KeyCode::PageUp => app.move_cursor(-app.page_rows()),
        KeyCode::Char('g') | KeyCode::Home => app.select_first(),
        KeyCode::Char('G') | KeyCode::End => app.select_last(),
        KeyCode::Enter => app.activate_selected(),

        // Message pane
        KeyCode::Char('J') => app.scroll_messages(-1),
        KeyCode::Char('K') => app.scroll_messages(1),
        KeyCode::Char('i') | KeyCode::Tab => {
            app.activate_selected();
            app.focus = Focus::Composer;
        }

        // Chats
        KeyCode::Char('n') => {
            app.popup = Some(PopupState::NewChat {
                input: Default::default(),
            });
        }
        KeyCode::Char('d') | KeyCode::Delete => app.request_delete(),
        KeyCode::Char('/') => app.open_search(),

        // Help
        KeyCode::Char('?') => {
            app.popup = Some(PopupState::Help);
        }

        _ => {}
    }

    Ok(())
}

fn contains(area: Rect, column: u16, row: u16) -> bool {
    area.contains(Position::new(column, row))
}

/// Handle a mouse event: the wheel scrolls whichever pane is under the
/// pointer, a left click on a list row opens that conversation.
pub fn handle_mouse_event(app: &mut App, mouse: MouseEvent) {
    if app.popup.is_some() {
        return;
    }
    let layout = app.layout;
    let (column, row) = (mouse.column, mouse.row);

    match mouse.kind {
        MouseEventKind::ScrollDown if contains(layout.list_panel, column, row) => {
            app.list.scroll_by(app.list.row_height());
        }
        MouseEventKind::ScrollUp if contains(layout.list_panel, column, row) => {
            app.list.scroll_by(-app.list.row_height());
        }
        MouseEventKind::ScrollDown if contains(layout.messages_panel, column, row) => {
            app.scroll_messages(-MESSAGE_WHEEL_STEP);
        }
        MouseEventKind::ScrollUp if contains(layout.messages_panel, column, row) => {
            app.scroll_messages(MESSAGE_WHEEL_STEP);
        }
        MouseEventKind::Down(MouseButton::Left) if contains(layout.list, column, row) => {
            let y = f32::from(row - layout.list.y) + app.list.scroll_offset();
            let index = (y / app.list.row_height()).floor() as usize;
            app.focus = Focus::List;
            app.pick(index);
        }
        MouseEventKind::Down(MouseButton::Left) if contains(layout.composer, column, row) => {
            app.focus = Focus::Composer;
        }
        _ => {}
    }
}
