use crate::tui::app::{App, View};
use crossterm::event::{KeyCode, KeyEvent};

pub fn handle_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') => app.should_quit = true,
        KeyCode::Char('?') => {
            app.view = if app.view == View::Help { View::Chart } else { View::Help };
        }
        KeyCode::Esc if app.view == View::Help => app.view = View::Chart,
        KeyCode::Char('r') => app.request_submit(),
        KeyCode::Char('t') => app.cycle_theme(),
        _ => {}
    }
}
