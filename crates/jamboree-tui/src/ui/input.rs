//! Keyboard input handling for the TUI.
//!
//! This module handles all keyboard events and translates them into
//! application state changes.

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};

use crate::app::{can_add_input_char, App, AppState, FormOp, Tab, PAGE_SCROLL_SIZE};

/// Handle keyboard input. Returns true if the app should quit.
pub fn handle_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    match app.state {
        AppState::ShowingHelp => {
            if matches!(key.code, KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')) {
                app.state = AppState::Normal;
            }
            Ok(false)
        }
        AppState::ConfirmingQuit => Ok(handle_quit_input(app, key)),
        AppState::Searching => {
            handle_search_input(app, key);
            Ok(false)
        }
        AppState::Form => {
            handle_form_input(app, key);
            Ok(false)
        }
        AppState::ConfirmingDelete => {
            handle_delete_input(app, key);
            Ok(false)
        }
        AppState::Unlocking => {
            handle_unlock_input(app, key);
            Ok(false)
        }
        AppState::ImportingCsv => {
            handle_import_input(app, key);
            Ok(false)
        }
        AppState::Quitting => Ok(true),
        AppState::Normal => {
            handle_normal_input(app, key);
            Ok(false)
        }
    }
}

fn handle_normal_input(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') => {
            app.state = AppState::ConfirmingQuit;
        }
        KeyCode::Char('?') => {
            app.state = AppState::ShowingHelp;
        }
        KeyCode::Char('1') => app.switch_tab(Tab::Items),
        KeyCode::Char('2') => app.switch_tab(Tab::Leaders),
        KeyCode::Char('3') => app.switch_tab(Tab::Scouts),
        KeyCode::Char('4') => app.switch_tab(Tab::Summary),
        KeyCode::Left => app.switch_tab(app.current_tab.prev()),
        KeyCode::Right => app.switch_tab(app.current_tab.next()),
        KeyCode::Up | KeyCode::Char('k') => app.move_selection(-1),
        KeyCode::Down | KeyCode::Char('j') => app.move_selection(1),
        KeyCode::PageUp => app.move_selection(-(PAGE_SCROLL_SIZE as isize)),
        KeyCode::PageDown => app.move_selection(PAGE_SCROLL_SIZE as isize),
        KeyCode::Home => app.select_first(),
        KeyCode::End => app.select_last(),
        KeyCode::Char('u') => {
            app.status_message = None;
            app.refresh_current_tab();
        }
        KeyCode::Char('/') => {
            if app.current_tab != Tab::Summary && scouts_visible(app) {
                app.state = AppState::Searching;
            }
        }
        KeyCode::Char('s') if app.current_tab == Tab::Items => app.cycle_status_filter(),
        KeyCode::Char('g') => app.cycle_group_filter(),
        KeyCode::Char('n') => {
            if scouts_visible(app) {
                app.open_create_form();
            }
        }
        KeyCode::Enter if app.current_tab == Tab::Scouts && !app.gate.is_open() => app.start_unlock(),
        KeyCode::Char('e') | KeyCode::Enter => {
            if scouts_visible(app) {
                app.open_edit_form();
            }
        }
        KeyCode::Char('d') => app.request_delete(),
        KeyCode::Char('i') => app.start_import(),
        KeyCode::Char('L') => app.lock_scouts(),
        KeyCode::Esc => {
            app.status_message = None;
        }
        _ => {}
    }
}

/// The scouts tab hides every row action until the gate is open
fn scouts_visible(app: &App) -> bool {
    app.current_tab != Tab::Scouts || app.gate.is_open()
}

fn handle_quit_input(app: &mut App, key: KeyEvent) -> bool {
    match key.code {
        KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
            app.state = AppState::Quitting;
            true
        }
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
            app.state = AppState::Normal;
            false
        }
        _ => false,
    }
}

fn handle_search_input(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => {
            app.state = AppState::Normal;
            app.set_search_text(String::new());
        }
        KeyCode::Enter => {
            // Keep search query active
            app.state = AppState::Normal;
        }
        KeyCode::Backspace => {
            let mut text = app.search_text().to_string();
            if text.pop().is_some() {
                app.set_search_text(text);
            }
        }
        KeyCode::Char(c) => {
            let mut text = app.search_text().to_string();
            if can_add_input_char(text.chars().count(), c) {
                text.push(c);
                app.set_search_text(text);
            }
        }
        _ => {}
    }
}

fn handle_form_input(app: &mut App, key: KeyEvent) {
    let on_choice = app.focused_field_kind().is_some_and(|kind| kind.is_choice());

    match key.code {
        KeyCode::Esc => app.cancel_form(),
        KeyCode::Enter => app.submit_form(),
        KeyCode::Tab | KeyCode::Down => {
            app.form_op(FormOp::Next);
        }
        KeyCode::BackTab | KeyCode::Up => {
            app.form_op(FormOp::Prev);
        }
        KeyCode::Left if on_choice => {
            app.form_op(FormOp::Cycle { forward: false });
        }
        KeyCode::Right if on_choice => {
            app.form_op(FormOp::Cycle { forward: true });
        }
        KeyCode::Backspace => {
            app.form_op(FormOp::Backspace);
        }
        KeyCode::Char(c) => {
            app.form_op(FormOp::Type(c));
        }
        _ => {}
    }
}

fn handle_delete_input(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('y') | KeyCode::Char('Y') => app.confirm_delete(),
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => app.cancel_delete(),
        _ => {}
    }
}

fn handle_unlock_input(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => {
            app.unlock_input.clear();
            app.unlock_error = None;
            app.state = AppState::Normal;
        }
        KeyCode::Enter => app.attempt_unlock(),
        KeyCode::Backspace => {
            app.unlock_input.pop();
        }
        KeyCode::Char(c) => {
            if can_add_input_char(app.unlock_input.chars().count(), c) {
                app.unlock_input.push(c);
            }
        }
        _ => {}
    }
}

fn handle_import_input(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => {
            app.import_path.clear();
            app.state = AppState::Normal;
        }
        KeyCode::Enter => app.submit_import(),
        KeyCode::Backspace => {
            app.import_path.pop();
        }
        KeyCode::Char(c) => {
            if can_add_input_char(app.import_path.chars().count(), c) {
                app.import_path.push(c);
            }
        }
        _ => {}
    }
}
