use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent, MouseEventKind};
use crate::app::{App, EditTarget, InputMode, Screen};
use crate::tui::AppEvent;

/// Convert a character index to a byte index for UTF-8 safe string operations
fn char_to_byte_index(s: &str, char_idx: usize) -> usize {
    s.char_indices()
        .nth(char_idx)
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}

pub fn handle_event(app: &mut App, event: AppEvent) {
    match event {
        AppEvent::Key(key) => handle_key(app, key),
        AppEvent::Mouse(mouse) => handle_mouse(app, mouse),
        AppEvent::Resize => {}
        AppEvent::Tick => app.tick_animation(),
        AppEvent::Api(outcome) => app.session.apply(outcome),
    }
}

fn handle_key(app: &mut App, key: KeyEvent) {
    // Global keys that work in any mode
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.should_quit = true;
        return;
    }

    match app.input_mode {
        InputMode::Normal => handle_normal_mode(app, key),
        InputMode::Editing => handle_editing_mode(app, key),
    }
}

fn handle_normal_mode(app: &mut App, key: KeyEvent) {
    // Keys shared by every screen
    match key.code {
        KeyCode::Char('q') => {
            app.should_quit = true;
            return;
        }
        KeyCode::Tab => {
            app.switch_screen(app.screen.next());
            return;
        }
        KeyCode::BackTab => {
            app.switch_screen(app.screen.prev());
            return;
        }
        KeyCode::Char(c @ '1'..='5') => {
            let idx = c as usize - '1' as usize;
            if let Some(screen) = Screen::from_index(idx) {
                app.switch_screen(screen);
            }
            return;
        }
        KeyCode::Char('j') | KeyCode::Down => {
            app.scroll_down(1);
            return;
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.scroll_up(1);
            return;
        }
        KeyCode::Char('d') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.scroll_half_page_down();
            return;
        }
        KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.scroll_half_page_up();
            return;
        }
        KeyCode::Char('g') => {
            app.scroll_top();
            return;
        }
        KeyCode::Char('G') => {
            app.scroll_bottom();
            return;
        }
        _ => {}
    }

    match app.screen {
        Screen::Chat => handle_chat_normal(app, key),
        _ => handle_document_normal(app, key),
    }
}

fn handle_chat_normal(app: &mut App, key: KeyEvent) {
    if app.session.feedback.visible {
        match key.code {
            KeyCode::Char('+') | KeyCode::Char('l') | KeyCode::Right => {
                app.session.nudge_rating(1);
                return;
            }
            KeyCode::Char('-') | KeyCode::Char('h') | KeyCode::Left => {
                app.session.nudge_rating(-1);
                return;
            }
            KeyCode::Char('c') => {
                app.start_editing(EditTarget::Comment);
                return;
            }
            KeyCode::Char('f') => {
                app.submit_feedback();
                return;
            }
            KeyCode::Char('s') => {
                app.session.skip_feedback();
                return;
            }
            _ => {}
        }
    }

    match key.code {
        KeyCode::Char('i') | KeyCode::Char('a') | KeyCode::Enter => {
            app.start_editing(EditTarget::Question);
        }
        _ => {}
    }
}

fn handle_document_normal(app: &mut App, key: KeyEvent) {
    match key.code {
        // Load when idle, retry when errored; ignored while loading or loaded
        KeyCode::Enter | KeyCode::Char('l') | KeyCode::Char('r') => app.load_current_tab(),
        _ => {}
    }
}

fn handle_editing_mode(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => {
            app.input_mode = InputMode::Normal;
            return;
        }
        KeyCode::Enter => {
            match app.edit_target {
                EditTarget::Question => app.submit_question(),
                EditTarget::Comment => app.input_mode = InputMode::Normal,
            }
            return;
        }
        _ => {}
    }

    let (text, cursor) = match app.edit_target {
        EditTarget::Question => (&mut app.session.input, &mut app.question_cursor),
        EditTarget::Comment => (&mut app.session.feedback.comment, &mut app.comment_cursor),
    };
    edit_text(text, cursor, key);
}

/// Apply a single editing key to `text` with a character cursor.
fn edit_text(text: &mut String, cursor: &mut usize, key: KeyEvent) {
    let char_count = text.chars().count();
    *cursor = (*cursor).min(char_count);

    match key.code {
        KeyCode::Backspace => {
            if *cursor > 0 {
                *cursor -= 1;
                let byte_pos = char_to_byte_index(text, *cursor);
                text.remove(byte_pos);
            }
        }
        KeyCode::Delete => {
            if *cursor < char_count {
                let byte_pos = char_to_byte_index(text, *cursor);
                text.remove(byte_pos);
            }
        }
        KeyCode::Left => {
            *cursor = cursor.saturating_sub(1);
        }
        KeyCode::Right => {
            *cursor = (*cursor + 1).min(char_count);
        }
        KeyCode::Home => {
            *cursor = 0;
        }
        KeyCode::End => {
            *cursor = char_count;
        }
        KeyCode::Char(c) => {
            let byte_pos = char_to_byte_index(text, *cursor);
            text.insert(byte_pos, c);
            *cursor += 1;
        }
        _ => {}
    }
}

fn handle_mouse(app: &mut App, mouse: MouseEvent) {
    match mouse.kind {
        MouseEventKind::ScrollDown => app.scroll_down(3),
        MouseEventKind::ScrollUp => app.scroll_up(3),
        _ => {}
    }
}
