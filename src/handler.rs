use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent, MouseEventKind};
use ratatui::layout::Rect;
use crate::app::{App, FocusPane};
use crate::tui::AppEvent;

pub fn handle_event(app: &mut App, event: AppEvent) {
    match event {
        AppEvent::Key(key) => handle_key(app, key),
        AppEvent::Mouse(mouse) => handle_mouse(app, mouse),
        AppEvent::Paste(text) => handle_paste(app, text),
        AppEvent::Resize(width, height) => {
            // The next draw lays out against the new frame size
            tracing::debug!("terminal resized to {}x{}", width, height);
        }
        AppEvent::Tick => {
            app.tick_animation();
        }
    }
}

fn handle_key(app: &mut App, key: KeyEvent) {
    // Global keys that work with any focus
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.should_quit = true;
        return;
    }
    if key.code == KeyCode::Char('t') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.toggle_theme();
        return;
    }

    // Tab cycles focus; the chat pane is skipped until a video is ready
    if key.code == KeyCode::Tab {
        app.focus_next();
        return;
    }
    if key.code == KeyCode::BackTab {
        app.focus_prev();
        return;
    }

    match app.focus {
        FocusPane::VideoInput => handle_video_input_key(app, key),
        FocusPane::ChatInput => handle_chat_input_key(app, key),
        FocusPane::Transcript => handle_transcript_key(app, key),
    }
}

fn handle_video_input_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Enter => app.submit_video(),
        KeyCode::Esc => app.focus = FocusPane::Transcript,

        // The field is read-only while its request is in flight
        _ if app.video_busy() => {}

        KeyCode::Backspace => {
            app.video_input.backspace();
            app.refresh_url_feedback();
        }
        KeyCode::Delete => {
            app.video_input.delete();
            app.refresh_url_feedback();
        }
        KeyCode::Left => app.video_input.move_left(),
        KeyCode::Right => app.video_input.move_right(),
        KeyCode::Home => app.video_input.move_home(),
        KeyCode::End => app.video_input.move_end(),
        KeyCode::Char(c) => {
            app.video_input.insert_char(c);
            app.refresh_url_feedback();
        }
        _ => {}
    }
}

fn handle_chat_input_key(app: &mut App, key: KeyEvent) {
    match key.code {
        // Shift+Enter and Alt+Enter insert a line break; many terminals do
        // not forward Shift+Enter, so both are accepted
        KeyCode::Enter
            if key.modifiers.contains(KeyModifiers::SHIFT)
                || key.modifiers.contains(KeyModifiers::ALT) =>
        {
            if !app.chat_busy() {
                app.chat_input.insert_newline();
            }
        }
        KeyCode::Enter => app.send_chat(),

        // Esc clears a draft; on an empty field it leaves the pane instead
        KeyCode::Esc => {
            if app.chat_input.is_empty() {
                app.focus = FocusPane::Transcript;
            } else {
                app.chat_input.clear();
            }
        }

        // The field is read-only while a reply is pending
        _ if app.chat_busy() => {}

        KeyCode::Backspace => app.chat_input.backspace(),
        KeyCode::Delete => app.chat_input.delete(),
        KeyCode::Left => app.chat_input.move_left(),
        KeyCode::Right => app.chat_input.move_right(),
        KeyCode::Home => app.chat_input.move_home(),
        KeyCode::End => app.chat_input.move_end(),
        KeyCode::Char(c) => app.chat_input.insert_char(c),
        _ => {}
    }
}

fn handle_transcript_key(app: &mut App, key: KeyEvent) {
    match key.code {
        // Quit
        KeyCode::Char('q') => app.should_quit = true,

        // Theme toggle without a modifier, mirroring Ctrl+T
        KeyCode::Char('t') => app.toggle_theme(),

        // Scrolling; the render pass clamps to the last line
        KeyCode::Char('j') | KeyCode::Down => {
            app.transcript_scroll = app.transcript_scroll.saturating_add(1);
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.transcript_scroll = app.transcript_scroll.saturating_sub(1);
        }
        KeyCode::PageDown => {
            app.transcript_scroll = app.transcript_scroll.saturating_add(10);
        }
        KeyCode::PageUp => {
            app.transcript_scroll = app.transcript_scroll.saturating_sub(10);
        }

        // Jump to top/bottom
        KeyCode::Char('g') => app.transcript_scroll = 0,
        KeyCode::Char('G') => app.scroll_pending = true,

        _ => {}
    }
}

fn handle_paste(app: &mut App, text: String) {
    match app.focus {
        FocusPane::VideoInput => {
            if app.video_busy() {
                return;
            }
            // URLs are single-line
            for c in text.chars().filter(|c| *c != '\n' && *c != '\r') {
                app.video_input.insert_char(c);
            }
            app.refresh_url_feedback();
        }
        FocusPane::ChatInput => {
            if app.chat_busy() {
                return;
            }
            for c in text.chars() {
                if c == '\n' {
                    app.chat_input.insert_newline();
                } else if c != '\r' {
                    app.chat_input.insert_char(c);
                }
            }
        }
        FocusPane::Transcript => {}
    }
}

/// Check if a point is within a rectangle
fn point_in_rect(x: u16, y: u16, rect: Rect) -> bool {
    x >= rect.x && x < rect.x + rect.width && y >= rect.y && y < rect.y + rect.height
}

fn handle_mouse(app: &mut App, mouse: MouseEvent) {
    let x = mouse.column;
    let y = mouse.row;

    let in_transcript = app
        .transcript_area
        .map(|r| point_in_rect(x, y, r))
        .unwrap_or(false);

    match mouse.kind {
        MouseEventKind::ScrollDown => {
            if in_transcript {
                app.transcript_scroll = app.transcript_scroll.saturating_add(3);
            }
        }
        MouseEventKind::ScrollUp => {
            if in_transcript {
                app.transcript_scroll = app.transcript_scroll.saturating_sub(3);
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    #[test]
    fn test_resize_passes_through_without_state_change() {
        let mut app = App::new(&Config::new());

        handle_event(&mut app, AppEvent::Resize(120, 40));

        assert!(!app.should_quit);
        assert_eq!(app.transcript_scroll, 0);
        assert!(app.status.is_none());
    }
}
