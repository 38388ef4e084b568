//! Single-line text input shared by the search and filter boxes.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::text::Span;
use ratatui::widgets::{Block, BorderType, Borders, Paragraph};
use tui_input::{Input, InputRequest};

use crate::theme;

/// Editing request for a key press, if it edits or moves within the input.
pub fn key_to_request(key: KeyEvent) -> Option<InputRequest> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let alt = key.modifiers.contains(KeyModifiers::ALT);
    match key.code {
        KeyCode::Char('u') if ctrl => Some(InputRequest::DeleteLine),
        KeyCode::Char('w') if ctrl => Some(InputRequest::DeletePrevWord),
        KeyCode::Char('a') if ctrl => Some(InputRequest::GoToStart),
        KeyCode::Char('e') if ctrl => Some(InputRequest::GoToEnd),
        KeyCode::Char(c) if !ctrl && !alt => Some(InputRequest::InsertChar(c)),
        KeyCode::Backspace if ctrl || alt => Some(InputRequest::DeletePrevWord),
        KeyCode::Backspace => Some(InputRequest::DeletePrevChar),
        KeyCode::Delete => Some(InputRequest::DeleteNextChar),
        KeyCode::Left if ctrl => Some(InputRequest::GoToPrevWord),
        KeyCode::Right if ctrl => Some(InputRequest::GoToNextWord),
        KeyCode::Left => Some(InputRequest::GoToPrevChar),
        KeyCode::Right => Some(InputRequest::GoToNextChar),
        KeyCode::Home => Some(InputRequest::GoToStart),
        KeyCode::End => Some(InputRequest::GoToEnd),
        _ => None,
    }
}

/// Apply `key` to `input`; `true` when the value changed.
pub fn edit(input: &mut Input, key: KeyEvent) -> bool {
    key_to_request(key)
        .and_then(|req| input.handle(req))
        .is_some_and(|changed| changed.value)
}

/// Insert the first non-blank line of `text` at the cursor; `true` when the
/// value changed. Queries are single-line, so the rest is dropped.
pub fn paste(input: &mut Input, text: &str) -> bool {
    let Some(line) = text.lines().map(str::trim).find(|l| !l.is_empty()) else {
        return false;
    };
    let mut changed = false;
    for c in line.chars().filter(|c| !c.is_control()) {
        changed |= input
            .handle(InputRequest::InsertChar(c))
            .is_some_and(|s| s.value);
    }
    changed
}

/// Bordered input box. Shows `placeholder` when empty and places the
/// terminal cursor while `editing`.
pub fn render_input(
    frame: &mut Frame,
    area: Rect,
    input: &Input,
    title: &str,
    placeholder: &str,
    editing: bool,
) {
    let block = Block::default()
        .title(format!(" {title} "))
        .title_style(theme::title_style())
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(if editing {
            theme::border_focused()
        } else {
            theme::border_default()
        });
    let inner = block.inner(area);
    let width = usize::from(inner.width.max(1));
    let scroll = input.visual_scroll(width.saturating_sub(1));

    let content = if input.value().is_empty() {
        Paragraph::new(Span::styled(placeholder.to_owned(), theme::muted()))
    } else {
        Paragraph::new(Span::styled(input.value().to_owned(), theme::table_row()))
            .scroll((0, u16::try_from(scroll).unwrap_or(u16::MAX)))
    };
    frame.render_widget(content.block(block), area);

    if editing {
        let offset = input.visual_cursor().saturating_sub(scroll);
        let x = inner
            .x
            .saturating_add(u16::try_from(offset).unwrap_or(u16::MAX))
            .min(inner.right().saturating_sub(1));
        frame.set_cursor_position((x, inner.y));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn typing_and_deleting_edits_value() {
        let mut input = Input::default();
        assert!(edit(&mut input, key(KeyCode::Char('A'))));
        assert!(edit(&mut input, key(KeyCode::Char('S'))));
        assert_eq!(input.value(), "AS");

        assert!(!edit(&mut input, key(KeyCode::Left)), "cursor moves only");
        assert!(edit(&mut input, key(KeyCode::Backspace)));
        assert_eq!(input.value(), "S");
    }

    #[test]
    fn paste_takes_first_line_at_cursor() {
        let mut input = Input::new("AS".into());
        assert!(paste(&mut input, "\n  64500\t\nAS64501\n"));
        assert_eq!(input.value(), "AS64500");

        assert!(!paste(&mut input, " \r\n"));
        assert_eq!(input.value(), "AS64500");
    }

    #[test]
    fn ctrl_u_clears_line() {
        let mut input = Input::new("192.0.2.0/24".into());
        assert!(edit(
            &mut input,
            KeyEvent::new(KeyCode::Char('u'), KeyModifiers::CONTROL)
        ));
        assert_eq!(input.value(), "");
    }

    #[test]
    fn navigation_keys_are_not_edits() {
        assert!(key_to_request(key(KeyCode::Enter)).is_none());
        assert!(key_to_request(key(KeyCode::Esc)).is_none());
        assert!(key_to_request(key(KeyCode::Tab)).is_none());
    }
}
