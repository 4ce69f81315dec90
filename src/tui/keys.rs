//! Keyboard event to viewer message mapping

use crossterm::event::{KeyCode, KeyEvent};

use crate::viewer::ViewerMsg;

/// What a key press in normal mode asks for
#[derive(Debug)]
pub enum KeyAction {
    Quit,
    /// Open the goto-anchor prompt (':')
    OpenGotoPrompt,
    Msg(ViewerMsg),
}

/// Map a normal-mode key event to an action
///
/// Prompt-mode editing (the goto-anchor input) is handled by the event loop
/// directly since it is plain line editing.
pub fn key_to_action(key: KeyEvent) -> Option<KeyAction> {
    match key.code {
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => Some(KeyAction::Quit),
        KeyCode::Char(':') => Some(KeyAction::OpenGotoPrompt),
        KeyCode::Up | KeyCode::Char('k') => Some(KeyAction::Msg(ViewerMsg::ScrollUp(1))),
        KeyCode::Down | KeyCode::Char('j') => Some(KeyAction::Msg(ViewerMsg::ScrollDown(1))),
        KeyCode::PageUp => Some(KeyAction::Msg(ViewerMsg::PageUp)),
        KeyCode::PageDown | KeyCode::Char(' ') => Some(KeyAction::Msg(ViewerMsg::PageDown)),
        KeyCode::Home | KeyCode::Char('g') => Some(KeyAction::Msg(ViewerMsg::ScrollToTop)),
        KeyCode::End | KeyCode::Char('G') => Some(KeyAction::Msg(ViewerMsg::ScrollToBottom)),
        _ => None,
    }
}
