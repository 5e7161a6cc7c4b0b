use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::game::Command;

/// Maps a key press to a game command. Unbound keys map to `None`.
pub fn map_key(code: KeyCode) -> Option<Command> {
    match code {
        KeyCode::Left => Some(Command::MoveLeft),
        KeyCode::Right => Some(Command::MoveRight),
        KeyCode::Down => Some(Command::SoftDrop),
        KeyCode::Up => Some(Command::Rotate),
        KeyCode::Char(' ') => Some(Command::HardDrop),
        KeyCode::Char('p') | KeyCode::Char('P') | KeyCode::Esc => Some(Command::TogglePause),
        KeyCode::Enter | KeyCode::Char('n') | KeyCode::Char('N') => Some(Command::StartNewGame),
        _ => None,
    }
}

/// Quit is handled by the front end and never reaches the game.
pub fn should_quit(key: KeyEvent) -> bool {
    match key.code {
        KeyCode::Char('q') | KeyCode::Char('Q') => true,
        KeyCode::Char('c') => key.modifiers.contains(KeyModifiers::CONTROL),
        _ => false,
    }
}
