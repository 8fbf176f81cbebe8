//! Terminal input: turns crossterm events into [`UiEvent`]s.

use crate::app::{Command, UiEvent};
use crate::gfx::math::Vec2;
use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEvent, MouseEventKind,
};

#[derive(Debug, Clone)]
pub enum Input {
    Ui(UiEvent),
    Quit,
}

/// Maps one terminal event. Cell coordinates become pixels through `cell_px`.
pub fn translate(event: Event, cell_px: f64) -> Option<Input> {
    match event {
        Event::Key(key) => translate_key(key),
        Event::Mouse(mouse) => translate_mouse(mouse, cell_px),
        Event::Resize(columns, rows) => Some(Input::Ui(UiEvent::Resize {
            width: columns as f64 * cell_px,
            height: rows as f64 * cell_px,
        })),
        Event::FocusGained => Some(Input::Ui(UiEvent::PointerEnter)),
        Event::FocusLost => Some(Input::Ui(UiEvent::PointerLeave)),
        _ => None,
    }
}

fn translate_key(key: KeyEvent) -> Option<Input> {
    if key.kind == KeyEventKind::Release {
        return None;
    }
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(Input::Quit);
    }
    let command = match key.code {
        KeyCode::Char('q') | KeyCode::Esc => return Some(Input::Quit),
        KeyCode::Char('+') | KeyCode::Char('=') => {
            return Some(Input::Ui(UiEvent::Scroll { delta: 1.0 }))
        }
        KeyCode::Char('-') => return Some(Input::Ui(UiEvent::Scroll { delta: -1.0 })),
        KeyCode::Right | KeyCode::Char('l') => Command::Next,
        KeyCode::Left | KeyCode::Char('h') => Command::Previous,
        KeyCode::Up | KeyCode::Char('k') => Command::FocusUp,
        KeyCode::Down | KeyCode::Char('j') => Command::FocusDown,
        KeyCode::Char('r') => Command::Reverse,
        KeyCode::Char(' ') => Command::TogglePause,
        _ => return None,
    };
    Some(Input::Ui(UiEvent::Key(command)))
}

fn translate_mouse(mouse: MouseEvent, cell_px: f64) -> Option<Input> {
    let event = match mouse.kind {
        MouseEventKind::Moved | MouseEventKind::Drag(_) => UiEvent::PointerMove {
            pos: Vec2::new(mouse.column as f64 * cell_px, mouse.row as f64 * cell_px),
        },
        MouseEventKind::ScrollUp => UiEvent::Scroll { delta: 1.0 },
        MouseEventKind::ScrollDown => UiEvent::Scroll { delta: -1.0 },
        _ => return None,
    };
    Some(Input::Ui(event))
}
