use std::io;
use std::thread::{self, JoinHandle};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::app::{AppEvent, ListNav};

/// Translate a key press into an app event. Unbound keys give `None`.
pub fn map_key(key: KeyEvent) -> Option<AppEvent> {
    if key.kind != KeyEventKind::Press {
        return None;
    }
    let event = match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => AppEvent::Quit,
        KeyCode::Char('q') | KeyCode::Esc => AppEvent::Quit,

        KeyCode::Char(' ') | KeyCode::Enter => AppEvent::Activate,

        KeyCode::Char('h') | KeyCode::Left  => AppEvent::PrevRoot,
        KeyCode::Char('l') | KeyCode::Right => AppEvent::NextRoot,

        KeyCode::Char('k') | KeyCode::Up   => AppEvent::Scale(ListNav::Up),
        KeyCode::Char('j') | KeyCode::Down => AppEvent::Scale(ListNav::Down),
        KeyCode::Char('g') | KeyCode::Home => AppEvent::Scale(ListNav::First),
        KeyCode::Char('G') | KeyCode::End  => AppEvent::Scale(ListNav::Last),

        _ => return None,
    };
    Some(event)
}

/// Read terminal events on a dedicated thread and forward mapped keys.
///
/// Stops when the receiving side is gone or the terminal read fails.
pub fn spawn_reader(events: flume::Sender<AppEvent>) -> io::Result<JoinHandle<()>> {
    thread::Builder::new()
        .name("input".to_string())
        .spawn(move || loop {
            match event::read() {
                Ok(Event::Key(key)) => {
                    let Some(app_event) = map_key(key) else { continue };
                    if events.send(app_event).is_err() {
                        break;
                    }
                }
                Ok(_) => {}
                Err(e) => {
                    log::error!("Terminal input failed: {}", e);
                    break;
                }
            }
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> Option<AppEvent> {
        map_key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    #[test]
    fn test_root_keys() {
        assert!(matches!(press(KeyCode::Left), Some(AppEvent::PrevRoot)));
        assert!(matches!(press(KeyCode::Char('h')), Some(AppEvent::PrevRoot)));
        assert!(matches!(press(KeyCode::Right), Some(AppEvent::NextRoot)));
        assert!(matches!(press(KeyCode::Char('l')), Some(AppEvent::NextRoot)));
    }

    #[test]
    fn test_activate_and_quit_keys() {
        assert!(matches!(press(KeyCode::Char(' ')), Some(AppEvent::Activate)));
        assert!(matches!(press(KeyCode::Enter), Some(AppEvent::Activate)));
        assert!(matches!(press(KeyCode::Char('q')), Some(AppEvent::Quit)));
        assert!(matches!(press(KeyCode::Esc), Some(AppEvent::Quit)));
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert!(matches!(map_key(ctrl_c), Some(AppEvent::Quit)));
    }

    #[test]
    fn test_list_keys() {
        assert!(matches!(press(KeyCode::Up), Some(AppEvent::Scale(ListNav::Up))));
        assert!(matches!(press(KeyCode::Char('j')), Some(AppEvent::Scale(ListNav::Down))));
        assert!(matches!(press(KeyCode::End), Some(AppEvent::Scale(ListNav::Last))));
    }

    #[test]
    fn test_ignored_keys() {
        assert!(press(KeyCode::Char('c')).is_none());
        assert!(press(KeyCode::Tab).is_none());
        let release = KeyEvent::new_with_kind(KeyCode::Enter, KeyModifiers::NONE, KeyEventKind::Release);
        assert!(map_key(release).is_none());
    }
}
