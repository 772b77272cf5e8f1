use std::time::Duration;

use crossterm::event::{self, Event, KeyEventKind};

use crate::core::action::Action;

/// Poll for a terminal event, blocking up to `timeout`.
///
/// Only key presses and resizes become actions. Read errors are logged and
/// treated as "no event".
pub fn poll_action(timeout: Duration) -> Option<Action> {
    let ready = event::poll(timeout)
        .map_err(|e| log::warn!("Event poll failed: {}", e))
        .ok()?;
    if !ready {
        return None;
    }
    match event::read()
        .map_err(|e| log::warn!("Event read failed: {}", e))
        .ok()?
    {
        Event::Key(key) if key.kind == KeyEventKind::Press => {
            log::debug!("Key event: {:?} with modifiers {:?}", key.code, key.modifiers);
            Some(Action::Key(key))
        }
        Event::Resize(width, height) => Some(Action::Resize { width, height }),
        _ => None,
    }
}

/// Poll without blocking.
pub fn poll_action_immediate() -> Option<Action> {
    poll_action(Duration::ZERO)
}
