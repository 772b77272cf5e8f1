//! # TUI Adapter
//!
//! The ratatui-specific layer. Owns the terminal, turns crossterm events
//! into actions, runs the component tree and draws whatever it renders.
//!
//! ## Event Loop
//!
//! ```text
//! ┌──────────────┐  key/resize   ┌─────────┐  effects   ┌──────────┐
//! │   terminal   │ ────────────▶ │   App   │ ─────────▶ │ Executor │
//! └──────────────┘               └─────────┘            └──────────┘
//!        ▲                          │   ▲                     │
//!        └──────── view() ──────────┘   └──── completions ────┘
//! ```
//!
//! Each iteration drains every pending terminal event, then every pending
//! completion, and redraws only if something arrived.
//!
//! ## Module Structure
//!
//! - `layout`, `blocks`, `overlay`: width-aware text measurement and composition
//! - `component`, `components`, `pages`: the component tree
//! - `keymap`: logical bindings
//! - `app`: the root router
//! - `executor`, `event`: the loop's inputs and outputs

pub mod app;
pub mod blocks;
pub mod component;
pub mod components;
pub mod event;
pub mod executor;
pub mod keymap;
pub mod layout;
pub mod overlay;
pub mod pages;

use log::{debug, info, warn};
use std::io::stdout;
use std::sync::{Arc, mpsc};
use std::time::Duration;

use crossterm::cursor::{Hide, Show};
use crossterm::event::{
    KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
};
use crossterm::execute;
use ratatui::Frame;
use ratatui::widgets::Paragraph;

use crate::api::{ApiClient, ContentService};
use crate::core::config::ResolvedConfig;

use app::App;
use event::{poll_action, poll_action_immediate};
use executor::{Executor, run_update};
use keymap::Keymap;

const POLL_TIMEOUT: Duration = Duration::from_millis(250);

struct TerminalModeGuard;

impl TerminalModeGuard {
    fn new() -> std::io::Result<Self> {
        // Lets the terminal report Esc and Ctrl+<key> unambiguously. Terminals
        // without the protocol ignore it.
        execute!(
            stdout(),
            Hide,
            PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES)
        )?;
        info!("Terminal modes enabled (hidden cursor, keyboard enhancement)");
        Ok(Self)
    }
}

impl Drop for TerminalModeGuard {
    fn drop(&mut self) {
        let _ = execute!(stdout(), PopKeyboardEnhancementFlags, Show);
    }
}

/// Build the content service client from a resolved config.
pub fn build_service(config: &ResolvedConfig) -> Arc<dyn ContentService> {
    Arc::new(ApiClient::new(
        &config.api_base_url,
        &config.poster_base_url,
        config.max_retries,
    ))
}

/// Render the whole tree into the frame.
pub fn draw(frame: &mut Frame, app: &App) {
    frame.render_widget(Paragraph::new(app.view()), frame.area());
}

pub fn run(config: ResolvedConfig) -> std::io::Result<()> {
    let service = build_service(&config);
    let keys = Keymap::from_config(&config.keys);

    let mut terminal = ratatui::init();
    let _terminal_mode_guard = TerminalModeGuard::new()
        .map_err(|e| warn!("Could not set terminal modes: {}", e))
        .ok();

    let size = terminal.size()?;
    let mut app = App::new(keys);
    app.resize(size.width, size.height);

    // Completions from background effects
    let (tx, rx) = mpsc::channel();
    let executor = Executor::new(service, tx);
    let mut spawn = |effect| executor.spawn(effect);

    let mut needs_redraw = true;
    'main: loop {
        if needs_redraw {
            terminal.draw(|f| draw(f, &app))?;
            needs_redraw = false;
        }

        let first_event = poll_action(POLL_TIMEOUT);
        for action in first_event
            .into_iter()
            .chain(std::iter::from_fn(poll_action_immediate))
        {
            needs_redraw = true;
            if run_update(&mut app, &mut spawn, action) {
                break 'main;
            }
        }

        while let Ok(action) = rx.try_recv() {
            needs_redraw = true;
            debug!("Event loop received completion");
            if run_update(&mut app, &mut spawn, action) {
                break 'main;
            }
        }
    }

    info!("Leaving event loop");
    ratatui::restore();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::action::Action;
    use crate::test_support::{key, signed_in_auth};
    use crossterm::event::KeyCode;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn rendered(app: &App, width: u16, height: u16) -> String {
        let backend = TestBackend::new(width, height);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|f| draw(f, app)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect::<String>()
    }

    #[test]
    fn test_draw_account_page() {
        let mut app = App::new(Keymap::default());
        app.resize(80, 24);
        let text = rendered(&app, 80, 24);
        assert!(text.contains("reel"));
        assert!(text.contains("Continue as guest"));
        assert!(text.contains("esc back"));
    }

    #[test]
    fn test_draw_lists_with_quit_prompt() {
        let mut app = App::new(Keymap::default());
        app.resize(80, 24);
        app.update(&Action::Authenticated(signed_in_auth()));
        app.update(&key(KeyCode::Esc));
        let text = rendered(&app, 80, 24);
        assert!(text.contains("Plan to watch"));
        assert!(text.contains("Quit program?"));
    }
}
