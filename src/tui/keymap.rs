//! Logical key bindings.
//!
//! Components never compare against literal keys. They ask the keymap
//! whether an event matches a logical [`Binding`], and the keymap knows
//! which physical keys (from `[keys]` in the config file) map to it.

use std::collections::HashMap;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use log::warn;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};

use crate::core::config::KeysConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Binding {
    Back,
    Quit,
    Search,
    Select,
    NextItem,
    PrevItem,
    NextTab,
    PrevTab,
}

impl Binding {
    pub const ALL: [Binding; 8] = [
        Binding::Back,
        Binding::Quit,
        Binding::Search,
        Binding::Select,
        Binding::NextItem,
        Binding::PrevItem,
        Binding::NextTab,
        Binding::PrevTab,
    ];

    fn defaults(&self) -> &'static [&'static str] {
        match self {
            Binding::Back => &["esc"],
            Binding::Quit => &["ctrl+c", "q"],
            Binding::Search => &["s", "/"],
            Binding::Select => &["enter"],
            Binding::NextItem => &["down", "tab"],
            Binding::PrevItem => &["up", "shift+tab"],
            Binding::NextTab => &["right"],
            Binding::PrevTab => &["left"],
        }
    }

    fn description(&self) -> &'static str {
        match self {
            Binding::Back => "back",
            Binding::Quit => "quit",
            Binding::Search => "search",
            Binding::Select => "select",
            Binding::NextItem => "next",
            Binding::PrevItem => "prev",
            Binding::NextTab => "next tab",
            Binding::PrevTab => "prev tab",
        }
    }

    fn configured<'a>(&self, config: &'a KeysConfig) -> Option<&'a Vec<String>> {
        match self {
            Binding::Back => config.back.as_ref(),
            Binding::Quit => config.quit.as_ref(),
            Binding::Search => config.search.as_ref(),
            Binding::Select => config.select.as_ref(),
            Binding::NextItem => config.next_item.as_ref(),
            Binding::PrevItem => config.prev_item.as_ref(),
            Binding::NextTab => config.next_tab.as_ref(),
            Binding::PrevTab => config.prev_tab.as_ref(),
        }
    }
}

/// One physical key plus the modifiers that must be held.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyChord {
    code: KeyCode,
    modifiers: KeyModifiers,
}

impl KeyChord {
    /// Parse strings such as `"esc"`, `"ctrl+c"`, `"shift+tab"` or `"q"`.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim().to_lowercase();
        let mut modifiers = KeyModifiers::NONE;
        let mut rest = s.as_str();
        loop {
            if let Some(r) = rest.strip_prefix("ctrl+") {
                modifiers |= KeyModifiers::CONTROL;
                rest = r;
            } else if let Some(r) = rest.strip_prefix("alt+") {
                modifiers |= KeyModifiers::ALT;
                rest = r;
            } else if let Some(r) = rest.strip_prefix("shift+") {
                modifiers |= KeyModifiers::SHIFT;
                rest = r;
            } else {
                break;
            }
        }

        let code = match rest {
            "esc" | "escape" => KeyCode::Esc,
            "enter" | "return" => KeyCode::Enter,
            "tab" if modifiers.contains(KeyModifiers::SHIFT) => {
                modifiers.remove(KeyModifiers::SHIFT);
                KeyCode::BackTab
            }
            "tab" => KeyCode::Tab,
            "backtab" => KeyCode::BackTab,
            "backspace" => KeyCode::Backspace,
            "delete" | "del" => KeyCode::Delete,
            "up" => KeyCode::Up,
            "down" => KeyCode::Down,
            "left" => KeyCode::Left,
            "right" => KeyCode::Right,
            "home" => KeyCode::Home,
            "end" => KeyCode::End,
            "pgup" | "pageup" => KeyCode::PageUp,
            "pgdown" | "pagedown" => KeyCode::PageDown,
            "space" => KeyCode::Char(' '),
            other => {
                let mut chars = other.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => KeyCode::Char(c),
                    _ => return None,
                }
            }
        };

        Some(Self { code, modifiers })
    }

    /// Control and Alt must match exactly. Shift is ignored for characters,
    /// since the terminal already folds it into the character itself.
    pub fn matches(&self, key: &KeyEvent) -> bool {
        let strict = KeyModifiers::CONTROL | KeyModifiers::ALT;
        if key.modifiers & strict != self.modifiers & strict {
            return false;
        }
        match (self.code, key.code) {
            (KeyCode::Char(a), KeyCode::Char(b)) if self.modifiers.contains(KeyModifiers::CONTROL) => {
                a.eq_ignore_ascii_case(&b)
            }
            (a, b) => a == b,
        }
    }
}

#[derive(Debug, Clone)]
struct Entry {
    chords: Vec<KeyChord>,
    labels: Vec<String>,
}

/// Logical bindings resolved to physical keys.
#[derive(Debug, Clone)]
pub struct Keymap {
    entries: HashMap<Binding, Entry>,
}

impl Default for Keymap {
    fn default() -> Self {
        Self::from_config(&KeysConfig::default())
    }
}

impl Keymap {
    /// Build from the `[keys]` config section. Bindings that are missing or
    /// contain no valid key fall back to their defaults.
    pub fn from_config(config: &KeysConfig) -> Self {
        let mut entries = HashMap::new();
        for binding in Binding::ALL {
            let entry = binding
                .configured(config)
                .and_then(|keys| parse_entry(binding, keys.iter().map(String::as_str)))
                .or_else(|| parse_entry(binding, binding.defaults().iter().copied()))
                .unwrap_or(Entry {
                    chords: Vec::new(),
                    labels: Vec::new(),
                });
            entries.insert(binding, entry);
        }
        Self { entries }
    }

    pub fn matches(&self, binding: Binding, key: &KeyEvent) -> bool {
        self.entries
            .get(&binding)
            .is_some_and(|e| e.chords.iter().any(|chord| chord.matches(key)))
    }

    /// First binding (in priority order) the key belongs to.
    pub fn lookup(&self, key: &KeyEvent) -> Option<Binding> {
        Binding::ALL.into_iter().find(|b| self.matches(*b, key))
    }

    /// e.g. `"ctrl+c/q"`
    pub fn label(&self, binding: Binding) -> String {
        self.entries
            .get(&binding)
            .map(|e| e.labels.join("/"))
            .unwrap_or_default()
    }

    /// One-line summary of the global bindings for the footer.
    pub fn help_line(&self) -> Line<'static> {
        let key_style = Style::default().fg(Color::Gray);
        let desc_style = Style::default().fg(Color::DarkGray);
        let sep_style = Style::default().fg(Color::Indexed(238));

        let mut spans = Vec::new();
        for (i, binding) in Binding::ALL.iter().enumerate() {
            if i > 0 {
                spans.push(Span::styled(" • ", sep_style));
            }
            spans.push(Span::styled(self.label(*binding), key_style));
            spans.push(Span::styled(format!(" {}", binding.description()), desc_style));
        }
        Line::from(spans)
    }
}

fn parse_entry<'a>(binding: Binding, keys: impl Iterator<Item = &'a str>) -> Option<Entry> {
    let mut chords = Vec::new();
    let mut labels = Vec::new();
    for key in keys {
        match KeyChord::parse(key) {
            Some(chord) => {
                chords.push(chord);
                labels.push(key.trim().to_lowercase());
            }
            None => warn!("Ignoring unknown key {:?} for {:?}", key, binding),
        }
    }
    if chords.is_empty() {
        None
    } else {
        Some(Entry { chords, labels })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    #[test]
    fn test_parse_named_keys() {
        assert_eq!(
            KeyChord::parse("esc"),
            Some(KeyChord {
                code: KeyCode::Esc,
                modifiers: KeyModifiers::NONE
            })
        );
        assert_eq!(
            KeyChord::parse("ctrl+c"),
            Some(KeyChord {
                code: KeyCode::Char('c'),
                modifiers: KeyModifiers::CONTROL
            })
        );
        assert_eq!(
            KeyChord::parse("shift+tab"),
            Some(KeyChord {
                code: KeyCode::BackTab,
                modifiers: KeyModifiers::NONE
            })
        );
        assert_eq!(KeyChord::parse("hyper+x"), None);
        assert_eq!(KeyChord::parse("ab"), None);
    }

    #[test]
    fn test_default_bindings() {
        let keys = Keymap::default();
        assert!(keys.matches(Binding::Back, &key(KeyCode::Esc, KeyModifiers::NONE)));
        assert!(keys.matches(Binding::Quit, &key(KeyCode::Char('c'), KeyModifiers::CONTROL)));
        assert!(keys.matches(Binding::Quit, &key(KeyCode::Char('q'), KeyModifiers::NONE)));
        assert!(keys.matches(Binding::Search, &key(KeyCode::Char('/'), KeyModifiers::NONE)));
        assert!(keys.matches(Binding::PrevItem, &key(KeyCode::BackTab, KeyModifiers::SHIFT)));
        assert!(keys.matches(Binding::NextItem, &key(KeyCode::Tab, KeyModifiers::NONE)));
    }

    #[test]
    fn test_plain_char_does_not_match_ctrl_chord() {
        let keys = Keymap::default();
        assert!(!keys.matches(Binding::Quit, &key(KeyCode::Char('c'), KeyModifiers::NONE)));
        assert!(!keys.matches(Binding::Quit, &key(KeyCode::Char('q'), KeyModifiers::CONTROL)));
        // Capital S is a different key from s
        assert!(!keys.matches(Binding::Search, &key(KeyCode::Char('S'), KeyModifiers::SHIFT)));
    }

    #[test]
    fn test_config_overrides_and_falls_back() {
        let config = KeysConfig {
            back: Some(vec!["backspace".to_string()]),
            quit: Some(vec!["nonsense-key".to_string()]),
            ..Default::default()
        };
        let keys = Keymap::from_config(&config);
        assert!(keys.matches(Binding::Back, &key(KeyCode::Backspace, KeyModifiers::NONE)));
        assert!(!keys.matches(Binding::Back, &key(KeyCode::Esc, KeyModifiers::NONE)));
        // Nothing valid configured, so the defaults apply
        assert!(keys.matches(Binding::Quit, &key(KeyCode::Char('q'), KeyModifiers::NONE)));
    }

    #[test]
    fn test_lookup_priority() {
        let keys = Keymap::default();
        assert_eq!(keys.lookup(&key(KeyCode::Esc, KeyModifiers::NONE)), Some(Binding::Back));
        assert_eq!(keys.lookup(&key(KeyCode::Char('x'), KeyModifiers::NONE)), None);
    }

    #[test]
    fn test_help_line_lists_labels() {
        let keys = Keymap::default();
        let text: String = keys
            .help_line()
            .spans
            .iter()
            .map(|s| s.content.as_ref())
            .collect();
        assert!(text.starts_with("esc back"));
        assert!(text.contains("ctrl+c/q quit"));
        assert!(text.contains("s// search"));
    }
}
