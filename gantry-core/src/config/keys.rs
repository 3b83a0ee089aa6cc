use crate::keyboard::{KeyCode, KeyEvent, KeyModifiers};
use crate::menu::MenuEvent;
use serde::Deserialize;
use std::collections::HashMap;
use std::str::FromStr;

/// Commands that can be bound to keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    /// No-op: explicitly unbinds a key (removes inherited/default binding)
    Noop,

    // General commands
    Quit,

    /// Menu commands, routed the same way as menu bar clicks
    Menu(MenuEvent),

    // Sidebar and repository view commands
    FocusNext,
    SelectRepository,
    RefreshRepository,
    DiscardFile,
    DiscardAll,
    PublishRepository,

    // List movement commands
    MoveUp,
    MoveDown,
    HalfPageUp,
    HalfPageDown,
    PageUp,
    PageDown,
    MoveTop,
    MoveBottom,

    // Text-edit commands
    DeleteBackwardChar,
    DeleteBackwardWord,
    DeleteToStart,
    MoveCursorLeft,
    MoveCursorRight,
    MoveCursorStart,
    MoveCursorEnd,
    Complete,

    // Generic confirm/cancel commands
    Confirm,
    Cancel,
}

impl FromStr for Command {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "noop" | "none" | "unbound" => Ok(Command::Noop),
            "quit" => Ok(Command::Quit),
            "focus_next" => Ok(Command::FocusNext),
            "select_repository" => Ok(Command::SelectRepository),
            "refresh_repository" => Ok(Command::RefreshRepository),
            "discard_file" => Ok(Command::DiscardFile),
            "discard_all" => Ok(Command::DiscardAll),
            "publish_repository" => Ok(Command::PublishRepository),
            "move_up" => Ok(Command::MoveUp),
            "move_down" => Ok(Command::MoveDown),
            "half_page_up" => Ok(Command::HalfPageUp),
            "half_page_down" => Ok(Command::HalfPageDown),
            "page_up" => Ok(Command::PageUp),
            "page_down" => Ok(Command::PageDown),
            "move_top" => Ok(Command::MoveTop),
            "move_bottom" => Ok(Command::MoveBottom),
            "delete_backward_char" => Ok(Command::DeleteBackwardChar),
            "delete_backward_word" => Ok(Command::DeleteBackwardWord),
            "delete_to_start" => Ok(Command::DeleteToStart),
            "move_cursor_left" => Ok(Command::MoveCursorLeft),
            "move_cursor_right" => Ok(Command::MoveCursorRight),
            "move_cursor_start" => Ok(Command::MoveCursorStart),
            "move_cursor_end" => Ok(Command::MoveCursorEnd),
            "complete" => Ok(Command::Complete),
            "confirm" => Ok(Command::Confirm),
            "cancel" => Ok(Command::Cancel),
            other => MenuEvent::from_str(&other.replace('_', "-"))
                .map(Command::Menu)
                .map_err(|_| format!("Unknown command: {s}")),
        }
    }
}

impl std::fmt::Display for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Command::Noop => "noop",
            Command::Quit => "quit",
            Command::Menu(event) => return f.write_str(&event.name().replace('-', "_")),
            Command::FocusNext => "focus_next",
            Command::SelectRepository => "select_repository",
            Command::RefreshRepository => "refresh_repository",
            Command::DiscardFile => "discard_file",
            Command::DiscardAll => "discard_all",
            Command::PublishRepository => "publish_repository",
            Command::MoveUp => "move_up",
            Command::MoveDown => "move_down",
            Command::HalfPageUp => "half_page_up",
            Command::HalfPageDown => "half_page_down",
            Command::PageUp => "page_up",
            Command::PageDown => "page_down",
            Command::MoveTop => "move_top",
            Command::MoveBottom => "move_bottom",
            Command::DeleteBackwardChar => "delete_backward_char",
            Command::DeleteBackwardWord => "delete_backward_word",
            Command::DeleteToStart => "delete_to_start",
            Command::MoveCursorLeft => "move_cursor_left",
            Command::MoveCursorRight => "move_cursor_right",
            Command::MoveCursorStart => "move_cursor_start",
            Command::MoveCursorEnd => "move_cursor_end",
            Command::Complete => "complete",
            Command::Confirm => "confirm",
            Command::Cancel => "cancel",
        };
        write!(f, "{s}")
    }
}

impl Command {
    /// Get a human-readable description of the command for the footer
    pub fn description(&self) -> &'static str {
        match self {
            Command::Noop => "Unbound",
            Command::Quit => "Quit",
            Command::Menu(event) => event.label(),
            Command::FocusNext => "Switch pane",
            Command::SelectRepository => "Open repository",
            Command::RefreshRepository => "Refresh",
            Command::DiscardFile => "Discard file",
            Command::DiscardAll => "Discard all",
            Command::PublishRepository => "Publish",
            Command::MoveUp => "Move up",
            Command::MoveDown => "Move down",
            Command::HalfPageUp => "Half page up",
            Command::HalfPageDown => "Half page down",
            Command::PageUp => "Page up",
            Command::PageDown => "Page down",
            Command::MoveTop => "Move to top",
            Command::MoveBottom => "Move to bottom",
            Command::DeleteBackwardChar => "Delete backward char",
            Command::DeleteBackwardWord => "Delete backward word",
            Command::DeleteToStart => "Delete to start",
            Command::MoveCursorLeft => "Move cursor left",
            Command::MoveCursorRight => "Move cursor right",
            Command::MoveCursorStart => "Move cursor to start",
            Command::MoveCursorEnd => "Move cursor to end",
            Command::Complete => "Complete path",
            Command::Confirm => "Confirm",
            Command::Cancel => "Cancel",
        }
    }
}

/// Where keyboard focus currently is; selects which layers apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyContext {
    Sidebar,
    Repository,
    /// Popup with a single text field
    TextInput,
    /// Text field with a filtered list beneath it
    ListPicker,
    /// Yes/no dialogs and the error banner
    Confirm,
}

/// Key bindings for a specific layer
pub type KeyMap = HashMap<KeyEvent, Command>;

/// Complete key binding configuration, composed from reusable layers.
#[derive(Debug, Clone)]
pub struct KeysConfig {
    pub general: KeyMap,
    pub menu: KeyMap,
    pub text_edit: KeyMap,
    pub list_navigation: KeyMap,
    pub confirm_cancel: KeyMap,
    pub sidebar: KeyMap,
    pub repository: KeyMap,
}

/// Intermediate structure for deserializing key bindings
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct KeysConfigRaw {
    #[serde(default)]
    general: HashMap<String, String>,
    #[serde(default)]
    menu: HashMap<String, String>,
    #[serde(default)]
    text_edit: HashMap<String, String>,
    #[serde(default)]
    list_navigation: HashMap<String, String>,
    #[serde(default)]
    confirm_cancel: HashMap<String, String>,
    #[serde(default)]
    sidebar: HashMap<String, String>,
    #[serde(default)]
    repository: HashMap<String, String>,
}

impl Default for KeysConfig {
    fn default() -> Self {
        Self::new()
    }
}

fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

fn ctrl(c: char) -> KeyEvent {
    KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
}

impl KeysConfig {
    pub fn new() -> Self {
        Self {
            general: Self::default_general(),
            menu: Self::default_menu(),
            text_edit: Self::default_text_edit(),
            list_navigation: Self::default_list_navigation(),
            confirm_cancel: Self::default_confirm_cancel(),
            sidebar: Self::default_sidebar(),
            repository: Self::default_repository(),
        }
    }

    /// Build the effective keymap for a focus context using precedence:
    /// general < shared layers < context-specific
    pub fn keymap_for(&self, context: KeyContext) -> KeyMap {
        let mut combined = KeyMap::new();
        Self::apply_layer(&mut combined, &self.general);

        match context {
            KeyContext::Sidebar => {
                Self::apply_layer(&mut combined, &self.menu);
                Self::apply_layer(&mut combined, &self.list_navigation);
                Self::apply_layer(&mut combined, &self.sidebar);
            }
            KeyContext::Repository => {
                Self::apply_layer(&mut combined, &self.menu);
                Self::apply_layer(&mut combined, &self.list_navigation);
                Self::apply_layer(&mut combined, &self.repository);
            }
            KeyContext::TextInput => {
                Self::apply_layer(&mut combined, &self.text_edit);
                Self::apply_layer(&mut combined, &self.confirm_cancel);
            }
            KeyContext::ListPicker => {
                Self::apply_layer(&mut combined, &self.text_edit);
                Self::apply_layer(&mut combined, &self.list_navigation);
                Self::apply_layer(&mut combined, &self.confirm_cancel);
            }
            KeyContext::Confirm => {
                Self::apply_layer(&mut combined, &self.confirm_cancel);
            }
        }

        combined
    }

    /// Find the first key bound to a given command in a keymap.
    pub fn find_key(keymap: &KeyMap, command: &Command) -> Option<KeyEvent> {
        // Prefer shorter/simpler key representations
        let mut found: Vec<_> = keymap
            .iter()
            .filter(|(_, cmd)| *cmd == command)
            .map(|(key, _)| *key)
            .collect();
        found.sort();
        found.into_iter().next()
    }

    fn apply_layer(base: &mut KeyMap, layer: &KeyMap) {
        for (key, command) in layer {
            if *command == Command::Noop {
                base.remove(key);
            } else {
                base.insert(*key, *command);
            }
        }
    }

    fn default_general() -> KeyMap {
        KeyMap::from([(ctrl('c'), Command::Quit)])
    }

    fn default_menu() -> KeyMap {
        KeyMap::from([
            (key(KeyCode::Char('P')), Command::Menu(MenuEvent::Push)),
            (key(KeyCode::Char('p')), Command::Menu(MenuEvent::Pull)),
            (key(KeyCode::Char('1')), Command::Menu(MenuEvent::SelectChanges)),
            (key(KeyCode::Char('2')), Command::Menu(MenuEvent::SelectHistory)),
            (
                key(KeyCode::Char('o')),
                Command::Menu(MenuEvent::AddLocalRepository),
            ),
            (key(KeyCode::Char('a')), Command::Menu(MenuEvent::AddRepository)),
            (key(KeyCode::Char('n')), Command::Menu(MenuEvent::CreateBranch)),
            (key(KeyCode::Char('b')), Command::Menu(MenuEvent::ShowBranches)),
            (key(KeyCode::Char('r')), Command::Menu(MenuEvent::RenameBranch)),
            (key(KeyCode::Char('D')), Command::Menu(MenuEvent::DeleteBranch)),
            (
                key(KeyCode::Char('x')),
                Command::Menu(MenuEvent::RemoveRepository),
            ),
        ])
    }

    fn default_text_edit() -> KeyMap {
        KeyMap::from([
            (key(KeyCode::Backspace), Command::DeleteBackwardChar),
            (ctrl('w'), Command::DeleteBackwardWord),
            (ctrl('u'), Command::DeleteToStart),
            (key(KeyCode::Left), Command::MoveCursorLeft),
            (key(KeyCode::Right), Command::MoveCursorRight),
            (key(KeyCode::Home), Command::MoveCursorStart),
            (ctrl('a'), Command::MoveCursorStart),
            (key(KeyCode::End), Command::MoveCursorEnd),
            (ctrl('e'), Command::MoveCursorEnd),
            (key(KeyCode::Tab), Command::Complete),
        ])
    }

    fn default_list_navigation() -> KeyMap {
        KeyMap::from([
            (key(KeyCode::Up), Command::MoveUp),
            (key(KeyCode::Down), Command::MoveDown),
            (ctrl('p'), Command::MoveUp),
            (ctrl('n'), Command::MoveDown),
            (ctrl('d'), Command::HalfPageDown),
            (key(KeyCode::PageUp), Command::PageUp),
            (key(KeyCode::PageDown), Command::PageDown),
            (
                KeyEvent::new(KeyCode::Char('g'), KeyModifiers::ALT),
                Command::MoveTop,
            ),
            (
                KeyEvent::new(KeyCode::Char('G'), KeyModifiers::ALT),
                Command::MoveBottom,
            ),
        ])
    }

    fn default_confirm_cancel() -> KeyMap {
        KeyMap::from([
            (key(KeyCode::Enter), Command::Confirm),
            (key(KeyCode::Esc), Command::Cancel),
        ])
    }

    fn default_sidebar() -> KeyMap {
        KeyMap::from([
            (key(KeyCode::Enter), Command::SelectRepository),
            (key(KeyCode::Tab), Command::FocusNext),
            (key(KeyCode::Char('j')), Command::MoveDown),
            (key(KeyCode::Char('k')), Command::MoveUp),
            (key(KeyCode::Char('q')), Command::Quit),
        ])
    }

    fn default_repository() -> KeyMap {
        KeyMap::from([
            (key(KeyCode::Tab), Command::FocusNext),
            (key(KeyCode::Esc), Command::FocusNext),
            (key(KeyCode::Char('j')), Command::MoveDown),
            (key(KeyCode::Char('k')), Command::MoveUp),
            (key(KeyCode::Char('d')), Command::DiscardFile),
            (key(KeyCode::Char('X')), Command::DiscardAll),
            (key(KeyCode::Char('R')), Command::RefreshRepository),
            (key(KeyCode::Char('u')), Command::PublishRepository),
            (key(KeyCode::Char('q')), Command::Quit),
        ])
    }

    /// Parse a string representation of keybindings into a `KeyMap`
    fn parse_keymap(raw_map: &HashMap<String, String>) -> Result<KeyMap, String> {
        let mut keymap = KeyMap::new();
        for (key_str, command_str) in raw_map {
            let key_event =
                KeyEvent::from_str(key_str).map_err(|e| format!("Invalid key '{key_str}': {e}"))?;
            let command = Command::from_str(command_str)
                .map_err(|e| format!("Invalid command '{command_str}': {e}"))?;
            keymap.insert(key_event, command);
        }
        Ok(keymap)
    }

    /// Merge user configuration with defaults.
    ///
    /// Keep `Noop` values so higher-precedence layers can explicitly unbind inherited mappings.
    fn from_raw(raw: &KeysConfigRaw) -> Result<Self, String> {
        let mut config = Self::default();

        config.general.extend(Self::parse_keymap(&raw.general)?);
        config.menu.extend(Self::parse_keymap(&raw.menu)?);
        config.text_edit.extend(Self::parse_keymap(&raw.text_edit)?);
        config
            .list_navigation
            .extend(Self::parse_keymap(&raw.list_navigation)?);
        config
            .confirm_cancel
            .extend(Self::parse_keymap(&raw.confirm_cancel)?);
        config.sidebar.extend(Self::parse_keymap(&raw.sidebar)?);
        config
            .repository
            .extend(Self::parse_keymap(&raw.repository)?);

        Ok(config)
    }
}

impl<'de> Deserialize<'de> for KeysConfig {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = KeysConfigRaw::deserialize(deserializer)?;
        KeysConfig::from_raw(&raw).map_err(serde::de::Error::custom)
    }
}
