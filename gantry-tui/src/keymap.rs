use gantry_core::config::{Command, KeyContext, KeysConfig, keys::KeyMap};
use gantry_core::keyboard::{KeyCode, KeyEvent, KeyModifiers};

/// What a key press means in the current focus context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyInput {
    Command(Command),
    /// Unbound printable character typed into a text field
    Text(char),
    Unbound,
}

/// Effective keymap per focus context, built once from configuration.
pub struct Keymaps {
    sidebar: KeyMap,
    repository: KeyMap,
    text_input: KeyMap,
    list_picker: KeyMap,
    confirm: KeyMap,
}

impl Keymaps {
    pub fn new(keys: &KeysConfig) -> Self {
        Self {
            sidebar: keys.keymap_for(KeyContext::Sidebar),
            repository: keys.keymap_for(KeyContext::Repository),
            text_input: keys.keymap_for(KeyContext::TextInput),
            list_picker: keys.keymap_for(KeyContext::ListPicker),
            confirm: keys.keymap_for(KeyContext::Confirm),
        }
    }

    pub fn get(&self, context: KeyContext) -> &KeyMap {
        match context {
            KeyContext::Sidebar => &self.sidebar,
            KeyContext::Repository => &self.repository,
            KeyContext::TextInput => &self.text_input,
            KeyContext::ListPicker => &self.list_picker,
            KeyContext::Confirm => &self.confirm,
        }
    }

    pub fn resolve(&self, context: KeyContext, key: KeyEvent) -> KeyInput {
        if let Some(command) = self.get(context).get(&key) {
            return KeyInput::Command(*command);
        }

        let accepts_text = matches!(context, KeyContext::TextInput | KeyContext::ListPicker);
        if accepts_text
            && let KeyCode::Char(c) = key.code
            && !key
                .modifiers
                .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
        {
            return KeyInput::Text(c);
        }

        KeyInput::Unbound
    }

    /// Display label of the key bound to `command`, or `fallback` if unbound.
    pub fn label(&self, context: KeyContext, command: Command, fallback: &str) -> String {
        KeysConfig::find_key(self.get(context), &command)
            .map_or(fallback.to_string(), |k| k.to_string())
    }
}

impl Default for Keymaps {
    fn default() -> Self {
        Self::new(&KeysConfig::default())
    }
}
