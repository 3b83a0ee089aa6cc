pub mod keys;

use crate::{model::User, paths};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

pub use keys::{Command, KeyContext, KeysConfig};

fn config_file() -> PathBuf {
    paths::config_dir().join("config.toml")
}

/// Default parent directory for new clones.
pub const DEFAULT_CLONE_DIR: &str = "~/Development";

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Accounts to treat as signed in on startup, merged with the ones saved in the state file.
    /// ```toml
    /// [[accounts]]
    /// login = "octocat"
    /// endpoint = "https://api.github.com"
    /// ```
    #[serde(default)]
    pub accounts: Vec<AccountConfig>,

    /// Where repositories come from.
    #[serde(default)]
    pub repositories: RepositoriesConfig,

    /// Color theme configuration.
    #[serde(default)]
    pub theme: ThemeConfig,

    /// Key binding configuration.
    /// To unbind an inherited key mapping, assign it to `noop`.
    #[serde(default)]
    pub keys: KeysConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(deny_unknown_fields)]
pub struct AccountConfig {
    pub login: String,
    #[serde(default = "AccountConfig::default_endpoint")]
    pub endpoint: String,
}

impl AccountConfig {
    fn default_endpoint() -> String {
        crate::model::DEFAULT_ENDPOINT.to_string()
    }
}

impl From<&AccountConfig> for User {
    fn from(account: &AccountConfig) -> Self {
        User {
            login: account.login.clone(),
            endpoint: account.endpoint.clone(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(deny_unknown_fields)]
pub struct RepositoriesConfig {
    /// Parent directory for clones made from the add repository dialog (default: `~/Development`).
    pub clone_dir: Option<String>,

    /// Command that prints one directory per line, used by "add local repository". For example:
    /// ```toml
    /// [repositories]
    /// picker_command = "fd --type d --max-depth 3 . ~/Development | fzf --multi"
    /// ```
    pub picker_command: Option<String>,
}

impl RepositoriesConfig {
    pub fn resolved_clone_dir(&self) -> PathBuf {
        paths::expand_tilde(self.clone_dir.as_deref().unwrap_or(DEFAULT_CLONE_DIR))
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(deny_unknown_fields)]
pub struct ThemeConfig {
    /// Primary accent color (default: "magenta").
    #[serde(
        default = "ThemeConfig::default_accent",
        deserialize_with = "deserialize_color"
    )]
    pub accent: ThemeColor,
    /// Secondary accent color (default: "cyan").
    #[serde(
        default = "ThemeConfig::default_secondary",
        deserialize_with = "deserialize_color"
    )]
    pub secondary: ThemeColor,
    /// Success/positive color (default: "green").
    #[serde(
        default = "ThemeConfig::default_success",
        deserialize_with = "deserialize_color"
    )]
    pub success: ThemeColor,
    /// Error color (default: "red").
    #[serde(
        default = "ThemeConfig::default_error",
        deserialize_with = "deserialize_color"
    )]
    pub error: ThemeColor,
    /// Warning color (default: "yellow").
    #[serde(
        default = "ThemeConfig::default_warning",
        deserialize_with = "deserialize_color"
    )]
    pub warning: ThemeColor,
    /// Muted/dim text color, also used for disabled menu items (default: "dark_gray").
    #[serde(
        default = "ThemeConfig::default_muted",
        deserialize_with = "deserialize_color"
    )]
    pub muted: ThemeColor,
    /// Border color (default: "dark_gray").
    #[serde(
        default = "ThemeConfig::default_border",
        deserialize_with = "deserialize_color"
    )]
    pub border: ThemeColor,
    /// Foreground color for highlighted/selected items (default: "white").
    #[serde(
        default = "ThemeConfig::default_highlight_fg",
        deserialize_with = "deserialize_color"
    )]
    pub highlight_fg: ThemeColor,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            accent: Self::default_accent(),
            secondary: Self::default_secondary(),
            success: Self::default_success(),
            error: Self::default_error(),
            warning: Self::default_warning(),
            muted: Self::default_muted(),
            border: Self::default_border(),
            highlight_fg: Self::default_highlight_fg(),
        }
    }
}

impl ThemeConfig {
    fn default_accent() -> ThemeColor {
        ThemeColor::Named(NamedColor::Magenta)
    }
    fn default_secondary() -> ThemeColor {
        ThemeColor::Named(NamedColor::Cyan)
    }
    fn default_success() -> ThemeColor {
        ThemeColor::Named(NamedColor::Green)
    }
    fn default_error() -> ThemeColor {
        ThemeColor::Named(NamedColor::Red)
    }
    fn default_warning() -> ThemeColor {
        ThemeColor::Named(NamedColor::Yellow)
    }
    fn default_muted() -> ThemeColor {
        ThemeColor::Named(NamedColor::DarkGray)
    }
    fn default_border() -> ThemeColor {
        ThemeColor::Named(NamedColor::DarkGray)
    }
    fn default_highlight_fg() -> ThemeColor {
        ThemeColor::Named(NamedColor::White)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ThemeColor {
    Named(NamedColor),
    Rgb(u8, u8, u8),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NamedColor {
    Black,
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    White,
    Gray,
    DarkGray,
}

impl NamedColor {
    /// All named colours in alphabetical order, as accepted by the config parser.
    pub const fn all() -> &'static [(&'static str, NamedColor)] {
        &[
            ("black", NamedColor::Black),
            ("blue", NamedColor::Blue),
            ("cyan", NamedColor::Cyan),
            ("dark_gray", NamedColor::DarkGray),
            ("gray", NamedColor::Gray),
            ("green", NamedColor::Green),
            ("magenta", NamedColor::Magenta),
            ("red", NamedColor::Red),
            ("white", NamedColor::White),
            ("yellow", NamedColor::Yellow),
        ]
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Black => "black",
            Self::Red => "red",
            Self::Green => "green",
            Self::Yellow => "yellow",
            Self::Blue => "blue",
            Self::Magenta => "magenta",
            Self::Cyan => "cyan",
            Self::White => "white",
            Self::Gray => "gray",
            Self::DarkGray => "dark_gray",
        }
    }
}

impl std::fmt::Display for ThemeColor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Named(n) => f.write_str(n.as_str()),
            Self::Rgb(r, g, b) => write!(f, "#{r:02x}{g:02x}{b:02x}"),
        }
    }
}

impl Serialize for ThemeColor {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl ThemeColor {
    pub fn parse(s: &str) -> Option<Self> {
        if let Some(hex) = s.strip_prefix('#')
            && hex.len() == 6
            && hex.is_ascii()
        {
            let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
            let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
            let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
            return Some(Self::Rgb(r, g, b));
        }
        let lower = s.to_lowercase();
        let lookup = match lower.as_str() {
            "grey" => "gray",
            "dark_grey" => "dark_gray",
            other => other,
        };
        NamedColor::all()
            .iter()
            .find(|(name, _)| *name == lookup)
            .map(|(_, color)| Self::Named(*color))
    }
}

fn deserialize_color<'de, D>(deserializer: D) -> Result<ThemeColor, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    ThemeColor::parse(&s).ok_or_else(|| {
        serde::de::Error::custom(format!(
            "invalid color '{s}': expected a named color (black, red, green, yellow, blue, magenta, cyan, white, gray/grey, dark_gray) or hex (#rrggbb)"
        ))
    })
}

impl Config {
    pub fn users(&self) -> Vec<User> {
        self.accounts.iter().map(User::from).collect()
    }
}

pub fn load_config_from_str(s: &str) -> Result<Config> {
    let config: Config = toml::from_str(s)?;
    Ok(config)
}

/// Load the config file. An explicit path must exist; a missing default file means defaults.
pub fn load_config(config_override: Option<&Path>) -> Result<Config> {
    let config_file = match config_override {
        Some(path) => {
            if !path.exists() {
                anyhow::bail!("Config file not found at {}", path.display());
            }
            path.to_path_buf()
        }
        None => {
            let default = config_file();
            if !default.exists() {
                log::debug!("no config at {}, using defaults", default.display());
                return Ok(Config::default());
            }
            default
        }
    };
    let contents = fs::read_to_string(&config_file)
        .with_context(|| format!("Failed to read {}", config_file.display()))?;
    let config: Config = toml::from_str(&contents)
        .with_context(|| format!("Invalid config in {}", config_file.display()))?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_is_default() {
        let config = load_config_from_str("").unwrap();
        assert!(config.accounts.is_empty());
        assert!(config.repositories.picker_command.is_none());
        assert!(config.repositories.clone_dir.is_none());
    }

    #[test]
    fn test_full_config() {
        let config = load_config_from_str(
            r#"
[[accounts]]
login = "octocat"

[[accounts]]
login = "me"
endpoint = "https://git.example.com/api/v3"

[repositories]
clone_dir = "/srv/src"
picker_command = "fzf"
"#,
        )
        .unwrap();
        let users = config.users();
        assert_eq!(users.len(), 2);
        assert_eq!(users[0].endpoint, crate::model::DEFAULT_ENDPOINT);
        assert_eq!(users[1].endpoint, "https://git.example.com/api/v3");
        assert_eq!(
            config.repositories.resolved_clone_dir(),
            PathBuf::from("/srv/src")
        );
        assert_eq!(config.repositories.picker_command.as_deref(), Some("fzf"));
    }

    #[test]
    fn test_default_clone_dir_is_expanded() {
        let config = Config::default();
        let dir = config.repositories.resolved_clone_dir();
        assert!(!dir.to_string_lossy().contains('~'));
        assert!(dir.ends_with("Development"));
    }

    #[test]
    fn test_unknown_field_rejected() {
        assert!(load_config_from_str("unknown_field = true").is_err());
        assert!(load_config_from_str("[repositories]\nsearch_dirs = []").is_err());
    }

    #[test]
    fn test_keys_section_parsed() {
        let config = load_config_from_str(
            r#"
[keys.sidebar]
"C-o" = "add_local_repository"
"#,
        )
        .unwrap();
        let keymap = config.keys.keymap_for(KeyContext::Sidebar);
        let key: crate::keyboard::KeyEvent = "C-o".parse().unwrap();
        assert_eq!(
            keymap.get(&key),
            Some(&Command::Menu(crate::menu::MenuEvent::AddLocalRepository))
        );
    }

    #[test]
    fn test_invalid_key_binding_rejected() {
        let result = load_config_from_str(
            r#"
[keys.menu]
"C-o" = "launch_rockets"
"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_theme_config_defaults() {
        let config = load_config_from_str("").unwrap();
        assert_eq!(config.theme.accent, ThemeColor::Named(NamedColor::Magenta));
        assert_eq!(config.theme.secondary, ThemeColor::Named(NamedColor::Cyan));
        assert_eq!(config.theme.error, ThemeColor::Named(NamedColor::Red));
        assert_eq!(config.theme.muted, ThemeColor::Named(NamedColor::DarkGray));
        assert_eq!(
            config.theme.highlight_fg,
            ThemeColor::Named(NamedColor::White)
        );
    }

    #[test]
    fn test_theme_config_custom() {
        let config = load_config_from_str(
            r##"
[theme]
accent = "blue"
secondary = "#ff00ff"
"##,
        )
        .unwrap();
        assert_eq!(config.theme.accent, ThemeColor::Named(NamedColor::Blue));
        assert_eq!(config.theme.secondary, ThemeColor::Rgb(255, 0, 255));
        assert_eq!(config.theme.success, ThemeColor::Named(NamedColor::Green));
    }

    #[test]
    fn test_theme_invalid_color_rejected() {
        let result = load_config_from_str(
            r#"
[theme]
accent = "notacolor"
"#,
        );
        let err = format!("{:#}", result.unwrap_err());
        assert!(err.contains("invalid color"), "Error was: {err}");
    }

    #[test]
    fn test_theme_color_parse() {
        assert_eq!(
            ThemeColor::parse("RED"),
            Some(ThemeColor::Named(NamedColor::Red))
        );
        assert_eq!(
            ThemeColor::parse("#ff0000"),
            Some(ThemeColor::Rgb(255, 0, 0))
        );
        assert_eq!(
            ThemeColor::parse("grey"),
            Some(ThemeColor::Named(NamedColor::Gray))
        );
        assert_eq!(
            ThemeColor::parse("Dark_Gray"),
            Some(ThemeColor::Named(NamedColor::DarkGray))
        );
        assert_eq!(ThemeColor::parse("notacolor"), None);
        assert_eq!(ThemeColor::parse("#fff"), None);
        assert_eq!(ThemeColor::parse("#zzzzzz"), None);
    }

    #[test]
    fn test_load_config_missing_override_fails() {
        let tmp = tempfile::tempdir().unwrap();
        let missing = tmp.path().join("nope.toml");
        assert!(load_config(Some(&missing)).is_err());
    }

    #[test]
    fn test_load_config_from_override_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("config.toml");
        fs::write(&path, "[repositories]\npicker_command = \"true\"\n").unwrap();
        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.repositories.picker_command.as_deref(), Some("true"));
    }
}
