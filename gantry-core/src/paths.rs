use std::path::PathBuf;

pub const APP_NAME: &str = "gantry";

/// `~/.config/gantry` on Linux and macOS (not `~/Library/Application Support`).
pub fn config_dir() -> PathBuf {
    #[cfg(unix)]
    {
        if let Ok(xdg_config_home) = std::env::var("XDG_CONFIG_HOME")
            && !xdg_config_home.is_empty()
        {
            return PathBuf::from(xdg_config_home).join(APP_NAME);
        }
        home_dir().join(".config").join(APP_NAME)
    }
    #[cfg(windows)]
    {
        dirs::config_dir()
            .unwrap_or_else(std::env::temp_dir)
            .join(APP_NAME)
    }
}

pub fn state_dir() -> PathBuf {
    #[cfg(unix)]
    {
        if let Ok(xdg_state_home) = std::env::var("XDG_STATE_HOME")
            && !xdg_state_home.is_empty()
        {
            return PathBuf::from(xdg_state_home).join(APP_NAME);
        }
        home_dir().join(".local").join("state").join(APP_NAME)
    }
    #[cfg(windows)]
    {
        dirs::data_local_dir()
            .unwrap_or_else(std::env::temp_dir)
            .join(APP_NAME)
    }
}

pub fn cache_dir() -> PathBuf {
    #[cfg(unix)]
    {
        if let Ok(xdg_cache_home) = std::env::var("XDG_CACHE_HOME")
            && !xdg_cache_home.is_empty()
        {
            return PathBuf::from(xdg_cache_home).join(APP_NAME);
        }
        home_dir().join(".cache").join(APP_NAME)
    }
    #[cfg(windows)]
    {
        dirs::cache_dir()
            .unwrap_or_else(std::env::temp_dir)
            .join(APP_NAME)
    }
}

#[cfg(unix)]
fn home_dir() -> PathBuf {
    dirs::home_dir().unwrap_or_else(std::env::temp_dir)
}

/// Expand a leading `~` to the home directory.
pub fn expand_tilde(path: &str) -> PathBuf {
    if path == "~" {
        dirs::home_dir().unwrap_or_else(|| PathBuf::from("."))
    } else if let Some(rest) = path.strip_prefix("~/") {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(rest)
    } else {
        PathBuf::from(path)
    }
}

/// Split text pasted into the terminal, typically by dropping files on it, into paths.
///
/// Words are separated by whitespace and may be shell-quoted (`'a b'`, `"a b"`) or
/// escaped (`a\ b`). A `file://` prefix is stripped.
pub fn parse_dropped_paths(text: &str) -> Vec<PathBuf> {
    let mut words: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut in_word = false;
    let mut quote: Option<char> = None;
    let mut chars = text.chars();

    while let Some(c) = chars.next() {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => current.push(c),
            None if c == '\'' || c == '"' => {
                quote = Some(c);
                in_word = true;
            }
            None if c == '\\' => {
                if let Some(escaped) = chars.next() {
                    current.push(escaped);
                }
                in_word = true;
            }
            None if c.is_whitespace() => {
                if in_word {
                    words.push(std::mem::take(&mut current));
                    in_word = false;
                }
            }
            None => {
                current.push(c);
                in_word = true;
            }
        }
    }
    if in_word {
        words.push(current);
    }

    words
        .iter()
        .map(|word| word.strip_prefix("file://").unwrap_or(word.as_str()))
        .filter(|word| !word.trim().is_empty())
        .map(expand_tilde)
        .collect()
}
