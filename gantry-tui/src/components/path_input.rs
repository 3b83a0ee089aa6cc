use gantry_core::paths::expand_tilde;
use std::fs;

/// Split input into (`parent_dir`, prefix).
/// e.g. `~/Dev` → `("~/", "Dev")`, `test` → `("./", "test")`
pub fn split_input(input: &str) -> (String, String) {
    if let Some(last_slash) = input.rfind('/') {
        let parent = &input[..=last_slash];
        let prefix = &input[last_slash + 1..];
        (parent.to_string(), prefix.to_string())
    } else {
        ("./".to_string(), input.to_string())
    }
}

fn join_path(parent: &str, name: &str) -> String {
    if parent.ends_with('/') {
        format!("{parent}{name}")
    } else {
        format!("{parent}/{name}")
    }
}

/// Directory completions for `input`: prefix-matched ignoring case, sorted.
/// Hidden directories only appear when the prefix starts with `.`.
pub fn complete(input: &str) -> Vec<String> {
    if input.is_empty() {
        return Vec::new();
    }

    let (parent_dir, prefix) = split_input(input);
    let Ok(entries) = fs::read_dir(expand_tilde(&parent_dir)) else {
        return Vec::new();
    };

    let prefix_lower = prefix.to_lowercase();
    let mut completions: Vec<String> = entries
        .filter_map(Result::ok)
        .filter(|entry| entry.path().is_dir())
        .filter_map(|entry| {
            let name = entry.file_name().to_string_lossy().to_string();
            if name.starts_with('.') && !prefix.starts_with('.') {
                return None;
            }
            name.to_lowercase()
                .starts_with(&prefix_lower)
                .then(|| join_path(&parent_dir, &name))
        })
        .collect();

    completions.sort();
    completions
}

/// Longest common prefix of all completions, in chars.
pub fn common_prefix(completions: &[String]) -> String {
    let Some((first, rest)) = completions.split_first() else {
        return String::new();
    };

    let mut prefix_chars = first.chars().count();
    for other in rest {
        let shared = first
            .chars()
            .zip(other.chars())
            .take_while(|(a, b)| a == b)
            .count();
        prefix_chars = prefix_chars.min(shared);
    }
    first.chars().take(prefix_chars).collect()
}

/// Tab behaviour: extend `input` to the common prefix of its completions,
/// appending `/` when exactly one directory matches.
pub fn complete_input(input: &str) -> Option<String> {
    let completions = complete(input);
    match completions.as_slice() {
        [] => None,
        [only] => Some(format!("{only}/")),
        _ => {
            let prefix = common_prefix(&completions);
            (prefix.chars().count() > input.chars().count()).then_some(prefix)
        }
    }
}
