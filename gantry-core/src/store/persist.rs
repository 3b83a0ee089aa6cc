use crate::{
    model::{Repository, User},
    paths,
};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::{fs, path::Path, path::PathBuf};

const STATE_FILE_NAME: &str = "state.toml";
const STATE_VERSION: u32 = 1;

/// What survives a restart: the repository list and signed-in users.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersistedState {
    pub users: Vec<User>,
    pub repositories: Vec<Repository>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct StateFile {
    version: u32,
    #[serde(default)]
    users: Vec<User>,
    #[serde(default)]
    repositories: Vec<Repository>,
}

pub fn default_state_file() -> PathBuf {
    paths::state_dir().join(STATE_FILE_NAME)
}

/// Load saved state. A missing, unreadable or outdated file yields an empty state.
pub fn load_state(file_path: &Path) -> PersistedState {
    let Ok(contents) = fs::read_to_string(file_path) else {
        return PersistedState::default();
    };

    let parsed = match toml::from_str::<StateFile>(&contents) {
        Ok(parsed) => parsed,
        Err(e) => {
            log::warn!("ignoring invalid state file {}: {e}", file_path.display());
            return PersistedState::default();
        }
    };

    if parsed.version != STATE_VERSION {
        log::info!(
            "ignoring state file {} with version {}",
            file_path.display(),
            parsed.version
        );
        return PersistedState::default();
    }

    PersistedState {
        users: parsed.users,
        repositories: parsed.repositories,
    }
}

pub fn save_state(file_path: &Path, state: &PersistedState) -> Result<()> {
    if let Some(parent) = file_path.parent() {
        fs::create_dir_all(parent)?;
    }

    let file = StateFile {
        version: STATE_VERSION,
        users: state.users.clone(),
        repositories: state.repositories.clone(),
    };
    fs::write(file_path, toml::to_string(&file)?)?;
    Ok(())
}
