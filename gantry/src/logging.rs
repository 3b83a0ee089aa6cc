use gantry_core::paths;
use std::path::PathBuf;

const LOG_FILE_NAME: &str = "gantry.log";
const MAX_LOG_SIZE_MB: u64 = 10;
const MAX_LOG_FILES: u32 = 10;

pub const DEFAULT_LOG_LEVEL: &str = "warn";

pub fn default_log_file() -> PathBuf {
    paths::cache_dir().join(LOG_FILE_NAME)
}

/// Route the `log` facade to a rolling file under the cache directory.
pub fn setup_logging(level: log::LevelFilter) -> anyhow::Result<()> {
    let log_file = default_log_file();
    if let Some(parent) = log_file.parent() {
        std::fs::create_dir_all(parent)?;
    }
    simple_log::file(
        log_file.to_string_lossy().into_owned(),
        level.as_str(),
        MAX_LOG_SIZE_MB,
        MAX_LOG_FILES,
    )
    .map_err(|e| anyhow::anyhow!(e))?;
    log::info!("gantry logging initialised (level={level})");
    Ok(())
}
