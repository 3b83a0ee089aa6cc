use anyhow::{Result, bail};
use crossterm::{
    event::{DisableBracketedPaste, EnableBracketedPaste},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use gantry_core::{paths::expand_tilde, picker::DirectoryPicker};
use std::{
    io,
    path::PathBuf,
    process::{Command, Stdio},
};

/// Runs `[repositories] picker_command` on the real terminal and reads one directory per line.
pub struct CommandDirectoryPicker {
    command: Option<String>,
}

impl CommandDirectoryPicker {
    pub fn new(command: Option<String>) -> Self {
        Self { command }
    }
}

impl DirectoryPicker for CommandDirectoryPicker {
    fn pick_directories(&self) -> Option<Vec<PathBuf>> {
        let Some(command) = &self.command else {
            log::warn!("add local repository needs `picker_command` in the [repositories] config");
            return None;
        };

        let mut stdout = io::stdout();
        if let Err(e) = disable_raw_mode()
            .and_then(|()| execute!(stdout, DisableBracketedPaste, LeaveAlternateScreen))
        {
            log::warn!("failed to suspend terminal: {e}");
        }
        let result = run_picker_command(command);
        if let Err(e) = execute!(stdout, EnterAlternateScreen, EnableBracketedPaste)
            .and_then(|()| enable_raw_mode())
        {
            log::error!("failed to restore terminal: {e}");
        }

        match result {
            Ok(paths) => Some(paths),
            Err(e) => {
                log::warn!("directory picker failed: {e}");
                None
            }
        }
    }
}

/// Run `command` through the shell with the terminal attached; stdout is captured.
fn run_picker_command(command: &str) -> Result<Vec<PathBuf>> {
    log::debug!("running picker command: {command}");
    let output = Command::new("sh")
        .arg("-c")
        .arg(command)
        .stdin(Stdio::inherit())
        .stderr(Stdio::inherit())
        .output()?;
    if !output.status.success() {
        bail!("`{command}` exited with {}", output.status);
    }
    Ok(parse_picked_paths(&String::from_utf8_lossy(&output.stdout)))
}

fn parse_picked_paths(output: &str) -> Vec<PathBuf> {
    output
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(expand_tilde)
        .collect()
}
