mod cli;
mod logging;

use anyhow::Result;
use clap::{Parser, Subcommand};
use cli::{CliContext, CliError};
use gantry_core::{
    AppStore, CliGitProvider,
    config::{self, Config},
    store::persist,
};
use gantry_tui::CommandDirectoryPicker;
use std::{path::PathBuf, process::ExitCode, sync::Arc};

#[derive(Parser)]
#[command(version, about = "Terminal Git client")]
struct Cli {
    /// Override path to config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log level written to the log file (error, warn, info, debug, trace, off)
    #[arg(long, default_value = logging::DEFAULT_LOG_LEVEL)]
    log_level: log::LevelFilter,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List saved repositories
    List {
        #[arg(long)]
        json: bool,
    },
    /// Add local repositories to the sidebar
    Add {
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },
    /// Remove a repository from the sidebar (files on disk are untouched)
    Remove {
        /// Repository name or path
        name: String,
    },
    /// List menu commands and their labels
    MenuEvents {
        #[arg(long)]
        json: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let json_errors = command_wants_json(cli.command.as_ref());

    if let Err(e) = logging::setup_logging(cli.log_level) {
        eprintln!("warning: logging disabled: {e}");
    }

    let config = match config::load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(error) => {
            let cli_error = CliError::system(format!("{error:#}"));
            cli::print_error(&cli_error, json_errors);
            return ExitCode::from(2);
        }
    };

    let ctx = CliContext {
        state_file: persist::default_state_file(),
        users: config.users(),
        git: Arc::new(CliGitProvider),
    };

    let result = match cli.command {
        Some(Commands::List { json }) => cli::cmd_list(&ctx, json),
        Some(Commands::Add { paths }) => cli::cmd_add(&ctx, &paths),
        Some(Commands::Remove { name }) => cli::cmd_remove(&ctx, &name),
        Some(Commands::MenuEvents { json }) => cli::cmd_menu_events(json),
        None => run_tui(&config, ctx).map_err(CliError::from),
    };

    match result {
        Ok(()) => ExitCode::from(0),
        Err(error) => {
            log::error!("{error}");
            cli::print_error(&error, json_errors);
            let code: u8 = match error.code() {
                1 => 1,
                _ => 2,
            };
            ExitCode::from(code)
        }
    }
}

fn run_tui(config: &Config, ctx: CliContext) -> Result<()> {
    let persisted = persist::load_state(&ctx.state_file);
    let store = AppStore::spawn(persisted, &ctx.users, ctx.git, Some(ctx.state_file))?;
    let picker = CommandDirectoryPicker::new(config.repositories.picker_command.clone());

    let mut terminal = ratatui::init();
    let result = gantry_tui::run(&mut terminal, &store, picker, config);
    ratatui::restore();
    result
}

fn command_wants_json(command: Option<&Commands>) -> bool {
    match command {
        Some(Commands::List { json } | Commands::MenuEvents { json }) => *json,
        Some(Commands::Add { .. } | Commands::Remove { .. }) | None => false,
    }
}
