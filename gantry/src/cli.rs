use gantry_core::{
    AppStore, Dispatcher, GitProvider, MenuEvent, Repository, RepositoryListItem, StoreHandle,
    User,
    store::persist::{self, PersistedState},
};
use serde::Serialize;
use std::{
    collections::HashSet,
    fmt::Write,
    path::PathBuf,
    sync::Arc,
    time::Duration,
};

/// How long `add` waits for git to confirm every path.
const OPEN_TIMEOUT: Duration = Duration::from_secs(30);

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug, Clone)]
pub struct CliError {
    message: String,
    code: i32,
}

impl CliError {
    pub fn user(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: 1,
        }
    }

    pub fn system(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: 2,
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn code(&self) -> i32 {
        self.code
    }
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

impl From<anyhow::Error> for CliError {
    fn from(value: anyhow::Error) -> Self {
        Self::system(value.to_string())
    }
}

/// Where the CLI reads and writes the repository list.
pub struct CliContext {
    pub state_file: PathBuf,
    pub users: Vec<User>,
    pub git: Arc<dyn GitProvider>,
}

impl CliContext {
    fn load(&self) -> PersistedState {
        persist::load_state(&self.state_file)
    }

    /// Mutations go through a short-lived store so ids and persistence match the TUI.
    fn spawn_store(&self) -> CliResult<StoreHandle> {
        AppStore::spawn(
            self.load(),
            &self.users,
            Arc::clone(&self.git),
            Some(self.state_file.clone()),
        )
        .map_err(|e| CliError::system(format!("failed to start store: {e}")))
    }
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct RepoOutput {
    name: String,
    path: PathBuf,
    remote: Option<String>,
}

impl From<&Repository> for RepoOutput {
    fn from(repo: &Repository) -> Self {
        Self {
            name: repo.name.clone(),
            path: repo.path.clone(),
            remote: repo
                .remote
                .as_ref()
                .map(|r| format!("{}:{}", r.host, r.full_name())),
        }
    }
}

#[derive(Debug, Serialize)]
struct MenuEventOutput {
    name: &'static str,
    label: &'static str,
    requires_repository: bool,
}

pub fn cmd_list(ctx: &CliContext, json: bool) -> CliResult<()> {
    let output: Vec<RepoOutput> = ctx.load().repositories.iter().map(RepoOutput::from).collect();

    if json {
        print_json(&output)?;
    } else {
        print!("{}", format_repo_table(&output));
    }

    Ok(())
}

pub fn cmd_add(ctx: &CliContext, paths: &[PathBuf]) -> CliResult<()> {
    let added = add_repositories(ctx, paths)?;
    if added.is_empty() {
        println!("No new repositories added");
    } else {
        let output: Vec<RepoOutput> = added.iter().map(RepoOutput::from).collect();
        print!("{}", format_repo_table(&output));
    }
    Ok(())
}

pub fn cmd_remove(ctx: &CliContext, name: &str) -> CliResult<()> {
    let removed = remove_repository(ctx, name)?;
    println!("Removed {} ({})", removed.name, removed.path.display());
    Ok(())
}

pub fn cmd_menu_events(json: bool) -> CliResult<()> {
    let output: Vec<MenuEventOutput> = MenuEvent::ALL
        .iter()
        .map(|event| MenuEventOutput {
            name: event.name(),
            label: event.label(),
            requires_repository: event.requires_repository(),
        })
        .collect();

    if json {
        print_json(&output)?;
    } else {
        print!("{}", format_menu_event_table(&output));
    }
    Ok(())
}

/// Open `paths` as repositories and save them. Returns the entries that were new.
fn add_repositories(ctx: &CliContext, paths: &[PathBuf]) -> CliResult<Vec<Repository>> {
    let mut canonical = Vec::with_capacity(paths.len());
    for path in paths {
        let resolved = dunce::canonicalize(path)
            .map_err(|e| CliError::user(format!("cannot access {}: {e}", path.display())))?;
        canonical.push(resolved);
    }

    let store = ctx.spawn_store()?;
    let before: HashSet<_> = store
        .get_state()
        .repositories
        .iter()
        .map(RepositoryListItem::id)
        .collect();
    let updates = store.subscribe();
    store.dispatcher().add_repositories(canonical);

    let snapshot = loop {
        match updates.next_timeout(OPEN_TIMEOUT) {
            Some(snapshot) if !snapshot.loading => break snapshot,
            Some(_) => {}
            None => {
                return Err(CliError::system(
                    "timed out waiting for repositories to open",
                ));
            }
        }
    };

    if !snapshot.errors.is_empty() {
        let messages: Vec<&str> = snapshot.errors.iter().map(|e| e.message.as_str()).collect();
        return Err(CliError::user(messages.join("\n")));
    }

    Ok(snapshot
        .repositories
        .iter()
        .filter_map(|item| match item {
            RepositoryListItem::Repository(repo) if !before.contains(&repo.id) => {
                Some(repo.clone())
            }
            _ => None,
        })
        .collect())
}

/// Remove the repository matching `target` by name or path.
fn remove_repository(ctx: &CliContext, target: &str) -> CliResult<Repository> {
    let store = ctx.spawn_store()?;
    let state = store.get_state();
    let repositories: Vec<&Repository> = state
        .repositories
        .iter()
        .filter_map(|item| match item {
            RepositoryListItem::Repository(repo) => Some(repo),
            RepositoryListItem::Cloning(_) => None,
        })
        .collect();

    let target_path = dunce::canonicalize(target).ok();
    let matches: Vec<&Repository> = repositories
        .iter()
        .copied()
        .filter(|repo| repo.name == target || target_path.as_deref() == Some(repo.path.as_path()))
        .collect();

    let repo = match matches.as_slice() {
        [repo] => (*repo).clone(),
        [] => {
            let available: Vec<&str> = repositories.iter().map(|r| r.name.as_str()).collect();
            return Err(CliError::user(format!(
                "no repository named '{target}' found. Available: {}",
                available.join(", ")
            )));
        }
        _ => {
            return Err(CliError::user(format!(
                "'{target}' matches more than one repository, pass its path instead"
            )));
        }
    };

    let updates = store.subscribe();
    store
        .dispatcher()
        .remove_repositories(&[RepositoryListItem::Repository(repo.clone())]);
    if updates.next_timeout(OPEN_TIMEOUT).is_none() {
        return Err(CliError::system("timed out removing repository"));
    }
    Ok(repo)
}

fn format_repo_table(repos: &[RepoOutput]) -> String {
    let name_header = "repo";
    let remote_header = "remote";
    let path_header = "path";
    let name_width = repos
        .iter()
        .map(|repo| repo.name.len())
        .max()
        .unwrap_or(name_header.len())
        .max(name_header.len());
    let remote_width = repos
        .iter()
        .map(|repo| repo.remote.as_deref().map_or(1, str::len))
        .max()
        .unwrap_or(remote_header.len())
        .max(remote_header.len());

    let mut out = String::new();
    let _ = writeln!(
        out,
        "{name_header:<name_width$}  {remote_header:<remote_width$}  {path_header}"
    );
    for repo in repos {
        let remote = repo.remote.as_deref().unwrap_or("-");
        let _ = writeln!(
            out,
            "{:<name_width$}  {remote:<remote_width$}  {}",
            repo.name,
            repo.path.display()
        );
    }
    out
}

fn format_menu_event_table(events: &[MenuEventOutput]) -> String {
    let name_header = "event";
    let name_width = events
        .iter()
        .map(|event| event.name.len())
        .max()
        .unwrap_or(name_header.len())
        .max(name_header.len());

    let mut out = String::new();
    let _ = writeln!(out, "{name_header:<name_width$}  label");
    for event in events {
        let _ = writeln!(out, "{:<name_width$}  {}", event.name, event.label);
    }
    out
}

fn print_json<T: Serialize>(value: &T) -> CliResult<()> {
    println!(
        "{}",
        serde_json::to_string(value).map_err(|e| CliError::system(e.to_string()))?
    );
    Ok(())
}

pub fn print_error(error: &CliError, json: bool) {
    if json {
        let payload = serde_json::json!({ "error": error.message() });
        eprintln!("{payload}");
    } else {
        eprintln!("{}", error.message());
    }
}
