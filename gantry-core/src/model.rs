use regex::Regex;
use serde::{Deserialize, Serialize};
use std::{fmt, path::PathBuf, sync::LazyLock};

/// Stable identity for a sidebar entry. Assigned by the store and persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RepositoryId(pub u64);

impl fmt::Display for RepositoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Where a repository is hosted, parsed from its `origin` remote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostedRepository {
    pub host: String,
    pub owner: String,
    pub name: String,
}

static SCP_REMOTE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[\w.-]+@(?P<host>[\w.-]+):(?P<owner>[\w.-]+)/(?P<name>[\w.-]+?)(?:\.git)?/?$")
        .expect("valid regex")
});

static URL_REMOTE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?:https?|ssh|git)://(?:[^@/]+@)?(?P<host>[\w.-]+)(?::\d+)?/(?P<owner>[\w.-]+)/(?P<name>[\w.-]+?)(?:\.git)?/?$",
    )
    .expect("valid regex")
});

impl HostedRepository {
    /// Parse `git@host:owner/name.git` and `https://host/owner/name` style remotes.
    pub fn parse_remote_url(url: &str) -> Option<Self> {
        let url = url.trim();
        let caps = SCP_REMOTE
            .captures(url)
            .or_else(|| URL_REMOTE.captures(url))?;
        Some(Self {
            host: caps["host"].to_string(),
            owner: caps["owner"].to_string(),
            name: caps["name"].to_string(),
        })
    }

    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Repository {
    pub id: RepositoryId,
    pub name: String,
    pub path: PathBuf,
    pub remote: Option<HostedRepository>,
}

/// A repository whose clone is still in flight.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CloningRepository {
    pub id: RepositoryId,
    pub name: String,
    pub url: String,
    pub path: PathBuf,
}

/// An entry in the repository list: either a usable repository or a clone in progress.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepositoryListItem {
    Repository(Repository),
    Cloning(CloningRepository),
}

impl RepositoryListItem {
    pub fn id(&self) -> RepositoryId {
        match self {
            Self::Repository(repo) => repo.id,
            Self::Cloning(repo) => repo.id,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Repository(repo) => &repo.name,
            Self::Cloning(repo) => &repo.name,
        }
    }

    pub fn path(&self) -> &std::path::Path {
        match self {
            Self::Repository(repo) => &repo.path,
            Self::Cloning(repo) => &repo.path,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Branch {
    pub name: String,
    pub upstream: Option<String>,
    /// Tip commit SHA
    pub tip: String,
}

impl Branch {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            upstream: None,
            tip: String::new(),
        }
    }

    /// Branches are the same branch when their names match, whatever their tips.
    pub fn same_branch(&self, other: &Branch) -> bool {
        self.name == other.name
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commit {
    pub sha: String,
    pub summary: String,
    pub author: String,
    /// Unix seconds
    pub timestamp: i64,
}

impl Commit {
    pub fn short_sha(&self) -> &str {
        self.sha.get(..7).unwrap_or(&self.sha)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FileStatus {
    New,
    Modified,
    Deleted,
    Renamed,
    Conflicted,
    Untracked,
}

impl FileStatus {
    pub fn symbol(self) -> char {
        match self {
            Self::New => 'A',
            Self::Modified => 'M',
            Self::Deleted => 'D',
            Self::Renamed => 'R',
            Self::Conflicted => 'U',
            Self::Untracked => '?',
        }
    }
}

/// A changed file in the working directory.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FileChange {
    pub path: PathBuf,
    pub status: FileStatus,
    /// Source path of a staged rename or copy
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_path: Option<PathBuf>,
}

impl FileChange {
    pub fn new(path: impl Into<PathBuf>, status: FileStatus) -> Self {
        Self {
            path: path.into(),
            status,
            original_path: None,
        }
    }

    #[must_use]
    pub fn with_original_path(mut self, original: impl Into<PathBuf>) -> Self {
        self.original_path = Some(original.into());
        self
    }
}

/// A user-facing failure reported by background work.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppError {
    pub id: u64,
    pub message: String,
}

/// An authenticated identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub login: String,
    pub endpoint: String,
}

pub const DEFAULT_ENDPOINT: &str = "https://api.github.com";

impl User {
    pub fn new(login: impl Into<String>) -> Self {
        Self {
            login: login.into(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
        }
    }
}
