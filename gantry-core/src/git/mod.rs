pub mod cli;
pub mod mock;
pub mod provider;

pub use cli::CliGitProvider;
pub use provider::{GitProvider, OpenedRepository};

use crate::model::{Branch, Commit, FileChange, FileStatus};
use regex::Regex;
use std::{path::PathBuf, sync::LazyLock};

/// How many recently checked-out branches the branch picker lists first.
pub const RECENT_BRANCHES_LIMIT: usize = 5;

/// How many commits the history section shows.
pub const HISTORY_LIMIT: usize = 100;

/// Parse `git status --porcelain -z --untracked-files=all` output.
///
/// Rename and copy entries are followed by their origin path, kept as `original_path`.
pub fn parse_status_porcelain(output: &str) -> Vec<FileChange> {
    let mut changes = Vec::new();
    let mut entries = output.split('\0').filter(|e| !e.is_empty());

    while let Some(entry) = entries.next() {
        let Some((xy, path)) = entry.split_at_checked(3) else {
            continue;
        };
        let mut codes = xy.chars();
        let (x, y) = (codes.next().unwrap_or(' '), codes.next().unwrap_or(' '));

        let mut original_path = None;
        let status = match (x, y) {
            ('?', '?') => FileStatus::Untracked,
            ('!', '!') => continue,
            ('U', _) | (_, 'U') | ('A', 'A') | ('D', 'D') => FileStatus::Conflicted,
            ('R' | 'C', _) => {
                original_path = entries.next().map(PathBuf::from);
                if x == 'R' {
                    FileStatus::Renamed
                } else {
                    FileStatus::New
                }
            }
            ('A', _) => FileStatus::New,
            ('D', _) | (_, 'D') => FileStatus::Deleted,
            _ => FileStatus::Modified,
        };

        changes.push(FileChange {
            path: PathBuf::from(path),
            status,
            original_path,
        });
    }

    changes
}

/// Format string for `git for-each-ref` matching [`parse_branch_refs`].
pub const BRANCH_REF_FORMAT: &str = "%(refname:short)%00%(upstream:short)%00%(objectname)";

/// Parse `git for-each-ref --format=BRANCH_REF_FORMAT refs/heads` output.
pub fn parse_branch_refs(output: &str) -> Vec<Branch> {
    output
        .lines()
        .filter_map(|line| {
            let mut fields = line.split('\0');
            let name = fields.next()?.trim();
            if name.is_empty() {
                return None;
            }
            let upstream = fields.next().map(str::trim).filter(|u| !u.is_empty());
            let tip = fields.next().unwrap_or_default().trim();
            Some(Branch {
                name: name.to_string(),
                upstream: upstream.map(String::from),
                tip: tip.to_string(),
            })
        })
        .collect()
}

/// Pick recently checked-out branches from reflog subjects (`git log -g --format=%gs`), newest first.
///
/// Only branches that still exist locally are returned.
pub fn parse_recent_branches(reflog: &str, branches: &[Branch], limit: usize) -> Vec<Branch> {
    let mut recent: Vec<Branch> = Vec::new();
    for line in reflog.lines() {
        if recent.len() >= limit {
            break;
        }
        let Some(rest) = line.strip_prefix("checkout: moving from ") else {
            continue;
        };
        let Some((_, to)) = rest.rsplit_once(" to ") else {
            continue;
        };
        if recent.iter().any(|b| b.name == to) {
            continue;
        }
        if let Some(branch) = branches.iter().find(|b| b.name == to) {
            recent.push(branch.clone());
        }
    }
    recent
}

/// Format string for `git log` matching [`parse_log`].
pub const LOG_FORMAT: &str = "%H%x00%s%x00%an%x00%ct";

pub fn parse_log(output: &str) -> Vec<Commit> {
    output
        .lines()
        .filter_map(|line| {
            let mut fields = line.split('\0');
            let sha = fields.next()?.trim();
            if sha.is_empty() {
                return None;
            }
            let summary = fields.next().unwrap_or_default();
            let author = fields.next().unwrap_or_default();
            let timestamp = fields.next().and_then(|t| t.trim().parse().ok()).unwrap_or(0);
            Some(Commit {
                sha: sha.to_string(),
                summary: summary.to_string(),
                author: author.to_string(),
                timestamp,
            })
        })
        .collect()
}

static PROGRESS_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:remote: )?([A-Za-z ]+):\s+(\d+)%").expect("valid regex")
});

/// Share of the overall clone each git progress phase accounts for.
const CLONE_PHASES: &[(&str, f64, f64)] = &[
    ("Counting objects", 0.0, 0.05),
    ("Compressing objects", 0.05, 0.05),
    ("Receiving objects", 0.1, 0.6),
    ("Resolving deltas", 0.7, 0.2),
    ("Updating files", 0.9, 0.1),
    ("Checking out files", 0.9, 0.1),
];

/// A parsed `git clone --progress` line: the phase title and the overall fraction done.
pub fn parse_clone_progress(line: &str) -> Option<(String, f64)> {
    let caps = PROGRESS_LINE.captures(line.trim())?;
    let title = caps[1].trim().to_string();
    let percent: f64 = caps[2].parse().ok()?;
    let (_, start, weight) = CLONE_PHASES.iter().find(|(name, _, _)| *name == title)?;
    let value = (start + weight * percent / 100.0).clamp(0.0, 1.0);
    Some((title, value))
}

/// Derive a directory name from a clone URL (`https://host/o/app.git` becomes `app`).
pub fn repository_name_from_url(url: &str) -> Option<String> {
    let trimmed = url.trim().trim_end_matches('/');
    let last = trimmed.rsplit(['/', ':']).next()?;
    let name = last.strip_suffix(".git").unwrap_or(last);
    if name.is_empty() {
        None
    } else {
        Some(name.to_string())
    }
}

/// Whether user input looks like something to clone rather than a local path.
pub fn is_clone_url(input: &str) -> bool {
    let input = input.trim();
    if input.contains("://") {
        return true;
    }
    // scp-like: user@host:path
    if let Some((user_host, _)) = input.split_once(':')
        && let Some((user, host)) = user_host.split_once('@')
    {
        return !user.is_empty() && !host.is_empty() && !user_host.contains('/');
    }
    false
}
