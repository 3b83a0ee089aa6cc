use super::{
    BRANCH_REF_FORMAT, HISTORY_LIMIT, LOG_FORMAT, RECENT_BRANCHES_LIMIT, parse_branch_refs,
    parse_clone_progress, parse_log, parse_recent_branches, parse_status_porcelain,
    provider::{GitProvider, OpenedRepository},
};
use crate::{
    model::{Branch, FileChange, FileStatus},
    state::{BranchesState, CloneProgress, RepositoryState},
};
use anyhow::{Context, Result};
use std::{
    io::{BufReader, Read},
    path::{Path, PathBuf},
    process::{Child, Command, Stdio},
};

pub struct CliGitProvider;

/// Run git in `dir` and return stdout, failing with stderr when git exits non-zero.
fn git(dir: &Path, args: &[&str]) -> Result<String> {
    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .with_context(|| format!("failed to run git {}", args.first().unwrap_or(&"")))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        anyhow::bail!(
            "git {} failed: {}",
            args.first().unwrap_or(&""),
            stderr.trim()
        );
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

impl GitProvider for CliGitProvider {
    fn open_repository(&self, path: &Path) -> Result<OpenedRepository> {
        if !path.is_dir() {
            anyhow::bail!("{} is not a directory", path.display());
        }
        let toplevel = git(path, &["rev-parse", "--show-toplevel"])
            .with_context(|| format!("{} is not a git repository", path.display()))?;
        let root = PathBuf::from(toplevel.trim());
        let name = root
            .file_name()
            .map_or_else(|| root.display().to_string(), |n| n.to_string_lossy().to_string());
        let remote_url = self.remote_url(&root);
        Ok(OpenedRepository {
            name,
            path: root,
            remote_url,
        })
    }

    fn load_state(&self, repo_path: &Path) -> Result<RepositoryState> {
        let all_branches = parse_branch_refs(&git(
            repo_path,
            &[
                "for-each-ref",
                &format!("--format={BRANCH_REF_FORMAT}"),
                "refs/heads",
            ],
        )?);

        // Unborn branches are absent from refs/heads, detached HEAD has no symbolic ref
        let current_branch = git(repo_path, &["symbolic-ref", "--quiet", "--short", "HEAD"])
            .ok()
            .and_then(|name| {
                let name = name.trim().to_string();
                all_branches.iter().find(|b| b.name == name).cloned()
            });

        let default_branch = Self::default_branch(repo_path, &all_branches);

        let recent_branches = git(
            repo_path,
            &["log", "-g", "--format=%gs", "-n", "200", "HEAD", "--"],
        )
        .map(|reflog| parse_recent_branches(&reflog, &all_branches, RECENT_BRANCHES_LIMIT))
        .unwrap_or_default();

        let commits = if current_branch.is_some()
            || git(repo_path, &["rev-parse", "--verify", "--quiet", "HEAD"]).is_ok()
        {
            parse_log(&git(
                repo_path,
                &[
                    "log",
                    &format!("--format={LOG_FORMAT}"),
                    "-n",
                    &HISTORY_LIMIT.to_string(),
                    "HEAD",
                    "--",
                ],
            )?)
        } else {
            Vec::new()
        };

        let changes = parse_status_porcelain(&git(
            repo_path,
            &["status", "--porcelain", "-z", "--untracked-files=all"],
        )?);

        Ok(RepositoryState {
            branches_state: BranchesState {
                current_branch,
                default_branch,
                all_branches,
                recent_branches,
            },
            commits,
            changes,
            ..Default::default()
        })
    }

    fn remote_url(&self, repo_path: &Path) -> Option<String> {
        git(repo_path, &["remote", "get-url", "origin"])
            .ok()
            .map(|url| url.trim().to_string())
            .filter(|url| !url.is_empty())
    }

    fn push(&self, repo_path: &Path, branch: &Branch) -> Result<()> {
        if branch.upstream.is_some() {
            git(repo_path, &["push"])?;
        } else {
            git(repo_path, &["push", "--set-upstream", "origin", &branch.name])?;
        }
        Ok(())
    }

    fn pull(&self, repo_path: &Path) -> Result<()> {
        git(repo_path, &["pull"])?;
        Ok(())
    }

    fn create_branch(&self, repo_path: &Path, name: &str, start_point: Option<&str>) -> Result<()> {
        let mut args = vec!["checkout", "-b", name];
        if let Some(start) = start_point {
            args.push(start);
        }
        git(repo_path, &args)?;
        Ok(())
    }

    fn checkout_branch(&self, repo_path: &Path, name: &str) -> Result<()> {
        git(repo_path, &["checkout", name, "--"])?;
        Ok(())
    }

    fn rename_branch(&self, repo_path: &Path, old_name: &str, new_name: &str) -> Result<()> {
        git(repo_path, &["branch", "-m", old_name, new_name])?;
        Ok(())
    }

    fn delete_branch(&self, repo_path: &Path, name: &str) -> Result<()> {
        git(repo_path, &["branch", "-D", name])?;
        Ok(())
    }

    fn discard_changes(&self, repo_path: &Path, files: &[FileChange]) -> Result<()> {
        let mut restore: Vec<String> = Vec::new();
        let mut remove_tracked: Vec<String> = Vec::new();

        for file in files {
            let path = file.path.to_string_lossy().to_string();
            match file.status {
                FileStatus::Untracked => {
                    let full = repo_path.join(&file.path);
                    if full.is_dir() {
                        std::fs::remove_dir_all(&full)
                    } else {
                        std::fs::remove_file(&full)
                    }
                    .with_context(|| format!("Failed to remove {}", full.display()))?;
                }
                FileStatus::New => remove_tracked.push(path),
                FileStatus::Renamed => {
                    remove_tracked.push(path);
                    // Bring the source back, otherwise it is left as a staged deletion
                    if let Some(original) = &file.original_path {
                        restore.push(original.to_string_lossy().to_string());
                    }
                }
                FileStatus::Modified | FileStatus::Deleted | FileStatus::Conflicted => {
                    restore.push(path);
                }
            }
        }

        if !remove_tracked.is_empty() {
            let mut args = vec!["rm", "-f", "--"];
            args.extend(remove_tracked.iter().map(String::as_str));
            git(repo_path, &args)?;
        }
        if !restore.is_empty() {
            let mut args = vec!["checkout", "HEAD", "--"];
            args.extend(restore.iter().map(String::as_str));
            git(repo_path, &args)?;
        }
        Ok(())
    }

    fn publish(&self, repo_path: &Path, remote_url: &str, branch: &str) -> Result<()> {
        if self.remote_url(repo_path).is_some() {
            anyhow::bail!("repository already has an origin remote");
        }
        git(repo_path, &["remote", "add", "origin", remote_url])?;
        git(repo_path, &["push", "--set-upstream", "origin", branch])?;
        Ok(())
    }

    fn clone_repository(
        &self,
        url: &str,
        destination: &Path,
        on_progress: &mut dyn FnMut(CloneProgress),
    ) -> Result<()> {
        if destination.exists() {
            anyhow::bail!("{} already exists", destination.display());
        }
        if let Some(parent) = destination.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }

        let mut child = Command::new("git")
            .args(["clone", "--progress", url])
            .arg(destination)
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .context("failed to run git clone")?;

        let title = format!("Cloning {url}");
        let mut messages: Vec<String> = Vec::new();
        if let Some(stderr) = child.stderr.take() {
            let mut line: Vec<u8> = Vec::new();
            let mut handle_line = |raw: &[u8]| {
                let text = String::from_utf8_lossy(raw).trim().to_string();
                if text.is_empty() {
                    return;
                }
                if let Some((_, value)) = parse_clone_progress(&text) {
                    on_progress(CloneProgress {
                        title: title.clone(),
                        value,
                        description: Some(text),
                    });
                } else {
                    messages.push(text);
                }
            };
            for byte in BufReader::new(stderr).bytes() {
                let byte = match byte {
                    Ok(byte) => byte,
                    Err(e) => return Err(abort_child(&mut child, e)),
                };
                if byte == b'\r' || byte == b'\n' {
                    handle_line(&line);
                    line.clear();
                } else {
                    line.push(byte);
                }
            }
            handle_line(&line);
        }

        let status = child.wait()?;
        if !status.success() {
            anyhow::bail!("git clone failed: {}", messages.join("\n"));
        }
        Ok(())
    }
}

/// Kill and reap a child whose output could not be read.
fn abort_child(child: &mut Child, error: std::io::Error) -> anyhow::Error {
    if let Err(e) = child.kill() {
        log::debug!("failed to kill git: {e}");
    }
    let _ = child.wait();
    anyhow::Error::new(error).context("failed to read git clone output")
}

impl CliGitProvider {
    /// `origin/HEAD` when known, otherwise a local `main` or `master`.
    fn default_branch(repo_path: &Path, branches: &[Branch]) -> Option<Branch> {
        if let Ok(remote_head) = git(
            repo_path,
            &["symbolic-ref", "--quiet", "--short", "refs/remotes/origin/HEAD"],
        ) && let Some(name) = remote_head.trim().strip_prefix("origin/")
        {
            return Some(
                branches
                    .iter()
                    .find(|b| b.name == name)
                    .cloned()
                    .unwrap_or_else(|| Branch::new(name)),
            );
        }

        ["main", "master"]
            .iter()
            .find_map(|candidate| branches.iter().find(|b| b.name == *candidate))
            .cloned()
    }
}
