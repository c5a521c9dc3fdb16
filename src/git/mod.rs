//! Git command adapter.
//!
//! Every operation shells out to the installed `git` binary with the working
//! directory set to the target repository, and parses its textual output.
//! Mutating commands use force flags; safety lives in the confirmation
//! dialogs, not in git's own guard rails.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::debug;

use crate::error::{Error, Result};

/// Branch value reported for a worktree with no branch checked out.
pub const DETACHED: &str = "detached HEAD";

/// A single worktree as reported by git.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Worktree {
    /// Last path segment of the worktree directory
    pub name: String,
    /// Checked-out branch, or `"detached HEAD"`
    pub branch: String,
    /// Absolute path of the worktree directory
    pub path: PathBuf,
}

/// Run git with `args` in `repo`, returning trimmed stdout on success.
fn run_git(repo: &Path, args: &[&str]) -> Result<String> {
    let label = format!("git {}", args.join(" "));
    debug!(repo = %repo.display(), command = %label, "running git");
    let output = Command::new("git")
        .args(args)
        .current_dir(repo)
        .output()
        .map_err(|e| Error::Tool {
            command: label.clone(),
            output: e.to_string(),
        })?;

    if !output.status.success() {
        let mut combined = String::from_utf8_lossy(&output.stderr).trim().to_string();
        if combined.is_empty() {
            combined = String::from_utf8_lossy(&output.stdout).trim().to_string();
        }
        return Err(Error::Tool {
            command: label,
            output: combined,
        });
    }

    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

/// Run git and report only whether it exited zero. Used for existence probes
/// where a non-zero exit is a normal answer, never an error.
fn git_succeeds(repo: &Path, args: &[&str]) -> bool {
    Command::new("git")
        .args(args)
        .current_dir(repo)
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

/// List all worktrees of the repository, primary worktree first.
pub fn list_worktrees(repo: &Path) -> Result<Vec<Worktree>> {
    let stdout = run_git(repo, &["worktree", "list", "--porcelain"])?;
    Ok(parse_worktree_porcelain(&stdout))
}

/// Parse `git worktree list --porcelain` output into worktree records.
///
/// Blocks are separated by blank lines; each block starts with a
/// `worktree <path>` line and carries either `branch refs/heads/<name>` or a
/// bare `detached` line.
fn parse_worktree_porcelain(output: &str) -> Vec<Worktree> {
    let mut worktrees = Vec::new();
    let mut path: Option<PathBuf> = None;
    let mut branch: Option<String> = None;

    let mut flush = |path: &mut Option<PathBuf>, branch: &mut Option<String>| {
        if let Some(p) = path.take() {
            let name = p
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            worktrees.push(Worktree {
                name,
                branch: branch.take().unwrap_or_else(|| DETACHED.to_string()),
                path: p,
            });
        }
        *branch = None;
    };

    for line in output.lines() {
        let line = line.trim_end();
        if line.is_empty() {
            flush(&mut path, &mut branch);
        } else if let Some(p) = line.strip_prefix("worktree ") {
            // A new block without a preceding blank line still terminates the old one
            flush(&mut path, &mut branch);
            path = Some(PathBuf::from(p));
        } else if let Some(b) = line.strip_prefix("branch ") {
            branch = Some(b.strip_prefix("refs/heads/").unwrap_or(b).to_string());
        } else if line == "detached" {
            branch = Some(DETACHED.to_string());
        }
    }
    flush(&mut path, &mut branch);

    worktrees
}

/// Name of the branch currently checked out in the primary worktree.
pub fn current_branch(repo: &Path) -> Result<String> {
    run_git(repo, &["rev-parse", "--abbrev-ref", "HEAD"])
}

/// Whether a local branch exists. Absence is a normal outcome.
pub fn branch_exists(repo: &Path, branch: &str) -> bool {
    let refname = format!("refs/heads/{}", branch);
    git_succeeds(repo, &["show-ref", "--verify", "--quiet", &refname])
}

/// Whether a remote-tracking ref like `origin/main` exists.
pub fn remote_ref_exists(repo: &Path, short_ref: &str) -> bool {
    let refname = format!("refs/remotes/{}", short_ref);
    git_succeeds(repo, &["show-ref", "--verify", "--quiet", &refname])
}

/// Create a worktree at `target` for `branch`.
///
/// With `base` set the branch is created from that ref; without it the
/// existing branch is attached. The caller checks `target` for collisions
/// before calling, so any error here comes from git itself.
pub fn add_worktree(repo: &Path, target: &Path, branch: &str, base: Option<&str>) -> Result<()> {
    let target_str = target.to_string_lossy();
    match base {
        Some(base_ref) => run_git(
            repo,
            &["worktree", "add", "-b", branch, &target_str, base_ref],
        )?,
        None => run_git(repo, &["worktree", "add", &target_str, branch])?,
    };
    Ok(())
}

/// Remove a worktree, discarding any uncommitted changes in it.
pub fn remove_worktree(repo: &Path, worktree_path: &Path) -> Result<()> {
    run_git(
        repo,
        &[
            "worktree",
            "remove",
            "--force",
            &worktree_path.to_string_lossy(),
        ],
    )?;
    Ok(())
}

/// Force-delete a branch, merged or not.
pub fn delete_branch(repo: &Path, branch: &str) -> Result<()> {
    run_git(repo, &["branch", "-D", branch])?;
    Ok(())
}

/// All branch names, local and remote, for autocomplete.
///
/// Remote-tracking prefixes are stripped and symbolic `HEAD` entries dropped;
/// the result is deduplicated and sorted. Callers treat a failure as an empty
/// list, so this never needs to be fatal.
pub fn list_branches(repo: &Path) -> Result<Vec<String>> {
    let stdout = run_git(repo, &["branch", "--all", "--format=%(refname:short)"])?;
    Ok(normalize_branch_list(&stdout))
}

fn normalize_branch_list(output: &str) -> Vec<String> {
    let mut branches: Vec<String> = output
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(|l| match l.split_once('/') {
            // `origin/feat` -> `feat`; deeper slashes belong to the branch name
            Some((_remote, rest)) => rest.to_string(),
            None => l.to_string(),
        })
        .filter(|b| b != "HEAD")
        .collect();
    branches.sort();
    branches.dedup();
    branches
}

/// Clone `url` into `target`, creating parent directories as needed.
pub fn clone(url: &str, target: &Path) -> Result<()> {
    if target.exists() {
        return Err(Error::Validation(format!(
            "Target directory already exists: {}",
            target.display()
        )));
    }
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent).map_err(|e| Error::fs(parent, e))?;
    }
    // git clone takes its own target path; no working directory needed
    let label = format!("git clone {}", url);
    let output = Command::new("git")
        .args(["clone", url, &target.to_string_lossy()])
        .output()
        .map_err(|e| Error::Tool {
            command: label.clone(),
            output: e.to_string(),
        })?;
    if !output.status.success() {
        return Err(Error::Tool {
            command: label,
            output: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }
    Ok(())
}

/// Recursively delete a repository directory.
///
/// A missing path is reported as [`Error::NotFound`] so callers can tell
/// "already gone" apart from a real failure.
pub fn delete_repository_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        return Err(Error::NotFound(format!("directory {}", path.display())));
    }
    fs::remove_dir_all(path).map_err(|e| Error::fs(path, e))
}

/// Variables substituted into scripts and yank templates.
#[derive(Debug, Clone)]
pub struct ScriptVars<'a> {
    pub repo_name: &'a str,
    pub branch: &'a str,
    pub worktree_path: &'a str,
    pub worktree_name: &'a str,
}

/// Substitute `${...}` variables, long and short forms, into `text`.
pub fn substitute_vars(text: &str, vars: &ScriptVars<'_>) -> String {
    text.replace("${repo_name}", vars.repo_name)
        .replace("${repo}", vars.repo_name)
        .replace("${branch_name}", vars.branch)
        .replace("${branch}", vars.branch)
        .replace("${worktree_path}", vars.worktree_path)
        .replace("${path}", vars.worktree_path)
        .replace("${worktree_name}", vars.worktree_name)
}

/// Run a post-create script with the worktree as its working directory.
///
/// Waits for the shell to exit; a non-zero exit surfaces the combined output.
/// Backgrounded (`&`) children keep running after the shell returns.
pub fn run_post_create_script(
    script: &str,
    vars: &ScriptVars<'_>,
    worktree_path: &Path,
) -> Result<()> {
    let expanded = substitute_vars(script, vars);
    let output = Command::new("sh")
        .arg("-c")
        .arg(&expanded)
        .current_dir(worktree_path)
        .output()
        .map_err(|e| Error::Tool {
            command: "post-create script".to_string(),
            output: e.to_string(),
        })?;
    if !output.status.success() {
        let mut combined = String::from_utf8_lossy(&output.stderr).trim().to_string();
        if combined.is_empty() {
            combined = String::from_utf8_lossy(&output.stdout).trim().to_string();
        }
        return Err(Error::Tool {
            command: "post-create script".to_string(),
            output: combined,
        });
    }
    Ok(())
}

/// Spawn the configured open script detached; the child is never awaited.
pub fn spawn_open_script(script: &str, vars: &ScriptVars<'_>, worktree_path: &Path) -> Result<()> {
    let expanded = substitute_vars(script, vars);
    Command::new("sh")
        .arg("-c")
        .arg(&expanded)
        .current_dir(worktree_path)
        .spawn()
        .map_err(|e| Error::Tool {
            command: "open script".to_string(),
            output: e.to_string(),
        })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_porcelain_blocks() {
        let out = "worktree /home/u/ws/demo\n\
                   HEAD 1111111111111111111111111111111111111111\n\
                   branch refs/heads/main\n\
                   \n\
                   worktree /home/u/ws/demo-feat-x\n\
                   HEAD 2222222222222222222222222222222222222222\n\
                   branch refs/heads/feat-x\n";
        let wts = parse_worktree_porcelain(out);
        assert_eq!(wts.len(), 2);
        assert_eq!(wts[0].name, "demo");
        assert_eq!(wts[0].branch, "main");
        assert_eq!(wts[0].path, PathBuf::from("/home/u/ws/demo"));
        assert_eq!(wts[1].name, "demo-feat-x");
        assert_eq!(wts[1].branch, "feat-x");
    }

    #[test]
    fn parses_detached_worktree() {
        let out = "worktree /home/u/ws/demo\n\
                   HEAD 1111111111111111111111111111111111111111\n\
                   detached\n";
        let wts = parse_worktree_porcelain(out);
        assert_eq!(wts.len(), 1);
        assert_eq!(wts[0].branch, DETACHED);
    }

    #[test]
    fn missing_branch_line_defaults_to_detached() {
        let out = "worktree /home/u/ws/demo\nHEAD 1111\n";
        let wts = parse_worktree_porcelain(out);
        assert_eq!(wts[0].branch, DETACHED);
    }

    #[test]
    fn parses_blocks_without_trailing_blank_line() {
        let out = "worktree /a/one\nbranch refs/heads/main\nworktree /a/two\nbranch refs/heads/x";
        let wts = parse_worktree_porcelain(out);
        assert_eq!(wts.len(), 2);
        assert_eq!(wts[1].name, "two");
        assert_eq!(wts[1].branch, "x");
    }

    #[test]
    fn empty_porcelain_yields_no_worktrees() {
        assert!(parse_worktree_porcelain("").is_empty());
    }

    #[test]
    fn branch_list_strips_remotes_and_head() {
        let out = "main\nfeat-x\norigin/HEAD\norigin/main\norigin/feat-y\n";
        let branches = normalize_branch_list(out);
        assert_eq!(branches, vec!["feat-x", "feat-y", "main"]);
    }

    #[test]
    fn branch_list_deduplicates() {
        let out = "main\norigin/main\nfeat\norigin/feat\n";
        let branches = normalize_branch_list(out);
        assert_eq!(branches, vec!["feat", "main"]);
    }

    #[test]
    fn substitutes_long_and_short_vars() {
        let vars = ScriptVars {
            repo_name: "demo",
            branch: "feat-x",
            worktree_path: "/ws/demo-feat-x",
            worktree_name: "demo-feat-x",
        };
        let s = substitute_vars(
            "cd ${worktree_path}; echo ${repo}:${branch_name} ${worktree_name} ${path}",
            &vars,
        );
        assert_eq!(
            s,
            "cd /ws/demo-feat-x; echo demo:feat-x demo-feat-x /ws/demo-feat-x"
        );
    }

    #[test]
    fn delete_repository_dir_distinguishes_missing_path() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("gone");
        assert!(matches!(
            delete_repository_dir(&missing),
            Err(Error::NotFound(_))
        ));

        let present = dir.path().join("repo");
        std::fs::create_dir_all(present.join("sub")).unwrap();
        std::fs::write(present.join("sub").join("f"), "x").unwrap();
        delete_repository_dir(&present).unwrap();
        assert!(!present.exists());
    }
}
