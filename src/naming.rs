//! Name sanitization for directory names and storage keys.
//!
//! Repository and branch names are user-chosen free text; everywhere they end
//! up on disk (worktree directories, clone targets, notes/scripts storage)
//! they pass through [`sanitize`] first.

/// Fallback token for names that sanitize to nothing.
const UNNAMED: &str = "unnamed";

/// Separator between the repo and worktree halves of a note key.
const KEY_SEPARATOR: &str = "__";

/// Reduce a free-form name to a safe `[a-z0-9-]` segment.
///
/// Every run of characters outside `[A-Za-z0-9-]` collapses to a single `-`,
/// leading/trailing/doubled dashes are removed, and the result is lowercased.
/// An empty result becomes `"unnamed"`. Idempotent.
pub fn sanitize(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut pending_dash = false;
    for ch in raw.chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_dash && !out.is_empty() {
                out.push('-');
            }
            pending_dash = false;
            out.push(ch.to_ascii_lowercase());
        } else {
            // '-' and every other non-alphanumeric char merge into one dash
            pending_dash = true;
        }
    }
    if out.is_empty() {
        return UNNAMED.to_string();
    }
    out
}

/// Directory name for a worktree: `<repo>-<branch>`, both halves sanitized.
pub fn worktree_dir_name(repo_name: &str, branch: &str) -> String {
    format!("{}-{}", sanitize(repo_name), sanitize(branch))
}

/// Storage key for a worktree note.
pub fn note_key(repo_name: &str, worktree_name: &str) -> String {
    format!(
        "{}{}{}",
        sanitize(repo_name),
        KEY_SEPARATOR,
        sanitize(worktree_name)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collapses_runs_and_lowercases() {
        assert_eq!(sanitize("My Repo"), "my-repo");
        assert_eq!(sanitize("feature/new-thing"), "feature-new-thing");
        assert_eq!(sanitize("a   b///c"), "a-b-c");
        assert_eq!(sanitize("UPPER_case.123"), "upper-case-123");
    }

    #[test]
    fn strips_leading_and_trailing_dashes() {
        assert_eq!(sanitize("--hello--"), "hello");
        assert_eq!(sanitize("/leading/slash"), "leading-slash");
        assert_eq!(sanitize("trailing."), "trailing");
    }

    #[test]
    fn empty_input_falls_back() {
        assert_eq!(sanitize(""), "unnamed");
        assert_eq!(sanitize("///"), "unnamed");
        assert_eq!(sanitize("  "), "unnamed");
    }

    #[test]
    fn is_idempotent() {
        for s in ["My Repo", "feature/x", "--a--b--", "", "ümlaut über"] {
            let once = sanitize(s);
            assert_eq!(sanitize(&once), once);
        }
    }

    #[test]
    fn output_alphabet_is_restricted() {
        let out = sanitize("Weird!@#$%^&*() Name~`");
        assert!(out
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-'));
        assert!(!out.starts_with('-'));
        assert!(!out.ends_with('-'));
        assert!(!out.contains("--"));
    }

    #[test]
    fn worktree_dir_name_joins_sanitized_halves() {
        assert_eq!(
            worktree_dir_name("My Repo", "feature/new-thing"),
            "my-repo-feature-new-thing"
        );
    }

    #[test]
    fn note_key_uses_double_underscore() {
        assert_eq!(note_key("My Repo", "my-repo-feat"), "my-repo__my-repo-feat");
    }
}
