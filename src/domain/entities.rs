//! Domain entities: core data structures

use std::path::PathBuf;

/// A request to clone `remote` into a local directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CloneRequest {
    pub remote: String,
    /// Explicit destination; derived from `remote` when absent.
    pub local_path: Option<PathBuf>,
    pub bare: bool,
    pub checkout: bool,
    pub branch: Option<String>,
}

impl CloneRequest {
    pub fn new(remote: impl Into<String>) -> Self {
        Self {
            remote: remote.into(),
            local_path: None,
            bare: false,
            checkout: true,
            branch: None,
        }
    }

    /// The directory the clone lands in.
    pub fn destination(&self) -> PathBuf {
        self.local_path
            .clone()
            .unwrap_or_else(|| PathBuf::from(compute_local_path(&self.remote)))
    }
}

/// Derive a destination directory name from a repository path or URL: the
/// last segment after `/` (or, failing that, `\`), ignoring trailing
/// separators.
pub fn compute_local_path(remote: &str) -> String {
    let trimmed = remote.trim_end_matches(['/', '\\']);
    let trimmed = if trimmed.is_empty() { remote } else { trimmed };

    let segment = match trimmed.rfind('/').or_else(|| trimmed.rfind('\\')) {
        Some(pos) => &trimmed[pos + 1..],
        None => trimmed,
    };
    segment.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::rstest;

    #[rstest]
    #[case("a/b/repo.git", "repo.git")]
    #[case("repo", "repo")]
    #[case("https://example/repo.git", "repo.git")]
    #[case(r"C:\src\project", "project")]
    #[case("a/b/", "b")]
    #[case("host:path/repo", "repo")]
    fn given_remote_when_compute_local_path_then_takes_last_segment(
        #[case] remote: &str,
        #[case] expected: &str,
    ) {
        assert_eq!(compute_local_path(remote), expected);
    }

    #[test]
    fn given_explicit_local_path_when_destination_then_uses_it() {
        let mut request = CloneRequest::new("https://example/repo.git");
        request.local_path = Some(PathBuf::from("elsewhere"));

        assert_eq!(request.destination(), PathBuf::from("elsewhere"));
    }

    #[test]
    fn given_no_local_path_when_destination_then_derived_from_remote() {
        let request = CloneRequest::new("https://example/repo.git");

        assert_eq!(request.destination(), PathBuf::from("repo.git"));
    }
}
