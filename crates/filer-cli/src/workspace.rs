use std::path::{Path, PathBuf};

/// Resolve the directory template paths are relative to.
///
/// `--workspace` / `GITHUB_WORKSPACE` wins when non-empty; otherwise the
/// current directory.
pub fn resolve_workspace(explicit: Option<&Path>) -> PathBuf {
    match explicit {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn explicit_workspace_wins() {
        let dir = TempDir::new().unwrap();
        assert_eq!(resolve_workspace(Some(dir.path())), dir.path());
    }

    #[test]
    fn empty_workspace_falls_back_to_cwd() {
        let cwd = std::env::current_dir().unwrap();
        assert_eq!(resolve_workspace(Some(Path::new(""))), cwd);
        assert_eq!(resolve_workspace(None), cwd);
    }
}
