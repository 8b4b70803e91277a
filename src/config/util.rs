//! Configuration utility functions.

use std::path::{Path, PathBuf};

/// Find config file by searching upward from `start`
///
/// Walks up parent directories until finding `config_name`.
/// Returns the path to the config file if found.
///
/// # Example
/// ```text
/// /home/user/app/assets/javascripts/  ← start
/// /home/user/app/finalizer.toml       ← found!
/// ```
pub fn find_config_file(config_name: &Path, start: &Path) -> Option<PathBuf> {
    // Absolute path: no search
    if config_name.is_absolute() {
        return config_name.exists().then(|| config_name.to_path_buf());
    }

    let mut current = start;
    loop {
        let candidate = current.join(config_name);
        if candidate.exists() {
            return Some(candidate);
        }

        // Move to parent directory
        match current.parent() {
            Some(parent) => current = parent,
            None => return None, // Reached filesystem root
        }
    }
}

/// Make `path` absolute, resolving relative paths against `root`.
pub fn normalize_path(path: &Path, root: &Path) -> PathBuf {
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        root.join(path)
    };
    joined.canonicalize().unwrap_or(joined)
}

// ============================================================================
// tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_find_config_walks_up() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("app/assets/javascripts");
        fs::create_dir_all(&nested).unwrap();
        fs::write(dir.path().join("finalizer.toml"), "").unwrap();

        let found = find_config_file(Path::new("finalizer.toml"), &nested).unwrap();
        assert_eq!(found, dir.path().join("finalizer.toml"));
    }

    #[test]
    fn test_find_config_absolute() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("custom.toml");
        assert_eq!(find_config_file(&path, dir.path()), None);

        fs::write(&path, "").unwrap();
        assert_eq!(find_config_file(&path, Path::new("/")), Some(path));
    }

    #[test]
    fn test_normalize_path() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().canonicalize().unwrap();
        fs::create_dir(root.join("public")).unwrap();

        assert_eq!(normalize_path(Path::new("public"), &root), root.join("public"));
        // Missing paths are joined but not canonicalized
        assert_eq!(normalize_path(Path::new("missing"), &root), root.join("missing"));
        assert_eq!(normalize_path(&root, Path::new("/elsewhere")), root);
    }
}
