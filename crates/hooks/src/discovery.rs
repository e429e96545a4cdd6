//! Hook script discovery

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// An executable script found in a hook point directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HookScript {
    /// Full path to the script
    pub path: PathBuf,
    /// File name, used in logs and error messages
    pub name: String,
}

impl HookScript {
    fn from_path(path: PathBuf) -> Self {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self { path, name }
    }
}

/// List the executable scripts in `dir`, sorted by file name
///
/// A missing directory yields an empty list. Subdirectories, non-executable
/// files and unreadable entries are skipped. Symlinks are followed, so a
/// link to an executable script counts as a script.
pub fn discover(dir: &Path) -> Vec<HookScript> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            tracing::debug!("No hook directory at {}", dir.display());
            return Vec::new();
        }
        Err(e) => {
            tracing::warn!("Failed to read hook directory {}: {}", dir.display(), e);
            return Vec::new();
        }
    };

    let mut scripts: Vec<HookScript> = entries
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry.path()),
            Err(e) => {
                tracing::debug!("Skipping unreadable entry in {}: {}", dir.display(), e);
                None
            }
        })
        .filter(|path| is_executable_file(path))
        .map(HookScript::from_path)
        .collect();

    // Byte-wise order of the file name, so 01-, 02-, ... run in sequence
    scripts.sort_by(|a, b| a.path.file_name().cmp(&b.path.file_name()));

    tracing::debug!("Found {} hook script(s) in {}", scripts.len(), dir.display());
    scripts
}

#[cfg(unix)]
fn is_executable_file(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;

    match fs::metadata(path) {
        Ok(meta) => meta.is_file() && meta.permissions().mode() & 0o111 != 0,
        Err(_) => false,
    }
}

#[cfg(not(unix))]
fn is_executable_file(path: &Path) -> bool {
    fs::metadata(path).is_ok_and(|meta| meta.is_file())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::panic)]
    use super::*;
    use tempfile::TempDir;

    #[cfg(unix)]
    fn write_script(dir: &Path, name: &str, mode: u32) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;

        let path = dir.join(name);
        fs::write(&path, "#!/bin/sh\nexit 0\n").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(mode)).unwrap();
        path
    }

    #[test]
    fn test_missing_directory_is_empty() {
        let temp = TempDir::new().unwrap();
        assert!(discover(&temp.path().join("nope")).is_empty());
    }

    #[test]
    fn test_empty_directory_is_empty() {
        let temp = TempDir::new().unwrap();
        assert!(discover(temp.path()).is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn test_sorted_by_file_name() {
        let temp = TempDir::new().unwrap();
        for name in ["20-b.sh", "10-a.sh", "03-c.sh", "B.sh", "a.sh"] {
            write_script(temp.path(), name, 0o755);
        }

        let names: Vec<_> = discover(temp.path()).into_iter().map(|s| s.name).collect();
        assert_eq!(names, ["03-c.sh", "10-a.sh", "20-b.sh", "B.sh", "a.sh"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_skips_non_executables_and_directories() {
        let temp = TempDir::new().unwrap();
        write_script(temp.path(), "01-run.sh", 0o755);
        write_script(temp.path(), "02-plain.txt", 0o644);
        write_script(temp.path(), "03-owner-only.sh", 0o700);
        fs::create_dir(temp.path().join("04-subdir")).unwrap();

        let scripts = discover(temp.path());
        let names: Vec<_> = scripts.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["01-run.sh", "03-owner-only.sh"]);
        assert_eq!(scripts[0].path, temp.path().join("01-run.sh"));
    }

    #[cfg(unix)]
    #[test]
    fn test_follows_symlinks() {
        let temp = TempDir::new().unwrap();
        let target = write_script(temp.path(), "real.sh", 0o755);
        let hooks = temp.path().join("hooks");
        fs::create_dir(&hooks).unwrap();
        std::os::unix::fs::symlink(&target, hooks.join("01-link.sh")).unwrap();
        std::os::unix::fs::symlink(temp.path().join("gone"), hooks.join("02-dangling")).unwrap();

        let names: Vec<_> = discover(&hooks).into_iter().map(|s| s.name).collect();
        assert_eq!(names, ["01-link.sh"]);
    }
}
