//! Collision-free output file naming.

use std::path::{Path, PathBuf};

/// Returns the first unused output path for `base_name` in `directory`.
///
/// Tries `{base_name}.{extension}`, then `{base_name}_1.{extension}`,
/// `{base_name}_2.{extension}` and so on. Pass the normalised extension
/// (see [`crate::codec::Encoding::extension`]).
///
/// The check is not atomic with the later write: two callers resolving the
/// same `(directory, base_name, extension)` at the same moment can both be
/// handed the same path, and the second writer overwrites the first. In a
/// batch this needs two inputs whose names differ only by extension.
pub fn resolve_output_path(directory: &Path, base_name: &str, extension: &str) -> PathBuf {
    let candidate = directory.join(format!("{}.{}", base_name, extension));
    if !candidate.exists() {
        return candidate;
    }

    (1u64..)
        .map(|idx| directory.join(format!("{}_{}.{}", base_name, idx, extension)))
        .find(|path| !path.exists())
        .unwrap_or(candidate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_free_name_is_used_directly() {
        let dir = TempDir::new().unwrap();
        let path = resolve_output_path(dir.path(), "song", "wav");
        assert_eq!(path, dir.path().join("song.wav"));
    }

    #[test]
    fn test_taken_names_get_increasing_suffix() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.wav"), b"x").unwrap();

        let first = resolve_output_path(dir.path(), "a", "wav");
        assert_eq!(first, dir.path().join("a_1.wav"));

        fs::write(&first, b"x").unwrap();
        let second = resolve_output_path(dir.path(), "a", "wav");
        assert_eq!(second, dir.path().join("a_2.wav"));
    }

    #[test]
    fn test_gaps_are_filled_first() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.mp3"), b"x").unwrap();
        fs::write(dir.path().join("a_2.mp3"), b"x").unwrap();

        let path = resolve_output_path(dir.path(), "a", "mp3");
        assert_eq!(path, dir.path().join("a_1.mp3"));
    }

    #[test]
    fn test_extensions_do_not_collide() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.wav"), b"x").unwrap();

        let path = resolve_output_path(dir.path(), "a", "aiff");
        assert_eq!(path, dir.path().join("a.aiff"));
    }

    #[test]
    fn test_never_returns_existing_path() {
        let dir = TempDir::new().unwrap();
        for _ in 0..5 {
            let path = resolve_output_path(dir.path(), "take", "wav");
            assert!(!path.exists());
            fs::write(&path, b"x").unwrap();
        }
        assert!(dir.path().join("take_4.wav").exists());
    }
}
