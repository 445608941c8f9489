//! Utility functions for capsule migrations

use anyhow::{anyhow, Result};
use capsule_parser::CapsuleParser;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

/// Ensure a directory exists, creating it if necessary
pub fn ensure_directory(path: &Path) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)?;
    } else if !path.is_dir() {
        return Err(anyhow!("Path exists but is not a directory: {:?}", path));
    }
    Ok(())
}

/// Get the XDG config directory for capsule-migrate
pub fn get_config_dir() -> Result<PathBuf> {
    let config_dir = dirs::config_dir()
        .ok_or_else(|| anyhow!("Could not determine config directory"))?
        .join("capsule-migrate");

    Ok(config_dir)
}

/// Immediate subdirectories of `dir` that hold at least one eligible source
///
/// Sorted by path so batch order is stable across runs.
pub fn discover_capsule_dirs(dir: &Path, parser: &CapsuleParser) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(anyhow!("Capsule root is not a directory: {:?}", dir));
    }

    let excluded = &parser.config().exclude_dirs;
    let mut capsules = Vec::new();
    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_dir())
    {
        let name = entry.file_name().to_string_lossy();
        if name.starts_with('.') || excluded.iter().any(|d| *d == name) {
            continue;
        }
        match parser.discover_sources(entry.path()) {
            Ok(sources) if !sources.is_empty() => capsules.push(entry.path().to_path_buf()),
            Ok(_) => debug!("Skipping {:?}: no TypeScript sources", entry.path()),
            Err(e) => debug!("Skipping {:?}: {}", entry.path(), e),
        }
    }

    Ok(capsules)
}

/// Render hours with a unit suited to their size
pub fn format_hours(hours: f64) -> String {
    let seconds = hours * 3600.0;
    if seconds < 60.0 {
        format!("{seconds:.1}s")
    } else if seconds < 3600.0 {
        format!("{:.1}m", seconds / 60.0)
    } else {
        format!("{hours:.2}h")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use capsule_parser::ParserConfig;
    use rstest::rstest;
    use tempfile::TempDir;

    #[test]
    fn test_ensure_directory() {
        let temp_dir = TempDir::new().unwrap();
        let nested = temp_dir.path().join("a/b");
        ensure_directory(&nested).unwrap();
        assert!(nested.is_dir());

        let file = temp_dir.path().join("file");
        fs::write(&file, "x").unwrap();
        assert!(ensure_directory(&file).is_err());
    }

    #[test]
    fn test_discover_capsule_dirs() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        for (dir, file) in [
            ("cache", "index.ts"),
            ("analytics", "src/tracker.ts"),
            ("docs-only", "README.md"),
            ("node_modules", "index.ts"),
            (".hidden", "index.ts"),
            ("typings", "index.d.ts"),
        ] {
            let path = root.join(dir).join(file);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, "export const x = 1;\n").unwrap();
        }
        fs::write(root.join("loose.ts"), "export const y = 2;\n").unwrap();

        let parser = CapsuleParser::new(ParserConfig::default());
        let capsules = discover_capsule_dirs(root, &parser).unwrap();

        assert_eq!(capsules, vec![root.join("analytics"), root.join("cache")]);
    }

    #[rstest]
    #[case(0.001, "3.6s")]
    #[case(0.25, "15.0m")]
    #[case(1.5, "1.50h")]
    fn test_format_hours(#[case] hours: f64, #[case] expected: &str) {
        assert_eq!(format_hours(hours), expected);
    }
}
