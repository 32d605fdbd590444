//! Where user presets live on disk.
//!
//! The presets directory is `$TAPEWARM_PRESET_DIR` when that is set and
//! non-empty, otherwise the platform config directory:
//!
//! - Linux: `~/.config/tapewarm/presets/`
//! - macOS: `~/Library/Application Support/tapewarm/presets/`
//! - Windows: `%APPDATA%\tapewarm\presets\`

use std::path::{Path, PathBuf};

use crate::{ConfigError, TapePreset, find_factory_preset};

/// Environment variable overriding the presets directory.
pub const PRESET_DIR_ENV: &str = "TAPEWARM_PRESET_DIR";

const APP_NAME: &str = "tapewarm";

const PRESETS_SUBDIR: &str = "presets";

/// Returns the user presets directory.
///
/// Falls back to `./tapewarm/presets` if the config directory cannot be
/// determined.
pub fn user_presets_dir() -> PathBuf {
    match std::env::var_os(PRESET_DIR_ENV) {
        Some(dir) if !dir.is_empty() => PathBuf::from(dir),
        _ => dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_NAME)
            .join(PRESETS_SUBDIR),
    }
}

/// Ensure the user presets directory exists.
pub fn ensure_user_presets_dir() -> Result<PathBuf, ConfigError> {
    let dir = user_presets_dir();
    if !dir.exists() {
        std::fs::create_dir_all(&dir).map_err(|e| ConfigError::create_dir(&dir, e))?;
    }
    Ok(dir)
}

/// Find a preset file by path or name.
///
/// `name` is tried as a path first, then as a file in `dir` with `.toml`
/// appended if missing.
pub fn find_preset_in(dir: &Path, name: &str) -> Option<PathBuf> {
    let path = PathBuf::from(name);
    if path.is_file() {
        return Some(path);
    }

    let filename = if name.ends_with(".toml") {
        name.to_string()
    } else {
        format!("{name}.toml")
    };
    let candidate = dir.join(filename);
    candidate.is_file().then_some(candidate)
}

/// [`find_preset_in`] the user presets directory.
pub fn find_preset(name: &str) -> Option<PathBuf> {
    find_preset_in(&user_presets_dir(), name)
}

/// Resolves `name` to a preset: a file path or user preset first, then the
/// factory presets.
pub fn resolve_preset(name: &str) -> Result<TapePreset, ConfigError> {
    resolve_preset_in(&user_presets_dir(), name)
}

/// [`resolve_preset`] against an explicit presets directory.
pub fn resolve_preset_in(dir: &Path, name: &str) -> Result<TapePreset, ConfigError> {
    if let Some(path) = find_preset_in(dir, name) {
        return TapePreset::load(path);
    }
    find_factory_preset(name).ok_or_else(|| ConfigError::PresetNotFound(name.to_string()))
}

/// Preset files (`*.toml`) in `dir`, sorted by path.
///
/// Returns an empty vector if the directory doesn't exist or can't be read.
pub fn list_presets_in(dir: &Path) -> Vec<PathBuf> {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return Vec::new();
    };

    let mut presets: Vec<PathBuf> = entries
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && path.extension().is_some_and(|ext| ext == "toml"))
        .collect();
    presets.sort();
    presets
}

/// [`list_presets_in`] the user presets directory.
pub fn list_user_presets() -> Vec<PathBuf> {
    list_presets_in(&user_presets_dir())
}

/// Get the preset name from a file path.
///
/// ```rust
/// use tapewarm_config::paths::preset_name_from_path;
/// use std::path::Path;
///
/// let name = preset_name_from_path(Path::new("/path/to/night_drive.toml"));
/// assert_eq!(name.as_deref(), Some("night_drive"));
/// ```
pub fn preset_name_from_path(path: &Path) -> Option<String> {
    path.file_stem()
        .and_then(|s| s.to_str())
        .map(ToString::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_find_preset_in_dir() {
        let dir = TempDir::new().unwrap();
        TapePreset::new("Mine").save(dir.path().join("mine.toml")).unwrap();

        assert_eq!(
            find_preset_in(dir.path(), "mine"),
            Some(dir.path().join("mine.toml"))
        );
        assert_eq!(
            find_preset_in(dir.path(), "mine.toml"),
            Some(dir.path().join("mine.toml"))
        );
        assert!(find_preset_in(dir.path(), "theirs").is_none());
    }

    #[test]
    fn test_find_preset_by_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("elsewhere.toml");
        TapePreset::new("Elsewhere").save(&path).unwrap();

        let other = TempDir::new().unwrap();
        let found = find_preset_in(other.path(), path.to_str().unwrap());
        assert_eq!(found, Some(path));
    }

    #[test]
    fn test_resolve_prefers_files_over_factory() {
        let dir = TempDir::new().unwrap();
        let shadow = TapePreset::new("My Default").with_description("user copy");
        shadow.save(dir.path().join("default.toml")).unwrap();

        assert_eq!(resolve_preset_in(dir.path(), "default").unwrap(), shadow);
        assert_eq!(
            resolve_preset_in(dir.path(), "Warm Ferric").unwrap().name,
            "Warm Ferric"
        );
        assert!(matches!(
            resolve_preset_in(dir.path(), "nothing"),
            Err(ConfigError::PresetNotFound(_))
        ));
    }

    #[test]
    fn test_resolve_reports_broken_file() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("broken.toml"), "name = ").unwrap();
        assert!(matches!(
            resolve_preset_in(dir.path(), "broken"),
            Err(ConfigError::TomlParse(_))
        ));
    }

    #[test]
    fn test_list_presets_in() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("b.toml"), "name = \"B\"").unwrap();
        fs::write(dir.path().join("a.toml"), "name = \"A\"").unwrap();
        fs::write(dir.path().join("notes.txt"), "not a preset").unwrap();
        fs::create_dir(dir.path().join("sub.toml")).unwrap();

        let listed = list_presets_in(dir.path());
        assert_eq!(
            listed,
            vec![dir.path().join("a.toml"), dir.path().join("b.toml")]
        );
        assert!(list_presets_in(&dir.path().join("missing")).is_empty());
    }

    #[test]
    fn test_user_presets_dir_ends_with_app_path() {
        // Only meaningful when the override is unset in the test environment.
        if std::env::var_os(PRESET_DIR_ENV).is_none() {
            assert!(user_presets_dir().ends_with("tapewarm/presets"));
        }
    }
}
