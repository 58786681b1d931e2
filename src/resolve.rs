//! Path resolution for drivekit config and credential files.
//!
//! Resolution order for the config file:
//!   1. .drivekit.toml in cwd (developer workflow)
//!   2. DRIVEKIT_CONFIG environment variable
//!   3. {user_config_dir}/drivekit/drivekit.toml

use std::path::{Path, PathBuf};

/// Return the config file path. The file may not exist yet.
pub fn config_path() -> PathBuf {
    let local = PathBuf::from(".drivekit.toml");
    if local.is_file() {
        return local;
    }
    if let Ok(env) = std::env::var("DRIVEKIT_CONFIG") {
        if !env.is_empty() {
            return expand_tilde(&env);
        }
    }
    app_config_dir().join("drivekit.toml")
}

/// Return the OS-native drivekit config directory.
pub fn app_config_dir() -> PathBuf {
    if let Some(proj_dirs) = directories::ProjectDirs::from("", "", "drivekit") {
        proj_dirs.config_dir().to_path_buf()
    } else {
        home_dir().join(".config").join("drivekit")
    }
}

/// Directory that relative credential/token paths resolve against:
/// the directory holding the config file, or cwd when it has no parent.
pub fn base_dir(config_path: &Path) -> PathBuf {
    match config_path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// Resolve a possibly-relative path from the config against the base dir.
pub fn resolve_in(base: &Path, value: &str) -> PathBuf {
    let expanded = expand_tilde(value);
    if expanded.is_absolute() {
        expanded
    } else {
        base.join(expanded)
    }
}

/// Get the user's home directory.
pub fn home_dir() -> PathBuf {
    std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Expand ~ to home directory.
pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        home_dir().join(rest)
    } else if path == "~" {
        home_dir()
    } else {
        PathBuf::from(path)
    }
}
