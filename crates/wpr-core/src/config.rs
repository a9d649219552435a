use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Component, Path, PathBuf};

use crate::error::StoreError;

/// Directory under the user's home that holds week files by default.
pub const DEFAULT_STORE_DIR: &str = ".wpr";

/// Where a weekly store lives: the root directory and an optional group
/// subdirectory. Passed explicitly to every store constructor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub root: PathBuf,
    pub group: Option<String>,
}

impl StoreConfig {
    /// Configuration for the default (ungrouped) namespace under `root`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            group: None,
        }
    }

    /// Select a group namespace.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidGroup`] unless `group` is a single plain
    /// path component (no separators, not `.` or `..`).
    pub fn with_group(mut self, group: impl Into<String>) -> Result<Self, StoreError> {
        let group = group.into();
        validate_group(&group)?;
        self.group = Some(group);
        Ok(self)
    }

    /// `<home>/.wpr`, or `None` when the home directory is unknown.
    #[must_use]
    pub fn default_root() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(DEFAULT_STORE_DIR))
    }

    /// Directory containing this configuration's week files.
    #[must_use]
    pub fn week_dir(&self) -> PathBuf {
        match &self.group {
            Some(group) => self.root.join(group),
            None => self.root.clone(),
        }
    }

    /// Create the store root if it does not exist yet. Idempotent.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] if the directory cannot be created.
    pub fn ensure_root(&self) -> Result<(), StoreError> {
        fs::create_dir_all(&self.root)?;
        Ok(())
    }
}

fn validate_group(group: &str) -> Result<(), StoreError> {
    let mut components = Path::new(group).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(name)), None) if name == group => Ok(()),
        _ => Err(StoreError::InvalidGroup(group.to_string())),
    }
}

/// Optional per-user settings read from `<config_dir>/wpr/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct UserConfig {
    #[serde(default)]
    pub store_root: Option<PathBuf>,
    #[serde(default)]
    pub group: Option<String>,
    #[serde(default)]
    pub verbose: bool,
    #[serde(default)]
    pub output: Option<String>,
}

/// Location of the user config file, if the platform has a config dir.
#[must_use]
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("wpr").join("config.toml"))
}

/// Load the user config from its platform location.
///
/// # Errors
///
/// Returns [`StoreError::Config`] when the file exists but cannot be read
/// or parsed.
pub fn load_user_config() -> Result<UserConfig, StoreError> {
    match user_config_path() {
        Some(path) => load_config_file(&path),
        None => Ok(UserConfig::default()),
    }
}

/// Load a config file, returning defaults when it does not exist.
///
/// # Errors
///
/// Returns [`StoreError::Config`] when the file exists but cannot be read
/// or parsed.
pub fn load_config_file(path: &Path) -> Result<UserConfig, StoreError> {
    if !path.exists() {
        return Ok(UserConfig::default());
    }

    let content = fs::read_to_string(path).map_err(|err| StoreError::Config {
        path: path.to_path_buf(),
        reason: err.to_string(),
    })?;

    toml::from_str::<UserConfig>(&content).map_err(|err| StoreError::Config {
        path: path.to_path_buf(),
        reason: err.to_string(),
    })
}

/// Pick the store root: explicit flag, then `WPR_STORE`, then the user
/// config, then `<home>/.wpr`.
#[must_use]
pub fn resolve_store_root(
    flag: Option<&Path>,
    env_store: Option<&str>,
    user: &UserConfig,
) -> Option<PathBuf> {
    if let Some(path) = flag {
        return Some(path.to_path_buf());
    }
    if let Some(path) = env_store.filter(|value| !value.trim().is_empty()) {
        return Some(PathBuf::from(path));
    }
    if let Some(path) = &user.store_root {
        return Some(path.clone());
    }
    StoreConfig::default_root()
}
