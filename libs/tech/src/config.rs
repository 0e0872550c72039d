//! Configuration of technology lookup.

use std::env;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use arcstr::ArcStr;
use serde::Deserialize;

/// The environment variable listing additional resource directories.
pub const RESOURCE_PATH_ENV: &str = "TECH_RESOURCE_PATH";

/// The extension of definition documents in resource directories.
pub const DEFINITION_EXTENSION: &str = "toml";

/// Where technologies are looked up and how they are set up.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TechConfig {
    /// Directories searched, in order, for `<name>.toml` definitions.
    pub resource_dirs: Vec<PathBuf>,
    /// The foundry requested for every technology that supports it.
    pub foundry: Option<ArcStr>,
}

impl Default for TechConfig {
    fn default() -> Self {
        Self {
            resource_dirs: vec![PathBuf::from(concat!(
                env!("CARGO_MANIFEST_DIR"),
                "/resources"
            ))],
            foundry: None,
        }
    }
}

impl TechConfig {
    /// A configuration with no resource directories.
    pub fn empty() -> Self {
        Self {
            resource_dirs: Vec::new(),
            foundry: None,
        }
    }

    /// Parses a configuration from TOML.
    ///
    /// Omitted fields take their default values.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).with_context(|| "failed to parse technology configuration")
    }

    /// Reads a configuration from a TOML file.
    ///
    /// Relative resource directories are resolved against the directory
    /// containing the file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read `{}`", path.display()))?;
        let mut config = Self::from_toml_str(&text)
            .with_context(|| format!("failed to load `{}`", path.display()))?;
        if let Some(base) = path.parent() {
            for dir in config.resource_dirs.iter_mut() {
                if dir.is_relative() {
                    *dir = base.join(&*dir);
                }
            }
        }
        Ok(config)
    }

    /// Prepends the directories listed in [`RESOURCE_PATH_ENV`].
    pub fn with_env(self) -> Self {
        match env::var_os(RESOURCE_PATH_ENV) {
            Some(value) => self.with_env_value(&value),
            None => self,
        }
    }

    /// Prepends the directories listed in `value`, separated by the
    /// platform path separator.
    pub fn with_env_value(mut self, value: impl AsRef<std::ffi::OsStr>) -> Self {
        let mut dirs: Vec<PathBuf> = env::split_paths(value.as_ref())
            .filter(|dir| !dir.as_os_str().is_empty())
            .collect();
        dirs.append(&mut self.resource_dirs);
        self.resource_dirs = dirs;
        self
    }

    /// Sets the requested foundry.
    pub fn with_foundry(mut self, foundry: impl Into<ArcStr>) -> Self {
        self.foundry = Some(foundry.into());
        self
    }

    /// Finds the definition of technology `name` in the resource directories.
    pub fn find_resource(&self, name: &str) -> Option<PathBuf> {
        self.resource_dirs
            .iter()
            .map(|dir| dir.join(name).with_extension(DEFINITION_EXTENSION))
            .find(|path| path.is_file())
    }
}
