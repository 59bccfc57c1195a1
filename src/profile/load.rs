//! Locating and parsing profile documents.
use super::types::ProfileDocument;
use crate::config::Configuration;
use crate::error::{ComposeError, ProfileResolutionError};
use std::fs;
use std::path::{Path, PathBuf};

pub const PROFILE_OPTION: &str = "profile";
pub const PROFILE_DIR_OPTION: &str = "profile-dir";
pub const PROFILE_NAME_OPTION: &str = "profile-name";

const DEFAULT_PROFILE_DIR: &str = "profiles";
const PROFILE_EXTENSION: &str = "json";

/// Where the profile document comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProfileSource {
    /// JSON embedded directly in the `profile` option.
    Inline(String),
    /// Explicit path to a document.
    File(PathBuf),
    /// A profile name looked up as `<dir>/<name>.json`.
    Named { dir: PathBuf, name: String },
}

impl ProfileSource {
    /// Interpret the `profile` option, or `None` when it is absent.
    ///
    /// A present but blank value is an error rather than "no profile".
    pub fn from_config(
        config: &Configuration,
    ) -> Result<Option<Self>, ProfileResolutionError> {
        let Some(raw) = config.get(PROFILE_OPTION).map(str::trim) else {
            return Ok(None);
        };
        if raw.is_empty() {
            return Err(ProfileResolutionError::BlankSource);
        }
        if raw.starts_with('{') {
            return Ok(Some(ProfileSource::Inline(raw.to_string())));
        }
        let path = Path::new(raw);
        if path.is_file() {
            return Ok(Some(ProfileSource::File(path.to_path_buf())));
        }
        let dir = config.get_string(PROFILE_DIR_OPTION, DEFAULT_PROFILE_DIR);
        Ok(Some(ProfileSource::Named {
            dir: PathBuf::from(dir),
            name: raw.to_string(),
        }))
    }

    pub fn origin(&self) -> String {
        match self {
            ProfileSource::Inline(_) => "inline profile".to_string(),
            ProfileSource::File(path) => path.display().to_string(),
            ProfileSource::Named { dir, name } => named_path(dir, name).display().to_string(),
        }
    }

    /// Read and parse the document. The source is read whole, so no handle
    /// outlives this call.
    pub fn load(&self) -> Result<ProfileDocument, ComposeError> {
        let text = match self {
            ProfileSource::Inline(text) => text.clone(),
            ProfileSource::File(path) => read_document(path)?,
            ProfileSource::Named { dir, name } => read_document(&named_path(dir, name))?,
        };
        let document = serde_json::from_str(&text).map_err(|source| {
            ProfileResolutionError::Parse {
                origin: self.origin(),
                source,
            }
        })?;
        Ok(document)
    }

    /// Pick the profile to expand.
    ///
    /// An explicit `profile-name` wins, then the looked-up name, then the
    /// document's `entry`, then the document's only profile.
    pub fn entry_name(
        &self,
        config: &Configuration,
        document: &ProfileDocument,
    ) -> Result<String, ComposeError> {
        if let Some(name) = config
            .get(PROFILE_NAME_OPTION)
            .map(str::trim)
            .filter(|name| !name.is_empty())
        {
            return Ok(name.to_string());
        }
        if let ProfileSource::Named { name, .. } = self {
            return Ok(name.clone());
        }
        if let Some(entry) = document.entry.as_deref() {
            return Ok(entry.to_string());
        }
        let mut names = document.profiles.keys();
        match (names.next(), names.next()) {
            (Some(only), None) => Ok(only.clone()),
            _ => Err(ProfileResolutionError::NoEntry {
                origin: self.origin(),
            }
            .into()),
        }
    }
}

fn named_path(dir: &Path, name: &str) -> PathBuf {
    dir.join(format!("{name}.{PROFILE_EXTENSION}"))
}

fn read_document(path: &Path) -> Result<String, ProfileResolutionError> {
    fs::read_to_string(path).map_err(|source| ProfileResolutionError::Read {
        path: path.to_path_buf(),
        source,
    })
}
