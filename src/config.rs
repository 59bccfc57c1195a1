//! Flat key-value configuration shared by every compose stage.
//!
//! Values are stored as strings and parsed on demand. Absent keys fall back to
//! the caller's default; explicit values that fail to parse are errors.
use crate::error::ConfigurationError;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Immutable option map handed to every stage of one composition.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Configuration {
    values: BTreeMap<String, String>,
}

impl Configuration {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return a copy with `key` set to `value`.
    pub fn with(&self, key: impl Into<String>, value: impl ToString) -> Self {
        let mut values = self.values.clone();
        values.insert(key.into(), value.to_string());
        Self { values }
    }

    /// Parse a flat JSON object into a configuration.
    ///
    /// Strings are kept verbatim, numbers and booleans are stringified.
    pub fn from_json_slice(bytes: &[u8]) -> Result<Self, ConfigurationError> {
        let raw: Value = serde_json::from_slice(bytes)
            .map_err(|err| ConfigurationError::Invalid(format!("parse configuration JSON: {err}")))?;
        let Value::Object(map) = raw else {
            return Err(ConfigurationError::Invalid(
                "configuration JSON must be an object".to_string(),
            ));
        };
        let mut values = BTreeMap::new();
        for (key, value) in map {
            let text = match value {
                Value::String(text) => text,
                Value::Number(number) => number.to_string(),
                Value::Bool(flag) => flag.to_string(),
                other => {
                    return Err(ConfigurationError::Invalid(format!(
                        "option {key:?} must be a string, number, or boolean (got {other})"
                    )))
                }
            };
            values.insert(key, text);
        }
        Ok(Self { values })
    }

    /// Load a configuration file written as a flat JSON object.
    pub fn load(path: &Path) -> Result<Self, ConfigurationError> {
        let bytes = fs::read(path).map_err(|source| ConfigurationError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_slice(&bytes)
    }

    /// Apply `key=value` overrides on top of this configuration; later pairs win.
    pub fn with_overrides<I, S>(&self, pairs: I) -> Result<Self, ConfigurationError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut values = self.values.clone();
        for pair in pairs {
            let pair = pair.as_ref();
            let (key, value) = pair.split_once('=').ok_or_else(|| {
                ConfigurationError::Invalid(format!("override {pair:?} must be key=value"))
            })?;
            let key = key.trim();
            if key.is_empty() {
                return Err(ConfigurationError::Invalid(format!(
                    "override {pair:?} has an empty key"
                )));
            }
            values.insert(key.to_string(), value.to_string());
        }
        Ok(Self { values })
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn get_string(&self, key: &str, default: &str) -> String {
        self.get(key).unwrap_or(default).to_string()
    }

    pub fn get_int(&self, key: &str, default: i32) -> Result<i32, ConfigurationError> {
        match self.get(key) {
            None => Ok(default),
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|_| ConfigurationError::malformed(key, raw, "integer")),
        }
    }

    pub fn get_long(&self, key: &str, default: i64) -> Result<i64, ConfigurationError> {
        self.get_optional_long(key).map(|value| value.unwrap_or(default))
    }

    /// Like [`Configuration::get_long`] but lets the caller tell absence apart
    /// from an explicit value.
    pub fn get_optional_long(&self, key: &str) -> Result<Option<i64>, ConfigurationError> {
        match self.get(key) {
            None => Ok(None),
            Some(raw) => raw
                .trim()
                .parse()
                .map(Some)
                .map_err(|_| ConfigurationError::malformed(key, raw, "long integer")),
        }
    }

    pub fn get_bool(&self, key: &str, default: bool) -> Result<bool, ConfigurationError> {
        match self.get(key) {
            None => Ok(default),
            Some(raw) => {
                let value = raw.trim();
                if value.eq_ignore_ascii_case("true") {
                    Ok(true)
                } else if value.eq_ignore_ascii_case("false") {
                    Ok(false)
                } else {
                    Err(ConfigurationError::malformed(key, raw, "true or false"))
                }
            }
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for Configuration
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        }
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
