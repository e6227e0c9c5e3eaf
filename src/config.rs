// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::db;
use crate::errors::ConfigError;
use std::path::PathBuf;
use std::str::FromStr;

pub const ENV_BACKEND: &str = "POCKETBOOK_BACKEND";
pub const ENV_DB: &str = "POCKETBOOK_DB";
pub const ENV_URL: &str = "POCKETBOOK_URL";
pub const ENV_KEY: &str = "POCKETBOOK_KEY";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    Sqlite,
    Memory,
    Rest,
}

impl FromStr for BackendKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "sqlite" | "local" => Ok(BackendKind::Sqlite),
            "memory" => Ok(BackendKind::Memory),
            "rest" | "remote" => Ok(BackendKind::Rest),
            other => Err(ConfigError::UnknownBackend(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestConfig {
    pub url: String,
    pub api_key: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub backend: BackendKind,
    pub db_path: Option<PathBuf>,
    pub rest: Option<RestConfig>,
}

impl Settings {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from any key lookup; blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let backend = match get(ENV_BACKEND) {
            Some(raw) => raw.parse::<BackendKind>()?,
            None => BackendKind::Sqlite,
        };
        let db_path = get(ENV_DB).map(PathBuf::from);
        let rest = match backend {
            BackendKind::Rest => {
                let url = get(ENV_URL).ok_or(ConfigError::Missing(ENV_URL))?;
                if !(url.starts_with("https://") || url.starts_with("http://")) {
                    return Err(ConfigError::InvalidUrl(url));
                }
                let api_key = get(ENV_KEY).ok_or(ConfigError::Missing(ENV_KEY))?;
                Some(RestConfig { url, api_key })
            }
            BackendKind::Sqlite | BackendKind::Memory => None,
        };
        Ok(Self {
            backend,
            db_path,
            rest,
        })
    }

    /// SQLite file for the local backend.
    pub fn resolved_db_path(&self) -> Result<PathBuf, ConfigError> {
        match &self.db_path {
            Some(p) => Ok(p.clone()),
            None => db::default_db_path(),
        }
    }
}
