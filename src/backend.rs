// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::auth::{LocalSessions, RestSessions, SessionProvider};
use crate::config::{BackendKind, Settings};
use crate::db;
use crate::errors::{ConfigError, FinanceError, Result};
use crate::store::{FinanceStore, MemoryStore, RestStore, SqliteStore};
use std::path::PathBuf;

/// The store and session provider for one process, built from [`Settings`].
pub struct Backend {
    pub store: Box<dyn FinanceStore>,
    pub sessions: Box<dyn SessionProvider>,
    /// Where data lives, for `init` to report.
    pub location: String,
}

impl Backend {
    pub fn connect(settings: &Settings) -> Result<Self> {
        match settings.backend {
            BackendKind::Memory => Ok(Self {
                store: Box::new(MemoryStore::new()),
                sessions: Box::new(LocalSessions::in_memory()?),
                location: "memory".into(),
            }),
            BackendKind::Sqlite => {
                let path = settings.resolved_db_path()?;
                tracing::debug!(path = %path.display(), "opening sqlite backend");
                let store = SqliteStore::open(&path)?;
                let sessions = LocalSessions::open(&path)?;
                Ok(Self {
                    store: Box::new(store),
                    sessions: Box::new(sessions),
                    location: path.display().to_string(),
                })
            }
            BackendKind::Rest => {
                let cfg = settings
                    .rest
                    .as_ref()
                    .ok_or(FinanceError::Config(ConfigError::Missing(
                        crate::config::ENV_URL,
                    )))?;
                let sessions = RestSessions::new(cfg, session_file()?)?;
                let token = sessions.current_session().and_then(|s| s.access_token);
                let store = RestStore::new(cfg, token)?;
                Ok(Self {
                    store: Box::new(store),
                    sessions: Box::new(sessions),
                    location: cfg.url.clone(),
                })
            }
        }
    }
}

fn session_file() -> Result<PathBuf, ConfigError> {
    Ok(db::data_dir()?.join("session.json"))
}
