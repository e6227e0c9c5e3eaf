// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use thiserror::Error;

/// Failure of a record store or session backend call.
#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("backend returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("could not decode {table} row: {source}")]
    Decode {
        table: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("{table} record {id} not found")]
    NotFound { table: &'static str, id: i64 },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Backend endpoint or credentials missing or unusable at startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unknown backend '{0}' (use sqlite|memory|rest)")]
    UnknownBackend(String),
    #[error("{0} must be set for the rest backend")]
    Missing(&'static str),
    #[error("invalid backend URL '{0}'")]
    InvalidUrl(String),
    #[error("could not determine platform-specific data dir")]
    NoDataDir,
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("invalid email or password")]
    InvalidCredentials,
    #[error("an account already exists for {0}")]
    EmailTaken(String),
    #[error("'{0}' is not a valid email address")]
    InvalidEmail(String),
    #[error("password must be at least {0} characters")]
    WeakPassword(usize),
    #[error("display name is required")]
    MissingName,
    #[error("password hashing failed: {0}")]
    Hash(String),
    #[error(transparent)]
    Remote(#[from] RemoteError),
}

impl From<rusqlite::Error> for AuthError {
    fn from(err: rusqlite::Error) -> Self {
        AuthError::Remote(RemoteError::Sqlite(err))
    }
}

impl From<argon2::password_hash::Error> for AuthError {
    fn from(err: argon2::password_hash::Error) -> Self {
        AuthError::Hash(err.to_string())
    }
}

#[derive(Debug, Error)]
pub enum FinanceError {
    #[error("{0}")]
    Validation(String),
    #[error("record store error: {0}")]
    Remote(#[from] RemoteError),
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error("not signed in (run `pocketbook auth signin`)")]
    NotSignedIn,
}

impl FinanceError {
    pub fn validation(msg: impl Into<String>) -> Self {
        FinanceError::Validation(msg.into())
    }
}

impl From<rusqlite::Error> for FinanceError {
    fn from(err: rusqlite::Error) -> Self {
        FinanceError::Remote(RemoteError::Sqlite(err))
    }
}

pub type Result<T, E = FinanceError> = std::result::Result<T, E>;
