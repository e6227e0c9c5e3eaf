// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod local;
pub mod rest;

pub use local::LocalSessions;
pub use rest::RestSessions;

use crate::errors::AuthError;
use crate::models::OwnerId;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

pub const MIN_PASSWORD_LEN: usize = 6;

static EMAIL: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap());

/// The signed-in owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub owner: OwnerId,
    pub email: String,
    pub display_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
}

pub trait SessionProvider {
    fn sign_up(
        &mut self,
        email: &str,
        password: &str,
        display_name: &str,
    ) -> Result<Session, AuthError>;
    fn sign_in(&mut self, email: &str, password: &str) -> Result<Session, AuthError>;
    fn sign_out(&mut self) -> Result<(), AuthError>;
    fn current_session(&self) -> Option<Session>;
}

/// Normalized email, or the reason it was rejected.
pub fn normalize_email(email: &str) -> Result<String, AuthError> {
    let e = email.trim().to_ascii_lowercase();
    if !EMAIL.is_match(&e) {
        return Err(AuthError::InvalidEmail(email.trim().to_string()));
    }
    Ok(e)
}

pub fn check_sign_up(email: &str, password: &str, display_name: &str) -> Result<String, AuthError> {
    let email = normalize_email(email)?;
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AuthError::WeakPassword(MIN_PASSWORD_LEN));
    }
    if display_name.trim().is_empty() {
        return Err(AuthError::MissingName);
    }
    Ok(email)
}
