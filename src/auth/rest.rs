// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Hosted auth API (`/auth/v1`). The session, including its access token,
//! is cached in a JSON file so later invocations stay signed in.

use super::{check_sign_up, normalize_email, Session, SessionProvider};
use crate::config::RestConfig;
use crate::errors::{AuthError, RemoteError};
use crate::models::OwnerId;
use crate::utils::http_client;
use reqwest::blocking::Client;
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::json;
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Deserialize)]
struct AuthUser {
    id: String,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    user_metadata: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct AuthResponse {
    #[serde(default)]
    access_token: Option<String>,
    #[serde(default)]
    user: Option<AuthUser>,
    // Sign-up without auto-confirm returns the bare user object.
    #[serde(flatten)]
    bare: Option<AuthUser>,
}

pub struct RestSessions {
    client: Client,
    base_url: String,
    api_key: String,
    session_file: PathBuf,
    current: Option<Session>,
}

impl RestSessions {
    pub fn new(cfg: &RestConfig, session_file: PathBuf) -> Result<Self, AuthError> {
        let current = match fs::read_to_string(&session_file) {
            Ok(raw) => serde_json::from_str::<Session>(&raw).ok(),
            Err(_) => None,
        };
        Ok(Self {
            client: http_client().map_err(RemoteError::from)?,
            base_url: cfg.url.trim_end_matches('/').to_string(),
            api_key: cfg.api_key.clone(),
            session_file,
            current,
        })
    }

    fn auth_url(&self, path: &str) -> String {
        format!("{}/auth/v1/{}", self.base_url, path)
    }

    fn post(&self, path: &str, body: serde_json::Value) -> Result<AuthResponse, AuthError> {
        let resp = self
            .client
            .post(self.auth_url(path))
            .header("apikey", &self.api_key)
            .json(&body)
            .send()
            .map_err(RemoteError::from)?;
        let status = resp.status();
        if status == StatusCode::BAD_REQUEST || status == StatusCode::UNPROCESSABLE_ENTITY {
            let text = resp.text().unwrap_or_default();
            if text.contains("already") {
                return Err(AuthError::EmailTaken(
                    body["email"].as_str().unwrap_or_default().to_string(),
                ));
            }
            return Err(AuthError::InvalidCredentials);
        }
        if !status.is_success() {
            return Err(RemoteError::Status {
                status: status.as_u16(),
                body: resp.text().unwrap_or_default(),
            }
            .into());
        }
        Ok(resp.json::<AuthResponse>().map_err(RemoteError::from)?)
    }

    fn remember(&mut self, resp: AuthResponse, email: String, fallback_name: &str) -> Result<Session, AuthError> {
        let token = resp.access_token;
        let user = resp
            .user
            .or(resp.bare)
            .ok_or(AuthError::InvalidCredentials)?;
        let display_name = user.user_metadata["name"]
            .as_str()
            .unwrap_or(fallback_name)
            .to_string();
        let session = Session {
            owner: OwnerId::new(user.id),
            email: user.email.unwrap_or(email),
            display_name,
            access_token: token,
        };
        let raw = serde_json::to_string_pretty(&session)
            .map_err(|e| AuthError::Remote(RemoteError::Io(std::io::Error::other(e))))?;
        fs::write(&self.session_file, raw).map_err(RemoteError::from)?;
        tracing::info!(owner = %session.owner, "signed in");
        self.current = Some(session.clone());
        Ok(session)
    }
}

impl SessionProvider for RestSessions {
    fn sign_up(
        &mut self,
        email: &str,
        password: &str,
        display_name: &str,
    ) -> Result<Session, AuthError> {
        let email = check_sign_up(email, password, display_name)?;
        let resp = self.post(
            "signup",
            json!({"email": email, "password": password, "data": {"name": display_name.trim()}}),
        )?;
        self.remember(resp, email, display_name.trim())
    }

    fn sign_in(&mut self, email: &str, password: &str) -> Result<Session, AuthError> {
        let email = normalize_email(email).map_err(|_| AuthError::InvalidCredentials)?;
        let resp = self.post(
            "token?grant_type=password",
            json!({"email": email, "password": password}),
        )?;
        self.remember(resp, email, "")
    }

    fn sign_out(&mut self) -> Result<(), AuthError> {
        if let Some(token) = self.current.as_ref().and_then(|s| s.access_token.clone()) {
            // An expired token is already signed out server-side.
            let resp = self
                .client
                .post(self.auth_url("logout"))
                .header("apikey", &self.api_key)
                .bearer_auth(token)
                .send()
                .map_err(RemoteError::from)?;
            if !resp.status().is_success() && resp.status() != StatusCode::UNAUTHORIZED {
                return Err(RemoteError::Status {
                    status: resp.status().as_u16(),
                    body: resp.text().unwrap_or_default(),
                }
                .into());
            }
        }
        if self.session_file.exists() {
            fs::remove_file(&self.session_file).map_err(RemoteError::from)?;
        }
        self.current = None;
        tracing::info!("signed out");
        Ok(())
    }

    fn current_session(&self) -> Option<Session> {
        self.current.clone()
    }
}
