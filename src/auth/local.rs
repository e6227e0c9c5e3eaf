// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::{check_sign_up, normalize_email, Session, SessionProvider};
use crate::db;
use crate::errors::AuthError;
use crate::models::OwnerId;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use rand_core::OsRng;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;

const CURRENT_USER: &str = "current_user";

/// Accounts kept in the local `users` table; the signed-in user id is
/// remembered in `settings` so it survives between invocations.
pub struct LocalSessions {
    conn: Connection,
    current: Option<Session>,
}

pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default().hash_password(password.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

pub fn verify_password(password: &str, stored_hash: &str) -> Result<bool, AuthError> {
    let parsed = PasswordHash::new(stored_hash)?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

impl LocalSessions {
    pub fn new(conn: Connection) -> Result<Self, AuthError> {
        db::init_schema(&conn)?;
        let current = match db::get_setting(&conn, CURRENT_USER)? {
            Some(id) => load_user(&conn, &id)?,
            None => None,
        };
        Ok(Self { conn, current })
    }

    pub fn open(path: &Path) -> Result<Self, AuthError> {
        Self::new(Connection::open(path)?)
    }

    pub fn in_memory() -> Result<Self, AuthError> {
        Self::new(Connection::open_in_memory()?)
    }

    fn remember(&mut self, session: Session) -> Result<Session, AuthError> {
        db::set_setting(&self.conn, CURRENT_USER, session.owner.as_str())?;
        tracing::info!(owner = %session.owner, "signed in");
        self.current = Some(session.clone());
        Ok(session)
    }
}

fn load_user(conn: &Connection, id: &str) -> Result<Option<Session>, AuthError> {
    let row = conn
        .query_row(
            "SELECT id, email, display_name FROM users WHERE id=?1",
            params![id],
            |r| {
                Ok(Session {
                    owner: OwnerId::new(r.get::<_, String>(0)?),
                    email: r.get(1)?,
                    display_name: r.get(2)?,
                    access_token: None,
                })
            },
        )
        .optional()?;
    Ok(row)
}

impl SessionProvider for LocalSessions {
    fn sign_up(
        &mut self,
        email: &str,
        password: &str,
        display_name: &str,
    ) -> Result<Session, AuthError> {
        let email = check_sign_up(email, password, display_name)?;
        let taken: Option<i64> = self
            .conn
            .query_row(
                "SELECT 1 FROM users WHERE email=?1",
                params![&email],
                |r| r.get(0),
            )
            .optional()?;
        if taken.is_some() {
            return Err(AuthError::EmailTaken(email));
        }
        let id = uuid::Uuid::new_v4().to_string();
        self.conn.execute(
            "INSERT INTO users(id, email, display_name, password_hash) VALUES (?1, ?2, ?3, ?4)",
            params![&id, &email, display_name.trim(), hash_password(password)?],
        )?;
        self.remember(Session {
            owner: OwnerId::new(id),
            email,
            display_name: display_name.trim().to_string(),
            access_token: None,
        })
    }

    fn sign_in(&mut self, email: &str, password: &str) -> Result<Session, AuthError> {
        let email = normalize_email(email).map_err(|_| AuthError::InvalidCredentials)?;
        let row: Option<(String, String, String)> = self
            .conn
            .query_row(
                "SELECT id, display_name, password_hash FROM users WHERE email=?1",
                params![&email],
                |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?)),
            )
            .optional()?;
        let Some((id, display_name, hash)) = row else {
            return Err(AuthError::InvalidCredentials);
        };
        if !verify_password(password, &hash)? {
            return Err(AuthError::InvalidCredentials);
        }
        self.remember(Session {
            owner: OwnerId::new(id),
            email,
            display_name,
            access_token: None,
        })
    }

    fn sign_out(&mut self) -> Result<(), AuthError> {
        db::clear_setting(&self.conn, CURRENT_USER)?;
        if let Some(s) = self.current.take() {
            tracing::info!(owner = %s.owner, "signed out");
        }
        Ok(())
    }

    fn current_session(&self) -> Option<Session> {
        self.current.clone()
    }
}
