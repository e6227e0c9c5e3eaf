// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Hosted backend speaking PostgREST conventions: one resource per table
//! under `/rest/v1`, rows filtered with `column=eq.value`.

use super::{columns, decode_rows, ContributionLedger, FinanceStore, Record, RecordStore};
use crate::config::RestConfig;
use crate::errors::RemoteError;
use crate::models::{Goal, GoalContribution, GoalPatch, NewContribution, OwnerId};
use crate::utils::http_client;
use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::Method;
use rust_decimal::Decimal;
use serde_json::Value;

pub struct RestStore {
    client: Client,
    base_url: String,
    api_key: String,
    access_token: Option<String>,
}

/// `order` query parameter for `R`, e.g. `date.desc.nullslast,id.desc`.
pub fn order_param<R: Record>() -> String {
    R::ORDER_BY
        .iter()
        .map(|(col, desc)| {
            if *desc {
                format!("{}.desc.nullslast", col)
            } else {
                format!("{}.asc", col)
            }
        })
        .collect::<Vec<_>>()
        .join(",")
}

fn check(resp: Response) -> Result<Response, RemoteError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().unwrap_or_default();
    Err(RemoteError::Status {
        status: status.as_u16(),
        body,
    })
}

fn eq(v: impl std::fmt::Display) -> String {
    format!("eq.{}", v)
}

impl RestStore {
    pub fn new(cfg: &RestConfig, access_token: Option<String>) -> Result<Self, RemoteError> {
        Ok(Self {
            client: http_client()?,
            base_url: cfg.url.trim_end_matches('/').to_string(),
            api_key: cfg.api_key.clone(),
            access_token,
        })
    }

    pub fn endpoint(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    fn request(&self, method: Method, table: &str) -> RequestBuilder {
        let bearer = self.access_token.as_deref().unwrap_or(&self.api_key);
        self.client
            .request(method, self.endpoint(table))
            .header("apikey", &self.api_key)
            .bearer_auth(bearer)
    }

    fn fetch<R: Record>(&self, filters: &[(&str, String)]) -> Result<Vec<R>, RemoteError> {
        let mut query: Vec<(&str, String)> = vec![("select", "*".into()), ("order", order_param::<R>())];
        query.extend(filters.iter().cloned());
        let resp = check(self.request(Method::GET, R::TABLE).query(&query).send()?)?;
        decode_rows(resp.json::<Vec<Value>>()?)
    }

    /// Rows touched by a PATCH/DELETE, so a miss can be reported as not found.
    fn touch(
        &self,
        method: Method,
        table: &'static str,
        owner: &OwnerId,
        id: i64,
        body: Option<Value>,
    ) -> Result<(), RemoteError> {
        let mut req = self
            .request(method, table)
            .header("Prefer", "return=representation")
            .query(&[("id", eq(id)), ("user_id", eq(owner))]);
        if let Some(body) = body {
            req = req.json(&body);
        }
        let rows = check(req.send()?)?.json::<Vec<Value>>()?;
        if rows.is_empty() {
            return Err(RemoteError::NotFound { table, id });
        }
        Ok(())
    }

    /// Rewrite the goal's accumulated value as the sum of its contributions.
    fn reconcile(&self, owner: &OwnerId, goal_id: i64) -> Result<(), RemoteError> {
        let contributions: Vec<GoalContribution> =
            self.fetch(&[("user_id", eq(owner)), ("goal_id", eq(goal_id))])?;
        let total: Decimal = contributions.iter().map(|c| c.value).sum();
        let patch = GoalPatch {
            accumulated_value: Some(total),
            ..GoalPatch::default()
        };
        let body = Value::Object(columns(Goal::TABLE, &patch)?);
        self.touch(Method::PATCH, Goal::TABLE, owner, goal_id, Some(body))
    }
}

impl<R: Record> RecordStore<R> for RestStore {
    fn list(&self, owner: &OwnerId) -> Result<Vec<R>, RemoteError> {
        self.fetch(&[("user_id", eq(owner))])
    }

    fn insert(&mut self, owner: &OwnerId, draft: &R::Draft) -> Result<i64, RemoteError> {
        let mut body = columns(R::TABLE, draft)?;
        body.insert("user_id".into(), Value::String(owner.to_string()));
        let resp = check(
            self.request(Method::POST, R::TABLE)
                .header("Prefer", "return=representation")
                .json(&Value::Object(body))
                .send()?,
        )?;
        let rows = resp.json::<Vec<Value>>()?;
        let id = rows
            .first()
            .and_then(|r| r.get("id"))
            .and_then(Value::as_i64)
            .ok_or_else(|| RemoteError::Status {
                status: 200,
                body: format!("{} insert returned no id", R::TABLE),
            })?;
        tracing::debug!(table = R::TABLE, id, "rest insert");
        Ok(id)
    }

    fn update(&mut self, owner: &OwnerId, id: i64, patch: &R::Patch) -> Result<(), RemoteError> {
        let body = Value::Object(columns(R::TABLE, patch)?);
        self.touch(Method::PATCH, R::TABLE, owner, id, Some(body))
    }

    fn delete(&mut self, owner: &OwnerId, id: i64) -> Result<(), RemoteError> {
        self.touch(Method::DELETE, R::TABLE, owner, id, None)
    }
}

/// The hosted API offers no multi-table transaction, so each write is
/// followed by reconciling the goal from its contributions. A failed
/// reconcile is healed by the next one.
impl ContributionLedger for RestStore {
    fn add_contribution(
        &mut self,
        owner: &OwnerId,
        draft: &NewContribution,
    ) -> Result<i64, RemoteError> {
        let goals: Vec<Goal> = self.fetch(&[("user_id", eq(owner)), ("id", eq(draft.goal_id))])?;
        if goals.is_empty() {
            return Err(RemoteError::NotFound {
                table: Goal::TABLE,
                id: draft.goal_id,
            });
        }
        let id = RecordStore::<GoalContribution>::insert(self, owner, draft)?;
        self.reconcile(owner, draft.goal_id)?;
        Ok(id)
    }

    fn remove_contribution(&mut self, owner: &OwnerId, id: i64) -> Result<(), RemoteError> {
        let found: Vec<GoalContribution> =
            self.fetch(&[("user_id", eq(owner)), ("id", eq(id))])?;
        let goal_id = found
            .first()
            .map(|c| c.goal_id)
            .ok_or(RemoteError::NotFound {
                table: GoalContribution::TABLE,
                id,
            })?;
        RecordStore::<GoalContribution>::delete(self, owner, id)?;
        match self.reconcile(owner, goal_id) {
            Err(RemoteError::NotFound { .. }) => Ok(()),
            other => other,
        }
    }
}

impl FinanceStore for RestStore {
    fn backend_name(&self) -> &'static str {
        "rest"
    }
}
