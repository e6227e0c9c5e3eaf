// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Owner-scoped record storage.
//!
//! Every backing speaks the same row shape: the serde representation of the
//! record, with the owner stored under `user_id`. Rows are decoded through
//! [`decode_rows`], which is where loosely typed monetary cells get coerced.

pub mod memory;
pub mod rest;
pub mod sqlite;

pub use memory::MemoryStore;
pub use rest::RestStore;
pub use sqlite::SqliteStore;

use crate::errors::RemoteError;
use crate::models::{
    ContributionPatch, Debt, DebtPatch, Goal, GoalContribution, GoalPatch, Income, IncomePatch,
    NewContribution, NewDebt, NewGoal, NewIncome, OwnerId,
};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::cmp::Ordering;

/// A stored record type: its table, draft and patch shapes, and list order.
pub trait Record: Clone + Serialize + DeserializeOwned {
    const TABLE: &'static str;
    /// `(column, descending)` pairs, most significant first.
    const ORDER_BY: &'static [(&'static str, bool)];

    type Draft: Serialize;
    type Patch: Serialize;

    fn id(&self) -> i64;
    fn owner(&self) -> &OwnerId;
    fn from_draft(id: i64, owner: OwnerId, draft: &Self::Draft) -> Self;
    fn apply(&mut self, patch: &Self::Patch);
    /// Same ordering as [`Record::ORDER_BY`], for backings without a query engine.
    fn listing_cmp(&self, other: &Self) -> Ordering;
}

impl Record for Income {
    const TABLE: &'static str = "incomes";
    const ORDER_BY: &'static [(&'static str, bool)] = &[("date", true), ("id", true)];

    type Draft = NewIncome;
    type Patch = IncomePatch;

    fn id(&self) -> i64 {
        self.id
    }

    fn owner(&self) -> &OwnerId {
        &self.owner
    }

    fn from_draft(id: i64, owner: OwnerId, d: &NewIncome) -> Self {
        Income {
            id,
            owner,
            category: d.category.clone(),
            subcategory: d.subcategory.clone(),
            value: d.value,
            date: d.date,
        }
    }

    fn apply(&mut self, p: &IncomePatch) {
        if let Some(c) = &p.category {
            self.category = c.clone();
        }
        if let Some(s) = &p.subcategory {
            self.subcategory = s.clone();
        }
        if let Some(v) = p.value {
            self.value = v;
        }
        if let Some(d) = p.date {
            self.date = d;
        }
    }

    fn listing_cmp(&self, other: &Self) -> Ordering {
        other.date.cmp(&self.date).then(other.id.cmp(&self.id))
    }
}

impl Record for Debt {
    const TABLE: &'static str = "debts";
    const ORDER_BY: &'static [(&'static str, bool)] = &[("due_date", true), ("id", true)];

    type Draft = NewDebt;
    type Patch = DebtPatch;

    fn id(&self) -> i64 {
        self.id
    }

    fn owner(&self) -> &OwnerId {
        &self.owner
    }

    fn from_draft(id: i64, owner: OwnerId, d: &NewDebt) -> Self {
        Debt {
            id,
            owner,
            category: d.category.clone(),
            subcategory: d.subcategory.clone(),
            value: d.value,
            interest: d.interest,
            installments: d.installments,
            due_date: d.due_date,
            payment_method: d.payment_method,
        }
    }

    fn apply(&mut self, p: &DebtPatch) {
        if let Some(c) = &p.category {
            self.category = c.clone();
        }
        if let Some(s) = &p.subcategory {
            self.subcategory = s.clone();
        }
        if let Some(v) = p.value {
            self.value = v;
        }
        if let Some(i) = p.interest {
            self.interest = i;
        }
        if let Some(n) = p.installments {
            self.installments = n;
        }
        if let Some(due) = p.due_date {
            self.due_date = due;
        }
        if let Some(m) = p.payment_method {
            self.payment_method = m;
        }
    }

    // Dateless debts sort last.
    fn listing_cmp(&self, other: &Self) -> Ordering {
        other
            .due_date
            .cmp(&self.due_date)
            .then(other.id.cmp(&self.id))
    }
}

impl Record for Goal {
    const TABLE: &'static str = "goals";
    const ORDER_BY: &'static [(&'static str, bool)] = &[("id", false)];

    type Draft = NewGoal;
    type Patch = GoalPatch;

    fn id(&self) -> i64 {
        self.id
    }

    fn owner(&self) -> &OwnerId {
        &self.owner
    }

    fn from_draft(id: i64, owner: OwnerId, d: &NewGoal) -> Self {
        Goal {
            id,
            owner,
            name: d.name.clone(),
            category: d.category.clone(),
            subcategory: d.subcategory.clone(),
            target_value: d.target_value,
            accumulated_value: d.accumulated_value,
            start_date: d.start_date,
            end_date: d.end_date,
        }
    }

    fn apply(&mut self, p: &GoalPatch) {
        if let Some(n) = &p.name {
            self.name = n.clone();
        }
        if let Some(c) = &p.category {
            self.category = c.clone();
        }
        if let Some(s) = &p.subcategory {
            self.subcategory = s.clone();
        }
        if let Some(t) = p.target_value {
            self.target_value = t;
        }
        if let Some(a) = p.accumulated_value {
            self.accumulated_value = a;
        }
        if let Some(s) = p.start_date {
            self.start_date = s;
        }
        if let Some(e) = p.end_date {
            self.end_date = e;
        }
    }

    fn listing_cmp(&self, other: &Self) -> Ordering {
        self.id.cmp(&other.id)
    }
}

impl Record for GoalContribution {
    const TABLE: &'static str = "goal_contributions";
    const ORDER_BY: &'static [(&'static str, bool)] = &[("created_at", false), ("id", false)];

    type Draft = NewContribution;
    type Patch = ContributionPatch;

    fn id(&self) -> i64 {
        self.id
    }

    fn owner(&self) -> &OwnerId {
        &self.owner
    }

    fn from_draft(id: i64, owner: OwnerId, d: &NewContribution) -> Self {
        GoalContribution {
            id,
            owner,
            goal_id: d.goal_id,
            income_id: d.income_id,
            value: d.value,
            description: d.description.clone(),
            created_at: d.created_at,
        }
    }

    fn apply(&mut self, p: &ContributionPatch) {
        if let Some(d) = &p.description {
            self.description = d.clone();
        }
    }

    fn listing_cmp(&self, other: &Self) -> Ordering {
        self.created_at
            .cmp(&other.created_at)
            .then(self.id.cmp(&other.id))
    }
}

/// CRUD for one record type, always scoped to `owner`. Ids belonging to
/// another owner behave exactly like missing ids.
pub trait RecordStore<R: Record> {
    fn list(&self, owner: &OwnerId) -> Result<Vec<R>, RemoteError>;
    fn insert(&mut self, owner: &OwnerId, draft: &R::Draft) -> Result<i64, RemoteError>;
    fn update(&mut self, owner: &OwnerId, id: i64, patch: &R::Patch) -> Result<(), RemoteError>;
    fn delete(&mut self, owner: &OwnerId, id: i64) -> Result<(), RemoteError>;
}

/// Contribution writes that also move the goal's `accumulated_value`.
pub trait ContributionLedger {
    /// Insert the contribution and add its value to the goal.
    fn add_contribution(
        &mut self,
        owner: &OwnerId,
        draft: &NewContribution,
    ) -> Result<i64, RemoteError>;

    /// Delete the contribution and subtract its value from the goal, never
    /// going below zero.
    fn remove_contribution(&mut self, owner: &OwnerId, id: i64) -> Result<(), RemoteError>;
}

/// Everything the tracker needs from a backing, as one object-safe handle.
pub trait FinanceStore:
    RecordStore<Income>
    + RecordStore<Debt>
    + RecordStore<Goal>
    + RecordStore<GoalContribution>
    + ContributionLedger
{
    fn backend_name(&self) -> &'static str;
}

/// Decode raw rows into records. Monetary cells are coerced here.
pub fn decode_rows<R: Record>(rows: Vec<Value>) -> Result<Vec<R>, RemoteError> {
    rows.into_iter()
        .map(|row| {
            serde_json::from_value(row).map_err(|source| RemoteError::Decode {
                table: R::TABLE,
                source,
            })
        })
        .collect()
}

/// Serialize a draft or patch into its column map.
pub(crate) fn columns<T: Serialize>(
    table: &'static str,
    value: &T,
) -> Result<serde_json::Map<String, Value>, RemoteError> {
    match serde_json::to_value(value) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Ok(serde_json::Map::new()),
        Err(source) => Err(RemoteError::Decode { table, source }),
    }
}
