// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::{ContributionLedger, FinanceStore, Record, RecordStore};
use crate::errors::RemoteError;
use crate::models::{Debt, Goal, GoalContribution, Income, NewContribution, OwnerId};
use rust_decimal::Decimal;

/// Process-local backing. Nothing survives the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    incomes: Vec<Income>,
    debts: Vec<Debt>,
    goals: Vec<Goal>,
    contributions: Vec<GoalContribution>,
    last_id: i64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_id(&mut self) -> i64 {
        self.last_id += 1;
        self.last_id
    }
}

/// Access to the vector holding records of type `R`.
pub trait MemoryTable<R> {
    fn rows(&self) -> &Vec<R>;
    fn rows_mut(&mut self) -> &mut Vec<R>;
}

impl MemoryTable<Income> for MemoryStore {
    fn rows(&self) -> &Vec<Income> {
        &self.incomes
    }
    fn rows_mut(&mut self) -> &mut Vec<Income> {
        &mut self.incomes
    }
}

impl MemoryTable<Debt> for MemoryStore {
    fn rows(&self) -> &Vec<Debt> {
        &self.debts
    }
    fn rows_mut(&mut self) -> &mut Vec<Debt> {
        &mut self.debts
    }
}

impl MemoryTable<Goal> for MemoryStore {
    fn rows(&self) -> &Vec<Goal> {
        &self.goals
    }
    fn rows_mut(&mut self) -> &mut Vec<Goal> {
        &mut self.goals
    }
}

impl MemoryTable<GoalContribution> for MemoryStore {
    fn rows(&self) -> &Vec<GoalContribution> {
        &self.contributions
    }
    fn rows_mut(&mut self) -> &mut Vec<GoalContribution> {
        &mut self.contributions
    }
}

impl<R: Record> RecordStore<R> for MemoryStore
where
    MemoryStore: MemoryTable<R>,
{
    fn list(&self, owner: &OwnerId) -> Result<Vec<R>, RemoteError> {
        let mut out: Vec<R> = <Self as MemoryTable<R>>::rows(self)
            .iter()
            .filter(|r| r.owner() == owner)
            .cloned()
            .collect();
        out.sort_by(|a, b| a.listing_cmp(b));
        Ok(out)
    }

    fn insert(&mut self, owner: &OwnerId, draft: &R::Draft) -> Result<i64, RemoteError> {
        let id = self.next_id();
        <Self as MemoryTable<R>>::rows_mut(self).push(R::from_draft(id, owner.clone(), draft));
        tracing::debug!(table = R::TABLE, id, "memory insert");
        Ok(id)
    }

    fn update(&mut self, owner: &OwnerId, id: i64, patch: &R::Patch) -> Result<(), RemoteError> {
        let row = <Self as MemoryTable<R>>::rows_mut(self)
            .iter_mut()
            .find(|r| r.id() == id && r.owner() == owner)
            .ok_or(RemoteError::NotFound { table: R::TABLE, id })?;
        row.apply(patch);
        Ok(())
    }

    fn delete(&mut self, owner: &OwnerId, id: i64) -> Result<(), RemoteError> {
        let rows = <Self as MemoryTable<R>>::rows_mut(self);
        let pos = rows
            .iter()
            .position(|r| r.id() == id && r.owner() == owner)
            .ok_or(RemoteError::NotFound { table: R::TABLE, id })?;
        rows.remove(pos);
        Ok(())
    }
}

impl ContributionLedger for MemoryStore {
    fn add_contribution(
        &mut self,
        owner: &OwnerId,
        draft: &NewContribution,
    ) -> Result<i64, RemoteError> {
        let goal_pos = self
            .goals
            .iter()
            .position(|g| g.id == draft.goal_id && &g.owner == owner)
            .ok_or(RemoteError::NotFound {
                table: Goal::TABLE,
                id: draft.goal_id,
            })?;
        let id = self.next_id();
        self.contributions
            .push(GoalContribution::from_draft(id, owner.clone(), draft));
        self.goals[goal_pos].accumulated_value += draft.value;
        Ok(id)
    }

    fn remove_contribution(&mut self, owner: &OwnerId, id: i64) -> Result<(), RemoteError> {
        let pos = self
            .contributions
            .iter()
            .position(|c| c.id == id && &c.owner == owner)
            .ok_or(RemoteError::NotFound {
                table: GoalContribution::TABLE,
                id,
            })?;
        let removed = self.contributions.remove(pos);
        if let Some(goal) = self
            .goals
            .iter_mut()
            .find(|g| g.id == removed.goal_id && &g.owner == owner)
        {
            goal.accumulated_value = (goal.accumulated_value - removed.value).max(Decimal::ZERO);
        }
        Ok(())
    }
}

impl FinanceStore for MemoryStore {
    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
