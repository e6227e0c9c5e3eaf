// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! One owner's view of a [`FinanceStore`].
//!
//! The tracker keeps the full record sets in memory. Writes are validated,
//! sent to the store, and followed by a reload; a failed write leaves the
//! loaded sets exactly as they were. Derived views are recomputed from the
//! loaded sets on every call.

use crate::aggregate::{self, DateRange, GoalProgress, MonthPoint, Statistics, Summary, Totals};
use crate::errors::{FinanceError, RemoteError, Result};
use crate::export::export_csv;
use crate::models::{
    Debt, DebtPatch, Goal, GoalContribution, GoalPatch, Income, NewContribution, NewDebt,
    NewGoal, NewIncome, OwnerId, Records,
};
use crate::store::{FinanceStore, Record, RecordStore};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use rust_decimal::Decimal;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Description given to the contribution that carries a new goal's
/// starting accumulated value.
pub const OPENING_BALANCE: &str = "Opening balance";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportTemplate {
    Incomes,
    Debts,
    Goals,
    Contributions,
    Summary,
}

impl ExportTemplate {
    pub const ALL: [ExportTemplate; 5] = [
        ExportTemplate::Incomes,
        ExportTemplate::Debts,
        ExportTemplate::Goals,
        ExportTemplate::Contributions,
        ExportTemplate::Summary,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ExportTemplate::Incomes => "incomes",
            ExportTemplate::Debts => "debts",
            ExportTemplate::Goals => "goals",
            ExportTemplate::Contributions => "contributions",
            ExportTemplate::Summary => "summary",
        }
    }
}

impl fmt::Display for ExportTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExportTemplate {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        ExportTemplate::ALL
            .into_iter()
            .find(|t| t.as_str() == s.trim().to_ascii_lowercase())
            .ok_or_else(|| {
                format!(
                    "Unknown export '{}' (use incomes|debts|goals|contributions|summary)",
                    s
                )
            })
    }
}

/// A goal whose stored accumulated value disagreed with its contributions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Reconciled {
    pub goal_id: i64,
    pub name: String,
    pub stored: Decimal,
    pub actual: Decimal,
}

pub struct Tracker<'s> {
    store: &'s mut dyn FinanceStore,
    owner: OwnerId,
    records: Records,
}

impl<'s> Tracker<'s> {
    pub fn load(store: &'s mut dyn FinanceStore, owner: OwnerId) -> Result<Self> {
        let records = fetch_all(&*store, &owner)?;
        tracing::debug!(
            backend = store.backend_name(),
            owner = %owner,
            incomes = records.incomes.len(),
            debts = records.debts.len(),
            goals = records.goals.len(),
            "records loaded"
        );
        Ok(Self {
            store,
            owner,
            records,
        })
    }

    pub fn reload(&mut self) -> Result<()> {
        self.records = fetch_all(&*self.store, &self.owner)?;
        Ok(())
    }

    pub fn owner(&self) -> &OwnerId {
        &self.owner
    }

    pub fn records(&self) -> &Records {
        &self.records
    }

    pub fn incomes(&self) -> &[Income] {
        &self.records.incomes
    }

    pub fn debts(&self) -> &[Debt] {
        &self.records.debts
    }

    pub fn goals(&self) -> &[Goal] {
        &self.records.goals
    }

    pub fn contributions(&self) -> &[GoalContribution] {
        &self.records.contributions
    }

    pub fn goal(&self, id: i64) -> Result<&Goal> {
        self.records
            .goals
            .iter()
            .find(|g| g.id == id)
            .ok_or_else(|| not_found::<Goal>(id))
    }

    pub fn income(&self, id: i64) -> Result<&Income> {
        self.records
            .incomes
            .iter()
            .find(|i| i.id == id)
            .ok_or_else(|| not_found::<Income>(id))
    }

    // ---- writes ----

    pub fn add_income(&mut self, draft: NewIncome) -> Result<i64> {
        let draft = NewIncome {
            category: draft.category.trim().to_string(),
            subcategory: draft.subcategory.trim().to_string(),
            ..draft
        };
        require_category(&draft.category)?;
        require_non_negative("value", draft.value)?;
        let id = RecordStore::<Income>::insert(&mut *self.store, &self.owner, &draft)?;
        tracing::info!(id, value = %draft.value, "income added");
        self.reload()?;
        Ok(id)
    }

    pub fn delete_income(&mut self, id: i64) -> Result<()> {
        RecordStore::<Income>::delete(&mut *self.store, &self.owner, id)?;
        tracing::info!(id, "income deleted");
        self.reload()
    }

    pub fn add_debt(&mut self, draft: NewDebt) -> Result<i64> {
        let mut draft = NewDebt {
            category: draft.category.trim().to_string(),
            subcategory: draft.subcategory.trim().to_string(),
            ..draft
        };
        if draft.payment_method.is_instant() {
            draft.interest = Decimal::ZERO;
            draft.installments = 0;
            draft.due_date = None;
        }
        require_category(&draft.category)?;
        require_non_negative("value", draft.value)?;
        require_non_negative("interest", draft.interest)?;
        let id = RecordStore::<Debt>::insert(&mut *self.store, &self.owner, &draft)?;
        tracing::info!(id, value = %draft.value, "debt added");
        self.reload()?;
        Ok(id)
    }

    pub fn update_debt(&mut self, id: i64, patch: DebtPatch) -> Result<()> {
        let current = self
            .records
            .debts
            .iter()
            .find(|d| d.id == id)
            .ok_or_else(|| not_found::<Debt>(id))?;
        let mut patch = patch;
        if let Some(c) = patch.category.as_mut() {
            *c = c.trim().to_string();
            require_category(c)?;
        }
        if let Some(v) = patch.value {
            require_non_negative("value", v)?;
        }
        if let Some(i) = patch.interest {
            require_non_negative("interest", i)?;
        }
        // Switching to an instant method clears the fields it has no use for.
        let method = patch.payment_method.unwrap_or(current.payment_method);
        if patch.payment_method.is_some() && method.is_instant() {
            patch.interest = Some(Decimal::ZERO);
            patch.installments = Some(0);
            patch.due_date = Some(None);
        }
        RecordStore::<Debt>::update(&mut *self.store, &self.owner, id, &patch)?;
        tracing::info!(id, "debt updated");
        self.reload()
    }

    pub fn delete_debt(&mut self, id: i64) -> Result<()> {
        RecordStore::<Debt>::delete(&mut *self.store, &self.owner, id)?;
        tracing::info!(id, "debt deleted");
        self.reload()
    }

    pub fn add_goal(&mut self, draft: NewGoal) -> Result<i64> {
        let draft = NewGoal {
            name: draft.name.trim().to_string(),
            category: draft.category.trim().to_string(),
            subcategory: draft.subcategory.trim().to_string(),
            ..draft
        };
        if draft.name.is_empty() {
            return Err(FinanceError::validation("goal name is required"));
        }
        require_category(&draft.category)?;
        require_positive("target value", draft.target_value)?;
        require_non_negative("accumulated value", draft.accumulated_value)?;
        check_window(draft.start_date, draft.end_date)?;
        // An opening balance becomes the goal's first contribution.
        let opening = draft.accumulated_value;
        let draft = NewGoal {
            accumulated_value: Decimal::ZERO,
            ..draft
        };
        let id = RecordStore::<Goal>::insert(&mut *self.store, &self.owner, &draft)?;
        tracing::info!(id, name = %draft.name, "goal added");
        if opening > Decimal::ZERO {
            let seed = NewContribution {
                goal_id: id,
                income_id: None,
                value: opening,
                description: Some(OPENING_BALANCE.to_string()),
                created_at: draft.start_date.and_time(NaiveTime::MIN),
            };
            if let Err(err) = self.store.add_contribution(&self.owner, &seed) {
                if let Err(undo) = RecordStore::<Goal>::delete(&mut *self.store, &self.owner, id) {
                    tracing::warn!(id, error = %undo, "could not remove goal after failed opening balance");
                }
                self.reload()?;
                return Err(err.into());
            }
            tracing::info!(id, value = %opening, "opening balance recorded");
        }
        self.reload()?;
        Ok(id)
    }

    pub fn update_goal(&mut self, id: i64, patch: GoalPatch) -> Result<()> {
        let mut patch = patch;
        if let Some(n) = patch.name.as_mut() {
            *n = n.trim().to_string();
            if n.is_empty() {
                return Err(FinanceError::validation("goal name is required"));
            }
        }
        if let Some(c) = patch.category.as_mut() {
            *c = c.trim().to_string();
            require_category(c)?;
        }
        if let Some(t) = patch.target_value {
            require_positive("target value", t)?;
        }
        if let Some(a) = patch.accumulated_value {
            require_non_negative("accumulated value", a)?;
        }
        let mut preview = self.goal(id)?.clone();
        preview.apply(&patch);
        check_window(preview.start_date, preview.end_date)?;
        RecordStore::<Goal>::update(&mut *self.store, &self.owner, id, &patch)?;
        tracing::info!(id, "goal updated");
        self.reload()
    }

    /// Deletes the goal's contributions, then the goal.
    pub fn delete_goal(&mut self, id: i64) -> Result<()> {
        self.goal(id)?;
        let owned: Vec<i64> = self
            .records
            .contributions
            .iter()
            .filter(|c| c.goal_id == id)
            .map(|c| c.id)
            .collect();
        let mut outcome = Ok(());
        for cid in &owned {
            outcome = RecordStore::<GoalContribution>::delete(&mut *self.store, &self.owner, *cid);
            if outcome.is_err() {
                break;
            }
        }
        if outcome.is_ok() {
            outcome = RecordStore::<Goal>::delete(&mut *self.store, &self.owner, id);
        }
        if let Err(err) = outcome {
            // Some contributions may already be gone.
            self.reload()?;
            return Err(err.into());
        }
        tracing::info!(id, contributions = owned.len(), "goal deleted");
        self.reload()
    }

    pub fn contribute(
        &mut self,
        goal_id: i64,
        value: Decimal,
        description: Option<String>,
        at: NaiveDateTime,
    ) -> Result<i64> {
        self.record_contribution(NewContribution {
            goal_id,
            income_id: None,
            value,
            description,
            created_at: at,
        })
    }

    /// Contribute the full value of an existing income.
    pub fn contribute_income(
        &mut self,
        goal_id: i64,
        income_id: i64,
        description: Option<String>,
        at: NaiveDateTime,
    ) -> Result<i64> {
        let value = self.income(income_id)?.value;
        self.record_contribution(NewContribution {
            goal_id,
            income_id: Some(income_id),
            value,
            description,
            created_at: at,
        })
    }

    fn record_contribution(&mut self, draft: NewContribution) -> Result<i64> {
        require_positive("contribution value", draft.value)?;
        self.goal(draft.goal_id)?;
        let draft = NewContribution {
            description: draft
                .description
                .map(|d| d.trim().to_string())
                .filter(|d| !d.is_empty()),
            ..draft
        };
        let id = self.store.add_contribution(&self.owner, &draft)?;
        tracing::info!(id, goal_id = draft.goal_id, value = %draft.value, "contribution added");
        self.reload()?;
        Ok(id)
    }

    pub fn remove_contribution(&mut self, id: i64) -> Result<()> {
        self.store.remove_contribution(&self.owner, id)?;
        tracing::info!(id, "contribution removed");
        self.reload()
    }

    /// Rewrite the goal's accumulated value to the sum of its contributions
    /// when the two disagree. Returns what was corrected, if anything.
    pub fn reconcile_goal(&mut self, goal_id: i64) -> Result<Option<Reconciled>> {
        let goal = self.goal(goal_id)?;
        let actual = aggregate::reconciled_accumulated(goal, &self.records.contributions);
        if actual == goal.accumulated_value {
            return Ok(None);
        }
        let fixed = Reconciled {
            goal_id,
            name: goal.name.clone(),
            stored: goal.accumulated_value,
            actual,
        };
        tracing::warn!(
            goal_id,
            stored = %fixed.stored,
            actual = %fixed.actual,
            "accumulated value out of step with contributions"
        );
        let patch = GoalPatch {
            accumulated_value: Some(actual),
            ..GoalPatch::default()
        };
        RecordStore::<Goal>::update(&mut *self.store, &self.owner, goal_id, &patch)?;
        self.reload()?;
        Ok(Some(fixed))
    }

    /// Goals whose accumulated value disagrees with their contributions,
    /// without touching the store.
    pub fn drifted_goals(&self) -> Vec<Reconciled> {
        self.records
            .goals
            .iter()
            .filter_map(|g| {
                let actual = aggregate::reconciled_accumulated(g, &self.records.contributions);
                (actual != g.accumulated_value).then(|| Reconciled {
                    goal_id: g.id,
                    name: g.name.clone(),
                    stored: g.accumulated_value,
                    actual,
                })
            })
            .collect()
    }

    // ---- derived views ----

    pub fn totals(&self) -> Totals {
        aggregate::totals(&self.records.incomes, &self.records.debts)
    }

    pub fn summary(&self, range: &DateRange) -> Summary {
        aggregate::summary(&self.records.incomes, &self.records.debts, range)
    }

    pub fn statistics(&self, range: &DateRange) -> Option<Statistics> {
        aggregate::statistics(&aggregate::filter_dated(&self.records.debts, range))
    }

    pub fn goal_progress(&self, goal_id: i64, now: NaiveDateTime) -> Result<GoalProgress> {
        let goal = self.goal(goal_id)?;
        Ok(aggregate::goal_progress(
            goal,
            &self.records.contributions,
            now,
        ))
    }

    pub fn monthly_series(&self, months: usize, until: NaiveDate) -> Vec<MonthPoint> {
        aggregate::monthly_series(&self.records.incomes, &self.records.debts, months, until)
    }

    pub fn export(&self, template: ExportTemplate, range: &DateRange) -> Result<String> {
        let csv = match template {
            ExportTemplate::Incomes => export_csv(&aggregate::filter_dated(&self.records.incomes, range)),
            ExportTemplate::Debts => export_csv(&aggregate::filter_dated(&self.records.debts, range)),
            ExportTemplate::Goals => export_csv(&aggregate::filter_dated(&self.records.goals, range)),
            ExportTemplate::Contributions => {
                export_csv(&aggregate::filter_dated(&self.records.contributions, range))
            }
            ExportTemplate::Summary => export_csv(&[self.summary(range)]),
        };
        csv.map_err(|e| FinanceError::Remote(RemoteError::Io(e.into())))
    }
}

fn fetch_all(store: &dyn FinanceStore, owner: &OwnerId) -> Result<Records> {
    Ok(Records {
        incomes: RecordStore::<Income>::list(store, owner)?,
        debts: RecordStore::<Debt>::list(store, owner)?,
        goals: RecordStore::<Goal>::list(store, owner)?,
        contributions: RecordStore::<GoalContribution>::list(store, owner)?,
    })
}

fn not_found<R: Record>(id: i64) -> FinanceError {
    FinanceError::Remote(RemoteError::NotFound {
        table: R::TABLE,
        id,
    })
}

fn require_category(category: &str) -> Result<()> {
    if category.trim().is_empty() {
        return Err(FinanceError::validation("category is required"));
    }
    Ok(())
}

fn require_non_negative(field: &str, v: Decimal) -> Result<()> {
    if v.is_sign_negative() && !v.is_zero() {
        return Err(FinanceError::validation(format!(
            "{} must not be negative",
            field
        )));
    }
    Ok(())
}

fn require_positive(field: &str, v: Decimal) -> Result<()> {
    if v <= Decimal::ZERO {
        return Err(FinanceError::validation(format!(
            "{} must be greater than zero",
            field
        )));
    }
    Ok(())
}

fn check_window(start: NaiveDate, end: Option<NaiveDate>) -> Result<()> {
    if end.is_some_and(|e| e < start) {
        return Err(FinanceError::validation(
            "end date must not be before start date",
        ));
    }
    Ok(())
}
