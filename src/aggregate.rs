// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Derived views over loaded record sets.
//!
//! Everything here is a pure function of the slices passed in. Nothing
//! fails: division by zero yields zero and ratios that would overflow
//! saturate before they are clamped.

use crate::models::{Debt, Goal, GoalContribution, Income};
use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Inclusive date window. Both bounds absent means "everything".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateRange {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn new(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        Self { start, end }
    }

    /// The calendar month `year-month`, or `None` for an invalid month.
    pub fn month(year: i32, month: u32) -> Option<Self> {
        let first = NaiveDate::from_ymd_opt(year, month, 1)?;
        let (ny, nm) = shift_month(year, month, 1);
        let last = NaiveDate::from_ymd_opt(ny, nm, 1)?.pred_opt()?;
        Some(Self::new(Some(first), Some(last)))
    }

    pub fn is_active(&self) -> bool {
        self.start.is_some() || self.end.is_some()
    }

    pub fn contains(&self, at: NaiveDateTime) -> bool {
        if let Some(start) = self.start {
            if at < start_of_day(start) {
                return false;
            }
        }
        if let Some(end) = self.end {
            if at > end_of_day(end) {
                return false;
            }
        }
        true
    }
}

pub fn start_of_day(d: NaiveDate) -> NaiveDateTime {
    d.and_time(NaiveTime::MIN)
}

/// 23:59:59.999 on `d`.
pub fn end_of_day(d: NaiveDate) -> NaiveDateTime {
    let t = NaiveTime::from_hms_milli_opt(23, 59, 59, 999).unwrap_or(NaiveTime::MIN);
    d.and_time(t)
}

/// The date field a record is filtered on by default.
pub trait Dated {
    fn dated_at(&self) -> Option<NaiveDateTime>;
}

impl Dated for Income {
    fn dated_at(&self) -> Option<NaiveDateTime> {
        Some(start_of_day(self.date))
    }
}

impl Dated for Debt {
    fn dated_at(&self) -> Option<NaiveDateTime> {
        self.due_date.map(start_of_day)
    }
}

impl Dated for Goal {
    fn dated_at(&self) -> Option<NaiveDateTime> {
        Some(start_of_day(self.start_date))
    }
}

impl Dated for GoalContribution {
    fn dated_at(&self) -> Option<NaiveDateTime> {
        Some(self.created_at)
    }
}

/// Keep the records whose `date_of` falls inside `range`.
///
/// An inactive range returns everything. Once a bound is set, records with
/// no date (debts without a due date) are dropped.
pub fn filter_by_date_range<T, F>(records: &[T], range: &DateRange, date_of: F) -> Vec<T>
where
    T: Clone,
    F: Fn(&T) -> Option<NaiveDateTime>,
{
    if !range.is_active() {
        return records.to_vec();
    }
    records
        .iter()
        .filter(|r| date_of(*r).is_some_and(|at| range.contains(at)))
        .cloned()
        .collect()
}

pub fn filter_dated<T: Dated + Clone>(records: &[T], range: &DateRange) -> Vec<T> {
    filter_by_date_range(records, range, T::dated_at)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Totals {
    pub total_incomes: Decimal,
    pub total_debts: Decimal,
}

pub fn totals(incomes: &[Income], debts: &[Debt]) -> Totals {
    Totals {
        total_incomes: incomes.iter().map(|i| i.value).sum(),
        total_debts: debts.iter().map(|d| d.value).sum(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub incomes: Decimal,
    pub debts: Decimal,
    pub balance: Decimal,
}

/// Totals restricted to `range`; the balance may be negative.
pub fn summary(incomes: &[Income], debts: &[Debt], range: &DateRange) -> Summary {
    let t = totals(&filter_dated(incomes, range), &filter_dated(debts, range));
    Summary {
        incomes: t.total_incomes,
        debts: t.total_debts,
        balance: t.total_incomes - t.total_debts,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryShare {
    pub category: String,
    pub percentage: Decimal,
    pub value: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Statistics {
    pub max_debt: Debt,
    pub max_category: String,
    pub percentages: Vec<CategoryShare>,
    pub total_debts: Decimal,
}

/// Sum values per category, keeping categories in first-appearance order.
pub fn category_totals<'a, I>(items: I) -> Vec<(String, Decimal)>
where
    I: IntoIterator<Item = (&'a str, Decimal)>,
{
    let mut out: Vec<(String, Decimal)> = Vec::new();
    for (category, value) in items {
        match out.iter_mut().find(|(c, _)| c == category) {
            Some((_, total)) => *total += value,
            None => out.push((category.to_string(), value)),
        }
    }
    out
}

/// `None` when there are no debts.
pub fn statistics(debts: &[Debt]) -> Option<Statistics> {
    let mut max_debt = debts.first()?;
    for d in &debts[1..] {
        if d.value > max_debt.value {
            max_debt = d;
        }
    }

    let by_category = category_totals(debts.iter().map(|d| (d.category.as_str(), d.value)));
    // Ties on category totals go to the last category seen.
    let mut max_category = &by_category[0];
    for entry in &by_category[1..] {
        if entry.1 >= max_category.1 {
            max_category = entry;
        }
    }

    let total_debts: Decimal = debts.iter().map(|d| d.value).sum();
    let percentages = by_category
        .iter()
        .map(|(category, value)| CategoryShare {
            category: category.clone(),
            percentage: percent_of(*value, total_debts),
            value: *value,
        })
        .collect();

    Some(Statistics {
        max_debt: max_debt.clone(),
        max_category: max_category.0.clone(),
        percentages,
        total_debts,
    })
}

/// `part / whole * 100`, zero when `whole` is zero.
pub fn percent_of(part: Decimal, whole: Decimal) -> Decimal {
    if whole.is_zero() {
        return Decimal::ZERO;
    }
    part.checked_div(whole)
        .and_then(|r| r.checked_mul(Decimal::ONE_HUNDRED))
        .unwrap_or_else(|| {
            if part.is_sign_negative() == whole.is_sign_negative() {
                Decimal::MAX
            } else {
                Decimal::MIN
            }
        })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalStatus {
    Completed,
    Overdue,
    InProgress,
}

impl fmt::Display for GoalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            GoalStatus::Completed => "completed",
            GoalStatus::Overdue => "overdue",
            GoalStatus::InProgress => "in progress",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GoalProgress {
    pub progress: Decimal,
    pub accumulated: Decimal,
    pub remaining: Decimal,
    pub status: GoalStatus,
    pub contributions: Vec<GoalContribution>,
}

/// Progress of `goal` as of `now`. Completion is checked before the deadline,
/// and the deadline day itself still counts as on time.
pub fn goal_progress(
    goal: &Goal,
    contributions: &[GoalContribution],
    now: NaiveDateTime,
) -> GoalProgress {
    let accumulated = goal.accumulated_value;
    let progress = percent_of(accumulated, goal.target_value)
        .clamp(Decimal::ZERO, Decimal::ONE_HUNDRED);
    let remaining = (goal.target_value - accumulated).max(Decimal::ZERO);
    let status = if progress >= Decimal::ONE_HUNDRED {
        GoalStatus::Completed
    } else if goal.end_date.is_some_and(|end| now > end_of_day(end)) {
        GoalStatus::Overdue
    } else {
        GoalStatus::InProgress
    };
    GoalProgress {
        progress,
        accumulated,
        remaining,
        status,
        contributions: contributions
            .iter()
            .filter(|c| c.goal_id == goal.id)
            .cloned()
            .collect(),
    }
}

/// What `accumulated_value` should be: the sum of the goal's contributions.
pub fn reconciled_accumulated(goal: &Goal, contributions: &[GoalContribution]) -> Decimal {
    contributions
        .iter()
        .filter(|c| c.goal_id == goal.id)
        .map(|c| c.value)
        .sum()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthPoint {
    pub month: String, // YYYY-MM
    pub incomes: Decimal,
    pub debts: Decimal,
    pub balance: Decimal,
}

/// Longest series `monthly_series` will build (twenty years).
pub const MAX_SERIES_MONTHS: usize = 240;

/// One point per month for the `months` months ending with `until`'s month,
/// oldest first, capped at [`MAX_SERIES_MONTHS`]. Debts are bucketed by due
/// date; dateless debts are skipped.
pub fn monthly_series(
    incomes: &[Income],
    debts: &[Debt],
    months: usize,
    until: NaiveDate,
) -> Vec<MonthPoint> {
    let mut buckets: BTreeMap<(i32, u32), (Decimal, Decimal)> = BTreeMap::new();
    for back in 0..months.min(MAX_SERIES_MONTHS) as i32 {
        let key = shift_month(until.year(), until.month(), -back);
        buckets.insert(key, (Decimal::ZERO, Decimal::ZERO));
    }
    for i in incomes {
        if let Some(entry) = buckets.get_mut(&(i.date.year(), i.date.month())) {
            entry.0 += i.value;
        }
    }
    for d in debts {
        let Some(due) = d.due_date else { continue };
        if let Some(entry) = buckets.get_mut(&(due.year(), due.month())) {
            entry.1 += d.value;
        }
    }
    buckets
        .into_iter()
        .map(|((y, m), (inc, debt))| MonthPoint {
            month: format!("{:04}-{:02}", y, m),
            incomes: inc,
            debts: debt,
            balance: inc - debt,
        })
        .collect()
}

fn shift_month(year: i32, month: u32, delta: i32) -> (i32, u32) {
    let idx = i64::from(year) * 12 + i64::from(month) - 1 + i64::from(delta);
    let y = idx.div_euclid(12);
    let m = idx.rem_euclid(12) + 1;
    (
        i32::try_from(y).unwrap_or(year),
        u32::try_from(m).unwrap_or(month),
    )
}
