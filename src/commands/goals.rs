// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::aggregate::GoalProgress;
use crate::models::{Goal, GoalPatch, NewGoal};
use crate::tracker::Tracker;
use crate::utils::{fmt_money, maybe_print_json, parse_date, parse_decimal, pretty_table};
use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::Serialize;

/// A goal with its progress as of now.
#[derive(Debug, Clone, Serialize)]
pub struct GoalRow {
    #[serde(flatten)]
    pub goal: Goal,
    #[serde(flatten)]
    pub progress: GoalProgress,
}

pub fn handle(tracker: &mut Tracker<'_>, m: &clap::ArgMatches) -> Result<()> {
    let now = chrono::Local::now().naive_local();
    match m.subcommand() {
        Some(("add", sub)) => {
            let id = tracker.add_goal(draft_from_args(sub)?)?;
            println!("Added goal {}", id);
        }
        Some(("list", sub)) => {
            let rows = query_rows(tracker, now)?;
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &rows)? {
                let data = rows
                    .iter()
                    .map(|r| {
                        vec![
                            r.goal.id.to_string(),
                            r.goal.name.clone(),
                            r.goal.category.clone(),
                            fmt_money(&r.progress.accumulated),
                            fmt_money(&r.goal.target_value),
                            format!("{:.1}%", r.progress.progress),
                            r.goal.end_date.map(|d| d.to_string()).unwrap_or_else(|| "-".into()),
                            r.progress.status.to_string(),
                        ]
                    })
                    .collect();
                println!(
                    "{}",
                    pretty_table(
                        &["ID", "Name", "Category", "Saved", "Target", "Progress", "Deadline", "Status"],
                        data
                    )
                );
            }
        }
        Some(("show", sub)) => {
            let id = *sub.get_one::<i64>("id").context("goal id is required")?;
            let row = GoalRow {
                goal: tracker.goal(id)?.clone(),
                progress: tracker.goal_progress(id, now)?,
            };
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &row)? {
                println!(
                    "{} [{}] {} of {} ({:.1}%, {} remaining), {}",
                    row.goal.name,
                    row.goal.category,
                    fmt_money(&row.progress.accumulated),
                    fmt_money(&row.goal.target_value),
                    row.progress.progress,
                    fmt_money(&row.progress.remaining),
                    row.progress.status
                );
                let data = row
                    .progress
                    .contributions
                    .iter()
                    .map(|c| {
                        vec![
                            c.id.to_string(),
                            c.created_at.format("%Y-%m-%d %H:%M").to_string(),
                            fmt_money(&c.value),
                            c.income_id.map(|i| i.to_string()).unwrap_or_default(),
                            c.description.clone().unwrap_or_default(),
                        ]
                    })
                    .collect();
                println!(
                    "{}",
                    pretty_table(&["ID", "When", "Value", "Income", "Description"], data)
                );
            }
        }
        Some(("edit", sub)) => {
            let id = *sub.get_one::<i64>("id").context("goal id is required")?;
            tracker.update_goal(id, patch_from_args(sub)?)?;
            println!("Updated goal {}", id);
        }
        Some(("rm", sub)) => {
            let id = *sub.get_one::<i64>("id").context("goal id is required")?;
            tracker.delete_goal(id)?;
            println!("Removed goal {}", id);
        }
        Some(("contribute", sub)) => {
            let cid = contribute(tracker, sub, now)?;
            println!("Added contribution {}", cid);
        }
        Some(("uncontribute", sub)) => {
            let id = *sub.get_one::<i64>("id").context("contribution id is required")?;
            tracker.remove_contribution(id)?;
            println!("Removed contribution {}", id);
        }
        _ => {}
    }
    Ok(())
}

pub fn draft_from_args(sub: &clap::ArgMatches) -> Result<NewGoal> {
    let start_date = match sub.get_one::<String>("start") {
        Some(s) => parse_date(s)?,
        None => chrono::Local::now().date_naive(),
    };
    Ok(NewGoal {
        name: sub.get_one::<String>("name").context("--name is required")?.clone(),
        category: sub
            .get_one::<String>("category")
            .context("--category is required")?
            .clone(),
        subcategory: sub.get_one::<String>("subcategory").cloned().unwrap_or_default(),
        target_value: parse_decimal(sub.get_one::<String>("target").context("--target is required")?)?,
        accumulated_value: sub
            .get_one::<String>("saved")
            .map(|s| parse_decimal(s))
            .transpose()?
            .unwrap_or(Decimal::ZERO),
        start_date,
        end_date: sub.get_one::<String>("end").map(|s| parse_date(s)).transpose()?,
    })
}

pub fn patch_from_args(sub: &clap::ArgMatches) -> Result<GoalPatch> {
    let end_date = if sub.get_flag("no-end") {
        Some(None)
    } else {
        sub.get_one::<String>("end")
            .map(|s| parse_date(s).map(Some))
            .transpose()?
    };
    Ok(GoalPatch {
        name: sub.get_one::<String>("name").cloned(),
        category: sub.get_one::<String>("category").cloned(),
        subcategory: sub.get_one::<String>("subcategory").cloned(),
        target_value: sub.get_one::<String>("target").map(|s| parse_decimal(s)).transpose()?,
        accumulated_value: None,
        start_date: sub.get_one::<String>("start").map(|s| parse_date(s)).transpose()?,
        end_date,
    })
}

pub fn contribute(
    tracker: &mut Tracker<'_>,
    sub: &clap::ArgMatches,
    at: NaiveDateTime,
) -> Result<i64> {
    let goal_id = *sub.get_one::<i64>("id").context("goal id is required")?;
    let note = sub.get_one::<String>("note").cloned();
    let id = match sub.get_one::<i64>("income") {
        Some(income_id) => tracker.contribute_income(goal_id, *income_id, note, at)?,
        None => {
            let value = parse_decimal(sub.get_one::<String>("value").context("--value is required")?)?;
            tracker.contribute(goal_id, value, note, at)?
        }
    };
    Ok(id)
}

pub fn query_rows(tracker: &Tracker<'_>, now: NaiveDateTime) -> Result<Vec<GoalRow>> {
    tracker
        .goals()
        .iter()
        .map(|g| -> Result<GoalRow> {
            Ok(GoalRow {
                goal: g.clone(),
                progress: tracker.goal_progress(g.id, now)?,
            })
        })
        .collect()
}
