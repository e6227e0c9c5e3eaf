// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::aggregate::{DateRange, MonthPoint};
use crate::tracker::Tracker;
use crate::utils::{fmt_money, maybe_print_json, parse_month, pretty_table, range_from_args};
use anyhow::{Context, Result};

pub fn handle(tracker: &Tracker<'_>, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("summary", sub)) => summary(tracker, sub)?,
        Some(("totals", sub)) => totals(tracker, sub)?,
        Some(("stats", sub)) => stats(tracker, sub)?,
        Some(("chart", sub)) => chart(tracker, sub)?,
        _ => {}
    }
    Ok(())
}

fn summary(tracker: &Tracker<'_>, sub: &clap::ArgMatches) -> Result<()> {
    let range = range_from_args(sub)?;
    let s = tracker.summary(&range);
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &s)? {
        println!(
            "{}",
            pretty_table(
                &["Incomes", "Debts", "Balance"],
                vec![vec![fmt_money(&s.incomes), fmt_money(&s.debts), fmt_money(&s.balance)]]
            )
        );
    }
    Ok(())
}

fn totals(tracker: &Tracker<'_>, sub: &clap::ArgMatches) -> Result<()> {
    let t = tracker.totals();
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &t)? {
        println!(
            "{}",
            pretty_table(
                &["Total incomes", "Total debts"],
                vec![vec![fmt_money(&t.total_incomes), fmt_money(&t.total_debts)]]
            )
        );
    }
    Ok(())
}

fn stats(tracker: &Tracker<'_>, sub: &clap::ArgMatches) -> Result<()> {
    let range = range_from_args(sub)?;
    let stats = tracker.statistics(&range);
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &stats)? {
        return Ok(());
    }
    let Some(stats) = stats else {
        println!("No debts in range");
        return Ok(());
    };
    println!(
        "Largest debt: {} {} ({})",
        stats.max_debt.category,
        fmt_money(&stats.max_debt.value),
        stats
            .max_debt
            .due_date
            .map(|d| d.to_string())
            .unwrap_or_else(|| "no due date".into())
    );
    println!("Top category: {}", stats.max_category);
    let data = stats
        .percentages
        .iter()
        .map(|c| {
            vec![
                c.category.clone(),
                fmt_money(&c.value),
                format!("{:.1}%", c.percentage),
            ]
        })
        .collect();
    println!("{}", pretty_table(&["Category", "Value", "Share"], data));
    println!("Total: {}", fmt_money(&stats.total_debts));
    Ok(())
}

/// Series for `report chart`: `--months` points ending at `--until`.
pub fn chart_points(tracker: &Tracker<'_>, sub: &clap::ArgMatches) -> Result<Vec<MonthPoint>> {
    let months = usize::from(*sub.get_one::<u16>("months").unwrap_or(&6));
    let until = match sub.get_one::<String>("until") {
        Some(s) => {
            let (y, m) = parse_month(s)?;
            DateRange::month(y, m)
                .and_then(|r| r.end)
                .with_context(|| format!("Invalid month '{}'", s))?
        }
        None => chrono::Local::now().date_naive(),
    };
    Ok(tracker.monthly_series(months, until))
}

fn chart(tracker: &Tracker<'_>, sub: &clap::ArgMatches) -> Result<()> {
    let points = chart_points(tracker, sub)?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &points)? {
        let data = points
            .iter()
            .map(|p| {
                vec![
                    p.month.clone(),
                    fmt_money(&p.incomes),
                    fmt_money(&p.debts),
                    fmt_money(&p.balance),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Month", "Incomes", "Debts", "Balance"], data)
        );
    }
    Ok(())
}
