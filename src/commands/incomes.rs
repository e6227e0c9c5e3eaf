// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::aggregate::filter_dated;
use crate::models::{Income, NewIncome};
use crate::tracker::Tracker;
use crate::utils::{fmt_money, maybe_print_json, parse_date, parse_decimal, pretty_table, range_from_args};
use anyhow::{Context, Result};

pub fn handle(tracker: &mut Tracker<'_>, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let draft = draft_from_args(sub)?;
            let id = tracker.add_income(draft)?;
            println!("Added income {}", id);
        }
        Some(("list", sub)) => {
            let rows = query_rows(tracker, sub)?;
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &rows)? {
                let data = rows
                    .iter()
                    .map(|i| {
                        vec![
                            i.id.to_string(),
                            i.date.to_string(),
                            i.category.clone(),
                            i.subcategory.clone(),
                            fmt_money(&i.value),
                        ]
                    })
                    .collect();
                println!(
                    "{}",
                    pretty_table(&["ID", "Date", "Category", "Subcategory", "Value"], data)
                );
            }
        }
        Some(("rm", sub)) => {
            let id = *sub.get_one::<i64>("id").context("income id is required")?;
            tracker.delete_income(id)?;
            println!("Removed income {}", id);
        }
        _ => {}
    }
    Ok(())
}

pub fn draft_from_args(sub: &clap::ArgMatches) -> Result<NewIncome> {
    let category = sub.get_one::<String>("category").context("--category is required")?;
    let value = parse_decimal(sub.get_one::<String>("value").context("--value is required")?)?;
    let date = match sub.get_one::<String>("date") {
        Some(d) => parse_date(d)?,
        None => chrono::Local::now().date_naive(),
    };
    Ok(NewIncome {
        category: category.clone(),
        subcategory: sub.get_one::<String>("subcategory").cloned().unwrap_or_default(),
        value,
        date,
    })
}

/// Incomes in the requested range, newest first.
pub fn query_rows(tracker: &Tracker<'_>, sub: &clap::ArgMatches) -> Result<Vec<Income>> {
    let range = range_from_args(sub)?;
    Ok(filter_dated(tracker.incomes(), &range))
}
