// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::aggregate::filter_dated;
use crate::models::{Debt, DebtPatch, NewDebt, PaymentMethod};
use crate::tracker::Tracker;
use crate::utils::{fmt_money, maybe_print_json, parse_date, parse_decimal, pretty_table, range_from_args};
use anyhow::{anyhow, Context, Result};
use rust_decimal::Decimal;

pub fn handle(tracker: &mut Tracker<'_>, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let draft = draft_from_args(sub)?;
            let id = tracker.add_debt(draft)?;
            println!("Added debt {}", id);
        }
        Some(("list", sub)) => {
            let rows = query_rows(tracker, sub)?;
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &rows)? {
                let data = rows
                    .iter()
                    .map(|d| {
                        vec![
                            d.id.to_string(),
                            d.due_date.map(|x| x.to_string()).unwrap_or_else(|| "-".into()),
                            d.category.clone(),
                            d.subcategory.clone(),
                            fmt_money(&d.value),
                            format!("{}%", d.interest.normalize()),
                            d.installments.to_string(),
                            d.payment_method.to_string(),
                        ]
                    })
                    .collect();
                println!(
                    "{}",
                    pretty_table(
                        &["ID", "Due", "Category", "Subcategory", "Value", "Interest", "Inst.", "Method"],
                        data
                    )
                );
            }
        }
        Some(("rm", sub)) => {
            let id = *sub.get_one::<i64>("id").context("debt id is required")?;
            tracker.delete_debt(id)?;
            println!("Removed debt {}", id);
        }
        Some(("edit", sub)) => {
            let id = *sub.get_one::<i64>("id").context("debt id is required")?;
            tracker.update_debt(id, patch_from_args(sub)?)?;
            println!("Updated debt {}", id);
        }
        _ => {}
    }
    Ok(())
}

fn method_arg(sub: &clap::ArgMatches) -> Result<Option<PaymentMethod>> {
    sub.get_one::<String>("method")
        .map(|s| s.parse::<PaymentMethod>().map_err(|e| anyhow!(e)))
        .transpose()
}

pub fn draft_from_args(sub: &clap::ArgMatches) -> Result<NewDebt> {
    let category = sub.get_one::<String>("category").context("--category is required")?;
    let value = parse_decimal(sub.get_one::<String>("value").context("--value is required")?)?;
    let interest = match sub.get_one::<String>("interest") {
        Some(s) => parse_decimal(s)?,
        None => Decimal::ZERO,
    };
    let due_date = sub.get_one::<String>("due").map(|s| parse_date(s)).transpose()?;
    Ok(NewDebt {
        category: category.clone(),
        subcategory: sub.get_one::<String>("subcategory").cloned().unwrap_or_default(),
        value,
        interest,
        installments: sub.get_one::<u32>("installments").copied().unwrap_or(0),
        due_date,
        payment_method: method_arg(sub)?.unwrap_or_default(),
    })
}

pub fn patch_from_args(sub: &clap::ArgMatches) -> Result<DebtPatch> {
    let due_date = if sub.get_flag("no-due") {
        Some(None)
    } else {
        sub.get_one::<String>("due")
            .map(|s| parse_date(s).map(Some))
            .transpose()?
    };
    Ok(DebtPatch {
        category: sub.get_one::<String>("category").cloned(),
        subcategory: sub.get_one::<String>("subcategory").cloned(),
        value: sub.get_one::<String>("value").map(|s| parse_decimal(s)).transpose()?,
        interest: sub.get_one::<String>("interest").map(|s| parse_decimal(s)).transpose()?,
        installments: sub.get_one::<u32>("installments").copied(),
        due_date,
        payment_method: method_arg(sub)?,
    })
}

/// Debts due in the requested range; dateless debts only without a range.
pub fn query_rows(tracker: &Tracker<'_>, sub: &clap::ArgMatches) -> Result<Vec<Debt>> {
    let range = range_from_args(sub)?;
    Ok(filter_dated(tracker.debts(), &range))
}
