// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! CSV rendering of record sets.
//!
//! Fields are written as-is, comma-joined, with no quoting: a comma inside a
//! free-text field shifts the remaining columns of that row.

use crate::aggregate::Summary;
use crate::models::{Debt, Goal, GoalContribution, Income};
use crate::money::plain;
use csv::{QuoteStyle, Terminator, WriterBuilder};
use rust_decimal::Decimal;

/// A record type with a fixed export layout.
pub trait CsvRecord {
    const HEADER: &'static [&'static str];

    fn fields(&self) -> Vec<String>;
}

impl CsvRecord for Income {
    const HEADER: &'static [&'static str] = &["Category", "Subcategory", "Value", "Date"];

    fn fields(&self) -> Vec<String> {
        vec![
            self.category.clone(),
            self.subcategory.clone(),
            plain(&self.value),
            self.date.to_string(),
        ]
    }
}

impl CsvRecord for Debt {
    const HEADER: &'static [&'static str] = &[
        "Category",
        "Subcategory",
        "Value",
        "Interest",
        "Installments",
        "Due Date",
        "Payment Method",
    ];

    fn fields(&self) -> Vec<String> {
        vec![
            self.category.clone(),
            self.subcategory.clone(),
            plain(&self.value),
            blank_if_zero(self.interest),
            if self.installments == 0 {
                String::new()
            } else {
                self.installments.to_string()
            },
            self.due_date.map(|d| d.to_string()).unwrap_or_default(),
            self.payment_method.to_string(),
        ]
    }
}

impl CsvRecord for Goal {
    const HEADER: &'static [&'static str] = &[
        "Name",
        "Category",
        "Subcategory",
        "Target",
        "Accumulated",
        "Start Date",
        "End Date",
    ];

    fn fields(&self) -> Vec<String> {
        vec![
            self.name.clone(),
            self.category.clone(),
            self.subcategory.clone(),
            plain(&self.target_value),
            plain(&self.accumulated_value),
            self.start_date.to_string(),
            self.end_date.map(|d| d.to_string()).unwrap_or_default(),
        ]
    }
}

impl CsvRecord for GoalContribution {
    const HEADER: &'static [&'static str] =
        &["Goal", "Income", "Value", "Description", "Created At"];

    fn fields(&self) -> Vec<String> {
        vec![
            self.goal_id.to_string(),
            self.income_id.map(|i| i.to_string()).unwrap_or_default(),
            plain(&self.value),
            self.description.clone().unwrap_or_default(),
            self.created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
        ]
    }
}

impl CsvRecord for Summary {
    const HEADER: &'static [&'static str] = &["Incomes", "Debts", "Balance"];

    fn fields(&self) -> Vec<String> {
        vec![plain(&self.incomes), plain(&self.debts), plain(&self.balance)]
    }
}

fn blank_if_zero(d: Decimal) -> String {
    if d.is_zero() { String::new() } else { plain(&d) }
}

/// Header row followed by one line per record.
pub fn export_csv<R: CsvRecord>(records: &[R]) -> Result<String, csv::Error> {
    let mut wtr = WriterBuilder::new()
        .quote_style(QuoteStyle::Never)
        .terminator(Terminator::Any(b'\n'))
        .flexible(true)
        .from_writer(Vec::new());
    wtr.write_record(R::HEADER)?;
    for r in records {
        wtr.write_record(r.fields())?;
    }
    let bytes = wtr
        .into_inner()
        .map_err(|e| csv::Error::from(e.into_error()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
