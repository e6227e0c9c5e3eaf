// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Suggested category/subcategory taxonomy. Suggestions only; records may
//! carry any free-form category.

use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    Income,
    Debt,
    Goal,
}

impl FromStr for RecordKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "income" | "incomes" => Ok(RecordKind::Income),
            "debt" | "debts" => Ok(RecordKind::Debt),
            "goal" | "goals" => Ok(RecordKind::Goal),
            other => Err(format!("Unknown kind '{}' (use income|debt|goal)", other)),
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RecordKind::Income => "income",
            RecordKind::Debt => "debt",
            RecordKind::Goal => "goal",
        })
    }
}

type Taxonomy = &'static [(&'static str, &'static [&'static str])];

const INCOME: Taxonomy = &[
    (
        "Salary",
        &["Monthly salary", "Overtime", "Commission", "Bonus", "Profit sharing"],
    ),
    (
        "Side income",
        &["Freelance", "Self-employed services", "Temporary work", "Apps"],
    ),
    ("Business", &["Revenue", "Monthly profit", "Partner withdrawal"]),
    (
        "Investments",
        &["Dividends", "Interest", "Investment funds", "Crypto", "Fixed income"],
    ),
    (
        "Sales",
        &["Product sales", "Online sales", "Marketplace", "Used goods"],
    ),
    ("Benefits", &["Food allowance", "Meal allowance", "Assistance"]),
    ("Refunds", &["Medical refund", "Business refund", "Chargeback"]),
    ("Other", &["Prizes", "Donations", "Compensation"]),
];

const DEBT: Taxonomy = &[
    ("Housing", &["Rent", "Mortgage", "Condo fees", "Property tax"]),
    (
        "Utilities",
        &["Water", "Electricity", "Gas", "Internet", "Phone"],
    ),
    ("Food", &["Groceries", "Restaurant", "Delivery", "Snacks"]),
    (
        "Transport",
        &["Fuel", "Public transport", "Ride apps", "Maintenance", "Insurance"],
    ),
    (
        "Credit card",
        &["Monthly bill", "Installments", "Interest", "Annual fee"],
    ),
    (
        "Loans",
        &["Personal loan", "Financing", "Installments", "Interest"],
    ),
    ("Health", &["Health plan", "Appointments", "Medicine"]),
    ("Education", &["University", "Courses", "Supplies"]),
    ("Leisure", &["Streaming", "Travel", "Games", "Cinema"]),
    ("Shopping", &["Clothes", "Electronics", "Gifts"]),
    ("Taxes and fees", &["Income tax", "Fines", "Bank fees"]),
    ("Other", &["Unexpected expenses", "Adjustments"]),
];

const GOAL: Taxonomy = &[
    ("Savings", &["Emergency fund", "Put money aside", "Assets"]),
    ("Home", &["Renovation", "Buy a home"]),
    ("Vehicles", &["Car", "Motorcycle"]),
    ("Travel", &["Domestic trip", "International trip"]),
    ("Education", &["Courses", "University"]),
    ("Investments", &["Stocks", "Crypto"]),
    ("Pay off debts", &["Credit card", "Loans"]),
    ("Other", &["Other"]),
];

fn taxonomy(kind: RecordKind) -> Taxonomy {
    match kind {
        RecordKind::Income => INCOME,
        RecordKind::Debt => DEBT,
        RecordKind::Goal => GOAL,
    }
}

pub fn category_list(kind: RecordKind) -> Vec<&'static str> {
    taxonomy(kind).iter().map(|(c, _)| *c).collect()
}

/// Suggested subcategories; empty for categories outside the taxonomy.
pub fn subcategories(kind: RecordKind, category: &str) -> &'static [&'static str] {
    taxonomy(kind)
        .iter()
        .find(|(c, _)| c.eq_ignore_ascii_case(category.trim()))
        .map(|(_, subs)| *subs)
        .unwrap_or(&[])
}

pub fn is_suggested(kind: RecordKind, category: &str) -> bool {
    taxonomy(kind)
        .iter()
        .any(|(c, _)| c.eq_ignore_ascii_case(category.trim()))
}
