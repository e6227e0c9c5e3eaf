// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::money;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// Identity of the signed-in user every record is scoped to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OwnerId(String);

impl OwnerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OwnerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Cash,
    #[default]
    InstantTransfer,
    BankSlip,
    CreditCard,
    DebitCard,
    #[serde(other)]
    Other,
}

impl PaymentMethod {
    pub const ALL: [PaymentMethod; 6] = [
        PaymentMethod::Cash,
        PaymentMethod::InstantTransfer,
        PaymentMethod::BankSlip,
        PaymentMethod::CreditCard,
        PaymentMethod::DebitCard,
        PaymentMethod::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "cash",
            PaymentMethod::InstantTransfer => "instant_transfer",
            PaymentMethod::BankSlip => "bank_slip",
            PaymentMethod::CreditCard => "credit_card",
            PaymentMethod::DebitCard => "debit_card",
            PaymentMethod::Other => "other",
        }
    }

    /// Settled on the spot: no interest, installments, or due date apply.
    pub fn is_instant(&self) -> bool {
        matches!(self, PaymentMethod::Cash | PaymentMethod::InstantTransfer)
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        match key.as_str() {
            "cash" => Ok(PaymentMethod::Cash),
            "instant_transfer" | "pix" => Ok(PaymentMethod::InstantTransfer),
            "bank_slip" | "boleto" => Ok(PaymentMethod::BankSlip),
            "credit_card" => Ok(PaymentMethod::CreditCard),
            "debit_card" => Ok(PaymentMethod::DebitCard),
            "other" => Ok(PaymentMethod::Other),
            _ => Err(format!(
                "Unknown payment method '{}' (use cash|instant_transfer|bank_slip|credit_card|debit_card|other)",
                s
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Income {
    pub id: i64,
    #[serde(rename = "user_id")]
    pub owner: OwnerId,
    pub category: String,
    #[serde(default, deserialize_with = "text_or_empty")]
    pub subcategory: String,
    #[serde(deserialize_with = "money::lenient")]
    pub value: Decimal,
    pub date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Debt {
    pub id: i64,
    #[serde(rename = "user_id")]
    pub owner: OwnerId,
    pub category: String,
    #[serde(default, deserialize_with = "text_or_empty")]
    pub subcategory: String,
    #[serde(deserialize_with = "money::lenient")]
    pub value: Decimal,
    #[serde(default, deserialize_with = "money::lenient")]
    pub interest: Decimal, // percent
    #[serde(default, deserialize_with = "lenient_count")]
    pub installments: u32,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub payment_method: PaymentMethod,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Goal {
    pub id: i64,
    #[serde(rename = "user_id")]
    pub owner: OwnerId,
    pub name: String,
    pub category: String,
    #[serde(default, deserialize_with = "text_or_empty")]
    pub subcategory: String,
    #[serde(deserialize_with = "money::lenient")]
    pub target_value: Decimal,
    #[serde(default, deserialize_with = "money::lenient")]
    pub accumulated_value: Decimal,
    pub start_date: NaiveDate,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoalContribution {
    pub id: i64,
    #[serde(rename = "user_id")]
    pub owner: OwnerId,
    pub goal_id: i64,
    #[serde(default)]
    pub income_id: Option<i64>,
    #[serde(deserialize_with = "money::lenient")]
    pub value: Decimal,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(deserialize_with = "lenient_timestamp")]
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewIncome {
    pub category: String,
    pub subcategory: String,
    pub value: Decimal,
    pub date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewDebt {
    pub category: String,
    pub subcategory: String,
    pub value: Decimal,
    pub interest: Decimal,
    pub installments: u32,
    pub due_date: Option<NaiveDate>,
    pub payment_method: PaymentMethod,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewGoal {
    pub name: String,
    pub category: String,
    pub subcategory: String,
    pub target_value: Decimal,
    pub accumulated_value: Decimal,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewContribution {
    pub goal_id: i64,
    pub income_id: Option<i64>,
    pub value: Decimal,
    pub description: Option<String>,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct IncomePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subcategory: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DebtPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subcategory: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interest: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub installments: Option<u32>,
    /// `Some(None)` clears the due date.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<Option<NaiveDate>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<PaymentMethod>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GoalPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subcategory: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_value: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accumulated_value: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    /// `Some(None)` clears the deadline.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<Option<NaiveDate>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ContributionPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<Option<String>>,
}

/// Full record sets of one owner, as last loaded from the store.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Records {
    pub incomes: Vec<Income>,
    pub debts: Vec<Debt>,
    pub goals: Vec<Goal>,
    pub contributions: Vec<GoalContribution>,
}

fn text_or_empty<'de, D>(d: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(d)?.unwrap_or_default())
}

fn lenient_count<'de, D>(d: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let n = match Value::deserialize(d)? {
        Value::Number(n) => n.as_u64().unwrap_or(0),
        Value::String(s) => s.trim().parse::<u64>().unwrap_or(0),
        _ => 0,
    };
    Ok(u32::try_from(n).unwrap_or(u32::MAX))
}

/// Accepts local `YYYY-MM-DDTHH:MM:SS[.fff]`, SQLite's `YYYY-MM-DD HH:MM:SS`,
/// and RFC 3339 timestamps with an offset.
fn lenient_timestamp<'de, D>(d: D) -> Result<NaiveDateTime, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(d)?;
    let s = raw.trim();
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f"))
        .or_else(|_| DateTime::parse_from_rfc3339(s).map(|dt| dt.naive_local()))
        .map_err(|_| serde::de::Error::custom(format!("invalid timestamp '{}'", raw)))
}
