// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::aggregate::DateRange;
use anyhow::{bail, Context, Result};
use chrono::{Datelike, NaiveDate};
use comfy_table::{presets::UTF8_FULL, Cell, Table};
use rust_decimal::Decimal;
use std::sync::Once;
use tracing_subscriber::EnvFilter;

const UA: &str = concat!(
    "pocketbook/",
    env!("CARGO_PKG_VERSION"),
    " (+https://github.com/alphavelocity/pocketbook)"
);

static TRACING: Once = Once::new();

/// Install the stderr subscriber once. `RUST_LOG` overrides the default
/// `pocketbook=warn` directive.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("pocketbook=warn"));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .try_init();
    });
}

pub fn http_client() -> reqwest::Result<reqwest::blocking::Client> {
    reqwest::blocking::Client::builder()
        .timeout(std::time::Duration::from_secs(15))
        .user_agent(UA)
        .build()
}

pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{}', expected YYYY-MM-DD", s))
}

/// `YYYY-MM` as `(year, month)`.
pub fn parse_month(s: &str) -> Result<(i32, u32)> {
    let d = NaiveDate::parse_from_str(&format!("{}-01", s), "%Y-%m-%d")
        .with_context(|| format!("Invalid month '{}', expected YYYY-MM", s))?;
    Ok((d.year(), d.month()))
}

pub fn parse_decimal(s: &str) -> Result<Decimal> {
    s.trim()
        .parse::<Decimal>()
        .with_context(|| format!("Invalid decimal '{}'", s))
}

pub fn fmt_money(d: &Decimal) -> String {
    format!("{:.2}", d.round_dp(2))
}

pub fn pretty_table(headers: &[&str], rows: Vec<Vec<String>>) -> Table {
    let mut t = Table::new();
    t.load_preset(UTF8_FULL);
    t.set_header(headers.iter().map(|h| Cell::new(*h)));
    for r in rows {
        t.add_row(r.into_iter().map(Cell::new));
    }
    t
}

/// Range from `--month` or `--from`/`--to`; neither means everything.
pub fn range_from_args(m: &clap::ArgMatches) -> Result<DateRange> {
    let month = m.get_one::<String>("month");
    let from = m.get_one::<String>("from");
    let to = m.get_one::<String>("to");
    if let Some(month) = month {
        if from.is_some() || to.is_some() {
            bail!("--month cannot be combined with --from/--to");
        }
        let (y, mo) = parse_month(month)?;
        return DateRange::month(y, mo)
            .with_context(|| format!("Invalid month '{}'", month));
    }
    let start = from.map(|s| parse_date(s)).transpose()?;
    let end = to.map(|s| parse_date(s)).transpose()?;
    if let (Some(s), Some(e)) = (start, end) {
        if e < s {
            bail!("--to {} is before --from {}", e, s);
        }
    }
    Ok(DateRange::new(start, end))
}

pub fn maybe_print_json<T: serde::Serialize>(
    json_flag: bool,
    jsonl_flag: bool,
    v: &T,
) -> Result<bool> {
    if json_flag {
        println!("{}", serde_json::to_string_pretty(v)?);
        return Ok(true);
    }
    if jsonl_flag {
        // Arrays stream one element per line.
        let val = serde_json::to_value(v)?;
        if let Some(arr) = val.as_array() {
            for item in arr {
                println!("{}", serde_json::to_string(item)?);
            }
        } else {
            println!("{}", serde_json::to_string(&val)?);
        }
        return Ok(true);
    }
    Ok(false)
}
