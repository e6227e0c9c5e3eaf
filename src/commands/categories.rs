// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::categories::{category_list, subcategories, RecordKind};
use crate::utils::{maybe_print_json, pretty_table};
use anyhow::{anyhow, Result};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct CategoryRow {
    pub kind: String,
    pub category: &'static str,
    pub subcategories: &'static [&'static str],
}

pub fn handle(m: &clap::ArgMatches) -> Result<()> {
    if let Some(("list", sub)) = m.subcommand() {
        let rows = query_rows(sub)?;
        if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &rows)? {
            let data = rows
                .iter()
                .map(|r| vec![r.kind.clone(), r.category.to_string(), r.subcategories.join(", ")])
                .collect();
            println!("{}", pretty_table(&["Kind", "Category", "Subcategories"], data));
        }
    }
    Ok(())
}

pub fn query_rows(sub: &clap::ArgMatches) -> Result<Vec<CategoryRow>> {
    let kinds = match sub.get_one::<String>("kind") {
        Some(k) => vec![k.parse::<RecordKind>().map_err(|e| anyhow!(e))?],
        None => vec![RecordKind::Income, RecordKind::Debt, RecordKind::Goal],
    };
    Ok(kinds
        .into_iter()
        .flat_map(|kind| {
            category_list(kind).into_iter().map(move |category| CategoryRow {
                kind: kind.to_string(),
                category,
                subcategories: subcategories(kind, category),
            })
        })
        .collect())
}
