// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::tracker::{Reconciled, Tracker};
use crate::utils::{fmt_money, pretty_table};
use anyhow::Result;

/// Report goals whose accumulated value drifted from their contributions;
/// with `--fix`, rewrite them. Returns the drifted goals.
pub fn run(tracker: &mut Tracker<'_>, fix: bool) -> Result<Vec<Reconciled>> {
    let drifted = tracker.drifted_goals();
    if fix {
        for d in &drifted {
            tracker.reconcile_goal(d.goal_id)?;
        }
    }
    Ok(drifted)
}

pub fn handle(tracker: &mut Tracker<'_>, m: &clap::ArgMatches) -> Result<()> {
    let fix = m.get_flag("fix");
    let drifted = run(tracker, fix)?;
    if drifted.is_empty() {
        println!("doctor: no issues found");
        return Ok(());
    }
    let rows = drifted
        .iter()
        .map(|d| {
            vec![
                "accumulated_mismatch".into(),
                format!("goal {} '{}'", d.goal_id, d.name),
                fmt_money(&d.stored),
                fmt_money(&d.actual),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(&["Issue", "Detail", "Stored", "Contributions"], rows)
    );
    if fix {
        println!("Reconciled {} goal(s)", drifted.len());
    } else {
        println!("Run `pocketbook doctor --fix` to reconcile");
    }
    Ok(())
}
