// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::tracker::{ExportTemplate, Tracker};
use crate::utils::range_from_args;
use anyhow::{anyhow, Context, Result};

pub fn handle(tracker: &Tracker<'_>, m: &clap::ArgMatches) -> Result<()> {
    let Some((name, sub)) = m.subcommand() else {
        return Ok(());
    };
    let template = name.parse::<ExportTemplate>().map_err(|e| anyhow!(e))?;
    let csv = render(tracker, template, sub)?;
    match sub.get_one::<String>("out") {
        Some(out) => {
            std::fs::write(out, &csv).with_context(|| format!("Could not write {}", out))?;
            println!("Exported {} to {}", template, out);
        }
        None => print!("{}", csv),
    }
    Ok(())
}

pub fn render(
    tracker: &Tracker<'_>,
    template: ExportTemplate,
    sub: &clap::ArgMatches,
) -> Result<String> {
    let range = range_from_args(sub)?;
    Ok(tracker.export(template, &range)?)
}
