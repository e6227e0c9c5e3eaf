// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;

use pocketbook::backend::Backend;
use pocketbook::config::Settings;
use pocketbook::errors::FinanceError;
use pocketbook::tracker::Tracker;
use pocketbook::{cli, commands, utils};

fn main() -> Result<()> {
    utils::init_tracing();
    let matches = cli::build_cli().get_matches();

    let settings = match Settings::from_env() {
        Ok(s) => s,
        Err(err) => {
            eprintln!("pocketbook is not configured: {}", err);
            eprintln!("Set POCKETBOOK_BACKEND (sqlite|memory|rest); the rest backend also needs POCKETBOOK_URL and POCKETBOOK_KEY.");
            std::process::exit(2);
        }
    };
    let mut backend = match Backend::connect(&settings) {
        Ok(b) => b,
        Err(FinanceError::Config(err)) => {
            eprintln!("pocketbook is not configured: {}", err);
            std::process::exit(2);
        }
        Err(err) => return Err(err.into()),
    };

    match matches.subcommand() {
        Some(("init", _)) => {
            println!("Data store ready at {}", backend.location);
            return Ok(());
        }
        Some(("auth", sub)) => return commands::auth::handle(backend.sessions.as_mut(), sub),
        Some(("category", sub)) => return commands::categories::handle(sub),
        None => {
            cli::build_cli().print_help()?;
            println!();
            return Ok(());
        }
        Some(_) => {}
    }

    let session = backend
        .sessions
        .current_session()
        .ok_or(FinanceError::NotSignedIn)?;
    let mut tracker = Tracker::load(backend.store.as_mut(), session.owner)?;

    match matches.subcommand() {
        Some(("income", sub)) => commands::incomes::handle(&mut tracker, sub)?,
        Some(("debt", sub)) => commands::debts::handle(&mut tracker, sub)?,
        Some(("goal", sub)) => commands::goals::handle(&mut tracker, sub)?,
        Some(("report", sub)) => commands::reports::handle(&tracker, sub)?,
        Some(("export", sub)) => commands::exporter::handle(&tracker, sub)?,
        Some(("doctor", sub)) => commands::doctor::handle(&mut tracker, sub)?,
        _ => {
            cli::build_cli().print_help()?;
            println!();
        }
    }
    Ok(())
}
