// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::auth::SessionProvider;
use crate::utils::{maybe_print_json, pretty_table};
use anyhow::{Context, Result};

pub fn handle(sessions: &mut dyn SessionProvider, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("signup", sub)) => {
            let email = sub.get_one::<String>("email").context("--email is required")?;
            let password = sub.get_one::<String>("password").context("--password is required")?;
            let name = sub.get_one::<String>("name").context("--name is required")?;
            let s = sessions.sign_up(email, password, name)?;
            println!("Welcome, {}! Signed in as {}", s.display_name, s.email);
        }
        Some(("signin", sub)) => {
            let email = sub.get_one::<String>("email").context("--email is required")?;
            let password = sub.get_one::<String>("password").context("--password is required")?;
            let s = sessions.sign_in(email, password)?;
            println!("Signed in as {}", s.email);
        }
        Some(("signout", _)) => {
            sessions.sign_out()?;
            println!("Signed out");
        }
        Some(("whoami", sub)) => match sessions.current_session() {
            Some(s) => {
                let mut shown = s.clone();
                shown.access_token = None;
                if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &shown)? {
                    println!(
                        "{}",
                        pretty_table(
                            &["Name", "Email", "Id"],
                            vec![vec![s.display_name, s.email, s.owner.to_string()]]
                        )
                    );
                }
            }
            None => println!("Not signed in"),
        },
        _ => {}
    }
    Ok(())
}
