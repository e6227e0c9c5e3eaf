// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{value_parser, Arg, ArgAction, Command};

fn json_args(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .conflicts_with("jsonl")
            .help("Print as pretty JSON"),
    )
    .arg(
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .help("Print as JSON lines"),
    )
}

fn range_args(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("month")
            .long("month")
            .value_name("YYYY-MM")
            .conflicts_with_all(["from", "to"])
            .help("Restrict to one calendar month"),
    )
    .arg(
        Arg::new("from")
            .long("from")
            .value_name("YYYY-MM-DD")
            .help("Start of the range (inclusive)"),
    )
    .arg(
        Arg::new("to")
            .long("to")
            .value_name("YYYY-MM-DD")
            .help("End of the range (inclusive)"),
    )
}

fn id_arg(help: &'static str) -> Arg {
    Arg::new("id")
        .required(true)
        .value_parser(value_parser!(i64))
        .help(help)
}

fn classification_args(cmd: Command, required: bool) -> Command {
    cmd.arg(
        Arg::new("category")
            .long("category")
            .required(required)
            .help("Category (see `category list`)"),
    )
    .arg(
        Arg::new("subcategory")
            .long("subcategory")
            .help("Subcategory"),
    )
}

fn auth_cmd() -> Command {
    Command::new("auth")
        .about("Sign up, sign in and out")
        .subcommand_required(true)
        .subcommand(
            Command::new("signup")
                .about("Create an account and sign in")
                .arg(Arg::new("email").long("email").required(true))
                .arg(Arg::new("password").long("password").required(true))
                .arg(Arg::new("name").long("name").required(true).help("Display name")),
        )
        .subcommand(
            Command::new("signin")
                .about("Sign in to an existing account")
                .arg(Arg::new("email").long("email").required(true))
                .arg(Arg::new("password").long("password").required(true)),
        )
        .subcommand(Command::new("signout").about("Forget the current session"))
        .subcommand(json_args(
            Command::new("whoami").about("Show the signed-in account"),
        ))
}

fn income_cmd() -> Command {
    Command::new("income")
        .about("Record and list incomes")
        .subcommand_required(true)
        .subcommand(
            classification_args(Command::new("add").about("Add an income"), true)
                .arg(Arg::new("value").long("value").required(true))
                .arg(
                    Arg::new("date")
                        .long("date")
                        .value_name("YYYY-MM-DD")
                        .help("Defaults to today"),
                ),
        )
        .subcommand(json_args(range_args(
            Command::new("list").about("List incomes, newest first"),
        )))
        .subcommand(Command::new("rm").about("Delete an income").arg(id_arg("Income id")))
}

fn debt_value_args(cmd: Command) -> Command {
    cmd.arg(Arg::new("value").long("value"))
        .arg(Arg::new("interest").long("interest").help("Interest rate, percent"))
        .arg(
            Arg::new("installments")
                .long("installments")
                .value_parser(value_parser!(u32)),
        )
        .arg(
            Arg::new("due")
                .long("due")
                .value_name("YYYY-MM-DD")
                .help("Due date"),
        )
        .arg(
            Arg::new("method")
                .long("method")
                .help("cash|instant_transfer|bank_slip|credit_card|debit_card|other"),
        )
}

fn debt_cmd() -> Command {
    Command::new("debt")
        .about("Record and list debts")
        .subcommand_required(true)
        .subcommand(
            debt_value_args(classification_args(
                Command::new("add").about("Add a debt"),
                true,
            ))
            .mut_arg("value", |a| a.required(true)),
        )
        .subcommand(json_args(range_args(
            Command::new("list").about("List debts by due date"),
        )))
        .subcommand(Command::new("rm").about("Delete a debt").arg(id_arg("Debt id")))
        .subcommand(
            debt_value_args(classification_args(
                Command::new("edit").about("Change fields of a debt"),
                false,
            ))
            .arg(id_arg("Debt id"))
            .arg(
                Arg::new("no-due")
                    .long("no-due")
                    .action(ArgAction::SetTrue)
                    .conflicts_with("due")
                    .help("Clear the due date"),
            ),
        )
}

fn goal_cmd() -> Command {
    Command::new("goal")
        .about("Savings goals and their contributions")
        .subcommand_required(true)
        .subcommand(
            classification_args(Command::new("add").about("Add a goal"), true)
                .arg(Arg::new("name").long("name").required(true))
                .arg(Arg::new("target").long("target").required(true))
                .arg(
                    Arg::new("saved")
                        .long("saved")
                        .help("Amount already saved; recorded as an opening contribution"),
                )
                .arg(
                    Arg::new("start")
                        .long("start")
                        .value_name("YYYY-MM-DD")
                        .help("Defaults to today"),
                )
                .arg(Arg::new("end").long("end").value_name("YYYY-MM-DD")),
        )
        .subcommand(json_args(Command::new("list").about("List goals with progress")))
        .subcommand(json_args(
            Command::new("show")
                .about("Show one goal and its contributions")
                .arg(id_arg("Goal id")),
        ))
        .subcommand(
            classification_args(Command::new("edit").about("Change fields of a goal"), false)
                .arg(id_arg("Goal id"))
                .arg(Arg::new("name").long("name"))
                .arg(Arg::new("target").long("target"))
                .arg(Arg::new("start").long("start").value_name("YYYY-MM-DD"))
                .arg(Arg::new("end").long("end").value_name("YYYY-MM-DD"))
                .arg(
                    Arg::new("no-end")
                        .long("no-end")
                        .action(ArgAction::SetTrue)
                        .conflicts_with("end")
                        .help("Clear the deadline"),
                ),
        )
        .subcommand(
            Command::new("rm")
                .about("Delete a goal and its contributions")
                .arg(id_arg("Goal id")),
        )
        .subcommand(
            Command::new("contribute")
                .about("Add a contribution to a goal")
                .arg(id_arg("Goal id"))
                .arg(
                    Arg::new("value")
                        .long("value")
                        .required_unless_present("income"),
                )
                .arg(
                    Arg::new("income")
                        .long("income")
                        .value_parser(value_parser!(i64))
                        .conflicts_with("value")
                        .help("Contribute the full value of this income"),
                )
                .arg(Arg::new("note").long("note").help("Description")),
        )
        .subcommand(
            Command::new("uncontribute")
                .about("Remove a contribution")
                .arg(id_arg("Contribution id")),
        )
}

fn report_cmd() -> Command {
    Command::new("report")
        .about("Aggregated views")
        .subcommand_required(true)
        .subcommand(json_args(range_args(
            Command::new("summary").about("Incomes, debts and balance"),
        )))
        .subcommand(json_args(
            Command::new("totals").about("All-time totals"),
        ))
        .subcommand(json_args(range_args(
            Command::new("stats").about("Largest debt and category breakdown"),
        )))
        .subcommand(json_args(
            Command::new("chart")
                .about("Monthly incomes and debts")
                .arg(
                    Arg::new("months")
                        .long("months")
                        .value_parser(value_parser!(u16).range(1..=240))
                        .default_value("6")
                        .help("Number of months to show (1-240)"),
                )
                .arg(
                    Arg::new("until")
                        .long("until")
                        .value_name("YYYY-MM")
                        .help("Last month of the series; defaults to this month"),
                ),
        ))
}

fn export_cmd() -> Command {
    let template = |name: &'static str, about: &'static str| {
        range_args(Command::new(name).about(about)).arg(
            Arg::new("out")
                .long("out")
                .value_name("PATH")
                .help("Write to a file instead of stdout"),
        )
    };
    Command::new("export")
        .about("CSV export")
        .subcommand_required(true)
        .subcommand(template("incomes", "Export incomes"))
        .subcommand(template("debts", "Export debts"))
        .subcommand(template("goals", "Export goals"))
        .subcommand(template("contributions", "Export goal contributions"))
        .subcommand(template("summary", "Export the summary row"))
}

pub fn build_cli() -> Command {
    Command::new("pocketbook")
        .about("Personal incomes, debts and savings goals")
        .version(env!("CARGO_PKG_VERSION"))
        .subcommand(Command::new("init").about("Create the local database"))
        .subcommand(auth_cmd())
        .subcommand(income_cmd())
        .subcommand(debt_cmd())
        .subcommand(goal_cmd())
        .subcommand(report_cmd())
        .subcommand(export_cmd())
        .subcommand(
            Command::new("category")
                .about("Suggested categories")
                .subcommand_required(true)
                .subcommand(json_args(
                    Command::new("list").about("List suggested categories").arg(
                        Arg::new("kind")
                            .long("kind")
                            .value_parser(["income", "debt", "goal"])
                            .help("Only this record kind"),
                    ),
                )),
        )
        .subcommand(
            Command::new("doctor")
                .about("Check goals against their contributions")
                .arg(
                    Arg::new("fix")
                        .long("fix")
                        .action(ArgAction::SetTrue)
                        .help("Rewrite drifted accumulated values"),
                ),
        )
}
