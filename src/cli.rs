// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command, crate_version, value_parser};

fn json_flags(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .help("Emit pretty JSON instead of a table"),
    )
    .arg(
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .help("Emit JSON lines instead of a table"),
    )
}

pub fn build_cli() -> Command {
    Command::new("burnrate")
        .version(crate_version!())
        .about("Founder finance tracking, burn metrics, and MRR goal projection")
        .subcommand(
            Command::new("init")
                .about("Write the backend connection config")
                .arg(
                    Arg::new("url")
                        .long("url")
                        .required(true)
                        .help("Backend base URL"),
                )
                .arg(
                    Arg::new("api-key")
                        .long("api-key")
                        .required(true)
                        .help("Publishable API key"),
                ),
        )
        .subcommand(
            Command::new("auth")
                .about("Manage the signed-in identity")
                .subcommand(
                    Command::new("login")
                        .about("Sign in with email and password")
                        .arg(Arg::new("email").long("email").required(true))
                        .arg(Arg::new("password").long("password").required(true)),
                )
                .subcommand(
                    Command::new("signup")
                        .about("Create an account")
                        .arg(Arg::new("email").long("email").required(true))
                        .arg(Arg::new("password").long("password").required(true))
                        .arg(Arg::new("name").long("name").help("Display name")),
                )
                .subcommand(Command::new("logout").about("Sign out and clear the stored session"))
                .subcommand(Command::new("whoami").about("Show the current identity")),
        )
        .subcommand(
            Command::new("tx")
                .about("Record and inspect transactions")
                .subcommand(
                    Command::new("add")
                        .about("Record a transaction")
                        .arg(Arg::new("amount").long("amount").required(true))
                        .arg(Arg::new("desc").long("desc").required(true))
                        .arg(
                            Arg::new("kind")
                                .long("kind")
                                .default_value("expense")
                                .help("income|expense"),
                        )
                        .arg(
                            Arg::new("category")
                                .long("category")
                                .help("Defaults to Salary for income, Software for expense"),
                        )
                        .arg(
                            Arg::new("date")
                                .long("date")
                                .help("YYYY-MM-DD, defaults to today"),
                        )
                        .arg(
                            Arg::new("account")
                                .long("account")
                                .default_value("personal")
                                .help("personal|business"),
                        )
                        .arg(
                            Arg::new("recurring")
                                .long("recurring")
                                .action(ArgAction::SetTrue)
                                .help("Mark as a recurring entry (informational)"),
                        ),
                )
                .subcommand(json_flags(
                    Command::new("list")
                        .about("List transactions")
                        .arg(
                            Arg::new("account")
                                .long("account")
                                .help("Filter: personal|business"),
                        )
                        .arg(Arg::new("kind").long("kind").help("Filter: income|expense"))
                        .arg(
                            Arg::new("limit")
                                .long("limit")
                                .value_parser(value_parser!(usize)),
                        ),
                ))
                .subcommand(
                    Command::new("edit")
                        .about("Update fields of a transaction")
                        .arg(Arg::new("id").required(true))
                        .arg(Arg::new("amount").long("amount"))
                        .arg(Arg::new("desc").long("desc"))
                        .arg(Arg::new("kind").long("kind").help("income|expense"))
                        .arg(Arg::new("category").long("category"))
                        .arg(Arg::new("date").long("date").help("YYYY-MM-DD"))
                        .arg(Arg::new("account").long("account").help("personal|business"))
                        .arg(
                            Arg::new("recurring")
                                .long("recurring")
                                .value_parser(value_parser!(bool)),
                        )
                        .arg(Arg::new("status").long("status").help("completed|pending")),
                )
                .subcommand(
                    Command::new("rm")
                        .about("Delete a transaction")
                        .arg(Arg::new("id").required(true)),
                ),
        )
        .subcommand(
            Command::new("strategy")
                .about("MRR baseline, target, and pricing tiers")
                .subcommand(json_flags(
                    Command::new("show").about("Show goal progress and tier projections"),
                ))
                .subcommand(
                    Command::new("set")
                        .about("Update the MRR baseline and/or target")
                        .arg(Arg::new("mrr").long("mrr").help("Recurring revenue baseline"))
                        .arg(Arg::new("target").long("target").help("Recurring revenue goal")),
                )
                .subcommand(
                    Command::new("tier")
                        .about("Manage pricing tiers")
                        .subcommand(
                            Command::new("add")
                                .about("Add a price point")
                                .arg(Arg::new("price").long("price").required(true)),
                        )
                        .subcommand(
                            Command::new("rm")
                                .about("Remove a price point")
                                .arg(Arg::new("id").required(true)),
                        ),
                ),
        )
        .subcommand(json_flags(
            Command::new("dashboard")
                .about("Summary metrics, goal projection, and top ledger entries")
                .arg(
                    Arg::new("account")
                        .long("account")
                        .help("Ledger filter: personal|business"),
                ),
        ))
}
