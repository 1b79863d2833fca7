// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command, value_parser};

fn agent() -> Arg {
    Arg::new("agent")
        .long("agent")
        .required(true)
        .help("Email of the agent who owns the records")
}

fn json_flags(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .help("Print as pretty JSON"),
    )
    .arg(
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .conflicts_with("json")
            .help("Print as JSON lines"),
    )
}

fn id_arg(name: &'static str, help: &'static str) -> Arg {
    Arg::new(name)
        .long(name)
        .required(true)
        .value_parser(value_parser!(i64))
        .help(help)
}

fn text(name: &'static str) -> Arg {
    Arg::new(name).long(name)
}

fn dashed(id: &'static str, long: &'static str) -> Arg {
    Arg::new(id).long(long)
}

fn fee_args(cmd: Command) -> Command {
    cmd.arg(dashed("agency_fee", "agency-fee"))
        .arg(dashed("legal_fee", "legal-fee"))
        .arg(dashed("caution_fee", "caution-fee"))
}

pub fn build_cli() -> Command {
    Command::new("leasedesk")
        .version(clap::crate_version!())
        .about("Property-management back office: landlords, buildings, units, tenants, leases and rent reminders")
        .subcommand(Command::new("init").about("Create the database"))
        .subcommand(
            Command::new("agent")
                .about("Manage agents")
                .subcommand(
                    Command::new("add")
                        .arg(text("name").required(true))
                        .arg(text("email").required(true)),
                )
                .subcommand(Command::new("list"))
                .subcommand(
                    Command::new("update")
                        .about("Change an agent's profile")
                        .arg(agent())
                        .arg(text("name"))
                        .arg(text("email").help("New email address")),
                ),
        )
        .subcommand(
            Command::new("landlord")
                .about("Manage landlords")
                .subcommand(
                    Command::new("add")
                        .arg(agent())
                        .arg(text("name").required(true))
                        .arg(text("phone").required(true))
                        .arg(text("email"))
                        .arg(text("bank"))
                        .arg(dashed("account_number", "account-number")),
                )
                .subcommand(json_flags(Command::new("list").arg(agent())))
                .subcommand(
                    Command::new("update")
                        .arg(agent())
                        .arg(id_arg("id", "Landlord id"))
                        .arg(text("name"))
                        .arg(text("phone"))
                        .arg(text("email"))
                        .arg(text("bank"))
                        .arg(dashed("account_number", "account-number")),
                ),
        )
        .subcommand(
            Command::new("property")
                .about("Manage buildings")
                .subcommand(
                    Command::new("add")
                        .arg(agent())
                        .arg(id_arg("landlord", "Owning landlord id"))
                        .arg(text("title").required(true))
                        .arg(text("address").required(true)),
                )
                .subcommand(json_flags(Command::new("list").arg(agent())))
                .subcommand(
                    Command::new("update")
                        .arg(agent())
                        .arg(id_arg("id", "Building id"))
                        .arg(
                            Arg::new("landlord")
                                .long("landlord")
                                .value_parser(value_parser!(i64)),
                        )
                        .arg(text("title"))
                        .arg(text("address")),
                ),
        )
        .subcommand(
            Command::new("apartment")
                .about("Manage apartment units")
                .subcommand(fee_args(
                    Command::new("add")
                        .arg(agent())
                        .arg(id_arg("property", "Parent building id"))
                        .arg(text("name").required(true))
                        .arg(text("rent").required(true)),
                ))
                .subcommand(json_flags(
                    Command::new("list")
                        .arg(agent())
                        .arg(
                            Arg::new("property")
                                .long("property")
                                .value_parser(value_parser!(i64)),
                        )
                        .arg(text("status").help("Vacant or Occupied")),
                ))
                .subcommand(fee_args(
                    Command::new("update")
                        .about("Update name or prices; occupancy follows leases")
                        .arg(agent())
                        .arg(id_arg("id", "Apartment id"))
                        .arg(text("name"))
                        .arg(text("rent")),
                )),
        )
        .subcommand(
            Command::new("tenant")
                .about("Manage tenants")
                .subcommand(
                    Command::new("add")
                        .arg(agent())
                        .arg(text("name").required(true))
                        .arg(text("phone").required(true))
                        .arg(text("email"))
                        .arg(text("address"))
                        .arg(dashed("passport_url", "passport-url")),
                )
                .subcommand(json_flags(Command::new("list").arg(agent())))
                .subcommand(
                    Command::new("update")
                        .arg(agent())
                        .arg(id_arg("id", "Tenant id"))
                        .arg(text("name"))
                        .arg(text("phone"))
                        .arg(text("email"))
                        .arg(text("address"))
                        .arg(dashed("passport_url", "passport-url")),
                ),
        )
        .subcommand(
            Command::new("lease")
                .about("Sign and terminate leases")
                .subcommand(fee_args(
                    Command::new("create")
                        .arg(agent())
                        .arg(id_arg("apartment", "Apartment id"))
                        .arg(id_arg("tenant", "Tenant id"))
                        .arg(text("start").required(true).help("YYYY-MM-DD"))
                        .arg(
                            Arg::new("years")
                                .long("years")
                                .value_parser(value_parser!(u32))
                                .default_value("1"),
                        )
                        .arg(text("rent").help("Defaults to the apartment's rent")),
                ))
                .subcommand(json_flags(Command::new("list").arg(agent())))
                .subcommand(
                    Command::new("terminate")
                        .arg(agent())
                        .arg(id_arg("id", "Lease id")),
                ),
        )
        .subcommand(
            Command::new("remind")
                .about("Rent reminder notifications")
                .subcommand(Command::new("scan").about("Run the reminder scan now"))
                .subcommand(
                    Command::new("watch")
                        .about("Run the reminder scan every day")
                        .arg(text("at").help("HH:MM, defaults to the scan_time setting")),
                )
                .subcommand(json_flags(
                    Command::new("list").arg(agent()).arg(
                        Arg::new("limit")
                            .long("limit")
                            .value_parser(value_parser!(usize))
                            .default_value("5"),
                    ),
                )),
        )
        .subcommand(json_flags(
            Command::new("dashboard")
                .about("Portfolio counts and latest alerts")
                .arg(agent()),
        ))
        .subcommand(
            Command::new("doctor")
                .about("Check occupancy consistency")
                .arg(agent()),
        )
        .subcommand(
            Command::new("export").about("Export data").subcommand(
                Command::new("leases")
                    .arg(agent())
                    .arg(text("format").default_value("csv").help("csv|json"))
                    .arg(text("out").required(true)),
            ),
        )
        .subcommand(
            Command::new("settings")
                .about("Show or change settings")
                .subcommand(Command::new("show"))
                .subcommand(
                    Command::new("set")
                        .arg(text("key").required(true).help("scan_time | dispatch_webhook"))
                        .arg(text("value").required(true)),
                ),
        )
}
