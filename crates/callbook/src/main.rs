// SPDX-FileCopyrightText: 2026 Callbook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Callbook - follow-up call scheduling for small sales and support teams.
//!
//! This is the binary entry point: the HTTP server plus a handful of
//! one-shot commands that work directly against the configured database.

mod commands;
mod serve;
mod shutdown;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Callbook - follow-up call scheduling.
#[derive(Parser, Debug)]
#[command(name = "callbook", version, about, long_about = None)]
struct Cli {
    /// Read configuration from this file instead of the standard locations.
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the HTTP API server.
    Serve,
    /// Check whether a contact name is already taken.
    Check {
        /// Contact name to look up.
        name: String,
        /// Print JSON instead of text.
        #[arg(long)]
        json: bool,
    },
    /// Add a contact, or replace one with the same name when --overwrite is given.
    Submit(SubmitArgs),
    /// Show how many calls are scheduled per day.
    Calendar {
        /// First day of the window (YYYY-MM-DD, default today).
        #[arg(long)]
        anchor: Option<String>,
        /// Days after the anchor to include (default from config).
        #[arg(long)]
        window_days: Option<u32>,
        /// Print JSON instead of text.
        #[arg(long)]
        json: bool,
        /// Disable colors.
        #[arg(long)]
        plain: bool,
    },
    /// List the contacts to call on one day.
    Day {
        /// Day to list (YYYY-MM-DD).
        date: String,
        /// Print JSON instead of text.
        #[arg(long)]
        json: bool,
    },
}

#[derive(Args, Debug)]
struct SubmitArgs {
    #[arg(long)]
    name: String,
    #[arg(long)]
    phone: String,
    #[arg(long)]
    email: String,
    /// Day of the next call (YYYY-MM-DD).
    #[arg(long)]
    next_call_date: String,
    #[arg(long, default_value = "0")]
    times_called: String,
    /// Free-form notes, stored as given.
    #[arg(long)]
    description: Option<String>,
    /// Replace an existing contact with the same name.
    #[arg(long)]
    overwrite: bool,
    /// Print JSON instead of text.
    #[arg(long)]
    json: bool,
    /// Disable colors.
    #[arg(long)]
    plain: bool,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Load and validate configuration at startup
    let loaded = match &cli.config {
        Some(path) => callbook_config::load_and_validate_path(path),
        None => callbook_config::load_and_validate(),
    };
    let config = match loaded {
        Ok(config) => config,
        Err(errors) => {
            callbook_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    serve::init_tracing(&config.app.log_level);

    let result = match cli.command {
        Some(Commands::Serve) => serve::run_serve(config).await.map(|()| 0),
        Some(Commands::Check { name, json }) => commands::run_check(&config, &name, json).await,
        Some(Commands::Submit(args)) => {
            let draft = callbook_core::ContactDraft {
                name: args.name,
                phone: args.phone,
                email: args.email,
                next_call_date: Some(args.next_call_date),
                times_called: Some(args.times_called.as_str().into()),
                description: args.description,
            };
            commands::run_submit(&config, &draft, args.overwrite, args.json, args.plain).await
        }
        Some(Commands::Calendar {
            anchor,
            window_days,
            json,
            plain,
        }) => {
            commands::run_calendar(&config, anchor.as_deref(), window_days, json, plain).await
        }
        Some(Commands::Day { date, json }) => commands::run_day(&config, &date, json).await,
        None => {
            println!("callbook: use --help for available commands");
            Ok(0)
        }
    };

    match result {
        Ok(0) => {}
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("callbook: {e}");
            std::process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn submit_parses_flags() {
        let cli = Cli::try_parse_from([
            "callbook",
            "submit",
            "--name",
            "Mario Rossi",
            "--phone",
            "3331234567",
            "--email",
            "mario@example.it",
            "--next-call-date",
            "2024-01-02",
            "--overwrite",
            "--plain",
        ])
        .unwrap();
        match cli.command {
            Some(Commands::Submit(args)) => {
                assert_eq!(args.name, "Mario Rossi");
                assert_eq!(args.times_called, "0");
                assert!(args.overwrite);
                assert!(args.plain);
                assert!(!args.json);
            }
            other => panic!("expected submit, got {other:?}"),
        }
    }

    #[test]
    fn calendar_accepts_window_and_global_config() {
        let cli = Cli::try_parse_from([
            "callbook",
            "calendar",
            "--window-days",
            "7",
            "--config",
            "/tmp/callbook.toml",
        ])
        .unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/callbook.toml")));
        assert!(matches!(
            cli.command,
            Some(Commands::Calendar {
                window_days: Some(7),
                ..
            })
        ));
    }

    #[test]
    fn binary_loads_config_defaults() {
        let config = callbook_config::load_and_validate_str("")
            .expect("default config should be valid");
        assert_eq!(config.app.name, "callbook");
    }
}
