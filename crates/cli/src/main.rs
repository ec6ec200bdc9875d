// PairPost CLI - peer-review reconciliation and feedback mailing

mod exit_codes;
mod login;
mod run;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use exit_codes::EXIT_SUCCESS;
use run::Direction;

#[derive(Parser)]
#[command(name = "pairpost")]
#[command(about = "Reconcile peer reviews and mail each participant their feedback")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Reconcile both review files and dispatch notifications
    #[command(after_help = "\
Dry run by default: composed messages are printed, nothing is sent.

Examples:
  pairpost run review.toml
  pairpost run review.toml --direction mentors
  pairpost run review.toml --send
  pairpost run review.toml --rewrite-inputs --json --output report.json")]
    Run {
        /// Path to the run config (TOML)
        config: PathBuf,

        /// Which participants to notify
        #[arg(long, value_enum, default_value_t = Direction::Both)]
        direction: Direction,

        /// Perform authenticated delivery instead of a dry run
        #[arg(long)]
        send: bool,

        /// Persist ё-normalized file contents back to their source paths
        #[arg(long)]
        rewrite_inputs: bool,

        /// Output the run report as JSON to stdout
        #[arg(long)]
        json: bool,

        /// Write the JSON run report to a file
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },

    /// Validate a run config without loading data
    #[command(after_help = "\
Examples:
  pairpost validate review.toml")]
    Validate {
        /// Path to the run config (TOML)
        config: PathBuf,
    },

    /// Store Gmail OAuth credentials
    Login {
        /// OAuth client id (falls back to PAIRPOST_CLIENT_ID, then a prompt)
        #[arg(long)]
        client_id: Option<String>,

        /// OAuth client secret (falls back to PAIRPOST_CLIENT_SECRET)
        #[arg(long)]
        client_secret: Option<String>,

        /// Long-lived refresh token (falls back to PAIRPOST_REFRESH_TOKEN)
        #[arg(long)]
        refresh_token: Option<String>,
    },

    /// Delete stored credentials
    Logout,
}

pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run {
            config,
            direction,
            send,
            rewrite_inputs,
            json,
            output,
        } => run::cmd_run(config, direction, send, rewrite_inputs, json, output),
        Commands::Validate { config } => run::cmd_validate(config),
        Commands::Login {
            client_id,
            client_secret,
            refresh_token,
        } => login::cmd_login(client_id, client_secret, refresh_token),
        Commands::Logout => login::cmd_logout(),
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}
