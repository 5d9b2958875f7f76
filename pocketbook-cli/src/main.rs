//! Pocketbook CLI - Personal finance tracking in your terminal

use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use pocketbook_core::LogEvent;

mod commands;
mod output;

use commands::{auth, budget, demo, goal, logs, reminder, report, status, theme, tx};

/// Pocketbook - track income, expenses, budgets and goals
#[derive(Parser)]
#[command(name = "pb", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an account and log in
    Register {
        /// Display name
        #[arg(long)]
        name: Option<String>,
        /// Email address (used to log in)
        #[arg(long)]
        email: Option<String>,
        /// Password (prompted with confirmation when omitted)
        #[arg(long, env = "POCKETBOOK_PASSWORD", hide_env_values = true)]
        password: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Log in with email and password
    Login {
        #[arg(long)]
        email: Option<String>,
        #[arg(long, env = "POCKETBOOK_PASSWORD", hide_env_values = true)]
        password: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Log out
    Logout,

    /// Show the logged-in user
    Whoami {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Manage transactions
    Tx {
        #[command(subcommand)]
        command: tx::TxCommands,
    },

    /// Manage budgets
    Budget {
        #[command(subcommand)]
        command: budget::BudgetCommands,
    },

    /// Manage savings goals
    Goal {
        #[command(subcommand)]
        command: goal::GoalCommands,
    },

    /// Manage payment reminders
    Reminder {
        #[command(subcommand)]
        command: reminder::ReminderCommands,
    },

    /// Show balance and dashboard summary
    Status {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Full report with category breakdown and saving tips
    Report {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show or change the display theme
    Theme {
        #[arg(value_enum)]
        choice: Option<theme::ThemeChoice>,
    },

    /// Manage demo mode
    Demo {
        #[command(subcommand)]
        command: Option<demo::DemoCommands>,
    },

    /// View and manage application logs
    Logs {
        #[command(subcommand)]
        command: logs::LogsCommands,
    },
}

impl Commands {
    /// Command name for the event log; never includes arguments
    fn name(&self) -> &'static str {
        match self {
            Commands::Register { .. } => "register",
            Commands::Login { .. } => "login",
            Commands::Logout => "logout",
            Commands::Whoami { .. } => "whoami",
            Commands::Tx { .. } => "tx",
            Commands::Budget { .. } => "budget",
            Commands::Goal { .. } => "goal",
            Commands::Reminder { .. } => "reminder",
            Commands::Status { .. } => "status",
            Commands::Report { .. } => "report",
            Commands::Theme { .. } => "theme",
            Commands::Demo { .. } => "demo",
            Commands::Logs { .. } => "logs",
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let name = cli.command.name();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            commands::log_event(
                &commands::get_logger(),
                LogEvent::new("command_failed")
                    .with_command(name)
                    .with_error(e.to_string()),
            );
            output::error(&format!("{:#}", e));
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Register {
            name,
            email,
            password,
            json,
        } => auth::run_register(name, email, password, json),
        Commands::Login {
            email,
            password,
            json,
        } => auth::run_login(email, password, json),
        Commands::Logout => auth::run_logout(),
        Commands::Whoami { json } => auth::run_whoami(json),
        Commands::Tx { command } => tx::run(command),
        Commands::Budget { command } => budget::run(command),
        Commands::Goal { command } => goal::run(command),
        Commands::Reminder { command } => reminder::run(command),
        Commands::Status { json } => status::run(json),
        Commands::Report { json } => report::run(json),
        Commands::Theme { choice } => theme::run(choice),
        Commands::Demo { command } => demo::run(command),
        Commands::Logs { command } => logs::run(command),
    }
}
