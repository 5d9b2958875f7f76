//! Demo command - manage demo mode

use anyhow::Result;
use clap::Subcommand;
use colored::Colorize;
use pocketbook_core::adapters::demo::{DEMO_USER_EMAIL, DEMO_USER_PASSWORD};
use pocketbook_core::services::DemoService;
use pocketbook_core::LogEvent;

use super::{get_data_dir, get_logger, log_event, today};

#[derive(Subcommand)]
pub enum DemoCommands {
    /// Enable demo mode
    #[command(name = "on")]
    On,
    /// Disable demo mode
    #[command(name = "off")]
    Off {
        /// Also delete the demo data
        #[arg(long)]
        clean: bool,
    },
    /// Show demo mode status
    Status,
}

pub fn run(command: Option<DemoCommands>) -> Result<()> {
    let data_dir = get_data_dir()?;
    std::fs::create_dir_all(&data_dir)?;
    let demo_service = DemoService::new(&data_dir);

    match command {
        Some(DemoCommands::On) => {
            demo_service.enable(today())?;
            log_event(&get_logger(), LogEvent::new("demo_enabled"));
            println!("{}", "Demo mode enabled".green());
            println!(
                "You are logged in as {} (password {}). Run 'pb status' to look around.",
                DEMO_USER_EMAIL, DEMO_USER_PASSWORD
            );
            Ok(())
        }
        Some(DemoCommands::Off { clean }) => {
            demo_service.disable(clean)?;
            log_event(&get_logger(), LogEvent::new("demo_disabled"));
            println!("{}", "Demo mode disabled".yellow());
            Ok(())
        }
        Some(DemoCommands::Status) | None => {
            if demo_service.is_enabled()? {
                println!("Demo mode is {}", "ON".green());
            } else {
                println!("Demo mode is {}", "OFF".yellow());
            }
            Ok(())
        }
    }
}
