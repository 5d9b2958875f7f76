//! Theme command - show or change the display theme preference

use anyhow::Result;
use clap::ValueEnum;
use pocketbook_core::Theme;

use super::get_context;
use crate::output;

#[derive(Clone, Copy, ValueEnum)]
pub enum ThemeChoice {
    Dark,
    Light,
    Toggle,
}

pub fn run(choice: Option<ThemeChoice>) -> Result<()> {
    let ctx = get_context()?;
    let prefs = &ctx.preferences_service;

    let theme = match choice {
        None => {
            println!("Theme: {}", prefs.theme()?);
            return Ok(());
        }
        Some(ThemeChoice::Toggle) => prefs.toggle_theme()?,
        Some(ThemeChoice::Dark) => {
            prefs.set_theme(Theme::Dark)?;
            Theme::Dark
        }
        Some(ThemeChoice::Light) => {
            prefs.set_theme(Theme::Light)?;
            Theme::Light
        }
    };

    output::success(&format!("Theme set to {}", theme));
    Ok(())
}
