//! Auth commands - register, login, logout, whoami

use anyhow::{bail, Result};
use dialoguer::Password;
use pocketbook_core::services::RegistrationForm;
use pocketbook_core::{LogEvent, OperationResult};

use super::{get_context, get_logger, log_event, value_or_prompt};
use crate::output;

fn password_or_prompt(value: Option<String>, prompt: &str) -> Result<String> {
    match value {
        Some(v) => Ok(v),
        None => Ok(Password::new().with_prompt(prompt).interact()?),
    }
}

pub fn run_register(
    name: Option<String>,
    email: Option<String>,
    password: Option<String>,
    json: bool,
) -> Result<()> {
    let ctx = get_context()?;
    let logger = get_logger();

    let name = value_or_prompt(name, "Name")?;
    let email = value_or_prompt(email, "Email")?;
    // A password given on the command line is its own confirmation
    let (password, confirmation) = match password {
        Some(p) => (p.clone(), p),
        None => (
            Password::new().with_prompt("Password").interact()?,
            Password::new().with_prompt("Confirm password").interact()?,
        ),
    };

    let form = RegistrationForm {
        name,
        email,
        password,
        confirmation,
    };

    let mut session = ctx.session()?;
    let registered = match ctx.auth_service.register_form(&mut session, &form) {
        Ok(registered) => registered,
        Err(e) => {
            log_event(&logger, LogEvent::new("register_rejected").with_error(e.to_string()));
            return Err(e.into());
        }
    };

    if !registered {
        log_event(
            &logger,
            LogEvent::new("register_rejected").with_error("Email already registered"),
        );
        if json {
            let result: OperationResult<()> =
                OperationResult::fail("An account with this email already exists");
            println!("{}", serde_json::to_string_pretty(&result)?);
            return Ok(());
        }
        bail!("An account with this email already exists");
    }

    log_event(&logger, LogEvent::new("user_registered"));
    let user = session.user().cloned();
    if json {
        println!("{}", serde_json::to_string_pretty(&OperationResult::ok(user))?);
    } else if let Some(user) = user {
        output::success(&format!("Welcome, {}! You are now logged in.", user.name));
    }
    Ok(())
}

pub fn run_login(email: Option<String>, password: Option<String>, json: bool) -> Result<()> {
    let ctx = get_context()?;
    let logger = get_logger();

    let email = value_or_prompt(email, "Email")?;
    let password = password_or_prompt(password, "Password")?;

    let mut session = ctx.session()?;
    if !ctx.auth_service.login(&mut session, email.trim(), &password)? {
        log_event(&logger, LogEvent::new("login_failed"));
        if json {
            let result: OperationResult<()> = OperationResult::fail("Invalid email or password");
            println!("{}", serde_json::to_string_pretty(&result)?);
            return Ok(());
        }
        bail!("Invalid email or password");
    }

    log_event(&logger, LogEvent::new("login_succeeded"));
    let user = session.user().cloned();
    if json {
        println!("{}", serde_json::to_string_pretty(&OperationResult::ok(user))?);
    } else if let Some(user) = user {
        output::success(&format!("Logged in as {}", user.name));
    }
    Ok(())
}

pub fn run_logout() -> Result<()> {
    let ctx = get_context()?;
    let mut session = ctx.session()?;
    let was_logged_in = session.is_authenticated();

    ctx.auth_service.logout(&mut session)?;
    log_event(&get_logger(), LogEvent::new("logout"));

    if was_logged_in {
        output::success("Logged out");
    } else {
        output::info("Nobody was logged in");
    }
    Ok(())
}

pub fn run_whoami(json: bool) -> Result<()> {
    let ctx = get_context()?;
    let session = ctx.session()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&session.user())?);
        return Ok(());
    }

    match session.user() {
        Some(user) => {
            println!("{} <{}>", user.name, user.email);
            if ctx.config.demo_mode {
                output::warning("Demo mode is on");
            }
        }
        None => output::info("Not logged in"),
    }
    Ok(())
}
