//! Auth service - registration, login and the session lifecycle
//!
//! The session is an explicit value: `restore_session` creates it from the
//! persisted marker, `register`/`login` fill it, `logout` clears it. The
//! service itself holds no per-session state.

use std::sync::{Arc, OnceLock};

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::persisted::{load_or_discard, save, DiscardHook};
use crate::domain::result::{Error, Result};
use crate::domain::{SessionUser, User};
use crate::ports::{keys, KeyValueStore};

/// Minimum accepted password length at registration
pub const MIN_PASSWORD_LEN: usize = 6;

fn email_regex() -> &'static Regex {
    static EMAIL_RE: OnceLock<Regex> = OnceLock::new();
    EMAIL_RE.get_or_init(|| {
        Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email pattern is valid")
    })
}

/// The authenticated identity of this process, if any
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    user: Option<SessionUser>,
}

impl Session {
    /// A session nobody is logged into
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn user(&self) -> Option<&SessionUser> {
        self.user.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }
}

/// Registration input as typed by the user, checked before `register`
#[derive(Debug, Clone)]
pub struct RegistrationForm {
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirmation: String,
}

impl RegistrationForm {
    pub fn validate(&self) -> Result<()> {
        if self.password != self.confirmation {
            return Err(Error::validation("Passwords do not match"));
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(Error::validation(format!(
                "Password must be at least {} characters",
                MIN_PASSWORD_LEN
            )));
        }
        if self.name.trim().is_empty() {
            return Err(Error::validation("Name is required"));
        }
        if !email_regex().is_match(self.email.trim()) {
            return Err(Error::validation("Email address is not valid"));
        }
        Ok(())
    }
}

/// Credential checks against the users stored under `users`
pub struct AuthService {
    store: Arc<dyn KeyValueStore>,
    on_discard: Option<DiscardHook>,
}

impl AuthService {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            on_discard: None,
        }
    }

    /// Report unreadable `users` / `currentUser` entries to `hook`
    pub fn with_discard_hook(mut self, hook: DiscardHook) -> Self {
        self.on_discard = Some(hook);
        self
    }

    /// Rebuild the session from the persisted `currentUser` marker
    ///
    /// A marker that fails to parse is removed and the session starts
    /// logged out.
    pub fn restore_session(&self) -> Result<Session> {
        let user = load_or_discard::<SessionUser>(
            self.store.as_ref(),
            keys::CURRENT_USER,
            self.on_discard.as_ref(),
        )?;
        Ok(Session { user })
    }

    /// All registered users in registration order
    ///
    /// An unreadable user set is discarded and treated as empty.
    pub fn users(&self) -> Result<Vec<User>> {
        Ok(
            load_or_discard(self.store.as_ref(), keys::USERS, self.on_discard.as_ref())?
                .unwrap_or_default(),
        )
    }

    /// Create a user and log them in
    ///
    /// Returns `Ok(false)` without touching the store when the email is
    /// already registered.
    pub fn register(
        &self,
        session: &mut Session,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<bool> {
        let mut users = self.users()?;
        if users.iter().any(|u| u.email == email) {
            return Ok(false);
        }

        let user = User::new(name, email, password);
        let session_user = SessionUser::from(&user);
        users.push(user);

        save(self.store.as_ref(), keys::USERS, &users)?;
        self.start_session(session, session_user)?;
        Ok(true)
    }

    /// Validate a registration form, then register
    pub fn register_form(&self, session: &mut Session, form: &RegistrationForm) -> Result<bool> {
        form.validate()?;
        self.register(session, form.name.trim(), form.email.trim(), &form.password)
    }

    /// Log in when a stored user matches email and password exactly
    pub fn login(&self, session: &mut Session, email: &str, password: &str) -> Result<bool> {
        let users = self.users()?;
        let Some(user) = users.iter().find(|u| u.matches_credentials(email, password)) else {
            return Ok(false);
        };

        self.start_session(session, SessionUser::from(user))?;
        Ok(true)
    }

    /// Clear the session and its persisted marker
    pub fn logout(&self, session: &mut Session) -> Result<()> {
        session.user = None;
        self.store.remove(keys::CURRENT_USER)
    }

    fn start_session(&self, session: &mut Session, user: SessionUser) -> Result<()> {
        save(self.store.as_ref(), keys::CURRENT_USER, &user)?;
        session.user = Some(user);
        Ok(())
    }
}
