//! Auth store: local user directory and current session.
//!
//! # Responsibility
//! - Register users and sign them in/out against the local directory.
//! - Persist the directory and the session pointer.
//!
//! # Invariants
//! - Email addresses are unique, compared trimmed and case-insensitively.
//! - A failed operation leaves `users` and `current_user` untouched and
//!   records the cause in `last_error`.
//! - `is_loading` is false whenever no operation is in flight.
//! - Passwords are never stored or verified; sign-in is a local simulation.

use crate::config::CoreConfig;
use crate::id::IdGenerator;
use crate::model::user::User;
use crate::persistence::Persistence;
use crate::repo::kv_repo::KeyValueStore;
use log::{error, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::rc::Rc;
use std::time::Duration;

/// Recoverable sign-up/sign-in failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Another user already registered this email.
    DuplicateEmail,
    /// No registered user has this email.
    UserNotFound,
    /// Email or password missing on sign-in.
    InvalidCredentials,
    /// A required sign-up field is blank.
    InvalidInput(&'static str),
}

impl AuthError {
    /// Stable code for log events.
    pub fn code(&self) -> &'static str {
        match self {
            Self::DuplicateEmail => "duplicate_email",
            Self::UserNotFound => "user_not_found",
            Self::InvalidCredentials => "invalid_credentials",
            Self::InvalidInput(_) => "invalid_input",
        }
    }
}

impl Display for AuthError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DuplicateEmail => write!(f, "User with this email already exists."),
            Self::UserNotFound => write!(f, "No account found for this email."),
            Self::InvalidCredentials => write!(f, "Invalid email or password."),
            Self::InvalidInput(field) => write!(f, "Please provide a {field}."),
        }
    }
}

impl Error for AuthError {}

/// Registered users plus the signed-in one.
pub struct AuthStore<S: KeyValueStore> {
    persistence: Persistence<S>,
    ids: Rc<dyn IdGenerator>,
    latency: Duration,
    users: Vec<User>,
    current_user: Option<User>,
    is_loading: bool,
    last_error: Option<AuthError>,
}

impl<S: KeyValueStore> AuthStore<S> {
    /// Restores the user directory and any persisted session.
    pub fn load(
        persistence: Persistence<S>,
        ids: Rc<dyn IdGenerator>,
        config: &CoreConfig,
    ) -> Self {
        let users = persistence.load_user_directory();
        let current_user = persistence.load_current_session_user();
        info!(
            "event=auth_restore module=auth status=ok users={} session={}",
            users.len(),
            current_user.is_some()
        );
        Self {
            persistence,
            ids,
            latency: config.simulated_auth_latency(),
            users,
            current_user,
            is_loading: false,
            last_error: None,
        }
    }

    pub fn users(&self) -> &[User] {
        &self.users
    }

    pub fn current_user(&self) -> Option<&User> {
        self.current_user.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.current_user.is_some()
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn last_error(&self) -> Option<&AuthError> {
        self.last_error.as_ref()
    }

    pub fn clear_error(&mut self) {
        self.last_error = None;
    }

    /// Registers a user and signs them in.
    ///
    /// Returns `false` and sets `last_error` on blank input or a taken email.
    pub async fn signup(&mut self, name: &str, email: &str, password: &str) -> bool {
        self.begin().await;
        let outcome = self.register(name, email, password);
        self.finish("signup", outcome)
    }

    /// Signs in the user registered under `email`.
    ///
    /// The password must be non-blank but is otherwise not checked.
    pub async fn login(&mut self, email: &str, password: &str) -> bool {
        self.begin().await;
        let outcome = self.authenticate(email, password);
        self.finish("login", outcome)
    }

    /// Ends the session and clears the persisted session pointer.
    pub fn logout(&mut self) {
        let user_id = self.current_user.take().map(|user| user.id);
        self.last_error = None;
        if let Err(err) = self.persistence.save_current_session_user(None) {
            error!("event=session_save module=auth status=error op=logout error={err}");
        }
        info!(
            "event=logout module=auth status=ok user_id={}",
            user_id.as_deref().unwrap_or("none")
        );
    }

    async fn begin(&mut self) {
        self.is_loading = true;
        self.last_error = None;
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }

    fn finish(&mut self, op: &'static str, outcome: Result<(), AuthError>) -> bool {
        self.is_loading = false;
        match outcome {
            Ok(()) => {
                info!(
                    "event=auth module=auth op={} status=ok user_id={}",
                    op,
                    self.current_user
                        .as_ref()
                        .map(|user| user.id.as_str())
                        .unwrap_or("none")
                );
                true
            }
            Err(err) => {
                warn!(
                    "event=auth module=auth op={} status=error error_code={}",
                    op,
                    err.code()
                );
                self.last_error = Some(err);
                false
            }
        }
    }

    fn register(&mut self, name: &str, email: &str, password: &str) -> Result<(), AuthError> {
        let name = required(name, "name")?;
        let email = required(email, "email")?;
        required(password, "password")?;

        if self.users.iter().any(|user| user.has_email(email)) {
            return Err(AuthError::DuplicateEmail);
        }

        let user = User {
            id: self.ids.next_id(),
            name: name.to_string(),
            email: email.to_string(),
        };
        self.users.push(user.clone());
        if let Err(err) = self.persistence.save_user_directory(&self.users) {
            error!("event=directory_save module=auth status=error error={err}");
        }
        self.start_session(user);
        Ok(())
    }

    fn authenticate(&mut self, email: &str, password: &str) -> Result<(), AuthError> {
        if email.trim().is_empty() || password.trim().is_empty() {
            return Err(AuthError::InvalidCredentials);
        }

        let user = self
            .users
            .iter()
            .find(|user| user.has_email(email))
            .cloned()
            .ok_or(AuthError::UserNotFound)?;
        self.start_session(user);
        Ok(())
    }

    fn start_session(&mut self, user: User) {
        if let Err(err) = self.persistence.save_current_session_user(Some(&user)) {
            error!("event=session_save module=auth status=error user_id={} error={err}", user.id);
        }
        self.current_user = Some(user);
    }
}

fn required<'a>(value: &'a str, field: &'static str) -> Result<&'a str, AuthError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AuthError::InvalidInput(field));
    }
    Ok(trimmed)
}

#[cfg(test)]
mod tests {
    use super::{AuthError, AuthStore};
    use crate::config::CoreConfig;
    use crate::db::open_db_in_memory;
    use crate::id::SequentialIdGenerator;
    use crate::persistence::Persistence;
    use crate::repo::kv_repo::SqliteKvStore;
    use rusqlite::Connection;
    use std::rc::Rc;

    fn store(conn: &Connection) -> AuthStore<SqliteKvStore<'_>> {
        let persistence = Persistence::new(SqliteKvStore::try_new(conn).unwrap(), "macrum");
        AuthStore::load(
            persistence,
            Rc::new(SequentialIdGenerator::new("user")),
            &CoreConfig::default(),
        )
    }

    #[tokio::test]
    async fn signup_registers_and_signs_in() {
        let conn = open_db_in_memory().unwrap();
        let mut auth = store(&conn);

        assert!(auth.signup(" Jane ", " jane@example.com ", "secret").await);
        let user = auth.current_user().unwrap();
        assert_eq!(user.id, "user-1");
        assert_eq!(user.name, "Jane");
        assert_eq!(user.email, "jane@example.com");
        assert_eq!(auth.users().len(), 1);
        assert!(!auth.is_loading());
        assert!(auth.last_error().is_none());
    }

    #[tokio::test]
    async fn duplicate_email_is_rejected_case_insensitively() {
        let conn = open_db_in_memory().unwrap();
        let mut auth = store(&conn);
        assert!(auth.signup("Jane", "jane@example.com", "secret").await);
        auth.logout();

        assert!(!auth.signup("Other", "JANE@example.com", "secret").await);
        assert_eq!(auth.last_error(), Some(&AuthError::DuplicateEmail));
        assert_eq!(auth.users().len(), 1);
        assert!(auth.current_user().is_none());
    }

    #[tokio::test]
    async fn blank_signup_fields_are_invalid_input() {
        let conn = open_db_in_memory().unwrap();
        let mut auth = store(&conn);

        assert!(!auth.signup("  ", "jane@example.com", "secret").await);
        assert_eq!(auth.last_error(), Some(&AuthError::InvalidInput("name")));
        assert!(!auth.signup("Jane", "jane@example.com", "").await);
        assert_eq!(auth.last_error(), Some(&AuthError::InvalidInput("password")));
        assert!(auth.users().is_empty());
    }

    #[tokio::test]
    async fn login_distinguishes_blank_and_unknown() {
        let conn = open_db_in_memory().unwrap();
        let mut auth = store(&conn);

        assert!(!auth.login("", "secret").await);
        assert_eq!(auth.last_error(), Some(&AuthError::InvalidCredentials));
        assert!(!auth.login("ghost@example.com", "secret").await);
        assert_eq!(auth.last_error(), Some(&AuthError::UserNotFound));
        assert_eq!(
            auth.last_error().unwrap().to_string(),
            "No account found for this email."
        );

        auth.clear_error();
        assert!(auth.last_error().is_none());
    }

    #[tokio::test]
    async fn session_survives_reload_until_logout() {
        let conn = open_db_in_memory().unwrap();
        {
            let mut auth = store(&conn);
            assert!(auth.signup("Jane", "jane@example.com", "secret").await);
        }

        let mut restored = store(&conn);
        assert_eq!(restored.current_user().map(|u| u.id.as_str()), Some("user-1"));
        assert!(restored.login("Jane@Example.com", "anything").await);
        restored.logout();
        assert!(!restored.is_authenticated());

        let after_logout = store(&conn);
        assert!(after_logout.current_user().is_none());
        assert_eq!(after_logout.users().len(), 1);
    }
}
