//! AuthActor — Tokio actor for authentication operations
//!
//! All operations are processed sequentially via an mpsc channel, so two
//! sessions signing up at once cannot interleave their read-modify-write of
//! the credential file.
//!
//! # Usage
//!
//! ```rust,no_run
//! use polarway_forms::auth::{AuthActor, Role};
//! use polarway_forms::FormsConfig;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let handle = AuthActor::spawn(&FormsConfig::new("/data/forms")).await?;
//!
//!     // Sign-up never authenticates by itself
//!     handle.sign_up("alice".into(), "pw1".into()).await?;
//!
//!     let role = handle.authenticate("alice".into(), "pw1".into()).await?;
//!     assert_eq!(role, Some(Role::User));
//!
//!     Ok(())
//! }
//! ```

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

use crate::config::FormsConfig;
use crate::error::{FormsError, Result};

use super::store::CredentialStore;
use super::types::*;

// ─── Actor Messages ───

enum AuthMsg {
    Authenticate {
        username: String,
        password: String,
        reply: oneshot::Sender<Result<Option<Role>>>,
    },
    SignUp {
        username: String,
        password: String,
        reply: oneshot::Sender<Result<CredentialEntry>>,
    },
    EnsureAvailable {
        reply: oneshot::Sender<Result<usize>>,
    },
}

// ─── Actor ───

/// Authentication actor — serves logins and sign-ups one message at a time
pub struct AuthActor {
    store: CredentialStore,
    scheme: PasswordScheme,
    rx: mpsc::Receiver<AuthMsg>,
}

impl AuthActor {
    /// Spawn the auth actor and return a handle for sending messages
    ///
    /// Fails fast with `ConfigUnavailable` when the credential file cannot be
    /// loaded; there is nothing useful to do without it.
    pub async fn spawn(config: &FormsConfig) -> Result<AuthHandle> {
        let store = CredentialStore::new(config.credentials_path());
        let users = store.load()?.len();

        let (tx, rx) = mpsc::channel(config.channel_capacity);
        let actor = Self {
            store,
            scheme: config.password_scheme,
            rx,
        };

        tokio::spawn(actor.run());
        info!(users, path = %config.credentials_path().display(), "AuthActor spawned");
        Ok(AuthHandle { tx })
    }

    /// Main event loop
    async fn run(mut self) {
        while let Some(msg) = self.rx.recv().await {
            match msg {
                AuthMsg::Authenticate { username, password, reply } => {
                    let _ = reply.send(self.handle_authenticate(&username, &password));
                }
                AuthMsg::SignUp { username, password, reply } => {
                    let _ = reply.send(self.handle_sign_up(username, password));
                }
                AuthMsg::EnsureAvailable { reply } => {
                    let _ = reply.send(self.store.load().map(|users| users.len()));
                }
            }
        }
        info!("AuthActor stopped");
    }

    // ─── Handler Implementations ───

    fn handle_authenticate(&self, username: &str, password: &str) -> Result<Option<Role>> {
        // Fresh read every time; sign-ups from other processes show up immediately
        let users = self.store.load()?;

        let role = users
            .get(username)
            .filter(|entry| verify_password(&entry.password, password))
            .map(|entry| entry.role);

        match role {
            Some(role) => debug!(username, role = %role, "Credentials accepted"),
            None => debug!(username, "Credentials rejected"),
        }
        Ok(role)
    }

    fn handle_sign_up(&self, username: String, password: String) -> Result<CredentialEntry> {
        if username.is_empty() || password.is_empty() {
            return Err(FormsError::IncompleteInput(
                "username and password are both required".into(),
            ));
        }

        let users = self.store.load()?;
        if users.contains_key(&username) {
            return Err(FormsError::DuplicateUsername(username));
        }

        let stored = match self.scheme {
            PasswordScheme::Plaintext => password,
            PasswordScheme::Argon2 => hash_password(&password)?,
        };

        let entry = CredentialEntry::new(username, stored, Role::User);
        self.store.save(entry.clone())?;
        info!(username = %entry.username, scheme = ?self.scheme, "User signed up");
        Ok(entry)
    }
}

// ─── Password Helpers ───

/// Salted Argon2 PHC string for `password`
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Ok(Argon2::default()
        .hash_password(password.as_bytes(), &salt)?
        .to_string())
}

/// PHC strings go through Argon2, anything else is an exact comparison
fn verify_password(stored: &str, supplied: &str) -> bool {
    if !stored.starts_with("$argon2") {
        return stored == supplied;
    }
    match PasswordHash::new(stored) {
        Ok(parsed) => Argon2::default()
            .verify_password(supplied.as_bytes(), &parsed)
            .is_ok(),
        Err(e) => {
            warn!(error = %e, "Stored password hash is malformed");
            false
        }
    }
}

// ─── Handle (client-facing API) ───

/// Thread-safe handle to communicate with the AuthActor
#[derive(Clone)]
pub struct AuthHandle {
    tx: mpsc::Sender<AuthMsg>,
}

impl AuthHandle {
    /// Stored role when the pair matches, `None` otherwise
    pub async fn authenticate(&self, username: String, password: String) -> Result<Option<Role>> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(AuthMsg::Authenticate { username, password, reply })
            .await
            .map_err(|_| FormsError::ActorUnavailable("AuthActor".into()))?;
        rx.await
            .map_err(|_| FormsError::ActorUnavailable("AuthActor dropped".into()))?
    }

    /// Register a new `user` entry; does not authenticate
    pub async fn sign_up(&self, username: String, password: String) -> Result<CredentialEntry> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(AuthMsg::SignUp { username, password, reply })
            .await
            .map_err(|_| FormsError::ActorUnavailable("AuthActor".into()))?;
        rx.await
            .map_err(|_| FormsError::ActorUnavailable("AuthActor dropped".into()))?
    }

    /// Re-read the credential file; returns the number of entries
    pub async fn ensure_available(&self) -> Result<usize> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(AuthMsg::EnsureAvailable { reply })
            .await
            .map_err(|_| FormsError::ActorUnavailable("AuthActor".into()))?;
        rx.await
            .map_err(|_| FormsError::ActorUnavailable("AuthActor dropped".into()))?
    }
}
