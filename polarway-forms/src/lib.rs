//! # Polarway Forms
//!
//! Role-gated data entry: users authenticate against a YAML credential file,
//! admins append `{Name, Gender}` records to an XLSX workbook, and both admins
//! and users can view the accumulated records.
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────┐
//! │        Presenter (terminal, tests)        │
//! ├───────────────────────────────────────────┤
//! │     SessionController + SessionState      │
//! │   (role selection, login, access gates)   │
//! ├─────────────────────┬─────────────────────┤
//! │      AuthActor      │     RecordActor     │
//! │ (login, sign-up)    │ (append, retries)   │
//! ├─────────────────────┼─────────────────────┤
//! │  CredentialStore    │    RecordStore      │
//! │  config.yaml        │    form_data.xlsx   │
//! └─────────────────────┴─────────────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use polarway_forms::{FormsConfig, Gender, Role, SessionController, View};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = FormsConfig::new("/data/forms");
//!     let mut session = SessionController::start(&config).await?;
//!
//!     session.select_role(Role::Admin);
//!     println!("{}", session.login("admin", "secret").await?.text());
//!     println!("{}", session.submit("Bob", Some(Gender::Male)).await?.text());
//!
//!     if let View::Table(table) = session.view().await? {
//!         println!("{} records", table.len());
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Guarantees
//!
//! - **Single writer per process**: credential and record writes are queued
//!   through actors
//! - **Atomic replacement**: files are written to a temp file and renamed
//! - **Fail fast**: a missing credential file stops startup
//! - **Railway Programming**: all operations return `Result<T, FormsError>`

pub mod config;
pub mod error;
pub mod schema;
pub mod store;
pub mod auth;
pub mod records;
pub mod session;
pub mod controller;
pub mod presenter;

mod atomic;

// Re-exports for convenience
pub use config::FormsConfig;
pub use error::{FormsError, Result};
pub use schema::{Gender, Record, RecordTable};
pub use store::RecordStore;
pub use auth::{AuthActor, AuthHandle, CredentialEntry, CredentialStore, PasswordScheme, Role};
pub use records::{RecordActor, RecordHandle};
pub use session::{Session, SessionState};
pub use controller::{Notice, SessionController, View};
pub use presenter::{run_session, Presenter};
