//! Auth domain types — Role, PasswordScheme, CredentialEntry, CredentialFile
//!
//! Serializable, cloneable, and cheap to pass around.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Access level stored with each credential entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    User,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::User => "user",
        }
    }

    /// Label of the login path that leads to this role
    pub fn path_label(&self) -> &'static str {
        match self {
            Self::Admin => "Admin",
            Self::User => "User",
        }
    }

    /// Admins read and write; users only read
    pub fn can_submit(&self) -> bool {
        matches!(self, Self::Admin)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How sign-up writes a new password to the credential file
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PasswordScheme {
    /// Stored verbatim, compared with exact string equality
    #[default]
    Plaintext,
    /// Salted Argon2 PHC string
    Argon2,
}

/// One username's stored password and role
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialEntry {
    #[serde(default)]
    pub username: String,
    pub password: String,
    pub role: Role,
}

impl CredentialEntry {
    pub fn new(username: impl Into<String>, password: impl Into<String>, role: Role) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            role,
        }
    }
}

/// On-disk layout of the credential file
///
/// ```yaml
/// users:
///   admin:
///     username: admin
///     password: secret
///     role: admin
/// ```
///
/// Keys other than `users` are carried through rewrites untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CredentialFile {
    pub users: BTreeMap<String, CredentialEntry>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_yaml::Value>,
}
