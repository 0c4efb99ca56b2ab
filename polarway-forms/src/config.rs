//! Configuration for Polarway Forms

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::auth::PasswordScheme;

/// Forms configuration
#[derive(Debug, Clone)]
pub struct FormsConfig {
    /// Directory holding the credential and record files
    pub base_path: PathBuf,

    /// Credential file, relative to `base_path` unless absolute
    pub credentials_file: PathBuf,

    /// Record spreadsheet, relative to `base_path` unless absolute
    pub records_file: PathBuf,

    /// Name given to the first sheet when the spreadsheet is created
    pub sheet_name: String,

    /// How sign-up stores new passwords
    pub password_scheme: PasswordScheme,

    /// Extra attempts for a record append that hit a transient I/O error
    pub write_retries: u32,

    /// Backoff before the first retry (doubles on each attempt)
    pub retry_backoff: Duration,

    /// Mailbox size for the auth and record actors
    pub channel_capacity: usize,
}

impl FormsConfig {
    /// Create config with sensible defaults
    ///
    /// # Arguments
    /// * `base_path` - Data directory.
    ///   Expected layout:
    ///   ```text
    ///   base_path/
    ///   ├── config.yaml      (pre-provisioned credentials)
    ///   └── form_data.xlsx   (created on first submission)
    ///   ```
    pub fn new(base_path: impl AsRef<Path>) -> Self {
        Self {
            base_path: base_path.as_ref().to_path_buf(),
            credentials_file: PathBuf::from("config.yaml"),
            records_file: PathBuf::from("form_data.xlsx"),
            sheet_name: "Sheet1".to_string(),
            password_scheme: PasswordScheme::Plaintext,
            write_retries: 3,
            retry_backoff: Duration::from_millis(50),
            channel_capacity: 64,
        }
    }

    /// Override the credential file location
    pub fn with_credentials_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.credentials_file = path.into();
        self
    }

    /// Override the record spreadsheet location
    pub fn with_records_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.records_file = path.into();
        self
    }

    /// Override the sheet name used for new spreadsheets
    pub fn with_sheet_name(mut self, name: impl Into<String>) -> Self {
        self.sheet_name = name.into();
        self
    }

    /// Override the password scheme for new sign-ups
    pub fn with_password_scheme(mut self, scheme: PasswordScheme) -> Self {
        self.password_scheme = scheme;
        self
    }

    /// Override the append retry policy
    pub fn with_write_retries(mut self, retries: u32, backoff: Duration) -> Self {
        self.write_retries = retries;
        self.retry_backoff = backoff;
        self
    }

    /// Resolved path of the credential file
    pub fn credentials_path(&self) -> PathBuf {
        self.base_path.join(&self.credentials_file)
    }

    /// Resolved path of the record spreadsheet
    pub fn records_path(&self) -> PathBuf {
        self.base_path.join(&self.records_file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let cfg = FormsConfig::new("/tmp/test_forms");
        assert_eq!(cfg.credentials_path(), PathBuf::from("/tmp/test_forms/config.yaml"));
        assert_eq!(cfg.records_path(), PathBuf::from("/tmp/test_forms/form_data.xlsx"));
        assert_eq!(cfg.sheet_name, "Sheet1");
        assert_eq!(cfg.password_scheme, PasswordScheme::Plaintext);
        assert_eq!(cfg.write_retries, 3);
    }

    #[test]
    fn test_builder_pattern() {
        let cfg = FormsConfig::new("/data")
            .with_credentials_file("/etc/forms/users.yaml")
            .with_records_file("records.xlsx")
            .with_password_scheme(PasswordScheme::Argon2)
            .with_write_retries(0, Duration::from_millis(1));

        // absolute overrides win over base_path
        assert_eq!(cfg.credentials_path(), PathBuf::from("/etc/forms/users.yaml"));
        assert_eq!(cfg.records_path(), PathBuf::from("/data/records.xlsx"));
        assert_eq!(cfg.password_scheme, PasswordScheme::Argon2);
        assert_eq!(cfg.write_retries, 0);
    }
}
