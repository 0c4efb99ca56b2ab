//! AuthActor integration tests — authenticate, sign-up, duplicates, hashing

mod common;

use std::path::PathBuf;

use tempfile::TempDir;

use polarway_forms::auth::{AuthActor, CredentialStore, PasswordScheme, Role};
use polarway_forms::config::FormsConfig;
use polarway_forms::FormsError;

const SEED: &str = "\
users:
  admin:
    username: admin
    password: secret
    role: admin
  carol:
    username: carol
    password: Carol-PW
    role: user
";

fn seeded_config(dir: &TempDir) -> FormsConfig {
    common::init_tracing();
    std::fs::write(dir.path().join("config.yaml"), SEED).unwrap();
    FormsConfig::new(dir.path())
}

fn credentials_path(dir: &TempDir) -> PathBuf {
    dir.path().join("config.yaml")
}

#[tokio::test]
async fn test_authenticate_returns_stored_role() {
    let dir = TempDir::new().unwrap();
    let handle = AuthActor::spawn(&seeded_config(&dir)).await.unwrap();

    let admin = handle.authenticate("admin".into(), "secret".into()).await.unwrap();
    assert_eq!(admin, Some(Role::Admin));

    let carol = handle.authenticate("carol".into(), "Carol-PW".into()).await.unwrap();
    assert_eq!(carol, Some(Role::User));
}

#[tokio::test]
async fn test_authenticate_rejects_mismatches() {
    let dir = TempDir::new().unwrap();
    let handle = AuthActor::spawn(&seeded_config(&dir)).await.unwrap();

    for (user, pass) in [
        ("admin", "wrong"),
        ("admin", "SECRET"),
        ("Admin", "secret"),
        ("carol", "carol-pw"),
        ("nobody", "secret"),
        ("", ""),
    ] {
        let role = handle.authenticate(user.into(), pass.into()).await.unwrap();
        assert_eq!(role, None, "{user}/{pass} should not authenticate");
    }
}

#[tokio::test]
async fn test_spawn_fails_without_credential_file() {
    let dir = TempDir::new().unwrap();
    let result = AuthActor::spawn(&FormsConfig::new(dir.path())).await;
    assert!(matches!(result, Err(FormsError::ConfigUnavailable { .. })));
}

#[tokio::test]
async fn test_authenticate_reloads_every_call() {
    let dir = TempDir::new().unwrap();
    let handle = AuthActor::spawn(&seeded_config(&dir)).await.unwrap();

    // edit the file behind the actor's back
    let rotated = SEED.replace("password: secret", "password: rotated");
    std::fs::write(credentials_path(&dir), rotated).unwrap();

    let old = handle.authenticate("admin".into(), "secret".into()).await.unwrap();
    assert_eq!(old, None);
    let new = handle.authenticate("admin".into(), "rotated".into()).await.unwrap();
    assert_eq!(new, Some(Role::Admin));

    // file removed after startup: the error surfaces instead of a stale answer
    std::fs::remove_file(credentials_path(&dir)).unwrap();
    let gone = handle.authenticate("admin".into(), "rotated".into()).await;
    assert!(matches!(gone, Err(FormsError::ConfigUnavailable { .. })));
}

#[tokio::test]
async fn test_sign_up_then_load() {
    let dir = TempDir::new().unwrap();
    let handle = AuthActor::spawn(&seeded_config(&dir)).await.unwrap();

    let before = CredentialStore::new(credentials_path(&dir)).load().unwrap();
    let entry = handle.sign_up("alice".into(), "pw1".into()).await.unwrap();
    assert_eq!(entry.role, Role::User);

    let after = CredentialStore::new(credentials_path(&dir)).load().unwrap();
    assert_eq!(after.len(), 3);
    assert_eq!(after["alice"].username, "alice");
    assert_eq!(after["alice"].password, "pw1");
    assert_eq!(after["alice"].role, Role::User);
    for (name, entry) in &before {
        assert_eq!(&after[name], entry, "{name} must be unchanged");
    }

    let role = handle.authenticate("alice".into(), "pw1".into()).await.unwrap();
    assert_eq!(role, Some(Role::User));
}

#[tokio::test]
async fn test_duplicate_sign_up_leaves_file_untouched() {
    let dir = TempDir::new().unwrap();
    let handle = AuthActor::spawn(&seeded_config(&dir)).await.unwrap();
    let before = std::fs::read(credentials_path(&dir)).unwrap();

    let result = handle.sign_up("carol".into(), "other".into()).await;
    assert!(matches!(result, Err(FormsError::DuplicateUsername(ref u)) if u == "carol"));

    // admin entries cannot be shadowed by sign-up either
    let result = handle.sign_up("admin".into(), "mine-now".into()).await;
    assert!(matches!(result, Err(FormsError::DuplicateUsername(_))));

    let after = std::fs::read(credentials_path(&dir)).unwrap();
    assert_eq!(before, after);
}

#[tokio::test]
async fn test_incomplete_sign_up() {
    let dir = TempDir::new().unwrap();
    let handle = AuthActor::spawn(&seeded_config(&dir)).await.unwrap();
    let before = std::fs::read(credentials_path(&dir)).unwrap();

    for (user, pass) in [("", "pw"), ("dave", ""), ("", "")] {
        let result = handle.sign_up(user.into(), pass.into()).await;
        assert!(matches!(result, Err(FormsError::IncompleteInput(_))));
    }
    assert_eq!(before, std::fs::read(credentials_path(&dir)).unwrap());
}

#[tokio::test]
async fn test_hashed_sign_up() {
    let dir = TempDir::new().unwrap();
    let config = seeded_config(&dir).with_password_scheme(PasswordScheme::Argon2);
    let handle = AuthActor::spawn(&config).await.unwrap();

    handle.sign_up("erin".into(), "Hunter2!".into()).await.unwrap();

    let raw = std::fs::read_to_string(credentials_path(&dir)).unwrap();
    assert!(!raw.contains("Hunter2!"));
    let users = CredentialStore::new(credentials_path(&dir)).load().unwrap();
    assert!(users["erin"].password.starts_with("$argon2"));

    let ok = handle.authenticate("erin".into(), "Hunter2!".into()).await.unwrap();
    assert_eq!(ok, Some(Role::User));
    let bad = handle.authenticate("erin".into(), "hunter2!".into()).await.unwrap();
    assert_eq!(bad, None);

    // pre-provisioned plaintext entries still work under the hashed scheme
    let admin = handle.authenticate("admin".into(), "secret".into()).await.unwrap();
    assert_eq!(admin, Some(Role::Admin));
}

#[tokio::test]
async fn test_concurrent_sign_ups_are_serialized() {
    let dir = TempDir::new().unwrap();
    let handle = AuthActor::spawn(&seeded_config(&dir)).await.unwrap();

    let mut tasks = Vec::new();
    for i in 0..8 {
        let h = handle.clone();
        tasks.push(tokio::spawn(async move {
            h.sign_up(format!("user{i}"), format!("pw{i}")).await
        }));
    }
    for task in tasks {
        task.await.unwrap().unwrap();
    }

    let users = CredentialStore::new(credentials_path(&dir)).load().unwrap();
    assert_eq!(users.len(), 10);
    assert_eq!(handle.ensure_available().await.unwrap(), 10);
}
