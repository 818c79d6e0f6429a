#![allow(clippy::unwrap_used, clippy::arithmetic_side_effects)]

//! Integration tests for 2FAS import: export file → candidates →
//! keychain rewrite.

use std::fs;

use twofa_keychain::{read_export, ImportFormat, KeyKind, KeySpec, Keychain, KeychainError};
use twofa_otp::OtpDigits;

/// Build a minimal valid plaintext 2FAS backup JSON.
fn make_backup_json(services: &[serde_json::Value]) -> String {
    serde_json::json!({
        "services": services,
        "groups": [],
        "schemaVersion": 4,
        "servicesEncrypted": null,
        "reference": null
    })
    .to_string()
}

fn make_service(name: &str, account: &str, secret: &str, otp: serde_json::Value) -> serde_json::Value {
    let mut otp = otp;
    otp["account"] = serde_json::Value::String(account.to_string());
    serde_json::json!({
        "name": name,
        "secret": secret,
        "otp": otp,
    })
}

#[test]
fn import_from_file_merges_into_sorted_keychain() {
    let dir = tempfile::tempdir().unwrap();
    let export = dir.path().join("2fas-backup.json");
    fs::write(
        &export,
        make_backup_json(&[
            make_service("Git Lab", "me", "JBSW Y3DP EE", serde_json::json!({ "tokenType": "TOTP" })),
            make_service(
                "Bank",
                "",
                "GEZDGNBVGY3TQOJQ",
                serde_json::json!({ "tokenType": "HOTP", "digits": 8 }),
            ),
            make_service("Steam", "gamer", "JBSWY3DPEE", serde_json::json!({ "tokenType": "STEAM" })),
            make_service("Broken", "x", "1111", serde_json::json!({})),
        ]),
    )
    .unwrap();

    let mut keychain = Keychain::load(dir.path().join(".2fa")).unwrap();
    keychain.add_key("aardvark", KeySpec::default(), "JBSWY3DPEE").unwrap();

    let parsed = read_export(ImportFormat::TwoFas, &export).unwrap();
    assert_eq!(parsed.unsupported.len(), 1);
    let report = keychain.import(parsed.candidates).unwrap();

    assert_eq!(report.imported, vec!["Git_Lab/me", "Bank"]);
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].name, "Broken/x");

    let reloaded = Keychain::load(keychain.path()).unwrap();
    assert_eq!(reloaded.list(), vec!["Bank", "Git_Lab/me", "aardvark"]);
    let bank = reloaded.get("Bank").unwrap();
    assert_eq!(bank.kind(), KeyKind::Hotp);
    assert_eq!(bank.digits(), OtpDigits::Eight);

    let on_disk = fs::read_to_string(keychain.path()).unwrap();
    let order: Vec<&str> = on_disk.lines().map(|l| l.split(' ').next().unwrap()).collect();
    assert_eq!(order, vec!["aardvark", "Bank", "Git_Lab/me"]);
}

#[test]
fn reimporting_skips_everything() {
    let dir = tempfile::tempdir().unwrap();
    let export = dir.path().join("backup.json");
    fs::write(
        &export,
        make_backup_json(&[make_service("Svc", "acct", "JBSWY3DPEE", serde_json::json!({}))]),
    )
    .unwrap();

    let mut keychain = Keychain::load(dir.path().join(".2fa")).unwrap();
    let first = keychain
        .import(read_export(ImportFormat::TwoFas, &export).unwrap().candidates)
        .unwrap();
    assert_eq!(first.imported.len(), 1);
    let before = fs::read(keychain.path()).unwrap();

    let second = keychain
        .import(read_export(ImportFormat::TwoFas, &export).unwrap().candidates)
        .unwrap();
    assert!(second.imported.is_empty());
    assert_eq!(second.skipped[0].reason, "key \"Svc/acct\" already exists");
    assert_eq!(fs::read(keychain.path()).unwrap(), before);
}

#[test]
fn missing_export_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let result = read_export(ImportFormat::TwoFas, &dir.path().join("absent.json"));
    assert!(matches!(result, Err(KeychainError::Io(_))));
}

#[test]
fn garbage_export_is_import_error() {
    let dir = tempfile::tempdir().unwrap();
    let export = dir.path().join("bad.json");
    fs::write(&export, "{ not json").unwrap();
    assert!(matches!(
        read_export(ImportFormat::TwoFas, &export),
        Err(KeychainError::Import(_))
    ));
}
