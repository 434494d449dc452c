#![allow(
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::wildcard_imports,
    clippy::indexing_slicing
)]
//! Integration tests for the `refresh` command.

mod common;

use common::*;
use config_profile::cli::RefreshOpts;
use config_profile::commands::refresh;
use config_profile::logging::{Logger, ResourceStatus};
use config_profile::resources::provider::ProfileProvider;

const CATALOG: &str = r#"
[profile."com.example.dock"]
user = "alice"
path = "{root}/payloads/dock.mobileconfig"

[profile."com.example.wifi"]
system = true
path = "{root}/payloads/wifi.mobileconfig"
"#;

fn host() -> TestHost {
    let host = TestHost::new();
    host.write_payload("wifi.mobileconfig", "com.example.wifi", 1);
    host.write_payload("dock.mobileconfig", "com.example.dock", 1);
    host.write_catalog(CATALOG);
    host
}

fn opts(ids: &[&str]) -> RefreshOpts {
    RefreshOpts {
        identifiers: ids.iter().map(ToString::to_string).collect(),
    }
}

#[test]
fn installed_profile_is_reapplied() {
    let host = host();
    host.record_stamp(None, "com.example.wifi", "wifi.mobileconfig");
    let fake = FakeProfiles::new().with_installed(None, "com.example.wifi");
    let provider = host.provider(&fake);

    let log = Logger::new(None);
    refresh::run(&opts(&["com.example.wifi"]), &host.load_catalog(), &provider, &log, false)
        .unwrap();

    let wifi = host.payload_path("wifi.mobileconfig");
    assert_eq!(
        fake.changes(),
        vec![format!("profiles -I -F {}", wifi.display())]
    );
    assert!(host.has_stamp(None, "com.example.wifi"));
    assert_eq!(log.entries()[0].status, ResourceStatus::Changed);
}

#[test]
fn absent_profile_is_skipped() {
    let host = host();
    let fake = FakeProfiles::new().with_console_user("alice");
    let provider = host.provider(&fake);

    let log = Logger::new(None);
    refresh::run(&opts(&["com.example.dock"]), &host.load_catalog(), &provider, &log, false)
        .unwrap();

    assert!(fake.changes().is_empty());
    let entries = log.entries();
    assert_eq!(entries[0].status, ResourceStatus::Skipped);
    assert_eq!(entries[0].message.as_deref(), Some("profile is not present"));
}

#[test]
fn user_refresh_needs_console_session() {
    let host = host();
    host.record_stamp(Some("alice"), "com.example.dock", "dock.mobileconfig");
    let fake = FakeProfiles::new().with_installed(Some("alice"), "com.example.dock");
    let provider = host.provider(&fake);

    let log = Logger::new(None);
    let err = refresh::run(&opts(&["com.example.dock"]), &host.load_catalog(), &provider, &log, false)
        .unwrap_err();
    assert_eq!(err.to_string(), "1 profile(s) failed");
    assert!(fake.changes().is_empty());
}

#[test]
fn unknown_identifier_fails_others_still_refresh() {
    let host = host();
    host.record_stamp(None, "com.example.wifi", "wifi.mobileconfig");
    let fake = FakeProfiles::new().with_installed(None, "com.example.wifi");
    let provider = host.provider(&fake);

    let log = Logger::new(None);
    let result = refresh::run(
        &opts(&["com.example.nope", "com.example.wifi"]),
        &host.load_catalog(),
        &provider,
        &log,
        false,
    );
    assert!(result.is_err());

    let entries = log.entries();
    assert_eq!(entries[0].name, "com.example.nope");
    assert_eq!(entries[0].status, ResourceStatus::Failed);
    assert_eq!(entries[1].status, ResourceStatus::Changed);
}

#[test]
fn changed_payload_is_reapplied() {
    let host = host();
    host.record_stamp(None, "com.example.wifi", "wifi.mobileconfig");
    host.write_payload("wifi.mobileconfig", "com.example.wifi", 2);
    let fake = FakeProfiles::new().with_installed(None, "com.example.wifi");
    let provider = host.provider(&fake);

    let log = Logger::new(None);
    refresh::run(&opts(&["com.example.wifi"]), &host.load_catalog(), &provider, &log, false)
        .unwrap();

    let wifi = host.payload_path("wifi.mobileconfig");
    assert_eq!(
        fake.changes(),
        vec![format!("profiles -I -F {}", wifi.display())]
    );
    assert_eq!(log.entries()[0].status, ResourceStatus::Changed);

    let catalog = host.load_catalog();
    let wifi = catalog.get("com.example.wifi").unwrap();
    assert!(!provider.is_outdated(wifi).unwrap());
}

#[test]
fn dry_run_does_not_call_profiles() {
    let host = host();
    let fake = FakeProfiles::new().with_installed(None, "com.example.wifi");
    let provider = host.provider(&fake);

    let log = Logger::new(None);
    refresh::run(&opts(&["com.example.wifi"]), &host.load_catalog(), &provider, &log, true)
        .unwrap();
    assert!(fake.calls().is_empty());
    assert_eq!(log.entries()[0].status, ResourceStatus::DryRun);
}
