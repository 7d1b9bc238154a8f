// Windows-only integration test: resolves the built-in administrator through
// PowerShell and checks it against NetUserGetInfo.
#![cfg(windows)]
#![allow(clippy::expect_used, reason = "Expect is not an issue in tests")]
#![allow(clippy::unwrap_used, reason = "Unwrap is not an issue in tests")]

use serde::Deserialize;
use std::process::{Command, Stdio};
use win_account_lookup::{
    AccountDirectory, AccountName, AccountPresence, Level0, Level1, Level23, LookupOutcome, bridge,
    text_codec::to_native_terminated,
};

#[derive(Debug, Deserialize)]
struct PsAccount {
    name: String,
    sid: String,
}

fn run_powershell(args: &[&str]) -> std::io::Result<std::process::Output> {
    Command::new("pwsh")
        .args(args)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .or_else(|_| {
            Command::new("powershell")
                .args(args)
                .stdout(Stdio::piped())
                .stderr(Stdio::piped())
                .output()
        })
}

fn builtin_admin() -> PsAccount {
    const PS_SCRIPT: &str = include_str!("assets/get_builtin_admin.ps1");

    let args = &[
        "-NoLogo",
        "-NoProfile",
        "-NonInteractive",
        "-ExecutionPolicy",
        "Bypass",
        "-Command",
        PS_SCRIPT,
    ];

    let out = run_powershell(args).expect("Failed to launch PowerShell");
    assert!(
        out.status.success(),
        "PowerShell failed: {}",
        String::from_utf8_lossy(&out.stderr)
    );
    serde_json::from_slice(out.stdout.as_slice()).expect("Invalid JSON from PowerShell")
}

#[test]
fn existing_account_has_true() {
    let admin = builtin_admin();
    assert_eq!(
        bridge::get(&admin.name).unwrap(),
        AccountPresence { has: true },
        "{} should exist",
        admin.name
    );
}

#[test]
fn missing_account_has_false() {
    assert_eq!(
        bridge::get("ThisAccountShouldNotExist_12345").unwrap(),
        AccountPresence { has: false }
    );
}

#[test]
fn lookup_surfaces_the_sid() {
    let admin = builtin_admin();
    let info = bridge::lookup(&admin.name, None)
        .unwrap()
        .expect("administrator should be found");
    assert!(
        info.name.eq_ignore_ascii_case(&admin.name),
        "name mismatch: {} vs {}",
        info.name,
        admin.name
    );
    assert_eq!(info.sid.as_deref(), Some(admin.sid.as_str()));
    assert!(info.flags.is_some(), "level 23 carries flags");
}

#[test]
fn one_directory_serves_many_lookups() {
    let admin = builtin_admin();
    let present = to_native_terminated(&admin.name).unwrap();
    let missing = to_native_terminated("ThisAccountShouldNotExist_12345").unwrap();

    let mut directory = AccountDirectory::<Level23>::new();
    for _ in 0..8 {
        match directory.lookup_local(&present).unwrap() {
            LookupOutcome::Found(record) => {
                assert_eq!(record.sid_string().unwrap(), admin.sid);
            }
            LookupOutcome::NotFound => unreachable!("administrator vanished"),
        }
        assert!(!directory.lookup_local(&missing).unwrap().is_found());
        assert!(directory.record().is_none(), "NotFound releases the record");
    }
}

#[test]
fn levels_carry_their_own_fields() {
    let admin = builtin_admin();
    let account = AccountName::local(admin.name.clone()).unwrap();

    let mut level0 = AccountDirectory::<Level0>::new();
    let LookupOutcome::Found(record) = level0.lookup_name(&account).unwrap() else {
        unreachable!("administrator should be found at level 0");
    };
    let info = record.info().unwrap();
    assert!(info.flags.is_none() && info.sid.is_none(), "level 0 is name only");

    let mut level1 = AccountDirectory::<Level1>::new();
    let LookupOutcome::Found(record) = level1.lookup_name(&account).unwrap() else {
        unreachable!("administrator should be found at level 1");
    };
    assert_eq!(
        record.info().unwrap().privilege,
        Some(win_account_lookup::Privilege::Administrator)
    );
}

#[test]
fn unreachable_server_is_a_system_failure() {
    let result = bridge::lookup("Administrator", Some("\\\\no-such-host.invalid"));
    assert!(
        matches!(result, Err(win_account_lookup::Error::SystemFailure { .. })),
        "got {result:?}"
    );
}
