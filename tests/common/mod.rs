// Shared helpers for integration tests.
//
// Provides a temporary-directory-backed catalog fixture and an in-memory
// stand-in for the `profiles` and `who` commands, so each integration test
// can drive the real provider without touching the host.
//
// Used by all integration test binaries that declare `mod common;`.
#![allow(dead_code)]

use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{Result, bail};
use config_profile::catalog::Catalog;
use config_profile::exec::{ExecResult, Executor};
use config_profile::resources::profile::Scope;
use config_profile::resources::profiles_cmd::ProfilesCommandProvider;
use config_profile::resources::stamp::StampStore;

/// Key under which device-wide profiles are kept by [`FakeProfiles`].
const SYSTEM: &str = "";

/// Minimal `.mobileconfig` payload carrying `identifier`.
pub fn mobileconfig(identifier: &str, revision: u32) -> String {
    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
         <plist version=\"1.0\"><dict>\n\
         <key>PayloadIdentifier</key><string>{identifier}</string>\n\
         <key>PayloadVersion</key><integer>{revision}</integer>\n\
         </dict></plist>\n"
    )
}

fn payload_identifier(content: &str) -> Option<&str> {
    let (_, rest) = content.split_once("<key>PayloadIdentifier</key><string>")?;
    let (id, _) = rest.split_once("</string>")?;
    Some(id)
}

/// In-memory emulation of `profiles(1)` and `who(1)`.
///
/// Installing reads the identifier from the payload file like the real tool.
/// Every invocation is logged as `"program arg1 arg2"`.
#[derive(Debug, Default)]
pub struct FakeProfiles {
    installed: Mutex<BTreeMap<String, BTreeSet<String>>>,
    console: Mutex<Vec<String>>,
    calls: Mutex<Vec<String>>,
}

impl FakeProfiles {
    /// Empty host: nothing installed, nobody logged in.
    pub fn new() -> Self {
        Self::default()
    }

    /// Pretend `user` has a GUI session.
    pub fn with_console_user(self, user: &str) -> Self {
        self.console.lock().unwrap().push(user.to_string());
        self
    }

    /// Pretend `identifier` is already installed at `user` (or device-wide).
    pub fn with_installed(self, user: Option<&str>, identifier: &str) -> Self {
        self.installed
            .lock()
            .unwrap()
            .entry(user.unwrap_or(SYSTEM).to_string())
            .or_default()
            .insert(identifier.to_string());
        self
    }

    /// Whether `identifier` is installed at `user` (or device-wide).
    pub fn is_installed(&self, user: Option<&str>, identifier: &str) -> bool {
        self.installed
            .lock()
            .unwrap()
            .get(user.unwrap_or(SYSTEM))
            .is_some_and(|ids| ids.contains(identifier))
    }

    /// Every command line run so far.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    /// Command lines that changed state (`profiles -I` and `profiles -R`).
    pub fn changes(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter(|c| c.starts_with("profiles -I") || c.starts_with("profiles -R"))
            .collect()
    }

    fn listing(&self, key: &str) -> String {
        let installed = self.installed.lock().unwrap();
        let prefix = if key == SYSTEM { "_computerlevel" } else { key };
        let ids = installed.get(key).cloned().unwrap_or_default();
        let mut out = String::new();
        for (n, id) in ids.iter().enumerate() {
            out.push_str(&format!("{prefix}[{}] attribute: profileIdentifier: {id}\n", n + 1));
        }
        out.push_str(&format!("There are {} configuration profiles installed\n", ids.len()));
        out
    }

    fn profiles(&self, args: &[&str]) -> Result<String> {
        let user = args
            .iter()
            .position(|a| *a == "-U")
            .and_then(|i| args.get(i + 1))
            .copied();
        let key = user.unwrap_or(SYSTEM).to_string();
        match args.first().copied() {
            Some("-P") => Ok(self.listing(SYSTEM)),
            Some("-L") => Ok(self.listing(&key)),
            Some("-I") => {
                let Some(file) = args.get(2) else {
                    bail!("missing -F argument");
                };
                let content = std::fs::read_to_string(file)?;
                let Some(id) = payload_identifier(&content) else {
                    bail!("profile is not a valid configuration profile");
                };
                self.installed
                    .lock()
                    .unwrap()
                    .entry(key)
                    .or_default()
                    .insert(id.to_string());
                Ok(String::new())
            }
            Some("-R") => {
                let Some(id) = args.get(2) else {
                    bail!("missing -p argument");
                };
                self.installed
                    .lock()
                    .unwrap()
                    .entry(key)
                    .or_default()
                    .remove(*id);
                Ok(String::new())
            }
            _ => bail!("unsupported profiles invocation: {args:?}"),
        }
    }
}

impl Executor for FakeProfiles {
    fn run(&self, program: &str, args: &[&str]) -> Result<ExecResult> {
        let result = self.run_unchecked(program, args)?;
        if !result.success {
            bail!("{program} failed: {}", result.stderr);
        }
        Ok(result)
    }

    fn run_unchecked(&self, program: &str, args: &[&str]) -> Result<ExecResult> {
        let mut line = program.to_string();
        for arg in args {
            line.push(' ');
            line.push_str(arg);
        }
        self.calls.lock().unwrap().push(line);

        let output = match program {
            "profiles" => self.profiles(args),
            "who" => Ok(self
                .console
                .lock()
                .unwrap()
                .iter()
                .map(|u| format!("{u}  console  Oct 18 09:00\n"))
                .collect()),
            other => bail!("unexpected program: {other}"),
        };
        Ok(match output {
            Ok(stdout) => ExecResult {
                stdout,
                stderr: String::new(),
                success: true,
                code: Some(0),
            },
            Err(e) => ExecResult {
                stdout: String::new(),
                stderr: e.to_string(),
                success: false,
                code: Some(1),
            },
        })
    }

    fn which(&self, program: &str) -> bool {
        program == "profiles"
    }
}

/// An isolated host layout backed by a [`tempfile::TempDir`].
///
/// Holds the catalog, the profile payloads and the stamp directory.
pub struct TestHost {
    /// Temporary directory containing everything.
    pub root: tempfile::TempDir,
}

impl TestHost {
    /// Create an empty host.
    pub fn new() -> Self {
        Self {
            root: tempfile::tempdir().expect("create temp dir"),
        }
    }

    /// Path to the catalog file.
    pub fn catalog_path(&self) -> PathBuf {
        self.root.path().join("profiles.toml")
    }

    /// Directory holding content stamps.
    pub fn state_dir(&self) -> PathBuf {
        self.root.path().join("state")
    }

    /// Absolute path of payload `name`.
    pub fn payload_path(&self, name: &str) -> PathBuf {
        self.root.path().join("payloads").join(name)
    }

    /// Write a payload for `identifier` at revision `revision` and return its path.
    pub fn write_payload(&self, name: &str, identifier: &str, revision: u32) -> PathBuf {
        let path = self.payload_path(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("create payload dir");
        }
        std::fs::write(&path, mobileconfig(identifier, revision)).expect("write payload");
        path
    }

    /// Write the catalog; `{root}` in `content` expands to the host root.
    pub fn write_catalog(&self, content: &str) {
        let content = content.replace("{root}", &self.root.path().to_string_lossy());
        std::fs::write(self.catalog_path(), content).expect("write catalog");
    }

    /// Load the catalog written by [`TestHost::write_catalog`].
    pub fn load_catalog(&self) -> Catalog {
        Catalog::load(&self.catalog_path()).expect("load catalog")
    }

    /// Provider driving `executor` with stamps under [`TestHost::state_dir`].
    pub fn provider<'a>(&self, executor: &'a FakeProfiles) -> ProfilesCommandProvider<'a> {
        ProfilesCommandProvider::new(executor, StampStore::new(self.state_dir()))
    }

    /// Record the current content of payload `name` as installed, as a
    /// previous run would have.
    pub fn record_stamp(&self, user: Option<&str>, identifier: &str, name: &str) {
        let scope = user.map_or(Scope::System, Scope::User);
        StampStore::new(self.state_dir())
            .record(scope, identifier, &self.payload_path(name))
            .expect("record stamp");
    }

    /// Whether a stamp file exists for `identifier` at `user` (or device-wide).
    pub fn has_stamp(&self, user: Option<&str>, identifier: &str) -> bool {
        let dir = match user {
            Some(user) => self.state_dir().join("users").join(user),
            None => self.state_dir().join("system"),
        };
        dir.join(format!("{identifier}.sha256")).exists()
    }
}

/// Root of `host` as a string, for assertions on rendered paths.
pub fn root_str(host: &TestHost) -> String {
    host.root.path().to_string_lossy().into_owned()
}

