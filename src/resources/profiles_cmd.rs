//! [`ProfileProvider`] backed by the macOS `profiles(1)` command.
use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result, bail};

use super::ensure::Ensure;
use super::profile::{ProfileResource, Scope};
use super::provider::ProfileProvider;
use super::stamp::StampStore;
use crate::exec::Executor;

/// Program used to list, install and remove profiles.
pub const PROFILES_CMD: &str = "profiles";

/// Prefix of device-level entries in `profiles -P` output.
const COMPUTER_LEVEL: &str = "_computerlevel";

/// Marker preceding the identifier in listing output.
const IDENTIFIER_MARKER: &str = "profileIdentifier:";

/// Installs profiles with `profiles -I`, removes them with `profiles -R`.
///
/// User profiles can only be loaded while the user has a GUI session, so
/// installing one first checks `who` for a `console` login.
#[derive(Debug)]
pub struct ProfilesCommandProvider<'a> {
    executor: &'a dyn Executor,
    stamps: StampStore,
}

impl<'a> ProfilesCommandProvider<'a> {
    /// Create a provider running commands through `executor` and keeping
    /// content stamps in `stamps`.
    #[must_use]
    pub const fn new(executor: &'a dyn Executor, stamps: StampStore) -> Self {
        Self { executor, stamps }
    }

    /// Identifiers installed at `scope`.
    ///
    /// # Errors
    ///
    /// Returns an error if `profiles` is unavailable or the listing fails.
    pub fn installed(&self, scope: Scope<'_>) -> Result<HashSet<String>> {
        if !self.executor.which(PROFILES_CMD) {
            bail!("'{PROFILES_CMD}' command not found; configuration profiles require macOS");
        }
        let result = match scope {
            Scope::System => self.executor.run(PROFILES_CMD, &["-P"])?,
            Scope::User(user) => self.executor.run(PROFILES_CMD, &["-L", "-U", user])?,
        };
        Ok(result
            .stdout
            .lines()
            .filter(|line| match scope {
                Scope::System => line.trim_start().starts_with(COMPUTER_LEVEL),
                Scope::User(_) => true,
            })
            .filter_map(parse_identifier)
            .collect())
    }

    fn ensure_console_session(&self, user: &str) -> Result<()> {
        let result = self.executor.run("who", &[])?;
        let logged_in = result.stdout.lines().any(|line| {
            let mut fields = line.split_whitespace();
            fields.next() == Some(user) && fields.next() == Some("console")
        });
        if !logged_in {
            bail!(
                "user '{user}' is not logged in at the console; user profiles need a GUI session"
            );
        }
        Ok(())
    }

    fn profile_file<'p>(profile: &'p ProfileResource) -> Result<&'p Path> {
        let path = profile
            .path()
            .map(Path::new)
            .with_context(|| format!("no path given for profile '{}'", profile.identifier()))?;
        if !path.exists() {
            bail!("profile file not found: {}", path.display());
        }
        Ok(path)
    }
}

impl ProfileProvider for ProfilesCommandProvider<'_> {
    fn retrieve(&self, profile: &ProfileResource) -> Result<Ensure> {
        if self.installed(profile.scope())?.contains(profile.identifier()) {
            Ok(Ensure::Present)
        } else {
            Ok(Ensure::Absent)
        }
    }

    fn install(&self, profile: &ProfileResource) -> Result<()> {
        let path = Self::profile_file(profile)?;
        let path_str = path.to_string_lossy();
        match profile.scope() {
            Scope::System => {
                self.executor
                    .run(PROFILES_CMD, &["-I", "-F", &path_str])?;
            }
            Scope::User(user) => {
                self.ensure_console_session(user)?;
                self.executor
                    .run(PROFILES_CMD, &["-I", "-F", &path_str, "-U", user])?;
            }
        }
        self.stamps
            .record(profile.scope(), profile.identifier(), path)
    }

    fn remove(&self, profile: &ProfileResource) -> Result<()> {
        let id = profile.identifier();
        match profile.scope() {
            Scope::System => {
                self.executor.run(PROFILES_CMD, &["-R", "-p", id])?;
            }
            Scope::User(user) => {
                self.executor
                    .run(PROFILES_CMD, &["-R", "-p", id, "-U", user])?;
            }
        }
        self.stamps.clear(profile.scope(), id)
    }

    fn refresh(&self, profile: &ProfileResource) -> Result<()> {
        self.install(profile)
    }

    fn is_outdated(&self, profile: &ProfileResource) -> Result<bool> {
        let Some(path) = profile.path().map(Path::new) else {
            return Ok(false);
        };
        if !path.exists() {
            return Ok(false);
        }
        let current = self
            .stamps
            .is_current(profile.scope(), profile.identifier(), path)?;
        if !current {
            tracing::debug!("{}: profile file changed since install", profile.identifier());
        }
        Ok(!current)
    }
}

fn parse_identifier(line: &str) -> Option<String> {
    let (_, rest) = line.split_once(IDENTIFIER_MARKER)?;
    let id = rest.trim();
    (!id.is_empty()).then(|| id.to_string())
}
