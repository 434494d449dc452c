//! Content stamps recording which profile file content was last installed.
//!
//! The `profiles` tool only reports identifiers, not content, so a changed
//! `.mobileconfig` is detected by comparing its SHA-256 digest against the
//! digest stored at install time.
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use super::profile::Scope;

/// Directory of stamps for device-wide profiles.
const SYSTEM_DIR: &str = "system";

/// Directory containing one stamp directory per user.
const USERS_DIR: &str = "users";

/// On-disk store of content stamps, one file per installed profile.
#[derive(Debug, Clone)]
pub struct StampStore {
    root: PathBuf,
}

impl StampStore {
    /// Create a store rooted at `root`. Nothing is created until a stamp is recorded.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn stamp_path(&self, scope: Scope<'_>, identifier: &str) -> PathBuf {
        let dir = match scope {
            Scope::System => self.root.join(SYSTEM_DIR),
            Scope::User(user) => self.root.join(USERS_DIR).join(sanitize(user)),
        };
        dir.join(format!("{}.sha256", sanitize(identifier)))
    }

    /// Record the digest of `file` as the installed content of `identifier`.
    ///
    /// # Errors
    ///
    /// Returns an error if `file` cannot be read or the stamp cannot be written.
    pub fn record(&self, scope: Scope<'_>, identifier: &str, file: &Path) -> Result<()> {
        let digest = compute_sha256(file)?;
        let path = self.stamp_path(scope, identifier);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating stamp directory {}", parent.display()))?;
        }
        fs::write(&path, digest).with_context(|| format!("writing stamp {}", path.display()))
    }

    /// Whether the recorded digest matches the current content of `file`.
    ///
    /// A missing stamp counts as a mismatch.
    ///
    /// # Errors
    ///
    /// Returns an error if `file` or an existing stamp cannot be read.
    pub fn is_current(&self, scope: Scope<'_>, identifier: &str, file: &Path) -> Result<bool> {
        let path = self.stamp_path(scope, identifier);
        if !path.exists() {
            return Ok(false);
        }
        let recorded = fs::read_to_string(&path)
            .with_context(|| format!("reading stamp {}", path.display()))?;
        Ok(recorded.trim() == compute_sha256(file)?)
    }

    /// Forget the stamp of `identifier`. Missing stamps are ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if an existing stamp cannot be deleted.
    pub fn clear(&self, scope: Scope<'_>, identifier: &str) -> Result<()> {
        let path = self.stamp_path(scope, identifier);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e).with_context(|| format!("removing stamp {}", path.display())),
        }
    }
}

/// Compute the lowercase hex SHA-256 digest of the file at `path`.
///
/// # Errors
///
/// Returns an error if the file cannot be read.
pub fn compute_sha256(path: &Path) -> Result<String> {
    use sha2::{Digest, Sha256};
    use std::fmt::Write as _;

    let bytes =
        fs::read(path).with_context(|| format!("reading profile {}", path.display()))?;
    let result = Sha256::digest(&bytes);
    let mut hex = String::with_capacity(64);
    for b in &result {
        // write! to a String is infallible
        write!(hex, "{b:02x}").unwrap_or(());
    }
    Ok(hex)
}

fn sanitize(name: &str) -> String {
    name.replace(['/', '\\'], "_")
}
