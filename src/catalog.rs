//! Desired-state catalog loading.
//!
//! The catalog is a TOML file with three optional sections:
//!
//! ```toml
//! [conventions]
//! home_root = "/Users"
//! home_task = "managed_{user}_home"
//!
//! [declared]
//! file = ["/Library/Profiles/wifi.mobileconfig"]
//! user = ["alice"]
//! exec = ["managed_alice_home"]
//!
//! [profile."com.example.wifi"]
//! path = "/Library/Profiles/wifi.mobileconfig"
//! user = "alice"
//! ```
//!
//! Each profile is validated on its own; an invalid entry is reported in
//! [`Catalog::rejected`] and does not prevent the others from loading.
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{CatalogError, ValidationError};
use crate::resources::autorequire::{Conventions, Dependency, Domain};
use crate::resources::profile::ProfileResource;

/// Default catalog file name, relative to the working directory.
pub const DEFAULT_CATALOG: &str = "profiles.toml";

/// Resources managed elsewhere that profiles may depend on.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Declared {
    /// Managed files and directories.
    pub file: Vec<String>,
    /// Managed user accounts.
    pub user: Vec<String>,
    /// Managed commands.
    pub exec: Vec<String>,
}

impl Declared {
    /// Whether `dep` names a declared resource.
    #[must_use]
    pub fn contains(&self, dep: &Dependency) -> bool {
        let names = match dep.domain {
            Domain::File => &self.file,
            Domain::User => &self.user,
            Domain::Exec => &self.exec,
        };
        names.iter().any(|n| n == &dep.name)
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct CatalogFile {
    #[serde(default)]
    conventions: Conventions,
    #[serde(default)]
    declared: Declared,
    #[serde(default)]
    profile: BTreeMap<String, toml::Table>,
}

/// A catalog entry that failed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejected {
    /// Identifier (table key) of the entry.
    pub identifier: String,
    /// Why it was rejected.
    pub error: ValidationError,
}

/// All declared profiles, validated.
#[derive(Debug)]
pub struct Catalog {
    /// File the catalog was read from.
    pub path: PathBuf,
    /// Site conventions used for defaults and inferred dependencies.
    pub conventions: Conventions,
    /// Resources managed outside this catalog.
    pub declared: Declared,
    /// Valid profiles, ordered by identifier.
    pub profiles: Vec<ProfileResource>,
    /// Entries that failed validation, ordered by identifier.
    pub rejected: Vec<Rejected>,
}

impl Catalog {
    /// Read and validate the catalog at `path`.
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogError`] if the file is missing, unreadable, not
    /// valid TOML, or has malformed conventions. Invalid profile entries are
    /// not errors; they are collected in [`Catalog::rejected`].
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        if !path.exists() {
            return Err(CatalogError::NotFound(path.to_path_buf()));
        }
        let content = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(path, &content)
    }

    /// Validate catalog `content`; `path` is used for reporting only.
    ///
    /// # Errors
    ///
    /// See [`Catalog::load`].
    pub fn parse(path: &Path, content: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile = toml::from_str(content).map_err(|source| CatalogError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        if !Path::new(&file.conventions.home_root).is_absolute() {
            return Err(CatalogError::InvalidSection {
                section: "conventions".to_string(),
                message: format!(
                    "home_root must be fully qualified, not '{}'",
                    file.conventions.home_root
                ),
            });
        }

        let mut profiles = Vec::new();
        let mut rejected = Vec::new();
        for (identifier, raw) in &file.profile {
            match ProfileResource::from_attributes(identifier, raw, &file.conventions) {
                Ok(profile) => profiles.push(profile),
                Err(error) => {
                    tracing::debug!("rejected profile {identifier}: {error}");
                    rejected.push(Rejected {
                        identifier: identifier.clone(),
                        error,
                    });
                }
            }
        }

        Ok(Self {
            path: path.to_path_buf(),
            conventions: file.conventions,
            declared: file.declared,
            profiles,
            rejected,
        })
    }

    /// Look up a valid profile by identifier.
    #[must_use]
    pub fn get(&self, identifier: &str) -> Option<&ProfileResource> {
        self.profiles.iter().find(|p| p.identifier() == identifier)
    }

    /// Whether `identifier` was declared but rejected.
    #[must_use]
    pub fn rejection(&self, identifier: &str) -> Option<&Rejected> {
        self.rejected.iter().find(|r| r.identifier == identifier)
    }
}
