//! Domain-specific error types for profile management.
//!
//! Library code returns the typed errors below; command handlers at the CLI
//! boundary convert them to [`anyhow::Error`] via the standard `?` operator.
//!
//! # Error hierarchy
//!
//! ```text
//! ValidationError            : building one resource from its attributes
//! ├── Scope(ScopeError)      : system/user selection
//! └── Path(PathError)        : non-absolute path or home
//! ConvergenceError           : provider install/remove/refresh/retrieve failure
//! CatalogError               : reading or parsing the catalog file
//! ```

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Mutually exclusive or missing scope selection.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScopeError {
    /// `system = true` was combined with a user.
    #[error("Scope error: must not set both user and system (user '{user}')")]
    BothScopes {
        /// The user that was set alongside `system`.
        user: String,
    },

    /// Neither `system = true` nor a user was given.
    #[error("No scope defined: must set user or system")]
    NoScope,
}

/// Attribute carrying a filesystem path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathAttribute {
    /// The profile file location.
    Path,
    /// The user's home directory.
    Home,
}

impl fmt::Display for PathAttribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Path => write!(f, "Profile"),
            Self::Home => write!(f, "Home"),
        }
    }
}

/// A path attribute that is not absolute.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{attribute} path must be fully qualified, not '{value}'")]
pub struct PathError {
    /// Which attribute held the path.
    pub attribute: PathAttribute,
    /// The rejected value.
    pub value: String,
}

/// Errors raised while building a resource from its declared attributes.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Scope selection is invalid.
    #[error(transparent)]
    Scope(#[from] ScopeError),

    /// A path attribute is not absolute.
    #[error(transparent)]
    Path(#[from] PathError),

    /// An attribute has a value of the wrong type or outside its allowed set.
    #[error("Invalid value for '{attribute}': {value} (expected {expected})")]
    InvalidValue {
        /// Attribute name.
        attribute: String,
        /// Rendered offending value.
        value: String,
        /// Description of what is accepted.
        expected: &'static str,
    },

    /// The attribute is not known to the profile resource.
    #[error("Invalid parameter '{0}'")]
    UnknownAttribute(String),

    /// The identifier is empty.
    #[error("Profile identifier must not be empty")]
    MissingIdentifier,
}

/// Provider operation that failed during convergence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// Reading the actual state.
    Retrieve,
    /// Installing or updating the profile.
    Install,
    /// Removing the profile.
    Remove,
    /// Re-applying an installed profile.
    Refresh,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Retrieve => write!(f, "retrieve"),
            Self::Install => write!(f, "install"),
            Self::Remove => write!(f, "remove"),
            Self::Refresh => write!(f, "refresh"),
        }
    }
}

/// A provider failure, attributed to one profile.
#[derive(Error, Debug)]
#[error("Profile '{identifier}': {operation} failed: {source:#}")]
pub struct ConvergenceError {
    /// Identifier of the profile being converged.
    pub identifier: String,
    /// Operation that failed.
    pub operation: Operation,
    /// Underlying provider error.
    pub source: anyhow::Error,
}

/// Errors that arise from loading the catalog file.
#[derive(Error, Debug)]
pub enum CatalogError {
    /// The catalog file does not exist.
    #[error("Catalog not found: {}", .0.display())]
    NotFound(PathBuf),

    /// An I/O error occurred while reading the catalog.
    #[error("IO error reading catalog {}: {source}", .path.display())]
    Io {
        /// Path to the file that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The catalog is not valid TOML.
    #[error("Invalid TOML in {}: {source}", .path.display())]
    Parse {
        /// Path to the catalog.
        path: PathBuf,
        /// Underlying parse error.
        source: toml::de::Error,
    },

    /// A top-level section has the wrong shape.
    #[error("Invalid section [{section}]: {message}")]
    InvalidSection {
        /// Section name.
        section: String,
        /// What is wrong with it.
        message: String,
    },
}
