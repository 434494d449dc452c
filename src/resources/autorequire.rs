//! Dependency descriptors inferred from profile attributes.
//!
//! A profile never talks to the resource graph itself. It reports plain
//! names per [`Domain`] and the host decides which of them refer to
//! resources it manages.
use std::fmt;

use serde::Deserialize;

/// Default parent directory of user home directories on macOS.
pub const DEFAULT_HOME_ROOT: &str = "/Users";

/// Default name template of the task that prepares a user's home directory.
pub const DEFAULT_HOME_TASK: &str = "managed_{user}_home";

/// Placeholder substituted with the user name in [`Conventions::home_task`].
const USER_PLACEHOLDER: &str = "{user}";

/// Kind of resource a dependency refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Domain {
    /// A file or directory.
    File,
    /// A user account.
    User,
    /// A command run by the host.
    Exec,
}

impl Domain {
    /// All domains, in the order they are queried.
    pub const ALL: [Self; 3] = [Self::File, Self::User, Self::Exec];
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File => write!(f, "file"),
            Self::User => write!(f, "user"),
            Self::Exec => write!(f, "exec"),
        }
    }
}

/// One inferred dependency: a resource name within a domain.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Dependency {
    /// Resource kind.
    pub domain: Domain,
    /// Resource name (path, user name or task name).
    pub name: String,
}

impl Dependency {
    /// Create a dependency descriptor.
    #[must_use]
    pub fn new(domain: Domain, name: impl Into<String>) -> Self {
        Self {
            domain,
            name: name.into(),
        }
    }
}

impl fmt::Display for Dependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let title = match self.domain {
            Domain::File => "File",
            Domain::User => "User",
            Domain::Exec => "Exec",
        };
        write!(f, "{title}[{}]", self.name)
    }
}

/// Site conventions that shape defaults and inferred dependencies.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Conventions {
    /// Parent directory of user homes; `home` defaults to `<home_root>/<user>`.
    pub home_root: String,
    /// Template of the exec task preparing a user's home. `{user}` is
    /// replaced by the user name; an empty template disables the dependency.
    pub home_task: String,
}

impl Default for Conventions {
    fn default() -> Self {
        Self {
            home_root: DEFAULT_HOME_ROOT.to_string(),
            home_task: DEFAULT_HOME_TASK.to_string(),
        }
    }
}

impl Conventions {
    /// Conventional home directory of `user`.
    ///
    /// Always nested under `home_root`, even for a user name with slashes.
    #[must_use]
    pub fn home_for(&self, user: &str) -> String {
        format!(
            "{}/{}",
            self.home_root.trim_end_matches('/'),
            user.trim_start_matches('/')
        )
    }

    /// Name of the home-preparation task for `user`, if one is configured.
    #[must_use]
    pub fn home_task_for(&self, user: &str) -> Option<String> {
        if self.home_task.is_empty() {
            return None;
        }
        Some(self.home_task.replace(USER_PLACEHOLDER, user))
    }
}
