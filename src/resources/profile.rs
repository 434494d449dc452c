//! Configuration-profile resource: validation, inferred dependencies,
//! convergence and refresh.
//!
//! A profile targets exactly one scope, either the whole device
//! (`system = true`) or a single user. Validation runs once, when the
//! resource is built, so an invalid declaration never reaches a provider.
use std::collections::BTreeSet;
use std::path::Path;

use super::autorequire::{Conventions, Dependency, Domain};
use super::ensure::{ENSURE_VALUES, Ensure};
use super::provider::ProfileProvider;
use super::{ResourceChange, ResourceState};
use crate::error::{
    ConvergenceError, Operation, PathAttribute, PathError, ScopeError, ValidationError,
};

/// Attribute names accepted in a raw attribute table, in validation order.
pub const ATTRIBUTES: [&str; 5] = ["ensure", "path", "system", "user", "home"];

/// Reason reported when a refresh is skipped.
const NOT_PRESENT: &str = "profile is not present";

/// Current value reported for an installed profile whose file changed.
const OUTDATED: &str = "outdated";

/// Declared attributes before validation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileAttributes {
    /// `PayloadIdentifier` of the profile.
    pub identifier: String,
    /// Desired lifecycle state.
    pub ensure: Ensure,
    /// Location of the `.mobileconfig` file.
    pub path: Option<String>,
    /// Device-wide profile.
    pub system: bool,
    /// User the profile targets.
    pub user: Option<String>,
    /// Home directory of `user`, when it cannot be guessed.
    pub home: Option<String>,
}

/// Target of a profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope<'a> {
    /// The whole device.
    System,
    /// One user account.
    User(&'a str),
}

/// Result of a refresh request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// The provider re-applied the profile.
    Refreshed,
    /// Nothing was done.
    Skipped {
        /// Why the refresh did not happen.
        reason: String,
    },
}

/// A validated configuration profile declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileResource {
    identifier: String,
    ensure: Ensure,
    path: Option<String>,
    system: bool,
    user: Option<String>,
    home: Option<String>,
    home_task: Option<String>,
}

impl ProfileResource {
    /// Validate typed attributes and derive defaults.
    ///
    /// Checks run in a fixed order (identifier, path, system, user, home;
    /// `ensure` is already typed) and the first failure is returned. `home` defaults to the conventional
    /// home of `user` once every explicit attribute has passed.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::Scope`] unless exactly one of `system` and
    /// `user` is chosen, and [`ValidationError::Path`] for a relative `path`
    /// or `home`.
    pub fn new(attrs: ProfileAttributes, conventions: &Conventions) -> Result<Self, ValidationError> {
        let ProfileAttributes {
            identifier,
            ensure,
            path,
            system,
            user,
            home,
        } = attrs;
        let user = user.filter(|u| !u.is_empty());

        if identifier.trim().is_empty() {
            return Err(ValidationError::MissingIdentifier);
        }
        if let Some(path) = &path {
            require_absolute(PathAttribute::Path, path)?;
        }
        if system && let Some(user) = &user {
            return Err(ScopeError::BothScopes { user: user.clone() }.into());
        }
        if !system && user.is_none() {
            return Err(ScopeError::NoScope.into());
        }
        if let Some(home) = &home {
            require_absolute(PathAttribute::Home, home)?;
        }

        let home = home.or_else(|| user.as_deref().map(|u| conventions.home_for(u)));
        if let Some(home) = &home {
            require_absolute(PathAttribute::Home, home)?;
        }
        let home_task = user.as_deref().and_then(|u| conventions.home_task_for(u));

        Ok(Self {
            identifier,
            ensure,
            path,
            system,
            user,
            home,
            home_task,
        })
    }

    /// Build a profile from a raw attribute table, as found in a catalog.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::MissingIdentifier`] first, then
    /// [`ValidationError::UnknownAttribute`] or
    /// [`ValidationError::InvalidValue`] for malformed input (values are read
    /// in the order ensure, path, system, user, home), then any error from
    /// [`ProfileResource::new`].
    pub fn from_attributes(
        identifier: &str,
        raw: &toml::Table,
        conventions: &Conventions,
    ) -> Result<Self, ValidationError> {
        if identifier.trim().is_empty() {
            return Err(ValidationError::MissingIdentifier);
        }
        if let Some(unknown) = raw.keys().find(|k| !ATTRIBUTES.contains(&k.as_str())) {
            return Err(ValidationError::UnknownAttribute(unknown.clone()));
        }

        let ensure = match raw.get("ensure") {
            None => Ensure::default(),
            Some(value) => {
                let text = string_value("ensure", value, ENSURE_VALUES)?;
                text.parse().map_err(|_| invalid("ensure", value, ENSURE_VALUES))?
            }
        };
        let path = optional_string(raw, "path")?;
        let system = match raw.get("system") {
            None => false,
            Some(value) => bool_value("system", value)?,
        };
        let user = optional_string(raw, "user")?;
        let home = optional_string(raw, "home")?;

        Self::new(
            ProfileAttributes {
                identifier: identifier.to_string(),
                ensure,
                path,
                system,
                user,
                home,
            },
            conventions,
        )
    }

    /// `PayloadIdentifier` of the profile.
    #[must_use]
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// Desired state.
    #[must_use]
    pub const fn ensure(&self) -> Ensure {
        self.ensure
    }

    /// Location of the profile file, if declared.
    #[must_use]
    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    /// Whether the profile is device-wide.
    #[must_use]
    pub const fn is_system(&self) -> bool {
        self.system
    }

    /// Target user, if user-scoped.
    #[must_use]
    pub fn user(&self) -> Option<&str> {
        self.user.as_deref()
    }

    /// Effective home directory (explicit or derived).
    #[must_use]
    pub fn home(&self) -> Option<&str> {
        self.home.as_deref()
    }

    /// Scope the profile is installed at.
    #[must_use]
    pub fn scope(&self) -> Scope<'_> {
        self.user.as_deref().map_or(Scope::System, Scope::User)
    }

    /// Human-readable description of this resource.
    #[must_use]
    pub fn description(&self) -> String {
        match self.scope() {
            Scope::System => format!("{} (system)", self.identifier),
            Scope::User(user) => format!("{} (user {user})", self.identifier),
        }
    }

    /// Names this profile depends on within one domain.
    ///
    /// - `file`: the profile file, and the home directory of a user-scoped profile
    /// - `user`: the target user
    /// - `exec`: the task preparing the target user's home
    #[must_use]
    pub fn autorequire(&self, domain: Domain) -> Vec<String> {
        match domain {
            Domain::File => {
                let mut files: Vec<String> = self.path.iter().cloned().collect();
                if self.user.is_some()
                    && let Some(home) = &self.home
                {
                    files.push(home.clone());
                }
                files
            }
            Domain::User => self.user.iter().cloned().collect(),
            Domain::Exec => self.home_task.iter().cloned().collect(),
        }
    }

    /// Every inferred dependency across all domains.
    #[must_use]
    pub fn dependencies(&self) -> BTreeSet<Dependency> {
        Domain::ALL
            .into_iter()
            .flat_map(|domain| {
                self.autorequire(domain)
                    .into_iter()
                    .map(move |name| Dependency::new(domain, name))
            })
            .collect()
    }

    /// Compare the actual state reported by `provider` with the desired one.
    ///
    /// A wanted profile that is installed but no longer matches its file is
    /// `Incorrect` with current value `outdated`.
    ///
    /// # Errors
    ///
    /// Returns a [`ConvergenceError`] if the provider cannot read the state.
    pub fn current_state(
        &self,
        provider: &dyn ProfileProvider,
    ) -> Result<ResourceState, ConvergenceError> {
        let actual = self.retrieve(provider)?;
        if actual != self.ensure {
            return Ok(ResourceState::Incorrect {
                current: actual.to_string(),
            });
        }
        if self.ensure == Ensure::Present
            && provider
                .is_outdated(self)
                .map_err(|e| self.failed(Operation::Retrieve, e))?
        {
            return Ok(ResourceState::Incorrect {
                current: OUTDATED.to_string(),
            });
        }
        Ok(ResourceState::Correct)
    }

    /// Bring the profile to its desired state.
    ///
    /// The provider is only asked to install or remove when the retrieved
    /// state differs from the desired one.
    ///
    /// # Errors
    ///
    /// Returns a [`ConvergenceError`] if any provider call fails. Nothing is
    /// retried.
    pub fn converge(
        &self,
        provider: &dyn ProfileProvider,
    ) -> Result<ResourceChange, ConvergenceError> {
        match self.current_state(provider)? {
            ResourceState::Correct => Ok(ResourceChange::AlreadyCorrect),
            ResourceState::Incorrect { .. } => {
                match self.ensure {
                    Ensure::Present => provider
                        .install(self)
                        .map_err(|e| self.failed(Operation::Install, e))?,
                    Ensure::Absent => provider
                        .remove(self)
                        .map_err(|e| self.failed(Operation::Remove, e))?,
                }
                Ok(ResourceChange::Applied)
            }
        }
    }

    /// Respond to a change notification from a dependency.
    ///
    /// Re-applies the profile only when it is currently installed.
    ///
    /// # Errors
    ///
    /// Returns a [`ConvergenceError`] if retrieving or refreshing fails.
    pub fn refresh(
        &self,
        provider: &dyn ProfileProvider,
    ) -> Result<RefreshOutcome, ConvergenceError> {
        if self.retrieve(provider)? == Ensure::Present {
            provider
                .refresh(self)
                .map_err(|e| self.failed(Operation::Refresh, e))?;
            Ok(RefreshOutcome::Refreshed)
        } else {
            tracing::debug!("{}: skipping refresh; {NOT_PRESENT}", self.identifier);
            Ok(RefreshOutcome::Skipped {
                reason: NOT_PRESENT.to_string(),
            })
        }
    }

    fn retrieve(&self, provider: &dyn ProfileProvider) -> Result<Ensure, ConvergenceError> {
        provider
            .retrieve(self)
            .map_err(|e| self.failed(Operation::Retrieve, e))
    }

    fn failed(&self, operation: Operation, source: anyhow::Error) -> ConvergenceError {
        ConvergenceError {
            identifier: self.identifier.clone(),
            operation,
            source,
        }
    }
}

fn require_absolute(attribute: PathAttribute, value: &str) -> Result<(), PathError> {
    if Path::new(value).is_absolute() {
        Ok(())
    } else {
        Err(PathError {
            attribute,
            value: value.to_string(),
        })
    }
}

fn invalid(attribute: &str, value: &toml::Value, expected: &'static str) -> ValidationError {
    ValidationError::InvalidValue {
        attribute: attribute.to_string(),
        value: value.to_string(),
        expected,
    }
}

fn string_value<'v>(
    attribute: &str,
    value: &'v toml::Value,
    expected: &'static str,
) -> Result<&'v str, ValidationError> {
    value
        .as_str()
        .ok_or_else(|| invalid(attribute, value, expected))
}

fn optional_string(raw: &toml::Table, attribute: &str) -> Result<Option<String>, ValidationError> {
    raw.get(attribute)
        .map(|value| string_value(attribute, value, "a string").map(str::to_string))
        .transpose()
}

fn bool_value(attribute: &str, value: &toml::Value) -> Result<bool, ValidationError> {
    const EXPECTED: &str = "true, false, yes or no";
    match value {
        toml::Value::Boolean(b) => Ok(*b),
        toml::Value::String(s) => match s.as_str() {
            "true" | "yes" => Ok(true),
            "false" | "no" => Ok(false),
            _ => Err(invalid(attribute, value, EXPECTED)),
        },
        _ => Err(invalid(attribute, value, EXPECTED)),
    }
}
