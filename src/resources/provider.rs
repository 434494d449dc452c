//! Provider interface that performs the actual profile changes.
use anyhow::Result;

use super::ensure::Ensure;
use super::profile::ProfileResource;

/// Queries and changes installed profiles on behalf of a [`ProfileResource`].
///
/// The resource decides *whether* to act; the provider decides *how*.
/// Implementations must make [`install`](Self::install) safe to repeat: an
/// already installed profile with unchanged content is left alone, changed
/// content is updated.
#[cfg_attr(test, mockall::automock)]
pub trait ProfileProvider {
    /// Read the actual `ensure` state of the profile from the live system.
    ///
    /// # Errors
    ///
    /// Returns an error if the installed profiles cannot be listed.
    fn retrieve(&self, profile: &ProfileResource) -> Result<Ensure>;

    /// Install or update the profile at its scope.
    ///
    /// # Errors
    ///
    /// Returns an error if the profile cannot be installed.
    fn install(&self, profile: &ProfileResource) -> Result<()>;

    /// Remove the profile from its scope.
    ///
    /// # Errors
    ///
    /// Returns an error if the profile cannot be removed.
    fn remove(&self, profile: &ProfileResource) -> Result<()>;

    /// Re-apply an installed profile, e.g. after its file changed.
    ///
    /// # Errors
    ///
    /// Returns an error if the profile cannot be re-applied.
    fn refresh(&self, profile: &ProfileResource) -> Result<()>;

    /// Whether an installed profile no longer matches its source file.
    ///
    /// Only asked once [`retrieve`](Self::retrieve) reported the profile as
    /// present and presence is wanted. Providers that cannot tell keep the
    /// default.
    ///
    /// # Errors
    ///
    /// Returns an error if the installed content cannot be compared.
    fn is_outdated(&self, _profile: &ProfileResource) -> Result<bool> {
        Ok(false)
    }
}
