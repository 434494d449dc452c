//! The configuration-profile resource and its collaborators.
//!
//! A [`profile::ProfileResource`] is built and validated from declared
//! attributes, reports the dependencies it infers, and converges through a
//! [`provider::ProfileProvider`].
pub mod autorequire;
pub mod ensure;
pub mod profile;
pub mod profiles_cmd;
pub mod provider;
pub mod stamp;

/// State of a resource compared against its desired state.
///
/// # Examples
///
/// ```
/// use config_profile::resources::ResourceState;
///
/// let correct = ResourceState::Correct;
/// let wrong = ResourceState::Incorrect { current: "absent".into() };
///
/// assert_ne!(correct, wrong);
/// assert_eq!(correct, ResourceState::Correct);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceState {
    /// Resource matches the desired state.
    Correct,
    /// Resource does not match the desired state.
    Incorrect {
        /// The current value of the resource.
        current: String,
    },
}

/// Result of converging a resource.
///
/// # Examples
///
/// ```
/// use config_profile::resources::ResourceChange;
///
/// let applied = ResourceChange::Applied;
/// assert_ne!(applied, ResourceChange::AlreadyCorrect);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceChange {
    /// Resource was created, updated or removed.
    Applied,
    /// Resource was already correct (no change needed).
    AlreadyCorrect,
}
