//! Dependency edges between catalog resources and profiles.
//!
//! Autorequire descriptors only become edges when the catalog declares the
//! named resource; anything else is left to the host and ignored here.
use std::fmt;

use crate::catalog::{Catalog, Declared};
use crate::resources::autorequire::Dependency;
use crate::resources::profile::ProfileResource;

/// `before` must be realised before the profile `profile` is converged.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Edge {
    /// The required resource.
    pub before: Dependency,
    /// Identifier of the dependent profile.
    pub profile: String,
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} => Config_profile[{}]", self.before, self.profile)
    }
}

/// Split the dependencies of `profile` into declared and undeclared ones.
#[must_use]
pub fn partition(profile: &ProfileResource, declared: &Declared) -> (Vec<Dependency>, Vec<Dependency>) {
    profile
        .dependencies()
        .into_iter()
        .partition(|dep| declared.contains(dep))
}

/// All edges implied by the catalog, ordered by profile then dependency.
#[must_use]
pub fn resolve(catalog: &Catalog) -> Vec<Edge> {
    let mut edges: Vec<Edge> = catalog
        .profiles
        .iter()
        .flat_map(|profile| {
            let (resolved, _) = partition(profile, &catalog.declared);
            resolved.into_iter().map(|before| Edge {
                before,
                profile: profile.identifier().to_string(),
            })
        })
        .collect();
    edges.sort_by(|a, b| a.profile.cmp(&b.profile).then_with(|| a.before.cmp(&b.before)));
    edges
}
