//! Check command: validate the catalog and show inferred relationships.
use std::fmt::Write as _;

use anyhow::Result;

use crate::catalog::Catalog;
use crate::logging::Logger;
use crate::relationships;

/// Render the catalog report.
///
/// One block per accepted profile listing its dependencies, then one line per
/// rejected entry. Dependencies the catalog does not declare are marked
/// `unmanaged`; they produce no ordering edge.
#[must_use]
pub fn report(catalog: &Catalog) -> String {
    let mut out = String::new();
    for profile in &catalog.profiles {
        let _ = writeln!(out, "{} [{}]", profile.description(), profile.ensure());
        let (resolved, unmanaged) = relationships::partition(profile, &catalog.declared);
        for dep in resolved {
            let _ = writeln!(out, "  requires {dep}");
        }
        for dep in unmanaged {
            let _ = writeln!(out, "  unmanaged {dep}");
        }
    }
    for rejected in &catalog.rejected {
        let _ = writeln!(out, "rejected {}: {}", rejected.identifier, rejected.error);
    }
    out
}

/// Log the report and fail if the catalog has rejected entries.
///
/// # Errors
///
/// Returns an error if any catalog entry was rejected.
pub fn run(catalog: &Catalog, log: &Logger) -> Result<()> {
    log.stage("Checking catalog");
    for line in report(catalog).lines() {
        if line.starts_with("rejected ") {
            log.error(line);
        } else {
            log.info(line);
        }
    }

    let edges = relationships::resolve(catalog);
    log.debug(&format!("{} ordering edge(s)", edges.len()));
    for edge in &edges {
        log.debug(&edge.to_string());
    }

    if !catalog.rejected.is_empty() {
        anyhow::bail!("{} profile(s) rejected", catalog.rejected.len());
    }
    Ok(())
}
