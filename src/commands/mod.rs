//! Top-level subcommand orchestration.
pub mod apply;
pub mod check;
pub mod refresh;

use anyhow::{Context, Result};

use crate::catalog::Catalog;
use crate::cli::GlobalOpts;
use crate::logging::{Logger, ResourceStatus};

/// Load the catalog named on the command line and log what it contains.
///
/// # Errors
///
/// Returns an error if the catalog cannot be read or parsed.
pub fn load_catalog(global: &GlobalOpts, log: &Logger) -> Result<Catalog> {
    log.stage("Loading catalog");
    let catalog = Catalog::load(&global.catalog)
        .with_context(|| format!("loading {}", global.catalog.display()))?;

    log.debug(&format!("catalog: {}", catalog.path.display()));
    log.debug(&format!("home root: {}", catalog.conventions.home_root));
    log.info(&format!(
        "loaded {} profile(s), {} rejected",
        catalog.profiles.len(),
        catalog.rejected.len()
    ));
    if catalog.profiles.is_empty() && catalog.rejected.is_empty() {
        log.warn(&format!("{} declares no profiles", catalog.path.display()));
    }
    Ok(catalog)
}

/// Record every rejected catalog entry as a failure.
pub fn record_rejected(catalog: &Catalog, log: &Logger) {
    for rejected in &catalog.rejected {
        log.error(&format!("{}: {}", rejected.identifier, rejected.error));
        log.record(
            &rejected.identifier,
            ResourceStatus::Failed,
            Some(&rejected.error.to_string()),
        );
    }
}

/// Print the summary and bail if any resource failed.
///
/// # Errors
///
/// Returns an error if one or more resources recorded a failure.
pub fn finish(log: &Logger) -> Result<()> {
    log.print_summary();

    let count = log.failure_count();
    if count > 0 {
        anyhow::bail!("{count} profile(s) failed");
    }
    Ok(())
}
