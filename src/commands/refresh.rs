//! Refresh command: re-apply installed profiles after a dependency changed.
use anyhow::Result;

use crate::catalog::Catalog;
use crate::cli::RefreshOpts;
use crate::logging::{Logger, ResourceStatus};
use crate::resources::profile::{ProfileResource, RefreshOutcome};
use crate::resources::provider::ProfileProvider;

/// Refresh each named profile.
///
/// Identifiers that are unknown or were rejected by the catalog are recorded
/// as failures; the rest are still refreshed.
///
/// # Errors
///
/// Returns an error if any named profile could not be refreshed.
pub fn run(
    opts: &RefreshOpts,
    catalog: &Catalog,
    provider: &dyn ProfileProvider,
    log: &Logger,
    dry_run: bool,
) -> Result<()> {
    log.stage("Refreshing profiles");

    for identifier in &opts.identifiers {
        if let Some(profile) = catalog.get(identifier) {
            refresh(profile, provider, log, dry_run);
        } else if let Some(rejected) = catalog.rejection(identifier) {
            log.error(&format!("{identifier}: {}", rejected.error));
            log.record(
                identifier,
                ResourceStatus::Failed,
                Some(&rejected.error.to_string()),
            );
        } else {
            log.error(&format!("{identifier}: not declared in catalog"));
            log.record(
                identifier,
                ResourceStatus::Failed,
                Some("not declared in catalog"),
            );
        }
    }

    super::finish(log)
}

fn refresh(profile: &ProfileResource, provider: &dyn ProfileProvider, log: &Logger, dry_run: bool) {
    let desc = profile.description();
    if dry_run {
        log.dry_run(&format!("would refresh {desc}"));
        log.record(&desc, ResourceStatus::DryRun, None);
        return;
    }

    match profile.refresh(provider) {
        Ok(RefreshOutcome::Refreshed) => {
            log.info(&format!("refresh: {desc}"));
            log.record(&desc, ResourceStatus::Changed, Some("refreshed"));
        }
        Ok(RefreshOutcome::Skipped { reason }) => {
            log.debug(&format!("skipping refresh of {desc}; {reason}"));
            log.record(&desc, ResourceStatus::Skipped, Some(&reason));
        }
        Err(e) => {
            log.error(&e.to_string());
            log.record(&desc, ResourceStatus::Failed, Some(&format!("{e:#}")));
        }
    }
}
