//! Apply command: converge every catalog profile.
use anyhow::Result;

use crate::catalog::Catalog;
use crate::logging::{Logger, ResourceStatus};
use crate::resources::ensure::Ensure;
use crate::resources::profile::ProfileResource;
use crate::resources::provider::ProfileProvider;
use crate::resources::{ResourceChange, ResourceState};

/// Converge all valid profiles in identifier order.
///
/// A failing profile is recorded and the remaining ones are still processed.
///
/// # Errors
///
/// Returns an error if any profile was rejected or failed to converge.
pub fn run(
    catalog: &Catalog,
    provider: &dyn ProfileProvider,
    log: &Logger,
    dry_run: bool,
) -> Result<()> {
    log.stage("Converging profiles");
    super::record_rejected(catalog, log);

    for profile in &catalog.profiles {
        if dry_run {
            preview(profile, provider, log);
        } else {
            converge(profile, provider, log);
        }
    }

    super::finish(log)
}

const fn verb(profile: &ProfileResource) -> &'static str {
    match profile.ensure() {
        Ensure::Present => "install",
        Ensure::Absent => "remove",
    }
}

fn converge(profile: &ProfileResource, provider: &dyn ProfileProvider, log: &Logger) {
    let desc = profile.description();
    match profile.converge(provider) {
        Ok(ResourceChange::Applied) => {
            log.info(&format!("{}: {desc}", verb(profile)));
            log.record(&desc, ResourceStatus::Changed, Some(verb(profile)));
        }
        Ok(ResourceChange::AlreadyCorrect) => {
            log.debug(&format!("ok: {desc}"));
            log.record(&desc, ResourceStatus::Ok, None);
        }
        Err(e) => {
            log.error(&e.to_string());
            log.record(&desc, ResourceStatus::Failed, Some(&format!("{e:#}")));
        }
    }
}

fn preview(profile: &ProfileResource, provider: &dyn ProfileProvider, log: &Logger) {
    let desc = profile.description();
    match profile.current_state(provider) {
        Ok(ResourceState::Correct) => {
            log.debug(&format!("ok: {desc}"));
            log.record(&desc, ResourceStatus::Ok, None);
        }
        Ok(ResourceState::Incorrect { current }) => {
            log.dry_run(&format!("would {} {desc} (currently {current})", verb(profile)));
            log.record(&desc, ResourceStatus::DryRun, None);
        }
        Err(e) => {
            log.error(&e.to_string());
            log.record(&desc, ResourceStatus::Failed, Some(&format!("{e:#}")));
        }
    }
}
