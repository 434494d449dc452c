//! Summary entry types.

/// Outcome of one resource for summary reporting.
#[derive(Debug, Clone)]
pub struct ResourceEntry {
    /// Resource description.
    pub name: String,
    /// Final status.
    pub status: ResourceStatus,
    /// Optional detail message (e.g., skip reason or error description).
    pub message: Option<String>,
}

/// Status of a processed resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceStatus {
    /// Already in the desired state.
    Ok,
    /// Changed to reach the desired state.
    Changed,
    /// Deliberately left alone.
    Skipped,
    /// Dry run; a change would have been made.
    DryRun,
    /// Could not be validated or converged.
    Failed,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resource_status_equality() {
        assert_eq!(ResourceStatus::Ok, ResourceStatus::Ok);
        assert_ne!(ResourceStatus::Ok, ResourceStatus::Changed);
        assert_ne!(ResourceStatus::Skipped, ResourceStatus::DryRun);
    }
}
