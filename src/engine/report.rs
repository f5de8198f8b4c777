//! Migration Reporting
//!
//! Accounting for a migration run: how many documents were migrated,
//! skipped (already at the target version), or failed, plus every warning
//! raised along the way. Recovered conditions are never silent: each one
//! lands here and is echoed at warn level.

use serde::{Deserialize, Serialize};
use tracing::warn;

// ============================================================================
// Report
// ============================================================================

/// Report accumulated across one migration run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MigrationReport {
    /// Documents rewritten to the target schema.
    pub migrated_count: usize,
    /// Documents already at the target version (no-op successes).
    pub skipped_count: usize,
    /// Documents that could not be migrated at all.
    pub failed_count: usize,
    /// Non-fatal conditions recovered during migration.
    pub warnings: Vec<String>,
}

impl MigrationReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total documents the run attempted.
    pub fn attempted_count(&self) -> usize {
        self.migrated_count + self.skipped_count + self.failed_count
    }

    /// Record a document rewritten to the target schema.
    pub fn record_migrated(&mut self) {
        self.migrated_count += 1;
    }

    /// Record a document skipped by the idempotency guard.
    pub fn record_skipped(&mut self) {
        self.skipped_count += 1;
    }

    /// Record a document that failed outright.
    pub fn record_failed(&mut self) {
        self.failed_count += 1;
    }

    /// Record a recovered condition.
    pub fn add_warning(&mut self, message: impl Into<String>) {
        let message = message.into();
        warn!("{message}");
        self.warnings.push(message);
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// One-line summary for console output.
    pub fn summary(&self) -> String {
        format!(
            "{} attempted: {} migrated, {} skipped, {} failed, {} warnings",
            self.attempted_count(),
            self.migrated_count,
            self.skipped_count,
            self.failed_count,
            self.warnings.len()
        )
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_starts_empty() {
        let report = MigrationReport::new();
        assert_eq!(report.attempted_count(), 0);
        assert!(!report.has_warnings());
    }

    #[test]
    fn test_report_counts() {
        let mut report = MigrationReport::new();
        report.record_migrated();
        report.record_migrated();
        report.record_skipped();
        report.record_failed();

        assert_eq!(report.migrated_count, 2);
        assert_eq!(report.skipped_count, 1);
        assert_eq!(report.failed_count, 1);
        assert_eq!(report.attempted_count(), 4);
    }

    #[test]
    fn test_report_warnings() {
        let mut report = MigrationReport::new();
        report.add_warning("unknown attribute word 'blazing'");

        assert!(report.has_warnings());
        assert_eq!(report.warnings.len(), 1);
        assert!(report.warnings[0].contains("blazing"));
    }

    #[test]
    fn test_report_summary() {
        let mut report = MigrationReport::new();
        report.record_migrated();
        report.record_skipped();

        let summary = report.summary();
        assert!(summary.contains("2 attempted"));
        assert!(summary.contains("1 migrated"));
        assert!(summary.contains("1 skipped"));
    }
}
