use std::time::Duration;

use metrics::{counter, gauge, histogram};

use crate::models::ProjectPhase;

/// Store operations by name and outcome
pub const OPERATIONS_TOTAL: &str = "staffing_store_operations_total";
/// Store operation latency in seconds
pub const OPERATION_DURATION: &str = "staffing_store_operation_duration_seconds";
/// Projects entering a phase
pub const PHASE_TRANSITIONS_TOTAL: &str = "staffing_phase_transitions_total";
/// Invitation messages created
pub const INVITATIONS_SENT_TOTAL: &str = "staffing_invitations_sent_total";
/// Messages flipped from unread to read
pub const MESSAGES_READ_TOTAL: &str = "staffing_messages_read_total";
/// Current unread inbox size
pub const UNREAD_MESSAGES: &str = "staffing_unread_messages";

/// Metrics collection and management
///
/// Each call emits through the `metrics` facade and keeps a local tally, so
/// the numbers are observable without a recorder installed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetricsCollector {
    /// Store operations attempted
    pub operations_total: u64,
    /// Store operations rejected
    pub failures_total: u64,
    /// Phase entries, including shortlisting into internal interviews
    pub phase_transitions_total: u64,
    /// Invitation messages created
    pub invitations_sent_total: u64,
    /// Messages marked read
    pub messages_read_total: u64,
}

impl MetricsCollector {
    /// Record a store operation
    pub fn record_operation(&mut self, operation: &'static str, duration: Duration, success: bool) {
        let outcome = if success { "success" } else { "error" };
        counter!(OPERATIONS_TOTAL, "operation" => operation, "outcome" => outcome).increment(1);
        histogram!(OPERATION_DURATION, "operation" => operation).record(duration.as_secs_f64());

        self.operations_total += 1;
        if !success {
            self.failures_total += 1;
        }
    }

    /// Record a project entering `phase`
    pub fn record_phase_transition(&mut self, phase: ProjectPhase) {
        counter!(PHASE_TRANSITIONS_TOTAL, "phase" => phase.as_str()).increment(1);
        self.phase_transitions_total += 1;
    }

    /// Record invitations created
    pub fn record_invitations(&mut self, count: usize) {
        let count = count as u64;
        counter!(INVITATIONS_SENT_TOTAL).increment(count);
        self.invitations_sent_total += count;
    }

    /// Record messages marked read
    pub fn record_messages_read(&mut self, count: usize) {
        let count = count as u64;
        counter!(MESSAGES_READ_TOTAL).increment(count);
        self.messages_read_total += count;
    }

    /// Publish the unread inbox size
    pub fn update_unread_gauge(&self, unread: usize) {
        gauge!(UNREAD_MESSAGES).set(unread as f64);
    }

    /// Share of operations that were rejected
    #[must_use]
    pub fn failure_rate(&self) -> f64 {
        if self.operations_total == 0 {
            0.0
        } else {
            self.failures_total as f64 / self.operations_total as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_collector_creation() {
        let collector = MetricsCollector::default();
        assert_eq!(collector.operations_total, 0);
        assert_eq!(collector.failure_rate(), 0.0);
    }

    #[test]
    fn test_failure_rate() {
        let mut collector = MetricsCollector::default();
        collector.record_operation("add_project", Duration::from_millis(1), true);
        collector.record_operation("add_project", Duration::from_millis(1), false);
        assert_eq!(collector.failure_rate(), 0.5);
    }
}
