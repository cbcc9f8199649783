//! Dashboard counters derived from store state.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::models::{ConsultantStatus, ProjectPhase};
use crate::store::{StoreState, WorkflowStore};

/// Headline numbers for the dashboard
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    /// Projects per workflow phase; every phase is present
    pub projects_by_phase: BTreeMap<ProjectPhase, usize>,
    /// Consultants per status; only statuses in use appear
    pub consultants_by_status: BTreeMap<String, usize>,
    pub unread_messages: usize,
    /// Assigned consultants over all consultants, 0 when there are none
    pub utilization: f64,
}

impl DashboardSummary {
    #[must_use]
    pub fn from_state(state: &StoreState) -> Self {
        let mut projects_by_phase: BTreeMap<ProjectPhase, usize> = ProjectPhase::ALL.iter().map(|p| (*p, 0)).collect();
        for project in state.projects.values() {
            *projects_by_phase.entry(project.workflow_phase()).or_default() += 1;
        }

        let mut consultants_by_status = BTreeMap::new();
        for consultant in state.consultants.values() {
            let label = serde_json::to_value(consultant.status)
                .ok()
                .and_then(|v| v.as_str().map(ToString::to_string))
                .unwrap_or_default();
            *consultants_by_status.entry(label).or_default() += 1;
        }

        let assigned = state
            .consultants
            .values()
            .filter(|c| c.status == ConsultantStatus::Assigned)
            .count();
        let utilization = if state.consultants.is_empty() {
            0.0
        } else {
            assigned as f64 / state.consultants.len() as f64
        };

        Self {
            projects_by_phase,
            consultants_by_status,
            unread_messages: state.messages.iter().filter(|m| !m.read).count(),
            utilization,
        }
    }
}

impl WorkflowStore {
    /// Current dashboard counters
    #[must_use]
    pub fn summary(&self) -> DashboardSummary {
        DashboardSummary::from_state(self.snapshot())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed::demo_state;

    #[test]
    fn test_demo_summary() {
        let summary = DashboardSummary::from_state(&demo_state());
        assert_eq!(summary.projects_by_phase[&ProjectPhase::Unassigned], 2);
        assert_eq!(summary.projects_by_phase[&ProjectPhase::Completed], 0);
        assert_eq!(summary.consultants_by_status["available"], 3);
        assert_eq!(summary.unread_messages, 1);
        assert!((summary.utilization - 1.0 / 6.0).abs() < f64::EPSILON);
    }
}
