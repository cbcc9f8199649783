//! Project phase transition rules
//!
//! [`plan_transition`] checks a requested phase change against the current
//! project and describes every side effect the store must apply. It never
//! mutates anything, so a rejected plan leaves the store untouched.

use crate::error::{Result, WorkflowError};
use crate::models::{ExecutionPhase, Project, ProjectPhase};

/// Notification text for shortlisting consultants.
pub const SUBMITTED_FOR_INTERVIEWS: &str = "Project submitted for internal interviews";

/// What kind of move a plan performs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionKind {
    /// Workflow phase moves forward
    Advance,
    /// Project stays in progress, execution phase changes
    ExecutionStep,
}

/// Side effects of one accepted phase change
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionPlan {
    /// Phase before the move
    pub from: ProjectPhase,
    /// Phase after the move
    pub to: ProjectPhase,
    /// Advance or execution step
    pub kind: TransitionKind,
    /// Execution phase after the move
    pub execution_phase: Option<ExecutionPhase>,
    /// Consultants on this project to set back to available
    pub release: Vec<String>,
    /// Consultants on this project to mark assigned
    pub engage: Vec<String>,
    /// Drop unselected relationships
    pub prune: bool,
    /// Text of the `phase_change` notification
    pub notification: String,
}

/// Notification text announcing entry into `phase`.
#[must_use]
pub const fn phase_announcement(phase: ProjectPhase) -> &'static str {
    match phase {
        ProjectPhase::ProfileDelivery => "Consultant profiles delivered to client",
        ProjectPhase::ClientInterviews => "Client interviews scheduled",
        ProjectPhase::InProgress => "Project kickoff initiated",
        ProjectPhase::Completed => "Project completed successfully",
        ProjectPhase::Unassigned | ProjectPhase::InternalInterviews => "Project phase updated",
    }
}

/// Phases that keep only the selected finalists.
const fn prunes_unselected(phase: ProjectPhase) -> bool {
    matches!(phase, ProjectPhase::ProfileDelivery | ProjectPhase::InProgress)
}

fn invalid(project: &Project, to: ProjectPhase, reason: &str) -> WorkflowError {
    WorkflowError::InvalidTransition {
        from: project.workflow_phase(),
        to,
        reason: reason.to_string(),
    }
}

/// Validate a phase change and compute its effects.
///
/// # Arguments
///
/// * `project` - Project in its current state
/// * `to` - Requested workflow phase
/// * `execution` - Requested execution phase, only valid with `in_progress`
///
/// # Returns
///
/// The plan to apply, or the reason the move is not allowed.
pub fn plan_transition(project: &Project, to: ProjectPhase, execution: Option<ExecutionPhase>) -> Result<TransitionPlan> {
    let from = project.workflow_phase();

    if from == ProjectPhase::InProgress && to == ProjectPhase::InProgress {
        let Some(step) = execution else {
            return Err(invalid(project, to, "project is already in progress"));
        };
        return Ok(TransitionPlan {
            from,
            to,
            kind: TransitionKind::ExecutionStep,
            execution_phase: Some(step),
            release: Vec::new(),
            engage: Vec::new(),
            prune: false,
            notification: format!("Execution phase changed to {}", step.as_str().replace('_', " ")),
        });
    }

    if to <= from {
        return Err(invalid(project, to, "phases only move forward"));
    }

    if execution.is_some() && to != ProjectPhase::InProgress {
        return Err(invalid(project, to, "execution phase only applies to in_progress"));
    }

    let (selected, unselected): (Vec<_>, Vec<_>) = project.matched_consultants().iter().partition(|m| m.selected);
    let prune = prunes_unselected(to);

    let release = if prune {
        unselected.iter().map(|m| m.consultant_id.clone()).collect()
    } else {
        Vec::new()
    };

    let engage = if to == ProjectPhase::InProgress {
        selected.iter().map(|m| m.consultant_id.clone()).collect()
    } else {
        Vec::new()
    };

    let execution_phase = match to {
        ProjectPhase::InProgress => Some(execution.unwrap_or(ExecutionPhase::Planning)),
        ProjectPhase::Completed => None,
        _ => project.execution_phase(),
    };

    Ok(TransitionPlan {
        from,
        to,
        kind: TransitionKind::Advance,
        execution_phase,
        release,
        engage,
        prune,
        notification: phase_announcement(to).to_string(),
    })
}
