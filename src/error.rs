//! Error types for the staffing-workflow library.
//!
//! Every store operation returns [`Result`]. Failures fall into three kinds
//! (see [`FailureKind`]): a referenced entity is missing, the requested
//! workflow transition is not allowed, or the input itself is malformed.

use thiserror::Error;

use crate::models::ProjectPhase;

/// Errors that can occur while operating on the workflow store.
#[derive(Error, Debug)]
pub enum WorkflowError {
    /// Project id is not in the project table
    #[error("Project not found: {0}")]
    ProjectNotFound(String),

    /// Consultant id is not in the consultant table
    #[error("Consultant not found: {0}")]
    ConsultantNotFound(String),

    /// Message id is not in the inbox
    #[error("Message not found: {0}")]
    MessageNotFound(String),

    /// Consultant exists but is not matched to the project
    #[error("Consultant {consultant_id} is not matched to project {project_id}")]
    ConsultantNotOnProject {
        /// Project that was searched
        project_id: String,
        /// Consultant that was missing from it
        consultant_id: String,
    },

    /// The workflow does not allow moving between these phases
    #[error("Invalid transition from {from} to {to}: {reason}")]
    InvalidTransition {
        /// Phase the project is in
        from: ProjectPhase,
        /// Phase that was requested
        to: ProjectPhase,
        /// Why the move was refused
        reason: String,
    },

    /// Accept/decline was called on a message that is not a meeting invitation
    #[error("Message {0} is not a meeting invitation")]
    NotAnInvitation(String),

    /// Consultant is already selected on another active project
    #[error("Consultant {consultant_id} is already engaged on project {project_id}")]
    ConsultantEngaged {
        /// Consultant being assigned
        consultant_id: String,
        /// Project currently holding the consultant
        project_id: String,
    },

    /// A project with this id already exists
    #[error("Project already exists: {0}")]
    DuplicateProject(String),

    /// Input failed validation
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Document-intake payload could not be mapped
    #[error("Intake payload error: {0}")]
    Intake(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Coarse classification of a [`WorkflowError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// A referenced project, consultant or message is absent
    NotFound,
    /// The operation is not valid in the current workflow state
    InvalidTransition,
    /// The caller supplied malformed data
    MalformedInput,
}

impl WorkflowError {
    /// Classify this error for callers that only care about the failure kind.
    #[must_use]
    pub const fn kind(&self) -> FailureKind {
        match self {
            Self::ProjectNotFound(_)
            | Self::ConsultantNotFound(_)
            | Self::MessageNotFound(_)
            | Self::ConsultantNotOnProject { .. } => FailureKind::NotFound,
            Self::InvalidTransition { .. }
            | Self::NotAnInvitation(_)
            | Self::ConsultantEngaged { .. }
            | Self::DuplicateProject(_) => FailureKind::InvalidTransition,
            Self::InvalidInput(_) | Self::Intake(_) | Self::Serialization(_) => FailureKind::MalformedInput,
        }
    }

    /// True when the error is a missing-entity failure.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self.kind(), FailureKind::NotFound)
    }
}

/// Convenience type alias for Result with `WorkflowError`
pub type Result<T> = std::result::Result<T, WorkflowError>;

/// Fire-and-forget adapter for store results.
///
/// UI-style call sites that never surface failures can call `fail_soft()` to
/// drop the error. The error is still logged at debug level.
pub trait FailSoft<T> {
    /// Discard the error, returning `None` on failure.
    fn fail_soft(self) -> Option<T>;
}

impl<T> FailSoft<T> for Result<T> {
    fn fail_soft(self) -> Option<T> {
        match self {
            Ok(value) => Some(value),
            Err(err) => {
                tracing::debug!(error = %err, kind = ?err.kind(), "Ignoring store failure");
                None
            },
        }
    }
}
