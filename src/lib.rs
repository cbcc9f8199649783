//! Staffing Workflow - Consultant Staffing Dashboard Store
//!
//! A Rust library holding the state behind a consultant staffing dashboard:
//! projects moving through a staffing workflow, the consultants matched to
//! them, and an inbox of interview invitations.
//!
//! # Features
//!
//! - Workflow phases with consultant status side effects
//! - Interview invitations that can be accepted or declined
//! - Project notes and notification feeds
//! - Document intake mapping
//! - Broadcast events for every accepted change

/// Time source
pub mod clock;
/// Configuration management
pub mod config;
/// Error types
pub mod error;
/// Store events
pub mod events;
/// Inbox operations
pub mod inbox;
/// Document intake mapping
pub mod intake;
/// Logging setup and utilities
pub mod logging;
/// Metrics collection
pub mod metrics;
/// Data models and structures
pub mod models;
/// Demo data
pub mod seed;
/// Workflow store
pub mod store;
/// Dashboard counters
pub mod summary;
/// Id and skill helpers
pub mod utils;
/// Input validation and sanitization
pub mod validation;
/// Phase transition rules
pub mod workflow;

// Re-export key components for easier access
pub use clock::{Clock, FixedClock, SystemClock};
pub use error::{FailSoft, FailureKind, Result, WorkflowError};
pub use events::StoreEvent;
pub use models::{
    Client, Consultant, ConsultantStatus, ConsultantUpdate, ExecutionPhase, InterviewStatus, Message, MessageType,
    NewProject, NotificationType, Project, ProjectPhase, ProjectStatus, ProjectUpdate,
};
pub use store::{RosterEntry, StoreSettings, StoreState, WorkflowStore};
pub use summary::DashboardSummary;
