//! Data models for projects, consultants and messages
//!
//! This module contains the entity types held by the workflow store, the
//! enumerations that drive the workflow, and the DTOs callers use to create
//! and patch entities.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::WorkflowError;
use crate::utils::dedup_skills;

/// Project workflow phase, in workflow order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectPhase {
    /// Created, no consultants yet
    Unassigned,
    /// Candidates under internal review
    InternalInterviews,
    /// Finalist profiles sent to the client
    ProfileDelivery,
    /// Client is interviewing finalists
    ClientInterviews,
    /// Delivery underway
    InProgress,
    /// Delivered
    Completed,
}

impl ProjectPhase {
    /// Every phase in workflow order.
    pub const ALL: [Self; 6] = [
        Self::Unassigned,
        Self::InternalInterviews,
        Self::ProfileDelivery,
        Self::ClientInterviews,
        Self::InProgress,
        Self::Completed,
    ];

    /// Progress percentage shown for this phase.
    #[must_use]
    pub const fn progress(self) -> u8 {
        match self {
            Self::Unassigned => 0,
            Self::InternalInterviews => 15,
            Self::ProfileDelivery => 35,
            Self::ClientInterviews => 65,
            Self::InProgress => 80,
            Self::Completed => 100,
        }
    }

    /// Coarse project status label for this phase.
    #[must_use]
    pub const fn status(self) -> ProjectStatus {
        match self {
            Self::Unassigned => ProjectStatus::Unassigned,
            Self::Completed => ProjectStatus::Completed,
            _ => ProjectStatus::Assigned,
        }
    }

    /// Wire name of the phase
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unassigned => "unassigned",
            Self::InternalInterviews => "internal_interviews",
            Self::ProfileDelivery => "profile_delivery",
            Self::ClientInterviews => "client_interviews",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
        }
    }
}

impl fmt::Display for ProjectPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProjectPhase {
    type Err = WorkflowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|phase| phase.as_str() == s)
            .ok_or_else(|| WorkflowError::InvalidInput(format!("Unknown project phase: {s}")))
    }
}

/// Delivery sub-phase, only meaningful while a project is in progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionPhase {
    /// Scope and requirements
    Planning,
    /// Target schema work
    SchemaDesign,
    /// Data moves
    DataMigration,
    /// Verification
    Testing,
    /// Cut-over
    GoLive,
    /// Build work
    Development,
    /// Rollout
    Deployment,
    /// Post-delivery support
    Maintenance,
}

impl ExecutionPhase {
    /// Every execution phase.
    pub const ALL: [Self; 8] = [
        Self::Planning,
        Self::SchemaDesign,
        Self::DataMigration,
        Self::Testing,
        Self::GoLive,
        Self::Development,
        Self::Deployment,
        Self::Maintenance,
    ];

    /// Wire name of the execution phase
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Planning => "planning",
            Self::SchemaDesign => "schema_design",
            Self::DataMigration => "data_migration",
            Self::Testing => "testing",
            Self::GoLive => "go_live",
            Self::Development => "development",
            Self::Deployment => "deployment",
            Self::Maintenance => "maintenance",
        }
    }
}

impl fmt::Display for ExecutionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExecutionPhase {
    type Err = WorkflowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|phase| phase.as_str() == s)
            .ok_or_else(|| WorkflowError::InvalidInput(format!("Unknown execution phase: {s}")))
    }
}

/// Coarse project status, always derived from the workflow phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    /// No consultants attached yet
    Unassigned,
    /// Somewhere between internal interviews and delivery
    Assigned,
    /// Delivered
    Completed,
}

/// Global availability state of a consultant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConsultantStatus {
    /// Free for new work
    Available,
    /// Shortlisted for a project's internal interviews
    InSelection,
    /// Interviewing with a client
    Interviewing,
    /// Staffed on a project
    Assigned,
    /// Occupied outside this system
    Busy,
    /// On leave
    Leave,
    /// Not staffable
    Unavailable,
}

/// Interview progress of a consultant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterviewStatus {
    /// Nothing scheduled
    Pending,
    /// Interview booked
    Scheduled,
    /// Interview held
    Completed,
    /// Profile sent to the client
    ProfileDelivered,
    /// Client interview booked
    InterviewScheduled,
}

/// Category of a project notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationType {
    /// Workflow milestone
    Milestone,
    /// Project phase moved
    PhaseChange,
    /// Something needs attention
    Alert,
    /// General update
    Update,
    /// Client-originated
    Client,
    /// File activity
    File,
    /// Status change
    Status,
}

/// Category of an inbox message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageType {
    /// Interview invitation that can be accepted or declined
    MeetingInvitation,
    /// Assignment notice
    Assignment,
    /// Project news
    ProjectUpdate,
    /// Anything else
    General,
}

/// Client information attached to a project
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Client {
    /// Client company name
    pub name: String,
    /// Logo asset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
    /// Contact person
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact: Option<String>,
    /// Contact email
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Contact phone
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

impl Client {
    /// Client with just a name
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

/// Attachment metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectFile {
    /// File id
    pub id: String,
    /// Display name
    pub name: String,
    /// MIME or extension label
    #[serde(rename = "type")]
    pub kind: String,
    /// Upload time
    pub uploaded_at: String,
    /// Uploader name
    pub uploaded_by: String,
    /// Download location
    pub url: String,
    /// Human readable size
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
}

/// A requested role and head count, captured during intake
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsultantRole {
    /// Role title
    pub title: String,
    /// Number of consultants requested
    pub count: u32,
}

/// Entry in a project's notification feed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectNotification {
    /// Notification id
    pub id: String,
    /// Human readable text
    pub content: String,
    /// When it was raised
    pub timestamp: DateTime<Utc>,
    /// Category
    #[serde(rename = "type")]
    pub kind: NotificationType,
}

/// One message inside a feedback thread
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackMessage {
    /// Message id
    pub id: String,
    /// Text
    pub content: String,
    /// When it was written
    pub timestamp: DateTime<Utc>,
    /// Who wrote it
    pub author: String,
}

/// A note thread on a project
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackThread {
    /// Thread id
    pub id: String,
    /// Thread title
    pub title: String,
    /// When the thread was opened
    pub created_at: DateTime<Utc>,
    /// Who opened it
    pub created_by: String,
    /// Messages, oldest first
    pub messages: Vec<FeedbackMessage>,
}

/// Per-project relationship to a consultant.
///
/// Only the id is kept here; display data lives in the consultant table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchedConsultant {
    /// Consultant id in the consultant table
    pub consultant_id: String,
    /// Marked as finalist for the next phase
    pub selected: bool,
    /// Interview progress for this project
    pub interview_status: InterviewStatus,
}

/// A project moving through the staffing workflow.
///
/// Workflow fields (phase, status, progress, matched consultants and feeds)
/// can only be changed through the store's workflow operations.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    /// Unique id
    pub id: String,
    /// Project name
    pub name: String,
    /// Project description
    pub description: String,
    /// Client details
    pub client: Option<Client>,
    /// Required skills, unique, display order preserved
    pub skills: Vec<String>,
    /// Start date string
    pub start_date: String,
    /// End date string
    pub end_date: String,
    /// Free-text duration
    pub duration: Option<String>,
    /// Attachments
    pub files: Vec<ProjectFile>,
    /// Requested roles from intake
    pub consultant_roles: Vec<ConsultantRole>,
    pub(crate) workflow_phase: ProjectPhase,
    pub(crate) execution_phase: Option<ExecutionPhase>,
    pub(crate) status: ProjectStatus,
    pub(crate) progress: u8,
    pub(crate) matched_consultants: Vec<MatchedConsultant>,
    pub(crate) project_notifications: Vec<ProjectNotification>,
    pub(crate) feedback_threads: Vec<FeedbackThread>,
}

impl Project {
    pub(crate) fn from_new(id: String, new: NewProject) -> Self {
        Self {
            id,
            name: new.name,
            description: new.description,
            client: new.client,
            skills: dedup_skills(new.skills),
            start_date: new.start_date,
            end_date: new.end_date,
            duration: new.duration,
            files: new.files,
            consultant_roles: new.consultant_roles,
            workflow_phase: ProjectPhase::Unassigned,
            execution_phase: None,
            status: ProjectPhase::Unassigned.status(),
            progress: ProjectPhase::Unassigned.progress(),
            matched_consultants: Vec::new(),
            project_notifications: Vec::new(),
            feedback_threads: Vec::new(),
        }
    }

    /// Current workflow phase
    #[must_use]
    pub const fn workflow_phase(&self) -> ProjectPhase {
        self.workflow_phase
    }

    /// Execution sub-phase, set only while in progress
    #[must_use]
    pub const fn execution_phase(&self) -> Option<ExecutionPhase> {
        self.execution_phase
    }

    /// Coarse status label
    #[must_use]
    pub const fn status(&self) -> ProjectStatus {
        self.status
    }

    /// Progress percentage
    #[must_use]
    pub const fn progress(&self) -> u8 {
        self.progress
    }

    /// Consultant relationships in match order
    #[must_use]
    pub fn matched_consultants(&self) -> &[MatchedConsultant] {
        &self.matched_consultants
    }

    /// Notifications, newest first
    #[must_use]
    pub fn notifications(&self) -> &[ProjectNotification] {
        &self.project_notifications
    }

    /// Feedback threads, newest first
    #[must_use]
    pub fn feedback_threads(&self) -> &[FeedbackThread] {
        &self.feedback_threads
    }

    /// Ids of matched consultants, in match order
    #[must_use]
    pub fn matched_ids(&self) -> Vec<&str> {
        self.matched_consultants.iter().map(|m| m.consultant_id.as_str()).collect()
    }

    /// Relationship record for a consultant, if matched
    #[must_use]
    pub fn matched(&self, consultant_id: &str) -> Option<&MatchedConsultant> {
        self.matched_consultants.iter().find(|m| m.consultant_id == consultant_id)
    }

    pub(crate) fn matched_mut(&mut self, consultant_id: &str) -> Option<&mut MatchedConsultant> {
        self.matched_consultants.iter_mut().find(|m| m.consultant_id == consultant_id)
    }

    /// Move to `phase`, keeping status and progress in lockstep.
    pub(crate) fn enter_phase(&mut self, phase: ProjectPhase) {
        self.workflow_phase = phase;
        self.status = phase.status();
        self.progress = phase.progress();
    }

    pub(crate) fn push_notification(&mut self, notification: ProjectNotification) {
        self.project_notifications.insert(0, notification);
    }
}

/// A consultant in the consultant table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Consultant {
    /// Unique id
    pub id: String,
    /// Display name
    pub name: String,
    /// Job title
    pub role: String,
    /// Skills, unique, display order preserved
    #[serde(default)]
    pub skills: Vec<String>,
    /// Location or location preference
    #[serde(default)]
    pub location: String,
    /// Avatar asset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    /// Date the consultant becomes free
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub available_from: Option<String>,
    /// Domain expertise from intake
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    /// Seniority level from intake
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
    /// Match score from intake
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    /// Global availability state
    pub status: ConsultantStatus,
    /// Interview progress in the active workflow
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interview_status: Option<InterviewStatus>,
    /// Scheduled interview day
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interview_date: Option<NaiveDate>,
}

impl Consultant {
    /// New available consultant with no skills or location
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>, role: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            role: role.into(),
            skills: Vec::new(),
            location: String::new(),
            avatar: None,
            available_from: None,
            domain: None,
            level: None,
            score: None,
            status: ConsultantStatus::Available,
            interview_status: None,
            interview_date: None,
        }
    }

    /// Set skills
    #[must_use]
    pub fn with_skills<I, S>(mut self, skills: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.skills = dedup_skills(skills.into_iter().map(Into::into).collect());
        self
    }

    /// Set location
    #[must_use]
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = location.into();
        self
    }

    /// Set starting status
    #[must_use]
    pub const fn with_status(mut self, status: ConsultantStatus) -> Self {
        self.status = status;
        self
    }
}

/// An inbox message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    /// Message id
    pub id: String,
    /// Project the message concerns
    pub project_id: String,
    /// Project name at send time
    pub project_name: String,
    /// Text
    pub content: String,
    /// When it was sent
    pub timestamp: DateTime<Utc>,
    /// Category
    #[serde(rename = "type")]
    pub kind: MessageType,
    /// Read flag
    pub read: bool,
    /// Addressed consultant
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub consultant_id: Option<String>,
    /// Addressed consultant's name at send time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub consultant_name: Option<String>,
}

impl Message {
    /// True for messages that can be accepted or declined
    #[must_use]
    pub fn is_invitation(&self) -> bool {
        self.kind == MessageType::MeetingInvitation
    }
}

/// Data for creating a new project
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NewProject {
    /// Explicit id; generated when absent
    pub id: Option<String>,
    /// Project name
    pub name: String,
    /// Project description
    pub description: String,
    /// Client details
    pub client: Option<Client>,
    /// Required skills
    pub skills: Vec<String>,
    /// Start date (YYYY-MM-DD or RFC 3339)
    pub start_date: String,
    /// End date (YYYY-MM-DD or RFC 3339)
    pub end_date: String,
    /// Free-text duration
    pub duration: Option<String>,
    /// Attachments
    pub files: Vec<ProjectFile>,
    /// Requested roles
    pub consultant_roles: Vec<ConsultantRole>,
}

impl NewProject {
    /// New project with a name and date range
    #[must_use]
    pub fn new(name: impl Into<String>, start_date: impl Into<String>, end_date: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            start_date: start_date.into(),
            end_date: end_date.into(),
            ..Self::default()
        }
    }

    /// Use an explicit id
    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }
}

/// Partial update of a project's descriptive fields
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProjectUpdate {
    /// New name
    pub name: Option<String>,
    /// New description
    pub description: Option<String>,
    /// New client
    pub client: Option<Client>,
    /// New skills
    pub skills: Option<Vec<String>>,
    /// New start date
    pub start_date: Option<String>,
    /// New end date
    pub end_date: Option<String>,
    /// New duration
    pub duration: Option<String>,
    /// New attachment list
    pub files: Option<Vec<ProjectFile>>,
    /// New requested roles
    pub consultant_roles: Option<Vec<ConsultantRole>>,
}

impl ProjectUpdate {
    pub(crate) fn apply_to(self, project: &mut Project) {
        if let Some(name) = self.name {
            project.name = name;
        }
        if let Some(description) = self.description {
            project.description = description;
        }
        if let Some(client) = self.client {
            project.client = Some(client);
        }
        if let Some(skills) = self.skills {
            project.skills = dedup_skills(skills);
        }
        if let Some(start_date) = self.start_date {
            project.start_date = start_date;
        }
        if let Some(end_date) = self.end_date {
            project.end_date = end_date;
        }
        if let Some(duration) = self.duration {
            project.duration = Some(duration);
        }
        if let Some(files) = self.files {
            project.files = files;
        }
        if let Some(roles) = self.consultant_roles {
            project.consultant_roles = roles;
        }
    }
}

/// Partial update of a consultant's descriptive fields.
///
/// Status fields are owned by the workflow and are not patchable.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConsultantUpdate {
    /// New name
    pub name: Option<String>,
    /// New role
    pub role: Option<String>,
    /// New skills
    pub skills: Option<Vec<String>>,
    /// New location
    pub location: Option<String>,
    /// New avatar
    pub avatar: Option<String>,
    /// New availability date
    pub available_from: Option<String>,
    /// New domain
    pub domain: Option<String>,
    /// New level
    pub level: Option<String>,
    /// New score
    pub score: Option<f64>,
}

impl ConsultantUpdate {
    pub(crate) fn apply_to(self, consultant: &mut Consultant) {
        if let Some(name) = self.name {
            consultant.name = name;
        }
        if let Some(role) = self.role {
            consultant.role = role;
        }
        if let Some(skills) = self.skills {
            consultant.skills = dedup_skills(skills);
        }
        if let Some(location) = self.location {
            consultant.location = location;
        }
        if let Some(avatar) = self.avatar {
            consultant.avatar = Some(avatar);
        }
        if let Some(available_from) = self.available_from {
            consultant.available_from = Some(available_from);
        }
        if let Some(domain) = self.domain {
            consultant.domain = Some(domain);
        }
        if let Some(level) = self.level {
            consultant.level = Some(level);
        }
        if let Some(score) = self.score {
            consultant.score = Some(score);
        }
    }
}
