//! The workflow store
//!
//! [`WorkflowStore`] owns the project and consultant tables and the inbox. All
//! writes go through its operations, which validate first and then apply, so
//! a rejected call leaves [`StoreState`] exactly as it was.
//!
//! Message lifecycle operations live in [`crate::inbox`].

use std::collections::BTreeMap;
use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::broadcast;
use tracing::{info, warn};

use crate::clock::{Clock, SystemClock};
use crate::error::{Result, WorkflowError};
use crate::events::{EventBus, StoreEvent};
use crate::metrics::MetricsCollector;
use crate::models::{
    Consultant, ConsultantStatus, ConsultantUpdate, ExecutionPhase, FeedbackMessage, FeedbackThread, InterviewStatus,
    MatchedConsultant, Message, MessageType, NewProject, NotificationType, Project, ProjectNotification, ProjectPhase,
    ProjectUpdate,
};
use crate::utils::{dedup_skills, random_project_id, IdGenerator};
use crate::validation::InputValidator;
use crate::workflow::{plan_transition, TransitionKind, SUBMITTED_FOR_INTERVIEWS};

/// Everything the store holds; cheap to compare in tests
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StoreState {
    /// Projects by id
    pub projects: BTreeMap<String, Project>,
    /// Consultants by id
    pub consultants: BTreeMap<String, Consultant>,
    /// Inbox, newest first
    pub messages: Vec<Message>,
}

/// Tunables for store behaviour
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreSettings {
    /// Author recorded on feedback notes
    pub note_author: String,
    /// Title given to new feedback threads
    pub note_title: String,
    /// Days between sending an invitation and the interview
    pub invitation_lead_days: i64,
    /// Events buffered per subscriber
    pub event_buffer: usize,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            note_author: "Project Manager".to_string(),
            note_title: "Team Note".to_string(),
            invitation_lead_days: 1,
            event_buffer: 256,
        }
    }
}

/// A consultant as seen from one project
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RosterEntry<'a> {
    /// Current consultant record
    pub consultant: &'a Consultant,
    /// Finalist flag on this project
    pub selected: bool,
    /// Interview progress on this project
    pub interview_status: InterviewStatus,
}

/// In-memory store enforcing the project/consultant workflow
pub struct WorkflowStore {
    pub(crate) state: StoreState,
    pub(crate) settings: StoreSettings,
    pub(crate) clock: Box<dyn Clock>,
    pub(crate) ids: IdGenerator,
    pub(crate) events: EventBus,
    pub(crate) metrics: MetricsCollector,
}

impl std::fmt::Debug for WorkflowStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkflowStore")
            .field("projects", &self.state.projects.len())
            .field("consultants", &self.state.consultants.len())
            .field("messages", &self.state.messages.len())
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

impl Default for WorkflowStore {
    fn default() -> Self {
        Self::new(StoreSettings::default())
    }
}

impl WorkflowStore {
    /// Empty store on the system clock
    #[must_use]
    pub fn new(settings: StoreSettings) -> Self {
        Self::from_state(StoreState::default(), settings, Box::new(SystemClock))
    }

    /// Empty store with a custom clock
    #[must_use]
    pub fn with_clock(settings: StoreSettings, clock: Box<dyn Clock>) -> Self {
        Self::from_state(StoreState::default(), settings, clock)
    }

    /// Store starting from existing state
    #[must_use]
    pub fn from_state(state: StoreState, settings: StoreSettings, clock: Box<dyn Clock>) -> Self {
        let events = EventBus::new(settings.event_buffer);
        Self {
            state,
            settings,
            clock,
            ids: IdGenerator::new(),
            events,
            metrics: MetricsCollector::default(),
        }
    }

    // ------------------------------------------------------------------
    // Reads
    // ------------------------------------------------------------------

    /// Whole-state snapshot
    #[must_use]
    pub const fn snapshot(&self) -> &StoreState {
        &self.state
    }

    /// Project table
    #[must_use]
    pub const fn projects(&self) -> &BTreeMap<String, Project> {
        &self.state.projects
    }

    /// Consultant table
    #[must_use]
    pub const fn consultants(&self) -> &BTreeMap<String, Consultant> {
        &self.state.consultants
    }

    /// Inbox, newest first
    #[must_use]
    pub fn messages(&self) -> &[Message] {
        &self.state.messages
    }

    /// Project by id
    #[must_use]
    pub fn project(&self, project_id: &str) -> Option<&Project> {
        self.state.projects.get(project_id)
    }

    /// Consultant by id
    #[must_use]
    pub fn consultant(&self, consultant_id: &str) -> Option<&Consultant> {
        self.state.consultants.get(consultant_id)
    }

    /// Message by id
    #[must_use]
    pub fn message(&self, message_id: &str) -> Option<&Message> {
        self.state.messages.iter().find(|m| m.id == message_id)
    }

    /// Settings in effect
    #[must_use]
    pub const fn settings(&self) -> &StoreSettings {
        &self.settings
    }

    /// Operation tallies
    #[must_use]
    pub const fn metrics(&self) -> &MetricsCollector {
        &self.metrics
    }

    /// Subscribe to events from subsequent operations
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.events.subscribe()
    }

    /// Matched consultants of a project joined with their current records
    pub fn roster(&self, project_id: &str) -> Result<Vec<RosterEntry<'_>>> {
        let project = self.project_ref(project_id)?;
        Ok(project
            .matched_consultants()
            .iter()
            .filter_map(|m| {
                self.state.consultants.get(&m.consultant_id).map(|consultant| RosterEntry {
                    consultant,
                    selected: m.selected,
                    interview_status: m.interview_status,
                })
            })
            .collect())
    }

    // ------------------------------------------------------------------
    // Primitives
    // ------------------------------------------------------------------

    /// Insert or replace consultants by id; last write wins
    pub fn add_consultants(&mut self, consultants: Vec<Consultant>) -> Result<Vec<String>> {
        self.run("add_consultants", |store| {
            let mut ids = Vec::with_capacity(consultants.len());
            for mut consultant in consultants {
                consultant.skills = dedup_skills(std::mem::take(&mut consultant.skills));
                ids.push(consultant.id.clone());
                store.state.consultants.insert(consultant.id.clone(), consultant);
            }

            info!(count = ids.len(), "Consultants upserted");
            store.events.publish(StoreEvent::ConsultantsAdded {
                consultant_ids: ids.clone(),
            });
            Ok(ids)
        })
    }

    /// Insert a new project in the unassigned phase
    ///
    /// Returns the project id, generated when the request carries none.
    pub fn add_project(&mut self, new_project: NewProject) -> Result<String> {
        self.run("add_project", |store| {
            InputValidator::validate_new_project(&new_project)?;

            let id = match new_project.id.clone() {
                Some(id) if store.state.projects.contains_key(&id) => {
                    return Err(WorkflowError::DuplicateProject(id));
                },
                Some(id) => id,
                None => loop {
                    let candidate = random_project_id();
                    if !store.state.projects.contains_key(&candidate) {
                        break candidate;
                    }
                },
            };

            let project = Project::from_new(id.clone(), new_project);
            info!(project_id = %id, name = %project.name, "Project added");
            store.state.projects.insert(id.clone(), project);
            store.events.publish(StoreEvent::ProjectAdded { project_id: id.clone() });
            Ok(id)
        })
    }

    /// Patch descriptive project fields
    pub fn update_project(&mut self, project_id: &str, update: ProjectUpdate) -> Result<()> {
        self.run("update_project", |store| {
            let project = store.project_ref(project_id)?;
            InputValidator::validate_project_update(&update, &project.start_date, &project.end_date)?;

            let project = store.project_mut(project_id)?;
            update.apply_to(project);
            store.events.publish(StoreEvent::ProjectUpdated {
                project_id: project_id.to_string(),
            });
            Ok(())
        })
    }

    /// Patch descriptive consultant fields
    pub fn update_consultant(&mut self, consultant_id: &str, update: ConsultantUpdate) -> Result<()> {
        self.run("update_consultant", |store| {
            let consultant = store
                .state
                .consultants
                .get_mut(consultant_id)
                .ok_or_else(|| WorkflowError::ConsultantNotFound(consultant_id.to_string()))?;
            update.apply_to(consultant);
            store.events.publish(StoreEvent::ConsultantUpdated {
                consultant_id: consultant_id.to_string(),
            });
            Ok(())
        })
    }

    // ------------------------------------------------------------------
    // Workflow operations
    // ------------------------------------------------------------------

    /// Shortlist consultants, moving the project to internal interviews
    pub fn assign_consultants_to_project<S: AsRef<str>>(&mut self, project_id: &str, consultant_ids: &[S]) -> Result<()> {
        self.run("assign_consultants_to_project", |store| {
            let project = store.project_ref(project_id)?;
            if project.workflow_phase() != ProjectPhase::Unassigned {
                return Err(WorkflowError::InvalidTransition {
                    from: project.workflow_phase(),
                    to: ProjectPhase::InternalInterviews,
                    reason: "consultants are shortlisted only while unassigned".to_string(),
                });
            }

            let ids = dedup_ids(consultant_ids);
            if ids.is_empty() {
                return Err(WorkflowError::InvalidInput("No consultants to assign".to_string()));
            }
            for id in &ids {
                store.ensure_assignable(id, project_id)?;
            }

            for id in &ids {
                if let Some(consultant) = store.state.consultants.get_mut(id) {
                    consultant.status = ConsultantStatus::InSelection;
                    consultant.interview_status = Some(InterviewStatus::Scheduled);
                }
            }

            let notification = store.notification(SUBMITTED_FOR_INTERVIEWS, NotificationType::Milestone);
            let project = store.project_mut(project_id)?;
            project.matched_consultants = ids
                .iter()
                .map(|id| MatchedConsultant {
                    consultant_id: id.clone(),
                    selected: true,
                    interview_status: InterviewStatus::Scheduled,
                })
                .collect();
            project.enter_phase(ProjectPhase::InternalInterviews);
            project.push_notification(notification);

            info!(project_id, consultants = ids.len(), "Consultants shortlisted for internal interviews");
            store.metrics.record_phase_transition(ProjectPhase::InternalInterviews);
            store.events.publish(StoreEvent::ConsultantsAssigned {
                project_id: project_id.to_string(),
                consultant_ids: ids,
            });
            Ok(())
        })
    }

    /// Attach one consultant directly to an unassigned or in-progress project
    ///
    /// The consultant becomes assigned and selected. An unassigned project
    /// moves to internal interviews.
    pub fn attach_consultant(&mut self, project_id: &str, consultant_id: &str) -> Result<()> {
        self.run("attach_consultant", |store| {
            let project = store.project_ref(project_id)?;
            let phase = project.workflow_phase();
            if !matches!(phase, ProjectPhase::Unassigned | ProjectPhase::InProgress) {
                return Err(WorkflowError::InvalidTransition {
                    from: phase,
                    to: phase,
                    reason: "consultants attach only to unassigned or in-progress projects".to_string(),
                });
            }
            store.ensure_assignable(consultant_id, project_id)?;

            let interview_status = if phase == ProjectPhase::Unassigned {
                InterviewStatus::Scheduled
            } else {
                InterviewStatus::Completed
            };

            let consultant = store
                .state
                .consultants
                .get_mut(consultant_id)
                .ok_or_else(|| WorkflowError::ConsultantNotFound(consultant_id.to_string()))?;
            consultant.status = ConsultantStatus::Assigned;
            consultant.interview_status = Some(interview_status);
            let attached = format!("{} assigned to the project", consultant.name);

            let status_note = store.notification(&attached, NotificationType::Status);
            let phase_note = (phase == ProjectPhase::Unassigned)
                .then(|| store.notification(SUBMITTED_FOR_INTERVIEWS, NotificationType::Milestone));

            let project = store.project_mut(project_id)?;
            match project.matched_mut(consultant_id) {
                Some(matched) => {
                    matched.selected = true;
                    matched.interview_status = interview_status;
                },
                None => project.matched_consultants.push(MatchedConsultant {
                    consultant_id: consultant_id.to_string(),
                    selected: true,
                    interview_status,
                }),
            }
            if let Some(note) = phase_note {
                project.enter_phase(ProjectPhase::InternalInterviews);
                project.push_notification(note);
            }
            project.push_notification(status_note);

            info!(project_id, consultant_id, "Consultant attached to project");
            if phase == ProjectPhase::Unassigned {
                store.metrics.record_phase_transition(ProjectPhase::InternalInterviews);
            }
            store.events.publish(StoreEvent::ConsultantsAssigned {
                project_id: project_id.to_string(),
                consultant_ids: vec![consultant_id.to_string()],
            });
            Ok(())
        })
    }

    /// Move a project forward, applying the phase's consultant side effects
    ///
    /// `in_progress → in_progress` with an execution phase steps the
    /// execution phase instead.
    pub fn advance_project_phase(
        &mut self, project_id: &str, new_phase: ProjectPhase, execution_phase: Option<ExecutionPhase>,
    ) -> Result<()> {
        self.run("advance_project_phase", |store| {
            let plan = plan_transition(store.project_ref(project_id)?, new_phase, execution_phase)?;
            let released: Vec<String> = plan
                .release
                .iter()
                .filter(|id| store.engaged_elsewhere(id, project_id).is_none())
                .cloned()
                .collect();

            for id in &released {
                if let Some(consultant) = store.state.consultants.get_mut(id) {
                    consultant.status = ConsultantStatus::Available;
                }
            }
            for id in &plan.engage {
                if let Some(consultant) = store.state.consultants.get_mut(id) {
                    consultant.status = ConsultantStatus::Assigned;
                }
            }

            let notification = store.notification(&plan.notification, NotificationType::PhaseChange);
            let project = store.project_mut(project_id)?;
            if plan.prune {
                project.matched_consultants.retain(|m| m.selected);
            }
            project.enter_phase(plan.to);
            project.execution_phase = plan.execution_phase;
            project.push_notification(notification);

            match plan.kind {
                TransitionKind::Advance => {
                    info!(
                        project_id,
                        from = %plan.from,
                        to = %plan.to,
                        released = released.len(),
                        engaged = plan.engage.len(),
                        "Project phase advanced"
                    );
                    store.metrics.record_phase_transition(plan.to);
                    store.events.publish(StoreEvent::PhaseAdvanced {
                        project_id: project_id.to_string(),
                        from: plan.from,
                        to: plan.to,
                        released,
                    });
                },
                TransitionKind::ExecutionStep => {
                    if let Some(step) = plan.execution_phase {
                        info!(project_id, execution_phase = %step, "Execution phase changed");
                        store.events.publish(StoreEvent::ExecutionStepped {
                            project_id: project_id.to_string(),
                            execution_phase: step,
                        });
                    }
                },
            }
            Ok(())
        })
    }

    /// Flip the finalist flag of a matched consultant; returns the new value
    ///
    /// Re-selecting fails with `ConsultantEngaged` while the consultant is a
    /// finalist on another active project.
    pub fn toggle_consultant_selection(&mut self, project_id: &str, consultant_id: &str) -> Result<bool> {
        self.run("toggle_consultant_selection", |store| {
            let reselecting = store
                .project_ref(project_id)?
                .matched(consultant_id)
                .is_some_and(|m| !m.selected);
            if reselecting {
                store.ensure_assignable(consultant_id, project_id)?;
            }

            let project = store.project_mut(project_id)?;
            let matched = project
                .matched_mut(consultant_id)
                .ok_or_else(|| WorkflowError::ConsultantNotOnProject {
                    project_id: project_id.to_string(),
                    consultant_id: consultant_id.to_string(),
                })?;
            matched.selected = !matched.selected;
            let selected = matched.selected;

            store.events.publish(StoreEvent::SelectionToggled {
                project_id: project_id.to_string(),
                consultant_id: consultant_id.to_string(),
                selected,
            });
            Ok(selected)
        })
    }

    /// Add a feedback note; returns the thread id
    pub fn add_project_note(&mut self, project_id: &str, content: &str) -> Result<String> {
        self.run("add_project_note", |store| {
            store.project_ref(project_id)?;
            InputValidator::validate_note(content)?;
            let content = InputValidator::sanitize_text(content);

            let now = store.now();
            let author = store.settings.note_author.clone();
            let thread = FeedbackThread {
                id: store.ids.next_id("note"),
                title: store.settings.note_title.clone(),
                created_at: now,
                created_by: author.clone(),
                messages: vec![FeedbackMessage {
                    id: store.ids.next_id("feedback"),
                    content,
                    timestamp: now,
                    author,
                }],
            };
            let thread_id = thread.id.clone();
            let notification = store.notification("New team note added", NotificationType::Update);

            let project = store.project_mut(project_id)?;
            project.feedback_threads.insert(0, thread);
            project.push_notification(notification);

            store.events.publish(StoreEvent::NoteAdded {
                project_id: project_id.to_string(),
                thread_id: thread_id.clone(),
            });
            Ok(thread_id)
        })
    }

    /// Invite consultants to interview; one unread message per id given
    ///
    /// Returns the new message ids in the order of `consultant_ids`.
    /// Consultants who are finalists on another active project are refused.
    pub fn send_meeting_invitations<S: AsRef<str>>(&mut self, project_id: &str, consultant_ids: &[S]) -> Result<Vec<String>> {
        self.run("send_meeting_invitations", |store| {
            let project_name = store.project_ref(project_id)?.name.clone();
            if consultant_ids.is_empty() {
                return Err(WorkflowError::InvalidInput("No consultants to invite".to_string()));
            }
            for id in consultant_ids {
                store.ensure_assignable(id.as_ref(), project_id)?;
            }

            let now = store.now();
            let interview_date = now.date_naive() + chrono::Duration::days(store.settings.invitation_lead_days);
            let mut invitations = Vec::with_capacity(consultant_ids.len());
            let mut names = Vec::with_capacity(consultant_ids.len());

            for id in consultant_ids {
                let id = id.as_ref();
                let consultant = store
                    .state
                    .consultants
                    .get_mut(id)
                    .ok_or_else(|| WorkflowError::ConsultantNotFound(id.to_string()))?;
                consultant.status = ConsultantStatus::Interviewing;
                consultant.interview_status = Some(InterviewStatus::Scheduled);
                consultant.interview_date = Some(interview_date);
                names.push(consultant.name.clone());

                let consultant_name = consultant.name.clone();

                invitations.push(Message {
                    id: store.ids.next_id("msg"),
                    project_id: project_id.to_string(),
                    project_name: project_name.clone(),
                    content: format!("Interview invitation for \"{project_name}\" project. Please confirm your availability."),
                    timestamp: now,
                    kind: MessageType::MeetingInvitation,
                    read: false,
                    consultant_id: Some(id.to_string()),
                    consultant_name: Some(consultant_name),
                });
            }

            let summary = format!(
                "Interview invitations sent to {} consultants: {}",
                consultant_ids.len(),
                names.join(", ")
            );
            let notification = store.notification(&summary, NotificationType::Milestone);
            let project = store.project_mut(project_id)?;
            for id in consultant_ids {
                if let Some(matched) = project.matched_mut(id.as_ref()) {
                    matched.interview_status = InterviewStatus::Scheduled;
                }
            }
            project.push_notification(notification);

            let message_ids: Vec<String> = invitations.iter().map(|m| m.id.clone()).collect();
            store.state.messages.splice(0..0, invitations);

            info!(project_id, invitations = message_ids.len(), "Meeting invitations sent");
            store.metrics.record_invitations(message_ids.len());
            store.refresh_unread_gauge();
            store.events.publish(StoreEvent::InvitationsSent {
                project_id: project_id.to_string(),
                message_ids: message_ids.clone(),
            });
            Ok(message_ids)
        })
    }

    // ------------------------------------------------------------------
    // Helpers
    // ------------------------------------------------------------------

    /// Run an operation, logging and counting its outcome
    pub(crate) fn run<T>(&mut self, operation: &'static str, op: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        let start = Instant::now();
        let result = op(self);
        let success = result.is_ok();
        if let Err(err) = &result {
            warn!(operation, error = %err, kind = ?err.kind(), "Store operation rejected");
        }
        self.metrics.record_operation(operation, start.elapsed(), success);
        result
    }

    pub(crate) fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    pub(crate) fn notification(&mut self, content: &str, kind: NotificationType) -> ProjectNotification {
        ProjectNotification {
            id: self.ids.next_id("notification"),
            content: content.to_string(),
            timestamp: self.now(),
            kind,
        }
    }

    pub(crate) fn project_ref(&self, project_id: &str) -> Result<&Project> {
        self.state
            .projects
            .get(project_id)
            .ok_or_else(|| WorkflowError::ProjectNotFound(project_id.to_string()))
    }

    pub(crate) fn project_mut(&mut self, project_id: &str) -> Result<&mut Project> {
        self.state
            .projects
            .get_mut(project_id)
            .ok_or_else(|| WorkflowError::ProjectNotFound(project_id.to_string()))
    }

    pub(crate) fn consultant_ref(&self, consultant_id: &str) -> Result<&Consultant> {
        self.state
            .consultants
            .get(consultant_id)
            .ok_or_else(|| WorkflowError::ConsultantNotFound(consultant_id.to_string()))
    }

    pub(crate) fn refresh_unread_gauge(&self) {
        let unread = self.state.messages.iter().filter(|m| !m.read).count();
        self.metrics.update_unread_gauge(unread);
    }

    /// Project other than `project_id` that holds the consultant as a
    /// selected finalist and is not yet completed.
    pub(crate) fn engaged_elsewhere(&self, consultant_id: &str, project_id: &str) -> Option<&str> {
        self.state
            .projects
            .values()
            .filter(|p| p.id != project_id && p.workflow_phase() != ProjectPhase::Completed)
            .find(|p| p.matched(consultant_id).is_some_and(|m| m.selected))
            .map(|p| p.id.as_str())
    }

    pub(crate) fn ensure_assignable(&self, consultant_id: &str, project_id: &str) -> Result<()> {
        self.consultant_ref(consultant_id)?;
        if let Some(other) = self.engaged_elsewhere(consultant_id, project_id) {
            return Err(WorkflowError::ConsultantEngaged {
                consultant_id: consultant_id.to_string(),
                project_id: other.to_string(),
            });
        }
        Ok(())
    }
}

fn dedup_ids<S: AsRef<str>>(ids: &[S]) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(ids.len());
    for id in ids {
        if !out.iter().any(|existing| existing == id.as_ref()) {
            out.push(id.as_ref().to_string());
        }
    }
    out
}
