//! Inbox operations on the workflow store

use tracing::info;

use crate::error::{Result, WorkflowError};
use crate::events::StoreEvent;
use crate::models::{ConsultantStatus, InterviewStatus, Message, NotificationType};
use crate::store::WorkflowStore;

impl WorkflowStore {
    /// Mark one message read; marking a read message again is a no-op
    pub fn mark_message_as_read(&mut self, message_id: &str) -> Result<()> {
        self.run("mark_message_as_read", |store| {
            let message = store.message_mut(message_id)?;
            if message.read {
                return Ok(());
            }
            message.read = true;

            store.metrics.record_messages_read(1);
            store.refresh_unread_gauge();
            store.events.publish(StoreEvent::MessagesRead {
                message_ids: vec![message_id.to_string()],
            });
            Ok(())
        })
    }

    /// Mark every message read; returns how many were unread
    pub fn mark_all_messages_as_read(&mut self) -> Result<usize> {
        self.run("mark_all_messages_as_read", |store| {
            let mut marked = Vec::new();
            for message in store.state.messages.iter_mut().filter(|m| !m.read) {
                message.read = true;
                marked.push(message.id.clone());
            }

            if !marked.is_empty() {
                store.metrics.record_messages_read(marked.len());
                store.refresh_unread_gauge();
                store.events.publish(StoreEvent::MessagesRead {
                    message_ids: marked.clone(),
                });
            }
            Ok(marked.len())
        })
    }

    /// Remove a message from the inbox
    pub fn delete_message(&mut self, message_id: &str) -> Result<()> {
        self.run("delete_message", |store| {
            let index = store
                .state
                .messages
                .iter()
                .position(|m| m.id == message_id)
                .ok_or_else(|| WorkflowError::MessageNotFound(message_id.to_string()))?;
            store.state.messages.remove(index);

            store.refresh_unread_gauge();
            store.events.publish(StoreEvent::MessageDeleted {
                message_id: message_id.to_string(),
            });
            Ok(())
        })
    }

    /// Accept an interview invitation
    ///
    /// The consultant moves to interviewing with a scheduled interview, the
    /// project records a milestone and the message is marked read.
    pub fn accept_meeting_invitation(&mut self, message_id: &str) -> Result<()> {
        self.run("accept_meeting_invitation", |store| store.answer_invitation(message_id, true))
    }

    /// Decline an interview invitation
    ///
    /// The consultant becomes available with interview pending and the project
    /// records an alert. Both answers are refused while the consultant is a
    /// finalist on another active project.
    pub fn decline_meeting_invitation(&mut self, message_id: &str) -> Result<()> {
        self.run("decline_meeting_invitation", |store| store.answer_invitation(message_id, false))
    }

    fn answer_invitation(&mut self, message_id: &str, accepted: bool) -> Result<()> {
        let message = self
            .message(message_id)
            .ok_or_else(|| WorkflowError::MessageNotFound(message_id.to_string()))?;
        if !message.is_invitation() {
            return Err(WorkflowError::NotAnInvitation(message_id.to_string()));
        }
        let project_id = message.project_id.clone();
        let consultant_id = message.consultant_id.clone();
        let fallback_name = message.consultant_name.clone();
        self.project_ref(&project_id)?;
        if let Some(id) = consultant_id.as_deref() {
            if let Some(other) = self.engaged_elsewhere(id, &project_id) {
                return Err(WorkflowError::ConsultantEngaged {
                    consultant_id: id.to_string(),
                    project_id: other.to_string(),
                });
            }
        }

        let (status, interview_status) = if accepted {
            (ConsultantStatus::Interviewing, InterviewStatus::Scheduled)
        } else {
            (ConsultantStatus::Available, InterviewStatus::Pending)
        };

        let mut name = fallback_name;
        if let Some(consultant) = consultant_id.as_deref().and_then(|id| self.state.consultants.get_mut(id)) {
            consultant.status = status;
            consultant.interview_status = Some(interview_status);
            name = Some(consultant.name.clone());
        }
        let name = name.unwrap_or_else(|| "Consultant".to_string());

        let notification = if accepted {
            self.notification(&format!("{name} has accepted the meeting invitation"), NotificationType::Milestone)
        } else {
            self.notification(&format!("{name} has declined the meeting invitation"), NotificationType::Alert)
        };

        let project = self.project_mut(&project_id)?;
        if let Some(matched) = consultant_id.as_deref().and_then(|id| project.matched_mut(id)) {
            matched.interview_status = interview_status;
        }
        project.push_notification(notification);

        let message = self.message_mut(message_id)?;
        let was_unread = !message.read;
        message.read = true;
        if was_unread {
            self.metrics.record_messages_read(1);
        }
        self.refresh_unread_gauge();

        info!(message_id, project_id = %project_id, accepted, "Meeting invitation answered");
        self.events.publish(StoreEvent::InvitationAnswered {
            message_id: message_id.to_string(),
            accepted,
        });
        Ok(())
    }

    fn message_mut(&mut self, message_id: &str) -> Result<&mut Message> {
        self.state
            .messages
            .iter_mut()
            .find(|m| m.id == message_id)
            .ok_or_else(|| WorkflowError::MessageNotFound(message_id.to_string()))
    }
}
