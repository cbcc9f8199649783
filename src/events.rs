//! Events emitted by the workflow store
//!
//! One event is broadcast per successful mutation. Subscribers either await
//! `recv()` or poll with `try_recv()`; nothing is sent for rejected calls.

use tokio::sync::broadcast;

use crate::models::{ExecutionPhase, ProjectPhase};

/// State change notifications from the workflow store
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreEvent {
    /// A project was inserted
    ProjectAdded { project_id: String },
    /// A project's descriptive fields were patched
    ProjectUpdated { project_id: String },
    /// Consultants were inserted or replaced
    ConsultantsAdded { consultant_ids: Vec<String> },
    /// A consultant's descriptive fields were patched
    ConsultantUpdated { consultant_id: String },
    /// Consultants were shortlisted or attached to a project
    ConsultantsAssigned {
        project_id: String,
        consultant_ids: Vec<String>,
    },
    /// A project moved to a later phase
    PhaseAdvanced {
        project_id: String,
        from: ProjectPhase,
        to: ProjectPhase,
        released: Vec<String>,
    },
    /// An in-progress project changed execution phase
    ExecutionStepped {
        project_id: String,
        execution_phase: ExecutionPhase,
    },
    /// A relationship's selected flag flipped
    SelectionToggled {
        project_id: String,
        consultant_id: String,
        selected: bool,
    },
    /// A feedback note was added
    NoteAdded { project_id: String, thread_id: String },
    /// Meeting invitations were created
    InvitationsSent {
        project_id: String,
        message_ids: Vec<String>,
    },
    /// An invitation was accepted or declined
    InvitationAnswered { message_id: String, accepted: bool },
    /// Messages were marked read
    MessagesRead { message_ids: Vec<String> },
    /// A message was removed
    MessageDeleted { message_id: String },
}

/// Broadcast fan-out for [`StoreEvent`]s
#[derive(Debug)]
pub struct EventBus {
    sender: broadcast::Sender<StoreEvent>,
}

impl EventBus {
    /// Bus buffering up to `capacity` events per lagging subscriber
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// New subscriber that sees events published from now on
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.sender.subscribe()
    }

    /// Publish an event; a bus with no subscribers drops it
    pub fn publish(&self, event: StoreEvent) {
        let _ = self.sender.send(event);
    }

    /// Number of live subscribers
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}
