//! Integration tests for invitations and the inbox

use chrono::{NaiveDate, TimeZone, Utc};
use staffing_workflow::models::NotificationType;
use staffing_workflow::{
    Consultant, ConsultantStatus, FixedClock, InterviewStatus, MessageType, NewProject, ProjectPhase, StoreSettings,
    WorkflowError, WorkflowStore,
};

fn store() -> WorkflowStore {
    let clock = FixedClock(Utc.with_ymd_and_hms(2025, 5, 1, 9, 0, 0).unwrap());
    let mut store = WorkflowStore::with_clock(StoreSettings::default(), Box::new(clock));
    store
        .add_consultants(vec![
            Consultant::new("A", "Sarah Jensen", "Senior React Developer"),
            Consultant::new("B", "Michael Chen", "UX/UI Designer"),
        ])
        .unwrap();
    store
        .add_project(NewProject::new("Portal", "2025-05-10", "2025-07-30").with_id("P"))
        .unwrap();
    store.assign_consultants_to_project("P", &["A", "B"]).unwrap();
    store
}

#[test]
fn test_invitations_create_one_message_each() {
    let mut store = store();
    let ids = store.send_meeting_invitations("P", &["A", "B"]).unwrap();

    assert_eq!(ids.len(), 2);
    assert_eq!(store.messages().len(), 2);
    for (id, consultant) in ids.iter().zip(["A", "B"]) {
        let message = store.message(id).unwrap();
        assert_eq!(message.kind, MessageType::MeetingInvitation);
        assert!(!message.read);
        assert_eq!(message.consultant_id.as_deref(), Some(consultant));
        assert_eq!(message.project_name, "Portal");
        assert_eq!(message.content, "Interview invitation for \"Portal\" project. Please confirm your availability.");
    }

    let sarah = store.consultant("A").unwrap();
    assert_eq!(sarah.status, ConsultantStatus::Interviewing);
    assert_eq!(sarah.interview_status, Some(InterviewStatus::Scheduled));
    assert_eq!(sarah.interview_date, NaiveDate::from_ymd_opt(2025, 5, 2));

    let note = &store.project("P").unwrap().notifications()[0];
    assert_eq!(note.content, "Interview invitations sent to 2 consultants: Sarah Jensen, Michael Chen");
    assert_eq!(note.kind, NotificationType::Milestone);
}

#[test]
fn test_new_invitations_are_prepended() {
    let mut store = store();
    let first = store.send_meeting_invitations("P", &["A"]).unwrap();
    let second = store.send_meeting_invitations("P", &["B"]).unwrap();
    assert_eq!(store.messages()[0].id, second[0]);
    assert_eq!(store.messages()[1].id, first[0]);
}

#[test]
fn test_repeat_invitation_duplicates_message() {
    let mut store = store();
    store.send_meeting_invitations("P", &["A"]).unwrap();
    store.send_meeting_invitations("P", &["A"]).unwrap();
    assert_eq!(store.messages().len(), 2);
}

#[test]
fn test_invitation_lead_days_setting() {
    let clock = FixedClock(Utc.with_ymd_and_hms(2025, 5, 1, 9, 0, 0).unwrap());
    let settings = StoreSettings {
        invitation_lead_days: 3,
        ..StoreSettings::default()
    };
    let mut store = WorkflowStore::with_clock(settings, Box::new(clock));
    store.add_consultants(vec![Consultant::new("A", "Sarah Jensen", "Developer")]).unwrap();
    store
        .add_project(NewProject::new("Portal", "2025-05-10", "2025-07-30").with_id("P"))
        .unwrap();

    store.send_meeting_invitations("P", &["A"]).unwrap();
    assert_eq!(store.consultant("A").unwrap().interview_date, NaiveDate::from_ymd_opt(2025, 5, 4));
}

#[test]
fn test_invitation_unknown_consultant_changes_nothing() {
    let mut store = store();
    let before = store.snapshot().clone();
    let err = store.send_meeting_invitations("P", &["A", "ghost"]).unwrap_err();
    assert!(matches!(err, WorkflowError::ConsultantNotFound(_)));
    assert_eq!(store.snapshot(), &before);
}

#[test]
fn test_accept_invitation() {
    let mut store = store();
    let ids = store.send_meeting_invitations("P", &["A"]).unwrap();
    store.accept_meeting_invitation(&ids[0]).unwrap();

    let consultant = store.consultant("A").unwrap();
    assert_eq!(consultant.status, ConsultantStatus::Interviewing);
    assert_eq!(consultant.interview_status, Some(InterviewStatus::Scheduled));
    assert!(store.message(&ids[0]).unwrap().read);

    let project = store.project("P").unwrap();
    assert_eq!(project.notifications()[0].content, "Sarah Jensen has accepted the meeting invitation");
    assert_eq!(project.notifications()[0].kind, NotificationType::Milestone);
    assert_eq!(project.matched("A").unwrap().interview_status, InterviewStatus::Scheduled);
}

#[test]
fn test_decline_invitation() {
    let mut store = store();
    let ids = store.send_meeting_invitations("P", &["B"]).unwrap();
    store.decline_meeting_invitation(&ids[0]).unwrap();

    let consultant = store.consultant("B").unwrap();
    assert_eq!(consultant.status, ConsultantStatus::Available);
    assert_eq!(consultant.interview_status, Some(InterviewStatus::Pending));
    assert!(store.message(&ids[0]).unwrap().read);

    let project = store.project("P").unwrap();
    assert_eq!(project.notifications()[0].content, "Michael Chen has declined the meeting invitation");
    assert_eq!(project.notifications()[0].kind, NotificationType::Alert);
    assert_eq!(project.matched("B").unwrap().interview_status, InterviewStatus::Pending);
}

#[test]
fn test_answer_non_invitation_rejected() {
    let mut store = WorkflowStore::with_demo_data(StoreSettings::default(), Box::new(FixedClock(Utc::now())));
    let err = store.accept_meeting_invitation("msg2").unwrap_err();
    assert!(matches!(err, WorkflowError::NotAnInvitation(_)));
}

#[test]
fn test_answer_for_missing_project_rejected() {
    let mut store = WorkflowStore::with_demo_data(StoreSettings::default(), Box::new(FixedClock(Utc::now())));
    let before = store.snapshot().clone();
    let err = store.decline_meeting_invitation("msg1").unwrap_err();
    assert!(matches!(err, WorkflowError::ProjectNotFound(ref id) if id == "p1"));
    assert_eq!(store.snapshot(), &before);
}

#[test]
fn test_answer_unknown_message() {
    let mut store = store();
    assert!(store.accept_meeting_invitation("nope").unwrap_err().is_not_found());
}

#[test]
fn test_mark_read_is_idempotent() {
    let mut store = store();
    let ids = store.send_meeting_invitations("P", &["A"]).unwrap();

    store.mark_message_as_read(&ids[0]).unwrap();
    let after_once = store.snapshot().clone();
    store.mark_message_as_read(&ids[0]).unwrap();
    assert_eq!(store.snapshot(), &after_once);
    assert_eq!(store.metrics().messages_read_total, 1);
}

#[test]
fn test_mark_all_read() {
    let mut store = store();
    store.send_meeting_invitations("P", &["A", "B"]).unwrap();

    assert_eq!(store.mark_all_messages_as_read().unwrap(), 2);
    assert!(store.messages().iter().all(|m| m.read));
    assert_eq!(store.mark_all_messages_as_read().unwrap(), 0);
    assert_eq!(store.summary().unread_messages, 0);
}

#[test]
fn test_delete_message() {
    let mut store = store();
    let ids = store.send_meeting_invitations("P", &["A", "B"]).unwrap();

    store.delete_message(&ids[0]).unwrap();
    assert_eq!(store.messages().len(), 1);
    assert!(store.message(&ids[0]).is_none());
    assert!(matches!(store.delete_message(&ids[0]), Err(WorkflowError::MessageNotFound(_))));
}

#[test]
fn test_invitations_do_not_move_phase() {
    let mut store = store();
    store.send_meeting_invitations("P", &["A"]).unwrap();
    assert_eq!(store.project("P").unwrap().workflow_phase(), ProjectPhase::InternalInterviews);
}

fn store_with_engaged_consultant() -> WorkflowStore {
    let mut store = store();
    store.add_consultants(vec![Consultant::new("C", "Emma Rodriguez", "Full Stack Developer")]).unwrap();
    store
        .add_project(NewProject::new("Ledger", "2025-05-10", "2025-07-30").with_id("Q"))
        .unwrap();
    store
}

#[test]
fn test_invitation_rejected_while_engaged_elsewhere() {
    let mut store = store_with_engaged_consultant();
    store.advance_project_phase("P", ProjectPhase::InProgress, None).unwrap();
    assert_eq!(store.consultant("A").unwrap().status, ConsultantStatus::Assigned);
    let before = store.snapshot().clone();

    let err = store.send_meeting_invitations("Q", &["C", "A"]).unwrap_err();
    assert!(matches!(err, WorkflowError::ConsultantEngaged { ref project_id, .. } if project_id == "P"));
    assert_eq!(store.snapshot(), &before);
    assert_eq!(store.consultant("A").unwrap().status, ConsultantStatus::Assigned);
}

#[test]
fn test_answer_rejected_once_engaged_elsewhere() {
    let mut store = store_with_engaged_consultant();
    let ids = store.send_meeting_invitations("P", &["C"]).unwrap();
    store.assign_consultants_to_project("Q", &["C"]).unwrap();
    let before = store.snapshot().clone();

    assert!(matches!(
        store.decline_meeting_invitation(&ids[0]),
        Err(WorkflowError::ConsultantEngaged { .. })
    ));
    assert!(matches!(
        store.accept_meeting_invitation(&ids[0]),
        Err(WorkflowError::ConsultantEngaged { .. })
    ));
    assert_eq!(store.snapshot(), &before);
    assert_eq!(store.consultant("C").unwrap().status, ConsultantStatus::InSelection);
}

#[test]
fn test_invitation_ids_follow_sequence() {
    let mut store = store();
    assert_eq!(store.send_meeting_invitations("P", &["A", "B"]).unwrap(), vec!["msg-2", "msg-3"]);
    assert_eq!(store.send_meeting_invitations("P", &["A"]).unwrap(), vec!["msg-5"]);
}
