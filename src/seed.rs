//! Demo data for the dashboard
//!
//! Two unassigned projects, six consultants in assorted states and a
//! two-message inbox.

use chrono::{DateTime, TimeZone, Utc};

use crate::clock::Clock;
use crate::models::{Client, Consultant, ConsultantStatus, Message, MessageType, NewProject, Project};
use crate::store::{StoreSettings, StoreState, WorkflowStore};

fn at(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, hour, minute, 0)
        .single()
        .unwrap_or_default()
}

fn project(id: &str, name: &str, description: &str, client: (&str, &str), skills: [&str; 5], dates: (&str, &str)) -> Project {
    let (client_name, logo) = client;
    let new = NewProject {
        name: name.to_string(),
        description: description.to_string(),
        client: Some(Client {
            logo: Some(logo.to_string()),
            ..Client::named(client_name)
        }),
        skills: skills.iter().map(ToString::to_string).collect(),
        start_date: dates.0.to_string(),
        end_date: dates.1.to_string(),
        ..NewProject::default()
    };
    Project::from_new(id.to_string(), new)
}

fn consultant(
    n: u8, name: &str, role: &str, skills: [&str; 5], status: ConsultantStatus, location: &str,
) -> Consultant {
    let mut consultant = Consultant::new(format!("cons{n}"), name, role)
        .with_skills(skills)
        .with_location(location)
        .with_status(status);
    consultant.avatar = Some(format!("avatar{n}.jpg"));
    consultant
}

/// Projects of the demo data set
#[must_use]
pub fn demo_projects() -> Vec<Project> {
    vec![
        project(
            "proj1",
            "E-commerce Platform Redesign",
            "Modernizing the UI/UX of an existing e-commerce platform with focus on mobile experience",
            ("RetailPro Inc.", "retailpro.svg"),
            ["UI/UX Design", "React", "Node.js", "Figma", "Responsive Design"],
            ("2025-05-10", "2025-07-30"),
        ),
        project(
            "proj2",
            "Financial Dashboard Development",
            "Creating an interactive dashboard for financial data visualization with real-time updates",
            ("FinViz Capital", "finviz.svg"),
            ["React", "TypeScript", "D3.js", "Data Visualization", "API Integration"],
            ("2025-06-01", "2025-09-15"),
        ),
    ]
}

/// Consultants of the demo data set
#[must_use]
pub fn demo_consultants() -> Vec<Consultant> {
    use ConsultantStatus::{Assigned, Available, Busy, Leave};
    vec![
        consultant(1, "Sarah Jensen", "Senior React Developer", ["React", "TypeScript", "Node.js", "AWS", "GraphQL"], Available, "New York, US"),
        consultant(2, "Michael Chen", "UX/UI Designer", ["UI/UX Design", "Figma", "Adobe XD", "User Research", "Prototyping"], Available, "San Francisco, US"),
        consultant(3, "Emma Rodriguez", "Full Stack Developer", ["React", "Node.js", "MongoDB", "Express", "AWS"], Assigned, "London, UK"),
        consultant(4, "David Kim", "DevOps Engineer", ["Docker", "Kubernetes", "AWS", "CI/CD", "Terraform"], Busy, "Berlin, Germany"),
        consultant(5, "Aisha Patel", "Data Scientist", ["Python", "Machine Learning", "TensorFlow", "Data Analysis", "SQL"], Available, "Toronto, Canada"),
        consultant(6, "Thomas Müller", "Backend Developer", ["Java", "Spring Boot", "PostgreSQL", "Microservices", "Kafka"], Leave, "Munich, Germany"),
    ]
}

/// Inbox of the demo data set, newest first
///
/// Both messages point at projects outside the demo project table.
#[must_use]
pub fn demo_messages() -> Vec<Message> {
    vec![
        Message {
            id: "msg1".to_string(),
            project_id: "p1".to_string(),
            project_name: "Healthcare Portal Redesign".to_string(),
            content: "Scheduled an internal interview for the Healthcare Portal Redesign project. Please prepare for a technical discussion.".to_string(),
            timestamp: at(2023, 5, 10, 9, 0),
            kind: MessageType::MeetingInvitation,
            read: false,
            consultant_id: Some("c1".to_string()),
            consultant_name: Some("Alex Thompson".to_string()),
        },
        Message {
            id: "msg2".to_string(),
            project_id: "p2".to_string(),
            project_name: "E-commerce Platform Migration".to_string(),
            content: "You've been assigned to the E-commerce Platform Migration project. Check your dashboard for details.".to_string(),
            timestamp: at(2023, 5, 9, 14, 30),
            kind: MessageType::Assignment,
            read: true,
            consultant_id: Some("c2".to_string()),
            consultant_name: Some("Sarah Chen".to_string()),
        },
    ]
}

/// Full demo state
#[must_use]
pub fn demo_state() -> StoreState {
    StoreState {
        projects: demo_projects().into_iter().map(|p| (p.id.clone(), p)).collect(),
        consultants: demo_consultants().into_iter().map(|c| (c.id.clone(), c)).collect(),
        messages: demo_messages(),
    }
}

impl WorkflowStore {
    /// Store preloaded with the demo data set
    #[must_use]
    pub fn with_demo_data(settings: StoreSettings, clock: Box<dyn Clock>) -> Self {
        Self::from_state(demo_state(), settings, clock)
    }
}
