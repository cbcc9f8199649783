//! Document intake boundary
//!
//! The intake service reads a project brief and answers with a JSON payload
//! describing the project and the consultant profiles it recommends.
//! [`IntakeMapper`] turns that payload into an [`IntakeDraft`]: a
//! [`NewProject`] plus [`Consultant`] records ready for the store.
//!
//! Scores in `results` arrive in several shapes: a plain number, an object
//! with a `score` field, or a Python dict rendered as a string
//! (`"{'score': 0.82, 'reason': None}"`).

use chrono::NaiveDate;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, info};

use crate::config::IntakeConfig;
use crate::error::{Result, WorkflowError};
use crate::models::{Client, Consultant, ConsultantRole, NewProject};
use crate::store::WorkflowStore;

/// Display names handed out to intake consultants, in order
const CONSULTANT_NAMES: [&str; 20] = [
    "John Smith",
    "Emma Johnson",
    "Michael Brown",
    "Sarah Davis",
    "David Wilson",
    "Jennifer Martinez",
    "Robert Taylor",
    "Lisa Anderson",
    "James Thomas",
    "Amanda Jackson",
    "Daniel White",
    "Jessica Harris",
    "Christopher Lewis",
    "Michelle Clark",
    "Matthew Lee",
    "Elizabeth Walker",
    "Andrew Hall",
    "Stephanie Allen",
    "Richard Young",
    "Nicole King",
];

/// Raw intake service response
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IntakePayload {
    /// Project details; the service has shipped this key misspelled
    #[serde(default, alias = "peoject_autofill")]
    pub project_autofill: ProjectAutofill,
    /// Scores keyed by consultant number
    #[serde(default)]
    pub results: Map<String, Value>,
}

/// Project section of the intake payload
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ProjectAutofill {
    pub project_name: Option<String>,
    pub company_name: Option<String>,
    pub project_description: Option<String>,
    /// Days, as a number or a string
    pub total_time: Option<Value>,
    pub consultants: Vec<IntakeConsultant>,
}

/// One recommended consultant profile
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct IntakeConsultant {
    #[serde(rename = "Consultant_no")]
    pub consultant_no: Option<Value>,
    #[serde(rename = "Role")]
    pub role: Option<String>,
    #[serde(rename = "Skills")]
    pub skills: Vec<String>,
    #[serde(rename = "Location_Preference")]
    pub location_preference: Option<String>,
    #[serde(rename = "Domain_Expertise")]
    pub domain_expertise: Option<String>,
    #[serde(rename = "Level_Of_Consultant")]
    pub level_of_consultant: Option<String>,
}

/// Mapped intake result, not yet in any store
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IntakeDraft {
    /// Project to create
    pub project: NewProject,
    /// Consultants to upsert
    pub consultants: Vec<Consultant>,
}

/// Ids written by [`IntakeDraft::apply`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IntakeOutcome {
    pub project_id: String,
    pub consultant_ids: Vec<String>,
}

/// Maps intake payloads onto store inputs
#[derive(Debug, Clone)]
pub struct IntakeMapper {
    config: IntakeConfig,
    score_regex: Regex,
}

impl IntakeMapper {
    pub fn new(config: IntakeConfig) -> Result<Self> {
        let score_regex = Regex::new(r"'score':\s*([\d.]+)")
            .map_err(|e| WorkflowError::Intake(format!("Failed to compile score regex: {e}")))?;
        Ok(Self { config, score_regex })
    }

    /// Decode a JSON payload and map it; `today` fills the project dates
    pub fn parse(&self, json: &str, today: NaiveDate) -> Result<IntakeDraft> {
        let payload: IntakePayload = serde_json::from_str(json)?;
        Ok(self.map(payload, today))
    }

    /// Map a decoded payload
    #[must_use]
    pub fn map(&self, payload: IntakePayload, today: NaiveDate) -> IntakeDraft {
        let autofill = payload.project_autofill;

        let consultants: Vec<Consultant> = autofill
            .consultants
            .iter()
            .enumerate()
            .map(|(index, profile)| self.consultant(index, profile, &payload.results))
            .collect();

        let mut roles: Vec<ConsultantRole> = Vec::new();
        for title in autofill.consultants.iter().filter_map(|c| c.role.as_deref()) {
            match roles.iter_mut().find(|r| r.title == title) {
                Some(role) => role.count += 1,
                None => roles.push(ConsultantRole {
                    title: title.to_string(),
                    count: 1,
                }),
            }
        }

        let name = non_blank(autofill.project_name).unwrap_or_else(|| self.config.default_project_name.clone());
        let company = non_blank(autofill.company_name).unwrap_or_else(|| self.config.default_company.clone());
        let description =
            non_blank(autofill.project_description).unwrap_or_else(|| self.config.default_description.clone());
        let days = autofill
            .total_time
            .as_ref()
            .and_then(duration_days)
            .unwrap_or_else(|| self.config.default_duration_days.to_string());

        let today = today.format("%Y-%m-%d").to_string();
        let project = NewProject {
            name,
            description,
            client: Some(Client::named(company)),
            start_date: today.clone(),
            end_date: today,
            duration: Some(format!("{days} days")),
            consultant_roles: roles,
            ..NewProject::default()
        };

        info!(
            project = %project.name,
            consultants = consultants.len(),
            roles = project.consultant_roles.len(),
            "Intake payload mapped"
        );
        IntakeDraft { project, consultants }
    }

    fn consultant(&self, index: usize, profile: &IntakeConsultant, results: &Map<String, Value>) -> Consultant {
        let key = profile.consultant_no.as_ref().map(value_key);
        let score = key
            .as_deref()
            .and_then(|k| results.get(k))
            .and_then(|raw| self.score(raw));
        debug!(index, key = ?key, score = ?score, "Intake consultant scored");

        let mut consultant = Consultant::new(
            format!("{}{}", self.config.consultant_id_prefix, index + 1),
            CONSULTANT_NAMES[index % CONSULTANT_NAMES.len()],
            profile.role.clone().unwrap_or_default(),
        )
        .with_skills(profile.skills.iter().cloned())
        .with_location(
            non_blank(profile.location_preference.clone()).unwrap_or_else(|| self.config.unspecified_location.clone()),
        );
        consultant.domain = non_blank(profile.domain_expertise.clone());
        consultant.level = non_blank(profile.level_of_consultant.clone());
        consultant.score = score;
        consultant
    }

    /// Extract a score from any of the shapes the service returns
    #[must_use]
    pub fn score(&self, raw: &Value) -> Option<f64> {
        match raw {
            Value::Number(n) => n.as_f64(),
            Value::Object(map) => map.get("score").and_then(Value::as_f64),
            Value::String(text) => {
                let json = text
                    .replace('\'', "\"")
                    .replace("None", "null")
                    .replace("True", "true")
                    .replace("False", "false");
                match serde_json::from_str::<Value>(&json) {
                    Ok(Value::Object(map)) => map.get("score").and_then(Value::as_f64),
                    Ok(Value::Number(n)) => n.as_f64(),
                    _ => self
                        .score_regex
                        .captures(text)
                        .and_then(|caps| caps.get(1))
                        .and_then(|m| m.as_str().parse().ok()),
                }
            },
            _ => None,
        }
    }
}

impl IntakeDraft {
    /// Consultant ids covering each requested role count
    ///
    /// Candidates are the draft consultants with the role's title; when a
    /// role asks for more than there are candidates, they repeat in order.
    #[must_use]
    pub fn staffing_plan(&self) -> Vec<String> {
        let mut plan = Vec::new();
        for role in &self.project.consultant_roles {
            let candidates: Vec<&str> = self
                .consultants
                .iter()
                .filter(|c| c.role == role.title)
                .map(|c| c.id.as_str())
                .collect();
            if candidates.is_empty() {
                continue;
            }
            for i in 0..role.count as usize {
                plan.push(candidates[i % candidates.len()].to_string());
            }
        }
        plan
    }

    /// Upsert the consultants and create the project
    pub fn apply(self, store: &mut WorkflowStore) -> Result<IntakeOutcome> {
        let consultant_ids = store.add_consultants(self.consultants)?;
        let project_id = store.add_project(self.project)?;
        Ok(IntakeOutcome {
            project_id,
            consultant_ids,
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn value_key(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn duration_days(value: &Value) -> Option<String> {
    match value {
        Value::Number(n) if n.as_f64().is_some_and(|d| d > 0.0) => Some(n.to_string()),
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        _ => None,
    }
}
