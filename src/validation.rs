use chrono::{DateTime, NaiveDate};

use crate::error::{Result, WorkflowError};
use crate::models::{Client, NewProject, ProjectUpdate};

fn invalid(message: impl Into<String>) -> WorkflowError {
    WorkflowError::InvalidInput(message.into())
}

/// Validation utilities for input sanitization and edge case handling
#[derive(Debug, Copy, Clone)]
pub struct InputValidator;

impl InputValidator {
    /// Validate project name
    pub fn validate_project_name(name: &str) -> Result<()> {
        if name.trim().is_empty() {
            return Err(invalid("Project name cannot be empty"));
        }

        if name.chars().count() > 200 {
            return Err(invalid("Project name too long (max 200 characters)"));
        }

        // Check for potentially dangerous characters
        if name.contains('\0') || name.contains('\r') || name.contains('\n') {
            return Err(invalid("Project name contains invalid characters"));
        }

        Ok(())
    }

    /// Validate note text
    pub fn validate_note(content: &str) -> Result<()> {
        if content.trim().is_empty() {
            return Err(invalid("Note cannot be empty"));
        }

        if content.chars().count() > 10_000 {
            return Err(invalid("Note too long (max 10,000 characters)"));
        }

        Ok(())
    }

    /// Parse a calendar date given as `YYYY-MM-DD` or an RFC 3339 timestamp
    pub fn parse_calendar_date(value: &str) -> Result<NaiveDate> {
        let value = value.trim();
        if value.is_empty() {
            return Err(invalid("Date cannot be empty"));
        }

        NaiveDate::parse_from_str(value, "%Y-%m-%d")
            .or_else(|_| DateTime::parse_from_rfc3339(value).map(|dt| dt.date_naive()))
            .map_err(|_| invalid(format!("Invalid date: {value}")))
    }

    /// Validate date range
    pub fn validate_date_range(start: &str, end: &str) -> Result<()> {
        let start_date = Self::parse_calendar_date(start)?;
        let end_date = Self::parse_calendar_date(end)?;

        if start_date > end_date {
            return Err(invalid("Start date cannot be after end date"));
        }

        let days = (end_date - start_date).num_days();
        if days > 365 * 5 {
            tracing::warn!(days, "Project spans more than five years");
        }

        Ok(())
    }

    /// Validate phone number format
    pub fn validate_phone(phone: &str) -> Result<()> {
        if phone.trim().is_empty() {
            return Err(invalid("Phone number cannot be empty"));
        }

        // Remove common formatting characters
        let cleaned = phone
            .chars()
            .filter(|c| !matches!(c, ' ' | '-' | '(' | ')'))
            .collect::<String>();

        let digits_only = cleaned.chars().filter(char::is_ascii_digit).count();

        if !(7..=15).contains(&digits_only) {
            return Err(invalid("Phone number must be between 7 and 15 digits"));
        }

        let body = cleaned.strip_prefix('+').unwrap_or(&cleaned);
        if !body.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid("Phone number must start with + or contain only digits"));
        }

        Ok(())
    }

    /// Validate email format
    pub fn validate_email(email: &str) -> Result<()> {
        if email.trim().is_empty() {
            return Err(invalid("Email cannot be empty"));
        }

        if email.len() > 254 {
            return Err(invalid("Email too long (max 254 characters)"));
        }

        let parts: Vec<&str> = email.split('@').collect();
        if parts.len() != 2 {
            return Err(invalid("Email must have exactly one @ symbol"));
        }

        let local_part = parts[0];
        let domain_part = parts[1];

        if local_part.is_empty() || local_part.len() > 64 {
            return Err(invalid("Email local part invalid"));
        }

        if domain_part.is_empty() || !domain_part.contains('.') {
            return Err(invalid("Email domain invalid"));
        }

        Ok(())
    }

    /// Validate client details; blank contact fields count as absent
    pub fn validate_client(client: &Client) -> Result<()> {
        if client.name.trim().is_empty() {
            return Err(invalid("Client name cannot be empty"));
        }

        if let Some(email) = client.email.as_deref().filter(|e| !e.trim().is_empty()) {
            Self::validate_email(email)?;
        }

        if let Some(phone) = client.phone.as_deref().filter(|p| !p.trim().is_empty()) {
            Self::validate_phone(phone)?;
        }

        Ok(())
    }

    /// Validate a project creation request
    pub fn validate_new_project(project: &NewProject) -> Result<()> {
        Self::validate_project_name(&project.name)?;
        Self::validate_date_range(&project.start_date, &project.end_date)?;

        if let Some(client) = &project.client {
            Self::validate_client(client)?;
        }

        if let Some(id) = &project.id {
            if id.trim().is_empty() {
                return Err(invalid("Project id cannot be blank"));
            }
        }

        Ok(())
    }

    /// Validate a project patch against the dates it would leave in place
    pub fn validate_project_update(update: &ProjectUpdate, current_start: &str, current_end: &str) -> Result<()> {
        if let Some(name) = &update.name {
            Self::validate_project_name(name)?;
        }

        if update.start_date.is_some() || update.end_date.is_some() {
            let start = update.start_date.as_deref().unwrap_or(current_start);
            let end = update.end_date.as_deref().unwrap_or(current_end);
            Self::validate_date_range(start, end)?;
        }

        if let Some(client) = &update.client {
            Self::validate_client(client)?;
        }

        Ok(())
    }

    /// Sanitize text input
    #[must_use]
    pub fn sanitize_text(text: &str) -> String {
        text.chars()
            .filter(|c| !c.is_control() || *c == '\n' || *c == '\t')
            .collect::<String>()
            .trim()
            .to_string()
    }
}
