//! Comprehensive unit tests for validation.rs module

use chrono::NaiveDate;
use staffing_workflow::models::{Client, NewProject, ProjectUpdate};
use staffing_workflow::validation::InputValidator;
use staffing_workflow::{FailureKind, WorkflowError};

#[test]
fn test_validate_project_name_valid() {
    assert!(InputValidator::validate_project_name("E-commerce Platform Redesign").is_ok());
}

#[test]
fn test_validate_project_name_empty() {
    assert!(InputValidator::validate_project_name("").is_err());
}

#[test]
fn test_validate_project_name_whitespace_only() {
    assert!(InputValidator::validate_project_name("   ").is_err());
}

#[test]
fn test_validate_project_name_too_long() {
    let long_name = "a".repeat(201);
    assert!(InputValidator::validate_project_name(&long_name).is_err());
}

#[test]
fn test_validate_project_name_exactly_200_chars() {
    let name = "a".repeat(200);
    assert!(InputValidator::validate_project_name(&name).is_ok());
}

#[test]
fn test_validate_project_name_with_newline() {
    assert!(InputValidator::validate_project_name("Portal\nRedesign").is_err());
}

#[test]
fn test_validate_project_name_unicode() {
    assert!(InputValidator::validate_project_name("Plateforme Müller & Fils").is_ok());
}

#[test]
fn test_validation_errors_are_malformed_input() {
    let err = InputValidator::validate_project_name("").unwrap_err();
    assert!(matches!(err, WorkflowError::InvalidInput(_)));
    assert_eq!(err.kind(), FailureKind::MalformedInput);
}

#[test]
fn test_validate_note_valid() {
    assert!(InputValidator::validate_note("Strong React background").is_ok());
}

#[test]
fn test_validate_note_blank() {
    assert!(InputValidator::validate_note(" \n ").is_err());
}

#[test]
fn test_validate_note_too_long() {
    assert!(InputValidator::validate_note(&"x".repeat(10_001)).is_err());
}

#[test]
fn test_parse_calendar_date_plain() {
    assert_eq!(
        InputValidator::parse_calendar_date("2025-05-10").unwrap(),
        NaiveDate::from_ymd_opt(2025, 5, 10).unwrap()
    );
}

#[test]
fn test_parse_calendar_date_rfc3339() {
    assert_eq!(
        InputValidator::parse_calendar_date("2025-05-10T09:30:00.000Z").unwrap(),
        NaiveDate::from_ymd_opt(2025, 5, 10).unwrap()
    );
}

#[test]
fn test_parse_calendar_date_invalid() {
    assert!(InputValidator::parse_calendar_date("10/05/2025").is_err());
    assert!(InputValidator::parse_calendar_date("").is_err());
}

#[test]
fn test_validate_date_range_valid() {
    assert!(InputValidator::validate_date_range("2025-05-10", "2025-07-30").is_ok());
}

#[test]
fn test_validate_date_range_same_day() {
    assert!(InputValidator::validate_date_range("2025-05-10", "2025-05-10").is_ok());
}

#[test]
fn test_validate_date_range_start_after_end() {
    assert!(InputValidator::validate_date_range("2025-07-30", "2025-05-10").is_err());
}

#[test]
fn test_validate_date_range_very_long_is_allowed() {
    assert!(InputValidator::validate_date_range("2020-01-01", "2030-01-01").is_ok());
}

#[test]
fn test_validate_phone_valid_us() {
    assert!(InputValidator::validate_phone("+1234567890").is_ok());
}

#[test]
fn test_validate_phone_valid_international() {
    assert!(InputValidator::validate_phone("+442012345678").is_ok());
}

#[test]
fn test_validate_phone_with_formatting() {
    assert!(InputValidator::validate_phone("+1 (555) 123-4567").is_ok());
}

#[test]
fn test_validate_phone_empty() {
    assert!(InputValidator::validate_phone("").is_err());
}

#[test]
fn test_validate_phone_too_short() {
    assert!(InputValidator::validate_phone("123456").is_err());
}

#[test]
fn test_validate_phone_too_long() {
    assert!(InputValidator::validate_phone("12345678901234567").is_err());
}

#[test]
fn test_validate_phone_with_invalid_chars() {
    assert!(InputValidator::validate_phone("+1234567890abc").is_err());
}

#[test]
fn test_validate_email_valid() {
    assert!(InputValidator::validate_email("test@example.com").is_ok());
}

#[test]
fn test_validate_email_valid_subdomain() {
    assert!(InputValidator::validate_email("user@mail.example.com").is_ok());
}

#[test]
fn test_validate_email_no_at_symbol() {
    assert!(InputValidator::validate_email("testexample.com").is_err());
}

#[test]
fn test_validate_email_multiple_at_symbols() {
    assert!(InputValidator::validate_email("test@@example.com").is_err());
}

#[test]
fn test_validate_email_no_domain_extension() {
    assert!(InputValidator::validate_email("test@example").is_err());
}

#[test]
fn test_validate_email_local_part_too_long() {
    let long_local = format!("{}@example.com", "a".repeat(65));
    assert!(InputValidator::validate_email(&long_local).is_err());
}

#[test]
fn test_validate_client_blank_contact_fields_skipped() {
    let client = Client {
        email: Some(String::new()),
        phone: Some("  ".to_string()),
        ..Client::named("RetailPro Inc.")
    };
    assert!(InputValidator::validate_client(&client).is_ok());
}

#[test]
fn test_validate_client_bad_email() {
    let client = Client {
        email: Some("not-an-email".to_string()),
        ..Client::named("RetailPro Inc.")
    };
    assert!(InputValidator::validate_client(&client).is_err());
}

#[test]
fn test_validate_new_project() {
    let project = NewProject::new("Portal", "2025-05-10", "2025-07-30");
    assert!(InputValidator::validate_new_project(&project).is_ok());
    assert!(InputValidator::validate_new_project(&project.clone().with_id(" ")).is_err());
}

#[test]
fn test_validate_project_update_checks_against_current_dates() {
    let update = ProjectUpdate {
        end_date: Some("2025-05-01".to_string()),
        ..ProjectUpdate::default()
    };
    assert!(InputValidator::validate_project_update(&update, "2025-05-10", "2025-07-30").is_err());

    let update = ProjectUpdate {
        end_date: Some("2025-08-30".to_string()),
        ..ProjectUpdate::default()
    };
    assert!(InputValidator::validate_project_update(&update, "2025-05-10", "2025-07-30").is_ok());
}

#[test]
fn test_sanitize_text_with_control_chars() {
    let sanitized = InputValidator::sanitize_text("Text\x00with\x01control");
    assert_eq!(sanitized, "Textwithcontrol");
}

#[test]
fn test_sanitize_text_preserves_newlines_and_tabs() {
    let sanitized = InputValidator::sanitize_text("Line1\nCol1\tCol2");
    assert!(sanitized.contains('\n'));
    assert!(sanitized.contains('\t'));
}

#[test]
fn test_sanitize_text_trims_whitespace() {
    assert_eq!(InputValidator::sanitize_text("  Text with spaces  "), "Text with spaces");
}
