//! Utility functions shared by the store and intake.
//!
//! This module provides id generation and skill-list normalization.

use rand::Rng;

/// Length of generated project ids.
const PROJECT_ID_LEN: usize = 7;

const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Remove duplicate and blank skills, keeping first-seen order.
///
/// # Arguments
///
/// * `skills` - Skill names as entered
///
/// # Returns
///
/// Trimmed skills with case-insensitive duplicates removed.
pub fn dedup_skills(skills: Vec<String>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    skills
        .into_iter()
        .map(|skill| skill.trim().to_string())
        .filter(|skill| !skill.is_empty() && seen.insert(skill.to_lowercase()))
        .collect()
}

/// Random lowercase base36 project id.
#[must_use]
pub fn random_project_id() -> String {
    let mut rng = rand::thread_rng();
    (0..PROJECT_ID_LEN)
        .map(|_| char::from(BASE36[rng.gen_range(0..BASE36.len())]))
        .collect()
}

/// Sequential id source for notifications, notes and messages.
///
/// Ids are `<prefix>-<n>` with `n` shared across prefixes, so two ids handed
/// out by one generator never collide.
#[derive(Debug, Default)]
pub struct IdGenerator {
    next: u64,
}

impl IdGenerator {
    /// Generator starting at 1
    #[must_use]
    pub const fn new() -> Self {
        Self { next: 0 }
    }

    /// Next id with the given prefix
    pub fn next_id(&mut self, prefix: &str) -> String {
        self.next += 1;
        format!("{prefix}-{}", self.next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dedup_skills_keeps_order() {
        let skills = vec!["React".into(), " Node.js ".into(), "react".into(), String::new(), "AWS".into()];
        assert_eq!(dedup_skills(skills), vec!["React", "Node.js", "AWS"]);
    }

    #[test]
    fn test_random_project_id_shape() {
        let id = random_project_id();
        assert_eq!(id.len(), PROJECT_ID_LEN);
        assert!(id.chars().all(|c| c.is_ascii_digit() || c.is_ascii_lowercase()));
    }

    #[test]
    fn test_id_generator_sequence() {
        let mut ids = IdGenerator::new();
        assert_eq!(ids.next_id("notification"), "notification-1");
        assert_eq!(ids.next_id("msg"), "msg-2");
    }
}
