//! Test data fixtures for the mock server.
//!
//! Provides factory functions for creating realistic test data.

use crate::{Group, ModelSet, User};

/// Collection of fixture factories for test data.
pub struct Fixtures;

impl Fixtures {
    /// Client id accepted by the default scenario.
    pub const CLIENT_ID: &'static str = "test-client-id";
    /// Client secret accepted by the default scenario.
    pub const CLIENT_SECRET: &'static str = "test-client-secret";

    /// A model set with a fixed ID.
    pub fn model_set(id: u64, name: &str, models: &[&str]) -> ModelSet {
        ModelSet {
            id: Some(id.to_string()),
            built_in: Some(false),
            all_access: Some(false),
            ..ModelSet::new(name, models.iter().copied())
        }
    }

    /// The built-in set granting every model.
    pub fn all_models_set(id: u64) -> ModelSet {
        ModelSet {
            id: Some(id.to_string()),
            name: Some("All".to_string()),
            built_in: Some(true),
            all_access: Some(true),
            models: Some(Default::default()),
        }
    }

    pub fn user(id: u64, first_name: &str, last_name: &str) -> User {
        User {
            id: Some(id.to_string()),
            display_name: Some(format!("{first_name} {last_name}")),
            is_disabled: Some(false),
            ..User::new(
                first_name,
                last_name,
                &format!("{}@example.com", first_name.to_lowercase()),
            )
        }
    }

    pub fn group(id: u64, name: &str) -> Group {
        Group {
            id: Some(id.to_string()),
            ..Group::new(name)
        }
    }

    /// Get the default scenario used by `MockServer::start`.
    pub fn default_scenario() -> DefaultScenario {
        DefaultScenario::new()
    }
}

/// A pre-populated instance: one set of credentials, five model sets (one
/// built in), three users and a group holding two of them.
pub struct DefaultScenario {
    pub credentials: (String, String),
    pub model_sets: Vec<ModelSet>,
    pub users: Vec<User>,
    pub groups: Vec<(Group, Vec<u64>)>,
}

impl DefaultScenario {
    fn new() -> Self {
        Self {
            credentials: (
                Fixtures::CLIENT_ID.to_string(),
                Fixtures::CLIENT_SECRET.to_string(),
            ),
            model_sets: vec![
                Fixtures::all_models_set(1),
                Fixtures::model_set(2, "marketing", &["ads", "ecommerce"]),
                Fixtures::model_set(3, "finance", &["ledger"]),
                Fixtures::model_set(4, "support", &["tickets"]),
                Fixtures::model_set(5, "analysts", &["ecommerce", "ledger", "tickets"]),
            ],
            users: vec![
                Fixtures::user(1, "Ada", "Lovelace"),
                Fixtures::user(2, "Grace", "Hopper"),
                Fixtures::user(3, "Alan", "Turing"),
            ],
            groups: vec![(Fixtures::group(10, "Analysts"), vec![1, 2])],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_scenario_is_consistent() {
        let scenario = Fixtures::default_scenario();
        assert_eq!(scenario.model_sets.len(), 5);
        assert!(scenario.model_sets[0].is_built_in());

        let user_ids: Vec<String> = scenario.users.iter().filter_map(|u| u.id.clone()).collect();
        for (_, members) in &scenario.groups {
            for member in members {
                assert!(user_ids.contains(&member.to_string()));
            }
        }
    }
}
