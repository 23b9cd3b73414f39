//! Mock server state management.
//!
//! Provides the in-memory data store for the mock Looker API server.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::{Group, ModelSet, User};

/// Shared handle to the mock state.
pub type SharedState = Arc<RwLock<MockState>>;

/// Shared state for the mock server.
///
/// Wrapped in `Arc<RwLock<_>>` for concurrent access from handlers and tests.
#[derive(Debug)]
pub struct MockState {
    /// Accepted API3 credentials, client id to secret.
    pub credentials: HashMap<String, String>,

    /// Live access tokens and the workspace each session is bound to.
    pub sessions: HashMap<String, String>,

    /// `expires_in` handed out by `POST /login`.
    pub token_lifetime: u64,

    /// Successful credential exchanges so far.
    pub login_count: u64,

    /// Model sets indexed by numeric ID.
    pub model_sets: BTreeMap<u64, ModelSet>,

    /// Users indexed by numeric ID.
    pub users: BTreeMap<u64, User>,

    /// Groups indexed by numeric ID.
    pub groups: BTreeMap<u64, Group>,

    /// Group ID to member user IDs.
    pub group_members: HashMap<u64, BTreeSet<u64>>,

    next_id: u64,
}

impl Default for MockState {
    fn default() -> Self {
        Self {
            credentials: HashMap::new(),
            sessions: HashMap::new(),
            token_lifetime: 3600,
            login_count: 0,
            model_sets: BTreeMap::new(),
            users: BTreeMap::new(),
            groups: BTreeMap::new(),
            group_members: HashMap::new(),
            next_id: 1,
        }
    }
}

impl MockState {
    /// Create a new empty state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create state wrapped in Arc<RwLock> for sharing.
    pub fn shared(self) -> SharedState {
        Arc::new(RwLock::new(self))
    }

    /// Accept `client_id`/`client_secret` at `/login`.
    pub fn with_credentials(mut self, client_id: &str, client_secret: &str) -> Self {
        self.credentials
            .insert(client_id.to_string(), client_secret.to_string());
        self
    }

    /// Set the lifetime of issued tokens.
    pub fn with_token_lifetime(mut self, seconds: u64) -> Self {
        self.token_lifetime = seconds;
        self
    }

    /// Add a model set, keeping its ID if it has a numeric one.
    pub fn with_model_set(mut self, model_set: ModelSet) -> Self {
        self.insert_model_set(model_set);
        self
    }

    /// Add a user, keeping its ID if it has a numeric one.
    pub fn with_user(mut self, mut user: User) -> Self {
        let id = self.claim_id(user.id.as_deref());
        user.id = Some(id.to_string());
        self.users.insert(id, user);
        self
    }

    /// Add a group with the given members.
    pub fn with_group(mut self, mut group: Group, members: &[u64]) -> Self {
        let id = self.claim_id(group.id.as_deref());
        group.id = Some(id.to_string());
        self.groups.insert(id, group);
        self.group_members
            .insert(id, members.iter().copied().collect());
        self
    }

    /// Check credentials and issue a token on success.
    pub fn login(&mut self, client_id: &str, client_secret: &str) -> Option<String> {
        if self.credentials.get(client_id).map(String::as_str) != Some(client_secret) {
            return None;
        }
        self.login_count += 1;
        let token = format!("token-{}", self.login_count);
        self.sessions.insert(token.clone(), "production".to_string());
        Some(token)
    }

    /// Workspace of the session behind `token`, if the token is live.
    pub fn session(&self, token: &str) -> Option<&str> {
        self.sessions.get(token).map(String::as_str)
    }

    pub fn logout(&mut self, token: &str) -> bool {
        self.sessions.remove(token).is_some()
    }

    /// Store a new model set, assigning an ID if it has none.
    pub fn insert_model_set(&mut self, mut model_set: ModelSet) -> ModelSet {
        let id = self.claim_id(model_set.id.as_deref());
        model_set.id = Some(id.to_string());
        model_set.built_in.get_or_insert(false);
        model_set.all_access.get_or_insert(false);
        model_set.models.get_or_insert_with(BTreeSet::new);
        self.model_sets.insert(id, model_set.clone());
        model_set
    }

    /// Whether another model set already uses `name`.
    pub fn model_set_name_taken(&self, name: &str, except: Option<u64>) -> bool {
        self.model_sets
            .iter()
            .any(|(id, set)| Some(*id) != except && set.name.as_deref() == Some(name))
    }

    /// Merge the fields present in `patch` into a stored model set.
    pub fn update_model_set(&mut self, id: u64, patch: ModelSet) -> Option<ModelSet> {
        let set = self.model_sets.get_mut(&id)?;
        if let Some(name) = patch.name {
            set.name = Some(name);
        }
        if let Some(models) = patch.models {
            set.models = Some(models);
        }
        Some(set.clone())
    }

    pub fn remove_model_set(&mut self, id: u64) -> Option<ModelSet> {
        self.model_sets.remove(&id)
    }

    /// Members of a group, in ID order.
    pub fn group_users(&self, group_id: u64) -> Option<Vec<User>> {
        let members = self.group_members.get(&group_id)?;
        Some(
            members
                .iter()
                .filter_map(|id| self.users.get(id).cloned())
                .collect(),
        )
    }

    fn claim_id(&mut self, requested: Option<&str>) -> u64 {
        let id = requested
            .and_then(|raw| raw.parse().ok())
            .unwrap_or(self.next_id);
        self.next_id = self.next_id.max(id + 1);
        id
    }
}
