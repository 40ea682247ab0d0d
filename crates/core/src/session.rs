use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Persisted login state for the story service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthSession {
    pub user_id: String,
    pub name: String,
    pub email: String,
    pub token: String,
    pub logged_in_at: DateTime<Utc>,
}

impl AuthSession {
    #[must_use]
    pub fn new(user_id: String, name: String, email: String, token: String) -> Self {
        Self { user_id, name, email, token, logged_in_at: Utc::now() }
    }
}
