//! Demo user record for the placeholder auth layer.

use serde::{Deserialize, Serialize};

/// Identifier handed to every accepted sign-in.
pub const DEMO_USER_ID: &str = "demo-user-1";
/// Token persisted alongside the demo user.
pub const DEMO_TOKEN: &str = "demotoken";

/// Signed-in user as persisted under the user key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
}

impl User {
    pub fn demo(email: impl Into<String>) -> Self {
        Self {
            id: DEMO_USER_ID.to_string(),
            email: email.into(),
        }
    }
}
