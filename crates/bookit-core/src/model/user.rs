use serde::{Deserialize, Serialize};

/// The signed-in account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: Option<i64>,
    pub username: String,
    pub email: Option<String>,
    pub is_admin: bool,
    pub roles: Vec<String>,
}

impl User {
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r.eq_ignore_ascii_case(role))
    }

    /// Admin flag or an explicit `admin` role.
    pub fn is_admin(&self) -> bool {
        self.is_admin || self.has_role("admin")
    }
}
