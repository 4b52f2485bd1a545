use serde::{Deserialize, Serialize};

/// A named permission bundle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    pub id: Option<i64>,
    pub name: String,
    pub description: Option<String>,
    pub permissions: Vec<String>,
}

/// First-run setup state of the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetupStatus {
    pub user_count: u64,
    pub setup_complete: bool,
}

impl SetupStatus {
    pub fn needs_setup(&self) -> bool {
        !self.setup_complete
    }
}
