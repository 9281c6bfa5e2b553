//! Backend health probe payload

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthStatus {
    /// Current status of the backend ("healthy" when usable)
    pub status: String,
    /// Database connectivity as reported by the backend
    #[serde(default)]
    pub database: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl HealthStatus {
    pub fn is_healthy(&self) -> bool {
        self.status == "healthy"
    }

    /// Stand-in used when the probe itself failed
    pub fn unreachable(message: impl Into<String>) -> Self {
        Self {
            status: "unhealthy".to_string(),
            database: None,
            message: Some(message.into()),
        }
    }
}
