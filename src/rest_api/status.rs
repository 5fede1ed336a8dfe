//! Not-found status policy
//!
//! Absent documents map to `default` unless an `"<entity>.<operation>"`
//! override names another 4xx status.

use std::collections::BTreeMap;
use std::fmt;

use axum::http::StatusCode;
use serde::{Deserialize, Serialize};

/// Single-document operations that can miss
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Get,
    Update,
    Delete,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Get => "get",
            Operation::Update => "update",
            Operation::Delete => "delete",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Status returned when the addressed document does not exist
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusPolicy {
    #[serde(default = "default_not_found")]
    pub default: u16,

    /// Keyed by `"<entity>.<operation>"`, e.g. `"branch.delete"`
    #[serde(default)]
    pub overrides: BTreeMap<String, u16>,
}

fn default_not_found() -> u16 {
    404
}

impl Default for StatusPolicy {
    fn default() -> Self {
        Self {
            default: default_not_found(),
            overrides: BTreeMap::new(),
        }
    }
}

impl StatusPolicy {
    /// Add an override
    pub fn with_override(mut self, entity: &str, operation: Operation, status: u16) -> Self {
        self.overrides
            .insert(format!("{}.{}", entity, operation), status);
        self
    }

    /// Statuses used by the legacy service: a missing branch, user or
    /// restaurant answers 400 on update and delete.
    pub fn legacy() -> Self {
        ["branch", "user", "restaurants"]
            .into_iter()
            .fold(Self::default(), |policy, entity| {
                policy
                    .with_override(entity, Operation::Update, 400)
                    .with_override(entity, Operation::Delete, 400)
            })
    }

    /// Resolve the status for one entity and operation
    pub fn not_found(&self, entity: &str, operation: Operation) -> StatusCode {
        let code = self
            .overrides
            .get(&format!("{}.{}", entity, operation))
            .copied()
            .unwrap_or(self.default);
        StatusCode::from_u16(code).unwrap_or(StatusCode::NOT_FOUND)
    }

    /// Every status must be a client error
    pub fn validate(&self) -> Result<(), String> {
        check_client_error("not_found_status.default", self.default)?;
        for (key, code) in &self.overrides {
            let Some((_, operation)) = key.split_once('.') else {
                return Err(format!("not_found_status override '{}' must be <entity>.<operation>", key));
            };
            if !matches!(operation, "get" | "update" | "delete") {
                return Err(format!(
                    "not_found_status override '{}': unknown operation '{}'",
                    key, operation
                ));
            }
            check_client_error(key, *code)?;
        }
        Ok(())
    }
}

fn check_client_error(name: &str, code: u16) -> Result<(), String> {
    if (400..500).contains(&code) {
        Ok(())
    } else {
        Err(format!("{} must be a 4xx status, got {}", name, code))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_404() {
        let policy = StatusPolicy::default();
        assert_eq!(policy.not_found("menu-item", Operation::Get), StatusCode::NOT_FOUND);
        assert_eq!(policy.not_found("branch", Operation::Delete), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_override_applies_to_one_operation() {
        let policy = StatusPolicy::default().with_override("branch", Operation::Delete, 400);
        assert_eq!(policy.not_found("branch", Operation::Delete), StatusCode::BAD_REQUEST);
        assert_eq!(policy.not_found("branch", Operation::Get), StatusCode::NOT_FOUND);
        assert_eq!(policy.not_found("order", Operation::Delete), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_legacy_mixture() {
        let policy = StatusPolicy::legacy();
        assert_eq!(policy.not_found("user", Operation::Update), StatusCode::BAD_REQUEST);
        assert_eq!(policy.not_found("restaurants", Operation::Delete), StatusCode::BAD_REQUEST);
        assert_eq!(policy.not_found("order", Operation::Delete), StatusCode::NOT_FOUND);
        assert_eq!(policy.not_found("branch", Operation::Get), StatusCode::NOT_FOUND);
        assert!(policy.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_non_client_errors() {
        let policy = StatusPolicy {
            default: 500,
            overrides: BTreeMap::new(),
        };
        assert!(policy.validate().is_err());

        let policy = StatusPolicy::default().with_override("branch", Operation::Get, 302);
        assert!(policy.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_malformed_keys() {
        let mut policy = StatusPolicy::default();
        policy.overrides.insert("branch".to_string(), 400);
        assert!(policy.validate().is_err());

        let mut policy = StatusPolicy::default();
        policy.overrides.insert("branch.list".to_string(), 400);
        assert!(policy.validate().is_err());
    }

    #[test]
    fn test_deserialize() {
        let policy: StatusPolicy =
            serde_json::from_str(r#"{"overrides": {"branch.delete": 400}}"#).unwrap();
        assert_eq!(policy.default, 404);
        assert_eq!(policy.not_found("branch", Operation::Delete), StatusCode::BAD_REQUEST);
    }
}
