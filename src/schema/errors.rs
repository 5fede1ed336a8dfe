//! Schema error types
//!
//! Error codes:
//! - RESTO_VALIDATION_FAILED: payload violates the entity schema
//! - RESTO_EMPTY_UPDATE: update payload has no declared fields
//! - RESTO_INVALID_KEY: path key does not parse as the key type
//! - RESTO_INVALID_SCHEMA: the schema definition itself is broken

use std::fmt;

/// Schema-specific error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaErrorCode {
    /// Document violates schema
    ValidationFailed,
    /// Nothing left to update after filtering
    EmptyUpdate,
    /// Natural key malformed
    InvalidKey,
    /// Schema definition is inconsistent
    InvalidSchema,
}

impl SchemaErrorCode {
    /// Returns the string code
    pub fn code(&self) -> &'static str {
        match self {
            SchemaErrorCode::ValidationFailed => "RESTO_VALIDATION_FAILED",
            SchemaErrorCode::EmptyUpdate => "RESTO_EMPTY_UPDATE",
            SchemaErrorCode::InvalidKey => "RESTO_INVALID_KEY",
            SchemaErrorCode::InvalidSchema => "RESTO_INVALID_SCHEMA",
        }
    }

    /// Whether the client caused the error
    pub fn is_client_error(&self) -> bool {
        !matches!(self, SchemaErrorCode::InvalidSchema)
    }
}

impl fmt::Display for SchemaErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Validation failure details
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationDetails {
    /// Field path (e.g., "items[2]")
    pub field: String,
    /// Expected type or condition
    pub expected: String,
    /// Actual value or type found
    pub actual: String,
}

impl ValidationDetails {
    pub fn new(
        field: impl Into<String>,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        Self {
            field: field.into(),
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::new(field, "field to be present", "missing")
    }

    pub fn type_mismatch(
        field: impl Into<String>,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        Self::new(field, expected, actual)
    }

    pub fn null_value(field: impl Into<String>) -> Self {
        Self::new(field, "non-null value", "null")
    }
}

impl fmt::Display for ValidationDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "field '{}': expected {}, got {}",
            self.field, self.expected, self.actual
        )
    }
}

/// Schema error with full context
#[derive(Debug, Clone)]
pub struct SchemaError {
    code: SchemaErrorCode,
    message: String,
    entity: String,
    details: Option<ValidationDetails>,
}

impl SchemaError {
    /// Payload violates the schema
    pub fn validation_failed(entity: impl Into<String>, details: ValidationDetails) -> Self {
        Self {
            code: SchemaErrorCode::ValidationFailed,
            message: format!("Validation failed: {}", details),
            entity: entity.into(),
            details: Some(details),
        }
    }

    /// Update payload carried no declared field
    pub fn empty_update(entity: impl Into<String>) -> Self {
        Self {
            code: SchemaErrorCode::EmptyUpdate,
            message: "No data provided to update".into(),
            entity: entity.into(),
            details: None,
        }
    }

    /// Path key does not parse as the key type
    pub fn invalid_key(
        entity: impl Into<String>,
        key_field: impl Into<String>,
        expected: &str,
        raw: impl Into<String>,
    ) -> Self {
        let details =
            ValidationDetails::type_mismatch(key_field, expected, format!("'{}'", raw.into()));
        Self {
            code: SchemaErrorCode::InvalidKey,
            message: format!("Invalid key: {}", details),
            entity: entity.into(),
            details: Some(details),
        }
    }

    /// Schema definition is broken
    pub fn invalid_schema(entity: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            code: SchemaErrorCode::InvalidSchema,
            message: format!("Invalid schema: {}", reason.into()),
            entity: entity.into(),
            details: None,
        }
    }

    /// Returns the error code
    pub fn code(&self) -> SchemaErrorCode {
        self.code
    }

    /// Returns the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the entity kind the error refers to
    pub fn entity(&self) -> &str {
        &self.entity
    }

    /// Returns validation details if applicable
    pub fn details(&self) -> Option<&ValidationDetails> {
        self.details.as_ref()
    }
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} ({})", self.code.code(), self.message, self.entity)
    }
}

impl std::error::Error for SchemaError {}

/// Result type for schema operations
pub type SchemaResult<T> = Result<T, SchemaError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(SchemaErrorCode::ValidationFailed.code(), "RESTO_VALIDATION_FAILED");
        assert_eq!(SchemaErrorCode::EmptyUpdate.code(), "RESTO_EMPTY_UPDATE");
        assert_eq!(SchemaErrorCode::InvalidKey.code(), "RESTO_INVALID_KEY");
        assert!(!SchemaErrorCode::InvalidSchema.is_client_error());
    }

    #[test]
    fn test_validation_details_display() {
        let details = ValidationDetails::type_mismatch("price", "float", "string");
        let display = details.to_string();
        assert!(display.contains("price"));
        assert!(display.contains("float"));
        assert!(display.contains("string"));
    }

    #[test]
    fn test_error_names_field() {
        let err = SchemaError::validation_failed("order", ValidationDetails::missing_field("order_id"));
        assert!(err.message().contains("order_id"));
        assert!(err.to_string().starts_with("RESTO_VALIDATION_FAILED"));
        assert_eq!(err.entity(), "order");
    }
}
