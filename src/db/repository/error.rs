//! Error types for repository operations.
//!
//! Repository errors carry structured context (operation, entity, id) so
//! callers and logs can pinpoint the failing access without string parsing.

use std::fmt;

/// Result type for repository operations
pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Structured context for repository errors.
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    /// The operation being performed (e.g., "fetch_slot_policy")
    pub operation: Option<String>,
    /// The entity type involved (e.g., "slot_policy", "date_exception")
    pub entity: Option<String>,
    /// The entity ID if applicable
    pub entity_id: Option<String>,
    /// Additional details about the error
    pub details: Option<String>,
    /// Whether this error is retryable
    pub retryable: bool,
}

impl ErrorContext {
    /// Create a new error context with an operation name.
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            operation: Some(operation.into()),
            ..Default::default()
        }
    }

    /// Set the entity type.
    pub fn with_entity(mut self, entity: impl Into<String>) -> Self {
        self.entity = Some(entity.into());
        self
    }

    /// Set the entity ID.
    pub fn with_entity_id(mut self, id: impl ToString) -> Self {
        self.entity_id = Some(id.to_string());
        self
    }

    /// Set additional details.
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Mark this error as retryable.
    pub fn retryable(mut self) -> Self {
        self.retryable = true;
        self
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        if let Some(ref op) = self.operation {
            parts.push(format!("operation={}", op));
        }
        if let Some(ref entity) = self.entity {
            parts.push(format!("entity={}", entity));
        }
        if let Some(ref id) = self.entity_id {
            parts.push(format!("id={}", id));
        }
        if let Some(ref details) = self.details {
            parts.push(format!("details={}", details));
        }
        if self.retryable {
            parts.push("retryable=true".to_string());
        }
        write!(f, "[{}]", parts.join(", "))
    }
}

/// Error type for repository operations
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    /// Requested entity was not found.
    #[error("Not found: {message} {context}")]
    NotFound {
        message: String,
        context: ErrorContext,
    },

    /// Input validation failed before the operation ran.
    #[error("Validation error: {message} {context}")]
    Validation {
        message: String,
        context: ErrorContext,
    },

    /// Optimistic capacity check lost against a concurrent writer.
    /// Always retryable.
    #[error("Conflict: {message} {context}")]
    Conflict {
        message: String,
        context: ErrorContext,
    },

    /// Query execution errors.
    #[error("Query error: {message} {context}")]
    Query {
        message: String,
        context: ErrorContext,
    },

    /// Transaction error (a multi-step mutation could not be applied as one
    /// unit; prior state remains authoritative).
    #[error("Transaction error: {message} {context}")]
    Transaction {
        message: String,
        context: ErrorContext,
    },

    /// Configuration or initialization error.
    #[error("Configuration error: {message} {context}")]
    Configuration {
        message: String,
        context: ErrorContext,
    },

    /// Internal/unexpected errors.
    #[error("Internal error: {message} {context}")]
    Internal {
        message: String,
        context: ErrorContext,
    },
}

impl RepositoryError {
    /// Create a not-found error with context.
    pub fn not_found(message: impl Into<String>, context: ErrorContext) -> Self {
        Self::NotFound {
            message: message.into(),
            context,
        }
    }

    /// Create a validation error with context.
    pub fn validation(message: impl Into<String>, context: ErrorContext) -> Self {
        Self::Validation {
            message: message.into(),
            context,
        }
    }

    /// Create a conflict error; conflicts are always retryable.
    pub fn conflict(message: impl Into<String>, context: ErrorContext) -> Self {
        Self::Conflict {
            message: message.into(),
            context: context.retryable(),
        }
    }

    /// Create a query error with context.
    pub fn query(message: impl Into<String>, context: ErrorContext) -> Self {
        Self::Query {
            message: message.into(),
            context,
        }
    }

    /// Create a transaction error with context.
    pub fn transaction(message: impl Into<String>, context: ErrorContext) -> Self {
        Self::Transaction {
            message: message.into(),
            context,
        }
    }

    /// Create a configuration error with context.
    pub fn configuration(message: impl Into<String>, context: ErrorContext) -> Self {
        Self::Configuration {
            message: message.into(),
            context,
        }
    }

    /// Create an internal error with context.
    pub fn internal(message: impl Into<String>, context: ErrorContext) -> Self {
        Self::Internal {
            message: message.into(),
            context,
        }
    }

    /// The structured context attached to this error.
    pub fn context(&self) -> &ErrorContext {
        match self {
            Self::NotFound { context, .. }
            | Self::Validation { context, .. }
            | Self::Conflict { context, .. }
            | Self::Query { context, .. }
            | Self::Transaction { context, .. }
            | Self::Configuration { context, .. }
            | Self::Internal { context, .. } => context,
        }
    }

    /// Whether the caller may retry the failed operation.
    pub fn is_retryable(&self) -> bool {
        self.context().retryable
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict { .. })
    }
}

impl From<crate::models::InvalidField> for RepositoryError {
    fn from(err: crate::models::InvalidField) -> Self {
        let field = err.field;
        RepositoryError::validation(
            err.to_string(),
            ErrorContext::new("validate_input").with_details(field),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn context_display_includes_parts() {
        let context = ErrorContext::new("fetch_slot_policy")
            .with_entity("slot_policy")
            .with_entity_id(7)
            .with_details("missing row");
        let rendered = context.to_string();
        assert!(rendered.contains("operation=fetch_slot_policy"));
        assert!(rendered.contains("entity=slot_policy"));
        assert!(rendered.contains("id=7"));
        assert!(rendered.contains("details=missing row"));
    }

    #[test]
    fn conflict_is_always_retryable() {
        let err = RepositoryError::conflict("capacity changed", ErrorContext::new("try_reserve"));
        assert!(err.is_retryable());
        assert!(err.is_conflict());
    }

    #[test]
    fn not_found_is_not_retryable() {
        let err = RepositoryError::not_found(
            "service version 9 not found",
            ErrorContext::new("fetch_service_version").with_entity_id(9),
        );
        assert!(!err.is_retryable());
        assert!(err.is_not_found());
    }

    #[test]
    fn invalid_field_converts_to_validation() {
        let field_err = crate::models::InvalidField::new("party_size", "must be positive");
        let err: RepositoryError = field_err.into();
        assert!(matches!(err, RepositoryError::Validation { .. }));
        assert!(err.to_string().contains("party_size"));
    }
}
