//! Error types for the authorization engine
//!
//! Errors fall into three classes:
//! - configuration errors abort index or registry construction
//! - lookup errors describe unknown rule names or composite keys; queries
//!   report them and answer `false` instead of returning them
//! - predicate errors describe a failing user predicate; quorum evaluation
//!   reports them and counts the rule as unsatisfied

use thiserror::Error;

/// Result type alias for authorization operations
pub type Result<T> = std::result::Result<T, AuthzError>;

/// Comprehensive error types for authorization operations
#[derive(Error, Debug)]
pub enum AuthzError {
    /// Group part of a composite name is missing
    #[error("group cannot be empty")]
    EmptyGroup,

    /// Resource part of a composite name is missing
    #[error("resource cannot be empty")]
    EmptyResource,

    /// Delimiter is missing
    #[error("delimiter cannot be empty")]
    EmptyDelimiter,

    /// Composite name to decode is missing
    #[error("name cannot be empty")]
    EmptyName,

    /// Composite name does not contain the delimiter
    #[error("delimiter '{delimiter}' not found in name '{name}'")]
    DelimiterNotFound { name: String, delimiter: String },

    /// Initialization was attempted without any role
    #[error("roles required")]
    RolesRequired,

    /// Role declared with an empty name
    #[error("role name cannot be empty")]
    EmptyRoleName,

    /// Rule declared with an empty name
    #[error("rule name cannot be empty")]
    EmptyRuleName,

    /// Permission declared without a single action
    #[error("permission '{name}' must declare at least one action")]
    EmptyActions { name: String },

    /// Feature access value could not be interpreted
    #[error("invalid access for '{name}': {reason}")]
    InvalidAccess { name: String, reason: String },

    /// Configuration document could not be parsed
    #[error("failed to parse configuration: {0}")]
    ConfigParse(#[from] serde_json::Error),

    /// Configuration file could not be read
    #[error("failed to read configuration file '{path}': {source}")]
    ConfigIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Rule name is not registered
    #[error("rule '{rule}' is not defined")]
    UnknownRule { rule: String },

    /// Composite key is not indexed
    #[error("no entry indexed under '{name}'")]
    UnknownKey { name: String },

    /// User predicate failed while evaluating a rule
    #[error("predicate for rule '{rule}' failed: {reason}")]
    PredicateFailed { rule: String, reason: String },
}

impl AuthzError {
    /// True for errors raised while building an index or registry
    pub fn is_config_error(&self) -> bool {
        !self.is_lookup_error() && !self.is_predicate_error()
    }

    /// True for unknown rule names and unknown composite keys
    pub fn is_lookup_error(&self) -> bool {
        matches!(
            self,
            AuthzError::UnknownRule { .. } | AuthzError::UnknownKey { .. }
        )
    }

    /// True for failures raised inside a user predicate
    pub fn is_predicate_error(&self) -> bool {
        matches!(self, AuthzError::PredicateFailed { .. })
    }
}
