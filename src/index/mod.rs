//! # Index Module
//!
//! Builds the queryable [`FlatIndex`] from a [`KontrolleConfig`] and answers
//! permission, role and feature questions against it.
//!
//! ## Lifecycle
//!
//! An index is built once and never mutated by queries. Re-initialization
//! builds a new index and replaces the old one wholesale, see
//! [`SharedIndex`].
//!
//! ## Example
//!
//! ```
//! use kontrolle::{FlatIndex, KontrolleConfig};
//!
//! let config = KontrolleConfig::from_json_str(r#"{
//!     "roles": ["admin"],
//!     "permissions": { "users": { "manage": { "action": ["create", "read"] } } }
//! }"#).unwrap();
//!
//! let index = FlatIndex::init(&config).unwrap();
//! assert!(index.can("users", "manage", "create"));
//! assert!(!index.can("users", "manage", "delete"));
//! ```

mod query;
mod shared;
pub mod transform;

pub use query::Query;
pub use shared::SharedIndex;
pub use transform::Registration;

use indexmap::IndexMap;
use tracing::{debug, warn};

use crate::config::{FeaturesConfig, KontrolleConfig};
use crate::entity::{Feature, Permission, Role};
use crate::error::{AuthzError, Result};

/// Flat, read-only lookup structure produced from a configuration
#[derive(Debug, Clone, Default)]
pub struct FlatIndex {
    delimiter: String,
    roles: IndexMap<String, Role>,
    permissions: IndexMap<String, Permission>,
    features: IndexMap<String, Feature>,
    role_features: IndexMap<String, Vec<String>>,
}

impl FlatIndex {
    /// Builds an index from `config`
    ///
    /// # Errors
    ///
    /// Returns [`AuthzError::RolesRequired`] when no role is declared, and a
    /// configuration error for any malformed role, permission or feature.
    /// Permissions and features are optional.
    pub fn init(config: &KontrolleConfig) -> Result<Self> {
        if config.delimiter.is_empty() {
            return Err(AuthzError::EmptyDelimiter);
        }
        if config.roles.is_empty() {
            return Err(AuthzError::RolesRequired);
        }

        let delimiter = config.delimiter.clone();
        let roles = transform::build_roles(&config.roles)?;

        let permissions = match &config.permissions {
            Some(data) => transform::build_permissions(data, &delimiter)?,
            None => IndexMap::new(),
        };

        let (features, role_features) = match &config.features {
            Some(FeaturesConfig::ByGroup(data)) => {
                (transform::build_features(data, &delimiter)?, IndexMap::new())
            }
            Some(FeaturesConfig::ByRole(data)) => {
                (IndexMap::new(), transform::build_role_features(data, &delimiter)?)
            }
            None => (IndexMap::new(), IndexMap::new()),
        };

        for role in role_features.keys() {
            if !roles.contains_key(role) {
                warn!(role = %role, "features assigned to an undeclared role");
            }
        }

        debug!(
            roles = roles.len(),
            permissions = permissions.len(),
            features = features.len(),
            role_features = role_features.len(),
            "index built"
        );

        Ok(Self {
            delimiter,
            roles,
            permissions,
            features,
            role_features,
        })
    }

    pub fn delimiter(&self) -> &str {
        &self.delimiter
    }

    pub fn roles(&self) -> &IndexMap<String, Role> {
        &self.roles
    }

    pub fn permissions(&self) -> &IndexMap<String, Permission> {
        &self.permissions
    }

    pub fn features(&self) -> &IndexMap<String, Feature> {
        &self.features
    }

    /// `role -> [composite names]` from the role-list feature layout
    pub fn role_feature_lists(&self) -> &IndexMap<String, Vec<String>> {
        &self.role_features
    }
}
