//! Configuration module
//!
//! Declarative input of the index builder. Documents are JSON, parsed with
//! `serde_json`, or assembled with [`KontrolleConfigBuilder`].

mod builder;
mod types;

pub use builder::KontrolleConfigBuilder;
pub use types::{
    AccessSpec, ActionSpec, FeatureSpec, FeaturesConfig, GroupFeatures, KontrolleConfig,
    PermissionSpec, PermissionsConfig, RoleFeatures, RolesConfig,
};
