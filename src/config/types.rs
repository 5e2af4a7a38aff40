//! Configuration document types
//!
//! All nested maps are [`IndexMap`]s: entries are visited in declaration
//! order, which the collision policies of the index builder depend on.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::entity::Access;
use crate::error::{AuthzError, Result};
use crate::naming::DEFAULT_DELIMITER;

/// `group -> resource -> permission`
pub type PermissionsConfig = IndexMap<String, IndexMap<String, PermissionSpec>>;

/// `group -> resource -> feature`
pub type GroupFeatures = IndexMap<String, IndexMap<String, FeatureSpec>>;

/// `role -> group -> [resources]`
pub type RoleFeatures = IndexMap<String, IndexMap<String, Vec<String>>>;

fn default_delimiter() -> String {
    DEFAULT_DELIMITER.to_string()
}

/// Full engine configuration
///
/// # Examples
///
/// ```
/// use kontrolle::KontrolleConfig;
///
/// let config = KontrolleConfig::from_json_str(r#"{
///     "roles": ["admin", "user"],
///     "permissions": {
///         "users": { "manage": { "action": ["create", "read", "update"] } }
///     }
/// }"#).unwrap();
///
/// assert_eq!(config.delimiter, ":");
/// assert_eq!(config.roles.names(), vec!["admin", "user"]);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KontrolleConfig {
    #[serde(default)]
    pub roles: RolesConfig,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permissions: Option<PermissionsConfig>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub features: Option<FeaturesConfig>,

    #[serde(default = "default_delimiter")]
    pub delimiter: String,
}

impl Default for KontrolleConfig {
    fn default() -> Self {
        Self {
            roles: RolesConfig::default(),
            permissions: None,
            features: None,
            delimiter: default_delimiter(),
        }
    }
}

impl KontrolleConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_value(value: serde_json::Value) -> Result<Self> {
        Ok(serde_json::from_value(value)?)
    }

    /// Reads and parses a JSON configuration file
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| AuthzError::ConfigIo {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&raw)
    }
}

/// Roles as a plain list or as an `alias -> name` map
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RolesConfig {
    List(Vec<String>),
    Map(IndexMap<String, String>),
}

impl Default for RolesConfig {
    fn default() -> Self {
        RolesConfig::List(Vec::new())
    }
}

impl RolesConfig {
    pub fn is_empty(&self) -> bool {
        match self {
            RolesConfig::List(names) => names.is_empty(),
            RolesConfig::Map(aliases) => aliases.is_empty(),
        }
    }

    /// Role names in declaration order; map aliases are dropped
    pub fn names(&self) -> Vec<&str> {
        match self {
            RolesConfig::List(names) => names.iter().map(String::as_str).collect(),
            RolesConfig::Map(aliases) => aliases.values().map(String::as_str).collect(),
        }
    }
}

/// One action or a list of actions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ActionSpec {
    One(String),
    Many(Vec<String>),
}

impl ActionSpec {
    pub fn values(&self) -> Vec<&str> {
        match self {
            ActionSpec::One(action) => vec![action.as_str()],
            ActionSpec::Many(actions) => actions.iter().map(String::as_str).collect(),
        }
    }
}

/// Permission entry; accepts `action` or `actions` as the key
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionSpec {
    #[serde(alias = "actions")]
    pub action: ActionSpec,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

/// Access flags as a raw number, a flag name, or a list of flag names
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AccessSpec {
    Bits(u32),
    Name(String),
    Names(Vec<String>),
}

impl AccessSpec {
    /// Resolves the declared value into flags; `name` is only used in error messages
    pub fn resolve(&self, name: &str) -> Result<Access> {
        match self {
            AccessSpec::Bits(bits) => {
                Access::from_bits(*bits).ok_or_else(|| AuthzError::InvalidAccess {
                    name: name.to_string(),
                    reason: format!("{bits:#b} sets undefined access bits"),
                })
            }
            AccessSpec::Name(flag) => Self::named(name, flag),
            AccessSpec::Names(flags) => {
                if flags.is_empty() {
                    return Err(AuthzError::InvalidAccess {
                        name: name.to_string(),
                        reason: "no access flags listed".to_string(),
                    });
                }
                flags.iter().try_fold(Access::empty(), |acc, flag| {
                    Self::named(name, flag).map(|access| acc | access)
                })
            }
        }
    }

    fn named(name: &str, flag: &str) -> Result<Access> {
        Access::from_config_name(flag).ok_or_else(|| AuthzError::InvalidAccess {
            name: name.to_string(),
            reason: format!("unknown access flag '{flag}'"),
        })
    }
}

impl From<Access> for AccessSpec {
    fn from(access: Access) -> Self {
        AccessSpec::Bits(access.bits())
    }
}

/// Feature entry of the bitmask variant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureSpec {
    pub access: AccessSpec,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

/// Feature declarations, in either of the two supported layouts
///
/// `ByRole` is tried first: serde accepts a sequence for a struct, so a
/// resource list would otherwise parse as a positional `FeatureSpec`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FeaturesConfig {
    /// `role -> group -> [resources]`
    ByRole(RoleFeatures),
    /// `group -> resource -> { access, version }`
    ByGroup(GroupFeatures),
}
