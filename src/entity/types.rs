//! Role, permission and feature value types
//!
//! Entities are immutable once built. Every constructor validates its input
//! and fails with a configuration error instead of producing a half-formed
//! value.

use indexmap::IndexSet;
use serde::Serialize;

use super::access::{Access, Maturity};
use crate::error::{AuthzError, Result};
use crate::naming::encode;

/// A named role
///
/// Roles carry no behaviour beyond their identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Role {
    name: String,
}

impl Role {
    pub fn new(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        if name.is_empty() {
            return Err(AuthzError::EmptyRoleName);
        }
        Ok(Self { name })
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// The action argument of a permission check
///
/// `List` exists for callers that pass several candidate actions to a
/// single-action check; only its first element is probed. Use
/// [`FlatIndex::can_any_action`](crate::FlatIndex::can_any_action) or
/// [`FlatIndex::can_all_actions`](crate::FlatIndex::can_all_actions) to test
/// every listed action.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Action {
    Single(String),
    List(Vec<String>),
}

impl Action {
    /// The action actually tested against a permission
    pub fn probe(&self) -> Option<&str> {
        match self {
            Action::Single(action) => Some(action.as_str()),
            Action::List(actions) => actions.first().map(String::as_str),
        }
    }
}

impl From<&str> for Action {
    fn from(action: &str) -> Self {
        Action::Single(action.to_string())
    }
}

impl From<String> for Action {
    fn from(action: String) -> Self {
        Action::Single(action)
    }
}

impl From<Vec<String>> for Action {
    fn from(actions: Vec<String>) -> Self {
        Action::List(actions)
    }
}

impl From<Vec<&str>> for Action {
    fn from(actions: Vec<&str>) -> Self {
        Action::List(actions.into_iter().map(str::to_string).collect())
    }
}

impl From<&[&str]> for Action {
    fn from(actions: &[&str]) -> Self {
        Action::List(actions.iter().map(|a| a.to_string()).collect())
    }
}

/// A set of actions granted on one `(group, resource)` pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Permission {
    name: String,
    group: String,
    resource: String,
    actions: IndexSet<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    version: Option<String>,
}

impl Permission {
    /// Creates a permission indexed under `encode(group, resource, delimiter)`
    ///
    /// # Errors
    ///
    /// Fails when the composite name cannot be encoded or when no non-empty
    /// action is given.
    ///
    /// # Examples
    ///
    /// ```
    /// use kontrolle::Permission;
    ///
    /// let permission = Permission::new("users", "manage", ["create", "read"], None, ":").unwrap();
    /// assert_eq!(permission.name(), "users:manage");
    /// assert!(permission.matches("users", "manage", &"read".into()));
    /// assert!(!permission.matches("users", "manage", &"delete".into()));
    /// ```
    pub fn new<I, A>(
        group: &str,
        resource: &str,
        actions: I,
        version: Option<String>,
        delimiter: &str,
    ) -> Result<Self>
    where
        I: IntoIterator<Item = A>,
        A: Into<String>,
    {
        let name = encode(group, resource, delimiter)?;
        let actions: IndexSet<String> = actions.into_iter().map(Into::into).collect();

        if actions.is_empty() || actions.iter().any(String::is_empty) {
            return Err(AuthzError::EmptyActions { name });
        }

        Ok(Self {
            name,
            group: group.to_string(),
            resource: resource.to_string(),
            actions,
            version,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn group(&self) -> &str {
        &self.group
    }

    pub fn resource(&self) -> &str {
        &self.resource
    }

    pub fn actions(&self) -> &IndexSet<String> {
        &self.actions
    }

    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    /// True when `action` is in this permission's action set
    pub fn has_action(&self, action: &str) -> bool {
        self.actions.contains(action)
    }

    /// Checks group and resource for equality and the action for membership
    ///
    /// There is no implicit wildcard: `"*"` only matches when `"*"` itself
    /// was granted.
    pub fn matches(&self, group: &str, resource: &str, action: &Action) -> bool {
        if self.group != group || self.resource != resource {
            return false;
        }

        action.probe().is_some_and(|probe| self.has_action(probe))
    }

    /// Counts how many of `actions` this permission grants
    pub fn matches_any<S: AsRef<str>>(&self, actions: &[S]) -> usize {
        actions
            .iter()
            .filter(|action| self.has_action(action.as_ref()))
            .count()
    }
}

/// An access-flag capability on one `(group, resource)` pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Feature {
    name: String,
    group: String,
    resource: String,
    access: Access,
    #[serde(skip_serializing_if = "Option::is_none")]
    version: Option<String>,
}

impl Feature {
    pub fn new(
        group: &str,
        resource: &str,
        access: Access,
        version: Option<String>,
        delimiter: &str,
    ) -> Result<Self> {
        let name = encode(group, resource, delimiter)?;

        Ok(Self {
            name,
            group: group.to_string(),
            resource: resource.to_string(),
            access,
            version,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn group(&self) -> &str {
        &self.group
    }

    pub fn resource(&self) -> &str {
        &self.resource
    }

    pub fn access(&self) -> Access {
        self.access
    }

    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    pub fn maturity(&self) -> Maturity {
        Maturity::from_version(self.version.as_deref())
    }

    /// Checks group and resource for equality and `required` for containment
    ///
    /// Access is compared with `held & required == required`. A numeric
    /// `held >= required` comparison would accept `DELETE` for a required
    /// `CREATE | READ`; callers relying on that ordering must request the
    /// exact flags they need.
    pub fn matches(&self, group: &str, resource: &str, required: Access) -> bool {
        self.group == group && self.resource == resource && self.access.grants(required)
    }
}
