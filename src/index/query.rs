//! Read-only queries over a [`FlatIndex`]
//!
//! Queries never fail: unknown roles, keys and actions answer `false` (or
//! `None`). Malformed query input, such as an empty group, cannot match any
//! indexed entry and is answered the same way.

use tracing::debug;

use super::FlatIndex;
use crate::entity::{Access, Action, Feature, Maturity, Permission, Role};
use crate::error::AuthzError;
use crate::naming::encode;

/// One `(group, resource, action)` question for [`FlatIndex::can_any`] and
/// [`FlatIndex::can_all`]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Query {
    pub group: String,
    pub resource: String,
    pub action: Action,
}

impl Query {
    pub fn new(group: impl Into<String>, resource: impl Into<String>, action: impl Into<Action>) -> Self {
        Self {
            group: group.into(),
            resource: resource.into(),
            action: action.into(),
        }
    }
}

impl From<(&str, &str, &str)> for Query {
    fn from((group, resource, action): (&str, &str, &str)) -> Self {
        Query::new(group, resource, action)
    }
}

impl From<(&str, &str, Action)> for Query {
    fn from((group, resource, action): (&str, &str, Action)) -> Self {
        Query::new(group, resource, action)
    }
}

impl FlatIndex {
    /// Looks up a role by name
    pub fn has_role(&self, name: &str) -> Option<&Role> {
        self.roles.get(name)
    }

    /// True when at least one indexed role is named in `names`
    pub fn has_any_role<S: AsRef<str>>(&self, names: &[S]) -> bool {
        self.count_roles_in(names) > 0
    }

    /// True when the number of indexed roles named in `names` equals
    /// `names.len()`
    ///
    /// Indexed roles are counted, not requested names: a name requested
    /// twice is still only counted once. An empty request is trivially
    /// satisfied.
    pub fn has_all_roles<S: AsRef<str>>(&self, names: &[S]) -> bool {
        self.count_roles_in(names) == names.len()
    }

    fn count_roles_in<S: AsRef<str>>(&self, names: &[S]) -> usize {
        self.roles
            .values()
            .filter(|role| names.iter().any(|name| name.as_ref() == role.name()))
            .count()
    }

    /// True when any permission grants `action` on `group`/`resource`
    ///
    /// # Examples
    ///
    /// ```
    /// use kontrolle::{Action, FlatIndex, KontrolleConfig};
    ///
    /// let config = KontrolleConfig::builder()
    ///     .role("admin")
    ///     .permission("users", "manage", ["create", "read", "update"], None)
    ///     .build();
    /// let index = FlatIndex::init(&config).unwrap();
    ///
    /// assert!(index.can("users", "manage", "create"));
    /// assert!(!index.can("users", "manage", "delete"));
    /// // A list only probes its first action.
    /// assert!(index.can("users", "manage", Action::from(vec!["read", "delete"])));
    /// ```
    pub fn can(&self, group: &str, resource: &str, action: impl Into<Action>) -> bool {
        let action = action.into();
        self.permissions
            .values()
            .any(|permission| permission.matches(group, resource, &action))
    }

    /// True when at least one query is granted; stops at the first hit
    pub fn can_any<I, Q>(&self, queries: I) -> bool
    where
        I: IntoIterator<Item = Q>,
        Q: Into<Query>,
    {
        queries.into_iter().any(|query| self.can_query(&query.into()))
    }

    /// True when every query is granted; stops at the first miss
    ///
    /// An empty batch is granted.
    pub fn can_all<I, Q>(&self, queries: I) -> bool
    where
        I: IntoIterator<Item = Q>,
        Q: Into<Query>,
    {
        queries.into_iter().all(|query| self.can_query(&query.into()))
    }

    fn can_query(&self, query: &Query) -> bool {
        self.permissions
            .values()
            .any(|permission| permission.matches(&query.group, &query.resource, &query.action))
    }

    /// True when the permission at `group`/`resource` grants any of `actions`
    pub fn can_any_action<S: AsRef<str>>(&self, group: &str, resource: &str, actions: &[S]) -> bool {
        self.permission_at(group, resource)
            .is_some_and(|permission| permission.matches_any(actions) > 0)
    }

    /// True when the permission at `group`/`resource` grants all of `actions`
    ///
    /// An empty action list is granted whenever the permission exists.
    pub fn can_all_actions<S: AsRef<str>>(&self, group: &str, resource: &str, actions: &[S]) -> bool {
        self.permission_at(group, resource)
            .is_some_and(|permission| permission.matches_any(actions) == actions.len())
    }

    /// Direct lookup of the permission stored at `encode(group, resource)`
    pub fn permission_at(&self, group: &str, resource: &str) -> Option<&Permission> {
        let name = self.key(group, resource)?;
        let permission = self.permissions.get(&name);
        if permission.is_none() {
            debug!("{}", AuthzError::UnknownKey { name });
        }
        permission
    }

    /// Direct lookup of the feature stored at `encode(group, resource)`
    pub fn has_feature(&self, group: &str, resource: &str) -> Option<&Feature> {
        let name = self.key(group, resource)?;
        let feature = self.features.get(&name);
        if feature.is_none() {
            debug!("{}", AuthzError::UnknownKey { name });
        }
        feature
    }

    /// Like [`has_feature`](Self::has_feature), but only returns features at
    /// least as mature as `minimum`
    pub fn has_feature_at(&self, group: &str, resource: &str, minimum: Maturity) -> Option<&Feature> {
        self.has_feature(group, resource)
            .filter(|feature| feature.maturity() >= minimum)
    }

    /// True when the feature at `group`/`resource` holds every flag of
    /// `required`
    pub fn can_access(&self, group: &str, resource: &str, required: Access) -> bool {
        self.has_feature(group, resource)
            .is_some_and(|feature| feature.matches(group, resource, required))
    }

    /// Composite names assigned to `role` in the role-list feature layout
    pub fn role_features(&self, role: &str) -> Option<&[String]> {
        self.role_features.get(role).map(Vec::as_slice)
    }

    /// True when `role` was assigned `group`/`resource`
    pub fn role_has_feature(&self, role: &str, group: &str, resource: &str) -> bool {
        let Some(name) = self.key(group, resource) else {
            return false;
        };
        self.role_features(role)
            .is_some_and(|names| names.iter().any(|assigned| *assigned == name))
    }

    fn key(&self, group: &str, resource: &str) -> Option<String> {
        match encode(group, resource, &self.delimiter) {
            Ok(name) => Some(name),
            Err(err) => {
                debug!(group, resource, error = %err, "query key rejected");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::KontrolleConfig;
    use serde_json::json;

    fn index() -> FlatIndex {
        let config = KontrolleConfig::from_json_value(json!({
            "roles": ["admin", "user"],
            "permissions": {
                "users": {
                    "manage": { "action": ["create", "read", "update"] },
                    "licence": { "action": "view" }
                }
            },
            "features": {
                "billing": {
                    "invoices": { "access": ["read", "update"], "version": "beta" },
                    "reports": { "access": "all" }
                }
            }
        }))
        .unwrap();
        FlatIndex::init(&config).unwrap()
    }

    #[test]
    fn test_has_role() {
        let index = index();
        assert_eq!(index.has_role("admin").map(Role::name), Some("admin"));
        assert!(index.has_role("guest").is_none());
    }

    #[test]
    fn test_has_any_role() {
        let index = index();
        assert!(index.has_any_role(&["guest", "user"]));
        assert!(!index.has_any_role(&["guest"]));
        assert!(!index.has_any_role::<&str>(&[]));
    }

    #[test]
    fn test_has_all_roles() {
        let index = index();
        assert!(index.has_all_roles(&["admin", "user"]));
        assert!(!index.has_all_roles(&["admin", "guest"]));
        assert!(!index.has_all_roles(&["admin", "admin"]));
        // 0 matched entries == 0 requested names
        assert!(index.has_all_roles::<&str>(&[]));
    }

    #[test]
    fn test_can() {
        let index = index();
        assert!(index.can("users", "manage", "create"));
        assert!(!index.can("users", "manage", "delete"));
        assert!(index.can("users", "licence", "view"));
        assert!(!index.can("users", "unknown", "view"));
        assert!(!index.can("", "manage", "create"));
    }

    #[test]
    fn test_can_any() {
        let index = index();
        assert!(index.can_any([("users", "manage", "read"), ("users", "licence", "view")]));
        assert!(!index.can_any([("users", "manage", "*"), ("users", "licence", "update")]));
        assert!(!index.can_any(Vec::<Query>::new()));
    }

    #[test]
    fn test_can_all() {
        let index = index();
        assert!(index.can_all([("users", "manage", "read"), ("users", "licence", "view")]));
        assert!(!index.can_all([("users", "manage", "*"), ("users", "licence", "view")]));
        assert!(index.can_all(Vec::<Query>::new()));
    }

    #[test]
    fn test_can_any_action() {
        let index = index();
        assert!(!index.can_any_action("users", "manage", &["delete", "assign"]));
        assert!(index.can_any_action("users", "manage", &["delete", "read"]));
        assert!(!index.can_any_action("users", "missing", &["read"]));
    }

    #[test]
    fn test_can_all_actions() {
        let index = index();
        assert!(index.can_all_actions("users", "manage", &["create", "read"]));
        assert!(!index.can_all_actions("users", "manage", &["create", "delete"]));
        assert!(index.can_all_actions::<&str>("users", "manage", &[]));
        assert!(!index.can_all_actions::<&str>("users", "missing", &[]));
    }

    #[test]
    fn test_has_feature() {
        let index = index();
        let feature = index.has_feature("billing", "invoices").unwrap();
        assert_eq!(feature.access(), Access::READ | Access::UPDATE);
        assert!(index.has_feature("billing", "missing").is_none());
        assert!(index.has_feature("billing", "").is_none());
    }

    #[test]
    fn test_has_feature_at() {
        let index = index();
        assert!(index.has_feature_at("billing", "invoices", Maturity::Beta).is_some());
        assert!(index.has_feature_at("billing", "invoices", Maturity::Stable).is_none());
        assert!(index.has_feature_at("billing", "reports", Maturity::Stable).is_some());
    }

    #[test]
    fn test_can_access() {
        let index = index();
        assert!(index.can_access("billing", "invoices", Access::READ));
        assert!(!index.can_access("billing", "invoices", Access::READ | Access::DELETE));
        assert!(index.can_access("billing", "reports", Access::READ | Access::DELETE));
        assert!(!index.can_access("billing", "missing", Access::READ));
    }

    #[test]
    fn test_role_features() {
        let config = KontrolleConfig::from_json_value(json!({
            "roles": ["admin", "user"],
            "features": {
                "admin": { "billing": ["invoices", "reports"] },
                "user": { "billing": ["invoices"] }
            }
        }))
        .unwrap();
        let index = FlatIndex::init(&config).unwrap();

        assert_eq!(index.role_features("user").unwrap(), &["billing:invoices".to_string()]);
        assert!(index.role_has_feature("admin", "billing", "reports"));
        assert!(!index.role_has_feature("user", "billing", "reports"));
        assert!(!index.role_has_feature("guest", "billing", "invoices"));
        assert!(index.role_features("guest").is_none());
    }
}
