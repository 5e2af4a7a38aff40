//! Configuration to flat-map transformation
//!
//! Each builder walks its configuration section in declaration order and
//! produces a map keyed by role name or composite name. Collision handling:
//!
//! | Section | Same key seen again |
//! |---------|---------------------|
//! | roles | last write wins |
//! | permissions | skipped if the action set is identical, otherwise overwrites |
//! | features (group map) | larger access wins, then the more mature version, then the first |
//! | features (role lists) | appended, no collision handling |

use indexmap::IndexMap;
use tracing::{debug, warn};

use crate::config::{GroupFeatures, PermissionsConfig, RoleFeatures, RolesConfig};
use crate::entity::{Feature, Permission, Role};
use crate::error::Result;
use crate::naming::encode;

/// Outcome of adding one entry to an index
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Registration {
    Inserted,
    Overwritten,
    Skipped,
}

/// Builds `name -> Role`; repeated names overwrite silently
pub fn build_roles(data: &RolesConfig) -> Result<IndexMap<String, Role>> {
    let mut roles = IndexMap::new();
    for name in data.names() {
        let role = Role::new(name)?;
        roles.insert(role.name().to_string(), role);
    }
    Ok(roles)
}

/// Builds `composite name -> Permission`
pub fn build_permissions(
    data: &PermissionsConfig,
    delimiter: &str,
) -> Result<IndexMap<String, Permission>> {
    let mut permissions = IndexMap::new();

    for (group, resources) in data {
        for (resource, spec) in resources {
            let permission = Permission::new(
                group,
                resource,
                spec.action.values(),
                spec.version.clone(),
                delimiter,
            )?;
            index_permission(&mut permissions, permission);
        }
    }

    debug!(count = permissions.len(), "permissions indexed");
    Ok(permissions)
}

/// Adds one permission, applying the duplicate policy
///
/// An entry whose action set equals the one already stored under the same
/// composite name is skipped; any other entry replaces the stored one.
pub fn index_permission(
    permissions: &mut IndexMap<String, Permission>,
    permission: Permission,
) -> Registration {
    match permissions.get(permission.name()) {
        Some(existing) if existing.actions() == permission.actions() => {
            debug!(name = permission.name(), "identical permission skipped");
            Registration::Skipped
        }
        Some(existing) => {
            warn!(
                name = permission.name(),
                previous_group = existing.group(),
                previous_resource = existing.resource(),
                "permission overwritten by a later declaration"
            );
            permissions.insert(permission.name().to_string(), permission);
            Registration::Overwritten
        }
        None => {
            permissions.insert(permission.name().to_string(), permission);
            Registration::Inserted
        }
    }
}

/// Builds `composite name -> Feature` from the group-map layout
pub fn build_features(data: &GroupFeatures, delimiter: &str) -> Result<IndexMap<String, Feature>> {
    let mut features = IndexMap::new();

    for (group, resources) in data {
        for (resource, spec) in resources {
            let name = encode(group, resource, delimiter)?;
            let access = spec.access.resolve(&name)?;
            let feature = Feature::new(group, resource, access, spec.version.clone(), delimiter)?;
            index_feature(&mut features, feature);
        }
    }

    debug!(count = features.len(), "features indexed");
    Ok(features)
}

/// Adds one feature, keeping the strongest declaration per composite name
pub fn index_feature(features: &mut IndexMap<String, Feature>, feature: Feature) -> Registration {
    let Some(existing) = features.get(feature.name()) else {
        features.insert(feature.name().to_string(), feature);
        return Registration::Inserted;
    };

    let incoming = (feature.access().bits(), feature.maturity());
    let current = (existing.access().bits(), existing.maturity());

    if incoming > current {
        debug!(
            name = feature.name(),
            "feature replaced by a declaration with more access"
        );
        features.insert(feature.name().to_string(), feature);
        Registration::Overwritten
    } else {
        debug!(name = feature.name(), "weaker feature declaration discarded");
        Registration::Skipped
    }
}

/// Flattens `role -> group -> [resources]` into `role -> [composite names]`
pub fn build_role_features(
    data: &RoleFeatures,
    delimiter: &str,
) -> Result<IndexMap<String, Vec<String>>> {
    let mut assigned = IndexMap::with_capacity(data.len());

    for (role, groups) in data {
        let mut names = Vec::new();
        for (group, resources) in groups {
            for resource in resources {
                names.push(encode(group, resource, delimiter)?);
            }
        }
        assigned.insert(role.clone(), names);
    }

    Ok(assigned)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ActionSpec, PermissionSpec};
    use crate::entity::Access;
    use crate::error::AuthzError;
    use serde_json::json;

    fn permission(group: &str, resource: &str, actions: &[&str]) -> Permission {
        Permission::new(group, resource, actions.iter().copied(), None, ":").unwrap()
    }

    fn feature(group: &str, resource: &str, access: Access, version: Option<&str>) -> Feature {
        Feature::new(group, resource, access, version.map(str::to_string), ":").unwrap()
    }

    #[test]
    fn test_build_roles_last_write_wins() {
        let roles = build_roles(&RolesConfig::List(vec![
            "admin".into(),
            "user".into(),
            "admin".into(),
        ]))
        .unwrap();

        assert_eq!(roles.len(), 2);
        assert_eq!(roles.keys().collect::<Vec<_>>(), vec!["admin", "user"]);
    }

    #[test]
    fn test_build_roles_from_map() {
        let data: RolesConfig =
            serde_json::from_value(json!({ "ADMIN": "admin", "SUPER": "admin" })).unwrap();
        let roles = build_roles(&data).unwrap();
        assert_eq!(roles.len(), 1);
        assert!(roles.contains_key("admin"));
    }

    #[test]
    fn test_build_roles_rejects_empty_name() {
        let result = build_roles(&RolesConfig::List(vec!["".into()]));
        assert!(matches!(result, Err(AuthzError::EmptyRoleName)));
    }

    #[test]
    fn test_build_permissions() {
        let mut resources = IndexMap::new();
        resources.insert(
            "manage".to_string(),
            PermissionSpec {
                action: ActionSpec::Many(vec!["create".into(), "read".into()]),
                version: None,
            },
        );
        resources.insert(
            "licence".to_string(),
            PermissionSpec {
                action: ActionSpec::One("view".into()),
                version: Some("beta".into()),
            },
        );
        let mut data = IndexMap::new();
        data.insert("users".to_string(), resources);

        let permissions = build_permissions(&data, ":").unwrap();
        assert_eq!(permissions.keys().collect::<Vec<_>>(), vec!["users:manage", "users:licence"]);
        assert!(permissions["users:licence"].has_action("view"));
        assert_eq!(permissions["users:licence"].version(), Some("beta"));
    }

    #[test]
    fn test_index_permission_skips_identical_actions() {
        let mut permissions = IndexMap::new();
        let first = permission("a:b", "c", &["read", "update"]);
        let second = permission("a", "b:c", &["update", "read"]);
        assert_eq!(first.name(), second.name());

        assert_eq!(index_permission(&mut permissions, first), Registration::Inserted);
        assert_eq!(index_permission(&mut permissions, second), Registration::Skipped);
        assert_eq!(permissions["a:b:c"].group(), "a:b");
    }

    #[test]
    fn test_index_permission_overwrites_different_actions() {
        let mut permissions = IndexMap::new();
        index_permission(&mut permissions, permission("a:b", "c", &["read"]));
        let outcome = index_permission(&mut permissions, permission("a", "b:c", &["delete"]));

        assert_eq!(outcome, Registration::Overwritten);
        assert_eq!(permissions.len(), 1);
        assert_eq!(permissions["a:b:c"].group(), "a");
        assert!(permissions["a:b:c"].has_action("delete"));
    }

    #[test]
    fn test_index_feature_keeps_larger_access() {
        let mut features = IndexMap::new();
        index_feature(&mut features, feature("a:b", "c", Access::READ, None));
        let outcome = index_feature(&mut features, feature("a", "b:c", Access::ALL, None));
        assert_eq!(outcome, Registration::Overwritten);
        assert_eq!(features["a:b:c"].access(), Access::ALL);

        let outcome = index_feature(&mut features, feature("a:b", "c", Access::CREATE, None));
        assert_eq!(outcome, Registration::Skipped);
        assert_eq!(features["a:b:c"].access(), Access::ALL);
    }

    #[test]
    fn test_index_feature_prefers_mature_version_on_equal_access() {
        let mut features = IndexMap::new();
        index_feature(&mut features, feature("a:b", "c", Access::READ, Some("alpha")));
        let outcome = index_feature(&mut features, feature("a", "b:c", Access::READ, Some("beta")));
        assert_eq!(outcome, Registration::Overwritten);
        assert_eq!(features["a:b:c"].version(), Some("beta"));

        let outcome = index_feature(&mut features, feature("a:b", "c", Access::READ, Some("beta")));
        assert_eq!(outcome, Registration::Skipped);
        assert_eq!(features["a:b:c"].group(), "a");
    }

    #[test]
    fn test_build_features_invalid_access() {
        let data: GroupFeatures =
            serde_json::from_value(json!({ "billing": { "invoices": { "access": "execute" } } }))
                .unwrap();
        let result = build_features(&data, ":");
        assert!(matches!(result, Err(AuthzError::InvalidAccess { .. })));
    }

    #[test]
    fn test_build_role_features() {
        let data: RoleFeatures = serde_json::from_value(json!({
            "admin": { "billing": ["invoices", "receipts"], "users": ["manage"] },
            "user": { "billing": ["invoices"] }
        }))
        .unwrap();

        let assigned = build_role_features(&data, ":").unwrap();
        assert_eq!(
            assigned["admin"],
            vec!["billing:invoices", "billing:receipts", "users:manage"]
        );
        assert_eq!(assigned["user"], vec!["billing:invoices"]);
    }
}
