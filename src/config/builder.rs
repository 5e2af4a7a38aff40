//! Programmatic construction of [`KontrolleConfig`]

use indexmap::IndexMap;
use tracing::warn;

use super::types::{
    AccessSpec, ActionSpec, FeatureSpec, FeaturesConfig, KontrolleConfig, PermissionSpec,
    RolesConfig,
};

/// Builder for [`KontrolleConfig`]
///
/// Feature entries come in two layouts. Adding an entry of one layout after
/// entries of the other discards the earlier ones with a warning.
///
/// # Examples
///
/// ```
/// use kontrolle::{Access, KontrolleConfig};
///
/// let config = KontrolleConfig::builder()
///     .role("admin")
///     .permission("users", "manage", ["create", "read"], None)
///     .feature("billing", "invoices", Access::READ, Some("beta"))
///     .build();
///
/// assert_eq!(config.roles.names(), vec!["admin"]);
/// assert!(config.permissions.is_some());
/// ```
#[derive(Debug, Clone, Default)]
pub struct KontrolleConfigBuilder {
    config: KontrolleConfig,
}

impl KontrolleConfig {
    pub fn builder() -> KontrolleConfigBuilder {
        KontrolleConfigBuilder::default()
    }
}

impl KontrolleConfigBuilder {
    /// Adds a role to a list-shaped role declaration
    pub fn role(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        match &mut self.config.roles {
            RolesConfig::List(names) => names.push(name),
            RolesConfig::Map(aliases) => {
                aliases.insert(name.clone(), name);
            }
        }
        self
    }

    /// Adds a role under an alias, turning the declaration into a map
    pub fn role_alias(mut self, alias: impl Into<String>, name: impl Into<String>) -> Self {
        if let RolesConfig::List(names) = &self.config.roles {
            let aliases = names.iter().map(|n| (n.clone(), n.clone())).collect();
            self.config.roles = RolesConfig::Map(aliases);
        }
        if let RolesConfig::Map(aliases) = &mut self.config.roles {
            aliases.insert(alias.into(), name.into());
        }
        self
    }

    pub fn permission<I, A>(
        mut self,
        group: impl Into<String>,
        resource: impl Into<String>,
        actions: I,
        version: Option<&str>,
    ) -> Self
    where
        I: IntoIterator<Item = A>,
        A: Into<String>,
    {
        let spec = PermissionSpec {
            action: ActionSpec::Many(actions.into_iter().map(Into::into).collect()),
            version: version.map(str::to_string),
        };

        self.config
            .permissions
            .get_or_insert_with(IndexMap::new)
            .entry(group.into())
            .or_default()
            .insert(resource.into(), spec);
        self
    }

    /// Adds a feature to the `group -> resource -> access` layout
    pub fn feature(
        mut self,
        group: impl Into<String>,
        resource: impl Into<String>,
        access: impl Into<AccessSpec>,
        version: Option<&str>,
    ) -> Self {
        let spec = FeatureSpec {
            access: access.into(),
            version: version.map(str::to_string),
        };

        if let Some(FeaturesConfig::ByRole(roles)) = &self.config.features {
            warn!(
                discarded = roles.len(),
                "switching feature layout to group map, dropping role feature lists"
            );
            self.config.features = None;
        }

        let features = self
            .config
            .features
            .get_or_insert_with(|| FeaturesConfig::ByGroup(IndexMap::new()));
        if let FeaturesConfig::ByGroup(groups) = features {
            groups
                .entry(group.into())
                .or_default()
                .insert(resource.into(), spec);
        }
        self
    }

    /// Assigns a resource to a role in the `role -> group -> [resources]` layout
    pub fn role_feature(
        mut self,
        role: impl Into<String>,
        group: impl Into<String>,
        resource: impl Into<String>,
    ) -> Self {
        if let Some(FeaturesConfig::ByGroup(groups)) = &self.config.features {
            warn!(
                discarded = groups.len(),
                "switching feature layout to role lists, dropping group feature map"
            );
            self.config.features = None;
        }

        let features = self
            .config
            .features
            .get_or_insert_with(|| FeaturesConfig::ByRole(IndexMap::new()));
        if let FeaturesConfig::ByRole(roles) = features {
            roles
                .entry(role.into())
                .or_default()
                .entry(group.into())
                .or_default()
                .push(resource.into());
        }
        self
    }

    pub fn delimiter(mut self, delimiter: impl Into<String>) -> Self {
        self.config.delimiter = delimiter.into();
        self
    }

    pub fn build(self) -> KontrolleConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::Access;

    #[test]
    fn test_builder_roles() {
        let config = KontrolleConfig::builder().role("admin").role("user").build();
        assert_eq!(config.roles, RolesConfig::List(vec!["admin".into(), "user".into()]));
    }

    #[test]
    fn test_builder_role_alias_converts_list() {
        let config = KontrolleConfig::builder()
            .role("user")
            .role_alias("ADMIN", "admin")
            .role("guest")
            .build();

        assert!(matches!(config.roles, RolesConfig::Map(_)));
        assert_eq!(config.roles.names(), vec!["user", "admin", "guest"]);
    }

    #[test]
    fn test_builder_permissions_group_by_group() {
        let config = KontrolleConfig::builder()
            .role("admin")
            .permission("users", "manage", ["create"], None)
            .permission("users", "licence", ["view"], Some("alpha"))
            .build();

        let permissions = config.permissions.unwrap();
        assert_eq!(permissions.len(), 1);
        assert_eq!(permissions["users"].len(), 2);
        assert_eq!(permissions["users"]["licence"].version.as_deref(), Some("alpha"));
    }

    #[test]
    fn test_builder_feature_layout_switch() {
        let config = KontrolleConfig::builder()
            .role("admin")
            .role_feature("admin", "billing", "invoices")
            .feature("billing", "invoices", Access::READ, None)
            .build();

        match config.features {
            Some(FeaturesConfig::ByGroup(groups)) => {
                assert_eq!(groups["billing"]["invoices"].access, AccessSpec::Bits(4));
            }
            other => panic!("expected group features, got {other:?}"),
        }
    }

    #[test]
    fn test_builder_delimiter() {
        let config = KontrolleConfig::builder().role("admin").delimiter("/").build();
        assert_eq!(config.delimiter, "/");
    }
}
