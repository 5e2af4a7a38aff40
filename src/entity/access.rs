//! Access flags and version maturity for features

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

bitflags! {
    /// Access flags a feature can hold
    ///
    /// | Flag | Bit |
    /// |------|-----|
    /// | [`CREATE`](Self::CREATE) | `1 << 1` |
    /// | [`READ`](Self::READ) | `1 << 2` |
    /// | [`UPDATE`](Self::UPDATE) | `1 << 3` |
    /// | [`DELETE`](Self::DELETE) | `1 << 4` |
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct Access: u32 {
        const CREATE = 1 << 1;
        const READ   = 1 << 2;
        const UPDATE = 1 << 3;
        const DELETE = 1 << 4;
    }
}

impl Access {
    /// Union of every defined flag
    pub const ALL: Self = Self::CREATE
        .union(Self::READ)
        .union(Self::UPDATE)
        .union(Self::DELETE);

    /// Looks up a flag by its configuration name (case-insensitive)
    ///
    /// Unlike the generated `from_name`, this accepts lowercase names and
    /// the `"all"` shorthand.
    ///
    /// # Examples
    ///
    /// ```
    /// use kontrolle::Access;
    ///
    /// assert_eq!(Access::from_config_name("Read"), Some(Access::READ));
    /// assert_eq!(Access::from_config_name("all"), Some(Access::ALL));
    /// assert_eq!(Access::from_config_name("execute"), None);
    /// ```
    pub fn from_config_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "create" => Some(Self::CREATE),
            "read" => Some(Self::READ),
            "update" => Some(Self::UPDATE),
            "delete" => Some(Self::DELETE),
            "all" => Some(Self::ALL),
            _ => None,
        }
    }

    /// True when every flag of `required` is held
    ///
    /// This is a containment test, not a numeric ordering: `READ | DELETE`
    /// is not granted by `CREATE | UPDATE` even though the latter's numeric
    /// value can be made larger.
    pub fn grants(self, required: Access) -> bool {
        self.contains(required)
    }
}

/// Release maturity derived from a `version` tag
///
/// Ordered `Alpha < Beta < Stable`. The tag is split on non-alphanumeric
/// characters and a segment `alpha` or `beta` (optionally followed by
/// digits, as in `beta2`) selects the maturity. A missing tag, or one
/// without such a segment, is stable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Maturity {
    Alpha,
    Beta,
    #[default]
    Stable,
}

impl Maturity {
    pub fn from_version(version: Option<&str>) -> Self {
        let Some(tag) = version else {
            return Maturity::Stable;
        };

        let tag = tag.to_ascii_lowercase();
        let mut maturity = Maturity::Stable;
        for segment in tag.split(|c: char| !c.is_ascii_alphanumeric()) {
            match segment.trim_end_matches(|c: char| c.is_ascii_digit()) {
                "alpha" => return Maturity::Alpha,
                "beta" => maturity = Maturity::Beta,
                _ => {}
            }
        }
        maturity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flag_values() {
        assert_eq!(Access::CREATE.bits(), 2);
        assert_eq!(Access::READ.bits(), 4);
        assert_eq!(Access::UPDATE.bits(), 8);
        assert_eq!(Access::DELETE.bits(), 16);
        assert_eq!(Access::ALL.bits(), 30);
        assert_eq!(Access::ALL, Access::all());
    }

    #[test]
    fn test_grants_is_containment() {
        let held = Access::READ | Access::UPDATE;
        assert!(held.grants(Access::READ));
        assert!(held.grants(Access::READ | Access::UPDATE));
        assert!(!held.grants(Access::DELETE));

        // Numerically larger does not mean granted.
        let required = Access::READ | Access::CREATE;
        let held = Access::DELETE;
        assert!(held.bits() > required.bits());
        assert!(!held.grants(required));

        assert!(Access::ALL.grants(Access::READ | Access::DELETE));
    }

    #[test]
    fn test_from_config_name() {
        assert_eq!(Access::from_config_name("create"), Some(Access::CREATE));
        assert_eq!(Access::from_config_name("read"), Some(Access::READ));
        assert_eq!(Access::from_config_name(" DELETE "), Some(Access::DELETE));
        assert_eq!(Access::from_config_name("all"), Some(Access::ALL));
        assert_eq!(Access::from_config_name(""), None);

        // The generated lookup only knows the uppercase flag names.
        assert_eq!(Access::from_name("READ"), Some(Access::READ));
        assert_eq!(Access::from_name("read"), None);
    }

    #[test]
    fn test_maturity_from_version() {
        assert_eq!(Maturity::from_version(None), Maturity::Stable);
        assert_eq!(Maturity::from_version(Some("alpha")), Maturity::Alpha);
        assert_eq!(Maturity::from_version(Some("2.0.0-BETA.1")), Maturity::Beta);
        assert_eq!(Maturity::from_version(Some("1.4.2")), Maturity::Stable);
        assert_eq!(Maturity::from_version(Some("3.1.0-beta2")), Maturity::Beta);
        assert_eq!(Maturity::from_version(Some("v1-alpha")), Maturity::Alpha);
    }

    #[test]
    fn test_maturity_ignores_embedded_words() {
        assert_eq!(Maturity::from_version(Some("alphabet-2")), Maturity::Stable);
        assert_eq!(Maturity::from_version(Some("betamax")), Maturity::Stable);
        assert_eq!(Maturity::from_version(Some("release-alphanumeric")), Maturity::Stable);
    }

    #[test]
    fn test_maturity_ordering() {
        assert!(Maturity::Alpha < Maturity::Beta);
        assert!(Maturity::Beta < Maturity::Stable);
    }
}
