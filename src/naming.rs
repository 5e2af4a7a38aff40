//! Composite naming for `(group, resource)` pairs
//!
//! A composite name is `group + delimiter + resource`. Decoding splits at the
//! leftmost delimiter, so a group must never contain the delimiter while a
//! resource may.

use serde::{Deserialize, Serialize};

use crate::error::{AuthzError, Result};

/// Delimiter used when the configuration does not name one
pub const DEFAULT_DELIMITER: &str = ":";

/// A decoded composite name
///
/// The value does not remember its delimiter; use
/// [`encode`](Self::encode) to turn it back into a string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CompositeName {
    pub group: String,
    pub resource: String,
}

impl CompositeName {
    pub fn new(group: impl Into<String>, resource: impl Into<String>) -> Self {
        Self {
            group: group.into(),
            resource: resource.into(),
        }
    }

    /// Encodes this pair with `delimiter`
    pub fn encode(&self, delimiter: &str) -> Result<String> {
        encode(&self.group, &self.resource, delimiter)
    }
}

/// Joins `group` and `resource` into a single indexable name
///
/// # Errors
///
/// Fails when any of `group`, `resource` or `delimiter` is empty.
///
/// # Examples
///
/// ```
/// use kontrolle::naming::encode;
///
/// assert_eq!(encode("users", "manage", ":").unwrap(), "users:manage");
/// assert!(encode("", "manage", ":").is_err());
/// ```
pub fn encode(group: &str, resource: &str, delimiter: &str) -> Result<String> {
    if group.is_empty() {
        return Err(AuthzError::EmptyGroup);
    }
    if resource.is_empty() {
        return Err(AuthzError::EmptyResource);
    }
    if delimiter.is_empty() {
        return Err(AuthzError::EmptyDelimiter);
    }

    let mut name = String::with_capacity(group.len() + delimiter.len() + resource.len());
    name.push_str(group);
    name.push_str(delimiter);
    name.push_str(resource);
    Ok(name)
}

/// Splits a composite name at the first occurrence of `delimiter`
///
/// # Errors
///
/// Fails when `name` or `delimiter` is empty, or when `delimiter` does not
/// occur in `name`.
///
/// # Examples
///
/// ```
/// use kontrolle::naming::decode;
///
/// let decoded = decode("users:licence:view", ":").unwrap();
/// assert_eq!(decoded.group, "users");
/// assert_eq!(decoded.resource, "licence:view");
/// ```
pub fn decode(name: &str, delimiter: &str) -> Result<CompositeName> {
    if delimiter.is_empty() {
        return Err(AuthzError::EmptyDelimiter);
    }
    if name.is_empty() {
        return Err(AuthzError::EmptyName);
    }

    let (group, resource) =
        name.split_once(delimiter)
            .ok_or_else(|| AuthzError::DelimiterNotFound {
                name: name.to_string(),
                delimiter: delimiter.to_string(),
            })?;

    Ok(CompositeName::new(group, resource))
}
