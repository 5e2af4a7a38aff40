//! # Kontrolle
//!
//! In-process authorization engine with support for:
//! - Composite `(group, resource)` naming
//! - Action-list permissions and access-flag features
//! - Role lookups and role-bound feature lists
//! - Named predicate rules with quorum evaluation
//! - Build-once indexes with guarded re-initialization
//!
//! ## Example
//!
//! ```rust
//! use kontrolle::{FlatIndex, KontrolleConfig};
//!
//! let config = KontrolleConfig::from_json_str(r#"{
//!     "roles": ["admin", "user"],
//!     "permissions": {
//!         "users": {
//!             "manage": { "action": ["create", "read", "update"] },
//!             "licence": { "action": "view" }
//!         }
//!     }
//! }"#).unwrap();
//!
//! let index = FlatIndex::init(&config).unwrap();
//!
//! assert!(index.can("users", "manage", "create"));
//! assert!(index.can_any([("users", "manage", "read"), ("users", "licence", "view")]));
//! assert!(!index.can_all([("users", "manage", "*"), ("users", "licence", "view")]));
//! assert!(index.can_all_actions("users", "manage", &["create", "read"]));
//! ```

pub mod config;
pub mod entity;
pub mod error;
pub mod index;
pub mod naming;
pub mod rules;

pub use config::{KontrolleConfig, KontrolleConfigBuilder};
pub use entity::{Access, Action, Feature, Maturity, Permission, Role};
pub use error::{AuthzError, Result};
pub use index::{FlatIndex, Query, SharedIndex};
pub use naming::{decode, encode, CompositeName, DEFAULT_DELIMITER};
pub use rules::{
    define_kontrolle, Kontrolle, Predicate, Quorum, Rule, RuleRegistry, RuleSelector, RuleSet,
    RuleTally,
};
