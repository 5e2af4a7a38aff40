//! # Entity Module
//!
//! Value types the flat index is built from:
//! - [`Role`]: identity only
//! - [`Permission`]: action set on a `(group, resource)` pair
//! - [`Feature`]: [`Access`] flags on a `(group, resource)` pair

pub mod access;
pub mod types;

pub use access::{Access, Maturity};
pub use types::{Action, Feature, Permission, Role};
