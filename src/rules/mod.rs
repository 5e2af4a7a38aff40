//! # Rules Module
//!
//! Named predicates evaluated against a bound subject:
//! - [`RuleRegistry`]: append-only `name -> predicate` map, first definition wins
//! - [`Kontrolle`]: subject plus registry, answering quorum questions
//! - [`Quorum`]: ALL / ANY / NONE / NOT-ALL over a [`RuleTally`]
//!
//! Failing predicates never abort a batch. They are logged and counted as
//! unsatisfied.

mod kontrolle;
mod registry;
mod types;

pub use kontrolle::{define_kontrolle, Kontrolle};
pub use registry::RuleRegistry;
pub use types::{Predicate, Quorum, Rule, RuleSelector, RuleSet, RuleTally};
