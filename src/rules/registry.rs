//! Rule registry and the counting primitive behind every quorum policy

use indexmap::IndexMap;
use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use tracing::{error, warn};

use super::types::{Predicate, RuleSelector, RuleSet, RuleTally};
use crate::error::AuthzError;

/// Append-only `rule name -> predicate` map
///
/// The first registration of a name wins; later registrations of the same
/// name are reported and ignored.
pub struct RuleRegistry<S, A = serde_json::Value> {
    rules: IndexMap<String, Predicate<S, A>>,
}

impl<S, A> RuleRegistry<S, A> {
    pub fn new() -> Self {
        Self {
            rules: IndexMap::new(),
        }
    }

    /// Builds a registry from a rule set, permission rules first
    pub fn from_rule_set(rules: RuleSet<S, A>) -> Self {
        let mut registry = Self::new();
        for rule in rules.iter() {
            registry.apply_rules(rule.names(), Arc::clone(rule.predicate()));
        }
        registry
    }

    /// Registers `name`; returns `false` if the name was rejected
    pub fn apply_rule(&mut self, name: impl Into<String>, predicate: Predicate<S, A>) -> bool {
        let name = name.into();
        if name.is_empty() {
            warn!("{}", AuthzError::EmptyRuleName);
            return false;
        }
        if self.rules.contains_key(&name) {
            warn!(rule = %name, "duplicate rule ignored, keeping the first definition");
            return false;
        }

        self.rules.insert(name, predicate);
        true
    }

    /// Registers one predicate under every name; returns how many were added
    pub fn apply_rules<N: AsRef<str>>(&mut self, names: &[N], predicate: Predicate<S, A>) -> usize {
        let mut added = 0;
        for name in names {
            if self.apply_rule(AsRef::<str>::as_ref(name), Arc::clone(&predicate)) {
                added += 1;
            }
        }
        added
    }

    pub fn contains(&self, name: &str) -> bool {
        self.rules.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Registered names in registration order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.rules.keys().map(String::as_str)
    }

    /// Evaluates the selected rules against `subject` and counts the results
    ///
    /// Returns `None` when a single selected name is not registered. In a
    /// batch, unknown names are reported and left out of both counters.
    /// A predicate that errors or panics is reported and counted as
    /// dispatched but not satisfied; the remaining rules still run.
    pub fn check(&self, subject: &S, selector: &RuleSelector, args: &A) -> Option<RuleTally> {
        if let RuleSelector::Single(name) = selector {
            if !self.contains(name) {
                warn!("{}", AuthzError::UnknownRule { rule: name.clone() });
                return None;
            }
        }

        let mut tally = RuleTally::default();
        for name in selector.names() {
            let Some(predicate) = self.rules.get(name) else {
                warn!("{}", AuthzError::UnknownRule { rule: name.clone() });
                continue;
            };

            tally.total += 1;
            if Self::dispatch(name, predicate, subject, args) {
                tally.satisfied += 1;
            }
        }

        Some(tally)
    }

    fn dispatch(name: &str, predicate: &Predicate<S, A>, subject: &S, args: &A) -> bool {
        let outcome = catch_unwind(AssertUnwindSafe(|| predicate(subject, args)));

        let reason = match outcome {
            Ok(Ok(satisfied)) => return satisfied,
            Ok(Err(err)) => format!("{err:#}"),
            Err(payload) => panic_message(&*payload),
        };

        error!(
            "{}",
            AuthzError::PredicateFailed {
                rule: name.to_string(),
                reason,
            }
        );
        false
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        format!("panicked: {message}")
    } else if let Some(message) = payload.downcast_ref::<String>() {
        format!("panicked: {message}")
    } else {
        "panicked".to_string()
    }
}

impl<S, A> Default for RuleRegistry<S, A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S, A> std::fmt::Debug for RuleRegistry<S, A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuleRegistry")
            .field("rules", &self.rules.keys().collect::<Vec<_>>())
            .finish()
    }
}
