//! Subject-bound rule evaluation context

use tracing::{debug, info};

use super::registry::RuleRegistry;
use super::types::{Quorum, RuleSelector, RuleSet, RuleTally};

/// Binds one subject to a rule registry and answers quorum questions
///
/// Independent contexts can coexist; nothing is shared between them.
///
/// # Examples
///
/// ```
/// use kontrolle::{define_kontrolle, Rule, RuleSet};
/// use serde_json::{json, Value};
///
/// struct User { id: u64 }
///
/// let rules = RuleSet::new().permission(
///     Rule::new("delete-certificate", |user: &User, certificate: &Value| {
///         Ok(certificate["ownerId"] == user.id)
///     })
///     .unwrap(),
/// );
///
/// let kontrolle = define_kontrolle(User { id: 1 }, rules);
/// assert!(kontrolle.can("delete-certificate", &json!({ "ownerId": 1 })));
/// assert!(!kontrolle.can("delete-certificate", &json!({ "ownerId": 2 })));
/// assert!(!kontrolle.can("revoke-certificate", &json!({ "ownerId": 1 })));
/// ```
#[derive(Debug)]
pub struct Kontrolle<S, A = serde_json::Value> {
    subject: S,
    registry: RuleRegistry<S, A>,
}

/// Binds `subject` and registers `rules`
pub fn define_kontrolle<S, A>(subject: S, rules: RuleSet<S, A>) -> Kontrolle<S, A> {
    Kontrolle::new(subject, rules)
}

impl<S, A> Kontrolle<S, A> {
    pub fn new(subject: S, rules: RuleSet<S, A>) -> Self {
        let registry = RuleRegistry::from_rule_set(rules);
        info!(rules = registry.len(), "rules registered");
        Self { subject, registry }
    }

    /// Replaces every registered rule with `rules`
    pub fn define_rules(&mut self, rules: RuleSet<S, A>) {
        self.registry = RuleRegistry::from_rule_set(rules);
        info!(rules = self.registry.len(), "rules redefined");
    }

    pub fn subject(&self) -> &S {
        &self.subject
    }

    pub fn registry(&self) -> &RuleRegistry<S, A> {
        &self.registry
    }

    /// Raw counts for the selected rules; `None` for a single unknown name
    pub fn tally(&self, rules: impl Into<RuleSelector>, args: &A) -> Option<RuleTally> {
        self.registry.check(&self.subject, &rules.into(), args)
    }

    /// Applies `quorum` to the selected rules
    pub fn evaluate(&self, quorum: Quorum, rules: impl Into<RuleSelector>, args: &A) -> bool {
        let selector = rules.into();
        let decision = self
            .registry
            .check(&self.subject, &selector, args)
            .is_some_and(|tally| quorum.decide(tally));

        debug!(?quorum, rules = ?selector.names(), decision, "rules evaluated");
        decision
    }

    /// Every selected rule is satisfied
    pub fn can(&self, rules: impl Into<RuleSelector>, args: &A) -> bool {
        self.evaluate(Quorum::All, rules, args)
    }

    /// Same as [`can`](Self::can)
    pub fn can_all(&self, rules: impl Into<RuleSelector>, args: &A) -> bool {
        self.evaluate(Quorum::All, rules, args)
    }

    /// At least one selected rule is satisfied
    pub fn can_any(&self, rules: impl Into<RuleSelector>, args: &A) -> bool {
        self.evaluate(Quorum::Any, rules, args)
    }

    /// No selected rule is satisfied
    pub fn can_not(&self, rules: impl Into<RuleSelector>, args: &A) -> bool {
        self.evaluate(Quorum::None, rules, args)
    }

    /// At least one selected rule is not satisfied
    pub fn can_not_any(&self, rules: impl Into<RuleSelector>, args: &A) -> bool {
        self.evaluate(Quorum::NotAll, rules, args)
    }
}
