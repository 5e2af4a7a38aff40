//! Rule definitions, rule selection and quorum counting

use std::fmt;
use std::sync::Arc;

use crate::error::{AuthzError, Result};

/// A user predicate: receives the bound subject and the call arguments
///
/// Returning `Err` (or panicking) counts as "not satisfied".
pub type Predicate<S, A> = Arc<dyn Fn(&S, &A) -> anyhow::Result<bool> + Send + Sync>;

/// One predicate registered under one or more rule names
pub struct Rule<S, A = serde_json::Value> {
    names: Vec<String>,
    predicate: Predicate<S, A>,
}

impl<S, A> Rule<S, A> {
    /// Creates a rule registered under a single name
    ///
    /// # Examples
    ///
    /// ```
    /// use kontrolle::Rule;
    /// use serde_json::Value;
    ///
    /// struct User { id: u64 }
    ///
    /// let rule: Rule<User> = Rule::new("delete-certificate", |user: &User, certificate: &Value| {
    ///     Ok(certificate["ownerId"] == user.id)
    /// })
    /// .unwrap();
    /// assert_eq!(rule.names(), ["delete-certificate"]);
    /// ```
    pub fn new<F>(name: impl Into<String>, predicate: F) -> Result<Self>
    where
        F: Fn(&S, &A) -> anyhow::Result<bool> + Send + Sync + 'static,
    {
        Self::fan_out([name.into()], predicate)
    }

    /// Creates a rule registered under every name in `names`
    pub fn fan_out<I, N, F>(names: I, predicate: F) -> Result<Self>
    where
        I: IntoIterator<Item = N>,
        N: Into<String>,
        F: Fn(&S, &A) -> anyhow::Result<bool> + Send + Sync + 'static,
    {
        Self::from_predicate(names, Arc::new(predicate))
    }

    /// Creates a rule around an already shared predicate
    pub fn from_predicate<I, N>(names: I, predicate: Predicate<S, A>) -> Result<Self>
    where
        I: IntoIterator<Item = N>,
        N: Into<String>,
    {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        if names.is_empty() || names.iter().any(String::is_empty) {
            return Err(AuthzError::EmptyRuleName);
        }
        Ok(Self { names, predicate })
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn predicate(&self) -> &Predicate<S, A> {
        &self.predicate
    }
}

impl<S, A> Clone for Rule<S, A> {
    fn clone(&self) -> Self {
        Self {
            names: self.names.clone(),
            predicate: Arc::clone(&self.predicate),
        }
    }
}

impl<S, A> fmt::Debug for Rule<S, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule").field("names", &self.names).finish_non_exhaustive()
    }
}

/// Rules grouped the way they are declared
///
/// Both groups share one name space; permission rules are registered first.
pub struct RuleSet<S, A = serde_json::Value> {
    pub permissions: Vec<Rule<S, A>>,
    pub roles: Vec<Rule<S, A>>,
}

impl<S, A> RuleSet<S, A> {
    pub fn new() -> Self {
        Self {
            permissions: Vec::new(),
            roles: Vec::new(),
        }
    }

    pub fn permission(mut self, rule: Rule<S, A>) -> Self {
        self.permissions.push(rule);
        self
    }

    pub fn role(mut self, rule: Rule<S, A>) -> Self {
        self.roles.push(rule);
        self
    }

    /// All rules in registration order
    pub fn iter(&self) -> impl Iterator<Item = &Rule<S, A>> {
        self.permissions.iter().chain(self.roles.iter())
    }
}

impl<S, A> Default for RuleSet<S, A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S, A> From<Vec<Rule<S, A>>> for RuleSet<S, A> {
    fn from(permissions: Vec<Rule<S, A>>) -> Self {
        Self {
            permissions,
            roles: Vec::new(),
        }
    }
}

/// Rule names to evaluate: exactly one, or a batch
///
/// The distinction matters for unknown names. A single unknown name makes
/// the whole evaluation undecided, while unknown names in a batch are
/// skipped.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RuleSelector {
    Single(String),
    Many(Vec<String>),
}

impl RuleSelector {
    pub fn names(&self) -> &[String] {
        match self {
            RuleSelector::Single(name) => std::slice::from_ref(name),
            RuleSelector::Many(names) => names,
        }
    }
}

impl From<&str> for RuleSelector {
    fn from(name: &str) -> Self {
        RuleSelector::Single(name.to_string())
    }
}

impl From<String> for RuleSelector {
    fn from(name: String) -> Self {
        RuleSelector::Single(name)
    }
}

impl From<Vec<String>> for RuleSelector {
    fn from(names: Vec<String>) -> Self {
        RuleSelector::Many(names)
    }
}

impl From<Vec<&str>> for RuleSelector {
    fn from(names: Vec<&str>) -> Self {
        RuleSelector::Many(names.into_iter().map(str::to_string).collect())
    }
}

impl From<&[&str]> for RuleSelector {
    fn from(names: &[&str]) -> Self {
        RuleSelector::Many(names.iter().map(|n| n.to_string()).collect())
    }
}

impl<const N: usize> From<[&str; N]> for RuleSelector {
    fn from(names: [&str; N]) -> Self {
        RuleSelector::Many(names.iter().map(|n| n.to_string()).collect())
    }
}

impl<const N: usize> From<&[&str; N]> for RuleSelector {
    fn from(names: &[&str; N]) -> Self {
        RuleSelector::from(&names[..])
    }
}

/// Counts produced by evaluating a batch of rules
///
/// `total` counts rules whose predicate was dispatched (including those
/// that failed); `satisfied` counts those that returned `true`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RuleTally {
    pub total: usize,
    pub satisfied: usize,
}

/// Decision policy applied to a [`RuleTally`]
///
/// On an empty tally (every selected name unknown) only `None` holds:
/// `All` additionally requires at least one dispatched rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Quorum {
    /// every dispatched rule satisfied
    All,
    /// at least one satisfied
    Any,
    /// none satisfied
    None,
    /// at least one not satisfied
    NotAll,
}

impl Quorum {
    pub fn decide(self, tally: RuleTally) -> bool {
        match self {
            Quorum::All => tally.total > 0 && tally.satisfied == tally.total,
            Quorum::Any => tally.satisfied > 0,
            Quorum::None => tally.satisfied == 0,
            Quorum::NotAll => tally.satisfied < tally.total,
        }
    }
}
