//! The [`rule`](self) module contains the rules a fake applies to the calls
//! it intercepts.

use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::sync::Arc;

use parking_lot::RwLock;

use crate::call::Call;
use crate::error::Result;
use crate::specification::CallSpecification;
use crate::times::Times;
use crate::types::Value;

/// Values to assign to the by-reference and output parameters of a call, as
/// `(parameter index, value)`.
pub type Assignments = Vec<(usize, Value)>;

/// Rule that is applied to the calls of a fake.
pub trait CallRule: Send + Sync {
    /// Returns `true` if the rule should be applied to `call`.
    ///
    /// # Errors
    /// Returns [`Error::UserCallback`](crate::Error::UserCallback) if a user
    /// supplied predicate failed.
    fn is_applicable_to(&self, call: &Call) -> Result<bool>;

    /// Apply the rule to `call`.
    ///
    /// # Errors
    /// Returns an error if the rule rejects the call.
    fn apply(&self, call: &Call) -> Result<Assignments>;

    /// Number of times the rule may be applied, `None` if unlimited.
    fn number_of_times_to_call(&self) -> Option<usize> {
        None
    }
}

/// Rule created from a [`CallSpecification`].
///
/// The rule is applicable to every call that matches the specification. If a
/// repeat cap is set, the rule stops being applicable once it was applied
/// that many times.
pub struct ConfiguredRule {
    specification: CallSpecification,
    times: Option<Times>,
}

impl ConfiguredRule {
    #[must_use]
    pub fn new(specification: CallSpecification) -> Self {
        Self {
            specification,
            times: None,
        }
    }

    /// Limit the rule to be applied at most `count` times.
    #[must_use]
    pub fn number_of_times(mut self, count: usize) -> Self {
        self.times = Some(Times::new(..=count));

        self
    }

    #[must_use]
    pub fn specification(&self) -> &CallSpecification {
        &self.specification
    }

    /// Number of times the rule was applied so far.
    #[must_use]
    pub fn applied(&self) -> usize {
        self.times.as_ref().map_or(0, Times::count)
    }

    fn is_exhausted(&self) -> bool {
        self.times.as_ref().is_some_and(Times::is_done)
    }
}

impl CallRule for ConfiguredRule {
    fn is_applicable_to(&self, call: &Call) -> Result<bool> {
        if self.is_exhausted() {
            return Ok(false);
        }

        self.specification.matches(call)
    }

    fn apply(&self, call: &Call) -> Result<Assignments> {
        if let Some(times) = &self.times {
            let previous = times.increment();

            tracing::trace!(call = %call.method(), applied = previous + 1, "applied configured rule");
        }

        Ok(self.specification.assignments().to_vec())
    }

    fn number_of_times_to_call(&self) -> Option<usize> {
        self.times.as_ref().and_then(|times| times.range.max())
    }
}

impl Debug for ConfiguredRule {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("ConfiguredRule")
            .field("specification", &self.specification)
            .field("times", &self.times)
            .finish()
    }
}

/// Ordered set of call rules.
///
/// Rules added later take precedence over rules added earlier: a call is
/// handled by the most recently added rule that is applicable to it.
#[derive(Default)]
pub struct RuleSet {
    rules: RwLock<Vec<Arc<dyn CallRule>>>,
}

impl RuleSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a new rule with the highest precedence.
    pub fn add<R>(&self, rule: R)
    where
        R: CallRule + 'static,
    {
        self.rules.write().push(Arc::new(rule));
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.read().is_empty()
    }

    /// Apply the first applicable rule to `call`.
    ///
    /// Returns `None` if no rule is applicable.
    ///
    /// # Errors
    /// Forwards the errors of the applied rule, or of a rule that failed to
    /// decide if it is applicable.
    pub fn apply(&self, call: &Call) -> Result<Option<Assignments>> {
        let rules = self.rules.read().clone();

        for rule in rules.iter().rev() {
            if rule.is_applicable_to(call)? {
                return rule.apply(call).map(Some);
            }
        }

        tracing::debug!(call = %call.method(), "no rule is applicable");

        Ok(None)
    }
}

impl Debug for RuleSet {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("RuleSet")
            .field("rules", &self.len())
            .finish()
    }
}
