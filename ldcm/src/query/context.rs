//! Variable bindings for one partial solution.

use super::types::{Term, Variable};

/// The terms bound so far while matching a query's patterns.
///
/// Schema lookups bind a handful of variables, so bindings are kept in a
/// small vector in binding order. Each branch of the search owns its own
/// copy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Bindings {
    slots: Vec<(Variable, Term)>,
}

impl Bindings {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The term bound to `variable`.
    #[must_use]
    pub fn get(&self, variable: &Variable) -> Option<&Term> {
        self.slots
            .iter()
            .find(|(bound, _)| bound == variable)
            .map(|(_, term)| term)
    }

    /// Bind `variable` to `term`, or check an existing binding agrees.
    ///
    /// Returns `false` when the variable is already bound to another term.
    pub fn unify(&mut self, variable: &Variable, term: &Term) -> bool {
        match self.get(variable) {
            Some(bound) => bound == term,
            None => {
                self.slots.push((variable.clone(), term.clone()));
                true
            }
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}
