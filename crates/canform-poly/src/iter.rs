//! Term iteration.

use std::iter::FusedIterator;
use std::slice;

use crate::canonical::{CanonicalForm, Term};
use crate::error::{AlgebraError, Result};
use crate::variable::Variable;

/// Iterator over the `(exponent, coefficient)` terms of a canonical form,
/// highest exponent first.
///
/// A scalar (or any form below the requested level) is a single term of
/// exponent zero; the zero element has no terms.
#[derive(Clone, Debug)]
pub struct CFIterator<'a> {
    inner: Inner<'a>,
}

#[derive(Clone, Debug)]
enum Inner<'a> {
    Terms(slice::Iter<'a, Term>),
    Single(Option<&'a CanonicalForm>),
}

impl<'a> CFIterator<'a> {
    /// Iterates over the terms of `f` in its main variable.
    #[must_use]
    pub fn new(f: &'a CanonicalForm) -> Self {
        let inner = match f.poly() {
            Some(node) => Inner::Terms(node.terms.iter()),
            None if f.is_zero() => Inner::Single(None),
            None => Inner::Single(Some(f)),
        };
        Self { inner }
    }

    /// Iterates over the terms of `f` in `v`.
    ///
    /// # Errors
    ///
    /// Returns `IllegalLevel` if `v` is below the main variable of `f`:
    /// the terms in an inner variable are not stored contiguously.
    pub fn with_var(f: &'a CanonicalForm, v: &Variable) -> Result<Self> {
        if f.level() > v.level() {
            return Err(AlgebraError::IllegalLevel(v.level()));
        }
        if f.level() == v.level() {
            return Ok(Self::new(f));
        }
        let single = if f.is_zero() { None } else { Some(f) };
        Ok(Self {
            inner: Inner::Single(single),
        })
    }

    /// Returns true while terms remain.
    #[must_use]
    pub fn has_terms(&self) -> bool {
        self.len() > 0
    }
}

impl<'a> Iterator for CFIterator<'a> {
    type Item = (u32, &'a CanonicalForm);

    fn next(&mut self) -> Option<Self::Item> {
        match &mut self.inner {
            Inner::Terms(it) => it.next().map(|t| (t.exp, &t.coeff)),
            Inner::Single(slot) => slot.take().map(|c| (0, c)),
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = match &self.inner {
            Inner::Terms(it) => it.len(),
            Inner::Single(slot) => usize::from(slot.is_some()),
        };
        (n, Some(n))
    }
}

impl ExactSizeIterator for CFIterator<'_> {}

impl FusedIterator for CFIterator<'_> {}

impl DoubleEndedIterator for CFIterator<'_> {
    fn next_back(&mut self) -> Option<Self::Item> {
        match &mut self.inner {
            Inner::Terms(it) => it.next_back().map(|t| (t.exp, &t.coeff)),
            Inner::Single(slot) => slot.take().map(|c| (0, c)),
        }
    }
}

impl CanonicalForm {
    /// The terms in the main variable, highest exponent first.
    #[must_use]
    pub fn terms(&self) -> CFIterator<'_> {
        CFIterator::new(self)
    }
}

impl<'a> IntoIterator for &'a CanonicalForm {
    type Item = (u32, &'a CanonicalForm);
    type IntoIter = CFIterator<'a>;

    fn into_iter(self) -> Self::IntoIter {
        CFIterator::new(self)
    }
}
