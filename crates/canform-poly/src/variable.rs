//! Variables and the level model.
//!
//! Every variable is identified by an integer level. Polynomials are stored
//! recursively with the highest-level variable outermost, so comparing two
//! variables means comparing their levels.
//!
//! The level line is split into bands:
//!
//! ```text
//! LEVELBASE < transcendental <= LEVELTRANS < algebraic < 0 < ordinary < LEVELQUOT < LEVELEXPR
//! ```

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::canonical::CanonicalForm;
use crate::error::{AlgebraError, Result};

/// Level of the coefficient domain (no variable).
pub const LEVELBASE: i32 = -1_000_000;
/// Upper bound of the transcendental band.
pub const LEVELTRANS: i32 = -500_000;
/// Marker level for quotient rings.
pub const LEVELQUOT: i32 = 1_000_000;
/// Marker level for expressions.
pub const LEVELEXPR: i32 = 1_000_001;

/// A polynomial variable.
///
/// Equality, ordering and hashing look at the level only. Algebraic
/// variables minted by `AlgebraContext::root_of` additionally carry their
/// (monic) minimal polynomial.
#[derive(Clone)]
pub struct Variable {
    level: i32,
    name: Option<char>,
    mipo: Option<Arc<CanonicalForm>>,
}

impl Variable {
    /// The pseudo-variable of the coefficient domain.
    #[must_use]
    pub const fn base() -> Self {
        Self {
            level: LEVELBASE,
            name: None,
            mipo: None,
        }
    }

    /// Creates the ordinary variable at `level`.
    ///
    /// # Panics
    ///
    /// Panics if `level` is not in `1..LEVELQUOT`.
    #[must_use]
    pub fn new(level: i32) -> Self {
        assert!(
            (1..LEVELQUOT).contains(&level),
            "illegal variable level {level}"
        );
        Self {
            level,
            name: None,
            mipo: None,
        }
    }

    /// Creates the named ordinary variable at `level`.
    ///
    /// # Panics
    ///
    /// Panics if `level` is not in `1..LEVELQUOT`.
    #[must_use]
    pub fn named(level: i32, name: char) -> Self {
        Self {
            name: Some(name),
            ..Self::new(level)
        }
    }

    /// Creates a variable at any level inside the level bands.
    ///
    /// # Errors
    ///
    /// Returns `IllegalLevel` for levels outside `(LEVELBASE, LEVELQUOT)`
    /// and for level 0.
    pub fn try_new(level: i32) -> Result<Self> {
        if level <= LEVELBASE || level >= LEVELQUOT || level == 0 {
            return Err(AlgebraError::IllegalLevel(level));
        }
        Ok(Self {
            level,
            name: None,
            mipo: None,
        })
    }

    /// Creates the algebraic variable at a negative `level` bound to `mipo`.
    pub(crate) fn algebraic(level: i32, name: char, mipo: CanonicalForm) -> Self {
        debug_assert!(level < 0 && level > LEVELTRANS);
        Self {
            level,
            name: Some(name),
            mipo: Some(Arc::new(mipo)),
        }
    }

    /// The highest ordinary variable.
    #[must_use]
    pub fn highest() -> Self {
        Self::new(LEVELQUOT - 1)
    }

    /// The level.
    #[must_use]
    pub fn level(&self) -> i32 {
        self.level
    }

    /// The name, if one was given.
    #[must_use]
    pub fn name(&self) -> Option<char> {
        self.name
    }

    /// The variable one level up.
    ///
    /// # Panics
    ///
    /// Panics if this is already the highest ordinary variable.
    #[must_use]
    pub fn next(&self) -> Self {
        if self.level <= 0 {
            return Self::new(1);
        }
        Self::new(self.level + 1)
    }

    /// The minimal polynomial of an algebraic variable.
    #[must_use]
    pub fn mipo(&self) -> Option<&CanonicalForm> {
        self.mipo.as_deref()
    }

    /// Returns true for the base pseudo-variable.
    #[must_use]
    pub fn is_base(&self) -> bool {
        self.level == LEVELBASE
    }

    /// Returns true for ordinary polynomial variables.
    #[must_use]
    pub fn is_ordinary(&self) -> bool {
        self.level > 0 && self.level < LEVELQUOT
    }

    /// Returns true for variables generating an algebraic extension.
    #[must_use]
    pub fn is_algebraic(&self) -> bool {
        self.level < 0 && self.level > LEVELTRANS
    }

    /// Returns true for transcendental variables.
    #[must_use]
    pub fn is_transcendental(&self) -> bool {
        self.level <= LEVELTRANS && self.level > LEVELBASE
    }

    pub(crate) fn with_name(&self, name: Option<char>) -> Self {
        Self {
            name,
            ..self.clone()
        }
    }
}

impl PartialEq for Variable {
    fn eq(&self, other: &Self) -> bool {
        self.level == other.level
    }
}

impl Eq for Variable {}

impl PartialOrd for Variable {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Variable {
    fn cmp(&self, other: &Self) -> Ordering {
        self.level.cmp(&other.level)
    }
}

impl Hash for Variable {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.level.hash(state);
    }
}

impl fmt::Debug for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Variable({self}, level {})", self.level)
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name {
            Some(c) => write!(f, "{c}"),
            None if self.is_base() => write!(f, "1"),
            None if self.level < 0 => write!(f, "@_{}", -self.level),
            None => write!(f, "v_{}", self.level),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ordering_by_level() {
        let x = Variable::named(1, 'x');
        let y = Variable::named(2, 'y');
        assert!(x < y);
        assert_eq!(x.next(), y);
        assert_eq!(Variable::named(1, 'z'), x);
    }

    #[test]
    fn test_bands() {
        assert!(Variable::base().is_base());
        assert!(Variable::new(3).is_ordinary());
        assert!(Variable::try_new(-2).unwrap().is_algebraic());
        assert!(Variable::try_new(LEVELTRANS).unwrap().is_transcendental());
        assert_eq!(Variable::highest().level(), LEVELQUOT - 1);
    }

    #[test]
    fn test_illegal_levels() {
        assert_eq!(Variable::try_new(0), Err(AlgebraError::IllegalLevel(0)));
        assert_eq!(
            Variable::try_new(LEVELQUOT),
            Err(AlgebraError::IllegalLevel(LEVELQUOT))
        );
    }

    #[test]
    #[should_panic(expected = "illegal variable level")]
    fn test_new_rejects_base_level() {
        let _ = Variable::new(LEVELBASE);
    }

    #[test]
    fn test_display() {
        assert_eq!(Variable::named(1, 'x').to_string(), "x");
        assert_eq!(Variable::new(4).to_string(), "v_4");
        assert_eq!(Variable::try_new(-1).unwrap().to_string(), "@_1");
    }
}
