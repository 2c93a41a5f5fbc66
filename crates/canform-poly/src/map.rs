//! Variable substitution maps.

use std::fmt;

use crate::canonical::CanonicalForm;
use crate::error::Result;
use crate::util::get_vars;
use crate::variable::Variable;

/// One substitution `var -> subst`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MapPair {
    var: Variable,
    subst: CanonicalForm,
}

impl MapPair {
    /// Creates the pair `var -> subst`.
    #[must_use]
    pub fn new(var: Variable, subst: CanonicalForm) -> Self {
        Self { var, subst }
    }

    /// The variable being replaced.
    #[must_use]
    pub fn var(&self) -> &Variable {
        &self.var
    }

    /// The replacement.
    #[must_use]
    pub fn subst(&self) -> &CanonicalForm {
        &self.subst
    }
}

impl fmt::Display for MapPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.var, self.subst)
    }
}

/// A set of substitutions sorted by descending level.
///
/// Applying a map replaces every mapped variable in a single pass: the
/// replacements are not themselves rewritten.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CFMap {
    pairs: Vec<MapPair>,
}

impl CFMap {
    /// The empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Maps the variable of level `i + 1` to `list[i]`.
    #[must_use]
    pub fn from_list(list: &[CanonicalForm]) -> Self {
        let mut m = Self::new();
        for (i, subst) in (1..).zip(list) {
            m.insert(Variable::new(i), subst.clone());
        }
        m
    }

    /// Adds `var -> subst`, replacing an existing substitution for `var`.
    pub fn insert(&mut self, var: Variable, subst: CanonicalForm) {
        match self.pairs.binary_search_by(|p| var.cmp(&p.var)) {
            Ok(i) => self.pairs[i].subst = subst,
            Err(i) => self.pairs.insert(i, MapPair::new(var, subst)),
        }
    }

    /// The substitution for `var`, if any.
    #[must_use]
    pub fn get(&self, var: &Variable) -> Option<&CanonicalForm> {
        self.pairs
            .binary_search_by(|p| var.cmp(&p.var))
            .ok()
            .map(|i| &self.pairs[i].subst)
    }

    /// Number of substitutions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Returns true if the map is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// The pairs, highest level first.
    pub fn iter(&self) -> impl Iterator<Item = &MapPair> {
        self.pairs.iter()
    }

    /// Applies the substitutions to `f`.
    ///
    /// # Errors
    ///
    /// Returns `DomainMismatch` if a replacement does not combine with the
    /// coefficients it multiplies.
    pub fn apply(&self, f: &CanonicalForm) -> Result<CanonicalForm> {
        let Some(node) = f.poly() else {
            return Ok(f.clone());
        };
        if self.pairs.is_empty() {
            return Ok(f.clone());
        }
        let base = match self.get(&node.var) {
            Some(subst) => subst.clone(),
            None => CanonicalForm::from(&node.var),
        };
        // Horner in the image of the main variable.
        let mut result = CanonicalForm::zero();
        let mut last: Option<u32> = None;
        for t in &node.terms {
            if let Some(prev) = last {
                result = result.try_mul(&base.pow(prev - t.exp))?;
            }
            result = result.try_add(&self.apply(&t.coeff)?)?;
            last = Some(t.exp);
        }
        if let Some(e) = last {
            result = result.try_mul(&base.pow(e))?;
        }
        Ok(result)
    }
}

impl FromIterator<MapPair> for CFMap {
    fn from_iter<I: IntoIterator<Item = MapPair>>(iter: I) -> Self {
        let mut m = Self::new();
        for p in iter {
            m.insert(p.var, p.subst);
        }
        m
    }
}

impl fmt::Display for CFMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "( ")?;
        for p in &self.pairs {
            write!(f, "{p} ")?;
        }
        write!(f, ")")
    }
}

fn compress_vars(vars: &[Variable]) -> (CFMap, CFMap) {
    let mut m = CFMap::new();
    let mut n = CFMap::new();
    for (level, v) in (1..).zip(vars) {
        let target = Variable::new(level);
        m.insert(target.clone(), CanonicalForm::from(v));
        n.insert(v.clone(), CanonicalForm::from(&target));
    }
    (m, n)
}

/// Renumbers the variables of `f` to the consecutive levels `1..=k`.
///
/// Returns `(m, n)`: `n` maps `f` to its compressed form and `m` maps the
/// compressed form back.
#[must_use]
pub fn compress(f: &CanonicalForm) -> (CFMap, CFMap) {
    compress_vars(&get_vars(f))
}

/// Renumbers the variables occurring in `f` or `g` to consecutive levels.
#[must_use]
pub fn compress_pair(f: &CanonicalForm, g: &CanonicalForm) -> (CFMap, CFMap) {
    let mut vars = get_vars(f);
    for v in get_vars(g) {
        if let Err(i) = vars.binary_search(&v) {
            vars.insert(i, v);
        }
    }
    compress_vars(&vars)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn var(level: i32) -> CanonicalForm {
        CanonicalForm::from(Variable::new(level))
    }

    #[test]
    fn test_insert_sorted_and_replace() {
        let mut m = CFMap::new();
        m.insert(Variable::new(1), CanonicalForm::from(1));
        m.insert(Variable::new(3), CanonicalForm::from(3));
        m.insert(Variable::new(2), CanonicalForm::from(2));
        m.insert(Variable::new(3), CanonicalForm::from(30));
        let levels: Vec<i32> = m.iter().map(|p| p.var().level()).collect();
        assert_eq!(levels, vec![3, 2, 1]);
        assert_eq!(m.get(&Variable::new(3)), Some(&CanonicalForm::from(30)));
        assert_eq!(m.len(), 3);
    }

    #[test]
    fn test_single_pass() {
        // x -> y, y -> x^2 is not applied to its own output
        let mut m = CFMap::new();
        m.insert(Variable::new(1), var(2));
        m.insert(Variable::new(2), var(1).pow(2));
        let f = var(1) + var(2);
        assert_eq!(m.apply(&f).unwrap(), var(2) + var(1).pow(2));
    }

    #[test]
    fn test_from_list() {
        let m = CFMap::from_list(&[CanonicalForm::from(2), CanonicalForm::from(3)]);
        let f = var(1) * var(2) + var(3);
        assert_eq!(m.apply(&f).unwrap(), var(3) + 6);
    }

    #[test]
    fn test_compress() {
        let f = var(7).pow(2) * var(4) + var(4) + 1;
        let (m, n) = compress(&f);
        let g = n.apply(&f).unwrap();
        assert_eq!(g, var(2).pow(2) * var(1) + var(1) + 1);
        assert_eq!(m.apply(&g).unwrap(), f);

        let (m2, n2) = compress_pair(&var(5), &var(9));
        assert_eq!(n2.apply(&var(9)).unwrap(), var(2));
        assert_eq!(m2.apply(&var(1)).unwrap(), var(5));
    }
}
