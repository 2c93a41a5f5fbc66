//! Evaluation points.

use std::ops::Deref;

use crate::canonical::CanonicalForm;
use crate::error::{AlgebraError, Result};
use crate::generators::CFGenerator;
use crate::random::CFRandom;
use crate::variable::Variable;

/// Values for the variables of levels `min..=max`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Evaluation {
    min: i32,
    values: Vec<CanonicalForm>,
}

impl Evaluation {
    /// The point with all coordinates zero. The range may be empty
    /// (`max < min`).
    ///
    /// # Panics
    ///
    /// Panics if `min` is not an ordinary variable level.
    #[must_use]
    pub fn new(min: i32, max: i32) -> Self {
        assert!(min >= 1, "illegal variable level {min}");
        let n = usize::try_from(max - min + 1).unwrap_or(0);
        Self {
            min,
            values: vec![CanonicalForm::zero(); n],
        }
    }

    /// Lowest level covered.
    #[must_use]
    pub fn min(&self) -> i32 {
        self.min
    }

    /// Highest level covered.
    #[must_use]
    pub fn max(&self) -> i32 {
        self.min + i32::try_from(self.values.len()).unwrap_or(i32::MAX) - 1
    }

    fn index(&self, level: i32) -> Result<usize> {
        if level < self.min || level > self.max() {
            return Err(AlgebraError::IllegalLevel(level));
        }
        Ok((level - self.min).unsigned_abs() as usize)
    }

    /// The value of the variable at `level`.
    ///
    /// # Errors
    ///
    /// Returns `IllegalLevel` outside `min..=max`.
    pub fn get(&self, level: i32) -> Result<&CanonicalForm> {
        self.index(level).map(|i| &self.values[i])
    }

    /// Sets the value of the variable at `level`.
    ///
    /// # Errors
    ///
    /// Returns `IllegalLevel` outside `min..=max`.
    pub fn set(&mut self, level: i32, value: CanonicalForm) -> Result<()> {
        let i = self.index(level)?;
        self.values[i] = value;
        Ok(())
    }

    /// The coordinates, lowest level first.
    #[must_use]
    pub fn values(&self) -> &[CanonicalForm] {
        &self.values
    }

    /// Substitutes every covered variable of `f`.
    ///
    /// # Errors
    ///
    /// Returns `DomainMismatch` if a value does not combine with the
    /// coefficients of `f`.
    pub fn evaluate(&self, f: &CanonicalForm) -> Result<CanonicalForm> {
        self.evaluate_range(f, self.min, self.max())
    }

    /// Substitutes the covered variables with levels in `lo..=hi`.
    ///
    /// # Errors
    ///
    /// Returns `IllegalLevel` if the range leaves `min..=max`, and
    /// `DomainMismatch` as [`Evaluation::evaluate`].
    pub fn evaluate_range(&self, f: &CanonicalForm, lo: i32, hi: i32) -> Result<CanonicalForm> {
        let mut result = f.clone();
        for level in (lo..=hi).rev() {
            let value = self.get(level)?;
            result = result.eval_var(value, &Variable::new(level))?;
        }
        Ok(result)
    }

    /// Moves every coordinate one step: `a_i -> a_i + 1`.
    pub fn next_point(&mut self) {
        for v in &mut self.values {
            *v = &*v + 1;
        }
    }
}

/// Where the coordinates of an [`REvaluation`] come from.
#[derive(Clone)]
enum Source {
    Random(Box<dyn CFRandom>),
    /// One generator per coordinate, advanced like an odometer.
    Grid {
        digits: Vec<Box<dyn CFGenerator>>,
        started: bool,
        done: bool,
    },
}

/// An evaluation point whose coordinates are redrawn from a random source
/// or stepped through every point of a small field.
#[derive(Clone)]
pub struct REvaluation {
    point: Evaluation,
    source: Source,
}

impl REvaluation {
    /// A point over levels `min..=max` drawing from `gen`; all coordinates
    /// start at zero.
    ///
    /// # Panics
    ///
    /// Panics if `min` is not an ordinary variable level.
    #[must_use]
    pub fn new(min: i32, max: i32, gen: Box<dyn CFRandom>) -> Self {
        Self {
            point: Evaluation::new(min, max),
            source: Source::Random(gen),
        }
    }

    /// A point over levels `min..=max` that visits every combination of the
    /// items of `gen` once, in odometer order with the lowest level turning
    /// fastest.
    ///
    /// # Panics
    ///
    /// Panics if `min` is not an ordinary variable level.
    #[must_use]
    pub fn exhaustive(min: i32, max: i32, gen: &dyn CFGenerator) -> Self {
        let point = Evaluation::new(min, max);
        let digits = point
            .values
            .iter()
            .map(|_| {
                let mut g = gen.clone_box();
                g.reset();
                g
            })
            .collect();
        Self {
            point,
            source: Source::Grid {
                digits,
                started: false,
                done: false,
            },
        }
    }

    /// Moves to the next point: every coordinate is redrawn, or the
    /// enumeration steps once. Returns false when an enumeration has
    /// already visited every point.
    pub fn next_point(&mut self) -> bool {
        match &mut self.source {
            Source::Random(gen) => {
                for v in &mut self.point.values {
                    *v = gen.generate();
                }
                true
            }
            Source::Grid {
                digits,
                started,
                done,
            } => {
                if *done || digits.iter().any(|g| !g.has_next()) {
                    *done = true;
                    return false;
                }
                if !*started {
                    *started = true;
                } else if !odometer_step(digits) {
                    *done = true;
                    return false;
                }
                for (v, g) in self.point.values.iter_mut().zip(digits.iter()) {
                    *v = g.peek();
                }
                true
            }
        }
    }

    /// Moves to new points until `accept` holds, at most `tries` times.
    ///
    /// # Errors
    ///
    /// Returns `SearchExhausted` when no acceptable point was found, either
    /// within `tries` or before an enumeration ran out.
    pub fn next_point_where<F>(&mut self, tries: usize, mut accept: F) -> Result<()>
    where
        F: FnMut(&Evaluation) -> Result<bool>,
    {
        for attempt in 0..tries {
            if !self.next_point() {
                tracing::debug!(attempt, "every evaluation point visited");
                break;
            }
            if accept(&self.point)? {
                return Ok(());
            }
            tracing::trace!(attempt, "evaluation point rejected");
        }
        tracing::warn!(tries, "no acceptable evaluation point");
        Err(AlgebraError::SearchExhausted(format!(
            "no acceptable evaluation point in {tries} tries"
        )))
    }

    /// Sets one coordinate explicitly.
    ///
    /// # Errors
    ///
    /// Returns `IllegalLevel` outside the covered range.
    pub fn set(&mut self, level: i32, value: CanonicalForm) -> Result<()> {
        self.point.set(level, value)
    }
}

/// Advances the lowest digit, carrying into the next on wrap-around.
/// Returns false once every digit has wrapped.
fn odometer_step(digits: &mut [Box<dyn CFGenerator>]) -> bool {
    for g in digits.iter_mut() {
        g.advance();
        if g.has_next() {
            return true;
        }
        g.reset();
    }
    false
}

impl Deref for REvaluation {
    type Target = Evaluation;

    fn deref(&self) -> &Evaluation {
        &self.point
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::AlgebraContext;
    use crate::generators::FFGenerator;
    use crate::random::FFRandom;
    use canform_rings::FfElem;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn var(level: i32) -> CanonicalForm {
        CanonicalForm::from(Variable::new(level))
    }

    #[test]
    fn test_evaluate_range() {
        let mut e = Evaluation::new(2, 3);
        e.set(2, CanonicalForm::from(2)).unwrap();
        e.set(3, CanonicalForm::from(-1)).unwrap();
        let f = var(1) * var(2) + var(3).pow(2) * var(1);
        assert_eq!(e.evaluate(&f).unwrap(), var(1) * 3);
        assert_eq!(e.evaluate_range(&f, 3, 3).unwrap(), var(1) * var(2) + var(1));
        assert_eq!(e.get(4), Err(AlgebraError::IllegalLevel(4)));
    }

    #[test]
    fn test_next_point_increments() {
        let mut e = Evaluation::new(1, 2);
        e.next_point();
        e.next_point();
        assert_eq!(e.values(), &[CanonicalForm::from(2), CanonicalForm::from(2)]);
    }

    #[test]
    fn test_empty_range() {
        let e = Evaluation::new(2, 1);
        assert!(e.values().is_empty());
        assert_eq!(e.evaluate(&var(2)).unwrap(), var(2));
    }

    #[test]
    fn test_random_point() {
        let gen = Box::new(FFRandom::new(101, ChaCha8Rng::seed_from_u64(4)));
        let mut e = REvaluation::new(1, 3, gen);
        e.next_point_where(50, |p| Ok(!p.get(1)?.is_zero())).unwrap();
        assert!(!e.get(1).unwrap().is_zero());
        assert_eq!(e.max(), 3);

        let gen = Box::new(FFRandom::new(2, ChaCha8Rng::seed_from_u64(4)));
        let mut never = REvaluation::new(1, 1, gen);
        assert!(matches!(
            never.next_point_where(5, |_| Ok(false)),
            Err(AlgebraError::SearchExhausted(_))
        ));
    }

    #[test]
    fn test_exhaustive_points_cover_grid() {
        let mut e = REvaluation::exhaustive(2, 3, &FFGenerator::new(3));
        let mut seen = Vec::new();
        while e.next_point() {
            seen.push(e.values().to_vec());
        }
        assert_eq!(seen.len(), 9);
        assert_eq!(seen[0], vec![CanonicalForm::zero(), CanonicalForm::zero()]);
        // the lowest level turns fastest
        assert_eq!(seen[1][0], CanonicalForm::from_ff(FfElem::new(1, 3)));
        seen.sort();
        seen.dedup();
        assert_eq!(seen.len(), 9);
        assert!(!e.next_point());
    }

    #[test]
    fn test_exhaustive_search_stops_early() {
        // x2 * x3 = 1 over F_2 only at (1, 1), the last point of the grid
        let ctx = AlgebraContext::with_characteristic(2).unwrap();
        let mut e = REvaluation::exhaustive(2, 3, &FFGenerator::new(2));
        let f = ctx.map_into(&(var(2) * var(3))).unwrap();
        let one = CanonicalForm::from_ff(FfElem::new(1, 2));
        e.next_point_where(100, |p| Ok(p.evaluate(&f)? == one)).unwrap();
        assert_eq!(e.values(), &[one.clone(), one]);
        // nothing left to visit, so the budget is not spent
        assert!(matches!(
            e.next_point_where(100, |_| Ok(true)),
            Err(AlgebraError::SearchExhausted(_))
        ));
    }
}
