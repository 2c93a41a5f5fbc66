//! # canform
//!
//! Exact multivariate polynomial algebra over a recursive canonical form.
//!
//! Polynomials are stored recursively by variable level, with small
//! integers unboxed and larger coefficients shared. On top of that
//! representation the layers provide:
//!
//! - **Integers and prime tables** (`canform-integers`)
//! - **Coefficient rings**: Z, Q, `F_p`, `GF(p^n)`, `Z/p^k` (`canform-rings`)
//! - **Polynomials**: arithmetic, evaluation, variable maps, GCD,
//!   resultants, random sources and generators (`canform-poly`)
//! - **Linear algebra**: determinants, linear systems, the incremental
//!   LGS solver (`canform-linalg`)
//! - **Factorization**: square-free, finite-field, integer, multivariate,
//!   algebraic-extension and absolute (`canform-factor`)
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use canform::prelude::*;
//!
//! let ctx = AlgebraContext::new();
//! let x = CanonicalForm::from(Variable::named(1, 'x'));
//! let f = x.pow(4) - 1;
//! let factors = factorize(&f, &ctx)?;
//! assert_eq!(factors.len(), 3);
//! ```
//!
//! All algorithms read their configuration from an explicit
//! [`AlgebraContext`](poly::AlgebraContext); there is no global state.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub use canform_factor as factor;
pub use canform_integers as integers;
pub use canform_linalg as linalg;
pub use canform_poly as poly;
pub use canform_rings as rings;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use canform_factor::{
        abs_factorize, factorize, factorize_over, find_irreducible, is_sqr_free, sqr_free,
        FactorConfig, Factorization,
    };
    pub use canform_integers::{Integer, Rational};
    pub use canform_linalg::{determinant, linear_system_solve, CFMatrix, Lgs};
    pub use canform_poly::{
        extgcd, gcd, gcd_poly, lcm, resultant, AlgebraContext, AlgebraError, CFRandom,
        CFRandomFactory, CanonicalForm, Domain, GcdStrategy, Result, Switch, Variable,
    };
    pub use canform_rings::{EuclideanDomain, Field, Ring};
}
