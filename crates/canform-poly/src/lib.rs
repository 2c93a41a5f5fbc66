//! # canform-poly
//!
//! Recursive canonical-form polynomials over exact coefficient domains.
//!
//! This crate provides:
//! - Variables identified by level, with bands for the base domain,
//!   transcendentals and algebraic extensions
//! - `CanonicalForm`, a value type that is an integer, rational, finite
//!   field element, Galois field element, prime power residue or a sparse
//!   recursive polynomial over any of them
//! - Term iteration, arithmetic, division with remainder and evaluation
//! - An explicit `AlgebraContext` carrying the coefficient domain, switches,
//!   GCD strategy and random seed
//! - Point generators and random sources over finite fields and extensions
//! - Chinese remaindering, pseudo-division, GCDs and resultants
//!
//! ## Representation
//!
//! A polynomial node stores its terms for the main variable in descending
//! exponent order; every coefficient is again a canonical form in strictly
//! lower variables. Small integers are stored unboxed, everything else is
//! shared behind an `Arc`.
//!
//! ```text
//! x^2*y + 3*x  =  y^1 * (x^2)  +  y^0 * (3*x)      (level y = 2, x = 1)
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod algorithms;
mod arith;
pub mod canonical;
pub mod chinese;
pub mod context;
pub mod error;
pub mod evaluation;
pub mod generators;
pub mod iter;
pub mod map;
pub mod modpk;
mod ops;
pub mod random;
mod scalar;
pub mod util;
pub mod variable;

#[cfg(test)]
mod proptests;

pub use algorithms::determinant::{bareiss_det, PARALLEL_ROWS};
pub use algorithms::gcd::{
    bextgcd, bgcd, blcm, content, content_in, extgcd, gcd, gcd_poly, gcd_with_config, icontent,
    lcm, pp, vcontent, GcdConfig,
};
pub use algorithms::pseudo::{b_common_den, euclidean_norm, fdivides, max_norm, psq, psqr, psr};
pub use algorithms::resultant::{resultant, sub_res_chain};
pub use canonical::CanonicalForm;
pub use context::{AlgebraContext, Domain, GcdStrategy, Switch};
pub use error::{AlgebraError, Result};
pub use evaluation::{Evaluation, REvaluation};
pub use generators::{AlgExtGenerator, CFGenFactory, CFGenerator, FFGenerator, GFGenerator};
pub use iter::CFIterator;
pub use map::{CFMap, MapPair};
pub use modpk::ModPk;
pub use util::{coeffs_in, from_coeffs_in, get_vars, map_coeffs, total_degree};
pub use random::{AlgExtRandomF, CFRandom, CFRandomFactory, FFRandom, GFRandom, IntRandom, PpRandom};
pub use variable::{Variable, LEVELBASE, LEVELEXPR, LEVELQUOT, LEVELTRANS};
