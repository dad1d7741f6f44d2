//! Evaluator interface: encoded position in, priors and value out.

use c4_core::COLS;
use c4_features::F;

/// Opaque position evaluator.
///
/// - the prior vector holds one weight per column; it need not be
///   normalized, callers renormalize over the legal columns
/// - `value` is in [-1, 1] from the encoded side-to-move's perspective
pub trait Evaluator {
    fn eval(&self, features: &[f32; F]) -> ([f32; COLS], f32);
}

/// Flat priors + zero value (baseline stub).
pub struct UniformEvaluator;

impl Evaluator for UniformEvaluator {
    fn eval(&self, _features: &[f32; F]) -> ([f32; COLS], f32) {
        ([1.0 / COLS as f32; COLS], 0.0)
    }
}
