//! Two-stage signal evaluation: dip, then reversal.
//!
//! Only the two most recent frames matter. A condition whose inputs are not
//! yet defined is skipped, never treated as an error.

pub mod evaluator;

pub use evaluator::SignalEvaluator;
