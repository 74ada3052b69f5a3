//! Time-series utilities: raw-record normalization, sampling-step
//! inference, and the completeness audit.

/// Completeness audit against an inferred or declared sampling step.
pub mod completeness;
/// Sampling-step inference from observed timestamps.
pub mod infer;
/// Projection of raw wire records into the canonical bar table.
pub mod normalize;
