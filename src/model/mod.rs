//! Sound-model types the resampler works on.
//!
//! Breakpoints and the partials built from them, the piecewise-linear timing
//! curve used for warped resampling, and the phase helpers that keep recorded
//! phases and frequencies consistent.

/// Single control point of a partial.
pub mod breakpoint;
/// Piecewise-linear timing curve.
pub mod envelope;
/// Time-ordered breakpoint envelopes.
pub mod partial;
pub mod phasefix;

pub use breakpoint::Breakpoint;
pub use envelope::LinearEnvelope;
pub use partial::Partial;
pub use phasefix::{fix_frequency, fix_phase_forward, phase_travel, wrap_pi};
