//! Uniform-grid resampling and quantization of partials.

pub mod resampler;

pub use resampler::{Resampler, DEFAULT_MAX_FIX_PCT, QUANTIZE_FADE_TIME, QUANTIZE_MAX_FIX_PCT};
