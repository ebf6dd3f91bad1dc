pub mod collections; // Copy-on-write handle and partial lists
pub mod error;
pub mod model; // Breakpoints, partials, timing envelopes
pub mod resample; // Grid resampling and quantization

pub use collections::{CowClone, CowPtr, EnvelopeList};
pub use error::{Error, ErrorCategory, Result};
pub use model::{Breakpoint, LinearEnvelope, Partial};
pub use resample::Resampler;
