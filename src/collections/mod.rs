//! Shared-ownership containers for partials.
//!
//! `CowPtr` is the reference-counted copy-on-write handle; `EnvelopeList`
//! is the ordered list of partials built on it. Both are single-threaded by
//! construction (`Rc` counts), so neither is `Send`.

/// Reference-counted copy-on-write handle.
pub mod cow;
/// Copy-on-write list of partials.
pub mod envelope_list;

pub use cow::{CowClone, CowPtr};
pub use envelope_list::EnvelopeList;
