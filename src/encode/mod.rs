//! Output encoding.
//!
//! Canvases are written either as lossless PNG (alpha kept) or as JPEG, which has no alpha and is
//! flattened over a background colour first.

/// PNG/JPEG writers.
pub(crate) mod writer;
