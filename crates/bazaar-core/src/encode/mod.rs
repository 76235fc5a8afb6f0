//! JPEG encoding for reducer candidates.
//!
//! The reducer only ever targets JPEG, so this is the single lossy
//! encoder in the crate.

mod jpeg;

pub use jpeg::{encode_decoded, encode_jpeg, EncodeError};
