//! Bazaar Core - listing photo processing
//!
//! This crate holds the photo pipeline of the Bazaar marketplace backend:
//! the content-type allow-list, decoding and canonicalization of uploads,
//! the size reducer that squeezes a photo under a byte ceiling, and the
//! upload store that persists the result for a product listing.
//!
//! The HTTP router, sessions and the SQL layer live outside this crate and
//! only call into [`store::PhotoStore`] (or [`reduce`] directly).
//!
//! Logging goes through `tracing`; installing a subscriber is left to the
//! host binary.

pub mod decode;
pub mod encode;
pub mod mime;
pub mod reduce;
pub mod store;

pub use mime::{ImageMime, ALLOWED_CONTENT_TYPES};
pub use reduce::{
    reduce, reduce_with_report, Attempt, ReduceError, ReduceOptions, ReduceOutcome, ReduceReport,
    DEFAULT_CEILING,
};
pub use store::{PhotoStore, PhotoStoreConfig, StoreError, StoredPhoto};
