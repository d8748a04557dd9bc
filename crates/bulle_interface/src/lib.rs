//! Trait definitions for the Bulle comic-script toolkit.
//!
//! Stage callers talk to text-generation backends only through
//! [`BulleDriver`], so tests and alternative providers plug in without
//! touching the pipeline.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod traits;

pub use traits::BulleDriver;
