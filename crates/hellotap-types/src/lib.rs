#![forbid(unsafe_code)]
#![doc = "Common error types for hellotap."]

pub mod error;

pub use error::*;
