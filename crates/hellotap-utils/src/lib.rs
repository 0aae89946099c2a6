#![forbid(unsafe_code)]
#![doc = "Utility structures for hellotap: flood-resistant byte-keyed map."]

pub mod bytemap;

pub use bytemap::{BytesMap, MapBuilder};
