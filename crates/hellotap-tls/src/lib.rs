#![forbid(unsafe_code)]
#![doc = "TLS ClientHello ingestion and introspection for hellotap."]

pub mod buffer;
pub mod client_hello;
pub mod connection;

pub use client_hello::ClientHelloRecord;
pub use connection::{parse_handshake_header, Connection, HandshakeType};
