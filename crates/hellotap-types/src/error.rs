/// Handshake message ingestion errors.
///
/// A `MalformedMessage` is fatal to the handshake attempt, not the process:
/// the caller aborts the connection. Nothing here is retried or recovered
/// internally.
#[derive(Debug, thiserror::Error)]
pub enum TlsError {
    #[error("malformed message: {0}")]
    MalformedMessage(String),
    #[error("handshake failed: {0}")]
    HandshakeFailed(String),
    #[error("memory allocation failed")]
    MemAllocFail,
}

/// Byte-keyed map errors.
#[derive(Debug, thiserror::Error)]
pub enum MapError {
    #[error("duplicate key")]
    DuplicateKey,
    #[error("empty key")]
    EmptyKey,
    #[error("memory allocation failed")]
    MemAllocFail,
}
