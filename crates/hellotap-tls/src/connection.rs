//! Connection-side intake of handshake messages.
//!
//! The enclosing connection owns one [`ClientHelloRecord`] by value and
//! drives it through the receive / inspect / wipe / teardown lifecycle.
//! This layer also strips the handshake message header (type byte plus
//! 24-bit length) before the body reaches the parser; the outer TLS record
//! header is the transport's problem and never arrives here.

use hellotap_types::TlsError;

use crate::client_hello::ClientHelloRecord;

/// Handshake message type, as carried in the message header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandshakeType {
    ClientHello,
}

/// Parse a handshake header: msg_type(1) || length(3).
/// Returns (HandshakeType, body_slice, total_bytes_consumed).
pub fn parse_handshake_header(data: &[u8]) -> Result<(HandshakeType, &[u8], usize), TlsError> {
    if data.len() < 4 {
        return Err(TlsError::MalformedMessage(
            "handshake header too short".into(),
        ));
    }
    let msg_type = match data[0] {
        1 => HandshakeType::ClientHello,
        other => {
            return Err(TlsError::HandshakeFailed(format!(
                "unexpected handshake type: {other}"
            )))
        }
    };
    let length = ((data[1] as usize) << 16) | ((data[2] as usize) << 8) | (data[3] as usize);
    let total = 4 + length;
    if data.len() < total {
        return Err(TlsError::MalformedMessage(
            "handshake message body truncated".into(),
        ));
    }
    Ok((msg_type, &data[4..total], total))
}

/// Per-connection handshake intake state.
///
/// Single-threaded per connection: no internal locking, no blocking.
/// Distinct connections are independent values and may live on different
/// threads.
#[derive(Default)]
pub struct Connection {
    client_hello: ClientHelloRecord,
}

impl Connection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deliver one complete handshake message (header included). Only
    /// ClientHello is consumed at this layer; the buffering that assembles
    /// a complete message out of records is the transport's job.
    pub fn recv_handshake_message(&mut self, msg: &[u8]) -> Result<(), TlsError> {
        let (msg_type, body, _) = parse_handshake_header(msg)?;
        match msg_type {
            HandshakeType::ClientHello => self.client_hello.parse(body),
        }
    }

    /// The captured ClientHello, or `None` if none has been processed since
    /// the connection was created or last wiped. The reference is owned by
    /// the connection; [`Connection::wipe`] invalidates its contents.
    pub fn client_hello(&self) -> Option<&ClientHelloRecord> {
        if self.client_hello.has_message() {
            Some(&self.client_hello)
        } else {
            None
        }
    }

    /// Reuse hook: wipe the captured message, keeping the allocation for
    /// the next handshake on this connection.
    pub fn wipe(&mut self) -> Result<(), TlsError> {
        self.client_hello.wipe()
    }
}

impl Drop for Connection {
    fn drop(&mut self) {
        // Teardown: zero the retained message before the storage is freed.
        self.client_hello.release();
    }
}
