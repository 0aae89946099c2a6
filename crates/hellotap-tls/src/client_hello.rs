//! ClientHello capture: parse, retained raw message, bounded accessors.
//!
//! The record retains the exact ClientHello body bytes for later application
//! inspection, with the 32-byte client random zeroed in the retained copy so
//! the accessor surface never reveals the live nonce. The cipher-suite list
//! and extension block are spans into the retained buffer, never separate
//! allocations, so they can never outlive or leak past the buffer they
//! describe.

use hellotap_types::TlsError;
use zeroize::Zeroize;

use crate::buffer::MessageBuffer;

/// Protocol version field length.
pub const PROTOCOL_VERSION_LEN: usize = 2;
/// Client random field length.
pub const RANDOM_LEN: usize = 32;
/// Maximum legal session-id length.
pub const SESSION_ID_MAX_LEN: usize = 32;

/// A sub-range of the retained raw message. `len == 0` means absent.
#[derive(Debug, Clone, Copy, Default)]
struct Span {
    start: usize,
    len: usize,
}

/// Captured ClientHello for one connection.
///
/// Embedded by value in the enclosing connection, never separately
/// allocated. The backing buffer is allocated lazily on first parse and
/// retained (wiped, not freed) across connection reuse.
#[derive(Default)]
pub struct ClientHelloRecord {
    raw_message: MessageBuffer,
    cipher_suites: Span,
    extensions: Span,
    compression_methods: u8,
}

impl ClientHelloRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a ClientHello has been captured since the last wipe.
    pub fn has_message(&self) -> bool {
        !self.raw_message.is_empty()
    }

    /// Parse a complete ClientHello body (outer record and handshake
    /// headers already stripped by the caller) and retain it.
    ///
    /// The fixed structure is validated in wire order; every violation
    /// reports a distinct [`TlsError::MalformedMessage`] reason. On failure
    /// the record reads as absent, never half-constructed. Trailing bytes
    /// past the declared structure are retained but not exposed.
    pub fn parse(&mut self, body: &[u8]) -> Result<(), TlsError> {
        self.raw_message.clear();
        self.cipher_suites = Span::default();
        self.extensions = Span::default();
        self.compression_methods = 0;

        let err = |msg: &str| TlsError::MalformedMessage(format!("ClientHello: {msg}"));
        let mut pos = 0;

        // protocol version (2); recorded, version negotiation is external
        if body.len() < pos + PROTOCOL_VERSION_LEN {
            return Err(err("too short for protocol version"));
        }
        pos += PROTOCOL_VERSION_LEN;

        // client random (32); zeroed in the retained copy below
        if body.len() < pos + RANDOM_LEN {
            return Err(err("too short for random"));
        }
        let random_start = pos;
        pos += RANDOM_LEN;

        // session id: 1-byte length (0..=32), then that many bytes
        if body.len() < pos + 1 {
            return Err(err("too short for session id length"));
        }
        let sid_len = body[pos] as usize;
        pos += 1;
        if sid_len > SESSION_ID_MAX_LEN {
            return Err(err("session id length out of range"));
        }
        if body.len() < pos + sid_len {
            return Err(err("truncated session id"));
        }
        pos += sid_len;

        // cipher suites: 2-byte length, non-zero, even
        if body.len() < pos + 2 {
            return Err(err("too short for cipher suite list length"));
        }
        let cs_len = u16::from_be_bytes([body[pos], body[pos + 1]]) as usize;
        pos += 2;
        if cs_len == 0 {
            return Err(err("empty cipher suite list"));
        }
        if cs_len % 2 != 0 {
            return Err(err("odd cipher suite list length"));
        }
        if body.len() < pos + cs_len {
            return Err(err("truncated cipher suite list"));
        }
        let cipher_suites = Span {
            start: pos,
            len: cs_len,
        };
        pos += cs_len;

        // compression methods: 1-byte count, first method retained
        if body.len() < pos + 1 {
            return Err(err("too short for compression methods length"));
        }
        let comp_len = body[pos] as usize;
        pos += 1;
        if body.len() < pos + comp_len {
            return Err(err("truncated compression methods"));
        }
        let compression_methods = if comp_len > 0 { body[pos] } else { 0 };
        pos += comp_len;

        // extensions: 2-byte length (may be zero). A message ending before
        // the length field is legal (no extensions), and trailing bytes
        // past the block are ignored for forward compatibility.
        let extensions = if body.len() >= pos + 2 {
            let ext_len = u16::from_be_bytes([body[pos], body[pos + 1]]) as usize;
            pos += 2;
            if body.len() < pos + ext_len {
                return Err(err("truncated extensions"));
            }
            Span {
                start: pos,
                len: ext_len,
            }
        } else {
            Span::default()
        };

        self.raw_message.write(body)?;
        self.raw_message.as_mut_slice()[random_start..random_start + RANDOM_LEN].zeroize();
        self.cipher_suites = cipher_suites;
        self.extensions = extensions;
        self.compression_methods = compression_methods;
        Ok(())
    }

    fn copy_out(src: &[u8], out: &mut [u8]) -> usize {
        let n = src.len().min(out.len());
        out[..n].copy_from_slice(&src[..n]);
        n
    }

    fn span_slice(&self, span: Span) -> &[u8] {
        &self.raw_message.as_slice()[span.start..span.start + span.len]
    }

    /// Copy up to `out.len()` bytes of the retained message (client random
    /// already zeroed) into `out`, returning the bytes copied.
    ///
    /// Truncation is silent by contract: a short `out` yields a short copy
    /// of the message prefix, never an error.
    pub fn get_raw_bytes(&self, out: &mut [u8]) -> usize {
        Self::copy_out(self.raw_message.as_slice(), out)
    }

    /// Copy the offered cipher-suite list; same truncating contract as
    /// [`ClientHelloRecord::get_raw_bytes`].
    pub fn get_cipher_suites(&self, out: &mut [u8]) -> usize {
        Self::copy_out(self.span_slice(self.cipher_suites), out)
    }

    /// Copy the raw extension block (type, length, and payload of each
    /// extension, undecoded); same truncating contract as
    /// [`ClientHelloRecord::get_raw_bytes`].
    pub fn get_extensions(&self, out: &mut [u8]) -> usize {
        Self::copy_out(self.span_slice(self.extensions), out)
    }

    /// Retained message length, for callers sizing exact output buffers.
    pub fn raw_len(&self) -> usize {
        self.raw_message.len()
    }

    /// Cipher-suite list length in bytes.
    pub fn cipher_suites_len(&self) -> usize {
        self.cipher_suites.len
    }

    /// Extension block length in bytes.
    pub fn extensions_len(&self) -> usize {
        self.extensions.len
    }

    /// First compression method offered. Returns `0` both for the null
    /// method and when the message declared an empty compression-method
    /// list; callers needing to tell those apart must inspect the raw
    /// bytes. Stale after a wipe; callers must not rely on it between a
    /// wipe and the next parse.
    pub fn compression_methods(&self) -> u8 {
        self.compression_methods
    }

    /// Connection-reuse hook: zero the backing buffer, retain it at its
    /// standard size, and clear the derived views so stale spans can never
    /// be read again.
    ///
    /// The views are cleared before the buffer is touched: a wipe that
    /// fails to resize the backing still leaves the record reading as
    /// absent, never as a half-wiped message.
    pub fn wipe(&mut self) -> Result<(), TlsError> {
        self.cipher_suites = Span::default();
        self.extensions = Span::default();
        self.raw_message.wipe()
    }

    /// Teardown hook: zero and free the backing buffer.
    pub fn release(&mut self) {
        self.raw_message.release();
        self.cipher_suites = Span::default();
        self.extensions = Span::default();
    }

    /// Backing storage size, independent of the captured message length.
    pub fn raw_backing_len(&self) -> usize {
        self.raw_message.backing().len()
    }
}
