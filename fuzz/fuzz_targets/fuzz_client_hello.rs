#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let mut conn = hellotap_tls::Connection::new();
    let _ = conn.recv_handshake_message(data);
    if let Some(ch) = conn.client_hello() {
        let mut out = [0u8; 64];
        let _ = ch.get_raw_bytes(&mut out);
        let _ = ch.get_cipher_suites(&mut out);
        let _ = ch.get_extensions(&mut out);
    }
    let _ = conn.wipe();
});
