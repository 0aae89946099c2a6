#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(mut builder) = hellotap_utils::MapBuilder::new() else {
        return;
    };
    for chunk in data.chunks(8) {
        let _ = builder.insert(chunk, chunk);
    }
    let map = builder.freeze();
    for chunk in data.chunks(8) {
        let _ = map.lookup(chunk);
    }
});
