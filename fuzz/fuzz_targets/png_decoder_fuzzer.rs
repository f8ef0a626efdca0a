#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let options = rgb_png::DecodeOptions { max_chunks: 1024, ..Default::default() };
    let _ = rgb_png::decode_with_options(data, &options);
});
