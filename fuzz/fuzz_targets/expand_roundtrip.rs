#![no_main]
use libfuzzer_sys::fuzz_target;
use prefix_codec::{compress, expand};

fuzz_target!(|data: (Vec<String>, String)| {
    let (mut words, blob) = data;

    // Arbitrary text must fail cleanly, never panic.
    let _ = expand(&blob);

    words.retain(|w| !w.chars().any(char::is_control));
    words.sort();
    let encoded = match compress(&words) {
        Ok(encoded) => encoded,
        Err(_) => return,
    };
    assert_eq!(expand(&encoded).unwrap(), words);
});
