#![no_main]
use libfuzzer_sys::fuzz_target;
use xmlarbor::parser::parse_str;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        // Anything the parser accepts must serialize to text it accepts again,
        // and a second pass must not change that text.
        if let Ok(doc) = parse_str(s) {
            let output = doc.serialize(2);
            let again = parse_str(&output).expect("reparse of serialized output failed");
            assert_eq!(again.serialize(2), output, "serialization is not idempotent");
        }
    }
});
