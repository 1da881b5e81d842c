#![no_main]
use libfuzzer_sys::fuzz_target;
use xmlarbor::lexer::Lexer;
use xmlarbor::Document;

fuzz_target!(|data: &[u8]| {
    // Byte input goes through encoding detection; neither path may panic.
    let _ = Document::parse_bytes(data);
    if let Ok(s) = std::str::from_utf8(data) {
        for token in Lexer::new(s) {
            if token.is_err() {
                break;
            }
        }
    }
});
