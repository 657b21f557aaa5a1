#![no_main]
use libfuzzer_sys::fuzz_target;
use mathmark_syntax::{SourceLines, probe_block, scan_block, scan_inline, tokenize};

fuzz_target!(|data: &[u8]| {
    let s = String::from_utf8_lossy(data);

    let tokens = tokenize(&s);
    for token in &tokens {
        assert!(token.span.end <= s.len());
    }

    for pos in 0..s.len() {
        if let Some(n) = scan_inline(&s, pos, s.len()).consumed() {
            assert!(n > 0 && pos + n <= s.len());
        }
    }

    let lines = SourceLines::new(&s);
    for line in 0..lines.len() {
        if probe_block(&lines, line) {
            let _ = scan_block(&lines, line, lines.len(), 0);
        }
    }
});
