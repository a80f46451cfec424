#![no_main]
use libfuzzer_sys::fuzz_target;
use smsplate::{default_registry, parse_tokens, validate};

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        let parsed = parse_tokens(s);
        for token in &parsed.tokens {
            assert_eq!(&s[token.position..token.end()], token.raw);
        }

        let opens = s.matches('{').count();
        let closes = s.matches('}').count();
        assert_eq!(parsed.brace_balance_error, opens != closes);

        let _ = validate(s, default_registry());
    }
});
