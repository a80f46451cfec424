#![no_main]
use libfuzzer_sys::fuzz_target;
use smsplate::{RecipientRecord, Template};

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        let template = Template::new(s);

        // Missing fields leave the body untouched
        assert_eq!(template.render(&RecipientRecord::new()), s);

        let record = RecipientRecord::new()
            .with("prenom", "{nom}")
            .with("nom", "Silva");
        let _ = template.render(&record);
    }
});
