#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        let documents = yaml_cst::parse(s);
        assert!(!documents.is_empty());

        let mut offset = 0;
        let mut rebuilt = String::with_capacity(s.len());
        for document in &documents {
            assert_eq!(document.range.start, offset);
            offset = document.range.end;
            rebuilt.push_str(document.raw);
            for node in document.root.iter().chain(&document.stray) {
                assert!(document.range.contains(node.range));
            }
            let _ = document.errors();
        }
        assert_eq!(rebuilt, s);
    }
});
