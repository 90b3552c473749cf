// SPDX-License-Identifier: PMPL-1.0-or-later
// Fuzz target for placeholder canonicalization and key construction

#![no_main]

use libfuzzer_sys::fuzz_target;
use qcache_key::canonical::placeholders;
use qcache_key::{BoundQuery, QueryKeyBuilder};

fuzz_target!(|data: &[u8]| {
    if let Ok(text) = std::str::from_utf8(data) {
        // Bind every placeholder found in the text to its own name
        let source = placeholders(text)
            .iter()
            .fold(BoundQuery::new(text), |q, p| q.bind_named(p.name, p.name));

        let builder = QueryKeyBuilder::default();
        let a = builder.build_from_source(&source, false, false).unwrap();
        let b = builder.build_from_source(&source, false, false).unwrap();

        assert_eq!(a, b);
        assert_eq!(a.fingerprint(), b.fingerprint());
        assert_eq!(
            placeholders(a.original_query()).len(),
            placeholders(a.canonical_query()).len()
        );
    }
});
