#![no_main]

use dit::domain::ports::{CredentialResolver, LiteralCredentialResolver};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(raw) = std::str::from_utf8(data) {
        if let Ok(credentials) = LiteralCredentialResolver.resolve(raw) {
            // Anything accepted must satisfy the credential invariants.
            assert!(credentials.validate().is_ok());
            assert!(!credentials.user().is_empty());
            assert!(!credentials.host().is_empty());
            assert_ne!(credentials.port(), 0);
        }
    }
});
