//! Property tests for the connection descriptor grammar.

use proptest::prelude::*;

use dit::domain::ports::{CredentialResolver, LiteralCredentialResolver};
use dit::{CredentialsError, SecretKind};

fn user() -> impl Strategy<Value = String> {
    proptest::string::string_regex("[a-z][a-z0-9_]{0,15}").unwrap()
}

fn host() -> impl Strategy<Value = String> {
    proptest::string::string_regex("[a-z][a-z0-9-]{0,15}(\\.[a-z]{2,6}){0,2}").unwrap()
}

fn secret() -> impl Strategy<Value = String> {
    proptest::string::string_regex("[A-Za-z0-9+=#%^&]{1,24}").unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: Resolving never panics on arbitrary input.
    #[test]
    fn property_resolve_never_panics(s in "(?s).{0,256}") {
        let _ = LiteralCredentialResolver.resolve(&s);
    }

    /// PROPERTY: A well-formed password descriptor yields its parts.
    #[test]
    fn property_password_descriptor(
        user in user(),
        host in host(),
        port in 1u16..,
        password in secret(),
    ) {
        let raw = format!("ssh://{user}@{host}:{port}!{password}");
        let creds = LiteralCredentialResolver.resolve(&raw).unwrap();
        prop_assert_eq!(creds.user(), user.as_str());
        prop_assert_eq!(creds.host(), host.as_str());
        prop_assert_eq!(creds.port(), port);
        prop_assert_eq!(creds.password(), password.as_str());
        prop_assert_eq!(creds.secret_kind(), SecretKind::Password);
    }

    /// PROPERTY: Both secrets resolve, and the private key is tried first.
    #[test]
    fn property_key_then_password(
        user in user(),
        host in host(),
        key in secret(),
        password in secret(),
    ) {
        let raw = format!("ssh://{user}@{host}*{key}!{password}");
        let creds = LiteralCredentialResolver.resolve(&raw).unwrap();
        prop_assert_eq!(creds.private_key(), key.as_str());
        prop_assert_eq!(creds.password(), password.as_str());
        prop_assert_eq!(creds.port(), 22);
        prop_assert_eq!(creds.secret_kind(), SecretKind::PrivateKey);
    }

    /// PROPERTY: `!` before `*` is always an ordering error.
    #[test]
    fn property_password_before_key_rejected(
        user in user(),
        host in host(),
        key in secret(),
        password in secret(),
    ) {
        let raw = format!("ssh://{user}@{host}!{password}*{key}");
        let is_order_error = matches!(
            LiteralCredentialResolver.resolve(&raw),
            Err(CredentialsError::SecretOrder)
        );
        prop_assert!(is_order_error);
    }

    /// PROPERTY: Debug output never contains the password.
    #[test]
    fn property_debug_redacts_password(
        user in user(),
        host in host(),
        password in "[A-Z]{12,24}",
    ) {
        let raw = format!("ssh://{user}@{host}!{password}");
        let creds = LiteralCredentialResolver.resolve(&raw).unwrap();
        let debug = format!("{creds:?}");
        prop_assert!(!debug.contains(&password));
    }
}
