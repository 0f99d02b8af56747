use base64::{engine::general_purpose::STANDARD, Engine as _};
use proptest::prelude::*;
use shim::web::{compute_webhook_hmac, verify_webhook_hmac};
use shim::ApiSecret;

proptest! {
    #[test]
    fn computed_signature_is_accepted(
        secret in proptest::collection::vec(any::<u8>(), 1..64),
        body in proptest::collection::vec(any::<u8>(), 0..512),
    ) {
        let secret = ApiSecret::new(secret);
        let signature = compute_webhook_hmac(&secret, &body);
        prop_assert!(verify_webhook_hmac(&secret, &body, Some(&signature)));
    }

    #[test]
    fn mutated_digest_is_rejected(
        secret in proptest::collection::vec(any::<u8>(), 1..64),
        body in proptest::collection::vec(any::<u8>(), 0..512),
        index in 0usize..32,
        flip in 1u8..=255,
    ) {
        let secret = ApiSecret::new(secret);
        let mut digest = STANDARD.decode(compute_webhook_hmac(&secret, &body)).unwrap();
        digest[index] ^= flip;
        let tampered = STANDARD.encode(&digest);
        prop_assert!(!verify_webhook_hmac(&secret, &body, Some(&tampered)));
    }

    #[test]
    fn other_secret_is_rejected(
        secret in proptest::collection::vec(any::<u8>(), 1..64),
        other in proptest::collection::vec(any::<u8>(), 1..64),
        body in proptest::collection::vec(any::<u8>(), 0..512),
    ) {
        // HMAC pads short keys with zeros, so keys differing only in trailing zeros collide.
        let trimmed = |k: &[u8]| k.iter().rposition(|b| *b != 0).map(|i| k[..=i].to_vec());
        prop_assume!(trimmed(&secret) != trimmed(&other));
        let signature = compute_webhook_hmac(&ApiSecret::new(other), &body);
        prop_assert!(!verify_webhook_hmac(&ApiSecret::new(secret), &body, Some(&signature)));
    }
}
