//! CSRF `state` values for the authorization-code flow
//!
//! The state travels with the authorization URL and must come back
//! unchanged with the authorization code.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use rand::Rng;
use subtle::ConstantTimeEq;

/// Number of random bytes behind each state value (43 chars once encoded)
const STATE_BYTES: usize = 32;

/// Generate a random, URL-safe state token
#[must_use]
pub fn generate_state() -> String {
    let mut rng = rand::thread_rng();
    let random_bytes: Vec<u8> = (0..STATE_BYTES).map(|_| rng.gen()).collect();
    URL_SAFE_NO_PAD.encode(random_bytes)
}

/// Compare the state sent with the authorization request against the one
/// received with the code, in constant time
#[must_use]
pub fn validate_state(expected: &str, actual: &str) -> bool {
    expected.as_bytes().ct_eq(actual.as_bytes()).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_is_url_safe() {
        let state = generate_state();

        assert_eq!(state.len(), 43);
        assert!(!state.contains('='));
        assert!(!state.contains('+'));
        assert!(!state.contains('/'));
    }

    #[test]
    fn test_states_are_unique() {
        assert_ne!(generate_state(), generate_state());
    }

    #[test]
    fn test_validate_state() {
        let state = generate_state();

        assert!(validate_state(&state, &state.clone()));
        assert!(!validate_state(&state, "tampered"));
        assert!(!validate_state("abc", "abcd"));
        assert!(!validate_state("abc", ""));
        assert!(validate_state("", ""));
    }
}
