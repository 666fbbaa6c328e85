//! Short slug generation and validation.
//!
//! Generated slugs are lowercase ASCII letters drawn from a cryptographically
//! secure generator. Custom slugs are user-supplied and only checked for
//! character set and length; uniqueness is enforced by the store.

use rand::Rng;
use regex::Regex;
use std::sync::LazyLock;

/// Length of generated slugs when none is configured.
pub const DEFAULT_SLUG_LENGTH: usize = 6;

/// Longest slug accepted from a user.
pub const MAX_SLUG_LENGTH: usize = 50;

const ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz";

static SLUG_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]{1,50}$").unwrap());

/// Generates a random slug of exactly `length` lowercase letters.
///
/// Each character is sampled independently and uniformly from `a..=z` using
/// the thread-local CSPRNG, which is seeded from the operating system.
/// Collisions are expected at short lengths; callers retry on a unique
/// violation reported by the store.
///
/// # Examples
///
/// ```ignore
/// let slug = generate_slug(6);
/// assert_eq!(slug.len(), 6);
/// assert!(slug.chars().all(|c| c.is_ascii_lowercase()));
/// ```
pub fn generate_slug(length: usize) -> String {
    let mut rng = rand::rng();

    (0..length)
        .map(|_| ALPHABET[rng.random_range(0..ALPHABET.len())] as char)
        .collect()
}

/// Returns true if `candidate` is 1-50 characters of `[A-Za-z0-9_-]`.
pub fn is_valid_slug(candidate: &str) -> bool {
    SLUG_REGEX.is_match(candidate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_generate_default_length() {
        let slug = generate_slug(DEFAULT_SLUG_LENGTH);
        assert_eq!(slug.len(), 6);
        assert!(slug.chars().all(|c| c.is_ascii_lowercase()));
    }

    #[test]
    fn test_generate_custom_lengths() {
        for length in [1, 2, 10, 32, 50] {
            let slug = generate_slug(length);
            assert_eq!(slug.len(), length);
            assert!(slug.chars().all(|c| c.is_ascii_lowercase()), "{slug}");
        }
    }

    #[test]
    fn test_generate_is_not_deterministic() {
        let slugs: HashSet<String> = (0..100).map(|_| generate_slug(12)).collect();
        assert!(slugs.len() > 1);
    }

    #[test]
    fn test_generated_slugs_are_valid() {
        for _ in 0..100 {
            assert!(is_valid_slug(&generate_slug(DEFAULT_SLUG_LENGTH)));
        }
    }

    #[test]
    fn test_valid_slugs() {
        assert!(is_valid_slug("validslug"));
        assert!(is_valid_slug("valid-slug_123"));
        assert!(is_valid_slug("123"));
        assert!(is_valid_slug("MixedCase"));
        assert!(is_valid_slug("a"));
        assert!(is_valid_slug(&"x".repeat(MAX_SLUG_LENGTH)));
    }

    #[test]
    fn test_invalid_slugs() {
        assert!(!is_valid_slug(""));
        assert!(!is_valid_slug(&"x".repeat(51)));
        assert!(!is_valid_slug("hello world"));
        assert!(!is_valid_slug("hello#world"));
        assert!(!is_valid_slug("slug/with/slash"));
        assert!(!is_valid_slug("trailing\n"));
        assert!(!is_valid_slug("ünïcode"));
    }

    #[test]
    fn test_validation_is_pure() {
        for _ in 0..3 {
            assert!(is_valid_slug("repeatable"));
            assert!(!is_valid_slug("not repeatable"));
        }
    }
}
