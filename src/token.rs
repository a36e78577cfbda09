use std::fmt::Debug;

use rand::Rng;

/// Alphabet used for login token values.
pub const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// Produces random token values of a requested length.
///
/// The token store only relies on this capability; swapping the implementation
/// lets tests script the produced values (for example to force a collision).
pub trait TokenGenerator: Send + Sync + Debug {
    fn generate(&self, length: usize) -> String;
}

/// Default generator drawing uniformly from [`CHARSET`] with a CSPRNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlphanumericGenerator;

impl TokenGenerator for AlphanumericGenerator {
    fn generate(&self, length: usize) -> String {
        generate_secure_token(length)
    }
}

/// Generate a cryptographically secure random token.
///
/// Creates a random alphanumeric string of the specified length suitable for
/// use as a single-use login token.
///
/// # Arguments
/// * `length` - The desired length of the token (typically 32 or 64 characters)
///
/// # Returns
/// A string containing random alphanumeric characters (A-Z, a-z, 0-9)
pub fn generate_secure_token(length: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..length)
        .map(|_| {
            let idx = rng.gen_range(0..CHARSET.len());
            CHARSET[idx] as char
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_generate_secure_token_length() {
        let token = generate_secure_token(64);
        assert_eq!(token.len(), 64);
    }

    #[test]
    fn test_generate_secure_token_alphanumeric() {
        let token = generate_secure_token(64);
        assert!(token.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn test_generate_secure_token_zero_length_is_empty() {
        assert!(generate_secure_token(0).is_empty());
    }

    #[test]
    fn test_alphanumeric_generator_produces_distinct_values() {
        // 62^32 possible values, a repeat among 10k draws would mean a broken RNG
        let generator = AlphanumericGenerator;
        let values: HashSet<String> = (0..10_000).map(|_| generator.generate(32)).collect();
        assert_eq!(values.len(), 10_000);
    }
}
