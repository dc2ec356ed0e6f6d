//! Short code generation.
//!
//! Codes are drawn uniformly from the ASCII alphanumeric alphabet. A draw is
//! not unique on its own; [`crate::application::services::LinkService`]
//! re-draws when a code is already taken.

use rand::Rng;
use rand::distr::Alphanumeric;

/// Number of characters in a generated code.
pub const CODE_LENGTH: usize = 6;

/// Source of candidate short codes.
///
/// The registry only depends on this trait, so tests can script the exact
/// sequence of draws.
pub trait CodeGenerator: Send + Sync {
    /// Returns the next candidate code.
    fn generate(&self) -> String;
}

/// [`CodeGenerator`] backed by the thread-local random number generator.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomCodeGenerator;

impl CodeGenerator for RandomCodeGenerator {
    fn generate(&self) -> String {
        generate_code()
    }
}

/// Generates a random [`CODE_LENGTH`]-character alphanumeric code.
///
/// # Examples
///
/// ```ignore
/// let code = generate_code();
/// assert_eq!(code.len(), 6);
/// assert!(code.chars().all(|c| c.is_ascii_alphanumeric()));
/// ```
pub fn generate_code() -> String {
    generate_code_with(&mut rand::rng())
}

/// Generates a code from the given random source.
pub fn generate_code_with<R: Rng>(rng: &mut R) -> String {
    (0..CODE_LENGTH)
        .map(|_| char::from(rng.sample(Alphanumeric)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::HashSet;

    #[test]
    fn test_generate_code_has_correct_length() {
        assert_eq!(generate_code().len(), CODE_LENGTH);
    }

    #[test]
    fn test_generate_code_is_url_safe() {
        for _ in 0..100 {
            let code = generate_code();
            assert!(code.chars().all(|c| c.is_ascii_alphanumeric()));
        }
    }

    #[test]
    fn test_generate_code_mostly_unique() {
        let codes: HashSet<String> = (0..1000).map(|_| generate_code()).collect();

        // 62^6 possibilities; a handful of collisions would already be suspicious.
        assert!(codes.len() >= 998);
    }

    #[test]
    fn test_seeded_generation_is_deterministic() {
        let first = generate_code_with(&mut StdRng::seed_from_u64(7));
        let second = generate_code_with(&mut StdRng::seed_from_u64(7));

        assert_eq!(first, second);
    }

    #[test]
    fn test_random_code_generator_uses_alphabet() {
        let code = RandomCodeGenerator.generate();
        assert_eq!(code.len(), CODE_LENGTH);
        assert!(code.chars().all(|c| c.is_ascii_alphanumeric()));
    }
}
