use crate::error::GeneratorError;
use crate::Generator;
use rand::Rng;
use tinylink_core::shortcode::{MAX_LENGTH, MIN_LENGTH};
use tinylink_core::ShortCode;

/// The 62 symbols a generated code is drawn from.
pub const ALPHABET: &[u8; 62] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// Length of generated codes unless configured otherwise.
pub const DEFAULT_LENGTH: usize = 6;

/// Draws each character independently and uniformly from [`ALPHABET`]
/// using the thread-local RNG.
///
/// With the default length there are 62^6 (about 56.8 billion) codes, so
/// collisions are rare but possible.
#[derive(Debug, Clone, Copy)]
pub struct RandomGenerator {
    length: usize,
}

impl RandomGenerator {
    /// Creates a generator producing 6-character codes.
    pub fn new() -> Self {
        Self {
            length: DEFAULT_LENGTH,
        }
    }

    /// Creates a generator producing codes of `length` characters.
    ///
    /// The length must lie within the short code format, 6 to 8 characters.
    pub fn with_length(length: usize) -> Result<Self, GeneratorError> {
        if !(MIN_LENGTH..=MAX_LENGTH).contains(&length) {
            return Err(GeneratorError::InvalidLength {
                length,
                min: MIN_LENGTH,
                max: MAX_LENGTH,
            });
        }
        Ok(Self { length })
    }

    /// Length of every code this generator produces.
    pub fn length(&self) -> usize {
        self.length
    }
}

impl Default for RandomGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl Generator for RandomGenerator {
    type Output = ShortCode;

    fn generate(&self) -> Self::Output {
        let mut rng = rand::rng();
        let code: String = (0..self.length)
            .map(|_| ALPHABET[rng.random_range(0..ALPHABET.len())] as char)
            .collect();
        ShortCode::new_unchecked(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::{HashMap, HashSet};

    #[test]
    fn generates_six_alphanumeric_characters() {
        let generator = RandomGenerator::new();

        for _ in 0..1_000 {
            let code = generator.generate();
            assert_eq!(code.as_str().len(), 6);
            assert!(ShortCode::is_valid(code.as_str()), "{code}");
        }
    }

    #[test]
    fn consecutive_codes_differ() {
        let generator = RandomGenerator::new();
        let codes: HashSet<String> = (0..1_000)
            .map(|_| generator.generate().as_str().to_owned())
            .collect();

        assert_eq!(codes.len(), 1_000);
    }

    #[test]
    fn every_symbol_is_reachable() {
        let generator = RandomGenerator::new();
        let mut counts: HashMap<char, usize> = HashMap::new();

        for _ in 0..10_000 {
            for c in generator.generate().as_str().chars() {
                *counts.entry(c).or_default() += 1;
            }
        }

        // 60_000 draws over 62 symbols: roughly 968 each.
        assert_eq!(counts.len(), ALPHABET.len());
        for (symbol, count) in counts {
            assert!(count > 500, "symbol {symbol} drawn only {count} times");
        }
    }

    #[test]
    fn configurable_length() {
        let generator = RandomGenerator::with_length(8).unwrap();
        assert_eq!(generator.generate().as_str().len(), 8);
    }

    #[test]
    fn rejects_lengths_outside_code_format() {
        assert_eq!(
            RandomGenerator::with_length(5).unwrap_err(),
            GeneratorError::InvalidLength {
                length: 5,
                min: 6,
                max: 8
            }
        );
        assert!(RandomGenerator::with_length(9).is_err());
    }

    #[test]
    fn generator_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<RandomGenerator>();
    }
}
