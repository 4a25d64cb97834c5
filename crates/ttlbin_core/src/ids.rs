//! Paste identifier generation.
//!
//! Identifiers are drawn from the operating system CSPRNG.

use crate::constants::PASTE_ID_LEN;
use rand::distributions::Distribution;
use rand::rngs::OsRng;
use rand::Rng;

/// URL-safe alphabet (64 symbols, 6 bits per character).
const ALPHABET: &[u8; 64] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789_-";

/// Samples single identifier characters or whole identifiers.
pub struct IdAlphabet;

impl Distribution<char> for IdAlphabet {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> char {
        ALPHABET[rng.gen_range(0..ALPHABET.len())] as char
    }
}

/// Generate a fresh paste identifier of [`PASTE_ID_LEN`] characters.
pub fn generate_id() -> String {
    OsRng.sample_iter(IdAlphabet).take(PASTE_ID_LEN).collect()
}

/// Whether `id` could have been produced by [`generate_id`].
///
/// Lets callers skip storage for obviously bogus lookups.
pub fn is_well_formed(id: &str) -> bool {
    id.len() == PASTE_ID_LEN && id.bytes().all(|b| ALPHABET.contains(&b))
}
