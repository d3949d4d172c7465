//! Certificate ID scheme: `YY-XXXXXX`.
//!
//! Two-digit year, a hyphen, then six characters drawn uniformly from
//! `[A-Z0-9]`. There is no uniqueness check; 36^6 combinations per year
//! keep collisions unlikely at issuing volumes.

use rand::Rng;

const ALPHABET: &[u8; 36] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
const RANDOM_LEN: usize = 6;

/// Builds a certificate ID for `year` using `rng` for the random part.
pub fn certificate_id<R: Rng>(year: i32, rng: &mut R) -> String {
    let mut id = format!("{:02}-", year.rem_euclid(100));
    id.extend((0..RANDOM_LEN).map(|_| char::from(ALPHABET[rng.gen_range(0..ALPHABET.len())])));
    id
}

/// Returns `true` if `id` has the shape this scheme generates.
///
/// Stored certificates may carry hand-entered IDs of any shape, so this is
/// informational only.
#[must_use]
pub fn is_generated_shape(id: &str) -> bool {
    let bytes = id.as_bytes();
    bytes.len() == 3 + RANDOM_LEN
        && bytes[..2].iter().all(u8::is_ascii_digit)
        && bytes[2] == b'-'
        && bytes[3..].iter().all(|b| b.is_ascii_uppercase() || b.is_ascii_digit())
}
