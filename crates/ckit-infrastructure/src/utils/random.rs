//! Random value helpers

use ckit_domain::constants::{BASIC_CHARS, COMPLEX_CHARS, NUMS, SALT_ROUNDS};
use rand::Rng;

fn generate(len: usize, chars: &str) -> String {
    let pool = chars.as_bytes();
    let mut rng = rand::rng();
    (0..len)
        .map(|_| char::from(pool[rng.random_range(0..pool.len())]))
        .collect()
}

/// Random digits, `SALT_ROUNDS` long by default
pub fn make_random_numbers(len: Option<usize>) -> String {
    generate(len.unwrap_or(SALT_ROUNDS), NUMS)
}

/// Random alphanumeric string, `SALT_ROUNDS` long by default
pub fn make_random_string(len: Option<usize>) -> String {
    generate(len.unwrap_or(SALT_ROUNDS), BASIC_CHARS)
}

/// Random alphanumeric string with symbols, `SALT_ROUNDS` long by default
pub fn make_complex_random_string(len: Option<usize>) -> String {
    generate(len.unwrap_or(SALT_ROUNDS), COMPLEX_CHARS)
}

/// Random v4 UUID in hyphenated form
pub fn make_uuid() -> String {
    uuid::Uuid::new_v4().to_string()
}
