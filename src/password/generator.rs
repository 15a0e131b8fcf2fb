//! Random password generation for record passwords.

use rand::seq::{IndexedRandom, SliceRandom};

use crate::errors::{PassVaultError, Result};

/// Shortest password that can hold one character of every class.
pub const MIN_LENGTH: usize = 4;

/// Length used when the caller has no preference.
pub const DEFAULT_LENGTH: usize = 24;

const DIGITS: &[u8] = b"0123456789";
const SYMBOLS: &[u8] = b"!\"#$%&'()*+,-./:;<=>?@[\\]^_`{|}~";
const LOWERCASE: &[u8] = b"abcdefghijklmnopqrstuvwxyz";
const UPPERCASE: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Generate a password of exactly `length` characters.
///
/// The result always contains at least one digit, one ASCII symbol, one
/// lowercase and one uppercase letter.  The other characters are drawn
/// uniformly from all four classes and the whole sequence is shuffled.
pub fn generate_password(length: usize) -> Result<String> {
    if length < MIN_LENGTH {
        return Err(PassVaultError::InvalidPasswordLength {
            min: MIN_LENGTH,
            got: length,
        });
    }

    let mut rng = rand::rng();
    let alphabet: Vec<u8> = [DIGITS, SYMBOLS, LOWERCASE, UPPERCASE].concat();

    let mut password: Vec<u8> = Vec::with_capacity(length);
    for class in [DIGITS, SYMBOLS, LOWERCASE, UPPERCASE] {
        password.extend(class.choose(&mut rng));
    }
    password.extend((MIN_LENGTH..length).filter_map(|_| alphabet.choose(&mut rng)));

    password.shuffle(&mut rng);

    // Every byte comes from the ASCII tables above.
    Ok(password.into_iter().map(char::from).collect())
}
