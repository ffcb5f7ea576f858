/*************************************************************************************************
 *
 * Fingerprint function
 * -------------------
 *
 * Maps a value's canonical text form to a fixed-width decimal digest. The digest is the product
 * of each character's position in a 100-character alphabet (the printable ASCII characters in
 * the order digits, lowercase, uppercase, punctuation, whitespace), rendered in decimal, padded
 * or truncated to 128 characters, then parsed back as an unbounded integer.
 *
 * This function is reproducible, not strong. Known weaknesses, kept on purpose:
 *
 *    '0' sits at alphabet position zero, so any input containing '0' multiplies the
 *      accumulator down to 0 and every such input shares a single digest.
 *    Multiplication commutes, so anagrams collide ("novelty" and "yeotlvn" hash identically).
 *    The final parse drops leading zeros from the padded text, so the printed digest can be
 *      shorter than 128 characters even though the padded form is always exactly 128.
 *
 * Digest equality is numeric. Declared digests arriving as text are parsed into the same
 * representation before comparison, so leading zeros never cause a spurious mismatch.
 *
 *************************************************************************************************/

use std::fmt;
use std::str::FromStr;

use num_bigint::BigUint;
use num_traits::{One, ToPrimitive};

/// Position zero is '0'; positions 10-35 are lowercase, 36-61 uppercase, 62-93 punctuation,
/// 94-99 the whitespace characters space, TAB, LF, CR, VT, FF.
pub const ALPHABET: &str =
    "0123456789abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ!\"#$%&'()*+,-./:;<=>?@[\\]^_`{|}~ \t\n\r\u{b}\u{c}";

/// Width of the digest's padded decimal form.
const DIGEST_WIDTH: usize = 128;

// ***********************************************************************************************

#[derive(Debug, PartialEq, Eq)]
pub enum HashError {
    UnhashableCharacter(char),
}

impl fmt::Display for HashError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            HashError::UnhashableCharacter(character) => write!(
                f,
                "Character {:?} is not in the fingerprint alphabet",
                character
            ),
        }
    }
}

// ***********************************************************************************************

/// Fingerprint digest. Printed form is decimal and at most 128 characters; it can be shorter
/// when the padded text carried leading zeros.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Digest(BigUint);

impl Digest {
    /// Remainder of the digest's numeric value; the chained table uses this for bucket
    /// placement.
    pub fn remainder(&self, modulus: usize) -> usize {
        (&self.0 % modulus)
            .to_usize()
            .expect("Internal error: remainder below modulus exceeds usize")
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Digest {
    type Err = num_bigint::ParseBigIntError;

    fn from_str(text: &str) -> Result<Digest, Self::Err> {
        Ok(Digest(text.parse()?))
    }
}

// ***********************************************************************************************

/// Values with a canonical text form the fingerprint function accepts: text is taken literally,
/// numbers in decimal form, tuples in literal form with quoted text items.
pub trait CanonicalText {
    fn canonical_text(&self) -> String;

    /// Form used when the value appears inside a tuple.
    fn literal_text(&self) -> String {
        self.canonical_text()
    }
}

impl CanonicalText for str {
    fn canonical_text(&self) -> String {
        self.to_string()
    }

    fn literal_text(&self) -> String {
        format!("'{}'", self)
    }
}

impl CanonicalText for String {
    fn canonical_text(&self) -> String {
        self.clone()
    }

    fn literal_text(&self) -> String {
        format!("'{}'", self)
    }
}

impl CanonicalText for i64 {
    fn canonical_text(&self) -> String {
        self.to_string()
    }
}

impl CanonicalText for f64 {
    fn canonical_text(&self) -> String {
        self.to_string()
    }
}

impl<T: CanonicalText + ?Sized> CanonicalText for &T {
    fn canonical_text(&self) -> String {
        (**self).canonical_text()
    }

    fn literal_text(&self) -> String {
        (**self).literal_text()
    }
}

impl<A: CanonicalText, B: CanonicalText> CanonicalText for (A, B) {
    fn canonical_text(&self) -> String {
        format!("({}, {})", self.0.literal_text(), self.1.literal_text())
    }
}

impl<A: CanonicalText, B: CanonicalText, C: CanonicalText> CanonicalText for (A, B, C) {
    fn canonical_text(&self) -> String {
        format!(
            "({}, {}, {})",
            self.0.literal_text(),
            self.1.literal_text(),
            self.2.literal_text()
        )
    }
}

// ***********************************************************************************************

pub fn fingerprint<T: CanonicalText + ?Sized>(value: &T) -> Result<Digest, HashError> {
    let text = value.canonical_text();

    let mut product = BigUint::one();
    for character in text.chars() {
        let position = ALPHABET
            .find(character)
            .ok_or(HashError::UnhashableCharacter(character))?;
        product *= BigUint::from(position);
    }

    let mut digits = product.to_string();
    if digits.len() < DIGEST_WIDTH {
        for number in 0..DIGEST_WIDTH - digits.len() {
            digits.push(pad_digit(number));
        }
    } else if digits.len() > DIGEST_WIDTH {
        digits.truncate(DIGEST_WIDTH);
    }

    let parsed: BigUint = digits
        .parse()
        .expect("Internal error parsing padded digest in hashing::fingerprint");
    Ok(Digest(parsed))
}

// Padding sequence: index 0,1,2,... reduced to a single digit. Indices above 99 divide by 100,
// indices above 9 divide by 10. The padding never runs past index 127, so one reduction is
// always enough.
fn pad_digit(index: usize) -> char {
    let mut index = index;
    if index > 99 {
        index /= 100;
    } else if index > 9 {
        index /= 10;
    }
    (b'0' + index as u8) as char
}

/* *****************************************************************************************************************
 *
 * Tests
 *
 * *****************************************************************************************************************/

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alphabet_layout() {
        assert_eq!(ALPHABET.chars().count(), 100);
        assert_eq!(ALPHABET.find('0'), Some(0));
        assert_eq!(ALPHABET.find('9'), Some(9));
        assert_eq!(ALPHABET.find('a'), Some(10));
        assert_eq!(ALPHABET.find('z'), Some(35));
        assert_eq!(ALPHABET.find('A'), Some(36));
        assert_eq!(ALPHABET.find('Z'), Some(61));
        assert_eq!(ALPHABET.find(' '), Some(94));
        assert_eq!(ALPHABET.find('\u{c}'), Some(99));
    }

    #[test]
    fn deterministic() {
        let first = fingerprint("console.log('Hello World')").unwrap();
        let second = fingerprint("console.log('Hello World')").unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn anagrams_collide() {
        let novelty = fingerprint("novelty").unwrap();
        assert_eq!(novelty, fingerprint("yeotlvn").unwrap());
        assert_eq!(novelty, fingerprint("voetlny").unwrap());
        assert!(novelty.remainder(16) < 16);
    }

    #[test]
    fn zero_character_collapses_product() {
        let zero = fingerprint("0").unwrap();
        assert_eq!(fingerprint("a0b").unwrap(), zero);
        assert_eq!(fingerprint("10").unwrap(), zero);
    }

    #[test]
    fn single_character_padded_form() {
        // Product for "a" is 10; the remaining 126 characters are the fixed padding sequence.
        let mut expected = String::from("10");
        expected.push_str("0123456789");
        for digit in 1..=9u32 {
            for _ in 0..10 {
                expected.push(char::from_digit(digit, 10).unwrap());
            }
        }
        expected.push_str(&"1".repeat(26));
        assert_eq!(expected.len(), 128);
        assert_eq!(fingerprint("a").unwrap().to_string(), expected);
    }

    #[test]
    fn leading_zeros_dropped_from_printed_digest() {
        // Product for "0" is 0, so the padded text starts "00..." and numeric parsing
        // shortens the printed form to 126 characters.
        let digest = fingerprint("0").unwrap().to_string();
        assert_eq!(digest.len(), 126);
        assert!(digest.starts_with("123456789"));
    }

    #[test]
    fn long_input_truncates_to_width() {
        let long = "z".repeat(90);
        let digest = fingerprint(long.as_str()).unwrap();
        assert_eq!(digest.to_string().len(), 128);
        assert_eq!(digest, fingerprint(long.as_str()).unwrap());
    }

    #[test]
    fn character_outside_alphabet_fails() {
        assert_eq!(
            fingerprint("café").unwrap_err(),
            HashError::UnhashableCharacter('é')
        );
    }

    #[test]
    fn tuple_literal_form() {
        assert_eq!(("a", 1i64).canonical_text(), "('a', 1)");
        assert_eq!(
            fingerprint(&("a", 1i64)).unwrap(),
            fingerprint("('a', 1)").unwrap()
        );
    }

    #[test]
    fn declared_digest_comparison_is_numeric() {
        let padded: Digest = "0123".parse().unwrap();
        let bare: Digest = "123".parse().unwrap();
        assert_eq!(padded, bare);
    }
}
