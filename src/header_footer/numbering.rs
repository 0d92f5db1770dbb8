//! Page number formatting in Arabic, Roman and letter numerals

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

const THOUSANDS: [&str; 4] = ["", "M", "MM", "MMM"];
const HUNDREDS: [&str; 10] = ["", "C", "CC", "CCC", "CD", "D", "DC", "DCC", "DCCC", "CM"];
const TENS: [&str; 10] = ["", "X", "XX", "XXX", "XL", "L", "LX", "LXX", "LXXX", "XC"];
const ONES: [&str; 10] = ["", "I", "II", "III", "IV", "V", "VI", "VII", "VIII", "IX"];

/// Largest page number Roman numerals can express
pub const MAX_ROMAN: i64 = 3999;

/// Numeral system used for page numbers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PageNumberFormat {
    /// 1, 2, 3
    #[default]
    Arabic,
    /// I, II, III
    Roman,
    /// a, b, c ... z, aa, ab
    Letters,
}

impl PageNumberFormat {
    /// Human readable sample of the format
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Arabic => "1, 2, 3",
            Self::Roman => "I, II, III",
            Self::Letters => "a, b, c",
        }
    }

    /// Format a page number, never failing.
    ///
    /// Roman numbers outside 1..=3999 fall back to their Arabic form.
    pub fn format(&self, number: i64) -> String {
        match self {
            Self::Arabic => number.to_string(),
            Self::Roman => to_roman(number).unwrap_or_else(|_| number.to_string()),
            Self::Letters => to_letters(number),
        }
    }

    /// Format a page number, rejecting numbers the system cannot represent
    pub fn try_format(&self, number: i64) -> Result<String> {
        match self {
            Self::Roman => to_roman(number),
            _ => Ok(self.format(number)),
        }
    }
}

impl fmt::Display for PageNumberFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Arabic => "arabic",
            Self::Roman => "roman",
            Self::Letters => "letter",
        };
        f.write_str(name)
    }
}

/// Classical Roman numerals for 1..=3999
pub fn to_roman(number: i64) -> Result<String> {
    if !(1..=MAX_ROMAN).contains(&number) {
        return Err(Error::UnsupportedNumeral {
            number,
            format: PageNumberFormat::Roman,
        });
    }

    let n = number as usize;
    let mut result = String::with_capacity(16);
    result.push_str(THOUSANDS[n / 1000]);
    result.push_str(HUNDREDS[(n % 1000) / 100]);
    result.push_str(TENS[(n % 100) / 10]);
    result.push_str(ONES[n % 10]);
    Ok(result)
}

/// Bijective base-26 letters, spreadsheet-column style.
///
/// `1 -> "a"`, `26 -> "z"`, `27 -> "aa"`. Non-positive numbers give `""`.
pub fn to_letters(number: i64) -> String {
    let mut letters = Vec::new();
    let mut n = number;
    while n > 0 {
        let rem = ((n - 1) % 26) as u8;
        letters.push((b'a' + rem) as char);
        n = (n - 1) / 26;
    }
    letters.iter().rev().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arabic() {
        assert_eq!(PageNumberFormat::Arabic.format(1), "1");
        assert_eq!(PageNumberFormat::Arabic.format(42), "42");
        assert_eq!(PageNumberFormat::Arabic.format(0), "0");
        assert_eq!(PageNumberFormat::Arabic.format(-3), "-3");
    }

    #[test]
    fn test_roman() {
        let cases = [
            (1, "I"),
            (3, "III"),
            (4, "IV"),
            (9, "IX"),
            (14, "XIV"),
            (40, "XL"),
            (90, "XC"),
            (400, "CD"),
            (1994, "MCMXCIV"),
            (2024, "MMXXIV"),
            (3999, "MMMCMXCIX"),
        ];
        for (n, expected) in cases {
            assert_eq!(PageNumberFormat::Roman.format(n), expected, "n = {}", n);
        }
    }

    #[test]
    fn test_roman_out_of_range_is_rejected() {
        for n in [0, -1, 4000, 10_000] {
            let err = PageNumberFormat::Roman.try_format(n).unwrap_err();
            assert!(matches!(err, Error::UnsupportedNumeral { number, .. } if number == n));
        }
    }

    #[test]
    fn test_roman_out_of_range_falls_back_to_arabic() {
        assert_eq!(PageNumberFormat::Roman.format(4000), "4000");
        assert_eq!(PageNumberFormat::Roman.format(0), "0");
    }

    #[test]
    fn test_letters_bijective_edges() {
        let cases = [
            (1, "a"),
            (2, "b"),
            (26, "z"),
            (27, "aa"),
            (28, "ab"),
            (52, "az"),
            (53, "ba"),
            (702, "zz"),
            (703, "aaa"),
        ];
        for (n, expected) in cases {
            assert_eq!(PageNumberFormat::Letters.format(n), expected, "n = {}", n);
        }
    }

    #[test]
    fn test_letters_non_positive_is_empty() {
        assert_eq!(to_letters(0), "");
        assert_eq!(to_letters(-5), "");
        assert_eq!(PageNumberFormat::Letters.try_format(0).unwrap(), "");
    }

    #[test]
    fn test_display_names() {
        assert_eq!(PageNumberFormat::Arabic.display_name(), "1, 2, 3");
        assert_eq!(PageNumberFormat::Roman.display_name(), "I, II, III");
        assert_eq!(PageNumberFormat::Letters.display_name(), "a, b, c");
    }
}
