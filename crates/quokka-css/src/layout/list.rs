//! List markers.
//!
//! [§ 12.5 Lists](https://www.w3.org/TR/CSS2/generate.html#lists)
//!
//! "An element with 'display: list-item' generates a principal block box
//! for the element's content and, depending on the values of
//! 'list-style-type' and 'list-style-image', possibly also a marker box as
//! a visual indication that the element is a list item."

use crate::style::ListStyleType;

/// [§ 12.6.2 Lists: the 'list-style-type' property](https://www.w3.org/TR/CSS2/generate.html#propdef-list-style-type)
///
/// The marker string for `ordinal`, or `None` for `list-style-type: none`.
#[must_use]
pub fn marker_text(style: ListStyleType, ordinal: i32) -> Option<String> {
    let text = match style {
        ListStyleType::None => return None,
        ListStyleType::Disc => "\u{2022}".to_string(),
        ListStyleType::Circle => "\u{25e6}".to_string(),
        ListStyleType::Square => "\u{25aa}".to_string(),
        ListStyleType::Decimal => format!("{ordinal}."),
        ListStyleType::LowerAlpha => format!("{}.", alphabetic(ordinal).to_ascii_lowercase()),
        ListStyleType::UpperAlpha => format!("{}.", alphabetic(ordinal)),
        ListStyleType::LowerRoman => format!("{}.", roman(ordinal).to_ascii_lowercase()),
        ListStyleType::UpperRoman => format!("{}.", roman(ordinal)),
    };
    Some(text)
}

/// "lower-latin or lower-alpha: Lowercase ascii letters (a, b, c, ... z)."
///
/// Bijective base 26: 27 is `AA`. Values below 1 fall back to decimal, as
/// the alphabet has no zero.
fn alphabetic(ordinal: i32) -> String {
    if ordinal < 1 {
        return ordinal.to_string();
    }
    let mut n = ordinal.unsigned_abs();
    let mut letters = Vec::new();
    while n > 0 {
        n -= 1;
        letters.push(char::from(b'A' + (n % 26) as u8));
        n /= 26;
    }
    letters.iter().rev().collect()
}

/// "upper-roman: Uppercase roman numerals (I, II, III, IV, V, etc.)."
///
/// Roman numerals cover 1 to 3999; other values fall back to decimal.
fn roman(ordinal: i32) -> String {
    const NUMERALS: [(u32, &str); 13] = [
        (1000, "M"),
        (900, "CM"),
        (500, "D"),
        (400, "CD"),
        (100, "C"),
        (90, "XC"),
        (50, "L"),
        (40, "XL"),
        (10, "X"),
        (9, "IX"),
        (5, "V"),
        (4, "IV"),
        (1, "I"),
    ];
    if !(1..4000).contains(&ordinal) {
        return ordinal.to_string();
    }
    let mut n = ordinal.unsigned_abs();
    let mut out = String::new();
    for (value, numeral) in NUMERALS {
        while n >= value {
            out.push_str(numeral);
            n -= value;
        }
    }
    out
}
