//! # Phone Normalization
//!
//! Canonicalizes the inconsistently formatted phone digits that come back
//! from the spreadsheet store.
//!
//! ## Why This Exists
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                 One Number, Four Stored Shapes                          │
//! │                                                                         │
//! │  "081234567890"   typed with the leading zero                           │
//! │  "81234567890"    stored as a NUMERIC cell — leading zero dropped       │
//! │  "6281234567890"  already in international form                         │
//! │  "0812-3456-7890" typed with separators                                 │
//! │                                                                         │
//! │  to_international(..) -> "6281234567890"   (wa.me link target)          │
//! │  to_display(..)       -> "081234567890"    (printed on the receipt)     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Both functions are pure and total: a number that matches no branch is
//! passed through untouched. That is documented, accepted lossy behavior —
//! an ambiguous number is not an error.

/// Indonesian country calling code, the only one the store serves.
pub const COUNTRY_CODE: &str = "62";

/// Strips every non-digit character.
fn clean_digits(raw: &str) -> String {
    raw.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Normalizes raw digits to international form (`62...`), the shape
/// `wa.me` links require.
///
/// ## Branches
/// - starts with `62`            -> unchanged (already canonical)
/// - starts with `0`             -> leading `0` replaced with `62`
/// - bare 9–12 digits            -> `62` prepended (numeric cell lost the
///   leading zero)
/// - anything else               -> passthrough, uncorrected
///
/// ## Example
/// ```rust
/// use nota_core::phone::to_international;
///
/// assert_eq!(to_international("081234567890"), "6281234567890");
/// assert_eq!(to_international("81234567890"), "6281234567890");
/// assert_eq!(to_international("6281234567890"), "6281234567890");
/// assert_eq!(to_international("12345"), "12345");
/// ```
pub fn to_international(raw: &str) -> String {
    let digits = clean_digits(raw);

    if digits.starts_with(COUNTRY_CODE) {
        digits
    } else if let Some(rest) = digits.strip_prefix('0') {
        format!("{COUNTRY_CODE}{rest}")
    } else if (9..=12).contains(&digits.len()) {
        format!("{COUNTRY_CODE}{digits}")
    } else {
        digits
    }
}

/// Normalizes raw digits to the local display form (`0...`), the shape
/// printed on receipts.
///
/// ## Example
/// ```rust
/// use nota_core::phone::to_display;
///
/// assert_eq!(to_display("6281234567890"), "081234567890");
/// assert_eq!(to_display("0812 3456 7890"), "081234567890");
/// ```
pub fn to_display(raw: &str) -> String {
    let digits = clean_digits(raw);

    if let Some(rest) = digits.strip_prefix(COUNTRY_CODE) {
        format!("0{rest}")
    } else {
        digits
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_leading_zero_form() {
        assert_eq!(to_international("081234567890"), "6281234567890");
    }

    #[test]
    fn test_bare_form_lost_leading_zero() {
        // 11 digits: the numeric spreadsheet cell ate the leading zero
        assert_eq!(to_international("81234567890"), "6281234567890");
        // Boundary lengths of the recovery branch
        assert_eq!(to_international("123456789"), "62123456789");
        assert_eq!(to_international("123456789012"), "62123456789012");
    }

    #[test]
    fn test_already_canonical() {
        assert_eq!(to_international("6281234567890"), "6281234567890");
    }

    #[test]
    fn test_ambiguous_passthrough() {
        assert_eq!(to_international("12345"), "12345");
        assert_eq!(to_international("1234567890123"), "1234567890123");
        assert_eq!(to_international(""), "");
    }

    #[test]
    fn test_separators_stripped() {
        assert_eq!(to_international("0812-3456-7890"), "6281234567890");
        assert_eq!(to_international("+62 812 3456 7890"), "6281234567890");
    }

    #[test]
    fn test_display_form() {
        assert_eq!(to_display("6281234567890"), "081234567890");
        assert_eq!(to_display("081234567890"), "081234567890");
        assert_eq!(to_display("12345"), "12345");
    }

    #[test]
    fn test_idempotent() {
        let once = to_international("081234567890");
        assert_eq!(to_international(&once), once);

        let display_once = to_display("6281234567890");
        assert_eq!(to_display(&display_once), display_once);
    }
}
