//! String-literal escaping for generated script text.
//!
//! Commands reach the document as script source, so every string argument is
//! embedded as a double-quoted literal produced by [`string_literal`]. The
//! escape set mirrors what a script string literal can contain:
//!
//! | Character | Escape |
//! |-----------|--------|
//! | `\` | `\\` |
//! | `"` | `\"` |
//! | newline, carriage return, tab | `\n`, `\r`, `\t` |
//! | backspace, form feed | `\b`, `\f` |
//! | other C0 controls, DEL | `\u00XX` |
//! | U+2028, U+2029 | `\u2028`, `\u2029` |
//!
//! Everything else, including non-ASCII text, is copied verbatim.

use std::fmt::{self, Write};

/// Returns `value` as a double-quoted script string literal.
///
/// # Examples
///
/// ```
/// use synoptic_core::script::string_literal;
///
/// assert_eq!(string_literal("a/b/c"), r#""a/b/c""#);
/// assert_eq!(string_literal(r#"say "hi""#), r#""say \"hi\"""#);
/// assert_eq!(string_literal(r"C:\dir"), r#""C:\\dir""#);
/// ```
pub fn string_literal(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    write_string_literal(&mut out, value).expect("Writing to String buffer is infallible");
    out
}

/// Writes `value` as a double-quoted script string literal into `out`.
pub fn write_string_literal<W: Write>(out: &mut W, value: &str) -> fmt::Result {
    out.write_char('"')?;
    for c in value.chars() {
        match c {
            '\\' => out.write_str("\\\\")?,
            '"' => out.write_str("\\\"")?,
            '\n' => out.write_str("\\n")?,
            '\r' => out.write_str("\\r")?,
            '\t' => out.write_str("\\t")?,
            '\u{08}' => out.write_str("\\b")?,
            '\u{0C}' => out.write_str("\\f")?,
            '\u{2028}' | '\u{2029}' => write!(out, "\\u{:04x}", c as u32)?,
            c if c.is_ascii_control() => write!(out, "\\u{:04x}", c as u32)?,
            c => out.write_char(c)?,
        }
    }
    out.write_char('"')
}


#[cfg(test)]
mod proptest_tests {
    use proptest::prelude::*;

    use super::*;

    // ===================
    // Property Test Functions
    // ===================

    /// The literal body never contains an unescaped quote or a raw line break.
    fn check_literal_is_closed(value: String) -> Result<(), TestCaseError> {
        let literal = string_literal(&value);
        prop_assert!(literal.starts_with('"') && literal.ends_with('"'));
        prop_assert!(literal.len() >= 2);

        let body = &literal[1..literal.len() - 1];
        let separators = ['\n', '\r', '\u{2028}', '\u{2029}'];
        prop_assert!(
            !body.contains(&separators[..]),
            "raw line separator in {}",
            literal
        );

        let mut escaped = false;
        for c in body.chars() {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else {
                prop_assert_ne!(c, '"', "unescaped quote in {}", literal);
            }
        }
        prop_assert!(!escaped, "dangling escape in {}", literal);
        Ok(())
    }

    /// Decoding the literal as JSON (a subset of script string syntax)
    /// restores the original value.
    fn check_literal_decodes(value: String) -> Result<(), TestCaseError> {
        let literal = string_literal(&value);
        let decoded: String = serde_json::from_str(&literal)
            .map_err(|err| TestCaseError::fail(format!("{literal}: {err}")))?;
        prop_assert_eq!(decoded, value);
        Ok(())
    }

    // ===================
    // Proptest Wrappers
    // ===================

    proptest! {
        #[test]
        fn literal_is_closed(value in any::<String>()) {
            check_literal_is_closed(value)?;
        }

        #[test]
        fn literal_decodes(value in any::<String>()) {
            check_literal_decodes(value)?;
        }
    }
}
