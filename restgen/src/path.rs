//! Route path escaping.

use std::fmt::Display;

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

/// Characters left unescaped in a path segment (RFC 3986 unreserved).
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Renders a route parameter as one escaped path segment.
///
/// Slashes are escaped too, so a value can never add segments to the route.
///
/// ```
/// assert_eq!(restgen::path::escape(&"a/b c"), "a%2Fb%20c");
/// assert_eq!(restgen::path::escape(&42), "42");
/// ```
pub fn escape<V: Display + ?Sized>(value: &V) -> String {
    utf8_percent_encode(&value.to_string(), PATH_SEGMENT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unreserved_characters_pass_through() {
        assert_eq!(escape("bert-base_uncased.v1~2"), "bert-base_uncased.v1~2");
    }

    #[test]
    fn reserved_characters_are_escaped() {
        assert_eq!(escape("rust-lang/rust"), "rust-lang%2Frust");
        assert_eq!(escape("a?b#c"), "a%3Fb%23c");
    }

    #[test]
    fn unicode_is_utf8_encoded() {
        assert_eq!(escape("café"), "caf%C3%A9");
    }
}
