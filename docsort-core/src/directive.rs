//! Directive tokenizer.
//!
//! Grammar: `token (',' token)*` with `token = ['-'] fieldname`. No trimming,
//! quoting or escaping; names are matched exactly.

/// Leading character that flips a token to descending order.
pub const DESCENDING_MARKER: char = '-';

/// One parsed directive entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortToken<'a> {
    pub field_name: &'a str,
    pub descending: bool,
}

impl<'a> SortToken<'a> {
    pub fn parse(raw: &'a str) -> Self {
        match raw.strip_prefix(DESCENDING_MARKER) {
            Some(rest) => SortToken {
                field_name: rest,
                descending: true,
            },
            None => SortToken {
                field_name: raw,
                descending: false,
            },
        }
    }
}

/// Splits a directive into tokens, preserving order. Empty segments come
/// back as empty field names; the registry filter drops them.
pub fn tokenize(directive: &str) -> impl Iterator<Item = SortToken<'_>> {
    directive.split(',').map(SortToken::parse)
}
