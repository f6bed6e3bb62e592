use thiserror::Error;

/// Failure while parsing a markup document into an element tree.
///
/// Positions are byte offsets into the input.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("Unexpected end of document")]
    UnexpectedEof,

    #[error("Unexpected character {found:?} at byte {pos}")]
    UnexpectedChar { found: char, pos: usize },

    #[error("Malformed tag name at byte {pos}")]
    BadTagName { pos: usize },

    #[error("Mismatched closing tag at byte {pos}: expected </{expected}>, found </{found}>")]
    MismatchedTag {
        expected: String,
        found: String,
        pos: usize,
    },

    #[error("Invalid entity reference at byte {pos}")]
    InvalidEntity { pos: usize },

    #[error("Element nesting deeper than {limit} levels at byte {pos}")]
    TooDeep { limit: usize, pos: usize },

    #[error("Document has no root element")]
    NoRoot,

    #[error("Trailing content after root element at byte {pos}")]
    TrailingContent { pos: usize },
}
