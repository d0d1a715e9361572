//! Splitter error types.

/// Fatal scan errors.
///
/// Any of these aborts the resolution of the resource being split; the
/// migration layer wraps them with the script path.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SplitError {
    /// A string literal, quoted identifier or comment ran past end of input.
    #[error("unterminated {construct} starting at line {line}, column {col}")]
    Unterminated {
        /// What was left open ("string literal", "block comment", …).
        construct: &'static str,
        /// 1-based line of the opening marker.
        line: u32,
        /// 1-based column of the opening marker.
        col: u32,
    },

    /// Input ended while a procedural block was still open.
    #[error("unexpected end of script: {depth} unclosed block(s) in statement starting at line {line}")]
    UnexpectedEof {
        /// How many blocks were still open.
        depth: u32,
        /// 1-based line the unterminated statement started on.
        line: u32,
    },
}
