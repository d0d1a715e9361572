//! Statement splitting.
//!
//! [`StatementTokenizer`] scans a script character by character and cuts it
//! into executable statements at the active delimiter, while string
//! literals, comments, parenthesis nesting and procedural block depth
//! suppress false boundaries. The sequence is lazy and one-shot: statements
//! are produced on demand and the tokenizer cannot be restarted.

mod error;
mod statement;
mod token;
mod tokenizer;

pub use error::SplitError;
pub use statement::SqlStatement;
pub use token::{Keyword, Token, TokenKind};
pub use tokenizer::StatementTokenizer;
