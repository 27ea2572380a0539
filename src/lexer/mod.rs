pub mod lexer;
pub mod token;

pub use lexer::{LexError, Lexer, is_special_char};
pub use token::{Token, TokenKind};

use crate::config::Limits;

/// Tokenizes one input line with the given caps.
pub fn tokenize(line: &str, limits: &Limits) -> Result<Vec<Token>, LexError> {
    Lexer::with_limits(line, *limits).tokenize()
}
