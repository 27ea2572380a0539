pub mod default;

use thiserror::Error;
use crate::ast::ParsedLine;
use crate::config::Limits;
use crate::heredoc::HeredocSource;
use crate::lexer::{self, LexError, Token, TokenKind};

pub use default::DefaultParser;

pub trait Parser {
    /// Builds the command list. Never fails: problems are recorded as
    /// diagnostics and malformed stages are left for the caller to reject.
    fn parse(&mut self) -> ParsedLine;
}

/// Recoverable problems noticed while building a line.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Diagnostic {
    #[error("Expected filename after {operator}")]
    ExpectedFilename { operator: TokenKind, found: TokenKind },
    #[error("Expected delimiter after <<")]
    ExpectedDelimiter { found: TokenKind },
    #[error("Too many commands (limit {limit}), ignoring '{separator}'")]
    TooManyCommands { separator: TokenKind, limit: usize },
    #[error("Here document exceeds maximum size ({limit} bytes)")]
    HeredocTooLarge { limit: usize },
}

pub fn parse<H: HeredocSource>(tokens: &[Token], limits: &Limits, heredoc: H) -> ParsedLine {
    DefaultParser::new(tokens, *limits, heredoc).parse()
}

/// Tokenizes and builds one line.
pub fn parse_line<H: HeredocSource>(
    line: &str,
    limits: &Limits,
    heredoc: H,
) -> Result<ParsedLine, LexError> {
    let tokens = lexer::tokenize(line, limits)?;
    Ok(parse(&tokens, limits, heredoc))
}
