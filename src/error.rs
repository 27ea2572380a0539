use std::io;
use thiserror::Error;
use crate::config::ConfigError;
use crate::lexer::LexError;

#[derive(Debug, Error)]
pub enum ShellError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("Lexing error: {0}")]
    Lex(#[from] LexError),
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}
