pub mod ast;
pub mod config;
pub mod error;
pub mod heredoc;
pub mod lexer;
pub mod parser;
pub mod repl;
pub mod resolver;

pub use ast::{Command, InputSource, OutputTarget, ParsedLine, Separator, Stage};
pub use config::{Config, ConfigLoader, Limits};
pub use heredoc::{HeredocCollector, HeredocSource, NoHeredoc};
pub use lexer::{tokenize, Token, TokenKind};
pub use parser::{parse, parse_line, Diagnostic};
