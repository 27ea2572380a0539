use log::debug;
use crate::ast::{Command, InputSource, OutputTarget, ParsedLine, Separator, Stage};
use crate::config::Limits;
use crate::heredoc::HeredocSource;
use crate::lexer::{Token, TokenKind};
use crate::parser::{Diagnostic, Parser};

/// Single left-to-right pass that folds tokens into stages.
pub struct DefaultParser<'a, H> {
    tokens: &'a [Token],
    pos: usize,
    limits: Limits,
    heredoc: H,
    diagnostics: Vec<Diagnostic>,
}

impl<'a, H: HeredocSource> DefaultParser<'a, H> {
    pub fn new(tokens: &'a [Token], limits: Limits, heredoc: H) -> Self {
        Self {
            tokens,
            pos: 0,
            limits,
            heredoc,
            diagnostics: Vec::new(),
        }
    }

    fn next(&mut self) -> Option<&'a Token> {
        let tok = self.tokens.get(self.pos);
        if tok.is_some() {
            self.pos += 1;
        }
        tok
    }

    // Takes the word after a redirection operator. Anything else is consumed
    // and reported, and nothing is assigned.
    fn expect_word(&mut self, operator: TokenKind) -> Option<&'a str> {
        match self.next() {
            Some(tok) if tok.is_word() => Some(tok.text.as_str()),
            other => {
                let found = other.map_or(TokenKind::EndOfInput, |t| t.kind);
                let diag = if operator == TokenKind::Heredoc {
                    Diagnostic::ExpectedDelimiter { found }
                } else {
                    Diagnostic::ExpectedFilename { operator, found }
                };
                debug!("{}", diag);
                self.diagnostics.push(diag);
                None
            }
        }
    }

    fn read_heredoc(&mut self, delimiter: &str) -> String {
        let body = self.heredoc.collect(delimiter);
        if let Some(limit) = body.truncated_at {
            self.diagnostics.push(Diagnostic::HeredocTooLarge { limit });
        }
        body.text
    }
}

impl<'a, H: HeredocSource> Parser for DefaultParser<'a, H> {
    fn parse(&mut self) -> ParsedLine {
        let mut stages = Vec::new();
        let mut current = Command::new();

        while let Some(token) = self.next() {
            match token.kind {
                TokenKind::Word => current.push_word(&token.text),
                TokenKind::RedirectIn => {
                    if let Some(file) = self.expect_word(token.kind) {
                        current.input = Some(InputSource::File(file.to_string()));
                    }
                }
                TokenKind::Heredoc => {
                    if let Some(delimiter) = self.expect_word(token.kind) {
                        let body = self.read_heredoc(delimiter);
                        current.input = Some(InputSource::Heredoc(body));
                    }
                }
                TokenKind::RedirectOut | TokenKind::AppendOut => {
                    if let Some(file) = self.expect_word(token.kind) {
                        current.output = Some(OutputTarget {
                            file: file.to_string(),
                            append: token.kind == TokenKind::AppendOut,
                        });
                    }
                }
                TokenKind::Background => current.background = true,
                TokenKind::Pipe | TokenKind::Sequence => {
                    // `stages` plus the open stage must stay within the cap.
                    if stages.len() + 1 < self.limits.max_commands {
                        let next = if token.kind == TokenKind::Pipe {
                            Separator::Pipe
                        } else {
                            Separator::Sequential
                        };
                        stages.push(Stage {
                            command: std::mem::take(&mut current),
                            next,
                        });
                    } else {
                        let diag = Diagnostic::TooManyCommands {
                            separator: token.kind,
                            limit: self.limits.max_commands,
                        };
                        debug!("{}", diag);
                        self.diagnostics.push(diag);
                    }
                }
                TokenKind::EndOfInput => break,
            }
        }

        stages.push(Stage {
            command: current,
            next: Separator::End,
        });

        ParsedLine {
            stages,
            diagnostics: std::mem::take(&mut self.diagnostics),
        }
    }
}
