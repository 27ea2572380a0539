use std::collections::TryReserveError;
use log::{debug, trace};
use thiserror::Error;
use super::token::{Token, TokenKind};
use crate::config::Limits;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LexError {
    /// The token buffer could not be allocated; callers treat this as fatal.
    #[error("Failed to allocate memory for tokens: {0}")]
    Alloc(#[from] TryReserveError),
}

/// Characters that start an operator and end a bare word.
pub fn is_special_char(c: u8) -> bool {
    matches!(c, b'|' | b'<' | b'>' | b'&' | b';')
}

// Same set as C `isspace`: space, \t, \n, \v, \f, \r.
fn is_blank(c: u8) -> bool {
    c.is_ascii_whitespace() || c == b'\x0b'
}

fn is_quote(c: u8) -> bool {
    c == b'"' || c == b'\''
}

// Cuts `word` to at most `max` bytes without splitting a character.
fn truncate_word(word: &str, max: usize) -> &str {
    if word.len() <= max {
        return word;
    }
    let mut end = max;
    while !word.is_char_boundary(end) {
        end -= 1;
    }
    &word[..end]
}

pub struct Lexer<'a> {
    input: &'a str,
    bytes: &'a [u8],
    pos: usize,
    limits: Limits,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self::with_limits(input, Limits::default())
    }

    pub fn with_limits(input: &'a str, limits: Limits) -> Self {
        Lexer {
            input,
            bytes: input.as_bytes(),
            pos: 0,
            limits,
        }
    }

    /// Scans the whole line and appends the end marker.
    ///
    /// Once `max_tokens - 1` tokens exist the rest of the line is dropped, so
    /// the result never holds more than `max_tokens` entries.
    pub fn tokenize(&mut self) -> Result<Vec<Token>, LexError> {
        let cap = self.limits.max_tokens.max(1);
        let mut tokens = Vec::new();
        tokens.try_reserve_exact(cap.min(self.bytes.len() + 1))?;

        while tokens.len() < cap - 1 {
            match self.next_token() {
                Some(token) => {
                    trace!("token: {}", token);
                    tokens.push(token);
                }
                None => break,
            }
        }

        if self.skip_whitespace() < self.bytes.len() {
            debug!(
                "token limit {} reached, discarding input from byte {}",
                cap, self.pos
            );
        }

        tokens.push(Token::operator(TokenKind::EndOfInput, (self.pos, self.pos)));
        Ok(tokens)
    }

    /// Returns the next word or operator, or `None` at end of input.
    pub fn next_token(&mut self) -> Option<Token> {
        self.skip_whitespace();
        let ch = *self.bytes.get(self.pos)?;

        let token = match ch {
            b'|' => self.operator(TokenKind::Pipe, 1),
            b'&' => self.operator(TokenKind::Background, 1),
            b';' => self.operator(TokenKind::Sequence, 1),
            b'<' => {
                if self.peek_at(1) == Some(b'<') {
                    self.operator(TokenKind::Heredoc, 2)
                } else {
                    self.operator(TokenKind::RedirectIn, 1)
                }
            }
            b'>' => {
                if self.peek_at(1) == Some(b'>') {
                    self.operator(TokenKind::AppendOut, 2)
                } else {
                    self.operator(TokenKind::RedirectOut, 1)
                }
            }
            c if is_quote(c) => self.quoted_word(c),
            _ => self.bare_word(),
        };
        Some(token)
    }

    fn skip_whitespace(&mut self) -> usize {
        while self.pos < self.bytes.len() && is_blank(self.bytes[self.pos]) {
            self.pos += 1;
        }
        self.pos
    }

    fn peek_at(&self, offset: usize) -> Option<u8> {
        self.bytes.get(self.pos + offset).copied()
    }

    fn operator(&mut self, kind: TokenKind, len: usize) -> Token {
        let span = (self.pos, self.pos + len);
        self.pos += len;
        Token::operator(kind, span)
    }

    // Everything up to the matching quote is taken verbatim. A missing close
    // quote ends the word at end of input.
    fn quoted_word(&mut self, quote: u8) -> Token {
        let start = self.pos;
        let content_start = start + 1;
        let close = self.bytes[content_start..]
            .iter()
            .position(|&b| b == quote)
            .map(|i| content_start + i);

        let (content_end, next) = match close {
            Some(end) => (end, end + 1),
            None => {
                debug!("unterminated {} quote at byte {}", quote as char, start);
                (self.bytes.len(), self.bytes.len())
            }
        };
        self.pos = next;
        let text = truncate_word(&self.input[content_start..content_end], self.limits.max_word_len);
        Token::word(text, (start, next))
    }

    fn bare_word(&mut self) -> Token {
        let start = self.pos;
        while self.pos < self.bytes.len() {
            let c = self.bytes[self.pos];
            if is_blank(c) || is_special_char(c) {
                break;
            }
            self.pos += 1;
        }
        let text = truncate_word(&self.input[start..self.pos], self.limits.max_word_len);
        Token::word(text, (start, self.pos))
    }
}
