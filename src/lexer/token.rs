use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Word,         // Command name, argument or filename
    Pipe,         // |
    RedirectIn,   // <
    Heredoc,      // <<
    RedirectOut,  // >
    AppendOut,    // >>
    Background,   // &
    Sequence,     // ;
    EndOfInput,
}

impl TokenKind {
    /// Canonical lexeme for operator kinds, `None` for words.
    pub fn symbol(&self) -> Option<&'static str> {
        match self {
            TokenKind::Word => None,
            TokenKind::Pipe => Some("|"),
            TokenKind::RedirectIn => Some("<"),
            TokenKind::Heredoc => Some("<<"),
            TokenKind::RedirectOut => Some(">"),
            TokenKind::AppendOut => Some(">>"),
            TokenKind::Background => Some("&"),
            TokenKind::Sequence => Some(";"),
            TokenKind::EndOfInput => Some("EOF"),
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.symbol() {
            Some(sym) => write!(f, "{}", sym),
            None => write!(f, "word"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,         // Word text, or the operator symbol
    pub span: (usize, usize), // Byte range in the input line [start, end)
}

impl Token {
    pub fn word(text: impl Into<String>, span: (usize, usize)) -> Self {
        Token {
            kind: TokenKind::Word,
            text: text.into(),
            span,
        }
    }

    pub fn operator(kind: TokenKind, span: (usize, usize)) -> Self {
        Token {
            kind,
            text: kind.symbol().unwrap_or_default().to_string(),
            span,
        }
    }

    pub fn is_word(&self) -> bool {
        self.kind == TokenKind::Word
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "type={:?}, value='{}'", self.kind, self.text)
    }
}
