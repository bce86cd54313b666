//! Lexical analysis for SQL select queries.
//!
//! Scanning is driven by the `logos`-generated [`TokenKind`] automaton. The
//! lexer keeps going after an invalid character so that every problem in the
//! input is reported at once.

pub mod token;

use crate::diag::Diag;
use logos::Logos;
use token::{Token, TokenKind};

/// Result of lexical analysis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexerResult {
    /// The tokens produced, always terminated by an EOF token.
    pub tokens: Vec<Token>,
    /// Diagnostics for characters that do not start any token.
    pub diagnostics: Vec<Diag>,
}

/// A lexical analyzer over query source text.
pub struct Lexer<'a> {
    source: &'a str,
}

impl<'a> Lexer<'a> {
    /// Creates a new lexer for the given source text.
    pub fn new(source: &'a str) -> Self {
        Self { source }
    }

    /// Tokenizes the source text and returns tokens plus diagnostics.
    pub fn tokenize(self) -> LexerResult {
        let mut tokens = Vec::new();
        let mut diagnostics = Vec::new();

        for (result, span) in TokenKind::lexer(self.source).spanned() {
            match result {
                Ok(kind) => tokens.push(Token::new(kind, span)),
                Err(()) => {
                    let text = &self.source[span.clone()];
                    diagnostics.push(
                        Diag::error(format!("invalid character sequence '{text}'"))
                            .with_primary_label(span, "not valid here")
                            .with_code("syntax::invalid_character"),
                    );
                }
            }
        }

        let eof = self.source.len();
        tokens.push(Token::new(TokenKind::Eof, eof..eof));

        LexerResult {
            tokens,
            diagnostics,
        }
    }
}

/// Convenience wrapper around [`Lexer::tokenize`].
pub fn tokenize(source: &str) -> LexerResult {
    Lexer::new(source).tokenize()
}
