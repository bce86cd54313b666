//! Token stream navigation and error construction shared by the parsers.

use crate::ast::Span;
use crate::diag::Diag;
use crate::lexer::token::{Token, TokenKind};

/// Common error type for parsing operations.
pub type ParseError = Box<Diag>;

/// Common result type for parsing operations.
pub type ParseResult<T> = Result<T, ParseError>;

/// Cursor over a token slice that always ends with EOF.
pub struct TokenStream<'a> {
    tokens: &'a [Token],
    pos: usize,
}

impl<'a> TokenStream<'a> {
    /// Creates a new token stream. `tokens` must end with an EOF token.
    pub fn new(tokens: &'a [Token]) -> Self {
        debug_assert!(matches!(
            tokens.last().map(|t| &t.kind),
            Some(TokenKind::Eof)
        ));
        Self { tokens, pos: 0 }
    }

    /// Returns the current token; past the end this is the EOF token.
    pub fn current(&self) -> &'a Token {
        let last = self.tokens.len().saturating_sub(1);
        &self.tokens[self.pos.min(last)]
    }

    /// Returns the token after the current one.
    pub fn peek(&self) -> Option<&'a Token> {
        self.tokens.get(self.pos + 1)
    }

    /// Advances to the next token. Does nothing at EOF.
    pub fn advance(&mut self) {
        if self.pos < self.tokens.len().saturating_sub(1) {
            self.pos += 1;
        }
    }

    /// Checks if the current token matches the given kind.
    pub fn check(&self, kind: &TokenKind) -> bool {
        &self.current().kind == kind
    }

    /// Consumes the current token if it matches the given kind.
    pub fn consume(&mut self, kind: &TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Expects a specific token kind and returns its span.
    pub fn expect(&mut self, kind: TokenKind) -> ParseResult<Span> {
        if self.check(&kind) {
            let span = self.current().span.clone();
            self.advance();
            Ok(span)
        } else {
            Err(self.error_here_with_code(
                format!("expected {kind}, found {}", self.current().kind),
                "syntax::unexpected_token",
            ))
        }
    }

    /// Expects the delimiter closing the one at `open`.
    ///
    /// On failure the error also points at the opening delimiter.
    pub fn expect_closing(&mut self, kind: TokenKind, open: Span) -> ParseResult<Span> {
        let help = format!("add the missing {kind}");
        self.expect(kind).map_err(|diag| {
            Box::new(
                (*diag)
                    .with_secondary_label(open, "unclosed delimiter opened here")
                    .with_help(help),
            )
        })
    }

    /// Creates an error at the current token position.
    pub fn error_here_with_code(&self, message: impl Into<String>, code: &str) -> ParseError {
        Box::new(
            Diag::error(message.into())
                .with_primary_label(self.current().span.clone(), "here")
                .with_code(code),
        )
    }

    /// Returns the span of the previously consumed token.
    pub fn previous_span(&self) -> Span {
        if self.pos > 0 {
            self.tokens[self.pos - 1].span.clone()
        } else {
            self.current().span.clone()
        }
    }
}
