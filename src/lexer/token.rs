//! Token types for SQL lexical analysis.

use crate::ast::Span;
use logos::Logos;
use smol_str::SmolStr;
use std::fmt;

/// The kind of a lexical token.
///
/// Keywords are matched case-insensitively. `Eof` is never produced by the
/// generated scanner; [`crate::lexer::Lexer`] appends it.
#[derive(Logos, Debug, Clone, PartialEq, Eq, Hash)]
#[logos(skip r"([ \t\r\n\f]+|--[^\n]*)")]
pub enum TokenKind {
    // Keywords
    #[token("select", ignore(ascii_case))]
    Select,
    #[token("from", ignore(ascii_case))]
    From,
    #[token("where", ignore(ascii_case))]
    Where,
    #[token("group", ignore(ascii_case))]
    Group,
    #[token("by", ignore(ascii_case))]
    By,
    #[token("having", ignore(ascii_case))]
    Having,
    #[token("order", ignore(ascii_case))]
    Order,
    #[token("asc", ignore(ascii_case))]
    Asc,
    #[token("desc", ignore(ascii_case))]
    Desc,
    #[token("limit", ignore(ascii_case))]
    Limit,
    #[token("offset", ignore(ascii_case))]
    Offset,
    #[token("as", ignore(ascii_case))]
    As,
    #[token("and", ignore(ascii_case))]
    And,
    #[token("or", ignore(ascii_case))]
    Or,
    #[token("not", ignore(ascii_case))]
    Not,
    #[token("is", ignore(ascii_case))]
    Is,
    #[token("null", ignore(ascii_case))]
    Null,
    #[token("true", ignore(ascii_case))]
    True,
    #[token("false", ignore(ascii_case))]
    False,

    // Literals and names
    #[regex(r"[A-Za-z_][A-Za-z0-9_]*", |lex| SmolStr::new(lex.slice()))]
    Identifier(SmolStr),
    #[regex(r#""([^"]|"")*""#, |lex| unquote(lex.slice(), '"'))]
    QuotedIdentifier(SmolStr),
    #[regex(r"[0-9]+", |lex| SmolStr::new(lex.slice()))]
    Integer(SmolStr),
    #[regex(r"[0-9]+\.[0-9]+([eE][+-]?[0-9]+)?|[0-9]+[eE][+-]?[0-9]+", |lex| SmolStr::new(lex.slice()))]
    Float(SmolStr),
    #[regex(r"'([^']|'')*'", |lex| unquote(lex.slice(), '\''))]
    String(SmolStr),

    // Operators
    #[token("=")]
    Eq,
    #[token("!=")]
    #[token("<>")]
    NotEq,
    #[token("<")]
    Lt,
    #[token("<=")]
    LtEq,
    #[token(">")]
    Gt,
    #[token(">=")]
    GtEq,
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("%")]
    Percent,

    // Punctuation
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token(",")]
    Comma,
    #[token(".")]
    Dot,
    #[token(";")]
    Semicolon,

    Eof,
}

/// Strips the surrounding quotes and collapses doubled quote characters.
fn unquote(slice: &str, quote: char) -> SmolStr {
    let inner = &slice[1..slice.len() - 1];
    let doubled: String = [quote, quote].iter().collect();
    SmolStr::new(inner.replace(&doubled, &quote.to_string()))
}

impl TokenKind {
    /// Returns true for tokens that may start a name.
    pub fn is_name(&self) -> bool {
        matches!(self, TokenKind::Identifier(_) | TokenKind::QuotedIdentifier(_))
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Select => write!(f, "SELECT"),
            TokenKind::From => write!(f, "FROM"),
            TokenKind::Where => write!(f, "WHERE"),
            TokenKind::Group => write!(f, "GROUP"),
            TokenKind::By => write!(f, "BY"),
            TokenKind::Having => write!(f, "HAVING"),
            TokenKind::Order => write!(f, "ORDER"),
            TokenKind::Asc => write!(f, "ASC"),
            TokenKind::Desc => write!(f, "DESC"),
            TokenKind::Limit => write!(f, "LIMIT"),
            TokenKind::Offset => write!(f, "OFFSET"),
            TokenKind::As => write!(f, "AS"),
            TokenKind::And => write!(f, "AND"),
            TokenKind::Or => write!(f, "OR"),
            TokenKind::Not => write!(f, "NOT"),
            TokenKind::Is => write!(f, "IS"),
            TokenKind::Null => write!(f, "NULL"),
            TokenKind::True => write!(f, "TRUE"),
            TokenKind::False => write!(f, "FALSE"),
            TokenKind::Identifier(name) => write!(f, "identifier '{name}'"),
            TokenKind::QuotedIdentifier(name) => write!(f, "identifier \"{name}\""),
            TokenKind::Integer(text) | TokenKind::Float(text) => write!(f, "number {text}"),
            TokenKind::String(text) => write!(f, "string '{text}'"),
            TokenKind::Eq => write!(f, "'='"),
            TokenKind::NotEq => write!(f, "'!='"),
            TokenKind::Lt => write!(f, "'<'"),
            TokenKind::LtEq => write!(f, "'<='"),
            TokenKind::Gt => write!(f, "'>'"),
            TokenKind::GtEq => write!(f, "'>='"),
            TokenKind::Plus => write!(f, "'+'"),
            TokenKind::Minus => write!(f, "'-'"),
            TokenKind::Star => write!(f, "'*'"),
            TokenKind::Slash => write!(f, "'/'"),
            TokenKind::Percent => write!(f, "'%'"),
            TokenKind::LParen => write!(f, "'('"),
            TokenKind::RParen => write!(f, "')'"),
            TokenKind::LBracket => write!(f, "'['"),
            TokenKind::RBracket => write!(f, "']'"),
            TokenKind::LBrace => write!(f, "'{{'"),
            TokenKind::RBrace => write!(f, "'}}'"),
            TokenKind::Comma => write!(f, "','"),
            TokenKind::Dot => write!(f, "'.'"),
            TokenKind::Semicolon => write!(f, "';'"),
            TokenKind::Eof => write!(f, "end of input"),
        }
    }
}

/// A token with its location in the source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    /// Creates a new token.
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// Returns the source slice covered by this token.
    pub fn slice<'a>(&self, source: &'a str) -> &'a str {
        &source[self.span.clone()]
    }
}
