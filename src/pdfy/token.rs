//! Token definitions for the pdfy format
//!
//! The lexer runs two logos lexers over the same source, one per scanning mode:
//!
//!     - [DocToken]: document mode, the initial mode. Instruction keywords (`$style`, ...),
//!       brackets, and free text.
//!     - [ArgToken]: argument mode, between `(` and `)`. Argument names (`#fontSize`),
//!       string and integer literals, `=` and `,`.
//!
//! Both collapse into the mode-independent [TokenKind] the parser consumes, wrapped in a
//! [Token] that keeps the source text, line and byte span.

use logos::Logos;
use serde::Serialize;
use std::fmt;
use std::ops::Range;

/// Instruction keywords, written with the `$` sigil in source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Keyword {
    Style,
    PageNumber,
    NumberizeTitle,
    Title,
    Section,
    Bold,
    Italic,
    Underlined,
}

impl Keyword {
    /// The keyword as written in source, sigil included
    pub fn as_str(&self) -> &'static str {
        match self {
            Keyword::Style => "$style",
            Keyword::PageNumber => "$pageNumber",
            Keyword::NumberizeTitle => "$numberizeTitle",
            Keyword::Title => "$title",
            Keyword::Section => "$section",
            Keyword::Bold => "$bold",
            Keyword::Italic => "$italic",
            Keyword::Underlined => "$underlined",
        }
    }
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tokens recognized in document mode
#[derive(Logos, Debug, PartialEq, Clone)]
#[logos(skip r"\s+")]
pub enum DocToken {
    #[token("$style", |_| Keyword::Style)]
    #[token("$pageNumber", |_| Keyword::PageNumber)]
    #[token("$numberizeTitle", |_| Keyword::NumberizeTitle)]
    #[token("$title", |_| Keyword::Title)]
    #[token("$section", |_| Keyword::Section)]
    #[token("$bold", |_| Keyword::Bold)]
    #[token("$italic", |_| Keyword::Italic)]
    #[token("$underlined", |_| Keyword::Underlined)]
    Keyword(Keyword),

    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,

    // Never starts with whitespace; runs until the next sigil or bracket
    #[regex(r"[^\s$#(){}][^$#(){}]*", |lex| lex.slice().to_string())]
    Text(String),
}

/// Tokens recognized in argument mode
#[derive(Logos, Debug, PartialEq, Clone)]
#[logos(skip r"\s+")]
pub enum ArgToken {
    #[regex(r"#[A-Za-z][A-Za-z0-9_]*", |lex| lex.slice()[1..].to_string())]
    ArgName(String),

    #[regex(r#""[^"]*""#, |lex| {
        let slice = lex.slice();
        slice[1..slice.len() - 1].to_string()
    })]
    Str(String),

    // Saturates, so an over-long literal stays one token and fails every range check
    #[regex(r"[0-9]+", |lex| lex.slice().parse::<i64>().unwrap_or(i64::MAX))]
    Number(i64),

    #[token("=")]
    Equals,
    #[token(",")]
    Comma,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
}

/// Mode-independent token kinds handed to the parser
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "kebab-case")]
pub enum TokenKind {
    Keyword(Keyword),
    /// Argument name, without the `#` sigil
    ArgName(String),
    /// String literal, without the quotes
    Str(String),
    Number(i64),
    LParen,
    RParen,
    LBrace,
    RBrace,
    Comma,
    Equals,
    Text(String),
}

impl From<DocToken> for TokenKind {
    fn from(token: DocToken) -> Self {
        match token {
            DocToken::Keyword(keyword) => TokenKind::Keyword(keyword),
            DocToken::LParen => TokenKind::LParen,
            DocToken::RParen => TokenKind::RParen,
            DocToken::LBrace => TokenKind::LBrace,
            DocToken::RBrace => TokenKind::RBrace,
            DocToken::Text(text) => TokenKind::Text(text),
        }
    }
}

impl From<ArgToken> for TokenKind {
    fn from(token: ArgToken) -> Self {
        match token {
            ArgToken::ArgName(name) => TokenKind::ArgName(name),
            ArgToken::Str(value) => TokenKind::Str(value),
            ArgToken::Number(value) => TokenKind::Number(value),
            ArgToken::Equals => TokenKind::Equals,
            ArgToken::Comma => TokenKind::Comma,
            ArgToken::LParen => TokenKind::LParen,
            ArgToken::RParen => TokenKind::RParen,
            ArgToken::LBrace => TokenKind::LBrace,
            ArgToken::RBrace => TokenKind::RBrace,
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Keyword(keyword) => write!(f, "<keyword:{}>", keyword),
            TokenKind::ArgName(name) => write!(f, "<arg-name:#{}>", name),
            TokenKind::Str(value) => write!(f, "<string:{:?}>", value),
            TokenKind::Number(value) => write!(f, "<number:{}>", value),
            TokenKind::LParen => f.write_str("<lparen>"),
            TokenKind::RParen => f.write_str("<rparen>"),
            TokenKind::LBrace => f.write_str("<lbrace>"),
            TokenKind::RBrace => f.write_str("<rbrace>"),
            TokenKind::Comma => f.write_str("<comma>"),
            TokenKind::Equals => f.write_str("<equals>"),
            TokenKind::Text(text) => write!(f, "<text:{:?}>", text),
        }
    }
}

/// A token with the source text it was lexed from
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Token {
    pub kind: TokenKind,
    /// Exact source slice, quotes and sigils included
    pub text: String,
    /// 1-based source line of the token's first character
    pub line: usize,
    pub span: Range<usize>,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>, line: usize, span: Range<usize>) -> Self {
        Self {
            kind,
            text: text.into(),
            line,
            span,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_keywords() {
        let mut lexer = DocToken::lexer("$style $pageNumber $numberizeTitle $underlined");
        assert_eq!(lexer.next(), Some(Ok(DocToken::Keyword(Keyword::Style))));
        assert_eq!(lexer.next(), Some(Ok(DocToken::Keyword(Keyword::PageNumber))));
        assert_eq!(
            lexer.next(),
            Some(Ok(DocToken::Keyword(Keyword::NumberizeTitle)))
        );
        assert_eq!(lexer.next(), Some(Ok(DocToken::Keyword(Keyword::Underlined))));
        assert_eq!(lexer.next(), None);
    }

    #[test]
    fn test_document_text_stops_at_reserved_characters() {
        let mut lexer = DocToken::lexer("Hello, world! {x}");
        assert_eq!(
            lexer.next(),
            Some(Ok(DocToken::Text("Hello, world! ".to_string())))
        );
        assert_eq!(lexer.next(), Some(Ok(DocToken::LBrace)));
        assert_eq!(lexer.next(), Some(Ok(DocToken::Text("x".to_string()))));
        assert_eq!(lexer.next(), Some(Ok(DocToken::RBrace)));
        assert_eq!(lexer.next(), None);
    }

    #[test]
    fn test_argument_names_are_not_document_tokens() {
        let mut lexer = DocToken::lexer("#name");
        assert!(matches!(lexer.next(), Some(Err(_))));
    }

    #[test]
    fn test_argument_tokens() {
        let mut lexer = ArgToken::lexer(r#"#fontSize = 12, #font="Times-Roman""#);
        assert_eq!(
            lexer.next(),
            Some(Ok(ArgToken::ArgName("fontSize".to_string())))
        );
        assert_eq!(lexer.next(), Some(Ok(ArgToken::Equals)));
        assert_eq!(lexer.next(), Some(Ok(ArgToken::Number(12))));
        assert_eq!(lexer.next(), Some(Ok(ArgToken::Comma)));
        assert_eq!(lexer.next(), Some(Ok(ArgToken::ArgName("font".to_string()))));
        assert_eq!(lexer.next(), Some(Ok(ArgToken::Equals)));
        assert_eq!(
            lexer.next(),
            Some(Ok(ArgToken::Str("Times-Roman".to_string())))
        );
        assert_eq!(lexer.next(), None);
    }

    #[test]
    fn test_keyword_display() {
        assert_eq!(Keyword::NumberizeTitle.to_string(), "$numberizeTitle");
    }

    #[test]
    fn test_overlong_number_is_one_saturated_token() {
        let mut lexer = ArgToken::lexer("10000000000000000005)");
        assert_eq!(lexer.next(), Some(Ok(ArgToken::Number(i64::MAX))));
        assert_eq!(lexer.span(), 0..20);
        assert_eq!(lexer.next(), Some(Ok(ArgToken::RParen)));
        assert_eq!(lexer.next(), None);
    }

    #[test]
    fn test_token_kind_conversion() {
        assert_eq!(TokenKind::from(DocToken::LParen), TokenKind::LParen);
        assert_eq!(
            TokenKind::from(ArgToken::Number(3)),
            TokenKind::Number(3)
        );
    }
}
