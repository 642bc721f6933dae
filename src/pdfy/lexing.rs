//! Lexer
//!
//!     This module turns pdfy source text into a flat token sequence. Tokenization is done
//!     entirely by logos; this module only decides which logos lexer is active.
//!
//! Scanning Modes
//!
//!     pdfy needs two vocabularies. Document text is free-form, so `=` or `,` are plain
//!     characters there, while inside an argument list they are punctuation and `#` starts
//!     an argument name. Each vocabulary is its own logos token enum (see [token](super::token)),
//!     and the [Lexer] is a two-state machine over them:
//!
//!         Document --'('--> Arguments --')'--> Document
//!
//!     Switching morphs the running logos lexer into the other token type, so the position in
//!     the source is kept. Switching is exact and never second-guessed: an unmatched `(` keeps
//!     the lexer in argument mode for the rest of the input.
//!
//! Error Recovery
//!
//!     An unrecognized character produces a [LexError] in the output stream. The lexer then
//!     discards exactly that one character and resumes in the same mode. Lexical errors never
//!     stop tokenization; the stream always terminates.
//!
//!     Line numbers are derived from byte offsets, so newlines are otherwise insignificant.

use crate::pdfy::token::{ArgToken, DocToken, Token, TokenKind};
use logos::Logos;
use serde::Serialize;
use std::fmt;
use std::ops::Range;

/// Which vocabulary the lexer is currently scanning with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScanMode {
    Document,
    Arguments,
}

/// An unrecognized character, skipped by the lexer
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LexError {
    pub character: char,
    pub line: usize,
    /// 1-based, counted in characters
    pub column: usize,
    /// Byte offset in the source
    pub offset: usize,
}

impl fmt::Display for LexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Illegal character {:?} at line {}, column {}",
            self.character, self.line, self.column
        )
    }
}

impl std::error::Error for LexError {}

enum Mode<'s> {
    Document(logos::Lexer<'s, DocToken>),
    Arguments(logos::Lexer<'s, ArgToken>),
}

impl<'s> Mode<'s> {
    fn scan_mode(&self) -> ScanMode {
        match self {
            Mode::Document(_) => ScanMode::Document,
            Mode::Arguments(_) => ScanMode::Arguments,
        }
    }

    /// A fresh lexer of the same mode over `rest`
    fn restart(scan_mode: ScanMode, rest: &'s str) -> Self {
        match scan_mode {
            ScanMode::Document => Mode::Document(DocToken::lexer(rest)),
            ScanMode::Arguments => Mode::Arguments(ArgToken::lexer(rest)),
        }
    }
}

/// Outcome of one logos step, with the span relative to the active logos source
enum Step {
    Token(TokenKind, Range<usize>),
    Error(Range<usize>),
    Done,
}

/// Lazy pdfy lexer
///
/// Yields `Ok(Token)` for every token and `Err(LexError)` for every skipped character, in
/// source order. A lexer instance owns its mode, so instances never share state.
pub struct Lexer<'s> {
    source: &'s str,
    // Only `None` while a step is switching modes
    mode: Option<Mode<'s>>,
    // Byte offset of the active logos lexer's source within `source`
    base: usize,
    line: usize,
    line_cursor: usize,
    line_start: usize,
}

impl<'s> Lexer<'s> {
    pub fn new(source: &'s str) -> Self {
        Self {
            source,
            mode: Some(Mode::Document(DocToken::lexer(source))),
            base: 0,
            line: 1,
            line_cursor: 0,
            line_start: 0,
        }
    }

    /// The mode the next token will be scanned in
    pub fn mode(&self) -> ScanMode {
        self.mode
            .as_ref()
            .map(Mode::scan_mode)
            .unwrap_or(ScanMode::Document)
    }

    fn step(&mut self) -> Step {
        let Some(mode) = self.mode.take() else {
            return Step::Done;
        };

        let (step, next) = match mode {
            Mode::Document(mut lexer) => match lexer.next() {
                None => (Step::Done, Mode::Document(lexer)),
                Some(Ok(DocToken::LParen)) => {
                    let span = lexer.span();
                    log::trace!("lexer: entering argument mode at byte {}", self.base + span.start);
                    (Step::Token(TokenKind::LParen, span), Mode::Arguments(lexer.morph()))
                }
                Some(Ok(token)) => {
                    let span = lexer.span();
                    (Step::Token(token.into(), span), Mode::Document(lexer))
                }
                Some(Err(())) => (Step::Error(lexer.span()), Mode::Document(lexer)),
            },
            Mode::Arguments(mut lexer) => match lexer.next() {
                None => (Step::Done, Mode::Arguments(lexer)),
                Some(Ok(ArgToken::RParen)) => {
                    let span = lexer.span();
                    log::trace!("lexer: leaving argument mode at byte {}", self.base + span.start);
                    (Step::Token(TokenKind::RParen, span), Mode::Document(lexer.morph()))
                }
                Some(Ok(token)) => {
                    let span = lexer.span();
                    (Step::Token(token.into(), span), Mode::Arguments(lexer))
                }
                Some(Err(())) => (Step::Error(lexer.span()), Mode::Arguments(lexer)),
            },
        };

        self.mode = Some(next);
        step
    }

    /// Advance the line counter up to `offset` and return (line, column) there
    fn locate(&mut self, offset: usize) -> (usize, usize) {
        for (index, ch) in self.source[self.line_cursor..offset].char_indices() {
            if ch == '\n' {
                self.line += 1;
                self.line_start = self.line_cursor + index + 1;
            }
        }
        self.line_cursor = offset;
        let column = self.source[self.line_start..offset].chars().count() + 1;
        (self.line, column)
    }

    /// Skip the single character at `offset` and rebuild the active logos lexer after it
    fn skip_character(&mut self, offset: usize) -> LexError {
        let character = self.source[offset..].chars().next().unwrap_or('\u{FFFD}');
        let (line, column) = self.locate(offset);
        let resume = offset + character.len_utf8();

        let scan_mode = self.mode();
        self.base = resume;
        self.mode = Some(Mode::restart(scan_mode, &self.source[resume..]));

        LexError {
            character,
            line,
            column,
            offset,
        }
    }
}

impl Iterator for Lexer<'_> {
    type Item = Result<Token, LexError>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.step() {
            Step::Done => None,
            Step::Token(kind, span) => {
                let span = (self.base + span.start)..(self.base + span.end);
                let (line, _) = self.locate(span.start);
                let text = &self.source[span.clone()];
                Some(Ok(Token::new(kind, text, line, span)))
            }
            Step::Error(span) => Some(Err(self.skip_character(self.base + span.start))),
        }
    }
}

/// All tokens and lexical errors of one source
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Tokenized {
    pub tokens: Vec<Token>,
    pub errors: Vec<LexError>,
}

impl Tokenized {
    pub fn kinds(&self) -> Vec<TokenKind> {
        self.tokens.iter().map(|token| token.kind.clone()).collect()
    }
}

/// Run a fresh lexer over the whole source
pub fn tokenize(source: &str) -> Tokenized {
    let mut tokenized = Tokenized::default();
    for item in Lexer::new(source) {
        match item {
            Ok(token) => tokenized.tokens.push(token),
            Err(error) => {
                log::debug!("lexer: {}", error);
                tokenized.errors.push(error);
            }
        }
    }
    tokenized
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdfy::token::Keyword;

    fn kinds(source: &str) -> Vec<TokenKind> {
        tokenize(source).kinds()
    }

    fn text(value: &str) -> TokenKind {
        TokenKind::Text(value.to_string())
    }

    fn arg(name: &str) -> TokenKind {
        TokenKind::ArgName(name.to_string())
    }

    #[test]
    fn test_style_instruction() {
        assert_eq!(
            kinds(r#"$style(#name="S1", #fontSize=14)"#),
            vec![
                TokenKind::Keyword(Keyword::Style),
                TokenKind::LParen,
                arg("name"),
                TokenKind::Equals,
                TokenKind::Str("S1".to_string()),
                TokenKind::Comma,
                arg("fontSize"),
                TokenKind::Equals,
                TokenKind::Number(14),
                TokenKind::RParen,
            ]
        );
    }

    #[test]
    fn test_punctuation_is_text_in_document_mode() {
        assert_eq!(
            kinds("$section(){a = b, c}"),
            vec![
                TokenKind::Keyword(Keyword::Section),
                TokenKind::LParen,
                TokenKind::RParen,
                TokenKind::LBrace,
                text("a = b, c"),
                TokenKind::RBrace,
            ]
        );
    }

    #[test]
    fn test_nested_emphasis() {
        assert_eq!(
            kinds("$section(){Hello $bold(){big} world}"),
            vec![
                TokenKind::Keyword(Keyword::Section),
                TokenKind::LParen,
                TokenKind::RParen,
                TokenKind::LBrace,
                text("Hello "),
                TokenKind::Keyword(Keyword::Bold),
                TokenKind::LParen,
                TokenKind::RParen,
                TokenKind::LBrace,
                text("big"),
                TokenKind::RBrace,
                text("world"),
                TokenKind::RBrace,
            ]
        );
    }

    #[test]
    fn test_mode_switches_on_parentheses() {
        let mut lexer = Lexer::new("$title(#level=1){x}");
        assert_eq!(lexer.mode(), ScanMode::Document);
        lexer.next(); // $title
        lexer.next(); // (
        assert_eq!(lexer.mode(), ScanMode::Arguments);
        lexer.next(); // #level
        lexer.next(); // =
        lexer.next(); // 1
        lexer.next(); // )
        assert_eq!(lexer.mode(), ScanMode::Document);
    }

    #[test]
    fn test_unmatched_paren_stays_in_argument_mode() {
        let tokenized = tokenize("$title(#level=1{Intro}");
        // "Intro" is not an argument-mode token: every character is rejected
        assert_eq!(tokenized.errors.len(), 5);
        assert_eq!(
            tokenized.kinds(),
            vec![
                TokenKind::Keyword(Keyword::Title),
                TokenKind::LParen,
                arg("level"),
                TokenKind::Equals,
                TokenKind::Number(1),
                TokenKind::LBrace,
                TokenKind::RBrace,
            ]
        );
    }

    #[test]
    fn test_illegal_character_is_skipped() {
        let tokenized = tokenize("$section(){a}#$title(){b}");
        assert_eq!(tokenized.errors.len(), 1);
        let error = &tokenized.errors[0];
        assert_eq!(error.character, '#');
        assert_eq!(error.line, 1);
        assert_eq!(error.column, 14);
        assert_eq!(error.offset, 13);
        assert_eq!(tokenized.tokens.len(), 12);
    }

    #[test]
    fn test_unknown_keyword_skips_only_the_sigil() {
        let tokenized = tokenize("$foo");
        assert_eq!(tokenized.errors.len(), 1);
        assert_eq!(tokenized.errors[0].character, '$');
        assert_eq!(tokenized.kinds(), vec![text("foo")]);
    }

    #[test]
    fn test_line_numbers() {
        let tokenized = tokenize("$style(#name=\"A\")\n\n$title(\n#level=2\n){T}");
        let lines: Vec<usize> = tokenized.tokens.iter().map(|t| t.line).collect();
        assert_eq!(lines, vec![1, 1, 1, 1, 1, 1, 3, 3, 4, 4, 4, 5, 5, 5, 5]);
    }

    #[test]
    fn test_token_text_and_span() {
        let tokenized = tokenize(r#"$style(#name="S1")"#);
        let name = &tokenized.tokens[2];
        assert_eq!(name.text, "#name");
        assert_eq!(name.span, 7..12);
        let value = &tokenized.tokens[4];
        assert_eq!(value.text, "\"S1\"");
        assert_eq!(value.kind, TokenKind::Str("S1".to_string()));
    }

    #[test]
    fn test_multibyte_characters() {
        let tokenized = tokenize("$section(){Déjà vu é}");
        assert!(tokenized.errors.is_empty());
        assert_eq!(tokenized.kinds()[4], text("Déjà vu é"));
    }

    #[test]
    fn test_empty_input() {
        let tokenized = tokenize("");
        assert!(tokenized.tokens.is_empty());
        assert!(tokenized.errors.is_empty());
    }

    #[test]
    fn test_lexer_is_fused() {
        let mut lexer = Lexer::new("$bold");
        assert!(lexer.next().is_some());
        assert!(lexer.next().is_none());
        assert!(lexer.next().is_none());
    }
}
