//! Grammar productions for the pdfy format, as chumsky combinators.
//!
//! ```text
//! document     := instruction+
//! instruction  := KEYWORD '(' arguments? ')' ( '{' content '}' )?
//! arguments    := argument (',' argument)*
//! argument     := ARG_NAME '=' (STRING | NUMBER)
//! content      := (TEXT | instruction)*
//! ```
//!
//! Each keyword has its own production, which is where instruction shapes are enforced:
//! `$style`, `$pageNumber` and `$numberizeTitle` never take braces, `$title` and `$section`
//! always do, and emphasis takes an empty argument list and at most one text run.

use chumsky::prelude::*;

use crate::pdfy::ast::{
    Arguments, Block, ContentNode, Directive, Emphasis, EmphasisKind, Instruction, Literal,
};
use crate::pdfy::token::{Keyword, Token, TokenKind};

/// Type alias for parser error
pub(crate) type ParserError = Simple<Token>;

/// Helper: match a token of the given kind, keeping the token
pub(crate) fn kind(expected: TokenKind) -> impl Parser<Token, Token, Error = ParserError> + Clone {
    filter(move |token: &Token| token.kind == expected)
}

fn keyword(expected: Keyword) -> impl Parser<Token, Token, Error = ParserError> + Clone {
    kind(TokenKind::Keyword(expected))
}

fn text() -> impl Parser<Token, String, Error = ParserError> + Clone {
    filter_map(|span, token: Token| match &token.kind {
        TokenKind::Text(text) => Ok(text.clone()),
        _ => Err(Simple::expected_input_found(span, Vec::new(), Some(token))),
    })
}

fn arg_name() -> impl Parser<Token, String, Error = ParserError> + Clone {
    filter_map(|span, token: Token| match &token.kind {
        TokenKind::ArgName(name) => Ok(name.clone()),
        _ => Err(Simple::expected_input_found(span, Vec::new(), Some(token))),
    })
}

fn literal() -> impl Parser<Token, Literal, Error = ParserError> + Clone {
    filter_map(|span, token: Token| match &token.kind {
        TokenKind::Str(value) => Ok(Literal::Str(value.clone())),
        TokenKind::Number(value) => Ok(Literal::Int(*value)),
        _ => Err(Simple::expected_input_found(span, Vec::new(), Some(token))),
    })
}

/// argument := ARG_NAME '=' (STRING | NUMBER)
fn argument() -> impl Parser<Token, (String, Literal), Error = ParserError> + Clone {
    arg_name()
        .then_ignore(kind(TokenKind::Equals))
        .then(literal())
        .labelled("argument")
}

/// '(' arguments? ')'
///
/// A repeated argument name keeps its last value.
fn argument_list() -> impl Parser<Token, Arguments, Error = ParserError> + Clone {
    argument()
        .separated_by(kind(TokenKind::Comma))
        .delimited_by(kind(TokenKind::LParen), kind(TokenKind::RParen))
        .map(|arguments| arguments.into_iter().collect::<Arguments>())
        .labelled("argument list")
}

/// '(' ')'
fn empty_argument_list() -> impl Parser<Token, (), Error = ParserError> + Clone {
    kind(TokenKind::LParen)
        .then(kind(TokenKind::RParen))
        .ignored()
        .labelled("empty argument list")
}

/// `$style`, `$pageNumber`, `$numberizeTitle`: arguments, no braces
fn directive(expected: Keyword) -> impl Parser<Token, Directive, Error = ParserError> + Clone {
    keyword(expected)
        .then(argument_list())
        .map(|(token, arguments)| Directive {
            arguments,
            line: token.line,
        })
}

/// `$title`, `$section`: arguments, then braces
fn block<P>(expected: Keyword, content: P) -> impl Parser<Token, Block, Error = ParserError> + Clone
where
    P: Parser<Token, Vec<ContentNode>, Error = ParserError> + Clone,
{
    keyword(expected)
        .then(argument_list())
        .then(content)
        .map(|((token, arguments), content)| Block {
            arguments,
            content,
            line: token.line,
        })
}

/// `$bold(){text}` and friends; the braces may be empty
fn emphasis(emphasis_kind: EmphasisKind) -> impl Parser<Token, Emphasis, Error = ParserError> + Clone {
    keyword(emphasis_kind.keyword())
        .then_ignore(empty_argument_list())
        .then(
            text()
                .or_not()
                .delimited_by(kind(TokenKind::LBrace), kind(TokenKind::RBrace)),
        )
        .map(move |(token, text)| Emphasis {
            kind: emphasis_kind,
            text: text.unwrap_or_default(),
            line: token.line,
        })
}

/// Any instruction, with content that may nest further instructions
pub(crate) fn instruction() -> impl Parser<Token, Instruction, Error = ParserError> + Clone {
    recursive(|instruction| {
        let content = text()
            .map(ContentNode::Text)
            .or(instruction.map(ContentNode::Instruction))
            .repeated()
            .delimited_by(kind(TokenKind::LBrace), kind(TokenKind::RBrace))
            .labelled("content");

        choice((
            directive(Keyword::Style).map(Instruction::Style),
            directive(Keyword::PageNumber).map(Instruction::PageNumber),
            directive(Keyword::NumberizeTitle).map(Instruction::NumberizeTitle),
            block(Keyword::Title, content.clone()).map(Instruction::Title),
            block(Keyword::Section, content).map(Instruction::Section),
            emphasis(EmphasisKind::Bold).map(Instruction::Emphasis),
            emphasis(EmphasisKind::Italic).map(Instruction::Emphasis),
            emphasis(EmphasisKind::Underlined).map(Instruction::Emphasis),
        ))
        .labelled("instruction")
    })
}

/// document := instruction+
pub(crate) fn document() -> impl Parser<Token, Vec<Instruction>, Error = ParserError> + Clone {
    instruction().repeated().at_least(1).then_ignore(end())
}
