//! Parser
//!
//!     The parser consumes the complete token stream and returns the ordered instruction
//!     list (see [ast](super::ast)). The grammar lives in [grammar]; this module is the public
//!     entry point and turns chumsky's errors into a single [ParseError].
//!
//!     Parsing has no error recovery. The first token sequence that matches no production
//!     aborts the whole parse and nothing of the partial AST is returned.

pub mod grammar;

use chumsky::Parser;
use serde::Serialize;
use std::fmt;

use crate::pdfy::ast::Instruction;
use crate::pdfy::lexing::tokenize;
use crate::pdfy::token::Token;

/// A fatal syntax error
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParseError {
    /// The offending token, `None` at end of input
    pub found: Option<Token>,
    pub line: usize,
    /// The production being parsed when the error occurred, if known
    pub context: Option<&'static str>,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.found {
            Some(token) => write!(f, "Syntax error at {:?} (line {})", token.text, self.line)?,
            None => write!(f, "Syntax error at end of input (line {})", self.line)?,
        }
        if let Some(context) = self.context {
            write!(f, " while parsing {}", context)?;
        }
        Ok(())
    }
}

impl std::error::Error for ParseError {}

/// Parse a token stream into instructions
pub fn parse(tokens: Vec<Token>) -> Result<Vec<Instruction>, ParseError> {
    let eof_line = tokens.last().map(|token| token.line).unwrap_or(1);
    log::debug!("parser: parsing {} tokens", tokens.len());

    grammar::document().parse(tokens).map_err(|errors| {
        // Without recovery chumsky stops at the first failure; keep its first report
        let first = errors.into_iter().next();
        let found = first.as_ref().and_then(|error| error.found().cloned());
        let line = found.as_ref().map(|token| token.line).unwrap_or(eof_line);
        ParseError {
            found,
            line,
            context: first.and_then(|error| error.label()),
        }
    })
}

/// Lex and parse source text, ignoring lexical errors
pub fn parse_source(source: &str) -> Result<Vec<Instruction>, ParseError> {
    parse(tokenize(source).tokens)
}
