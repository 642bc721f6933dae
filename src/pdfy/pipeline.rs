//! Compilation pipeline
//!
//! Each stage implements [Runnable], taking the previous stage's output by value:
//!
//! ```text
//! Tokenize: &str              -> Tokenized        (lexical errors are kept, never fatal)
//! Parse:    Vec<Token>        -> Vec<Instruction> (first syntax error aborts)
//! Analyze:  Vec<Instruction>  -> Model            (never fails)
//! ```
//!
//! [Compiler] owns a configuration and chains the three stages. [compile] is the shortcut
//! for the embedded defaults.

use serde::Serialize;
use std::fmt;

use crate::pdfy::ast::Instruction;
use crate::pdfy::config::{self, PdfyConfig};
use crate::pdfy::lexing::{tokenize, LexError, Tokenized};
use crate::pdfy::model::Model;
use crate::pdfy::parsing::{parse, ParseError};
use crate::pdfy::semantic::analyze;
use crate::pdfy::token::Token;

/// Errors that stop a compilation
#[derive(Debug, Clone, PartialEq)]
pub enum CompileError {
    /// The token stream matched no production. Lexical errors found before parsing are
    /// kept, since a skipped character is often what broke the grammar.
    Syntax {
        error: ParseError,
        lex_errors: Vec<LexError>,
    },
    /// Defaults or a user file failed to load or validate
    Config(String),
}

impl fmt::Display for CompileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompileError::Syntax { error, .. } => write!(f, "{}", error),
            CompileError::Config(message) => write!(f, "Configuration error: {}", message),
        }
    }
}

impl std::error::Error for CompileError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CompileError::Syntax { error, .. } => Some(error),
            CompileError::Config(_) => None,
        }
    }
}

impl From<ParseError> for CompileError {
    fn from(error: ParseError) -> Self {
        CompileError::Syntax {
            error,
            lex_errors: Vec::new(),
        }
    }
}

impl CompileError {
    /// Lexical errors collected before the compilation stopped
    pub fn lex_errors(&self) -> &[LexError] {
        match self {
            CompileError::Syntax { lex_errors, .. } => lex_errors,
            CompileError::Config(_) => &[],
        }
    }

    fn with_lex_errors(self, errors: Vec<LexError>) -> Self {
        match self {
            CompileError::Syntax { error, .. } => CompileError::Syntax {
                error,
                lex_errors: errors,
            },
            other => other,
        }
    }
}

impl From<::config::ConfigError> for CompileError {
    fn from(error: ::config::ConfigError) -> Self {
        CompileError::Config(error.to_string())
    }
}

/// A single pipeline stage
pub trait Runnable<I, O> {
    fn run(&self, input: I) -> Result<O, CompileError>;
}

/// Source text to tokens
#[derive(Debug, Clone, Copy, Default)]
pub struct Tokenize;

impl Runnable<&str, Tokenized> for Tokenize {
    fn run(&self, input: &str) -> Result<Tokenized, CompileError> {
        Ok(tokenize(input))
    }
}

/// Tokens to instructions
#[derive(Debug, Clone, Copy, Default)]
pub struct Parse;

impl Runnable<Vec<Token>, Vec<Instruction>> for Parse {
    fn run(&self, input: Vec<Token>) -> Result<Vec<Instruction>, CompileError> {
        Ok(parse(input)?)
    }
}

/// Instructions to a resolved model
#[derive(Debug, Clone)]
pub struct Analyze<'c> {
    config: &'c PdfyConfig,
}

impl<'c> Analyze<'c> {
    pub fn new(config: &'c PdfyConfig) -> Self {
        Self { config }
    }
}

impl Runnable<Vec<Instruction>, Model> for Analyze<'_> {
    fn run(&self, input: Vec<Instruction>) -> Result<Model, CompileError> {
        Ok(analyze(input, self.config))
    }
}

/// Everything a successful compilation produces
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Compilation {
    pub tokens: Vec<Token>,
    pub model: Model,
    pub lex_errors: Vec<LexError>,
}

/// Compiles pdfy sources against one configuration
#[derive(Debug, Clone)]
pub struct Compiler {
    config: PdfyConfig,
}

impl Compiler {
    pub fn new(config: PdfyConfig) -> Self {
        Self { config }
    }

    /// A compiler using the embedded defaults
    pub fn with_defaults() -> Result<Self, CompileError> {
        Ok(Self::new(config::load_defaults()?))
    }

    pub fn config(&self) -> &PdfyConfig {
        &self.config
    }

    /// Lex only
    pub fn tokenize(&self, source: &str) -> Tokenized {
        tokenize(source)
    }

    /// Lex and parse, for tooling that wants the AST
    pub fn parse(&self, source: &str) -> Result<Vec<Instruction>, CompileError> {
        let Tokenized { tokens, errors } = Tokenize.run(source)?;
        Parse
            .run(tokens)
            .map_err(|error| error.with_lex_errors(errors))
    }

    pub fn compile(&self, source: &str) -> Result<Compilation, CompileError> {
        let Tokenized { tokens, errors } = Tokenize.run(source)?;
        let instructions = match Parse.run(tokens.clone()) {
            Ok(instructions) => instructions,
            Err(error) => return Err(error.with_lex_errors(errors)),
        };
        let model = Analyze::new(&self.config).run(instructions)?;
        Ok(Compilation {
            tokens,
            model,
            lex_errors: errors,
        })
    }
}

/// Compile with the embedded default configuration
pub fn compile(source: &str) -> Result<Compilation, CompileError> {
    Compiler::with_defaults()?.compile(source)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compile_collects_every_stage() {
        let compilation = compile("$title(){Hi} # $section(){x}").expect("compiles");
        assert_eq!(compilation.lex_errors.len(), 1);
        assert_eq!(compilation.lex_errors[0].character, '#');
        assert_eq!(compilation.model.content.len(), 2);
        assert!(!compilation.tokens.is_empty());
    }

    #[test]
    fn test_syntax_error_is_fatal() {
        let error = compile("$section(){").unwrap_err();
        assert!(matches!(error, CompileError::Syntax { .. }));
        assert!(error.to_string().starts_with("Syntax error at end of input"));
        assert!(error.lex_errors().is_empty());
    }

    #[test]
    fn test_syntax_error_keeps_lex_errors() {
        let compiler = Compiler::with_defaults().expect("defaults");
        let error = compiler.compile("$title(#level=1]{x}").unwrap_err();
        assert!(matches!(error, CompileError::Syntax { .. }));
        // The lexer stays in argument mode, so the `x` is illegal too
        let characters: Vec<char> = error.lex_errors().iter().map(|e| e.character).collect();
        assert_eq!(characters, vec![']', 'x']);
        assert_eq!(error.lex_errors()[0].column, 16);

        let error = compiler.parse("$title(#level=1]{x}").unwrap_err();
        assert_eq!(error.lex_errors().len(), 2);
    }

    #[test]
    fn test_config_error_conversion() {
        let error: CompileError = ::config::ConfigError::Message("bad".to_string()).into();
        assert_eq!(error.to_string(), "Configuration error: bad");
    }

    #[test]
    fn test_stages_compose() {
        let compiler = Compiler::with_defaults().expect("defaults");
        let tokenized = Tokenize.run("$style(#name=\"S\")").expect("lexes");
        let instructions = Parse.run(tokenized.tokens).expect("parses");
        let model = Analyze::new(compiler.config())
            .run(instructions)
            .expect("analyzes");
        assert!(model.style("S").is_some());
    }
}
