//! # pdfy
//!
//! A compiler front end for the pdfy document markup language.
//!
//! A pdfy document is a flat list of instructions:
//!
//! ```text
//! $style(#name="Body", #font="Times-Roman", #fontSize=11)
//! $pageNumber(#pageNumberPosition="bottom-right", #pageNumberStart=2)
//! $title(#level=1){Introduction}
//! $section(#style="Body"){Plain text with $bold(){emphasis} inside.}
//! $numberizeTitle(#numberizeTitleStart=1)
//! ```
//!
//! Compilation runs three stages, each fully consuming its input:
//!
//!     1. Lexing. See [lexing](pdfy::lexing). Two scanning modes, document text and
//!        argument lists, switched on parentheses.
//!     2. Parsing. See [parsing](pdfy::parsing). A chumsky grammar producing the
//!        instruction AST, failing fatally on the first syntax error.
//!     3. Semantic analysis. See [semantic](pdfy::semantic). Validates every instruction,
//!        resolves defaults, and numbers titles. Problems become diagnostics, never errors.
//!
//! The result is a [`Model`](pdfy::model::Model) a renderer can lay out directly.
//!
//! For test helpers, see the [testing module](pdfy::testing).

#![allow(rustdoc::invalid_html_tags)]

pub mod pdfy;

pub use pdfy::pipeline::{compile, Compilation, CompileError, Compiler};
