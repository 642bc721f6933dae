//! AST definitions for the pdfy format
//!
//! The parser produces an ordered list of [Instruction]s. Each instruction kind is its own
//! variant and only carries what its grammar production allows: `$style` has no content,
//! emphasis has no arguments, and so on. Nesting rules that the grammar does not enforce
//! (a `$title` inside a `$section`, say) are left to semantic analysis.
//!
//! Every node records the source line of its keyword for diagnostics.

use crate::pdfy::token::Keyword;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Argument names (without the `#` sigil) mapped to their literal values
pub type Arguments = BTreeMap<String, Literal>;

/// An argument value as written in source
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Literal {
    Str(String),
    Int(i64),
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Str(value) => write!(f, "\"{}\"", value),
            Literal::Int(value) => write!(f, "{}", value),
        }
    }
}

/// The three inline emphasis kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EmphasisKind {
    Bold,
    Italic,
    Underlined,
}

impl EmphasisKind {
    pub fn keyword(&self) -> Keyword {
        match self {
            EmphasisKind::Bold => Keyword::Bold,
            EmphasisKind::Italic => Keyword::Italic,
            EmphasisKind::Underlined => Keyword::Underlined,
        }
    }
}

/// An instruction with an argument list and no content
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Directive {
    pub arguments: Arguments,
    pub line: usize,
}

/// An instruction with an argument list and brace-delimited content
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Block {
    pub arguments: Arguments,
    pub content: Vec<ContentNode>,
    pub line: usize,
}

/// `$bold(){...}`, `$italic(){...}` or `$underlined(){...}`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Emphasis {
    pub kind: EmphasisKind,
    /// Empty when the braces were empty
    pub text: String,
    pub line: usize,
}

/// One element of a block's content
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "node", content = "value", rename_all = "lowercase")]
pub enum ContentNode {
    Text(String),
    Instruction(Instruction),
}

/// A top-level or nested instruction
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "instruction", rename_all = "camelCase")]
pub enum Instruction {
    Style(Directive),
    PageNumber(Directive),
    NumberizeTitle(Directive),
    Title(Block),
    Section(Block),
    Emphasis(Emphasis),
}

impl Instruction {
    pub fn keyword(&self) -> Keyword {
        match self {
            Instruction::Style(_) => Keyword::Style,
            Instruction::PageNumber(_) => Keyword::PageNumber,
            Instruction::NumberizeTitle(_) => Keyword::NumberizeTitle,
            Instruction::Title(_) => Keyword::Title,
            Instruction::Section(_) => Keyword::Section,
            Instruction::Emphasis(emphasis) => emphasis.kind.keyword(),
        }
    }

    pub fn line(&self) -> usize {
        match self {
            Instruction::Style(d) | Instruction::PageNumber(d) | Instruction::NumberizeTitle(d) => {
                d.line
            }
            Instruction::Title(b) | Instruction::Section(b) => b.line,
            Instruction::Emphasis(e) => e.line,
        }
    }

    /// The argument list, if this kind takes one
    pub fn arguments(&self) -> Option<&Arguments> {
        match self {
            Instruction::Style(d) | Instruction::PageNumber(d) | Instruction::NumberizeTitle(d) => {
                Some(&d.arguments)
            }
            Instruction::Title(b) | Instruction::Section(b) => Some(&b.arguments),
            Instruction::Emphasis(_) => None,
        }
    }

    /// The brace content, if this kind takes one
    pub fn content(&self) -> Option<&[ContentNode]> {
        match self {
            Instruction::Title(b) | Instruction::Section(b) => Some(&b.content),
            _ => None,
        }
    }
}
