//! Output formats for each compilation stage
//!
//! A [ProcessingSpec] pairs the stage to print (tokens, AST or model) with an output
//! format. Not every pair is meaningful: `echo` only exists for the model, where it writes
//! the resolved document back out as pdfy source.
//!
//! The echo is canonical: every argument is spelled out, the two built-in styles and the
//! `$numberizeTitle` instruction are left out, and titles keep the numbers they were given.
//! Compiling an echo therefore reproduces the styles, page numbering and content it came
//! from.

use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use crate::pdfy::ast::{ContentNode, Instruction};
use crate::pdfy::diagnostics::Diagnostics;
use crate::pdfy::lexing::LexError;
use crate::pdfy::model::{DocumentItem, Inline, Model};
use crate::pdfy::pipeline::Compilation;
use crate::pdfy::token::Token;

/// Which stage's output to print
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessingStage {
    Tokens,
    Ast,
    Model,
}

/// How to print it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Yaml,
    Echo,
    Simple,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProcessingSpec {
    pub stage: ProcessingStage,
    pub format: OutputFormat,
}

/// Errors raised while formatting output
#[derive(Debug, Clone, PartialEq)]
pub enum FormatError {
    InvalidStage(String),
    InvalidFormat(String),
    /// The format exists but not for this stage
    Unsupported {
        stage: ProcessingStage,
        format: OutputFormat,
    },
    Serialization(String),
}

impl fmt::Display for FormatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormatError::InvalidStage(stage) => write!(f, "Invalid stage: {}", stage),
            FormatError::InvalidFormat(format) => write!(f, "Invalid format: {}", format),
            FormatError::Unsupported { stage, format } => write!(
                f,
                "Format '{}' is not supported for the {} stage",
                format, stage
            ),
            FormatError::Serialization(message) => write!(f, "Serialization error: {}", message),
        }
    }
}

impl std::error::Error for FormatError {}

impl ProcessingStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProcessingStage::Tokens => "tokens",
            ProcessingStage::Ast => "ast",
            ProcessingStage::Model => "model",
        }
    }
}

impl fmt::Display for ProcessingStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProcessingStage {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "tokens" => Ok(ProcessingStage::Tokens),
            "ast" => Ok(ProcessingStage::Ast),
            "model" => Ok(ProcessingStage::Model),
            _ => Err(FormatError::InvalidStage(s.to_string())),
        }
    }
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Yaml => "yaml",
            OutputFormat::Echo => "echo",
            OutputFormat::Simple => "simple",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputFormat {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "json" => Ok(OutputFormat::Json),
            "yaml" => Ok(OutputFormat::Yaml),
            "echo" => Ok(OutputFormat::Echo),
            "simple" => Ok(OutputFormat::Simple),
            _ => Err(FormatError::InvalidFormat(s.to_string())),
        }
    }
}

impl ProcessingSpec {
    /// Validate a stage/format pair
    pub fn new(stage: ProcessingStage, format: OutputFormat) -> Result<Self, FormatError> {
        match (stage, format) {
            (ProcessingStage::Tokens | ProcessingStage::Ast, OutputFormat::Echo) => {
                Err(FormatError::Unsupported { stage, format })
            }
            _ => Ok(Self { stage, format }),
        }
    }

    /// Render a token stream; needs no parse, so it works on sources with syntax errors
    pub fn render_tokens(&self, tokens: &[Token]) -> Result<String, FormatError> {
        match (self.stage, self.format) {
            (ProcessingStage::Tokens, OutputFormat::Simple) => Ok(tokens_simple(tokens)),
            (ProcessingStage::Tokens, OutputFormat::Json) => to_json(tokens),
            (ProcessingStage::Tokens, OutputFormat::Yaml) => to_yaml(tokens),
            (stage, format) => Err(FormatError::Unsupported { stage, format }),
        }
    }

    /// Render the requested stage of a compilation
    pub fn render(&self, compilation: &Compilation, ast: &[Instruction]) -> Result<String, FormatError> {
        match (self.stage, self.format) {
            (ProcessingStage::Tokens, _) => self.render_tokens(&compilation.tokens),
            (ProcessingStage::Ast, OutputFormat::Simple) => Ok(ast_simple(ast)),
            (ProcessingStage::Ast, OutputFormat::Json) => to_json(&ast),
            (ProcessingStage::Ast, OutputFormat::Yaml) => to_yaml(&ast),
            (ProcessingStage::Model, OutputFormat::Simple) => Ok(model_simple(&compilation.model)),
            (ProcessingStage::Model, OutputFormat::Json) => to_json(&compilation.model),
            (ProcessingStage::Model, OutputFormat::Yaml) => to_yaml(&compilation.model),
            (ProcessingStage::Model, OutputFormat::Echo) => Ok(echo(&compilation.model)),
            (stage, format) => Err(FormatError::Unsupported { stage, format }),
        }
    }
}

pub fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String, FormatError> {
    serde_json::to_string_pretty(value).map_err(|e| FormatError::Serialization(e.to_string()))
}

pub fn to_yaml<T: Serialize + ?Sized>(value: &T) -> Result<String, FormatError> {
    serde_yaml::to_string(value).map_err(|e| FormatError::Serialization(e.to_string()))
}

/// One token per line, prefixed with its source line
pub fn tokens_simple(tokens: &[Token]) -> String {
    let mut result = String::new();
    for token in tokens {
        result.push_str(&format!("{:>4}  {}\n", token.line, token.kind));
    }
    result
}

/// An indented outline of the instruction tree
pub fn ast_simple(instructions: &[Instruction]) -> String {
    let mut result = String::new();
    for instruction in instructions {
        outline_instruction(&mut result, instruction, 0);
    }
    result
}

fn outline_instruction(out: &mut String, instruction: &Instruction, depth: usize) {
    let indent = "  ".repeat(depth);
    out.push_str(&format!("{}{}", indent, instruction.keyword()));
    if let Some(arguments) = instruction.arguments() {
        for (name, value) in arguments {
            out.push_str(&format!(" #{}={}", name, value));
        }
    }
    if let Instruction::Emphasis(emphasis) = instruction {
        out.push_str(&format!(" {:?}", emphasis.text));
    }
    out.push_str(&format!("  (line {})\n", instruction.line()));

    for node in instruction.content().unwrap_or_default() {
        match node {
            ContentNode::Text(text) => out.push_str(&format!("{}  text {:?}\n", indent, text)),
            ContentNode::Instruction(nested) => outline_instruction(out, nested, depth + 1),
        }
    }
}

/// A human readable summary of the resolved model
pub fn model_simple(model: &Model) -> String {
    let mut result = String::from("styles:\n");
    for style in &model.styles {
        result.push_str(&format!(
            "  {}: {} {}pt {}{}\n",
            style.name,
            style.font,
            style.font_size,
            style.font_color,
            if style.builtin { " (built-in)" } else { "" }
        ));
    }

    let page_number = &model.page_number;
    result.push_str(&format!(
        "page numbers: {} from page {}, {} {}pt {}\n",
        page_number.position,
        page_number.start,
        page_number.font,
        page_number.font_size,
        page_number.font_color
    ));
    if let Some(numbering) = model.numberize_title {
        result.push_str(&format!("title numbering: from level {}\n", numbering.start));
    }

    result.push_str("content:\n");
    for item in &model.content {
        match item {
            DocumentItem::Title(title) => result.push_str(&format!(
                "  title [{}] level {}: {}\n",
                title.style, title.level, title.text
            )),
            DocumentItem::Section(section) => {
                let runs: Vec<String> = section.content.iter().map(inline_simple).collect();
                result.push_str(&format!("  section [{}]: {}\n", section.style, runs.join("")));
            }
        }
    }
    result
}

fn inline_simple(inline: &Inline) -> String {
    match inline {
        Inline::Text(text) => text.clone(),
        Inline::Bold(text) => format!("*{}*", text),
        Inline::Italic(text) => format!("/{}/", text),
        Inline::Underlined(text) => format!("_{}_", text),
    }
}

/// Write a resolved model back out as pdfy source
pub fn echo(model: &Model) -> String {
    let mut lines = Vec::new();

    for style in model.styles.iter().filter(|style| !style.builtin) {
        lines.push(format!(
            "$style(#name=\"{}\", #font=\"{}\", #fontSize={}, #fontColor=\"{}\")",
            style.name, style.font, style.font_size, style.font_color
        ));
    }

    let page_number = &model.page_number;
    lines.push(format!(
        "$pageNumber(#pageNumberPosition=\"{}\", #pageNumberFont=\"{}\", #pageNumberFontSize={}, #pageNumberFontColor=\"{}\", #pageNumberStart={})",
        page_number.position,
        page_number.font,
        page_number.font_size,
        page_number.font_color,
        page_number.start
    ));

    for item in &model.content {
        lines.push(match item {
            DocumentItem::Title(title) => format!(
                "$title(#style=\"{}\", #level={}){{{}}}",
                title.style, title.level, title.text
            ),
            DocumentItem::Section(section) => {
                let body: String = section.content.iter().map(echo_inline).collect();
                format!("$section(#style=\"{}\"){{{}}}", section.style, body)
            }
        });
    }

    let mut result = lines.join("\n");
    result.push('\n');
    result
}

fn echo_inline(inline: &Inline) -> String {
    match inline {
        Inline::Text(text) => text.clone(),
        Inline::Bold(text) => format!("$bold(){{{}}}", text),
        Inline::Italic(text) => format!("$italic(){{{}}}", text),
        Inline::Underlined(text) => format!("$underlined(){{{}}}", text),
    }
}

/// Lexical errors followed by semantic diagnostics, one per line
pub fn report(lex_errors: &[LexError], diagnostics: &Diagnostics) -> String {
    let mut result = String::new();
    for error in lex_errors {
        result.push_str(&format!("error [illegal-character] {}\n", error));
    }
    for diagnostic in diagnostics.in_source_order() {
        result.push_str(&format!("{}\n", diagnostic));
    }
    result
}
