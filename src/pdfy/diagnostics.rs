//! Semantic diagnostics
//!
//! The analyzer never fails. Everything it rejects or corrects is recorded here as a
//! [Diagnostic] with a severity, a stable code, the source line of the offending
//! instruction and a human readable message.
//!
//! Errors mean the instruction was dropped. Warnings mean a value was replaced by its
//! default and the instruction was kept.

use serde::Serialize;
use std::fmt;

/// Diagnostic severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

/// Stable identifiers for every diagnostic the analyzer emits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum DiagnosticCode {
    UnknownArgument,
    InvalidArgumentType,
    MissingArgument,
    DuplicateStyle,
    DuplicatePageNumber,
    UnknownStyle,
    InvalidNesting,
    EmptyEmphasis,
    MisplacedEmphasis,
    UnregisteredFont,
    UnknownColor,
    OutOfRange,
    InvalidPosition,
    InvalidNumber,
}

impl DiagnosticCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiagnosticCode::UnknownArgument => "unknown-argument",
            DiagnosticCode::InvalidArgumentType => "invalid-argument-type",
            DiagnosticCode::MissingArgument => "missing-argument",
            DiagnosticCode::DuplicateStyle => "duplicate-style",
            DiagnosticCode::DuplicatePageNumber => "duplicate-page-number",
            DiagnosticCode::UnknownStyle => "unknown-style",
            DiagnosticCode::InvalidNesting => "invalid-nesting",
            DiagnosticCode::EmptyEmphasis => "empty-emphasis",
            DiagnosticCode::MisplacedEmphasis => "misplaced-emphasis",
            DiagnosticCode::UnregisteredFont => "unregistered-font",
            DiagnosticCode::UnknownColor => "unknown-color",
            DiagnosticCode::OutOfRange => "out-of-range",
            DiagnosticCode::InvalidPosition => "invalid-position",
            DiagnosticCode::InvalidNumber => "invalid-number",
        }
    }
}

impl fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single semantic error or warning
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub code: DiagnosticCode,
    pub line: usize,
    pub message: String,
}

impl Diagnostic {
    pub fn error(code: DiagnosticCode, line: usize, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            code,
            line,
            message: message.into(),
        }
    }

    pub fn warning(code: DiagnosticCode, line: usize, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            code,
            line,
            message: message.into(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} [{}] (line {}): {}",
            self.severity, self.code, self.line, self.message
        )
    }
}

/// Ordered error and warning lists
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Diagnostics {
    pub errors: Vec<Diagnostic>,
    pub warnings: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        match diagnostic.severity {
            Severity::Error => self.errors.push(diagnostic),
            Severity::Warning => self.warnings.push(diagnostic),
        }
    }

    pub fn extend(&mut self, diagnostics: impl IntoIterator<Item = Diagnostic>) {
        for diagnostic in diagnostics {
            self.push(diagnostic);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty() && self.warnings.is_empty()
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Errors and warnings merged back into source order
    pub fn in_source_order(&self) -> Vec<&Diagnostic> {
        let mut all: Vec<&Diagnostic> = self.errors.iter().chain(&self.warnings).collect();
        // Stable sort keeps errors ahead of warnings on the same line
        all.sort_by_key(|diagnostic| diagnostic.line);
        all
    }

    pub fn with_code(&self, code: DiagnosticCode) -> impl Iterator<Item = &Diagnostic> {
        self.errors
            .iter()
            .chain(&self.warnings)
            .filter(move |diagnostic| diagnostic.code == code)
    }
}
