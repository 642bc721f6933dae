//! Argument validation and typed extraction
//!
//! Each instruction kind declares a [Signature]: the argument names it accepts and the
//! type each one expects. [check_signature] produces the hard errors (unknown names,
//! a text argument given a number); [ArgumentReader] then pulls typed values out of a
//! checked argument map, substituting defaults and recording a warning whenever a value
//! has to be corrected.

use crate::pdfy::ast::{Arguments, Literal};
use crate::pdfy::config::{Bounds, PdfyConfig};
use crate::pdfy::diagnostics::{Diagnostic, DiagnosticCode};
use crate::pdfy::model::PageNumberPosition;
use crate::pdfy::token::Keyword;

/// Expected value type of an argument
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgType {
    Text,
    Number,
}

/// Accepted argument names of one instruction kind
pub type Signature = &'static [(&'static str, ArgType)];

pub const STYLE: Signature = &[
    ("name", ArgType::Text),
    ("font", ArgType::Text),
    ("fontSize", ArgType::Number),
    ("fontColor", ArgType::Text),
];

pub const PAGE_NUMBER: Signature = &[
    ("pageNumberPosition", ArgType::Text),
    ("pageNumberFont", ArgType::Text),
    ("pageNumberFontSize", ArgType::Number),
    ("pageNumberFontColor", ArgType::Text),
    ("pageNumberStart", ArgType::Number),
];

pub const SECTION: Signature = &[("style", ArgType::Text)];

pub const TITLE: Signature = &[("style", ArgType::Text), ("level", ArgType::Number)];

pub const NUMBERIZE_TITLE: Signature = &[("numberizeTitleStart", ArgType::Number)];

/// Errors for names outside the signature, then for text arguments given integers.
///
/// Unknown names are reported first and on their own; type errors are only looked for
/// once every name is known.
pub fn check_signature(
    keyword: Keyword,
    line: usize,
    arguments: &Arguments,
    signature: Signature,
) -> Vec<Diagnostic> {
    let expected = |name: &str| {
        signature
            .iter()
            .find(|(known, _)| *known == name)
            .map(|(_, arg_type)| *arg_type)
    };

    let unknown: Vec<Diagnostic> = arguments
        .keys()
        .filter(|name| expected(name).is_none())
        .map(|name| {
            let accepted: Vec<String> = signature.iter().map(|(n, _)| format!("#{n}")).collect();
            let accepted = if accepted.is_empty() {
                "none".to_string()
            } else {
                accepted.join(", ")
            };
            Diagnostic::error(
                DiagnosticCode::UnknownArgument,
                line,
                format!("{keyword} does not accept argument #{name} (accepted: {accepted})"),
            )
        })
        .collect();
    if !unknown.is_empty() {
        return unknown;
    }

    arguments
        .iter()
        .filter_map(|(name, value)| match (expected(name), value) {
            (Some(ArgType::Text), Literal::Int(number)) => Some(Diagnostic::error(
                DiagnosticCode::InvalidArgumentType,
                line,
                format!("{keyword} argument #{name} expects a string, found {number}"),
            )),
            _ => None,
        })
        .collect()
}

/// Typed, defaulting access to a checked argument map
pub struct ArgumentReader<'a> {
    keyword: Keyword,
    line: usize,
    arguments: &'a Arguments,
    config: &'a PdfyConfig,
    warnings: Vec<Diagnostic>,
}

impl<'a> ArgumentReader<'a> {
    pub fn new(
        keyword: Keyword,
        line: usize,
        arguments: &'a Arguments,
        config: &'a PdfyConfig,
    ) -> Self {
        Self {
            keyword,
            line,
            arguments,
            config,
            warnings: Vec::new(),
        }
    }

    /// A text argument as written, if present
    pub fn text(&self, name: &str) -> Option<&'a str> {
        match self.arguments.get(name) {
            Some(Literal::Str(value)) => Some(value.as_str()),
            _ => None,
        }
    }

    /// A registered font, or `default` with a warning
    pub fn font(&mut self, name: &str, default: &str) -> String {
        match self.text(name) {
            Some(font) if self.config.is_registered_font(font) => font.to_string(),
            Some(font) => {
                self.warn(
                    DiagnosticCode::UnregisteredFont,
                    format!("font '{font}' in #{name} is not registered, using '{default}'"),
                );
                default.to_string()
            }
            None => default.to_string(),
        }
    }

    /// A named or `#rrggbb` color, or `default` with a warning
    pub fn color(&mut self, name: &str, default: &str) -> String {
        match self.text(name) {
            Some(color) if self.config.is_known_color(color) => color.to_string(),
            Some(color) => {
                self.warn(
                    DiagnosticCode::UnknownColor,
                    format!("color '{color}' in #{name} is not recognized, using '{default}'"),
                );
                default.to_string()
            }
            None => default.to_string(),
        }
    }

    /// An integer inside `bounds`, or `default` with a warning.
    ///
    /// A string holding an integer is accepted as that integer.
    pub fn bounded(&mut self, name: &str, bounds: Bounds, default: u32) -> u32 {
        let value = match self.arguments.get(name) {
            None => return default,
            Some(Literal::Int(value)) => *value,
            Some(Literal::Str(raw)) => match raw.trim().parse::<i64>() {
                Ok(value) => value,
                Err(_) => {
                    self.warn(
                        DiagnosticCode::InvalidNumber,
                        format!("#{name} expects a number, found \"{raw}\", using {default}"),
                    );
                    return default;
                }
            },
        };

        if bounds.contains(value) {
            // contains() guarantees the value fits
            u32::try_from(value).unwrap_or(default)
        } else {
            self.warn(
                DiagnosticCode::OutOfRange,
                format!(
                    "#{name} = {value} is outside [{}, {}], using {default}",
                    bounds.min, bounds.max
                ),
            );
            default
        }
    }

    /// A page number position, or `default` with a warning
    pub fn position(&mut self, name: &str, default: PageNumberPosition) -> PageNumberPosition {
        match self.text(name) {
            Some(raw) => match raw.parse() {
                Ok(position) => position,
                Err(_) => {
                    let allowed: Vec<&str> = PageNumberPosition::ALL
                        .iter()
                        .map(PageNumberPosition::as_str)
                        .collect();
                    self.warn(
                        DiagnosticCode::InvalidPosition,
                        format!(
                            "position '{raw}' is not one of {}, using '{default}'",
                            allowed.join(", ")
                        ),
                    );
                    default
                }
            },
            None => default,
        }
    }

    pub fn into_warnings(self) -> Vec<Diagnostic> {
        self.warnings
    }

    fn warn(&mut self, code: DiagnosticCode, message: String) {
        self.warnings.push(Diagnostic::warning(
            code,
            self.line,
            format!("{}: {}", self.keyword, message),
        ));
    }
}
