//! Resolved document model
//!
//!     The semantic analyzer turns the instruction AST into a [Model]: every default applied,
//!     every reference checked, titles numbered. A renderer lays the model out without having
//!     to look at the source again.
//!
//!     The model is plain data. It serializes with serde for the `--stage model` output and
//!     for tooling that sits between the compiler and a renderer.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::pdfy::diagnostics::Diagnostics;

/// A named font/size/color bundle
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Style {
    pub name: String,
    pub font: String,
    pub font_size: u32,
    pub font_color: String,
    /// One of the two styles present before any `$style` instruction
    pub builtin: bool,
}

/// Where page numbers are drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PageNumberPosition {
    BottomLeft,
    BottomRight,
    BottomCenter,
    TopLeft,
    TopRight,
    TopCenter,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum VerticalAlignment {
    Top,
    Bottom,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HorizontalAlignment {
    Left,
    Center,
    Right,
}

impl PageNumberPosition {
    pub const ALL: [PageNumberPosition; 6] = [
        PageNumberPosition::BottomLeft,
        PageNumberPosition::BottomRight,
        PageNumberPosition::BottomCenter,
        PageNumberPosition::TopLeft,
        PageNumberPosition::TopRight,
        PageNumberPosition::TopCenter,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PageNumberPosition::BottomLeft => "bottom-left",
            PageNumberPosition::BottomRight => "bottom-right",
            PageNumberPosition::BottomCenter => "bottom-center",
            PageNumberPosition::TopLeft => "top-left",
            PageNumberPosition::TopRight => "top-right",
            PageNumberPosition::TopCenter => "top-center",
        }
    }

    /// Lenient lookup for renderers: unknown names fall back to bottom-center.
    pub fn from_name(name: &str) -> Self {
        name.parse().unwrap_or(PageNumberPosition::BottomCenter)
    }

    /// Split into vertical and horizontal alignment.
    pub fn placement(&self) -> (VerticalAlignment, HorizontalAlignment) {
        use HorizontalAlignment::*;
        use VerticalAlignment::*;
        match self {
            PageNumberPosition::BottomLeft => (Bottom, Left),
            PageNumberPosition::BottomRight => (Bottom, Right),
            PageNumberPosition::BottomCenter => (Bottom, Center),
            PageNumberPosition::TopLeft => (Top, Left),
            PageNumberPosition::TopRight => (Top, Right),
            PageNumberPosition::TopCenter => (Top, Center),
        }
    }
}

/// Returned when a name matches no position
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownPosition(pub String);

impl fmt::Display for UnknownPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown page number position '{}'", self.0)
    }
}

impl std::error::Error for UnknownPosition {}

impl FromStr for PageNumberPosition {
    type Err = UnknownPosition;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PageNumberPosition::ALL
            .into_iter()
            .find(|position| position.as_str() == s)
            .ok_or_else(|| UnknownPosition(s.to_string()))
    }
}

impl fmt::Display for PageNumberPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resolved `$pageNumber` settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageNumberConfig {
    pub position: PageNumberPosition,
    pub font: String,
    pub font_size: u32,
    pub font_color: String,
    /// First physical page that carries a number
    pub start: u32,
}

impl PageNumberConfig {
    /// The number printed on a 1-based physical page, if any.
    ///
    /// Pages before `start` are unnumbered; page `start` shows 1.
    pub fn label_for_page(&self, page: u32) -> Option<u32> {
        if page < self.start {
            None
        } else {
            Some(page - self.start + 1)
        }
    }
}

/// Resolved `$numberizeTitle` settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NumberizeTitleConfig {
    /// Shallowest title level that gets a number
    pub start: u32,
}

/// A run of section text
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "text", rename_all = "lowercase")]
pub enum Inline {
    Text(String),
    Bold(String),
    Italic(String),
    Underlined(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SectionItem {
    pub style: String,
    pub content: Vec<Inline>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TitleItem {
    pub style: String,
    pub level: u32,
    pub text: String,
}

/// One entry of the document body, in source order
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "item", rename_all = "lowercase")]
pub enum DocumentItem {
    Section(SectionItem),
    Title(TitleItem),
}

/// Output of semantic analysis
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Model {
    /// Built-ins first, then declared styles in source order
    pub styles: Vec<Style>,
    pub page_number: PageNumberConfig,
    pub numberize_title: Option<NumberizeTitleConfig>,
    pub content: Vec<DocumentItem>,
    pub diagnostics: Diagnostics,
}

impl Model {
    pub fn style(&self, name: &str) -> Option<&Style> {
        self.styles.iter().find(|style| style.name == name)
    }

    pub fn titles(&self) -> impl Iterator<Item = &TitleItem> {
        self.content.iter().filter_map(|item| match item {
            DocumentItem::Title(title) => Some(title),
            DocumentItem::Section(_) => None,
        })
    }

    pub fn sections(&self) -> impl Iterator<Item = &SectionItem> {
        self.content.iter().filter_map(|item| match item {
            DocumentItem::Section(section) => Some(section),
            DocumentItem::Title(_) => None,
        })
    }
}
