//! Fluent assertion API for compiled models
//!
//! ```rust,ignore
//! let model = pdfy::compile(source)?.model;
//! assert_model(&model)
//!     .style_names(&["defaultSectionStyle", "defaultTitleStyle", "Body"])
//!     .item_count(2)
//!     .item(0, |item| {
//!         item.assert_title().text("1. Intro").level(1);
//!     })
//!     .no_warnings();
//! ```

use crate::pdfy::diagnostics::{Diagnostic, DiagnosticCode};
use crate::pdfy::model::{
    DocumentItem, Inline, Model, PageNumberPosition, SectionItem, TitleItem,
};

// ============================================================================
// Entry Point
// ============================================================================

/// Create an assertion builder for a model
pub fn assert_model(model: &Model) -> ModelAssertion<'_> {
    ModelAssertion { model }
}

// ============================================================================
// Model Assertions
// ============================================================================

pub struct ModelAssertion<'a> {
    model: &'a Model,
}

impl<'a> ModelAssertion<'a> {
    /// Assert the registered style names, built-ins included, in order
    pub fn style_names(self, expected: &[&str]) -> Self {
        let actual: Vec<&str> = self.model.styles.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(actual, expected, "Style registry mismatch");
        self
    }

    /// Assert the number of content items
    pub fn item_count(self, expected: usize) -> Self {
        let actual = self.model.content.len();
        assert_eq!(
            actual,
            expected,
            "Expected {} items, found {} items: [{}]",
            expected,
            actual,
            summarize_items(&self.model.content)
        );
        self
    }

    /// Assert on a specific item by index
    pub fn item<F>(self, index: usize, assertion: F) -> Self
    where
        F: FnOnce(ItemAssertion<'a>),
    {
        assert!(
            index < self.model.content.len(),
            "Item index {} out of bounds (model has {} items)",
            index,
            self.model.content.len()
        );

        assertion(ItemAssertion {
            item: &self.model.content[index],
            context: format!("content[{}]", index),
        });
        self
    }

    pub fn page_number_position(self, expected: PageNumberPosition) -> Self {
        assert_eq!(
            self.model.page_number.position, expected,
            "Page number position mismatch"
        );
        self
    }

    pub fn page_number_font(self, expected: &str) -> Self {
        assert_eq!(
            self.model.page_number.font, expected,
            "Page number font mismatch"
        );
        self
    }

    pub fn numbering_start(self, expected: Option<u32>) -> Self {
        assert_eq!(
            self.model.numberize_title.map(|n| n.start),
            expected,
            "Title numbering mismatch"
        );
        self
    }

    /// Assert the error codes, in order
    pub fn error_codes(self, expected: &[DiagnosticCode]) -> Self {
        let actual = codes(&self.model.diagnostics.errors);
        assert_eq!(
            actual,
            expected,
            "Error codes mismatch: [{}]",
            summarize_diagnostics(&self.model.diagnostics.errors)
        );
        self
    }

    /// Assert the warning codes, in order
    pub fn warning_codes(self, expected: &[DiagnosticCode]) -> Self {
        let actual = codes(&self.model.diagnostics.warnings);
        assert_eq!(
            actual,
            expected,
            "Warning codes mismatch: [{}]",
            summarize_diagnostics(&self.model.diagnostics.warnings)
        );
        self
    }

    /// Assert some error message contains `fragment`
    pub fn error_containing(self, fragment: &str) -> Self {
        assert!(
            self.model
                .diagnostics
                .errors
                .iter()
                .any(|e| e.message.contains(fragment)),
            "No error contains '{}': [{}]",
            fragment,
            summarize_diagnostics(&self.model.diagnostics.errors)
        );
        self
    }

    pub fn no_errors(self) -> Self {
        self.error_codes(&[])
    }

    pub fn no_warnings(self) -> Self {
        self.warning_codes(&[])
    }
}

// ============================================================================
// Item Assertions
// ============================================================================

pub struct ItemAssertion<'a> {
    item: &'a DocumentItem,
    context: String,
}

impl<'a> ItemAssertion<'a> {
    pub fn assert_title(self) -> TitleAssertion<'a> {
        match self.item {
            DocumentItem::Title(title) => TitleAssertion {
                title,
                context: self.context,
            },
            DocumentItem::Section(section) => panic!(
                "{}: Expected Title, found Section with style '{}'",
                self.context, section.style
            ),
        }
    }

    pub fn assert_section(self) -> SectionAssertion<'a> {
        match self.item {
            DocumentItem::Section(section) => SectionAssertion {
                section,
                context: self.context,
            },
            DocumentItem::Title(title) => panic!(
                "{}: Expected Section, found Title '{}'",
                self.context, title.text
            ),
        }
    }
}

pub struct TitleAssertion<'a> {
    title: &'a TitleItem,
    context: String,
}

impl TitleAssertion<'_> {
    pub fn text(self, expected: &str) -> Self {
        assert_eq!(self.title.text, expected, "{}: title text mismatch", self.context);
        self
    }

    pub fn level(self, expected: u32) -> Self {
        assert_eq!(self.title.level, expected, "{}: title level mismatch", self.context);
        self
    }

    pub fn style(self, expected: &str) -> Self {
        assert_eq!(self.title.style, expected, "{}: title style mismatch", self.context);
        self
    }
}

pub struct SectionAssertion<'a> {
    section: &'a SectionItem,
    context: String,
}

impl SectionAssertion<'_> {
    pub fn style(self, expected: &str) -> Self {
        assert_eq!(
            self.section.style, expected,
            "{}: section style mismatch",
            self.context
        );
        self
    }

    /// Assert the inline runs, in order
    pub fn inlines(self, expected: &[Inline]) -> Self {
        assert_eq!(
            self.section.content, expected,
            "{}: section content mismatch",
            self.context
        );
        self
    }
}

// ============================================================================
// Helpers
// ============================================================================

fn codes(diagnostics: &[Diagnostic]) -> Vec<DiagnosticCode> {
    diagnostics.iter().map(|d| d.code).collect()
}

fn summarize_items(items: &[DocumentItem]) -> String {
    items
        .iter()
        .map(|item| match item {
            DocumentItem::Title(t) => format!("Title({:?})", t.text),
            DocumentItem::Section(s) => format!("Section({}, {} runs)", s.style, s.content.len()),
        })
        .collect::<Vec<_>>()
        .join(", ")
}

fn summarize_diagnostics(diagnostics: &[Diagnostic]) -> String {
    diagnostics
        .iter()
        .map(|d| d.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdfy::pipeline::compile;

    #[test]
    fn test_fluent_chain() {
        let model = compile("$title(#level=2){A} $section(){b $bold(){c}}")
            .expect("compiles")
            .model;
        assert_model(&model)
            .style_names(&["defaultSectionStyle", "defaultTitleStyle"])
            .item_count(2)
            .item(0, |item| {
                item.assert_title().text("A").level(2).style("defaultTitleStyle");
            })
            .item(1, |item| {
                item.assert_section().style("defaultSectionStyle").inlines(&[
                    Inline::Text("b ".to_string()),
                    Inline::Bold("c".to_string()),
                ]);
            })
            .page_number_position(PageNumberPosition::BottomCenter)
            .numbering_start(None)
            .no_errors()
            .no_warnings();
    }

    #[test]
    #[should_panic(expected = "Expected Section, found Title")]
    fn test_wrong_item_kind_panics() {
        let model = compile("$title(){A}").expect("compiles").model;
        assert_model(&model).item(0, |item| {
            item.assert_section();
        });
    }
}
