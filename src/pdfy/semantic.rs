//! Semantic analysis
//!
//!     Turns the parsed instruction list into a [Model]. The analysis is a fold over the
//!     instructions in document order: every step takes the current [AnalysisState] and one
//!     instruction, and returns the next state. Nothing here fails; problems are recorded as
//!     diagnostics and the offending instruction is either dropped (error) or kept with the
//!     corrected value (warning).
//!
//!     Per instruction the checks run in a fixed order and the first failing stage decides:
//!
//!         1. Unknown argument names.
//!         2. Argument types.
//!         3. Kind-specific errors (duplicates, unknown styles, nesting).
//!         4. Value corrections (fonts, colors, ranges), reported as warnings.
//!         5. Merge over the defaults from [PdfyConfig].
//!
//!     When a `$numberizeTitle` was accepted, [numbering] runs over the finished content.

pub mod arguments;
pub mod numbering;

use std::collections::HashSet;

use crate::pdfy::ast::{
    Arguments, Block, ContentNode, Directive, Emphasis, EmphasisKind, Instruction, Literal,
};
use crate::pdfy::config::PdfyConfig;
use crate::pdfy::diagnostics::{Diagnostic, DiagnosticCode, Diagnostics};
use crate::pdfy::model::{
    DocumentItem, Inline, Model, NumberizeTitleConfig, PageNumberConfig, SectionItem, Style,
    TitleItem,
};
use crate::pdfy::token::Keyword;
use arguments::{
    check_signature, ArgumentReader, Signature, NUMBERIZE_TITLE, PAGE_NUMBER, SECTION, STYLE, TITLE,
};

/// Analyze a parsed document against a configuration
pub fn analyze(instructions: Vec<Instruction>, config: &PdfyConfig) -> Model {
    instructions
        .into_iter()
        .fold(AnalysisState::new(config), AnalysisState::step)
        .finish()
}

/// Everything the analyzer has accepted so far
#[derive(Debug, Clone)]
pub struct AnalysisState<'c> {
    config: &'c PdfyConfig,
    styles: Vec<Style>,
    style_names: HashSet<String>,
    page_number: Option<PageNumberConfig>,
    numberize_title: Option<NumberizeTitleConfig>,
    content: Vec<DocumentItem>,
    diagnostics: Diagnostics,
}

impl<'c> AnalysisState<'c> {
    /// A fresh state holding the two built-in styles
    pub fn new(config: &'c PdfyConfig) -> Self {
        let builtins = [&config.styles.section, &config.styles.title];
        let styles: Vec<Style> = builtins
            .into_iter()
            .map(|defaults| Style {
                name: defaults.name.clone(),
                font: defaults.font.clone(),
                font_size: defaults.font_size,
                font_color: defaults.font_color.clone(),
                builtin: true,
            })
            .collect();
        let style_names = styles.iter().map(|style| style.name.clone()).collect();

        Self {
            config,
            styles,
            style_names,
            page_number: None,
            numberize_title: None,
            content: Vec::new(),
            diagnostics: Diagnostics::new(),
        }
    }

    /// Analyze one top-level instruction
    pub fn step(mut self, instruction: Instruction) -> Self {
        log::debug!(
            "semantic: {} at line {}",
            instruction.keyword(),
            instruction.line()
        );
        match instruction {
            Instruction::Style(directive) => self.style(directive),
            Instruction::PageNumber(directive) => self.page_number(directive),
            Instruction::NumberizeTitle(directive) => self.numberize_title(directive),
            Instruction::Title(block) => self.title(block),
            Instruction::Section(block) => self.section(block),
            Instruction::Emphasis(emphasis) => {
                let keyword = emphasis.kind.keyword();
                self.diagnostics.push(Diagnostic::error(
                    DiagnosticCode::MisplacedEmphasis,
                    emphasis.line,
                    format!("{keyword} can only be declared inside a $section"),
                ));
            }
        }
        self
    }

    /// Apply document-wide defaults and the numbering post-pass
    pub fn finish(self) -> Model {
        let config = self.config;
        let mut content = self.content;
        if let Some(numbering) = self.numberize_title {
            numbering::numberize(&mut content, numbering, config.limits.title_level);
        }

        let page_number = self.page_number.unwrap_or_else(|| PageNumberConfig {
            position: config.page_number.position,
            font: config.page_number.font.clone(),
            font_size: config.page_number.font_size,
            font_color: config.page_number.font_color.clone(),
            start: config.page_number.start,
        });

        log::debug!(
            "semantic: {} styles, {} items, {} errors, {} warnings",
            self.styles.len(),
            content.len(),
            self.diagnostics.errors.len(),
            self.diagnostics.warnings.len()
        );

        Model {
            styles: self.styles,
            page_number,
            numberize_title: self.numberize_title,
            content,
            diagnostics: self.diagnostics,
        }
    }

    /// Record signature errors; false means the instruction is dropped
    fn signature_ok(
        &mut self,
        keyword: Keyword,
        line: usize,
        arguments: &Arguments,
        signature: Signature,
    ) -> bool {
        let errors = check_signature(keyword, line, arguments, signature);
        let ok = errors.is_empty();
        self.diagnostics.extend(errors);
        ok
    }

    fn style(&mut self, directive: Directive) {
        let Directive { arguments, line } = directive;
        if !self.signature_ok(Keyword::Style, line, &arguments, STYLE) {
            return;
        }

        let config = self.config;
        let mut reader = ArgumentReader::new(Keyword::Style, line, &arguments, config);
        let Some(name) = reader.text("name") else {
            self.diagnostics.push(Diagnostic::error(
                DiagnosticCode::MissingArgument,
                line,
                "$style requires a #name argument",
            ));
            return;
        };
        if self.style_names.contains(name) {
            self.diagnostics.push(Diagnostic::error(
                DiagnosticCode::DuplicateStyle,
                line,
                format!("style '{name}' is a duplicate: a style with this name already exists"),
            ));
            return;
        }

        let defaults = &config.styles.section;
        let style = Style {
            name: name.to_string(),
            font: reader.font("font", &defaults.font),
            font_size: reader.bounded("fontSize", config.limits.font_size, defaults.font_size),
            font_color: reader.color("fontColor", &defaults.font_color),
            builtin: false,
        };
        self.diagnostics.extend(reader.into_warnings());
        self.style_names.insert(style.name.clone());
        self.styles.push(style);
    }

    fn page_number(&mut self, directive: Directive) {
        let Directive { arguments, line } = directive;
        if !self.signature_ok(Keyword::PageNumber, line, &arguments, PAGE_NUMBER) {
            return;
        }
        if self.page_number.is_some() {
            self.diagnostics.push(Diagnostic::error(
                DiagnosticCode::DuplicatePageNumber,
                line,
                "$pageNumber can only be called once",
            ));
            return;
        }

        let config = self.config;
        let defaults = &config.page_number;
        let mut reader = ArgumentReader::new(Keyword::PageNumber, line, &arguments, config);
        let page_number = PageNumberConfig {
            position: reader.position("pageNumberPosition", defaults.position),
            font: reader.font("pageNumberFont", &defaults.font),
            font_size: reader.bounded(
                "pageNumberFontSize",
                config.limits.font_size,
                defaults.font_size,
            ),
            font_color: reader.color("pageNumberFontColor", &defaults.font_color),
            start: reader.bounded("pageNumberStart", config.limits.page_start, defaults.start),
        };
        self.diagnostics.extend(reader.into_warnings());
        self.page_number = Some(page_number);
    }

    fn numberize_title(&mut self, directive: Directive) {
        let Directive { arguments, line } = directive;
        if !self.signature_ok(
            Keyword::NumberizeTitle,
            line,
            &arguments,
            NUMBERIZE_TITLE,
        ) {
            return;
        }

        let config = self.config;
        let mut reader = ArgumentReader::new(Keyword::NumberizeTitle, line, &arguments, config);
        let start = reader.bounded(
            "numberizeTitleStart",
            config.limits.title_level,
            config.numberize_title.start,
        );
        self.diagnostics.extend(reader.into_warnings());
        self.numberize_title = Some(NumberizeTitleConfig { start });
    }

    fn title(&mut self, block: Block) {
        let Block {
            arguments,
            content,
            line,
        } = block;
        if !self.signature_ok(Keyword::Title, line, &arguments, TITLE) {
            return;
        }

        let config = self.config;
        let mut reader = ArgumentReader::new(Keyword::Title, line, &arguments, config);
        let style = reader.text("style").unwrap_or(config.styles.title.name.as_str());

        let mut errors = Vec::new();
        if !self.style_names.contains(style) {
            errors.push(unknown_style(Keyword::Title, line, style));
        }
        let mut text = String::new();
        for node in content {
            match node {
                ContentNode::Text(fragment) => text.push_str(&fragment),
                ContentNode::Instruction(nested) => errors.push(Diagnostic::error(
                    DiagnosticCode::InvalidNesting,
                    nested.line(),
                    format!(
                        "{} is not allowed inside a $title; a title holds plain text only",
                        nested.keyword()
                    ),
                )),
            }
        }
        if !errors.is_empty() {
            self.diagnostics.extend(errors);
            return;
        }

        let level = reader.bounded("level", config.limits.title_level, config.title.level);
        let item = TitleItem {
            style: style.to_string(),
            level,
            text,
        };
        self.diagnostics.extend(reader.into_warnings());
        self.content.push(DocumentItem::Title(item));
    }

    fn section(&mut self, block: Block) {
        let Block {
            arguments,
            content,
            line,
        } = block;
        if !self.signature_ok(Keyword::Section, line, &arguments, SECTION) {
            return;
        }

        let config = self.config;
        let style = match arguments.get("style") {
            Some(Literal::Str(name)) => name.as_str(),
            _ => config.styles.section.name.as_str(),
        };

        let mut errors = Vec::new();
        if !self.style_names.contains(style) {
            errors.push(unknown_style(Keyword::Section, line, style));
        }
        let mut inlines = Vec::new();
        for node in content {
            match node {
                ContentNode::Text(text) => inlines.push(Inline::Text(text)),
                ContentNode::Instruction(Instruction::Emphasis(emphasis)) => {
                    match section_emphasis(emphasis) {
                        Ok(inline) => inlines.push(inline),
                        Err(error) => errors.push(error),
                    }
                }
                ContentNode::Instruction(nested) => errors.push(Diagnostic::error(
                    DiagnosticCode::InvalidNesting,
                    nested.line(),
                    format!(
                        "{} is not allowed inside a $section; only text, $bold, $italic and $underlined are",
                        nested.keyword()
                    ),
                )),
            }
        }
        if !errors.is_empty() {
            self.diagnostics.extend(errors);
            return;
        }

        self.content.push(DocumentItem::Section(SectionItem {
            style: style.to_string(),
            content: inlines,
        }));
    }
}

fn unknown_style(keyword: Keyword, line: usize, style: &str) -> Diagnostic {
    Diagnostic::error(
        DiagnosticCode::UnknownStyle,
        line,
        format!("{keyword}: referenced style '{style}' does not exist"),
    )
}

fn section_emphasis(emphasis: Emphasis) -> Result<Inline, Diagnostic> {
    let Emphasis { kind, text, line } = emphasis;
    if text.is_empty() {
        return Err(Diagnostic::error(
            DiagnosticCode::EmptyEmphasis,
            line,
            format!("{} requires text between its braces", kind.keyword()),
        ));
    }
    Ok(match kind {
        EmphasisKind::Bold => Inline::Bold(text),
        EmphasisKind::Italic => Inline::Italic(text),
        EmphasisKind::Underlined => Inline::Underlined(text),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdfy::config::load_defaults;
    use crate::pdfy::model::PageNumberPosition;
    use crate::pdfy::parsing::parse_source;

    fn analyze_source(source: &str) -> Model {
        let config = load_defaults().expect("defaults");
        let instructions = parse_source(source).unwrap_or_else(|e| panic!("{source:?}: {e}"));
        analyze(instructions, &config)
    }

    fn codes(diagnostics: &[Diagnostic]) -> Vec<DiagnosticCode> {
        diagnostics.iter().map(|d| d.code).collect()
    }

    #[test]
    fn test_builtin_styles_present() {
        let model = analyze_source("$section(){x}");
        let names: Vec<&str> = model.styles.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["defaultSectionStyle", "defaultTitleStyle"]);
        assert!(model.styles.iter().all(|s| s.builtin));
        assert!(model.diagnostics.is_empty());
    }

    #[test]
    fn test_style_merges_over_section_defaults() {
        let model = analyze_source(r#"$style(#name="Body", #fontSize=14)"#);
        let style = model.style("Body").expect("Body registered");
        assert_eq!(style.font, "Helvetica");
        assert_eq!(style.font_size, 14);
        assert_eq!(style.font_color, "black");
        assert!(!style.builtin);
    }

    #[test]
    fn test_style_without_name() {
        let model = analyze_source(r#"$style(#font="Courier")"#);
        assert_eq!(model.styles.len(), 2);
        assert_eq!(codes(&model.diagnostics.errors), vec![DiagnosticCode::MissingArgument]);
    }

    #[test]
    fn test_style_cannot_shadow_builtin() {
        let model = analyze_source(r#"$style(#name="defaultTitleStyle")"#);
        assert_eq!(model.styles.len(), 2);
        assert_eq!(codes(&model.diagnostics.errors), vec![DiagnosticCode::DuplicateStyle]);
        assert!(model.diagnostics.errors[0].message.contains("duplicate"));
    }

    #[test]
    fn test_style_warnings_keep_instruction() {
        let model = analyze_source(
            r#"$style(#name="S", #font="Arial", #fontSize=200, #fontColor="blurple")"#,
        );
        let style = model.style("S").expect("S registered despite warnings");
        assert_eq!(style.font, "Helvetica");
        assert_eq!(style.font_size, 12);
        assert_eq!(style.font_color, "black");
        assert_eq!(
            codes(&model.diagnostics.warnings),
            vec![
                DiagnosticCode::UnregisteredFont,
                DiagnosticCode::OutOfRange,
                DiagnosticCode::UnknownColor
            ]
        );
    }

    #[test]
    fn test_style_name_must_be_text() {
        let model = analyze_source("$style(#name=5)");
        assert_eq!(codes(&model.diagnostics.errors), vec![DiagnosticCode::InvalidArgumentType]);
        assert_eq!(model.styles.len(), 2);
    }

    #[test]
    fn test_page_number_defaults_when_absent() {
        let model = analyze_source("$section(){x}");
        assert_eq!(model.page_number.position, PageNumberPosition::BottomCenter);
        assert_eq!(model.page_number.font_size, 10);
        assert_eq!(model.page_number.start, 1);
    }

    #[test]
    fn test_page_number_rejected_attempt_does_not_count() {
        let model = analyze_source(
            "$pageNumber(#bogus=1)\n$pageNumber(#pageNumberPosition=\"top-right\")",
        );
        assert_eq!(codes(&model.diagnostics.errors), vec![DiagnosticCode::UnknownArgument]);
        assert_eq!(model.page_number.position, PageNumberPosition::TopRight);
    }

    #[test]
    fn test_page_number_warnings() {
        let model = analyze_source(
            r##"$pageNumber(#pageNumberPosition="middle", #pageNumberStart=0, #pageNumberFontColor="#00ff00")"##,
        );
        assert_eq!(model.page_number.position, PageNumberPosition::BottomCenter);
        assert_eq!(model.page_number.start, 1);
        assert_eq!(model.page_number.font_color, "#00ff00");
        assert_eq!(
            codes(&model.diagnostics.warnings),
            vec![DiagnosticCode::InvalidPosition, DiagnosticCode::OutOfRange]
        );
    }

    #[test]
    fn test_section_content() {
        let model = analyze_source("$section(){Hello $bold(){big} $underlined(){line} end}");
        let section = model.sections().next().expect("section accepted");
        assert_eq!(section.style, "defaultSectionStyle");
        assert_eq!(
            section.content,
            vec![
                Inline::Text("Hello ".to_string()),
                Inline::Bold("big".to_string()),
                Inline::Underlined("line".to_string()),
                Inline::Text("end".to_string()),
            ]
        );
    }

    #[test]
    fn test_section_reports_every_violation() {
        let model = analyze_source(
            "$section(#style=\"Nope\"){a $title(){t} $bold(){} $italic(){ok} $section(){x}}",
        );
        assert_eq!(model.content.len(), 0);
        assert_eq!(
            codes(&model.diagnostics.errors),
            vec![
                DiagnosticCode::UnknownStyle,
                DiagnosticCode::InvalidNesting,
                DiagnosticCode::EmptyEmphasis,
                DiagnosticCode::InvalidNesting,
            ]
        );
    }

    #[test]
    fn test_section_uses_declared_style() {
        let model = analyze_source("$style(#name=\"Body\") $section(#style=\"Body\"){x}");
        assert_eq!(model.sections().next().map(|s| s.style.as_str()), Some("Body"));
    }

    #[test]
    fn test_style_must_be_declared_before_use() {
        let model = analyze_source("$section(#style=\"Body\"){x} $style(#name=\"Body\")");
        assert_eq!(model.content.len(), 0);
        assert_eq!(codes(&model.diagnostics.errors), vec![DiagnosticCode::UnknownStyle]);
    }

    #[test]
    fn test_title_defaults_and_flattening() {
        let model = analyze_source("$title(){Chapter}");
        let title = model.titles().next().expect("title accepted");
        assert_eq!(title.style, "defaultTitleStyle");
        assert_eq!(title.level, 1);
        assert_eq!(title.text, "Chapter");
    }

    #[test]
    fn test_title_rejects_nested_instructions() {
        let model = analyze_source("$title(){A $bold(){B} C}");
        assert_eq!(model.content.len(), 0);
        assert_eq!(codes(&model.diagnostics.errors), vec![DiagnosticCode::InvalidNesting]);
    }

    #[test]
    fn test_title_level_out_of_range() {
        let model = analyze_source("$title(#level=9){Deep}");
        assert_eq!(model.titles().next().map(|t| t.level), Some(1));
        assert_eq!(codes(&model.diagnostics.warnings), vec![DiagnosticCode::OutOfRange]);
    }

    #[test]
    fn test_top_level_emphasis() {
        let model = analyze_source("$italic(){x}");
        assert_eq!(model.content.len(), 0);
        let error = &model.diagnostics.errors[0];
        assert_eq!(error.code, DiagnosticCode::MisplacedEmphasis);
        assert_eq!(error.message, "$italic can only be declared inside a $section");
    }

    #[test]
    fn test_last_numberize_title_wins() {
        let model = analyze_source(
            "$title(#level=2){B} $numberizeTitle(#numberizeTitleStart=1) $numberizeTitle(#numberizeTitleStart=2)",
        );
        assert_eq!(model.numberize_title, Some(NumberizeTitleConfig { start: 2 }));
        assert_eq!(model.titles().next().map(|t| t.text.as_str()), Some("1. B"));
    }

    #[test]
    fn test_numberize_title_out_of_range() {
        let model = analyze_source("$numberizeTitle(#numberizeTitleStart=0)");
        assert_eq!(model.numberize_title, Some(NumberizeTitleConfig { start: 1 }));
        assert_eq!(codes(&model.diagnostics.warnings), vec![DiagnosticCode::OutOfRange]);
    }

    #[test]
    fn test_without_numberize_titles_are_plain() {
        let model = analyze_source("$title(){A} $title(#level=2){B}");
        let texts: Vec<&str> = model.titles().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["A", "B"]);
        assert!(model.numberize_title.is_none());
    }
}
