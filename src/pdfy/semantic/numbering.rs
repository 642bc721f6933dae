//! Title numbering post-pass
//!
//! Keeps one counter per title level, all starting at 1. A title at or below the start
//! level is prefixed with the counters from the start level down to its own level, then
//! its own counter is incremented and every deeper counter goes back to 1. Shallower
//! counters are left alone, so levels 1, 2, 1, 2 come out as 1, 2.1, 2, 3.1.

use crate::pdfy::config::Bounds;
use crate::pdfy::model::{DocumentItem, NumberizeTitleConfig};

pub fn numberize(content: &mut [DocumentItem], numbering: NumberizeTitleConfig, levels: Bounds) {
    let max = levels.max as usize;
    let start = numbering.start as usize;
    let mut counters = vec![1u32; max + 1];

    for item in content.iter_mut() {
        let DocumentItem::Title(title) = item else {
            continue;
        };
        let level = title.level as usize;
        if level < start || level > max {
            continue;
        }

        let number: Vec<String> = counters[start..=level]
            .iter()
            .map(|counter| counter.to_string())
            .collect();
        title.text = format!("{}. {}", number.join("."), title.text);
        log::trace!("numbering: level {} title is now {:?}", level, title.text);

        counters[level] += 1;
        for deeper in &mut counters[level + 1..] {
            *deeper = 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdfy::model::{SectionItem, TitleItem};

    const LEVELS: Bounds = Bounds { min: 1, max: 6 };

    fn title(level: u32, text: &str) -> DocumentItem {
        DocumentItem::Title(TitleItem {
            style: "defaultTitleStyle".to_string(),
            level,
            text: text.to_string(),
        })
    }

    fn texts(content: &[DocumentItem]) -> Vec<String> {
        content
            .iter()
            .filter_map(|item| match item {
                DocumentItem::Title(t) => Some(t.text.clone()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_counters_are_not_reset_above_the_title() {
        let mut content = vec![title(1, "A"), title(2, "B"), title(1, "C"), title(2, "D")];
        numberize(&mut content, NumberizeTitleConfig { start: 1 }, LEVELS);
        assert_eq!(texts(&content), vec!["1. A", "2.1. B", "2. C", "3.1. D"]);
    }

    #[test]
    fn test_deeper_counters_reset() {
        let mut content = vec![title(2, "a"), title(2, "b"), title(3, "c"), title(2, "d"), title(3, "e")];
        numberize(&mut content, NumberizeTitleConfig { start: 2 }, LEVELS);
        assert_eq!(texts(&content), vec!["1. a", "2. b", "3.1. c", "3. d", "4.1. e"]);
    }

    #[test]
    fn test_titles_above_start_level_are_untouched() {
        let mut content = vec![title(1, "Top"), title(2, "Sub"), title(3, "Deep")];
        numberize(&mut content, NumberizeTitleConfig { start: 2 }, LEVELS);
        assert_eq!(texts(&content), vec!["Top", "1. Sub", "2.1. Deep"]);
    }

    #[test]
    fn test_sections_are_skipped() {
        let section = DocumentItem::Section(SectionItem {
            style: "defaultSectionStyle".to_string(),
            content: Vec::new(),
        });
        let mut content = vec![section.clone(), title(1, "T")];
        numberize(&mut content, NumberizeTitleConfig { start: 1 }, LEVELS);
        assert_eq!(content[0], section);
        assert_eq!(texts(&content), vec!["1. T"]);
    }
}
