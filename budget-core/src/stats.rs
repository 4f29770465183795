//! Statistics Extractor.
//!
//! Counts computed over the visible text of a rendered proposal. The same
//! plain-text rendering is what the clipboard export copies.

use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Html, Node};
use serde::{Deserialize, Serialize};

use crate::BudgetDocument;
use crate::composer::content::CHECK_MARK;

/// Elements whose content is never visible.
const HIDDEN_ELEMENTS: [&str; 5] = ["style", "script", "title", "template", "noscript"];

/// Elements followed by a line break.
const BLOCK_ELEMENTS: [&str; 17] = [
    "p", "div", "li", "tr", "h1", "h2", "h3", "h4", "h5", "h6", "header", "footer", "table",
    "thead", "tbody", "ul", "ol",
];

static WHITESPACE_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));

/// Word, character and checklist counts plus a 0..=100 quality score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DocumentStats {
    pub word_count: usize,
    /// UTF-16 code units of the plain text.
    pub char_count: usize,
    pub checklist_item_count: usize,
    pub score: u32,
}

/// Computes the statistics of a rendered proposal.
pub fn stats(document: &BudgetDocument) -> DocumentStats {
    let markup = document.as_str();
    let text = plain_text(markup);

    let word_count = WHITESPACE_RUN.find_iter(&text).count() + 1;
    let char_count = text.encode_utf16().count();
    let checklist_item_count = markup.matches(CHECK_MARK).count();

    DocumentStats {
        word_count,
        char_count,
        checklist_item_count,
        score: score(word_count, char_count, checklist_item_count),
    }
}

/// Visible text of an HTML fragment.
///
/// The markup is parsed as HTML, so attributes and character references are
/// handled the way a browser handles them. `<style>`/`<script>` bodies are
/// dropped, block boundaries become line breaks and table cells are tab
/// separated. Lines are trimmed and blank lines removed.
pub fn plain_text(markup: &str) -> String {
    let fragment = Html::parse_fragment(markup);
    let mut text = String::new();
    collect_text(fragment.root_element(), &mut text);

    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

fn collect_text(
    element: ElementRef<'_>,
    out: &mut String,
) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => out.push_str(text),
            Node::Element(inner) => {
                let name = inner.name();
                if HIDDEN_ELEMENTS.contains(&name) {
                    continue;
                }
                if name == "br" {
                    out.push('\n');
                    continue;
                }
                if let Some(child) = ElementRef::wrap(child) {
                    collect_text(child, out);
                }
                if matches!(name, "td" | "th") {
                    out.push('\t');
                } else if BLOCK_ELEMENTS.contains(&name) {
                    out.push('\n');
                }
            }
            _ => {}
        }
    }
}

fn score(
    words: usize,
    chars: usize,
    items: usize,
) -> u32 {
    let raw = words as f64 / 10.0 + chars as f64 / 100.0 + items as f64 * 5.0;
    ((raw + 0.5).floor() as u32).min(100)
}

#[cfg(test)]
mod tests {
    use chrono::{Local, TimeZone};
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::FormState;
    use crate::composer::{ComposeContext, compose};

    #[test]
    fn strips_tags_styles_and_scripts() {
        let markup = "<style>p { color: red }</style><div><p>Olá <strong>mundo</strong></p><script>alert(1)</script></div>";

        assert_eq!(plain_text(markup), "Olá mundo");
    }

    #[test]
    fn decodes_escaped_entities() {
        assert_eq!(
            plain_text("<p>A &amp; B &lt;ok&gt; &quot;x&quot; &#39;y&#39;</p>"),
            "A & B <ok> \"x\" 'y'"
        );
    }

    #[test]
    fn decodes_named_and_numeric_references() {
        assert_eq!(
            plain_text("<p>Caf&eacute; &#8211; 10&nbsp;dias &copy;</p>"),
            "Café – 10\u{a0}dias ©"
        );
    }

    #[test]
    fn angle_bracket_inside_attribute_is_not_text() {
        assert_eq!(plain_text(r#"<p title="1 > 0">texto</p>"#), "texto");
    }

    #[test]
    fn line_breaks_split_lines() {
        assert_eq!(plain_text("<p>um<br>dois<br/>três</p>"), "um\ndois\ntrês");
    }

    #[test]
    fn table_cells_and_blocks_are_separated() {
        let markup = "<table><tr><td>Logo</td><td>1</td></tr></table><p>fim</p>";

        assert_eq!(plain_text(markup), "Logo\t1\nfim");
    }

    #[test]
    fn counts_words_chars_and_check_marks() {
        let document = BudgetDocument::new("<p>um dois</p><p>✅ três</p>");

        let stats = stats(&document);

        // "um dois\n✅ três"
        assert_eq!(stats.word_count, 4);
        assert_eq!(stats.char_count, 14);
        assert_eq!(stats.checklist_item_count, 1);
        // 0.4 + 0.14 + 5 = 5.54
        assert_eq!(stats.score, 6);
    }

    #[test]
    fn char_count_uses_utf16_units() {
        let stats = stats(&BudgetDocument::new("<p>🚀</p>"));

        assert_eq!(stats.char_count, 2);
    }

    #[test]
    fn empty_document_counts_one_word() {
        let stats = stats(&BudgetDocument::default());

        assert_eq!(stats.word_count, 1);
        assert_eq!(stats.char_count, 0);
        assert_eq!(stats.score, 0);
    }

    #[test]
    fn score_rounds_half_up_and_caps_at_100() {
        assert_eq!(score(5, 0, 0), 1);
        assert_eq!(score(4, 0, 0), 0);
        assert_eq!(score(2000, 5000, 6), 100);
    }

    #[test]
    fn composed_proposal_scores_its_checklist() {
        let ctx = ComposeContext::new(Local.with_ymd_and_hms(2025, 1, 2, 9, 0, 0).unwrap());
        let document = compose(&FormState::default(), &ctx);

        let stats = stats(&document);

        assert_eq!(stats.checklist_item_count, 6);
        assert!(stats.word_count > 100);
        assert!((30..=100).contains(&stats.score));
    }
}
