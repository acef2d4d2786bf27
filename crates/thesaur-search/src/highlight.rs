//! Highlighted, length-bounded excerpts of matching labels.
//!
//! Widths are counted in characters. Cuts never fall inside a word: a word
//! character is alphanumeric or `_`, everything else is a boundary.

use regex::Regex;
use thesaur_core::config::{check_highlight_widths, SearchConfig};
use thesaur_core::defaults::ELLIPSIS;
use thesaur_core::Result;
use tracing::{trace, warn};

/// Renders the first match of a pattern inside a label as an HTML excerpt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HighlightFormatter {
    max_occurrence_width: usize,
    max_context_width: usize,
    pre_tag: String,
    post_tag: String,
}

impl HighlightFormatter {
    /// Fails with `Error::Config` unless the occurrence width exceeds twice
    /// the context width.
    pub fn new(
        max_occurrence_width: usize,
        max_context_width: usize,
        pre_tag: impl Into<String>,
        post_tag: impl Into<String>,
    ) -> Result<Self> {
        check_highlight_widths(max_occurrence_width, max_context_width)?;
        Ok(Self {
            max_occurrence_width,
            max_context_width,
            pre_tag: pre_tag.into(),
            post_tag: post_tag.into(),
        })
    }

    pub fn from_config(config: &SearchConfig) -> Result<Self> {
        Self::new(
            config.max_occurrence_width,
            config.max_context_width,
            config.highlight_pre_tag.clone(),
            config.highlight_post_tag.clone(),
        )
    }

    pub fn max_occurrence_width(&self) -> usize {
        self.max_occurrence_width
    }

    pub fn max_context_width(&self) -> usize {
        self.max_context_width
    }

    /// Excerpt of `label` around the first match of `pattern`, with the
    /// match wrapped in the highlight tags and every piece HTML-escaped.
    ///
    /// A label the pattern does not match is rendered as its escaped,
    /// abbreviated prefix.
    pub fn highlight(&self, label: &str, pattern: &Regex) -> String {
        let Some(found) = pattern.find(label) else {
            warn!(
                label = label,
                pattern = pattern.as_str(),
                "Pattern does not match label, using abbreviated label"
            );
            return html_escape(&left_abbreviate_on_words(label, self.max_occurrence_width));
        };

        let before = right_abbreviate_on_words(&label[..found.start()], self.max_context_width);
        let matched = abbreviate_middle(found.as_str(), self.max_occurrence_width);
        let after = left_abbreviate_on_words(&label[found.end()..], self.max_context_width);
        trace!(before = %before, matched = %matched, after = %after, "Excerpt pieces");

        let mut out = html_escape(&before);
        if !matched.is_empty() {
            out.push_str(&self.pre_tag);
            out.push_str(&html_escape(&matched));
            out.push_str(&self.post_tag);
        }
        out.push_str(&html_escape(&after));
        out
    }
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn ellipsis_width() -> usize {
    ELLIPSIS.chars().count()
}

/// Keep the head of `text` within `width` characters, cutting at a word
/// boundary and appending an ellipsis.
///
/// Returns `text` unchanged when it fits, and an empty string when `width`
/// cannot even hold the ellipsis.
pub fn left_abbreviate_on_words(text: &str, width: usize) -> String {
    let chars: Vec<char> = text.chars().collect();
    if chars.len() <= width {
        return text.to_string();
    }
    let Some(budget) = width.checked_sub(ellipsis_width()) else {
        return String::new();
    };

    let mut end = budget;
    if end > 0 && is_word_char(chars[end - 1]) && is_word_char(chars[end]) {
        while end > 0 && is_word_char(chars[end - 1]) {
            end -= 1;
        }
    }

    let head: String = chars[..end].iter().collect();
    let mut out = head.trim_end().to_string();
    out.push_str(ELLIPSIS);
    out
}

/// Keep the tail of `text` within `width` characters, cutting at a word
/// boundary and prepending an ellipsis.
pub fn right_abbreviate_on_words(text: &str, width: usize) -> String {
    let chars: Vec<char> = text.chars().collect();
    if chars.len() <= width {
        return text.to_string();
    }
    let Some(budget) = width.checked_sub(ellipsis_width()) else {
        return String::new();
    };

    let len = chars.len();
    let mut start = len - budget;
    if start < len && is_word_char(chars[start - 1]) && is_word_char(chars[start]) {
        while start < len && is_word_char(chars[start]) {
            start += 1;
        }
    }

    let tail: String = chars[start..].iter().collect();
    format!("{}{}", ELLIPSIS, tail.trim_start())
}

/// Shorten `text` to `width` characters by replacing its middle with an
/// ellipsis. Widths too small for the ellipsis keep the first characters.
pub fn abbreviate_middle(text: &str, width: usize) -> String {
    let chars: Vec<char> = text.chars().collect();
    if chars.len() <= width {
        return text.to_string();
    }
    let ellipsis = ellipsis_width();
    if width <= ellipsis {
        return chars[..width].iter().collect();
    }

    let keep = width - ellipsis;
    let head = keep.div_ceil(2);
    let tail = keep / 2;
    let mut out: String = chars[..head].iter().collect();
    out.push_str(ELLIPSIS);
    out.extend(&chars[chars.len() - tail..]);
    out
}

/// Escape HTML special characters.
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pattern::compile_pattern;
    use thesaur_core::Error;

    fn formatter() -> HighlightFormatter {
        HighlightFormatter::new(20, 8, "<b>", "</b>").unwrap()
    }

    #[test]
    fn test_width_invariant() {
        assert!(HighlightFormatter::new(5, 2, "<b>", "</b>").is_ok());
        let err = HighlightFormatter::new(4, 2, "<b>", "</b>").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
        assert!(HighlightFormatter::from_config(&SearchConfig::default()).is_ok());
    }

    #[test]
    fn test_highlight_short_label() {
        let re = compile_pattern("appel").unwrap();
        assert_eq!(formatter().highlight("Appel public", &re), "<b>Appel</b> public");
    }

    #[test]
    fn test_highlight_escapes_each_piece() {
        let re = compile_pattern("appel").unwrap();
        assert_eq!(
            formatter().highlight("Procédure d'appel", &re),
            "...d&#39;<b>appel</b>"
        );
        let re = compile_pattern("<b>").unwrap();
        assert_eq!(formatter().highlight("a<b>c", &re), "a<b>&lt;b&gt;</b>c");
    }

    #[test]
    fn test_highlight_abbreviates_context() {
        let re = compile_pattern("marché").unwrap();
        let out = formatter().highlight(
            "Procédure adaptée pour marché de travaux publics urgents",
            &re,
        );
        assert_eq!(out, "...pour <b>marché</b> de...");
    }

    #[test]
    fn test_highlight_abbreviates_long_match() {
        let re = compile_pattern("a.*z").unwrap();
        let label = "abcdefghijklmnopqrstuvwxyz";
        assert_eq!(formatter().highlight(label, &re), "<b>abcdefghi...stuvwxyz</b>");
    }

    #[test]
    fn test_highlight_empty_match_has_no_tags() {
        let re = compile_pattern("").unwrap();
        assert_eq!(formatter().highlight("Appel", &re), "Appel");
    }

    #[test]
    fn test_highlight_without_match_falls_back_to_prefix() {
        let re = compile_pattern("zzz").unwrap();
        let out = formatter().highlight("Appel d'offres ouvert au public", &re);
        assert_eq!(out, "Appel d&#39;offres...");
    }

    #[test]
    fn test_left_abbreviate_on_words() {
        assert_eq!(left_abbreviate_on_words("short", 10), "short");
        assert_eq!(left_abbreviate_on_words("de travaux publics", 8), "de...");
        assert_eq!(left_abbreviate_on_words("anticonstitutionnel", 8), "...");
        assert_eq!(left_abbreviate_on_words("abc def", 2), "");
    }

    #[test]
    fn test_right_abbreviate_on_words() {
        assert_eq!(right_abbreviate_on_words("short", 10), "short");
        assert_eq!(right_abbreviate_on_words("Procédure adaptée", 10), "...adaptée");
        assert_eq!(right_abbreviate_on_words("anticonstitutionnel", 8), "...");
    }

    #[test]
    fn test_abbreviate_middle() {
        assert_eq!(abbreviate_middle("abcdef", 10), "abcdef");
        assert_eq!(abbreviate_middle("abcdefghij", 8), "abc...ij");
        assert_eq!(abbreviate_middle("abcdefghij", 3), "abc");
        assert_eq!(abbreviate_middle("ééééééééé", 5), "é...é");
    }

    #[test]
    fn test_abbreviation_never_splits_words() {
        let samples = [
            "Appel d'offres ouvert au public",
            "Procédure adaptée pour marché de travaux publics urgents",
            "x_y_z alpha-beta gamma, delta; epsilon",
            "Ünïcödé wörds everywhere in thïs lâbel",
        ];
        for text in samples {
            let chars: Vec<char> = text.chars().collect();
            for width in ellipsis_width()..chars.len() {
                let left = left_abbreviate_on_words(text, width);
                assert!(left.chars().count() <= width, "{:?} at {}", left, width);
                let head = left.strip_suffix(ELLIPSIS).unwrap();
                assert!(text.starts_with(head));
                let next = chars[head.chars().count()];
                let head_ends_word = head.chars().last().is_some_and(is_word_char);
                assert!(
                    !(head_ends_word && is_word_char(next)),
                    "{:?} cut inside a word at {}",
                    left,
                    width
                );

                let right = right_abbreviate_on_words(text, width);
                assert!(right.chars().count() <= width, "{:?} at {}", right, width);
                let tail = right.strip_prefix(ELLIPSIS).unwrap();
                assert!(text.ends_with(tail));
                let prev = chars[chars.len() - tail.chars().count() - 1];
                let tail_starts_word = tail.chars().next().is_some_and(is_word_char);
                assert!(
                    !(tail_starts_word && is_word_char(prev)),
                    "{:?} cut inside a word at {}",
                    right,
                    width
                );
            }
        }
    }

    #[test]
    fn test_html_escape() {
        assert_eq!(html_escape("<a href=\"x\">R&D's</a>"), "&lt;a href=&quot;x&quot;&gt;R&amp;D&#39;s&lt;/a&gt;");
    }
}
