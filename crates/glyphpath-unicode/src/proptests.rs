use super::*;
use proptest::prelude::*;

fn without_breaks(text: &str) -> String {
    normalize(text).chars().filter(|ch| !is_line_break(*ch)).collect()
}

// Property: segmentation has no hidden state
proptest! {
    #[test]
    fn prop_segment_is_deterministic(s in "\\PC{0,40}") {
        let segmenter = TextSegmenter::new();
        let first = segmenter.segment(&s, TextDirection::Auto);
        let second = segmenter.segment(&s, TextDirection::Auto);
        prop_assert_eq!(first, second);
    }
}

// Property: spans cover every codepoint exactly once, in order, without reordering
proptest! {
    #[test]
    fn prop_spans_cover_line(s in "[a-zA-Z0-9 \\t\\n\\r\u{0300}-\u{0302}αβγ]{0,60}") {
        let segmenter = TextSegmenter::plain().with_scripts(Some(Arc::new(IcuScriptDetector::new())));
        let lines = segmenter.segment(&s, TextDirection::Ltr);

        let joined: String = lines.iter().map(TextLine::text).collect();
        prop_assert_eq!(joined, without_breaks(&s));

        for line in &lines {
            for span in &line.spans {
                prop_assert!(!span.codepoints.is_empty());
            }
        }
    }
}

// Property: one more line than there are separators
proptest! {
    #[test]
    fn prop_line_count_matches_separators(s in "[ab\\n\u{2028}\u{000B}]{0,30}") {
        let segmenter = TextSegmenter::plain();
        let breaks = s.chars().filter(|ch| is_line_break(*ch)).count();
        prop_assert_eq!(segmenter.segment(&s, TextDirection::Auto).len(), breaks + 1);
    }
}

// Property: a tab always turns into exactly TAB_WIDTH spaces
proptest! {
    #[test]
    fn prop_tab_expansion_width(prefix in "[a-z]{0,10}", suffix in "[a-z]{0,10}") {
        let text = format!("{prefix}\t{suffix}");
        let normalized = normalize(&text);
        prop_assert_eq!(normalized.chars().count(), prefix.len() + suffix.len() + TAB_WIDTH);
    }
}

// Property: lossy decoding of valid UTF-8 is the identity
proptest! {
    #[test]
    fn prop_lossy_decode_valid_input(s in "\\PC{0,40}") {
        prop_assert_eq!(decode_utf8_lossy_skip(s.as_bytes()), s);
    }
}
