use unicode_segmentation::UnicodeSegmentation;

/// Trims surrounding whitespace and keeps at most `max_graphemes` grapheme clusters.
pub(super) fn clean(raw: &str, max_graphemes: usize) -> String {
    raw.trim().graphemes(true).take(max_graphemes).collect()
}
