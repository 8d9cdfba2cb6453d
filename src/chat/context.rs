//! Context Builder
//!
//! Bounds the document text embedded in a generation prompt. The cut is a
//! raw character-count prefix with no sentence boundary awareness; long
//! documents silently lose their tail. Known simplification.

/// Truncate `text` to at most `max_chars` characters.
///
/// Returns the input unchanged when it already fits. Idempotent.
pub fn build_context(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_index, _)) => &text[..byte_index],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_text_is_returned_unchanged() {
        assert_eq!(build_context("hello", 4000), "hello");
        assert_eq!(build_context("", 10), "");
    }

    #[test]
    fn long_text_is_cut_to_prefix() {
        let text = "a".repeat(5000);
        let context = build_context(&text, 4000);
        assert_eq!(context.chars().count(), 4000);
        assert!(text.starts_with(context));
    }

    #[test]
    fn exact_length_is_identity() {
        let text = "x".repeat(4000);
        assert_eq!(build_context(&text, 4000), text);
    }

    #[test]
    fn truncation_is_idempotent() {
        let text = "the sky is blue during the day. ".repeat(300);
        let once = build_context(&text, 4000);
        let twice = build_context(once, 4000);
        assert_eq!(once, twice);
    }

    #[test]
    fn cut_respects_char_boundaries() {
        // Multi-byte characters must not cause a mid-char slice
        let text = "é".repeat(10);
        let context = build_context(&text, 7);
        assert_eq!(context.chars().count(), 7);
    }

    #[test]
    fn length_never_exceeds_bound() {
        for len in [0, 1, 99, 100, 101, 250] {
            let text = "b".repeat(len);
            assert!(build_context(&text, 100).chars().count() <= 100);
        }
    }
}
