//! Fixed-length segmentation of extracted document text.

/// Splits raw text into contiguous, bounded-length segments.
///
/// Segments are consecutive character slices with no overlap and no loss:
/// concatenating the segments reconstructs the original content exactly. The
/// last segment may be shorter than the configured maximum.
///
/// # Examples
///
/// ```
/// use chatloom::rag::segmenter::TextSegmenter;
///
/// let segmenter = TextSegmenter::new(4);
/// let segments = segmenter.segment("abcdefghij");
/// assert_eq!(segments, vec!["abcd", "efgh", "ij"]);
/// assert_eq!(segments.concat(), "abcdefghij");
/// ```
#[derive(Clone, Copy, Debug)]
pub struct TextSegmenter {
    max_chars: usize,
}

impl TextSegmenter {
    /// Creates a segmenter producing segments of at most `max_chars`
    /// characters. A zero bound would never terminate, so it is clamped to 1.
    #[must_use]
    pub fn new(max_chars: usize) -> Self {
        Self {
            max_chars: max_chars.max(1),
        }
    }

    /// Maximum segment length in characters.
    #[must_use]
    pub fn max_chars(&self) -> usize {
        self.max_chars
    }

    /// Splits `content` into segments. Empty content yields no segments.
    #[must_use]
    pub fn segment(&self, content: &str) -> Vec<String> {
        if content.is_empty() {
            return Vec::new();
        }
        let chars: Vec<char> = content.chars().collect();
        chars
            .chunks(self.max_chars)
            .map(|chunk| chunk.iter().collect())
            .collect()
    }
}
