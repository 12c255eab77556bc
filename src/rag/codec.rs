//! Deterministic text→vector mapping and identifier sanitizing.
//!
//! The encoding here is a placeholder, not a semantic embedding: it exists so
//! the indexing and retrieval plumbing has a stable, testable contract while
//! a real embedding model remains out of scope. The laws that matter are
//! determinism and the fixed output length; nearest-neighbour quality is
//! explicitly not a goal.

/// Default vector dimension, matching the index the original system targeted.
pub const DEFAULT_DIMENSION: usize = 1536;

/// Encodes `text` into a vector of exactly `dimension` floats.
///
/// Takes at most `dimension` characters of the input, maps each to its
/// numeric code modulo 256, and zero-pads on the right when the text is
/// shorter than `dimension`. Pure function of the input text: identical text
/// always yields identical vectors, and the output length is always exactly
/// `dimension` regardless of input length.
///
/// # Examples
///
/// ```
/// use chatloom::rag::codec;
///
/// let vector = codec::encode("ab", 4);
/// assert_eq!(vector, vec![97.0, 98.0, 0.0, 0.0]);
/// ```
#[must_use]
pub fn encode(text: &str, dimension: usize) -> Vec<f32> {
    let mut vector: Vec<f32> = text
        .chars()
        .take(dimension)
        .map(|ch| (ch as u32 % 256) as f32)
        .collect();
    vector.resize(dimension, 0.0);
    vector
}

/// Normalizes `text` into an ASCII-safe identifier token.
///
/// Non-ASCII characters are stripped, every remaining non-alphanumeric
/// character becomes `_`, consecutive `_` collapse to one, and leading and
/// trailing `_` are trimmed. The transform is idempotent: sanitizing an
/// already-sanitized token yields the same token, which keeps ids derived
/// from the same URL stable across indexing passes.
///
/// # Examples
///
/// ```
/// use chatloom::rag::codec;
///
/// assert_eq!(codec::sanitize_id("https://example.com/a"), "https_example_com_a");
/// assert_eq!(codec::sanitize_id("São Paulo!"), "So_Paulo");
/// ```
#[must_use]
pub fn sanitize_id(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut previous_was_separator = false;
    for ch in text.chars() {
        if !ch.is_ascii() {
            continue;
        }
        if ch.is_ascii_alphanumeric() {
            out.push(ch);
            previous_was_separator = false;
        } else if !previous_was_separator {
            out.push('_');
            previous_was_separator = true;
        }
    }
    out.trim_matches('_').to_string()
}
