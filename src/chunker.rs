//! Overlapping word-window chunker.
//!
//! Word count is a deliberate stand-in for model token count: close enough
//! for retrieval at this tier and independent of any tokenizer.

/// Split `text` into overlapping chunks of at most `max_size` whitespace
/// delimited words.
///
/// The window start advances by `max_size - overlap` words per chunk. When
/// `overlap >= max_size` the step is clamped to `max_size` so the walk always
/// makes forward progress. The final partial window is emitted as-is; empty
/// input yields no chunks.
pub fn chunk_words(text: &str, max_size: usize, overlap: usize) -> Vec<String> {
    if max_size == 0 {
        return Vec::new();
    }

    let words: Vec<&str> = text.split_whitespace().collect();
    if words.is_empty() {
        return Vec::new();
    }

    let step = if overlap >= max_size {
        max_size
    } else {
        max_size - overlap
    };

    let mut chunks = Vec::new();
    let mut start = 0;
    while start < words.len() {
        let end = (start + max_size).min(words.len());
        chunks.push(words[start..end].join(" "));
        start += step;
    }

    chunks
}

#[cfg(test)]
mod tests {
    use super::*;

    fn word_count(chunk: &str) -> usize {
        chunk.split_whitespace().count()
    }

    #[test]
    fn empty_text_yields_no_chunks() {
        assert!(chunk_words("", 600, 80).is_empty());
        assert!(chunk_words("   \n\t ", 600, 80).is_empty());
    }

    #[test]
    fn short_text_is_a_single_chunk() {
        let chunks = chunk_words("one two three", 600, 80);
        assert_eq!(chunks, vec!["one two three".to_string()]);
    }

    #[test]
    fn window_steps_by_max_minus_overlap() {
        let words: Vec<String> = (0..1200).map(|i| format!("w{}", i)).collect();
        let text = words.join(" ");

        let chunks = chunk_words(&text, 600, 80);

        // starts at 0, 520, 1040
        assert_eq!(chunks.len(), 3);
        assert_eq!(word_count(&chunks[0]), 600);
        assert_eq!(word_count(&chunks[1]), 600);
        assert_eq!(word_count(&chunks[2]), 160);
        assert!(chunks[1].starts_with("w520 "));
        assert!(chunks[2].starts_with("w1040 "));
    }

    #[test]
    fn consecutive_chunks_share_overlap_words() {
        let words: Vec<String> = (0..50).map(|i| format!("w{}", i)).collect();
        let chunks = chunk_words(&words.join(" "), 20, 5);

        let first: Vec<&str> = chunks[0].split_whitespace().collect();
        let second: Vec<&str> = chunks[1].split_whitespace().collect();
        assert_eq!(&first[15..], &second[..5]);
    }

    #[test]
    fn every_word_appears_in_some_chunk() {
        let words: Vec<String> = (0..97).map(|i| format!("w{}", i)).collect();
        let chunks = chunk_words(&words.join(" "), 10, 3);

        let joined = chunks.join(" ");
        for w in &words {
            assert!(
                joined.split_whitespace().any(|c| c == w.as_str()),
                "missing {}",
                w
            );
        }
    }

    #[test]
    fn overlap_at_least_max_size_still_terminates() {
        // step clamps to max_size: two disjoint 2-word chunks
        let chunks = chunk_words("a b c d", 2, 5);
        assert_eq!(chunks, vec!["a b".to_string(), "c d".to_string()]);
    }

    #[test]
    fn zero_max_size_yields_no_chunks() {
        assert!(chunk_words("a b c", 0, 0).is_empty());
    }
}
