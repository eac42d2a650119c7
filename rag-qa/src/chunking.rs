//! Document chunking.
//!
//! The [`Chunker`] trait is the seam the ingestion pipeline uses to turn a
//! [`Document`] into ordered [`Chunk`]s. [`WordChunker`] is the default
//! strategy: a greedy packer over whitespace-separated words, see
//! [`split_words`].

use crate::document::{Chunk, Document};

/// A strategy for splitting documents into chunks.
pub trait Chunker: Send + Sync {
    /// Split a document into chunks.
    ///
    /// `doc_index` is the document's position in the ingestion batch and is
    /// stamped on every returned chunk. Chunk indices start at zero and have
    /// no gaps. Returns an empty `Vec` for a document with no words.
    fn chunk(&self, doc_index: usize, document: &Document) -> Vec<Chunk>;
}

/// Greedy whitespace-word chunker bounded by a character budget.
///
/// # Example
///
/// ```rust,ignore
/// use rag_qa::WordChunker;
///
/// let chunker = WordChunker::new(1000);
/// let chunks = chunker.chunk(0, &document);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct WordChunker {
    limit: usize,
}

impl WordChunker {
    /// Create a new `WordChunker` with the given character budget per chunk.
    pub fn new(limit: usize) -> Self {
        Self { limit }
    }

    /// The character budget per chunk.
    pub fn limit(&self) -> usize {
        self.limit
    }
}

impl Chunker for WordChunker {
    fn chunk(&self, doc_index: usize, document: &Document) -> Vec<Chunk> {
        split_words(&document.text, self.limit)
            .into_iter()
            .enumerate()
            .map(|(chunk_index, text)| Chunk { doc_index, chunk_index, text })
            .collect()
    }
}

/// Split `text` into passages of whole words, packed greedily under `limit`.
///
/// Every word costs its length in characters plus one for the separator.
/// When the running total exceeds `limit`, the current passage is closed
/// and the overflowing word opens the next one with a running total of just
/// its own length (no separator unit). Words longer than `limit` are never
/// split or dropped; they become their own passage.
///
/// Passages are the input words joined by single spaces, so the original
/// whitespace layout is not preserved but the word sequence is.
pub fn split_words(text: &str, limit: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    let mut size = 0usize;

    for word in text.split_whitespace() {
        let len = word.chars().count();
        size += len + 1;
        if size > limit {
            // A leading over-long word has nothing to close.
            if !current.is_empty() {
                chunks.push(current.join(" "));
                current.clear();
            }
            current.push(word);
            size = len;
        } else {
            current.push(word);
        }
    }

    if !current.is_empty() {
        chunks.push(current.join(" "));
    }

    chunks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_and_blank_text_yield_nothing() {
        assert!(split_words("", 10).is_empty());
        assert!(split_words(" \n\t ", 10).is_empty());
    }

    #[test]
    fn overflow_closes_chunk_and_resets_to_word_length() {
        // alpha: 6, beta: 6 + 5 = 11 > 10 -> close, reset to 4; gamma: 4 + 6 = 10
        assert_eq!(split_words("alpha beta gamma", 10), vec!["alpha", "beta gamma"]);
    }

    #[test]
    fn reset_omits_separator_unit() {
        // With a separator-inclusive reset "bb" would start at 3 and "cc" would
        // overflow at 6; the word-only reset keeps them together at 5.
        assert_eq!(split_words("aaaa bb cc", 5), vec!["aaaa", "bb cc"]);
    }

    #[test]
    fn oversized_word_becomes_its_own_chunk() {
        assert_eq!(
            split_words("a extraordinarily b", 5),
            vec!["a", "extraordinarily", "b"]
        );
    }

    #[test]
    fn leading_oversized_word_emits_no_empty_chunk() {
        assert_eq!(split_words("extraordinarily short", 5), vec!["extraordinarily", "short"]);
    }

    #[test]
    fn whitespace_is_normalised_to_single_spaces() {
        assert_eq!(split_words("one\ttwo\n\nthree", 100), vec!["one two three"]);
    }

    #[test]
    fn length_is_counted_in_characters() {
        // "héllo" is 5 chars (6 bytes): 6 + 6 = 12 fits a limit of 12.
        assert_eq!(split_words("héllo héllo", 12), vec!["héllo héllo"]);
    }

    #[test]
    fn word_chunker_stamps_indices() {
        let document = Document::new("alpha beta gamma");
        let chunks = WordChunker::new(10).chunk(3, &document);
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0], Chunk { doc_index: 3, chunk_index: 0, text: "alpha".into() });
        assert_eq!(chunks[1], Chunk { doc_index: 3, chunk_index: 1, text: "beta gamma".into() });
    }
}
