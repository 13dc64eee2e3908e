//! Sliding-window chunking of transcript text for embedding.
//!
//! Splits a transcript into overlapping fixed-size windows so that context
//! flows across chunk boundaries when chunks are embedded independently.

use crate::error::{Result, SvarError};
use serde::{Deserialize, Serialize};

/// Configuration for the sliding-window chunker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkingConfig {
    /// Window size in characters.
    pub chunk_size: usize,
    /// Characters shared between consecutive chunks. Must be strictly
    /// smaller than `chunk_size`.
    pub overlap: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            chunk_size: 500,
            overlap: 50,
        }
    }
}

impl ChunkingConfig {
    /// Validate the configuration.
    ///
    /// `overlap >= chunk_size` would make the window stop advancing, so it is
    /// rejected up front instead of looping forever.
    pub fn validate(&self) -> Result<()> {
        if self.chunk_size == 0 {
            return Err(SvarError::Config(
                "chunk_size must be greater than zero".to_string(),
            ));
        }
        if self.overlap >= self.chunk_size {
            return Err(SvarError::Config(format!(
                "overlap ({}) must be smaller than chunk_size ({})",
                self.overlap, self.chunk_size
            )));
        }
        Ok(())
    }
}

/// Split text into overlapping chunks for embedding.
///
/// Starting at offset 0, emits the window `[start, start + chunk_size)`
/// clipped to the text length, then advances by `chunk_size - overlap` until
/// the text is exhausted. Sizes are measured in characters, so multi-byte
/// code points are never split.
///
/// Empty text yields an empty vector; text shorter than `chunk_size` yields a
/// single chunk containing the whole text.
pub fn chunk_text(text: &str, config: &ChunkingConfig) -> Result<Vec<String>> {
    config.validate()?;

    let chars: Vec<char> = text.chars().collect();
    let step = config.chunk_size - config.overlap;

    let mut chunks = Vec::new();
    let mut start = 0;
    while start < chars.len() {
        let end = (start + config.chunk_size).min(chars.len());
        chunks.push(chars[start..end].iter().collect());
        start += step;
    }

    Ok(chunks)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(chunk_size: usize, overlap: usize) -> ChunkingConfig {
        ChunkingConfig {
            chunk_size,
            overlap,
        }
    }

    #[test]
    fn test_empty_text_yields_no_chunks() {
        let chunks = chunk_text("", &ChunkingConfig::default()).unwrap();
        assert!(chunks.is_empty());
    }

    #[test]
    fn test_short_text_yields_single_chunk() {
        let chunks = chunk_text("hello", &ChunkingConfig::default()).unwrap();
        assert_eq!(chunks, vec!["hello".to_string()]);
    }

    #[test]
    fn test_chunk_size_bound() {
        let text = "abcdefghij".repeat(20);
        let cfg = config(32, 8);
        for chunk in chunk_text(&text, &cfg).unwrap() {
            assert!(chunk.chars().count() <= cfg.chunk_size);
        }
    }

    #[test]
    fn test_overlap_between_adjacent_chunks() {
        let text: String = ('a'..='z').cycle().take(300).collect();
        let cfg = config(100, 20);
        let chunks = chunk_text(&text, &cfg).unwrap();

        for pair in chunks.windows(2) {
            let prev: Vec<char> = pair[0].chars().collect();
            let next: Vec<char> = pair[1].chars().collect();
            if prev.len() == cfg.chunk_size {
                let tail: String = prev[prev.len() - cfg.overlap..].iter().collect();
                let head: String = next[..cfg.overlap.min(next.len())].iter().collect();
                assert_eq!(tail, head);
            }
        }
    }

    #[test]
    fn test_chunks_cover_entire_text() {
        let text: String = ('a'..='z').cycle().take(1234).collect();
        let cfg = config(100, 20);
        let chunks = chunk_text(&text, &cfg).unwrap();

        // Dropping each chunk's overlap with its predecessor reconstructs
        // the original text exactly.
        let step = cfg.chunk_size - cfg.overlap;
        let mut rebuilt = String::new();
        for (i, chunk) in chunks.iter().enumerate() {
            if i == 0 {
                rebuilt.push_str(chunk);
            } else {
                let already = rebuilt.chars().count() - i * step;
                rebuilt.extend(chunk.chars().skip(already));
            }
        }
        assert_eq!(rebuilt, text);
    }

    #[test]
    fn test_multibyte_text_is_not_split_mid_character() {
        let text = "æøå".repeat(50);
        let chunks = chunk_text(&text, &config(7, 2)).unwrap();
        assert_eq!(
            chunks.iter().map(|c| c.chars().count()).max().unwrap(),
            7
        );
        // Every chunk is valid UTF-8 by construction; verify content survives.
        assert!(chunks[0].starts_with("æøå"));
    }

    #[test]
    fn test_overlap_equal_to_chunk_size_is_rejected() {
        let err = chunk_text("some text", &config(10, 10)).unwrap_err();
        assert!(matches!(err, SvarError::Config(_)));
    }

    #[test]
    fn test_zero_chunk_size_is_rejected() {
        let err = chunk_text("some text", &config(0, 0)).unwrap_err();
        assert!(matches!(err, SvarError::Config(_)));
    }

    #[test]
    fn test_deterministic_for_identical_inputs() {
        let text: String = ('a'..='z').cycle().take(777).collect();
        let cfg = config(64, 16);
        assert_eq!(chunk_text(&text, &cfg).unwrap(), chunk_text(&text, &cfg).unwrap());
    }
}
