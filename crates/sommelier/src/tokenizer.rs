//! Token boundary: text in, token ids out, and back.
//!
//! Token count is the unit of every length calculation in the crate, so the
//! tokenizer should belong to the same family as the summarization model.
//! [`TiktokenTokenizer`] wraps the `cl100k_base` BPE used by most hosted
//! chat models.

use thiserror::Error;

/// Tokenizer failure.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TokenizerError {
    #[error("failed to load tokenizer: {0}")]
    Load(String),
    #[error("failed to encode text: {0}")]
    Encode(String),
    #[error("failed to decode tokens: {0}")]
    Decode(String),
}

/// Converts text to token ids and back.
///
/// Implementations must be safe to share across concurrent reductions.
/// `decode(encode(s))` only needs to be stable, not byte-identical.
pub trait Tokenizer: Send + Sync {
    fn encode(&self, text: &str) -> Result<Vec<u32>, TokenizerError>;

    fn decode(&self, tokens: &[u32]) -> Result<String, TokenizerError>;

    /// Number of tokens in `text`.
    fn count(&self, text: &str) -> Result<usize, TokenizerError> {
        self.encode(text).map(|t| t.len())
    }

    /// Short name for logs.
    fn name(&self) -> &str;
}

/// Longest run of BPE tokens that can jointly encode one character.
const MAX_TOKENS_PER_CHAR: usize = 4;

/// `cl100k_base` byte-pair encoder from `tiktoken-rs`.
pub struct TiktokenTokenizer {
    bpe: tiktoken_rs::CoreBPE,
}

impl TiktokenTokenizer {
    pub fn cl100k() -> Result<Self, TokenizerError> {
        let bpe = tiktoken_rs::cl100k_base().map_err(|e| TokenizerError::Load(e.to_string()))?;
        Ok(Self { bpe })
    }

    fn decode_exact(&self, tokens: &[u32]) -> Option<String> {
        self.bpe.decode(tokens.iter().map(|&t| t as _).collect()).ok()
    }

    /// Decode a slice whose edges may split a multi-byte character.
    ///
    /// Walks the slice, taking the shortest run of tokens that decodes on
    /// its own. Fragments that never complete a character become U+FFFD.
    fn decode_lossy(&self, tokens: &[u32]) -> String {
        let mut out = String::new();
        let mut i = 0;
        while i < tokens.len() {
            let longest = MAX_TOKENS_PER_CHAR.min(tokens.len() - i);
            let decoded = (1..=longest)
                .find_map(|n| self.decode_exact(&tokens[i..i + n]).map(|text| (n, text)));
            match decoded {
                Some((n, text)) => {
                    out.push_str(&text);
                    i += n;
                }
                None => {
                    out.push(char::REPLACEMENT_CHARACTER);
                    i += 1;
                }
            }
        }
        out
    }
}

impl Tokenizer for TiktokenTokenizer {
    fn encode(&self, text: &str) -> Result<Vec<u32>, TokenizerError> {
        Ok(self
            .bpe
            .encode_ordinary(text)
            .into_iter()
            .map(|t| t as u32)
            .collect())
    }

    fn decode(&self, tokens: &[u32]) -> Result<String, TokenizerError> {
        Ok(self
            .decode_exact(tokens)
            .unwrap_or_else(|| self.decode_lossy(tokens)))
    }

    fn name(&self) -> &str {
        "cl100k_base"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokenizer() -> TiktokenTokenizer {
        TiktokenTokenizer::cl100k().expect("bundled encoding loads")
    }

    #[test]
    fn round_trip_ascii() {
        let tok = tokenizer();
        let text = "Bright cherry fruit with a long, dusty finish.";
        let ids = tok.encode(text).unwrap();
        assert!(!ids.is_empty());
        assert_eq!(tok.decode(&ids).unwrap(), text);
    }

    #[test]
    fn count_matches_encode_length() {
        let tok = tokenizer();
        let text = "Tannic and closed; needs another five years.";
        assert_eq!(tok.count(text).unwrap(), tok.encode(text).unwrap().len());
    }

    #[test]
    fn empty_text_has_no_tokens() {
        let tok = tokenizer();
        assert!(tok.encode("").unwrap().is_empty());
        assert_eq!(tok.decode(&[]).unwrap(), "");
    }

    #[test]
    fn split_multibyte_character_decodes_lossily() {
        let tok = tokenizer();
        // Rare CJK characters are split across several byte-level tokens.
        let text = "鑫鑫鑫";
        let ids = tok.encode(text).unwrap();
        assert!(ids.len() > 1);
        for cut in 1..ids.len() {
            let head = tok.decode(&ids[..cut]).unwrap();
            let tail = tok.decode(&ids[cut..]).unwrap();
            assert!(!head.is_empty() || !tail.is_empty());
        }
        assert_eq!(tok.decode(&ids).unwrap(), text);
    }
}
