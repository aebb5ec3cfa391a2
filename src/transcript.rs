//! Transcript intake: validation of raw bytes and sentence segmentation.

use lazy_static::lazy_static;
use regex::Regex;
use thiserror::Error;

/// Transcripts above this size are analysed but flagged in the log.
pub const LARGE_TRANSCRIPT_BYTES: usize = 100_000;

/// Sample executive meeting used by `minutes demo`.
pub const DEMO_TRANSCRIPT: &str = "\
Executive team meeting started at 9 AM. We decided to implement the new AI-driven customer analytics platform by Q2.
Sarah will lead the technical implementation and must have the MVP ready by March 15th.
It was agreed that the budget allocation is $2.5M for this critical initiative.
John is responsible for stakeholder communication and needs to present to the board next Friday.
We concluded that this is a high-priority strategic decision that will impact our competitive position.
Action item: Mike - conduct security audit by end of week, this is urgent.
The team agreed we need additional data scientists to support this initiative.
Risk identified: potential delay if we don't secure cloud infrastructure soon.
Next meeting scheduled for next Tuesday at 10 AM to review progress and address any blockers.
Final decision: proceed with full implementation despite the aggressive timeline.
";

lazy_static! {
    // Sentence terminators only count when followed by whitespace or the end
    // of the line, so "v1.2" and "$2.5M" stay whole.
    static ref SENTENCE_BREAK: Regex = Regex::new(r"[.!?]+(?:\s+|$)").unwrap();
}

#[derive(Error, Debug)]
pub enum InputError {
    #[error("transcript is not valid UTF-8: {0}")]
    NotUtf8(#[from] std::string::FromUtf8Error),
    #[error("transcript looks like binary data (NUL byte at offset {0})")]
    Binary(usize),
}

/// Validated transcript text, ready for the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transcript {
    text: String,
}

impl Transcript {
    /// Decode raw bytes, rejecting anything that is not plain text
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, InputError> {
        if let Some(offset) = bytes.iter().position(|b| *b == 0) {
            return Err(InputError::Binary(offset));
        }
        let text = String::from_utf8(bytes)?;
        if text.len() > LARGE_TRANSCRIPT_BYTES {
            log::warn!(
                "large transcript ({} bytes), analysis may take longer",
                text.len()
            );
        }
        Ok(Self { text })
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// True when the transcript holds nothing but whitespace
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

impl From<&str> for Transcript {
    fn from(text: &str) -> Self {
        Self {
            text: text.to_string(),
        }
    }
}

/// Split text into trimmed, whitespace-collapsed sentence segments.
///
/// Lines are split first so speaker turns never merge, then each line is
/// cut at sentence terminators. Empty segments are dropped.
pub fn segment(text: &str) -> Vec<String> {
    text.lines()
        .flat_map(|line| SENTENCE_BREAK.split(line))
        .map(|s| s.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segment_sentences_and_lines() {
        let segments = segment("First point here. Second one!\n\n  Third   line?\nFourth");
        assert_eq!(
            segments,
            vec!["First point here", "Second one", "Third line", "Fourth"]
        );
    }

    #[test]
    fn test_segment_keeps_decimals() {
        let segments = segment("The budget is $2.5M for v1.2. Done.");
        assert_eq!(segments, vec!["The budget is $2.5M for v1.2", "Done"]);
    }

    #[test]
    fn test_segment_empty() {
        assert!(segment("").is_empty());
        assert!(segment("  \n\n ... \n").is_empty());
    }

    #[test]
    fn test_from_bytes_accepts_text() {
        let transcript = Transcript::from_bytes(b"hello team".to_vec()).unwrap();
        assert_eq!(transcript.as_str(), "hello team");
        assert!(!transcript.is_blank());
    }

    #[test]
    fn test_from_bytes_rejects_invalid_utf8() {
        let err = Transcript::from_bytes(vec![0x66, 0xff, 0xfe]).unwrap_err();
        assert!(matches!(err, InputError::NotUtf8(_)));
    }

    #[test]
    fn test_from_bytes_rejects_binary() {
        let err = Transcript::from_bytes(b"ab\0cd".to_vec()).unwrap_err();
        assert!(matches!(err, InputError::Binary(2)));
    }

    #[test]
    fn test_blank_transcript() {
        assert!(Transcript::from(" \n\t").is_blank());
    }
}
