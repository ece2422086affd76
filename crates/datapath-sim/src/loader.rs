//! `.asc` program image ingestion.
//!
//! One 32-bit word per line as hex digits, with an optional `0x` prefix. Blank
//! lines are skipped and `#` starts a comment that runs to the end of the line.
//! Words load from address 0 upward.

use std::io;
use std::path::{Path, PathBuf};

use datapath_core::MEMORY_WORDS;
use thiserror::Error;

/// Program image load failures.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The image file could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        /// Image path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
    /// A line is not a valid 32-bit hex word.
    #[error("line {line}: malformed word `{text}`")]
    MalformedWord {
        /// 1-indexed line number.
        line: usize,
        /// Offending token.
        text: String,
    },
    /// The image has more words than memory.
    #[error("image holds {words} words, memory holds {capacity}", capacity = MEMORY_WORDS)]
    TooLarge {
        /// Word count of the image.
        words: usize,
    },
}

/// Parses `.asc` text into instruction words.
///
/// # Errors
///
/// Returns [`LoadError::MalformedWord`] for a line that is not 1-8 hex digits,
/// and [`LoadError::TooLarge`] when the image cannot fit in memory.
pub fn parse_image(content: &str) -> Result<Vec<u32>, LoadError> {
    let mut words = Vec::new();

    for (idx, raw) in content.lines().enumerate() {
        let text = raw.split_once('#').map_or(raw, |(code, _)| code).trim();
        if text.is_empty() {
            continue;
        }
        words.push(parse_word(text).ok_or_else(|| LoadError::MalformedWord {
            line: idx + 1,
            text: text.to_string(),
        })?);
    }

    if words.len() > MEMORY_WORDS {
        return Err(LoadError::TooLarge { words: words.len() });
    }
    Ok(words)
}

fn parse_word(text: &str) -> Option<u32> {
    let digits = text
        .strip_prefix("0x")
        .or_else(|| text.strip_prefix("0X"))
        .unwrap_or(text);
    if digits.is_empty() || digits.len() > 8 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    u32::from_str_radix(digits, 16).ok()
}

/// Reads and parses an image file.
///
/// # Errors
///
/// Returns [`LoadError::Io`] when the file cannot be read, otherwise the errors
/// of [`parse_image`].
pub fn load_image_file(path: &Path) -> Result<Vec<u32>, LoadError> {
    let content = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let words = parse_image(&content)?;
    log::debug!("read {} words from {}", words.len(), path.display());
    Ok(words)
}
