//! Flat word-addressed memory shared by instruction fetch and data access.

use thiserror::Error;

/// Size in bytes of the byte-addressable space (64 KiB).
pub const MEMORY_BYTES: usize = 64 * 1024;

/// Number of 32-bit words backing the address space.
pub const MEMORY_WORDS: usize = MEMORY_BYTES / 4;

/// Word index reserved as the halt address (one past the last word).
#[allow(clippy::cast_possible_truncation)]
pub const HALT_WORD_INDEX: u32 = MEMORY_WORDS as u32;

/// Converts a byte address into a word index.
#[must_use]
pub const fn word_index(byte_address: u32) -> u32 {
    byte_address >> 2
}

/// Memory access and image-load failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum MemoryError {
    /// Word index lies outside the backing store.
    #[error("word index {index} is outside memory ({capacity} words)", capacity = MEMORY_WORDS)]
    IndexOutOfRange {
        /// Rejected word index.
        index: u32,
    },
    /// Program image does not fit at the requested base.
    #[error("image of {len} words at word {base} exceeds memory ({capacity} words)", capacity = MEMORY_WORDS)]
    ImageTooLarge {
        /// First word index of the image.
        base: usize,
        /// Image length in words.
        len: usize,
    },
}

/// Word-addressed backing store of [`MEMORY_WORDS`] entries.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct Memory {
    words: Box<[u32]>,
}

impl Default for Memory {
    fn default() -> Self {
        Self::new()
    }
}

impl Memory {
    /// Allocates a zeroed memory of [`MEMORY_WORDS`] words.
    #[must_use]
    pub fn new() -> Self {
        Self {
            words: vec![0; MEMORY_WORDS].into_boxed_slice(),
        }
    }

    /// Number of words in the backing store.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.words.len()
    }

    /// Returns `true` when the backing store holds no words.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Reads the word at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`MemoryError::IndexOutOfRange`] when `index` is not backed.
    pub fn read_word(&self, index: u32) -> Result<u32, MemoryError> {
        usize::try_from(index)
            .ok()
            .and_then(|slot| self.words.get(slot))
            .copied()
            .ok_or(MemoryError::IndexOutOfRange { index })
    }

    /// Writes `value` to the word at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`MemoryError::IndexOutOfRange`] when `index` is not backed.
    pub fn write_word(&mut self, index: u32, value: u32) -> Result<(), MemoryError> {
        let slot = usize::try_from(index)
            .ok()
            .and_then(|slot| self.words.get_mut(slot))
            .ok_or(MemoryError::IndexOutOfRange { index })?;
        *slot = value;
        Ok(())
    }

    /// Copies `image` into memory starting at word `base`.
    ///
    /// # Errors
    ///
    /// Returns [`MemoryError::ImageTooLarge`] when the image would run past the
    /// end of memory. Memory is left untouched in that case.
    pub fn load_words(&mut self, base: usize, image: &[u32]) -> Result<(), MemoryError> {
        let end = base
            .checked_add(image.len())
            .filter(|end| *end <= self.words.len())
            .ok_or(MemoryError::ImageTooLarge {
                base,
                len: image.len(),
            })?;
        self.words[base..end].copy_from_slice(image);
        Ok(())
    }

    /// Borrows the full word array.
    #[must_use]
    pub fn as_words(&self) -> &[u32] {
        &self.words
    }
}
