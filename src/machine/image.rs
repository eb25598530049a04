//! Program image decoding.
//!
//! An image is a headerless byte stream of contiguous little-endian 16-bit
//! words, loaded starting at memory address 0. Decoding validates the shape
//! of the stream only; the words themselves are interpreted at execution
//! time. Memory beyond the loaded length is zero-filled so every run starts
//! from a deterministic state.

use crate::machine::errors::VmError;
use std::fs;
use std::path::Path;

/// Number of addressable memory words.
pub const MEM_WORDS: usize = 32768;

/// A decoded program image: a full memory's worth of words.
#[derive(Debug, Clone)]
pub struct Image {
    words: Vec<u16>,
    loaded: usize,
}

impl Image {
    /// Decodes a raw little-endian byte stream.
    ///
    /// Returns [`VmError::TruncatedImage`] for an odd byte length and
    /// [`VmError::ImageTooLarge`] if the stream holds more than
    /// [`MEM_WORDS`] words.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, VmError> {
        if bytes.len() % 2 != 0 {
            return Err(VmError::TruncatedImage { len: bytes.len() });
        }
        let words: Vec<u16> = bytes
            .chunks_exact(2)
            .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
            .collect();
        Self::from_words(&words)
    }

    /// Builds an image from already-decoded words, zero-filling the rest of
    /// memory.
    pub fn from_words(words: &[u16]) -> Result<Self, VmError> {
        if words.len() > MEM_WORDS {
            return Err(VmError::ImageTooLarge { words: words.len() });
        }
        let mut memory = words.to_vec();
        memory.resize(MEM_WORDS, 0);
        Ok(Self {
            words: memory,
            loaded: words.len(),
        })
    }

    /// Reads and decodes an image file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, VmError> {
        Self::from_bytes(&fs::read(path)?)
    }

    /// The full memory contents, always [`MEM_WORDS`] long.
    pub fn words(&self) -> &[u16] {
        &self.words
    }

    /// Number of words that came from the byte stream, before zero-fill.
    pub fn loaded_len(&self) -> usize {
        self.loaded
    }

    /// Consumes the image, yielding the memory contents.
    pub fn into_words(self) -> Vec<u16> {
        self.words
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_little_endian_words() {
        let image = Image::from_bytes(&[0x09, 0x00, 0x00, 0x80]).unwrap();
        assert_eq!(image.words()[0], 9);
        assert_eq!(image.words()[1], 32768);
    }

    #[test]
    fn zero_fills_beyond_loaded_length() {
        let image = Image::from_bytes(&[0x01, 0x00]).unwrap();
        assert_eq!(image.words().len(), MEM_WORDS);
        assert_eq!(image.loaded_len(), 1);
        assert!(image.words()[1..].iter().all(|&w| w == 0));
    }

    #[test]
    fn empty_image_is_all_zeroes() {
        let image = Image::from_bytes(&[]).unwrap();
        assert_eq!(image.words().len(), MEM_WORDS);
        assert!(image.words().iter().all(|&w| w == 0));
    }

    #[test]
    fn odd_length_is_truncated() {
        assert!(matches!(
            Image::from_bytes(&[1, 0, 2]),
            Err(VmError::TruncatedImage { len: 3 })
        ));
    }

    #[test]
    fn oversized_image_is_rejected() {
        let bytes = vec![0u8; (MEM_WORDS + 1) * 2];
        assert!(matches!(
            Image::from_bytes(&bytes),
            Err(VmError::ImageTooLarge { words }) if words == MEM_WORDS + 1
        ));
        // A full-memory image is still fine.
        let bytes = vec![0u8; MEM_WORDS * 2];
        assert!(Image::from_bytes(&bytes).is_ok());
    }
}
