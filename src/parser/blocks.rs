//! Splitting a raw message into blank-line-delimited blocks.
//!
//! A convertible message has at least three blocks: the primary header, a
//! secondary block that is not rendered, and the base64 payload.

use tracing::debug;

use crate::error::{ConvertError, Result};

/// Separator between blocks: an empty line.
pub const BLOCK_SEPARATOR: &[u8] = b"\n\n";

/// Minimum number of blocks a convertible message must contain.
pub const MIN_BLOCKS: usize = 3;

/// Borrowed, validated view of the blocks of a raw message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageBlocks<'a> {
    header: &'a [u8],
    secondary: &'a [u8],
    payload: &'a [u8],
    extra_blocks: usize,
}

impl<'a> MessageBlocks<'a> {
    /// Split `raw` on [`BLOCK_SEPARATOR`].
    ///
    /// Fails with [`ConvertError::MalformedMessage`] when fewer than
    /// [`MIN_BLOCKS`] blocks are present. Blocks after the payload are ignored.
    pub fn split(raw: &'a [u8]) -> Result<Self> {
        let mut blocks = Blocks::new(raw);

        let (Some(header), Some(secondary), Some(payload)) =
            (blocks.next(), blocks.next(), blocks.next())
        else {
            let found = Blocks::new(raw).count();
            return Err(ConvertError::malformed(format!(
                "expected at least {MIN_BLOCKS} blank-line-separated blocks, found {found}"
            )));
        };

        let extra_blocks = blocks.count();
        if extra_blocks > 0 {
            debug!(extra_blocks, "Ignoring blocks after the payload");
        }

        Ok(Self {
            header,
            secondary,
            payload,
            extra_blocks,
        })
    }

    /// The primary header block (first block).
    pub fn header(&self) -> &'a [u8] {
        self.header
    }

    /// The second block. Carried along but never rendered.
    pub fn secondary(&self) -> &'a [u8] {
        self.secondary
    }

    /// The base64 payload block (third block).
    pub fn payload(&self) -> &'a [u8] {
        self.payload
    }

    /// Number of blocks found after the payload.
    pub fn extra_blocks(&self) -> usize {
        self.extra_blocks
    }
}

/// Iterator over the blocks of a buffer, in order.
///
/// Every separator produces a boundary, so adjacent separators yield empty
/// blocks and a buffer without separators yields a single block.
struct Blocks<'a> {
    rest: Option<&'a [u8]>,
}

impl<'a> Blocks<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self { rest: Some(data) }
    }
}

impl<'a> Iterator for Blocks<'a> {
    type Item = &'a [u8];

    fn next(&mut self) -> Option<Self::Item> {
        let data = self.rest?;
        match find_separator(data) {
            Some(pos) => {
                self.rest = Some(&data[pos + BLOCK_SEPARATOR.len()..]);
                Some(&data[..pos])
            }
            None => {
                self.rest = None;
                Some(data)
            }
        }
    }
}

/// Byte offset of the first [`BLOCK_SEPARATOR`] in `data`.
fn find_separator(data: &[u8]) -> Option<usize> {
    data.windows(BLOCK_SEPARATOR.len())
        .position(|w| w == BLOCK_SEPARATOR)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_three_blocks() {
        let raw = b"Content-Type: text/html; base64\n\nignored\n\nPGgxPkhpPC9oMT4=";
        let blocks = MessageBlocks::split(raw).unwrap();
        assert_eq!(blocks.header(), b"Content-Type: text/html; base64");
        assert_eq!(blocks.secondary(), b"ignored");
        assert_eq!(blocks.payload(), b"PGgxPkhpPC9oMT4=");
        assert_eq!(blocks.extra_blocks(), 0);
    }

    #[test]
    fn test_split_ignores_trailing_blocks() {
        let raw = b"a; b\n\nb\n\nc\n\nd\n\n";
        let blocks = MessageBlocks::split(raw).unwrap();
        assert_eq!(blocks.payload(), b"c");
        // "d" and the empty block after the final separator
        assert_eq!(blocks.extra_blocks(), 2);
    }

    #[test]
    fn test_split_two_blocks_is_malformed() {
        let raw = b"Content-Type: text/html; base64\n\nPGgxPkhpPC9oMT4=";
        let err = MessageBlocks::split(raw).unwrap_err();
        assert!(matches!(err, ConvertError::MalformedMessage { .. }));
        assert!(err.to_string().contains("found 2"));
    }

    #[test]
    fn test_split_empty_input_is_malformed() {
        let err = MessageBlocks::split(b"").unwrap_err();
        assert!(err.to_string().contains("found 1"));
    }

    #[test]
    fn test_triple_newline_keeps_leading_newline() {
        let raw = b"h\n\n\ns\n\np";
        let blocks = MessageBlocks::split(raw).unwrap();
        assert_eq!(blocks.secondary(), b"\ns");
        assert_eq!(blocks.payload(), b"p");
    }

    #[test]
    fn test_consecutive_separators_yield_empty_blocks() {
        let blocks = MessageBlocks::split(b"\n\n\n\n").unwrap();
        assert_eq!(blocks.header(), b"");
        assert_eq!(blocks.secondary(), b"");
        assert_eq!(blocks.payload(), b"");
    }

    #[test]
    fn test_crlf_is_not_a_separator() {
        let raw = b"h\r\n\r\ns\r\n\r\np";
        assert!(MessageBlocks::split(raw).is_err());
    }
}
