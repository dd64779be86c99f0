//! Header field extraction from the primary header block.
//!
//! The block is split on `;`. The first piece is the content-type preamble
//! and the last is the transfer-encoding marker; only the pieces in between
//! are rendered.

use std::borrow::Cow;

use crate::error::{ConvertError, Result};

/// Separator between header fields.
pub const FIELD_SEPARATOR: u8 = b';';

/// The fields of a primary header block, split around preamble and marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderFields<'a> {
    preamble: &'a [u8],
    fields: Vec<&'a [u8]>,
    marker: &'a [u8],
}

impl<'a> HeaderFields<'a> {
    /// Split a header block into preamble, fields and marker.
    ///
    /// Fails with [`ConvertError::MalformedMessage`] if the block has no
    /// [`FIELD_SEPARATOR`] at all, i.e. fewer than two pieces.
    pub fn parse(block: &'a [u8]) -> Result<Self> {
        let mut pieces: Vec<&'a [u8]> = block.split(|&b| b == FIELD_SEPARATOR).collect();

        if pieces.len() < 2 {
            return Err(ConvertError::malformed(format!(
                "header block needs at least 2 '{}'-separated fields, found {}",
                FIELD_SEPARATOR as char,
                pieces.len()
            )));
        }

        // Length checked above.
        let marker = pieces.pop().unwrap_or_default();
        let preamble = pieces.remove(0);

        Ok(Self {
            preamble,
            fields: pieces,
            marker,
        })
    }

    /// First piece of the block, normally `Content-Type: ...`.
    pub fn preamble(&self) -> &'a [u8] {
        self.preamble
    }

    /// The renderable fields, in original order and untrimmed.
    pub fn fields(&self) -> &[&'a [u8]] {
        &self.fields
    }

    /// Last piece of the block, normally the encoding marker.
    pub fn marker(&self) -> &'a [u8] {
        self.marker
    }

    /// Number of renderable fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// True when only the preamble and marker are present.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Lossy UTF-8 views of the renderable fields, for logging and display.
    pub fn display_fields(&self) -> Vec<Cow<'a, str>> {
        self.fields
            .iter()
            .map(|f| String::from_utf8_lossy(f))
            .collect()
    }
}
