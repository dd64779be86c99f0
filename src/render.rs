//! Rendering a parsed message into an HTML document.
//!
//! The document is the `<br>`-joined header fields wrapped in `<html>`,
//! two line breaks, then the decoded payload bytes verbatim.

use base64::alphabet;
use base64::engine::{GeneralPurpose, GeneralPurposeConfig};
use base64::Engine as _;
use tracing::debug;

use crate::error::Result;
use crate::parser::blocks::MessageBlocks;
use crate::parser::header::HeaderFields;

/// Line-break marker joining fields and separating metadata from the body.
pub const LINE_BREAK: &[u8] = b"<br>";

/// Standard alphabet, padding required. Non-zero bits after the last full
/// byte are ignored rather than rejected.
const PAYLOAD_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_allow_trailing_bits(true),
);

/// A fully rendered document, ready to be written verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedDocument {
    bytes: Vec<u8>,
    metadata_len: usize,
    metadata_fields: usize,
}

impl RenderedDocument {
    /// The complete document.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// The `<html>...</html><br><br>` metadata prefix.
    pub fn metadata(&self) -> &[u8] {
        &self.bytes[..self.metadata_len]
    }

    /// The decoded payload suffix.
    pub fn body(&self) -> &[u8] {
        &self.bytes[self.metadata_len..]
    }

    /// Number of header fields rendered in the metadata.
    pub fn metadata_fields(&self) -> usize {
        self.metadata_fields
    }

}

/// Render a whole raw message.
///
/// Nothing is produced unless both the layout and the payload are valid.
pub fn render_message(raw: &[u8]) -> Result<RenderedDocument> {
    let blocks = MessageBlocks::split(raw)?;
    let fields = HeaderFields::parse(blocks.header())?;
    debug!(
        preamble = %String::from_utf8_lossy(fields.preamble()),
        marker = %String::from_utf8_lossy(fields.marker()),
        fields = ?fields.display_fields(),
        "Extracted header fields"
    );
    if fields.is_empty() {
        debug!("Header block has no displayable fields");
    }

    let body = decode_payload(blocks.payload())?;
    Ok(assemble(&fields, body))
}

/// Build the metadata wrapper: `<html>` + fields joined by `<br>` +
/// `</html><br><br>`.
pub fn render_metadata(fields: &HeaderFields<'_>) -> Vec<u8> {
    let mut out = Vec::with_capacity(64);
    out.extend_from_slice(b"<html>");
    for (i, field) in fields.fields().iter().enumerate() {
        if i > 0 {
            out.extend_from_slice(LINE_BREAK);
        }
        out.extend_from_slice(field);
    }
    out.extend_from_slice(b"</html>");
    out.extend_from_slice(LINE_BREAK);
    out.extend_from_slice(LINE_BREAK);
    out
}

/// Decode a payload block as standard, padded base64.
///
/// Leftover bits in the final quantum are dropped, so `QR==` decodes to `A`.
///
/// Line terminators are skipped so wrapped bodies decode; anything else
/// outside the alphabet is an error.
pub fn decode_payload(payload: &[u8]) -> Result<Vec<u8>> {
    let compact: Vec<u8> = payload
        .iter()
        .copied()
        .filter(|&b| b != b'\n' && b != b'\r')
        .collect();
    let decoded = PAYLOAD_ENGINE.decode(compact)?;
    debug!(
        encoded = payload.len(),
        decoded = decoded.len(),
        "Decoded payload"
    );
    Ok(decoded)
}

fn assemble(fields: &HeaderFields<'_>, body: Vec<u8>) -> RenderedDocument {
    let mut bytes = render_metadata(fields);
    let metadata_len = bytes.len();
    bytes.extend_from_slice(&body);
    RenderedDocument {
        bytes,
        metadata_len,
        metadata_fields: fields.len(),
    }
}
