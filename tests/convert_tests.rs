//! Integration tests for message rendering and file conversion.

use std::path::{Path, PathBuf};

use emlview::convert::convert_file;
use emlview::error::ConvertError;
use emlview::parser::blocks::MessageBlocks;
use emlview::parser::header::HeaderFields;
use emlview::render::{decode_payload, render_message};

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

// ─── Rendering ──────────────────────────────────────────────────────

#[test]
fn test_render_simple_fixture() {
    let raw = std::fs::read(fixture("simple.eml")).unwrap();
    let doc = render_message(&raw).unwrap();
    assert_eq!(
        doc.as_bytes(),
        b"<html> charset=utf-8</html><br><br><h1>Hi</h1>"
    );
}

#[test]
fn test_body_suffix_equals_decoded_payload() {
    let raw = std::fs::read(fixture("wrapped.eml")).unwrap();
    let blocks = MessageBlocks::split(&raw).unwrap();
    let expected = decode_payload(blocks.payload()).unwrap();

    let doc = render_message(&raw).unwrap();
    assert!(doc.as_bytes().ends_with(&expected));
    assert_eq!(doc.body(), expected.as_slice());
    assert!(doc.body().starts_with(b"<html><body><p>Quarterly report"));
}

#[test]
fn test_metadata_drops_first_and_last_fields() {
    let raw = std::fs::read(fixture("wrapped.eml")).unwrap();
    let blocks = MessageBlocks::split(&raw).unwrap();
    let fields = HeaderFields::parse(blocks.header()).unwrap();
    // 6 pieces in the header block, 4 rendered
    assert_eq!(fields.len(), 4);

    let doc = render_message(&raw).unwrap();
    let metadata = String::from_utf8_lossy(doc.metadata());
    assert_eq!(
        metadata,
        "<html> charset=\"utf-8\"<br> From: ana@example.com<br> To: team@example.com<br> Subject: Q3 report</html><br><br>"
    );
    assert!(!metadata.contains("Content-Type"));
    assert!(!metadata.contains("Content-Transfer-Encoding"));
}

#[test]
fn test_secondary_block_is_not_rendered() {
    let raw = std::fs::read(fixture("wrapped.eml")).unwrap();
    let doc = render_message(&raw).unwrap();
    let text = String::from_utf8_lossy(doc.as_bytes());
    assert!(!text.contains("MIME-Version"));
    assert!(!text.contains("X-Mailer"));
}

// ─── File conversion ───────────────────────────────────────────────

#[test]
fn test_convert_writes_document() {
    let tmp = tempfile::tempdir().unwrap();
    let out = tmp.path().join("simple.html");

    let conversion = convert_file(&fixture("simple.eml"), &out).unwrap();
    assert_eq!(conversion.output, out);
    assert_eq!(conversion.metadata_fields, 1);

    let written = std::fs::read(&out).unwrap();
    assert_eq!(written, b"<html> charset=utf-8</html><br><br><h1>Hi</h1>");
    assert_eq!(conversion.bytes_written, written.len() as u64);
}

#[test]
fn test_convert_is_idempotent() {
    let tmp = tempfile::tempdir().unwrap();
    let out = tmp.path().join("wrapped.html");

    convert_file(&fixture("wrapped.eml"), &out).unwrap();
    let first = std::fs::read(&out).unwrap();
    convert_file(&fixture("wrapped.eml"), &out).unwrap();
    let second = std::fs::read(&out).unwrap();

    assert_eq!(first, second);
}

#[test]
fn test_two_blocks_creates_no_output() {
    let tmp = tempfile::tempdir().unwrap();
    let out = tmp.path().join("two_blocks.html");

    let err = convert_file(&fixture("two_blocks.eml"), &out).unwrap_err();
    assert!(matches!(err, ConvertError::MalformedMessage { .. }));
    assert!(!out.exists(), "No output file should be created");
}

#[test]
fn test_bad_payload_creates_no_output() {
    let tmp = tempfile::tempdir().unwrap();
    let out = tmp.path().join("bad_payload.html");

    let err = convert_file(&fixture("bad_payload.eml"), &out).unwrap_err();
    assert!(matches!(err, ConvertError::PayloadDecode(_)));
    assert!(!out.exists(), "No output file should be created");
}

#[test]
fn test_header_without_separator_creates_no_output() {
    let tmp = tempfile::tempdir().unwrap();
    let out = tmp.path().join("no_fields.html");

    let err = convert_file(&fixture("no_fields.eml"), &out).unwrap_err();
    assert!(matches!(err, ConvertError::MalformedMessage { .. }));
    assert!(!out.exists());
}

#[test]
fn test_failed_conversion_keeps_existing_output() {
    let tmp = tempfile::tempdir().unwrap();
    let out = tmp.path().join("existing.html");
    std::fs::write(&out, b"previous").unwrap();

    assert!(convert_file(&fixture("bad_payload.eml"), &out).is_err());
    assert_eq!(std::fs::read(&out).unwrap(), b"previous");
}
