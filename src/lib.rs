//! `emlview` — convert a base64-bodied `.eml` message into a browser-viewable
//! HTML document.
//!
//! The library splits a raw message into blocks, extracts the displayable
//! header fields, decodes the payload and assembles the document. File I/O
//! and the best-effort browser/cleanup steps live in [`convert`] and
//! [`viewer`].

pub mod config;
pub mod convert;
pub mod error;
pub mod i18n;
pub mod parser;
pub mod render;
pub mod viewer;
