//! Message parsing: block splitting and header field extraction.

pub mod blocks;
pub mod header;
