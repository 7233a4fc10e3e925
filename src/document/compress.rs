//! Compression of stored documents.
//!
//! Documents are stored as gzip streams encoded as standard base64, one
//! compact token per document.

use std::io::{self, Read, Write};

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use flate2::Compression;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;

use super::error::LoadError;

/// Gzip `text` and encode the result as base64.
pub fn compress(text: &str) -> io::Result<String> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(text.as_bytes())?;
    let bytes = encoder.finish()?;
    Ok(STANDARD.encode(bytes))
}

/// Decode a token produced by [`compress`].
pub fn decompress(token: &str) -> Result<String, LoadError> {
    let bytes = STANDARD
        .decode(token.trim())
        .map_err(|err| LoadError::Decode(err.to_string()))?;

    let mut text = String::new();
    GzDecoder::new(bytes.as_slice())
        .read_to_string(&mut text)
        .map_err(|err| LoadError::Decode(err.to_string()))?;
    Ok(text)
}
