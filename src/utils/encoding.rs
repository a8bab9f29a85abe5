//! Text decoding for configuration files.
//!
//! Editors on some platforms save JSON with a byte-order mark or as UTF-16,
//! which `serde_json` rejects. Everything read for parsing goes through
//! [`read_text`] so those files still yield their sections.

use encoding_rs::{Encoding, UTF_8};
use std::path::Path;

/// Decode bytes to text.
///
/// Strategy:
/// 1. A BOM (UTF-8, UTF-16 LE/BE) selects the encoding and is stripped
/// 2. Valid UTF-8 is taken as-is (fast path)
/// 3. Anything else is decoded as UTF-8 with replacement characters
pub fn decode_text(bytes: &[u8]) -> String {
    if let Some((encoding, bom_len)) = Encoding::for_bom(bytes) {
        let (text, _) = encoding.decode_without_bom_handling(&bytes[bom_len..]);
        return text.into_owned();
    }

    match std::str::from_utf8(bytes) {
        Ok(text) => text.to_string(),
        Err(_) => {
            let (text, _, _) = UTF_8.decode(bytes);
            text.into_owned()
        }
    }
}

/// Read a whole file as text, see [`decode_text`].
pub fn read_text(path: &Path) -> std::io::Result<String> {
    let bytes = std::fs::read(path)?;
    Ok(decode_text(&bytes))
}
