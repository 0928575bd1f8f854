//! Legacy-encoding detection for Arabic text files.
//!
//! Real-world Sudanese corpora mix UTF-8 with files saved under the old
//! Windows Arabic code page or ISO-8859-6. Decoding tries a prioritized
//! fallback chain and reports which entry succeeded, so batch reports can
//! show how much of a corpus still lives in legacy encodings.

use encoding_rs::{Encoding, ISO_8859_6, WINDOWS_1252, WINDOWS_1256};

use crate::error::NormalizerError;

/// UTF-8 byte-order mark.
const BOM: [u8; 3] = [0xEF, 0xBB, 0xBF];

/// A text encoding the decoder knows how to try.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextEncoding {
    /// UTF-8 with a leading byte-order mark, which is stripped
    Utf8Sig,
    /// Strict UTF-8
    Utf8,
    /// Windows Arabic code page (cp1256)
    Windows1256,
    /// ISO-8859-6 Arabic
    Iso88596,
    /// Windows Western code page; defines all 256 bytes, so it always
    /// decodes and must stay last
    Windows1252,
}

/// The order encodings are tried in.
///
/// `Utf8Sig` must precede `Utf8`: a BOM is valid UTF-8, and trying strict
/// UTF-8 first would leak U+FEFF into the decoded text.
pub const FALLBACK_CHAIN: [TextEncoding; 5] = [
    TextEncoding::Utf8Sig,
    TextEncoding::Utf8,
    TextEncoding::Windows1256,
    TextEncoding::Iso88596,
    TextEncoding::Windows1252,
];

impl TextEncoding {
    /// Human-readable label, stable across releases; recorded on file jobs.
    pub fn label(&self) -> &'static str {
        match self {
            TextEncoding::Utf8Sig => "utf-8-sig",
            TextEncoding::Utf8 => "utf-8",
            TextEncoding::Windows1256 => "windows-1256",
            TextEncoding::Iso88596 => "iso-8859-6",
            TextEncoding::Windows1252 => "windows-1252",
        }
    }

    /// Attempt a strict decode, with no replacement characters.
    ///
    /// Returns `None` when the bytes are not valid under this encoding, so
    /// the caller can fall through to the next chain entry.
    pub fn try_decode(&self, bytes: &[u8]) -> Option<String> {
        match self {
            TextEncoding::Utf8Sig => {
                let rest = bytes.strip_prefix(&BOM)?;
                std::str::from_utf8(rest).ok().map(str::to_string)
            }
            TextEncoding::Utf8 => std::str::from_utf8(bytes).ok().map(str::to_string),
            TextEncoding::Windows1256 => decode_single_byte(WINDOWS_1256, bytes),
            TextEncoding::Iso88596 => decode_single_byte(ISO_8859_6, bytes),
            TextEncoding::Windows1252 => decode_single_byte(WINDOWS_1252, bytes),
        }
    }
}

impl std::fmt::Display for TextEncoding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

fn decode_single_byte(encoding: &'static Encoding, bytes: &[u8]) -> Option<String> {
    encoding
        .decode_without_bom_handling_and_without_replacement(bytes)
        .map(|cow| cow.into_owned())
}

/// The outcome of a successful decode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedText {
    /// The decoded text, BOM already stripped
    pub text: String,
    /// Label of the chain entry that accepted the bytes
    pub encoding: &'static str,
}

/// Decode raw file bytes through the fallback chain.
///
/// The first encoding that accepts the bytes wins. The final chain entry
/// is total, so failure is only reachable if the chain is misconfigured.
pub fn decode_bytes(bytes: &[u8]) -> Result<DecodedText, NormalizerError> {
    for encoding in FALLBACK_CHAIN {
        if let Some(text) = encoding.try_decode(bytes) {
            return Ok(DecodedText {
                text,
                encoding: encoding.label(),
            });
        }
    }
    Err(NormalizerError::Decode)
}
