//! Byte-input decoding.
//!
//! [`Document::parse_bytes`](crate::Document::parse_bytes) accepts raw bytes
//! and has to pick a character encoding before the lexer can run. The rules:
//!
//! 1. A byte order mark decides the encoding and is stripped.
//! 2. Otherwise an `encoding="..."` pseudo-attribute in a leading `<?xml`
//!    processing instruction names it. The instruction is ASCII in every
//!    encoding this accepts, so it is read straight from the bytes.
//! 3. Otherwise the input is UTF-8.
//!
//! Transcoding is done by `encoding_rs`. Malformed byte sequences are an
//! error rather than being replaced.

use std::fmt;

use encoding_rs::{Encoding, UTF_8};

/// How far into the input to look for the encoding declaration.
const DECLARATION_SCAN_LIMIT: usize = 256;

/// The input bytes could not be decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodingError {
    /// A human-readable description of the problem.
    pub message: String,
}

impl EncodingError {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for EncodingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "encoding error: {}", self.message)
    }
}

impl std::error::Error for EncodingError {}

/// Picks the encoding of `bytes` and the number of leading BOM bytes to skip.
///
/// # Examples
///
/// ```
/// use xmlarbor::encoding::detect_encoding;
///
/// let (enc, skip) = detect_encoding(b"\xEF\xBB\xBF<a/>").unwrap();
/// assert_eq!((enc.name(), skip), ("UTF-8", 3));
///
/// let (enc, skip) = detect_encoding(b"<?xml encoding='latin1'?><a/>").unwrap();
/// assert_eq!((enc.name(), skip), ("windows-1252", 0));
/// ```
///
/// # Errors
///
/// Returns [`EncodingError`] if the declared encoding label is unknown.
pub fn detect_encoding(bytes: &[u8]) -> Result<(&'static Encoding, usize), EncodingError> {
    if let Some(found) = Encoding::for_bom(bytes) {
        return Ok(found);
    }
    match declared_label(bytes) {
        Some(label) => Encoding::for_label(label)
            .map(|enc| (enc, 0))
            .ok_or_else(|| {
                EncodingError::new(format!(
                    "unsupported encoding: {}",
                    String::from_utf8_lossy(label)
                ))
            }),
        None => Ok((UTF_8, 0)),
    }
}

/// Decodes `bytes` with the named encoding.
///
/// # Errors
///
/// Returns [`EncodingError`] if the label is unknown or the bytes are not
/// valid in that encoding.
pub fn transcode(bytes: &[u8], label: &str) -> Result<String, EncodingError> {
    let encoding = Encoding::for_label(label.as_bytes())
        .ok_or_else(|| EncodingError::new(format!("unsupported encoding: {label}")))?;
    decode_with(encoding, bytes)
}

/// Decodes markup bytes to a UTF-8 string, detecting the encoding first.
///
/// # Errors
///
/// Returns [`EncodingError`] if the encoding is unknown or the bytes are
/// malformed for it.
pub fn decode_to_utf8(bytes: &[u8]) -> Result<String, EncodingError> {
    let (encoding, skip) = detect_encoding(bytes)?;
    decode_with(encoding, &bytes[skip..])
}

fn decode_with(encoding: &'static Encoding, bytes: &[u8]) -> Result<String, EncodingError> {
    let (text, had_errors) = encoding.decode_without_bom_handling(bytes);
    if had_errors {
        return Err(EncodingError::new(format!(
            "malformed byte sequence for encoding {}",
            encoding.name()
        )));
    }
    Ok(text.into_owned())
}

/// Returns the raw `encoding` label of a leading `<?xml ... ?>`, if any.
fn declared_label(bytes: &[u8]) -> Option<&[u8]> {
    let scan = &bytes[..bytes.len().min(DECLARATION_SCAN_LIMIT)];
    if !scan.starts_with(b"<?xml") {
        return None;
    }
    let end = scan.windows(2).position(|w| w == b"?>")?;
    let decl = &scan[..end];

    let key = decl.windows(8).position(|w| w == b"encoding")?;
    let rest = trim_ascii_start(&decl[key + 8..]);
    let rest = trim_ascii_start(rest.strip_prefix(b"=")?);
    let (&quote, rest) = rest.split_first()?;
    if quote != b'"' && quote != b'\'' {
        return None;
    }
    let len = rest.iter().position(|&b| b == quote)?;
    Some(&rest[..len])
}

fn trim_ascii_start(bytes: &[u8]) -> &[u8] {
    let skip = bytes
        .iter()
        .take_while(|b| matches!(b, b' ' | b'\t' | b'\r' | b'\n'))
        .count();
    &bytes[skip..]
}
