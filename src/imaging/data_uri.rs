//! `data:` URI conversion.
//!
//! Only base64 payloads are understood, which covers what web clients send:
//!
//! ```text
//! data:image/jpeg;base64,/9j/4AAQSkZJRgABAQ...
//! └──┘└────────┘└─────┘ └──────────────────┘
//!  scheme  mime   encoding      payload
//! ```

use super::file::ImageFile;
use super::operations::ResizeError;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;

/// Decoded payload of a data URI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Blob {
    pub media_type: String,
    pub bytes: Vec<u8>,
}

impl Blob {
    /// Attach a file name, turning the blob into an [`ImageFile`].
    pub fn into_file(self, name: impl Into<String>) -> ImageFile {
        ImageFile::new(name, self.media_type, self.bytes)
    }
}

fn malformed(reason: &str) -> ResizeError {
    ResizeError::MalformedDataUri(reason.to_string())
}

/// Split a data URI at its metadata/payload boundary and decode the payload.
///
/// Fails with [`ResizeError::MalformedDataUri`] when the `data:` scheme or the
/// `,` separator is missing, when the payload is not marked `;base64`, or when
/// the payload is not valid base64.
pub fn decode_data_uri(uri: &str) -> Result<Blob, ResizeError> {
    let uri = uri.trim();
    let (meta, payload) = uri
        .split_once(',')
        .ok_or_else(|| malformed("missing ',' between metadata and payload"))?;

    let meta = meta
        .get(..5)
        .filter(|scheme| scheme.eq_ignore_ascii_case("data:"))
        .map(|_| &meta[5..])
        .ok_or_else(|| malformed("missing 'data:' scheme"))?;

    let mut parts = meta.split(';');
    let media_type = parts.next().unwrap_or("").trim();
    if !parts.any(|p| p.trim().eq_ignore_ascii_case("base64")) {
        return Err(malformed("payload is not base64-encoded"));
    }

    // Payloads pasted from files are often wrapped at 76 columns.
    let payload: Vec<u8> = payload
        .bytes()
        .filter(|b| !b.is_ascii_whitespace())
        .collect();
    let bytes = STANDARD
        .decode(&payload)
        .map_err(|e| ResizeError::MalformedDataUri(format!("invalid base64 payload: {e}")))?;

    Ok(Blob {
        media_type: if media_type.is_empty() {
            "text/plain".to_string()
        } else {
            media_type.to_ascii_lowercase()
        },
        bytes,
    })
}

/// Build a base64 data URI for `bytes`.
pub fn encode_data_uri(media_type: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", media_type, STANDARD.encode(bytes))
}
