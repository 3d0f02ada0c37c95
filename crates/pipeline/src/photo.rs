//! Photo encoding for transport to the workflow.
//!
//! Photos travel as `data:<mime>;base64,<payload>` text. The MIME type is
//! sniffed from the file header, not trusted from the extension.

use std::path::{Path, PathBuf};

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
pub use fixmyroad_core::report::MAX_PHOTO_BYTES;

#[derive(Debug, thiserror::Error)]
pub enum PhotoError {
    #[error("Could not read photo {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Photo {} is empty", .path.display())]
    Empty { path: PathBuf },

    #[error("Photo {} is {size} bytes, limit is {}", .path.display(), MAX_PHOTO_BYTES)]
    TooLarge { path: PathBuf, size: usize },

    #[error("Photo {} is not a recognised image format", .path.display())]
    UnsupportedFormat { path: PathBuf },
}

/// Read the photo at `path` and encode it as a data URL.
pub async fn encode_photo(path: &Path) -> Result<String, PhotoError> {
    let bytes = tokio::fs::read(path).await.map_err(|source| PhotoError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let encoded = encode_bytes(&bytes).map_err(|kind| kind.at(path))?;
    tracing::debug!(
        path = %path.display(),
        bytes = bytes.len(),
        encoded_len = encoded.len(),
        "Photo encoded",
    );
    Ok(encoded)
}

/// Path-free failure reasons from [`encode_bytes`].
#[derive(Debug, PartialEq, Eq)]
pub enum EncodeFailure {
    Empty,
    TooLarge(usize),
    UnsupportedFormat,
}

impl EncodeFailure {
    fn at(self, path: &Path) -> PhotoError {
        let path = path.to_path_buf();
        match self {
            EncodeFailure::Empty => PhotoError::Empty { path },
            EncodeFailure::TooLarge(size) => PhotoError::TooLarge { path, size },
            EncodeFailure::UnsupportedFormat => PhotoError::UnsupportedFormat { path },
        }
    }
}

/// Encode raw image bytes as a data URL.
pub fn encode_bytes(bytes: &[u8]) -> Result<String, EncodeFailure> {
    if bytes.is_empty() {
        return Err(EncodeFailure::Empty);
    }
    if bytes.len() > MAX_PHOTO_BYTES {
        return Err(EncodeFailure::TooLarge(bytes.len()));
    }

    let format = image::guess_format(bytes).map_err(|_| EncodeFailure::UnsupportedFormat)?;
    Ok(format!(
        "data:{};base64,{}",
        format.to_mime_type(),
        STANDARD.encode(bytes)
    ))
}
