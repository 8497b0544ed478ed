use crate::error::{DrawError, Result};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use std::path::Path;

/// Stands in for the data URI when no reference is given.
pub const PLACEHOLDER_DATA_URI: &str = "data:image/webp;base64, XXX";

const FALLBACK_MIME: &str = "application/octet-stream";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReferenceImage {
    None,
    Encoded { mime_type: String, data_uri: String },
}

impl ReferenceImage {
    /// Sniffs the MIME type from the bytes themselves, never from a file name.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        let mime_type = infer::get(bytes)
            .map(|kind| kind.mime_type())
            .unwrap_or(FALLBACK_MIME)
            .to_string();
        let data_uri = format!("data:{};base64,{}", mime_type, STANDARD.encode(bytes));
        ReferenceImage::Encoded {
            mime_type,
            data_uri,
        }
    }

    pub async fn load(path: &Path) -> Result<Self> {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| DrawError::io(path, e))?;
        let image = Self::from_bytes(&bytes);
        if let ReferenceImage::Encoded { mime_type, .. } = &image {
            log::debug!(
                "🖼️  Loaded reference image {} ({} bytes, {})",
                path.display(),
                bytes.len(),
                mime_type
            );
        }
        Ok(image)
    }

    pub fn data_uri(&self) -> &str {
        match self {
            ReferenceImage::None => PLACEHOLDER_DATA_URI,
            ReferenceImage::Encoded { data_uri, .. } => data_uri,
        }
    }

    pub fn is_encoded(&self) -> bool {
        matches!(self, ReferenceImage::Encoded { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // 1x1 transparent PNG
    const PNG: &[u8] = &[
        0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44,
        0x52, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x06, 0x00, 0x00, 0x00, 0x1F,
        0x15, 0xC4, 0x89,
    ];

    #[test]
    fn test_mime_comes_from_content() {
        let image = ReferenceImage::from_bytes(PNG);
        match &image {
            ReferenceImage::Encoded { mime_type, data_uri } => {
                assert_eq!(mime_type, "image/png");
                assert!(data_uri.starts_with("data:image/png;base64,iVBORw0KGgo"));
            }
            ReferenceImage::None => panic!("expected an encoded image"),
        }
        assert!(image.is_encoded());
    }

    #[test]
    fn test_unknown_content_falls_back() {
        let image = ReferenceImage::from_bytes(b"definitely not an image");
        assert!(image
            .data_uri()
            .starts_with("data:application/octet-stream;base64,"));
    }

    #[test]
    fn test_placeholder() {
        assert_eq!(ReferenceImage::None.data_uri(), PLACEHOLDER_DATA_URI);
        assert!(!ReferenceImage::None.is_encoded());
    }

    #[tokio::test]
    async fn test_missing_file_keeps_io_error() {
        let err = ReferenceImage::load(Path::new("/nonexistent/refer_image.jpg"))
            .await
            .unwrap_err();
        match err {
            DrawError::Io { source, .. } => {
                assert_eq!(source.kind(), std::io::ErrorKind::NotFound)
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
