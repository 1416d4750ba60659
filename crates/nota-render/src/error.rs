//! # Render Error Types
//!
//! Typed failures for the rendering edge.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  CompressError ── surfaced to the user, aborts ONLY that compression   │
//! │                                                                         │
//! │  RenderError ──── page-level failures (fonts, save) propagate;         │
//! │                   element-level failures (QR, logo) are caught         │
//! │                   inside the renderer, logged, and the element is      │
//! │                   omitted — checkout is never blocked by a bad logo    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

// =============================================================================
// Compression Error
// =============================================================================

/// Image compression failures.
///
/// No partial or corrupt artifact is ever returned: either the full
/// data-URI string comes back, or one of these does.
#[derive(Debug, Error)]
pub enum CompressError {
    /// The source could not be read.
    ///
    /// ## When This Occurs
    /// - `compress_file` given a missing or unreadable path
    #[error("failed to read image source: {0}")]
    Read(#[from] std::io::Error),

    /// The bytes are not a decodable image.
    ///
    /// ## When This Occurs
    /// - user picked a non-image file
    /// - upload truncated the payload
    #[error("failed to decode image: {0}")]
    Decode(image::ImageError),

    /// Re-encoding the scaled raster failed.
    #[error("failed to encode image: {0}")]
    Encode(image::ImageError),

    /// The blocking worker task was cancelled or panicked.
    #[error("compression task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

// =============================================================================
// Render Error
// =============================================================================

/// Receipt/QR rendering failures that cannot be degraded away.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The PDF backend rejected an operation (font load, byte emit).
    #[error("pdf error: {0}")]
    Pdf(#[from] printpdf::Error),

    /// The payload does not fit in any QR symbol version.
    #[error("qr encode error: {0}")]
    Qr(#[from] qrcode::types::QrError),

    /// The caller-supplied sink refused the artifact.
    #[error("failed to deliver artifact: {0}")]
    Deliver(std::io::Error),

    /// The blocking worker task was cancelled or panicked.
    #[error("render task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Convenience alias for render results.
pub type RenderResult<T> = Result<T, RenderError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compress_error_messages() {
        let err = CompressError::Read(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "no such file",
        ));
        assert!(err.to_string().starts_with("failed to read image source"));
    }

    #[test]
    fn test_deliver_error_message() {
        let err = RenderError::Deliver(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "read-only",
        ));
        assert!(err.to_string().starts_with("failed to deliver artifact"));
    }
}
