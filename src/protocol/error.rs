//! Link protocol error types

use thiserror::Error;

/// Frame and link errors
#[derive(Error, Debug)]
pub enum Error {
    /// Received checksum disagrees with the one computed over the frame
    #[error("checksum mismatch: expected {expected:#04x}, got {found:#04x}")]
    ChecksumMismatch {
        /// Checksum computed locally
        expected: u8,
        /// Checksum carried by the frame
        found: u8,
    },

    /// Access outside the fixed payload buffer
    #[error("buffer overflow: {len} bytes at offset {offset} exceed capacity {capacity}")]
    BufferOverflow {
        /// Start offset of the access
        offset: usize,
        /// Number of bytes accessed
        len: usize,
        /// Payload buffer capacity
        capacity: usize,
    },

    /// Length field too small to hold the type and checksum bytes
    #[error("malformed length field: {length} (minimum 2)")]
    MalformedLength {
        /// Declared length
        length: u8,
    },

    /// IO error from the underlying byte source
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_formats_checksum_as_hex() {
        let err = Error::ChecksumMismatch {
            expected: 0x0A,
            found: 0xF0,
        };
        assert_eq!(
            err.to_string(),
            "checksum mismatch: expected 0x0a, got 0xf0"
        );
    }

    #[test]
    fn test_io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "port closed");
        let err: Error = io.into();
        assert!(matches!(err, Error::Io(_)));
    }
}
