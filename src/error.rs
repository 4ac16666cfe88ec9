use std::fmt;

/// Error types for DataFlash decoding
#[derive(Debug)]
pub enum DataFlashError {
    /// I/O errors from the underlying byte source
    Io(std::io::Error),
    /// No bytes left at a frame boundary
    EndOfStream,
    /// The byte source ran dry in the middle of a read
    UnexpectedEof,
    /// Magic header bytes absent, mismatched, or cut short
    MissingHeader,
    /// Frame type has no registered format
    UnknownMessageType(u8),
    /// Format references a type code the decoder does not know
    UnknownFieldType(char),
    /// Stream ended inside a field
    TruncatedField { message: String, column: String },
    /// FMT definition could not be turned into a format
    InvalidFormat(String),
    /// Declared frame length disagrees with the summed field widths
    LengthMismatch {
        name: String,
        declared: u8,
        computed: usize,
    },
    /// Export format error
    Export(String),
}

impl fmt::Display for DataFlashError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataFlashError::Io(err) => write!(f, "I/O error: {}", err),
            DataFlashError::EndOfStream => write!(f, "End of stream"),
            DataFlashError::UnexpectedEof => write!(f, "Unexpected end of file"),
            DataFlashError::MissingHeader => write!(f, "Missing magic message header"),
            DataFlashError::UnknownMessageType(id) => {
                write!(f, "Unknown message type: 0x{:02X}", id)
            }
            DataFlashError::UnknownFieldType(code) => write!(f, "Unknown field type: '{}'", code),
            DataFlashError::TruncatedField { message, column } => {
                write!(f, "Truncated field {}.{}", message, column)
            }
            DataFlashError::InvalidFormat(msg) => write!(f, "Invalid format: {}", msg),
            DataFlashError::LengthMismatch {
                name,
                declared,
                computed,
            } => write!(
                f,
                "Length mismatch for {}: declared {} bytes, fields need {}",
                name, declared, computed
            ),
            DataFlashError::Export(msg) => write!(f, "Export error: {}", msg),
        }
    }
}

impl std::error::Error for DataFlashError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DataFlashError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for DataFlashError {
    fn from(err: std::io::Error) -> Self {
        if err.kind() == std::io::ErrorKind::UnexpectedEof {
            DataFlashError::UnexpectedEof
        } else {
            DataFlashError::Io(err)
        }
    }
}

#[cfg(feature = "csv")]
impl From<csv::Error> for DataFlashError {
    fn from(err: csv::Error) -> Self {
        DataFlashError::Export(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, DataFlashError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_eof_maps_to_unexpected_eof() {
        let err: DataFlashError =
            std::io::Error::new(std::io::ErrorKind::UnexpectedEof, "short").into();
        assert!(matches!(err, DataFlashError::UnexpectedEof));

        let err: DataFlashError =
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "nope").into();
        assert!(matches!(err, DataFlashError::Io(_)));
    }

    #[test]
    fn test_display_messages() {
        assert_eq!(
            DataFlashError::UnknownMessageType(0x81).to_string(),
            "Unknown message type: 0x81"
        );
        assert_eq!(
            DataFlashError::UnknownFieldType('X').to_string(),
            "Unknown field type: 'X'"
        );
        let err = DataFlashError::TruncatedField {
            message: "GPS".to_string(),
            column: "Lat".to_string(),
        };
        assert_eq!(err.to_string(), "Truncated field GPS.Lat");
    }
}
