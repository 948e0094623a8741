//! Error types for the WMF codec
//!
//! Decode-time anomalies that the format tolerates are absorbed and logged
//! by the stream engine; everything else surfaces here.

use thiserror::Error;

/// Error type for metafile encode/decode operations
#[derive(Error, Debug)]
pub enum WmfError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid placeable header key: expected 0x9AC6CDD7, got {0:#010x}")]
    InvalidMagic(u32),

    #[error("Truncated {what}: need {needed} bytes, {available} available")]
    Truncated {
        what: &'static str,
        needed: usize,
        available: usize,
    },

    #[error("Invalid size {size} bytes for record {opcode:#06x}")]
    InvalidRecordSize { opcode: u16, size: u64 },

    #[error("No free object handle (table capacity {capacity})")]
    HandleExhausted { capacity: usize },

    #[error("Invalid object handle: {0}")]
    InvalidHandle(u16),

    #[error("Record {record} has no value for field '{field}'")]
    MissingField {
        record: &'static str,
        field: &'static str,
    },

    #[error("Record {record} holds a value of the wrong kind for field '{field}'")]
    FieldType {
        record: &'static str,
        field: &'static str,
    },

    #[error("Value {value} does not fit field '{field}'")]
    ValueOutOfRange { field: &'static str, value: i64 },

    #[error("Field '{field}' expects {expected} elements, got {actual}")]
    CountMismatch {
        field: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("Invalid options: {0}")]
    InvalidOptions(String),
}

/// Result type alias for codec operations
pub type WmfResult<T> = Result<T, WmfError>;

/// Helper to convert serde_json errors
impl From<serde_json::Error> for WmfError {
    fn from(err: serde_json::Error) -> Self {
        WmfError::InvalidOptions(err.to_string())
    }
}

/// Conversion from WmfError to PyErr
#[cfg(feature = "python")]
impl From<WmfError> for pyo3::PyErr {
    fn from(err: WmfError) -> Self {
        match err {
            WmfError::Io(e) => pyo3::PyErr::new::<pyo3::exceptions::PyIOError, _>(e.to_string()),
            other => pyo3::PyErr::new::<pyo3::exceptions::PyValueError, _>(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = WmfError::InvalidMagic(0x1234_5678);
        assert!(err.to_string().contains("0x12345678"));

        let err = WmfError::HandleExhausted { capacity: 4 };
        assert!(err.to_string().contains('4'));

        let err = WmfError::Truncated {
            what: "record body",
            needed: 10,
            available: 3,
        };
        let msg = err.to_string();
        assert!(msg.contains("record body"));
        assert!(msg.contains("10"));
    }

    #[test]
    fn test_json_error_conversion() {
        let err: WmfError = serde_json::from_str::<u32>("not json").unwrap_err().into();
        assert!(matches!(err, WmfError::InvalidOptions(_)));
    }
}
