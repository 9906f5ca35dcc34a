//! Error types and handling for the `TripCarbon` library

use thiserror::Error;

/// Main error type for the `TripCarbon` library
#[derive(Error, Debug)]
pub enum TripCarbonError {
    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Input validation errors
    #[error("Invalid input: {message}")]
    Validation { message: String },

    /// Offline data table errors
    #[error("Offline data error: {message}")]
    Data { message: String },

    /// I/O operation errors
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

impl TripCarbonError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a new offline data error
    pub fn data<S: Into<String>>(message: S) -> Self {
        Self::Data {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let config_err = TripCarbonError::config("missing API key");
        assert!(matches!(config_err, TripCarbonError::Config { .. }));

        let validation_err = TripCarbonError::validation("unknown mode");
        assert!(matches!(validation_err, TripCarbonError::Validation { .. }));

        let data_err = TripCarbonError::data("bad row");
        assert!(matches!(data_err, TripCarbonError::Data { .. }));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: TripCarbonError = io_err.into();
        assert!(matches!(err, TripCarbonError::Io { .. }));
    }
}
