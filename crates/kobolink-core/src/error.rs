//! Error types for KoboLink

use thiserror::Error;

/// Result type alias using KoboLink's Error
pub type Result<T> = std::result::Result<T, Error>;

/// KoboLink error types with helpful messages and suggestions
#[derive(Error, Debug)]
pub enum Error {
    // Flow errors (E001-E099)
    #[error("Unknown screen '{0}'. Run `kobolink --help` to see valid screen names.")]
    UnknownScreen(String),

    // Input errors (E100-E199)
    #[error("Phone number has {0} digits. Enter at least 10 digits before requesting a code.")]
    PhoneTooShort(usize),

    #[error("Verification code incomplete ({0}/6 digits entered).")]
    OtpIncomplete(usize),

    #[error("Profile incomplete. Both full name and username are required.")]
    ProfileIncomplete,

    #[error("Transaction PIN must be exactly {expected} digits, got {actual}.")]
    PinLength { expected: usize, actual: usize },

    // Timer errors (E200-E299)
    #[error("Resend not ready. Wait {0} more seconds.")]
    ResendNotReady(u32),

    // Config errors (E600-E699)
    #[error("Configuration error: {0}")]
    ConfigError(String),

    // Generic errors
    #[error("{0}")]
    Other(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Get error code for this error type
    pub fn code(&self) -> &'static str {
        match self {
            Self::UnknownScreen(_) => "E001",
            Self::PhoneTooShort(_) => "E100",
            Self::OtpIncomplete(_) => "E101",
            Self::ProfileIncomplete => "E102",
            Self::PinLength { .. } => "E103",
            Self::ResendNotReady(_) => "E200",
            Self::ConfigError(_) => "E600",
            Self::Other(_) | Self::Io(_) => "E9999",
        }
    }

    /// Get suggestion for how to fix this error
    pub fn suggestion(&self) -> Option<String> {
        match self {
            Self::UnknownScreen(_) => Some("kobolink --help".to_string()),
            Self::PhoneTooShort(_) => Some("Enter at least 10 digits".to_string()),
            Self::OtpIncomplete(_) => Some("Fill all six code slots".to_string()),
            Self::ProfileIncomplete => Some("Fill in both name fields".to_string()),
            Self::PinLength { expected, .. } => Some(format!("Enter a {expected}-digit PIN")),
            Self::ResendNotReady(_) => Some("Wait for the countdown to finish".to_string()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_screen_error() {
        let error = Error::UnknownScreen("lobby".to_string());
        assert_eq!(error.code(), "E001");
        assert_eq!(error.suggestion(), Some("kobolink --help".to_string()));
        assert!(error.to_string().contains("lobby"));
    }

    #[test]
    fn test_phone_too_short_error() {
        let error = Error::PhoneTooShort(7);
        assert_eq!(error.code(), "E100");
        assert!(error.to_string().contains('7'));
        assert!(error.suggestion().is_some());
    }

    #[test]
    fn test_otp_incomplete_error() {
        let error = Error::OtpIncomplete(4);
        assert_eq!(error.code(), "E101");
        assert!(error.to_string().contains("4/6"));
    }

    #[test]
    fn test_pin_length_error() {
        let error = Error::PinLength {
            expected: 4,
            actual: 2,
        };
        assert_eq!(error.code(), "E103");
        assert_eq!(error.suggestion(), Some("Enter a 4-digit PIN".to_string()));
    }

    #[test]
    fn test_resend_not_ready_error() {
        let error = Error::ResendNotReady(12);
        assert_eq!(error.code(), "E200");
        assert!(error.to_string().contains("12"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let error: Error = io.into();
        assert_eq!(error.code(), "E9999");
        assert!(error.suggestion().is_none());
    }
}
