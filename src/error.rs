//! Error types for Poya
//!
//! All modules use `PoyaResult<T>` as their return type. Every variant
//! belongs to exactly one [`OutcomeKind`], which is what the request
//! surface turns into a status code.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for Poya operations
pub type PoyaResult<T> = Result<T, PoyaError>;

/// Why a credential was rejected
///
/// Only used for diagnostics. Callers always see the same generic message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthFailure {
    /// No credential header on the request
    Missing,
    /// Neither the primary nor the fallback set holds any key
    NotConfigured,
    /// Credential not present in any set
    Invalid,
}

impl fmt::Display for AuthFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            Self::Missing => "missing",
            Self::NotConfigured => "not configured",
            Self::Invalid => "invalid",
        };
        write!(f, "{}", reason)
    }
}

/// Externally visible class of a failed request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutcomeKind {
    Unauthorized,
    BadRequest,
    NotFound,
    Internal,
}

/// All errors that can occur in Poya
#[derive(Error, Debug)]
pub enum PoyaError {
    // Access errors
    #[error("Missing or invalid API key ({reason})")]
    Unauthorized { reason: AuthFailure },

    // Request errors
    #[error("Invalid date provided: {year}-{month}-{day}")]
    InvalidDate { year: i32, month: u32, day: u32 },

    #[error("Year {year} is outside the supported range {min}-{max}")]
    YearOutOfRange { year: i32, min: i32, max: i32 },

    #[error("Invalid {name}: {value}")]
    InvalidParameter { name: &'static str, value: String },

    #[error("Invalid format '{0}'. Use 'simple' or 'full'")]
    InvalidFormat(String),

    #[error("Invalid file path: {0}")]
    PathRejected(PathBuf),

    // Data errors
    #[error("Data for year {0} not available")]
    YearNotFound(i32),

    #[error("Invalid data format for year {year}: {reason}")]
    DatasetCorrupt { year: i32, reason: String },

    // Configuration errors
    #[error("Invalid configuration at {path}: {reason}")]
    ConfigInvalid { path: PathBuf, reason: String },

    #[error("Failed to create config directory {path}: {source}")]
    ConfigDirCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // IO errors
    #[error("IO error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    // Serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    // General errors
    #[error("Internal error: {0}")]
    Internal(String),

    #[error("{0}")]
    User(String),
}

impl PoyaError {
    /// Create an IO error with context
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Create an unauthorized error with an internal reason
    pub fn unauthorized(reason: AuthFailure) -> Self {
        Self::Unauthorized { reason }
    }

    /// Classify the error for the request surface
    pub fn kind(&self) -> OutcomeKind {
        match self {
            Self::Unauthorized { .. } => OutcomeKind::Unauthorized,
            Self::InvalidDate { .. }
            | Self::YearOutOfRange { .. }
            | Self::InvalidParameter { .. }
            | Self::InvalidFormat(_)
            | Self::PathRejected(_)
            | Self::User(_) => OutcomeKind::BadRequest,
            Self::YearNotFound(_) => OutcomeKind::NotFound,
            Self::DatasetCorrupt { .. }
            | Self::ConfigInvalid { .. }
            | Self::ConfigDirCreate { .. }
            | Self::Io { .. }
            | Self::Json(_)
            | Self::TomlSerialize(_)
            | Self::Internal(_) => OutcomeKind::Internal,
        }
    }

    /// Message safe to hand back to an API caller
    pub fn public_message(&self) -> String {
        match self {
            Self::Unauthorized { .. } => {
                "Missing or invalid API key. Use a valid key in the API key header.".to_string()
            }
            Self::InvalidDate { .. } => "Invalid date provided".to_string(),
            Self::PathRejected(_) => "Invalid file path".to_string(),
            Self::YearNotFound(_) => "Data for requested year not available".to_string(),
            Self::DatasetCorrupt { .. } => {
                "Invalid data format for requested year. Please notify the admin.".to_string()
            }
            Self::YearOutOfRange { .. }
            | Self::InvalidParameter { .. }
            | Self::InvalidFormat(_)
            | Self::User(_) => self.to_string(),
            _ => "Internal server error".to_string(),
        }
    }

    /// Get actionable hint for the error
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::Unauthorized {
                reason: AuthFailure::NotConfigured,
            } => Some("Set API_KEYS or auth.fallback_keys, or load keys into the cache backend"),
            Self::YearNotFound(_) => Some("Check data.dir points at the yearly JSON datasets"),
            Self::DatasetCorrupt { .. } => Some("Regenerate the dataset file from its calendar source"),
            Self::ConfigInvalid { .. } => Some("Run: poya config show"),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = PoyaError::YearNotFound(2030);
        assert!(err.to_string().contains("2030"));
    }

    #[test]
    fn unauthorized_reasons_share_kind_and_message() {
        let reasons = [
            AuthFailure::Missing,
            AuthFailure::NotConfigured,
            AuthFailure::Invalid,
        ];
        let messages: Vec<String> = reasons
            .iter()
            .map(|r| PoyaError::unauthorized(*r))
            .inspect(|e| assert_eq!(e.kind(), OutcomeKind::Unauthorized))
            .map(|e| e.public_message())
            .collect();
        assert!(messages.windows(2).all(|w| w[0] == w[1]));
    }

    #[test]
    fn internal_reason_stays_in_display() {
        let err = PoyaError::unauthorized(AuthFailure::NotConfigured);
        assert!(err.to_string().contains("not configured"));
        assert!(!err.public_message().contains("not configured"));
    }

    #[test]
    fn outcome_kinds() {
        assert_eq!(
            PoyaError::InvalidDate {
                year: 2024,
                month: 2,
                day: 30
            }
            .kind(),
            OutcomeKind::BadRequest
        );
        assert_eq!(PoyaError::YearNotFound(2024).kind(), OutcomeKind::NotFound);
        assert_eq!(
            PoyaError::DatasetCorrupt {
                year: 2024,
                reason: "eof".into()
            }
            .kind(),
            OutcomeKind::Internal
        );
        assert_eq!(
            PoyaError::PathRejected(PathBuf::from("../x")).kind(),
            OutcomeKind::BadRequest
        );
    }

    #[test]
    fn error_hint() {
        let err = PoyaError::unauthorized(AuthFailure::NotConfigured);
        assert!(err.hint().is_some());
        assert!(PoyaError::unauthorized(AuthFailure::Invalid).hint().is_none());
    }
}
