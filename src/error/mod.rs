use thiserror::Error;

use crate::services::wallet::ProviderKind;

pub mod types;

pub use types::{Severity, UserNotice};

/// Failure reported by an external collaborator (identity service, pixel service, injected
/// wallet). The reason is passed through to the user as-is.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{reason}")]
pub struct ServiceError {
    pub reason: String,
}

impl ServiceError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

pub type ServiceResult<T> = std::result::Result<T, ServiceError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Invalid params - {0}")]
    InvalidParams(String),

    #[error("Wallet provider unavailable - {0}")]
    ProviderUnavailable(ProviderKind),

    #[error("No wallet provider available")]
    NoProviderAvailable,

    #[error("Connection rejected by {kind} - {reason}")]
    ConnectionRejected { kind: ProviderKind, reason: String },

    #[error("Wish text is empty")]
    EmptyWishText,

    #[error("Wallet address is missing")]
    MissingWalletAddress,

    #[error("Invalid color - {0}")]
    InvalidColor(String),

    #[error("Submission rejected - {0}")]
    SubmissionRejected(String),

    #[error("Pixel map unavailable - {0}")]
    PixelMapUnavailable(String),

    #[error("Session expired")]
    SessionExpired,

    #[error("Login rejected - {0}")]
    LoginRejected(String),

    #[error("Registration rejected - {0}")]
    RegistrationRejected(String),

    #[error("Passwords do not match")]
    PasswordMismatch,

    #[error("Invalid workflow transition")]
    InvalidWorkflowTransition,

    #[error("Storage error - {0}")]
    Storage(String),

    #[error("Serialization error - {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("IO error - {0}")]
    IoError(#[from] std::io::Error),

    #[error("TryInitError - {0}")]
    TryInitError(#[from] tracing_subscriber::util::TryInitError),
}

impl AppError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidParams(_) => "invalid_params",
            Self::ProviderUnavailable(_) => "provider_unavailable",
            Self::NoProviderAvailable => "no_provider_available",
            Self::ConnectionRejected { .. } => "connection_rejected",
            Self::EmptyWishText => "empty_wish_text",
            Self::MissingWalletAddress => "missing_wallet_address",
            Self::InvalidColor(_) => "invalid_color",
            Self::SubmissionRejected(_) => "submission_rejected",
            Self::PixelMapUnavailable(_) => "pixel_map_unavailable",
            Self::SessionExpired => "session_expired",
            Self::LoginRejected(_) => "login_rejected",
            Self::RegistrationRejected(_) => "registration_rejected",
            Self::PasswordMismatch => "password_mismatch",
            Self::InvalidWorkflowTransition => "invalid_workflow_transition",
            Self::Storage(_) => "storage_error",
            Self::SerializationError(_) => "serialization_error",
            Self::IoError(_) => "io_error",
            Self::TryInitError(_) => "try_init_error",
        }
    }

    /// Recoverable failures the user should not be bothered with.
    pub fn is_silent(&self) -> bool {
        matches!(
            self,
            Self::ConnectionRejected { .. } | Self::SessionExpired
        )
    }

    pub fn user_safe_format(&self) -> UserNotice {
        let (message, severity) = match self {
            Self::InvalidParams(msg) => (msg.clone(), Severity::Error),
            Self::ProviderUnavailable(kind) => (
                match kind.install_url() {
                    Some(url) => format!(
                        "{} wallet not found. Install it from {url} to continue.",
                        kind.display_name()
                    ),
                    None => format!(
                        "{} is not installed. Please install {} to continue.",
                        kind.display_name(),
                        kind.display_name()
                    ),
                },
                Severity::Warning,
            ),
            Self::NoProviderAvailable => (
                "No wallet found. Please install Phantom, Backpack or MetaMask.".to_string(),
                Severity::Warning,
            ),
            Self::ConnectionRejected { kind, .. } => (
                format!("Failed to connect {}", kind.display_name()),
                Severity::Info,
            ),
            Self::EmptyWishText => ("Please enter a wish text".to_string(), Severity::Error),
            Self::MissingWalletAddress => (
                "Please enter your wallet address".to_string(),
                Severity::Error,
            ),
            Self::InvalidColor(color) => (
                format!("'{color}' is not a valid color. Use a #rrggbb value."),
                Severity::Error,
            ),
            Self::SubmissionRejected(reason) => (reason.clone(), Severity::Error),
            Self::PixelMapUnavailable(error) => {
                tracing::warn!(error = %error, "Pixel map unavailable");

                ("Failed to load pixel map".to_string(), Severity::Error)
            }
            Self::SessionExpired => (
                "Session has expired. Please login again.".to_string(),
                Severity::Info,
            ),
            Self::LoginRejected(reason) => (reason.clone(), Severity::Error),
            Self::RegistrationRejected(reason) => (reason.clone(), Severity::Error),
            Self::PasswordMismatch => ("Passwords do not match".to_string(), Severity::Error),
            Self::InvalidWorkflowTransition => (
                "Please finish or close the current dialog first.".to_string(),
                Severity::Warning,
            ),
            Self::Storage(error) => {
                tracing::error!(error = %error, "Storage error");

                (
                    "Could not save your session. Please try again.".to_string(),
                    Severity::Error,
                )
            }
            Self::SerializationError(error) => {
                tracing::error!(error = %error, "Serialization error");

                ("Something went wrong".to_string(), Severity::Error)
            }
            Self::IoError(error) => {
                tracing::error!(error = %error, "IO error");

                ("Something went wrong".to_string(), Severity::Error)
            }
            Self::TryInitError(error) => {
                tracing::error!(error = %error, "TryInitError");

                ("Something went wrong".to_string(), Severity::Error)
            }
        };

        UserNotice {
            code: self.code(),
            message,
            severity,
            silent: self.is_silent(),
        }
    }
}

impl From<&AppError> for UserNotice {
    fn from(error: &AppError) -> Self {
        error.user_safe_format()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
