use thiserror::Error;

pub type ShowcaseResult<T> = Result<T, ShowcaseError>;

#[derive(Error, Debug)]
pub enum ShowcaseError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Storage quota exceeded: {needed} bytes needed, {available} available")]
    QuotaExceeded { needed: usize, available: usize },

    #[error("Invalid review: {0}")]
    InvalidReview(ReviewRejection),

    #[error("Login rejected: {0}")]
    Login(LoginRejection),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl ShowcaseError {
    /// Denial for a gallery mutation attempted without an admin session.
    pub fn admin_required() -> Self {
        ShowcaseError::Unauthorized("Only admins can modify the gallery.".to_string())
    }
}

/// Reason a review submission was turned away before touching the ledger.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewRejection {
    #[error("name is required")]
    EmptyName,

    #[error("message is required")]
    EmptyMessage,

    #[error("rating must be between 1 and 5, got {0}")]
    RatingOutOfRange(i64),
}

/// Reason a login attempt failed. Validation variants are reported before
/// any credential lookup happens.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginRejection {
    #[error("Please enter both username and password")]
    MissingFields,

    #[error("Username must be at least 3 characters")]
    UsernameTooShort,

    #[error("Password must be at least 6 characters")]
    PasswordTooShort,

    #[error("Invalid username or password")]
    InvalidCredentials,
}

impl From<ReviewRejection> for ShowcaseError {
    fn from(r: ReviewRejection) -> Self {
        ShowcaseError::InvalidReview(r)
    }
}

impl From<LoginRejection> for ShowcaseError {
    fn from(r: LoginRejection) -> Self {
        ShowcaseError::Login(r)
    }
}

impl From<config::ConfigError> for ShowcaseError {
    fn from(e: config::ConfigError) -> Self {
        ShowcaseError::Config(e.to_string())
    }
}
