use thiserror::Error;

#[derive(Error, Debug)]
pub enum RosterError {
    #[error("HTTP error {status}: {message}")]
    Http { status: u16, message: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("request error: {0}")]
    Request(#[from] reqwest::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("invalid CSV format: {0}")]
    Format(String),

    #[error("no valid users found in CSV data")]
    NoRecords,

    #[error("invalid email or password")]
    InvalidCredentials,

    #[error("not permitted: {0}")]
    Forbidden(String),

    #[error("role {role_id} is assigned to {} user(s): {}", users.len(), users.join(", "))]
    RoleInUse { role_id: String, users: Vec<String> },

    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },
}

impl RosterError {
    /// Shorthand for [`RosterError::Validation`].
    pub fn validation(msg: impl Into<String>) -> Self {
        RosterError::Validation(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, RosterError>;
