use roster::RosterError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Roster(#[from] RosterError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("missing credentials: set --email/--password or ROSTER_EMAIL/ROSTER_PASSWORD")]
    MissingCredentials,
}
