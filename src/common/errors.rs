use sea_orm::DbErr;
use std::fmt;

/// Errors surfaced by the store initializer, the mapping rules and the benchmark driver.
///
/// Migration steps themselves report `DbErr`; it arrives here wrapped in
/// `Database` once the migrator hands it back.
#[derive(Debug)]
pub enum AppError {
    /// Store connectivity, migration or query failure
    Database(DbErr),
    /// A stored datatype that should exist does not
    NotFound { resource: String, id: String },
    /// Missing or malformed configuration value
    Config { key: String, message: String },
    /// The lab API answered with an error or could not be reached
    Lab { endpoint: String, message: String },
    /// Local file needed by a lab call could not be read
    Io { path: String, message: String },
    /// A simulation reached a terminal state other than FINISHED
    SimulationFailed { operation_id: i64, message: String },
    /// Waiting was cancelled before the operation finished
    Cancelled,
    InternalError { message: String },
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Database(err) => write!(f, "Database error: {err}"),
            AppError::NotFound { resource, id } => {
                write!(f, "{resource} with id '{id}' not found")
            }
            AppError::Config { key, message } => {
                write!(f, "Configuration error for '{key}': {message}")
            }
            AppError::Lab { endpoint, message } => {
                write!(f, "Lab request '{endpoint}' failed: {message}")
            }
            AppError::Io { path, message } => write!(f, "Could not read '{path}': {message}"),
            AppError::SimulationFailed {
                operation_id,
                message,
            } => write!(f, "simulation failed (operation {operation_id}): {message}"),
            AppError::Cancelled => write!(f, "Cancelled while waiting for an operation"),
            AppError::InternalError { message } => write!(f, "Internal error: {message}"),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Database(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbErr> for AppError {
    fn from(err: DbErr) -> Self {
        AppError::Database(err)
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        let endpoint = err
            .url()
            .map_or_else(|| "unknown".to_string(), |url| url.path().to_string());
        AppError::Lab {
            endpoint,
            message: err.to_string(),
        }
    }
}

impl AppError {
    /// True for failures of the store itself, as opposed to the lab or local input.
    pub fn is_database(&self) -> bool {
        matches!(self, AppError::Database(_) | AppError::NotFound { .. })
    }
}

#[macro_export]
macro_rules! not_found {
    ($resource:expr, $id:expr) => {
        $crate::common::errors::AppError::NotFound {
            resource: $resource.to_string(),
            id: $id.to_string(),
        }
    };
}
