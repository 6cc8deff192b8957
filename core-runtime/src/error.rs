use thiserror::Error;

/// Errors raised while bootstrapping runtime infrastructure.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid log filter `{filter}`: {message}")]
    InvalidFilter { filter: String, message: String },

    #[error("Logging could not be installed: {0}")]
    LoggingInstall(String),
}

pub type Result<T> = std::result::Result<T, Error>;
