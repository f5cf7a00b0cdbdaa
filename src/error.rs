use crate::models::ContactId;
use std::fmt;
use thiserror::Error;

/// Contact field that failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Supplier,
    ContactName,
    Email,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Field::Supplier => "Supplier Name",
            Field::ContactName => "Contact Name",
            Field::Email => "Email",
        };
        f.write_str(label)
    }
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("{0} must not be empty")]
    Validation(Field),

    #[error("Storage read error: {0}")]
    StorageRead(String),

    #[error("Storage write error: {0}")]
    StorageWrite(String),

    #[error("Contact at row {0} has changed or been removed; reload the list")]
    ContactNotFound(ContactId),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Export error: {0}")]
    Export(#[from] serde_json::Error),
}

impl Error {
    /// True for failures raised by an add/edit with an empty field.
    pub fn is_validation(&self) -> bool {
        matches!(self, Error::Validation(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
