use thiserror::Error;

use catalog_core::DomainError;
use catalog_infra::RepositoryError;

/// How far an error reaches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Only the current record is skipped; the run continues.
    Recoverable,
    /// The run cannot continue (structural precondition or configuration).
    Fatal,
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ImportError {
    #[error("record is missing required headers: {}", missing.join(", "))]
    MissingHeaders { missing: Vec<String> },

    #[error("parent product with code {parent_code} does not exist yet, create it first")]
    ParentNotFound { parent_code: String },

    #[error("product with code {code} not found")]
    OwnerNotFound { code: String },

    #[error("attribute definition {code} not found")]
    MissingAttribute { code: String },

    #[error("product association type {code} not found")]
    MissingAssociationType { code: String },

    #[error("cannot transform value of {attribute} ({attribute_type}): {message}")]
    Transform {
        attribute: String,
        attribute_type: String,
        message: String,
    },

    #[error("invalid record: {0}")]
    InvalidRecord(String),

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl ImportError {
    pub fn severity(&self) -> Severity {
        match self {
            ImportError::MissingHeaders { .. }
            | ImportError::MissingAttribute { .. }
            | ImportError::MissingAssociationType { .. } => Severity::Fatal,
            _ => Severity::Recoverable,
        }
    }

    pub fn is_fatal(&self) -> bool {
        self.severity() == Severity::Fatal
    }
}
