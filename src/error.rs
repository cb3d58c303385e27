use thiserror::Error;

pub type HorariosResult<T> = Result<T, HorariosError>;

/// Coarse classification of a failure, used by outer surfaces to pick a status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    MissingInput,
    SheetNotFound,
    InvalidFormat,
    DecodeFailure,
    Internal,
}

#[derive(Error, Debug)]
pub enum HorariosError {
    #[error("{0}")]
    MissingInput(String),

    #[error("{0}")]
    SheetNotFound(String),

    #[error("{0}")]
    InvalidFormat(String),

    #[error("{0}")]
    Decode(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl HorariosError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            HorariosError::MissingInput(_) => ErrorKind::MissingInput,
            HorariosError::SheetNotFound(_) => ErrorKind::SheetNotFound,
            HorariosError::InvalidFormat(_) => ErrorKind::InvalidFormat,
            HorariosError::Decode(_) => ErrorKind::DecodeFailure,
            HorariosError::Io(_)
            | HorariosError::Json(_)
            | HorariosError::Csv(_)
            | HorariosError::Validation(_) => ErrorKind::Internal,
        }
    }

    /// True for failures caused by what the user submitted rather than by the system.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::MissingInput | ErrorKind::SheetNotFound | ErrorKind::InvalidFormat
        )
    }
}
