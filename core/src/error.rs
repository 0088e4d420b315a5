use thiserror::Error;

#[derive(Error, Debug)]
pub enum PanelError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("CSV export error: {0}")]
    Export(#[from] csv::Error),

    #[error("Invalid document '{input}': only digits are accepted")]
    InvalidDocument { input: String },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type PanelResult<T> = Result<T, PanelError>;
