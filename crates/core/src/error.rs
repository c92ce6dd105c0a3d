use thiserror::Error;

#[derive(Debug, Error)]
pub enum CleanError {
    #[error("regex error: {0}")]
    RegexError(#[from] regex::Error),
}

/// Failure to turn a file into document text. The whole extraction is aborted.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Error extracting text from PDF: {0}")]
    Io(#[from] std::io::Error),

    #[error("Error extracting text from PDF: {0}")]
    PdfParse(String),
}

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("Error running model: {0}")]
    Launch(#[from] std::io::Error),

    #[error("Error: {stderr}")]
    Failed { stderr: String },

    #[error("Error running model: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Error: {status} {body}")]
    BackendResponse { status: u16, body: String },
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Please upload and extract text first.")]
    NoDocument,

    #[error("Error processing PDF: {0}")]
    Extraction(#[from] ExtractError),

    #[error(transparent)]
    Model(#[from] ModelError),
}
