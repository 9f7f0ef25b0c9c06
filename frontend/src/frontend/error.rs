use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("Request timed out")]
    Timeout,
    #[error("Cannot connect to backend service")]
    Connection,
    #[error("Backend returned {code}: {detail}")]
    Status { code: u16, detail: String },
    #[error("{0}")]
    Other(String),
}

impl From<reqwest::Error> for BackendError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            BackendError::Timeout
        } else if err.is_connect() {
            BackendError::Connection
        } else {
            BackendError::Other(err.to_string())
        }
    }
}

impl BackendError {
    pub fn flash_message(&self, batch: bool) -> String {
        match (self, batch) {
            (BackendError::Timeout, false) => "Request timed out. The image might be too large or the backend is busy.".to_string(),
            (BackendError::Timeout, true) => "Request timed out. Try uploading fewer or smaller images.".to_string(),
            (BackendError::Connection, _) => "Cannot connect to backend service. Please ensure the detection service is running.".to_string(),
            (BackendError::Status { detail, .. }, false) => format!("Error processing image: {}", detail),
            (BackendError::Status { detail, .. }, true) => format!("Error processing images: {}", detail),
            (BackendError::Other(cause), _) => format!("Error: {}", cause),
        }
    }
}

impl From<BackendError> for String {
    #[inline(always)]
    fn from(value: BackendError) -> Self {
        value.to_string()
    }
}

#[derive(Error, Debug, PartialEq)]
pub enum UploadError {
    #[error("No file selected")]
    NoFile,
    #[error("No files selected")]
    NoFiles,
    #[error("Invalid file type. Please upload an image file.")]
    InvalidType,
    #[error("No valid image files found")]
    NoValidFiles,
    #[error("File is too large. Please upload a smaller image.")]
    TooLarge,
    #[error("Invalid confidence threshold.")]
    InvalidConfidence,
    #[error("Error: {0}")]
    Malformed(String),
}
