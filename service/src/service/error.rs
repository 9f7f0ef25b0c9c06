use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use common::detection::status::ErrorDetail;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DetectionError {
    #[error("File must be an image")]
    NotImage,
    #[error("Models not loaded")]
    ModelNotLoaded,
    #[error("Error processing image: {0}")]
    Processing(String),
    #[error("No file uploaded")]
    MissingFile,
    #[error("Invalid confidence threshold: {0}")]
    InvalidThreshold(String),
    #[error("File exceeds the upload limit of {0} bytes")]
    PayloadTooLarge(usize),
    #[error("Malformed multipart payload: {0}")]
    Multipart(String),
}

impl ResponseError for DetectionError {
    fn status_code(&self) -> StatusCode {
        match self {
            DetectionError::NotImage
            | DetectionError::MissingFile
            | DetectionError::InvalidThreshold(_)
            | DetectionError::Multipart(_) => StatusCode::BAD_REQUEST,
            DetectionError::ModelNotLoaded => StatusCode::SERVICE_UNAVAILABLE,
            DetectionError::Processing(_) => StatusCode::INTERNAL_SERVER_ERROR,
            DetectionError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorDetail::new(self.to_string()))
    }
}

impl From<DetectionError> for String {
    #[inline(always)]
    fn from(value: DetectionError) -> Self {
        value.to_string()
    }
}
