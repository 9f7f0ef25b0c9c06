use std::io::Error as IoError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum NetworkEntry {
    #[error("Failed to bind port: {0}")]
    BindPortError(IoError),
    #[error("Failed to build HTTP client: {0}")]
    ClientBuildError(String),
    #[error("Backend {0} is unavailable")]
    BackendUnavailable(String),
    #[error("Request to {0} failed")]
    RequestFailed(String),
    #[error("Failed to decode response body: {0}")]
    InvalidResponseBody(String),
}

impl From<NetworkEntry> for String {
    #[inline(always)]
    fn from(value: NetworkEntry) -> Self {
        value.to_string()
    }
}
