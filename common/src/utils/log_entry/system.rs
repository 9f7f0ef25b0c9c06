use std::io::Error as IoError;
use std::net::SocketAddr;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SystemEntry {
    #[error("Online now")]
    Online,
    #[error("Initializing")]
    Initializing,
    #[error("Initialization completed")]
    InitializeComplete,
    #[error("Termination in process")]
    Terminating,
    #[error("Termination completed")]
    TerminateComplete,
    #[error("Invalid configuration")]
    InvalidConfig,
    #[error("Configuration not found")]
    ConfigNotFound,
    #[error("Unable to parse configuration: {0}")]
    ConfigParseError(String),
    #[error("Web service ready on {0}")]
    WebReady(SocketAddr),
    #[error("Web service panic: {0}")]
    WebPanic(IoError),
    #[error("Child process {0} started")]
    ChildProcessStarted(String),
    #[error("Child process execution error: {0}")]
    ChildProcessError(String),
    #[error("Child process {0} exited")]
    ChildProcessExited(String),
}

impl From<SystemEntry> for String {
    #[inline(always)]
    fn from(value: SystemEntry) -> Self {
        value.to_string()
    }
}
