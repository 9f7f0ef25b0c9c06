use thiserror::Error;

#[derive(Error, Debug)]
pub enum ModelEntry {
    #[error("Loading model from cache {0}")]
    LoadFromCache(String),
    #[error("Model cache not found, downloading")]
    CacheMiss,
    #[error("Cached model is unusable, falling back to download: {0}")]
    CacheUnusable(String),
    #[error("Downloading {0}")]
    DownloadStarted(String),
    #[error("Downloaded {0}")]
    DownloadComplete(String),
    #[error("Failed to download {0}: {1}")]
    DownloadError(String, String),
    #[error("Failed to write model cache {0}: {1}")]
    CacheWriteError(String, String),
    #[error("Invalid processor configuration: {0}")]
    ProcessorConfigError(String),
    #[error("Failed to create inference session: {0}")]
    SessionError(String),
    #[error("Model and processor loaded")]
    Loaded,
    #[error("Model loading failed: {0}")]
    LoadFailed(String),
    #[error("Inference failed: {0}")]
    InferenceError(String),
    #[error("Unexpected model output: {0}")]
    UnexpectedOutput(String),
}

impl From<ModelEntry> for String {
    #[inline(always)]
    fn from(value: ModelEntry) -> Self {
        value.to_string()
    }
}
