use thiserror::Error;

#[derive(Error, Debug)]
pub enum DetectionEntry {
    #[error("Detection request rejected: {0}")]
    RequestRejected(String),
    #[error("Error processing image: {0}")]
    ProcessingError(String),
    #[error("Batch item {0} failed: {1}")]
    BatchItemError(String, String),
    #[error("Processed {0} with {1} detections")]
    Processed(String, usize),
    #[error("Processed batch of {0} images, {1} failed")]
    BatchProcessed(usize, usize),
}

impl From<DetectionEntry> for String {
    #[inline(always)]
    fn from(value: DetectionEntry) -> Self {
        value.to_string()
    }
}
