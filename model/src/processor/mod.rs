use crate::detector::Prediction;
use common::utils::log_entry::model::ModelEntry;
use image::RgbImage;
use ndarray::ArrayView3;
use std::path::Path;

pub mod config;
pub mod postprocess;
pub mod preprocess;

pub use config::ProcessorConfig;
pub use preprocess::PreparedInput;

#[derive(Debug, Clone)]
pub struct DetrProcessor {
    config: ProcessorConfig,
    threshold: f32,
}

impl DetrProcessor {
    pub fn new(config: ProcessorConfig, threshold: f32) -> Self {
        Self { config, threshold }
    }

    pub async fn from_file(path: &Path, threshold: f32) -> Result<Self, ModelEntry> {
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|err| ModelEntry::ProcessorConfigError(format!("{}: {}", path.display(), err)))?;
        let config = ProcessorConfig::parse(&content)?;
        Ok(Self::new(config, threshold))
    }

    pub fn config(&self) -> &ProcessorConfig {
        &self.config
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    pub fn preprocess(&self, image: &RgbImage) -> PreparedInput {
        preprocess::prepare(&self.config, image)
    }

    pub fn postprocess(&self, logits: ArrayView3<f32>, boxes: ArrayView3<f32>, image_width: u32, image_height: u32) -> Result<Vec<Prediction>, ModelEntry> {
        postprocess::decode(logits, boxes, image_width, image_height, self.threshold)
    }
}
