use crate::config::ModelConfig;
use crate::processor::DetrProcessor;
use common::detection::bounding_box::BoundingBox;
use common::utils::log_entry::model::ModelEntry;
use image::RgbImage;
use ndarray::Ix3;
use ort::execution_providers::{CPUExecutionProvider, CUDAExecutionProvider};
use ort::session::Session;
use ort::session::builder::GraphOptimizationLevel;
use std::path::Path;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prediction {
    pub label: usize,
    pub score: f32,
    pub bbox: BoundingBox,
}

pub trait Detector: Send + Sync {
    /// Runs the model on an RGB image. Boxes are in pixels of `image`.
    fn infer(&self, image: &RgbImage) -> Result<Vec<Prediction>, ModelEntry>;
}

pub struct OnnxDetector {
    session: Session,
    processor: Arc<DetrProcessor>,
    with_mask: bool,
}

impl OnnxDetector {
    pub fn new(model_path: &Path, processor: Arc<DetrProcessor>, config: &ModelConfig) -> Result<Self, ModelEntry> {
        let provider = if config.use_cuda {
            CUDAExecutionProvider::default().build().error_on_failure()
        } else {
            CPUExecutionProvider::default().build()
        };
        let session = Session::builder()
            .and_then(|builder| builder.with_execution_providers([provider]))
            .and_then(|builder| builder.with_optimization_level(GraphOptimizationLevel::Level3))
            .and_then(|builder| builder.with_intra_threads(config.intra_threads))
            .and_then(|builder| builder.commit_from_file(model_path))
            .map_err(|err| ModelEntry::SessionError(err.to_string()))?;
        if !session.inputs.iter().any(|input| input.name == "pixel_values") {
            return Err(ModelEntry::SessionError("model has no pixel_values input".to_string()));
        }
        let with_mask = session.inputs.iter().any(|input| input.name == "pixel_mask");
        Ok(Self { session, processor, with_mask })
    }
}

impl Detector for OnnxDetector {
    fn infer(&self, image: &RgbImage) -> Result<Vec<Prediction>, ModelEntry> {
        let prepared = self.processor.preprocess(image);
        let inputs = if self.with_mask {
            ort::inputs![
                "pixel_values" => prepared.pixel_values.view(),
                "pixel_mask" => prepared.pixel_mask.view()
            ]
        } else {
            ort::inputs!["pixel_values" => prepared.pixel_values.view()]
        }
        .map_err(|err| ModelEntry::InferenceError(err.to_string()))?;
        let outputs = self.session.run(inputs).map_err(|err| ModelEntry::InferenceError(err.to_string()))?;

        let logits = outputs
            .get("logits")
            .ok_or_else(|| ModelEntry::UnexpectedOutput("missing logits".to_string()))?
            .try_extract_tensor::<f32>()
            .map_err(|err| ModelEntry::UnexpectedOutput(err.to_string()))?
            .into_dimensionality::<Ix3>()
            .map_err(|err| ModelEntry::UnexpectedOutput(err.to_string()))?;
        let boxes = outputs
            .get("pred_boxes")
            .ok_or_else(|| ModelEntry::UnexpectedOutput("missing pred_boxes".to_string()))?
            .try_extract_tensor::<f32>()
            .map_err(|err| ModelEntry::UnexpectedOutput(err.to_string()))?
            .into_dimensionality::<Ix3>()
            .map_err(|err| ModelEntry::UnexpectedOutput(err.to_string()))?;

        self.processor.postprocess(logits, boxes, image.width(), image.height())
    }
}
