use crate::detector::Detector;
use crate::processor::DetrProcessor;
use crate::provider::LoadedModel;
use std::sync::{Arc, OnceLock};

#[derive(Default)]
pub struct ModelState {
    processor: OnceLock<Arc<DetrProcessor>>,
    detector: OnceLock<Arc<dyn Detector>>,
}

impl ModelState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn install(&self, model: LoadedModel) -> bool {
        let processor = self.install_processor(model.processor);
        let detector = self.install_detector(model.detector);
        processor && detector
    }

    pub fn install_processor(&self, processor: Arc<DetrProcessor>) -> bool {
        self.processor.set(processor).is_ok()
    }

    pub fn install_detector(&self, detector: Arc<dyn Detector>) -> bool {
        self.detector.set(detector).is_ok()
    }

    pub fn detector(&self) -> Option<Arc<dyn Detector>> {
        self.detector.get().cloned()
    }

    pub fn processor(&self) -> Option<Arc<DetrProcessor>> {
        self.processor.get().cloned()
    }

    pub fn model_loaded(&self) -> bool {
        self.detector.get().is_some()
    }

    pub fn processor_loaded(&self) -> bool {
        self.processor.get().is_some()
    }

    pub fn is_ready(&self) -> bool {
        self.model_loaded() && self.processor_loaded()
    }
}
