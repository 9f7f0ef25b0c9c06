pub mod config;
pub mod detector;
pub mod processor;
pub mod provider;
pub mod state;

pub use crate::config::ModelConfig;
pub use crate::detector::{Detector, OnnxDetector, Prediction};
pub use crate::processor::DetrProcessor;
pub use crate::provider::{LoadedModel, ModelProvider};
pub use crate::state::ModelState;
