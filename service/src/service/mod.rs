pub mod detection;
pub mod error;
pub mod model_loader;
pub mod service;
