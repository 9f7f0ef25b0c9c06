use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ModelConfig {
    pub repository: String, //hub repository id
    pub revision: String, //branch, tag or commit
    pub model_file: String, //path inside the repository
    pub processor_file: String, //path inside the repository
    pub cache_dir: String, //path
    pub hub_endpoint: String, //url
    pub postprocess_threshold: f32, //0..1
    pub use_cuda: bool,
    pub intra_threads: usize, //threads
    pub download_timeout: u64, //seconds
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            repository: "Xenova/detr-resnet-50".to_string(),
            revision: "main".to_string(),
            model_file: "onnx/model.onnx".to_string(),
            processor_file: "preprocessor_config.json".to_string(),
            cache_dir: "./models".to_string(),
            hub_endpoint: "https://huggingface.co".to_string(),
            postprocess_threshold: 0.5,
            use_cuda: false,
            intra_threads: 4,
            download_timeout: 600,
        }
    }
}

impl ModelConfig {
    pub fn validate(config: &ModelConfig) -> bool {
        !config.repository.trim().is_empty()
            && !config.model_file.trim().is_empty()
            && !config.processor_file.trim().is_empty()
            && !config.cache_dir.trim().is_empty()
            && (config.hub_endpoint.starts_with("http://") || config.hub_endpoint.starts_with("https://"))
            && (0.0..1.0).contains(&config.postprocess_threshold)
            && config.intra_threads > 0
            && config.download_timeout <= 86400
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_configuration_is_valid() {
        assert!(ModelConfig::validate(&ModelConfig::default()));
    }

    #[test]
    fn rejects_non_http_endpoint() {
        let config = ModelConfig {
            hub_endpoint: "ftp://mirror".to_string(),
            ..ModelConfig::default()
        };
        assert!(!ModelConfig::validate(&config));
    }

    #[test]
    fn rejects_threshold_outside_unit_interval() {
        let config = ModelConfig {
            postprocess_threshold: 1.5,
            ..ModelConfig::default()
        };
        assert!(!ModelConfig::validate(&config));
    }
}
