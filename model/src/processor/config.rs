use common::utils::log_entry::model::ModelEntry;
use serde::Deserialize;

#[derive(Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(untagged)]
pub enum SizeConfig {
    Edges { shortest_edge: u32, longest_edge: Option<u32> },
    Shortest(u32),
}

/// Subset of a `preprocessor_config.json` used by DETR image processors.
/// Missing keys keep the DETR defaults.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ProcessorConfig {
    pub do_resize: bool,
    pub do_rescale: bool,
    pub do_normalize: bool,
    pub rescale_factor: f32,
    pub image_mean: [f32; 3],
    pub image_std: [f32; 3],
    pub size: SizeConfig,
    pub max_size: Option<u32>,
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        Self {
            do_resize: true,
            do_rescale: true,
            do_normalize: true,
            rescale_factor: 1.0 / 255.0,
            image_mean: [0.485, 0.456, 0.406],
            image_std: [0.229, 0.224, 0.225],
            size: SizeConfig::Edges {
                shortest_edge: 800,
                longest_edge: Some(1333),
            },
            max_size: None,
        }
    }
}

impl ProcessorConfig {
    pub fn parse(content: &str) -> Result<Self, ModelEntry> {
        let config: ProcessorConfig = serde_json::from_str(content).map_err(|err| ModelEntry::ProcessorConfigError(err.to_string()))?;
        if config.image_std.iter().any(|std| *std <= 0.0) {
            return Err(ModelEntry::ProcessorConfigError("image_std must be positive".to_string()));
        }
        if config.shortest_edge() == 0 {
            return Err(ModelEntry::ProcessorConfigError("size must be positive".to_string()));
        }
        Ok(config)
    }

    pub fn shortest_edge(&self) -> u32 {
        match self.size {
            SizeConfig::Edges { shortest_edge, .. } => shortest_edge,
            SizeConfig::Shortest(size) => size,
        }
    }

    pub fn longest_edge(&self) -> Option<u32> {
        match self.size {
            SizeConfig::Edges { longest_edge, .. } => longest_edge.or(self.max_size),
            SizeConfig::Shortest(_) => self.max_size,
        }
    }
}
