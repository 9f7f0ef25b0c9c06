use crate::utils::logging::*;
use model::ModelConfig;
use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Deserialize)]
struct ConfigTable {
    #[serde(rename = "Config")]
    config: ModelTable,
}

#[derive(Debug, Deserialize)]
struct ModelTable {
    #[serde(rename = "Model")]
    model: ModelConfig,
}

pub fn parse_model_config(toml_string: &str) -> Result<ModelConfig, SystemEntry> {
    let config_table = toml::from_str::<ConfigTable>(toml_string).map_err(|err| SystemEntry::ConfigParseError(err.to_string()))?;
    let config = config_table.config.model;
    if !ModelConfig::validate(&config) {
        return Err(SystemEntry::InvalidConfig);
    }
    Ok(config)
}

/// Falls back to the built-in model settings when the file does not exist.
pub async fn load_model_config(path: &Path) -> Result<ModelConfig, SystemEntry> {
    match fs::read_to_string(path) {
        Ok(toml_string) => parse_model_config(&toml_string),
        Err(err) => {
            logging_notice!(SystemEntry::ConfigNotFound, format!("{}: {err}, using default model settings", path.display()));
            Ok(ModelConfig::default())
        }
    }
}
