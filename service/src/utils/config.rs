use crate::utils::logging::*;
use lazy_static::lazy_static;
use model::ModelConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use tokio::sync::RwLock;

const CONFIG_PATH: &str = "./service.toml";

lazy_static! {
    static ref CONFIG: RwLock<Config> = RwLock::new(Config::new());
}

#[derive(Debug, Deserialize)]
struct ConfigTable {
    #[serde(rename = "Config")]
    config: Config,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Config {
    pub bind_address: String, //ip
    pub http_server_bind_port: u16, //port
    pub bind_retry_duration: u64, //seconds
    pub default_confidence_threshold: f32, //0..1
    pub max_upload_size: usize, //bytes
    pub allowed_origins: Vec<String>, //origins, "*" for any
    pub log_capacity: usize, //entries
    #[serde(rename = "Model")]
    pub model: ModelConfig,
}

impl Config {
    pub fn new() -> Self {
        //Seriously, the program must be terminated.
        match fs::read_to_string(CONFIG_PATH) {
            Ok(toml_string) => match Self::parse(&toml_string) {
                Ok(config) => config,
                Err(entry) => {
                    logging_console!(emergency_entry!(entry.to_string()));
                    panic!("{}", entry);
                }
            },
            Err(err) => {
                logging_console!(emergency_entry!(SystemEntry::ConfigNotFound, format!("Err: {err}")));
                panic!("{}", SystemEntry::ConfigNotFound);
            }
        }
    }

    pub fn parse(toml_string: &str) -> Result<Config, SystemEntry> {
        let config_table = toml::from_str::<ConfigTable>(toml_string).map_err(|err| SystemEntry::ConfigParseError(err.to_string()))?;
        let config = config_table.config;
        if !Self::validate(&config) {
            return Err(SystemEntry::InvalidConfig);
        }
        Ok(config)
    }

    pub async fn now() -> Config {
        CONFIG.read().await.clone()
    }

    pub fn validate(config: &Config) -> bool {
        !config.bind_address.trim().is_empty()
            && Self::validate_second(config.bind_retry_duration)
            && Self::validate_threshold(config.default_confidence_threshold)
            && config.max_upload_size > 0
            && !config.allowed_origins.is_empty()
            && config.log_capacity > 0
            && ModelConfig::validate(&config.model)
    }

    fn validate_second(second: u64) -> bool {
        second <= 3600
    }

    fn validate_threshold(threshold: f32) -> bool {
        threshold.is_finite() && (0.0..=1.0).contains(&threshold)
    }
}
