use crate::utils::logging::*;
use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use tokio::sync::RwLock;
use url::Url;

const CONFIG_PATH: &str = "./frontend.toml";
const BACKEND_URL_VARIABLE: &str = "BACKEND_URL";

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
    pub backend_url: String, //url
    pub upload_folder: String, //path
    pub keep_uploads: bool,
    pub allowed_extensions: Vec<String>, //lowercase, without dot
    pub max_upload_size: usize, //bytes
    pub default_confidence_threshold: f32, //0..1
    pub health_check_timeout: u64, //seconds
    pub detect_timeout: u64, //seconds
    pub batch_detect_timeout: u64, //seconds
    pub allowed_origins: Vec<String>, //origins, "*" for any
}

impl Config {
    pub fn new() -> Self {
        //Seriously, the program must be terminated.
        match fs::read_to_string(CONFIG_PATH) {
            Ok(toml_string) => match Self::parse(&toml_string, env::var(BACKEND_URL_VARIABLE).ok()) {
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

    pub fn parse(toml_string: &str, backend_url: Option<String>) -> Result<Config, SystemEntry> {
        let config_table = toml::from_str::<ConfigTable>(toml_string).map_err(|err| SystemEntry::ConfigParseError(err.to_string()))?;
        let mut config = config_table.config;
        if let Some(backend_url) = backend_url.filter(|backend_url| !backend_url.trim().is_empty()) {
            config.backend_url = backend_url.trim().to_string();
        }
        config.allowed_extensions = config.allowed_extensions.iter().map(|extension| extension.trim_start_matches('.').to_lowercase()).collect();
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
            && Self::validate_url(&config.backend_url)
            && !config.upload_folder.trim().is_empty()
            && !config.allowed_extensions.is_empty()
            && config.max_upload_size > 0
            && config.default_confidence_threshold.is_finite()
            && (0.0..=1.0).contains(&config.default_confidence_threshold)
            && Self::validate_second(config.bind_retry_duration)
            && Self::validate_timeout(config.health_check_timeout)
            && Self::validate_timeout(config.detect_timeout)
            && Self::validate_timeout(config.batch_detect_timeout)
            && !config.allowed_origins.is_empty()
    }

    pub fn allowed_file(&self, filename: &str) -> bool {
        filename
            .rsplit_once('.')
            .is_some_and(|(_, extension)| self.allowed_extensions.contains(&extension.to_lowercase()))
    }

    fn validate_url(url: &str) -> bool {
        Url::parse(url).is_ok_and(|url| matches!(url.scheme(), "http" | "https") && url.host().is_some())
    }

    fn validate_second(second: u64) -> bool {
        second <= 3600
    }

    fn validate_timeout(second: u64) -> bool {
        second > 0 && second <= 3600
    }
}
