use crate::config::ModelConfig;
use crate::detector::OnnxDetector;
use crate::processor::DetrProcessor;
use common::utils::log_entry::model::ModelEntry;
use common::utils::logging::*;
use reqwest::Client;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::fs;
use tokio::io::AsyncWriteExt;

pub struct LoadedModel {
    pub processor: Arc<DetrProcessor>,
    pub detector: Arc<OnnxDetector>,
}

pub struct ModelProvider {
    config: ModelConfig,
    client: Client,
}

impl ModelProvider {
    pub fn new(config: ModelConfig) -> Result<Self, ModelEntry> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.download_timeout))
            .build()
            .map_err(|err| ModelEntry::DownloadError(config.repository.clone(), err.to_string()))?;
        Ok(Self { config, client })
    }

    pub fn config(&self) -> &ModelConfig {
        &self.config
    }

    pub fn cache_root(&self) -> PathBuf {
        Path::new(&self.config.cache_dir).join(self.config.repository.replace('/', "--"))
    }

    pub fn model_path(&self) -> PathBuf {
        self.cache_root().join(&self.config.model_file)
    }

    pub fn processor_path(&self) -> PathBuf {
        self.cache_root().join(&self.config.processor_file)
    }

    pub fn file_url(&self, file: &str) -> String {
        format!(
            "{}/{}/resolve/{}/{}",
            self.config.hub_endpoint.trim_end_matches('/'),
            self.config.repository,
            self.config.revision,
            file
        )
    }

    pub fn is_cached(&self) -> bool {
        self.model_path().is_file() && self.processor_path().is_file()
    }

    pub async fn fetch(&self, force: bool) -> Result<Vec<PathBuf>, ModelEntry> {
        let files = [
            (self.config.processor_file.clone(), self.processor_path()),
            (self.config.model_file.clone(), self.model_path()),
        ];
        let mut fetched = Vec::new();
        for (file, destination) in files {
            if force || !destination.is_file() {
                self.download(&file, &destination).await?;
            }
            fetched.push(destination);
        }
        Ok(fetched)
    }

    async fn download(&self, file: &str, destination: &Path) -> Result<(), ModelEntry> {
        let url = self.file_url(file);
        logging_information!(ModelEntry::DownloadStarted(url.clone()));
        let download_error = |err: reqwest::Error| ModelEntry::DownloadError(url.clone(), err.to_string());
        let write_error = |err: std::io::Error| ModelEntry::CacheWriteError(destination.display().to_string(), err.to_string());

        let mut response = self
            .client
            .get(&url)
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(download_error)?;

        if let Some(parent) = destination.parent() {
            fs::create_dir_all(parent).await.map_err(write_error)?;
        }
        let partial = PathBuf::from(format!("{}.part", destination.display()));
        let mut output = fs::File::create(&partial).await.map_err(write_error)?;
        while let Some(chunk) = response.chunk().await.map_err(download_error)? {
            output.write_all(&chunk).await.map_err(write_error)?;
        }
        output.flush().await.map_err(write_error)?;
        drop(output);
        fs::rename(&partial, destination).await.map_err(write_error)?;

        logging_information!(ModelEntry::DownloadComplete(destination.display().to_string()));
        Ok(())
    }

    /// Loads from the cache first. An unusable cache is reported and replaced
    /// by a fresh download before giving up.
    pub async fn load(&self) -> Result<LoadedModel, ModelEntry> {
        if self.is_cached() {
            logging_information!(ModelEntry::LoadFromCache(self.cache_root().display().to_string()));
            match self.load_from_disk().await {
                Ok(model) => return Ok(model),
                Err(err) => logging_warning!(ModelEntry::CacheUnusable(err.to_string())),
            }
            self.fetch(true).await?;
        } else {
            logging_information!(ModelEntry::CacheMiss);
            self.fetch(false).await?;
        }
        self.load_from_disk().await
    }

    async fn load_from_disk(&self) -> Result<LoadedModel, ModelEntry> {
        let processor = Arc::new(DetrProcessor::from_file(&self.processor_path(), self.config.postprocess_threshold).await?);
        let model_path = self.model_path();
        let config = self.config.clone();
        let session_processor = processor.clone();
        let detector = tokio::task::spawn_blocking(move || OnnxDetector::new(&model_path, session_processor, &config))
            .await
            .map_err(|err| ModelEntry::SessionError(err.to_string()))??;
        logging_information!(ModelEntry::Loaded);
        Ok(LoadedModel {
            processor,
            detector: Arc::new(detector),
        })
    }
}
