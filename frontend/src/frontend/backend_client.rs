use crate::frontend::error::BackendError;
use crate::utils::config::Config;
use crate::utils::logging::*;
use common::detection::response::{BatchResponse, DetectionResponse};
use common::detection::status::{ErrorDetail, HealthStatus};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;

const THRESHOLD_FIELD: &str = "confidence_threshold";

#[derive(Debug, Clone, Copy)]
pub struct Timeouts {
    pub health: Duration,
    pub detect: Duration,
    pub batch: Duration,
}

#[derive(Debug, Clone)]
pub struct ForwardFile {
    pub filename: String,
    pub content_type: String,
    pub data: Vec<u8>,
}

impl ForwardFile {
    fn into_part(self) -> Result<Part, BackendError> {
        Part::bytes(self.data)
            .file_name(self.filename)
            .mime_str(&self.content_type)
            .map_err(|err| BackendError::Other(err.to_string()))
    }
}

pub struct BackendClient {
    client: Client,
    base_url: String,
    timeouts: Timeouts,
}

impl BackendClient {
    pub fn new(base_url: &str, timeouts: Timeouts) -> Result<Self, NetworkEntry> {
        let client = Client::builder().build().map_err(|err| NetworkEntry::ClientBuildError(err.to_string()))?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            timeouts,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, NetworkEntry> {
        let timeouts = Timeouts {
            health: Duration::from_secs(config.health_check_timeout),
            detect: Duration::from_secs(config.detect_timeout),
            batch: Duration::from_secs(config.batch_detect_timeout),
        };
        Self::new(&config.backend_url, timeouts)
    }

    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    pub async fn health(&self) -> Result<HealthStatus, BackendError> {
        let response = self.client.get(self.endpoint("health")).timeout(self.timeouts.health).send().await?;
        Self::decode(response).await
    }

    /// Only a 200 from `/health` counts as available.
    pub async fn is_available(&self) -> bool {
        match self.health().await {
            Ok(_) => true,
            Err(err) => {
                logging_debug!(NetworkEntry::BackendUnavailable(self.endpoint("health")), err.to_string());
                false
            }
        }
    }

    pub async fn detect(&self, file: ForwardFile, threshold: f32) -> Result<DetectionResponse, BackendError> {
        let form = Form::new()
            .part("file", file.into_part()?)
            .text(THRESHOLD_FIELD, threshold.to_string());
        let response = self
            .client
            .post(self.endpoint("detect"))
            .query(&[(THRESHOLD_FIELD, threshold)])
            .multipart(form)
            .timeout(self.timeouts.detect)
            .send()
            .await?;
        Self::decode(response).await
    }

    pub async fn detect_batch(&self, files: Vec<ForwardFile>, threshold: f32) -> Result<BatchResponse, BackendError> {
        let mut form = Form::new().text(THRESHOLD_FIELD, threshold.to_string());
        for file in files {
            form = form.part("files", file.into_part()?);
        }
        let response = self
            .client
            .post(self.endpoint("detect-batch"))
            .query(&[(THRESHOLD_FIELD, threshold)])
            .multipart(form)
            .timeout(self.timeouts.batch)
            .send()
            .await?;
        Self::decode(response).await
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, BackendError> {
        let status = response.status();
        if status.is_success() {
            return response.json::<T>().await.map_err(|err| BackendError::Other(NetworkEntry::InvalidResponseBody(err.to_string()).to_string()));
        }
        let detail = response
            .json::<ErrorDetail>()
            .await
            .map(|error| error.detail)
            .unwrap_or_else(|_| "Unknown error".to_string());
        Err(BackendError::Status {
            code: status.as_u16(),
            detail,
        })
    }
}
