use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct HealthStatus {
    pub status: String,
    pub model_loaded: bool,
    pub processor_loaded: bool,
}

impl HealthStatus {
    pub fn new(model_loaded: bool, processor_loaded: bool) -> Self {
        Self {
            status: "healthy".to_string(),
            model_loaded,
            processor_loaded,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ServiceBanner {
    pub message: String,
    pub status: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct FrontendStatus {
    pub backend_available: bool,
    pub frontend_status: String,
}

impl FrontendStatus {
    pub fn new(backend_available: bool) -> Self {
        Self {
            backend_available,
            frontend_status: "running".to_string(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ErrorDetail {
    pub detail: String,
}

impl ErrorDetail {
    pub fn new<T: Into<String>>(detail: T) -> Self {
        Self { detail: detail.into() }
    }
}
