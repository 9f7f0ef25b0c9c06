use crate::utils::logging::*;
use model::{ModelConfig, ModelProvider, ModelState};
use std::sync::Arc;
use tokio::task::JoinHandle;

pub struct ModelLoader;

impl ModelLoader {
    pub fn spawn(state: Arc<ModelState>, config: ModelConfig) -> JoinHandle<()> {
        tokio::spawn(async move {
            if let Err(entry) = Self::load(&state, config).await {
                logging_emergency!(ModelEntry::LoadFailed(entry.to_string()));
            }
        })
    }

    async fn load(state: &ModelState, config: ModelConfig) -> Result<(), ModelEntry> {
        let provider = ModelProvider::new(config)?;
        let model = provider.load().await?;
        if !state.install(model) {
            logging_warning!(ModelEntry::LoadFailed("model already installed".to_string()));
        }
        Ok(())
    }
}
