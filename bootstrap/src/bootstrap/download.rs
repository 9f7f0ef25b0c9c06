use crate::utils::logging::*;
use model::{ModelConfig, ModelProvider};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq)]
pub struct CachedFile {
    pub path: PathBuf,
    pub size: u64,
}

pub async fn download(config: ModelConfig, force: bool) -> Result<Vec<CachedFile>, ModelEntry> {
    let provider = ModelProvider::new(config)?;
    if provider.is_cached() && !force {
        logging_information!(ModelEntry::LoadFromCache(provider.cache_root().display().to_string()));
    }
    provider.fetch(force).await?;
    Ok(cached_files(&provider.cache_root()))
}

pub fn cached_files(root: &Path) -> Vec<CachedFile> {
    let mut files = Vec::new();
    let mut pending = vec![root.to_path_buf()];
    while let Some(directory) = pending.pop() {
        let Ok(entries) = fs::read_dir(&directory) else {
            continue;
        };
        for entry in entries.flatten() {
            let path = entry.path();
            let Ok(metadata) = entry.metadata() else {
                continue;
            };
            if metadata.is_dir() {
                pending.push(path);
            } else if path.extension().is_none_or(|extension| extension != "part") {
                files.push(CachedFile { path, size: metadata.len() });
            }
        }
    }
    files.sort_by(|left, right| left.path.cmp(&right.path));
    files
}

pub fn format_size(bytes: u64) -> String {
    format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
}
