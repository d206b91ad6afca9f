use async_trait::async_trait;
use serde_json::Value;
use std::path::{Path, PathBuf};
use plaza_catalog::{parse_documents, BannerRecord, CatalogError, CatalogProvider};
use crate::app_config::CatalogConfig;

/// Catalog backed by a JSON file holding an array of banner documents.
///
/// The file is re-read on every snapshot so edits show up without a restart.
#[derive(Debug, Clone)]
pub struct FileCatalog {
    path: PathBuf,
}

impl FileCatalog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn from_config(config: &CatalogConfig) -> Self {
        Self::new(config.path.clone())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl CatalogProvider for FileCatalog {
    async fn snapshot(&self) -> Result<Vec<BannerRecord>, CatalogError> {
        let content = tokio::fs::read_to_string(&self.path).await?;
        let docs: Vec<Value> = serde_json::from_str(&content)?;
        let banners = parse_documents(&docs)?;

        tracing::debug!(path = %self.path.display(), count = banners.len(), "loaded banner catalog");
        Ok(banners)
    }
}
