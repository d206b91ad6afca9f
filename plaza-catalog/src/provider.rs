use async_trait::async_trait;
use serde_json::Value;
use crate::banner::{parse_documents, BannerRecord, ValidationError};

/// Catalog-related errors
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Catalog unavailable: {0}")]
    Io(#[from] std::io::Error),

    #[error("Catalog is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// Source of banner records, usually backed by a document store.
///
/// Every call returns a fresh read-only snapshot in catalog order.
#[async_trait]
pub trait CatalogProvider: Send + Sync {
    async fn snapshot(&self) -> Result<Vec<BannerRecord>, CatalogError>;
}

/// In-memory catalog, for tests and fixed promotional sets
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    banners: Vec<BannerRecord>,
}

impl InMemoryCatalog {
    pub fn new(banners: Vec<BannerRecord>) -> Self {
        Self { banners }
    }

    /// Build from raw documents, rejecting the whole set on the first bad record
    pub fn from_documents(docs: &[Value]) -> Result<Self, ValidationError> {
        Ok(Self::new(parse_documents(docs)?))
    }

    pub fn len(&self) -> usize {
        self.banners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.banners.is_empty()
    }
}

#[async_trait]
impl CatalogProvider for InMemoryCatalog {
    async fn snapshot(&self) -> Result<Vec<BannerRecord>, CatalogError> {
        Ok(self.banners.clone())
    }
}
