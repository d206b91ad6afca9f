pub mod banner;
pub mod provider;

pub use banner::{parse_documents, BannerRecord, Dimension, EpochMillis, ValidationError};
pub use provider::{CatalogError, CatalogProvider, InMemoryCatalog};
