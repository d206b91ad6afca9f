use std::sync::Arc;
use chrono::Utc;
use tracing::{info, warn};
use plaza_catalog::{BannerRecord, CatalogError, CatalogProvider, EpochMillis, ValidationError};
use crate::engine::select_eligible_banners;
use crate::targeting::TargetingContext;

#[derive(Debug, thiserror::Error)]
pub enum PromoError {
    #[error("Failed to load banner catalog: {0}")]
    Catalog(#[from] CatalogError),

    #[error("Invalid banner catalog: {0}")]
    Validation(#[from] ValidationError),
}

/// Resolves a catalog snapshot and runs the eligibility engine over it.
///
/// Nothing is kept between calls; callers that want caching cache the result.
#[derive(Clone)]
pub struct BannerService {
    provider: Arc<dyn CatalogProvider>,
}

impl BannerService {
    pub fn new(provider: Arc<dyn CatalogProvider>) -> Self {
        Self { provider }
    }

    /// Banners eligible at `now`, in display order
    pub async fn banners_at(
        &self,
        context: &TargetingContext,
        now: EpochMillis,
    ) -> Result<Vec<BannerRecord>, PromoError> {
        let catalog = self.provider.snapshot().await?;

        let selected = select_eligible_banners(context, &catalog, now).map_err(|e| {
            warn!(error = %e, "rejecting banner catalog");
            e
        })?;

        info!(
            region = context.region.as_deref(),
            language = context.language.as_deref(),
            category = context.category.as_deref(),
            count = selected.len(),
            "selected banners"
        );

        Ok(selected.into_iter().cloned().collect())
    }

    /// Banners eligible at the current wall-clock time
    pub async fn banners_now(&self, context: &TargetingContext) -> Result<Vec<BannerRecord>, PromoError> {
        self.banners_at(context, Utc::now().timestamp_millis()).await
    }
}
