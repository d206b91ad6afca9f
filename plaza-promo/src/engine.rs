use serde_json::Value;
use tracing::{debug, trace};
use plaza_catalog::{parse_documents, BannerRecord, EpochMillis, ValidationError};
use crate::rules::evaluate;
use crate::targeting::TargetingContext;

/// Select the banners that may be shown right now, in display order.
///
/// The whole catalog is validated before anything is filtered; one bad record
/// fails the call. Survivors are ordered by `order` ascending (absent counts as
/// 0) and banners with equal `order` keep their catalog positions.
///
/// No clock is read and nothing is cached: the same arguments always give the
/// same result.
pub fn select_eligible_banners<'a>(
    context: &TargetingContext,
    catalog: &'a [BannerRecord],
    now: EpochMillis,
) -> Result<Vec<&'a BannerRecord>, ValidationError> {
    for banner in catalog {
        banner.validate()?;
    }

    let mut eligible: Vec<&BannerRecord> = catalog
        .iter()
        .filter(|banner| match evaluate(banner, context, now) {
            Ok(()) => true,
            Err(rejection) => {
                trace!(banner_id = %banner.id, ?rejection, "banner excluded");
                false
            }
        })
        .collect();

    // sort_by is stable, so catalog order breaks ties
    eligible.sort_by(|a, b| a.order_rank().total_cmp(&b.order_rank()));

    debug!(
        catalog_size = catalog.len(),
        eligible = eligible.len(),
        now,
        ?context,
        "banner selection complete"
    );

    Ok(eligible)
}

/// Same as [`select_eligible_banners`], over raw document-store records.
pub fn select_from_documents(
    context: &TargetingContext,
    docs: &[Value],
    now: EpochMillis,
) -> Result<Vec<BannerRecord>, ValidationError> {
    let catalog = parse_documents(docs)?;
    let selected = select_eligible_banners(context, &catalog, now)?;
    Ok(selected.into_iter().cloned().collect())
}
