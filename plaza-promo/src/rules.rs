use plaza_catalog::{BannerRecord, Dimension, EpochMillis};
use crate::targeting::TargetingContext;

/// Why a banner was left out of a result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    Inactive,
    NotStarted { start_at: EpochMillis },
    Ended { end_at: EpochMillis },
    Untargeted { dimension: Dimension },
}

/// Check one banner against the clock and the request context.
///
/// Checks run in a fixed order (active flag, start, end, then region, language,
/// category) and the first failure is reported. Both schedule bounds are
/// inclusive.
pub fn evaluate(banner: &BannerRecord, context: &TargetingContext, now: EpochMillis) -> Result<(), Rejection> {
    if !banner.active {
        return Err(Rejection::Inactive);
    }

    if let Some(start_at) = banner.start_at {
        if now < start_at {
            return Err(Rejection::NotStarted { start_at });
        }
    }

    if let Some(end_at) = banner.end_at {
        if now > end_at {
            return Err(Rejection::Ended { end_at });
        }
    }

    for dimension in Dimension::ALL {
        if !matches_dimension(banner, context, dimension) {
            return Err(Rejection::Untargeted { dimension });
        }
    }

    Ok(())
}

pub fn is_eligible(banner: &BannerRecord, context: &TargetingContext, now: EpochMillis) -> bool {
    evaluate(banner, context, now).is_ok()
}

// An unset request value or an unset/empty restriction both pass.
fn matches_dimension(banner: &BannerRecord, context: &TargetingContext, dimension: Dimension) -> bool {
    let Some(wanted) = context.value(dimension) else {
        return true;
    };

    match banner.restriction(dimension) {
        Some(allowed) if !allowed.is_empty() => allowed.iter().any(|code| code == wanted),
        _ => true,
    }
}
