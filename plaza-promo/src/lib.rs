pub mod targeting;
pub mod rules;
pub mod engine;
pub mod service;

pub use plaza_catalog::{BannerRecord, Dimension, EpochMillis, ValidationError};
pub use targeting::TargetingContext;
pub use rules::{evaluate, is_eligible, Rejection};
pub use engine::{select_eligible_banners, select_from_documents};
pub use service::{BannerService, PromoError};
