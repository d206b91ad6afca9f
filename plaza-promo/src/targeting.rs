use serde::{Deserialize, Serialize};
use plaza_catalog::Dimension;

/// Request-time filter for one banner lookup.
///
/// A field left as `None` means "do not filter on this dimension".
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TargetingContext {
    pub region: Option<String>,
    pub language: Option<String>,
    pub category: Option<String>,
}

impl TargetingContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Requested value on `dimension`, if the caller filters on it
    pub fn value(&self, dimension: Dimension) -> Option<&str> {
        match dimension {
            Dimension::Region => self.region.as_deref(),
            Dimension::Language => self.language.as_deref(),
            Dimension::Category => self.category.as_deref(),
        }
    }
}
