use chrono::DateTime;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Instants are carried as milliseconds since the Unix epoch.
pub type EpochMillis = i64;

/// Targeting dimensions a banner can be restricted on
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Dimension {
    Region,
    Language,
    Category,
}

impl Dimension {
    pub const ALL: [Dimension; 3] = [Dimension::Region, Dimension::Language, Dimension::Category];

    /// Document key holding the restriction set for this dimension
    pub fn field(&self) -> &'static str {
        match self {
            Dimension::Region => "regions",
            Dimension::Language => "languages",
            Dimension::Category => "categories",
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Dimension::Region => "region",
            Dimension::Language => "language",
            Dimension::Category => "category",
        };
        f.write_str(name)
    }
}

/// A promotional banner as stored in the catalog.
///
/// Only scheduling and targeting fields are typed; image, link and any other
/// presentation keys ride along untouched in `payload`.
///
/// `from_document` is the ingestion path for store records. Deserializing
/// directly accepts the same timestamp formats but does not run `validate`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BannerRecord {
    pub id: String,
    #[serde(default)]
    pub active: bool,
    #[serde(default, deserialize_with = "deserialize_timestamp", skip_serializing_if = "Option::is_none")]
    pub start_at: Option<EpochMillis>,
    #[serde(default, deserialize_with = "deserialize_timestamp", skip_serializing_if = "Option::is_none")]
    pub end_at: Option<EpochMillis>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub regions: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub languages: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub categories: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<f64>,
    #[serde(flatten)]
    pub payload: Map<String, Value>,
}

/// Structural problems in a catalog record
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("Banner record is missing an id")]
    MissingId,

    #[error("Catalog entry {index} is not an object")]
    NotAnObject { index: usize },

    #[error("Banner {id}: invalid field '{field}': {reason}")]
    InvalidField { id: String, field: String, reason: String },

    #[error("Banner {id}: invalid order: {reason}")]
    InvalidOrder { id: String, reason: String },

    #[error("Banner {id}: invalid timestamp '{field}': {reason}")]
    InvalidTimestamp { id: String, field: String, reason: String },
}

const ID: &str = "id";
const ACTIVE: &str = "active";
const START_AT: &str = "startAt";
const END_AT: &str = "endAt";
const ORDER: &str = "order";

impl BannerRecord {
    /// Create an active banner with no schedule, no targeting and no payload
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            active: true,
            start_at: None,
            end_at: None,
            regions: None,
            languages: None,
            categories: None,
            order: None,
            payload: Map::new(),
        }
    }

    /// Ranking key; an absent order ranks as 0, not last.
    ///
    /// `-0.0` is folded into `0.0` so both rank as equal.
    pub fn order_rank(&self) -> f64 {
        self.order.unwrap_or(0.0) + 0.0
    }

    /// Restriction set on `dimension`, if one was given
    pub fn restriction(&self, dimension: Dimension) -> Option<&[String]> {
        match dimension {
            Dimension::Region => self.regions.as_deref(),
            Dimension::Language => self.languages.as_deref(),
            Dimension::Category => self.categories.as_deref(),
        }
    }

    /// Check the invariants the engine relies on.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.id.trim().is_empty() {
            return Err(ValidationError::MissingId);
        }

        if let Some(order) = self.order {
            if !order.is_finite() {
                return Err(ValidationError::InvalidOrder {
                    id: self.id.clone(),
                    reason: format!("{} is not a finite number", order),
                });
            }
        }

        if let Some(key) = self.payload.keys().find(|key| is_typed_field(key)) {
            return Err(ValidationError::InvalidField {
                id: self.id.clone(),
                field: key.clone(),
                reason: "typed field must not be repeated in the payload".to_string(),
            });
        }

        Ok(())
    }

    /// Convert one raw document-store record at position `index`.
    ///
    /// Nothing is coerced: a numeric string in `order` or a boolean in `startAt`
    /// is rejected rather than guessed at.
    pub fn from_document(index: usize, doc: &Value) -> Result<Self, ValidationError> {
        let obj = doc.as_object().ok_or(ValidationError::NotAnObject { index })?;

        let id = match obj.get(ID) {
            Some(Value::String(s)) if !s.trim().is_empty() => s.clone(),
            _ => return Err(ValidationError::MissingId),
        };

        let active = match obj.get(ACTIVE) {
            None | Some(Value::Null) => false,
            Some(Value::Bool(b)) => *b,
            Some(other) => {
                return Err(ValidationError::InvalidField {
                    id,
                    field: ACTIVE.to_string(),
                    reason: format!("expected a boolean, found {}", type_name(other)),
                })
            }
        };

        let order = match obj.get(ORDER) {
            None | Some(Value::Null) => None,
            Some(Value::Number(n)) => Some(n.as_f64().ok_or_else(|| ValidationError::InvalidOrder {
                id: id.clone(),
                reason: format!("{} is not representable", n),
            })?),
            Some(other) => {
                return Err(ValidationError::InvalidOrder {
                    id,
                    reason: format!("expected a number, found {}", type_name(other)),
                })
            }
        };

        let record = Self {
            start_at: parse_timestamp(&id, START_AT, obj.get(START_AT))?,
            end_at: parse_timestamp(&id, END_AT, obj.get(END_AT))?,
            regions: parse_restriction(&id, Dimension::Region, obj)?,
            languages: parse_restriction(&id, Dimension::Language, obj)?,
            categories: parse_restriction(&id, Dimension::Category, obj)?,
            payload: obj
                .iter()
                .filter(|(key, _)| !is_typed_field(key))
                .map(|(key, value)| (key.clone(), value.clone()))
                .collect(),
            id,
            active,
            order,
        };

        record.validate()?;
        Ok(record)
    }
}

/// Convert a whole snapshot, stopping at the first bad record.
pub fn parse_documents(docs: &[Value]) -> Result<Vec<BannerRecord>, ValidationError> {
    docs.iter()
        .enumerate()
        .map(|(index, doc)| BannerRecord::from_document(index, doc))
        .collect()
}

fn is_typed_field(key: &str) -> bool {
    matches!(key, ID | ACTIVE | START_AT | END_AT | ORDER)
        || Dimension::ALL.iter().any(|d| d.field() == key)
}

fn parse_timestamp(id: &str, field: &str, value: Option<&Value>) -> Result<Option<EpochMillis>, ValidationError> {
    let invalid = |reason: String| ValidationError::InvalidTimestamp {
        id: id.to_string(),
        field: field.to_string(),
        reason,
    };

    match value {
        None | Some(Value::Null) => Ok(None),
        Some(value) => timestamp_millis(value).map(Some).map_err(invalid),
    }
}

/// Epoch milliseconds from an integer or an RFC 3339 string
fn timestamp_millis(value: &Value) -> Result<EpochMillis, String> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .ok_or_else(|| format!("{} is not an integer of epoch milliseconds", n)),
        Value::String(s) => DateTime::parse_from_rfc3339(s)
            .map(|dt| dt.timestamp_millis())
            .map_err(|e| format!("'{}' is not RFC 3339: {}", s, e)),
        other => Err(format!("expected epoch millis or RFC 3339, found {}", type_name(other))),
    }
}

fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<Option<EpochMillis>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(value) => timestamp_millis(&value).map(Some).map_err(serde::de::Error::custom),
    }
}

fn parse_restriction(
    id: &str,
    dimension: Dimension,
    obj: &Map<String, Value>,
) -> Result<Option<Vec<String>>, ValidationError> {
    let field = dimension.field();
    let invalid = |reason: String| ValidationError::InvalidField {
        id: id.to_string(),
        field: field.to_string(),
        reason,
    };

    match obj.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| match item {
                Value::String(code) => Ok(code.clone()),
                other => Err(invalid(format!("expected strings, found {}", type_name(other)))),
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Some),
        Some(other) => Err(invalid(format!("expected an array, found {}", type_name(other)))),
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_document_full_record() {
        let doc = json!({
            "id": "spring-sale",
            "active": true,
            "startAt": 1000,
            "endAt": "1970-01-01T00:00:02Z",
            "regions": ["MX", "US"],
            "languages": [],
            "order": 2,
            "image": "https://cdn.example.com/spring.png",
            "link": "/promos/spring"
        });

        let banner = BannerRecord::from_document(0, &doc).unwrap();

        assert_eq!(banner.id, "spring-sale");
        assert!(banner.active);
        assert_eq!(banner.start_at, Some(1000));
        assert_eq!(banner.end_at, Some(2000));
        assert_eq!(banner.restriction(Dimension::Region), Some(&["MX".to_string(), "US".to_string()][..]));
        assert_eq!(banner.restriction(Dimension::Language).map(|set| set.len()), Some(0));
        assert_eq!(banner.restriction(Dimension::Category), None);
        assert_eq!(banner.order_rank(), 2.0);
        assert_eq!(banner.payload.len(), 2);
        assert_eq!(banner.payload["link"], json!("/promos/spring"));
    }

    #[test]
    fn test_absent_fields_default() {
        let banner = BannerRecord::from_document(0, &json!({ "id": "bare", "order": null })).unwrap();

        assert!(!banner.active);
        assert_eq!(banner.start_at, None);
        assert_eq!(banner.end_at, None);
        assert_eq!(banner.order, None);
        assert_eq!(banner.order_rank(), 0.0);
        assert!(banner.payload.is_empty());
    }

    #[test]
    fn test_missing_id_rejected() {
        assert_eq!(
            BannerRecord::from_document(0, &json!({ "active": true })),
            Err(ValidationError::MissingId)
        );
        assert_eq!(
            BannerRecord::from_document(0, &json!({ "id": "  ", "active": true })),
            Err(ValidationError::MissingId)
        );
        assert_eq!(
            BannerRecord::from_document(0, &json!({ "id": 7, "active": true })),
            Err(ValidationError::MissingId)
        );
    }

    #[test]
    fn test_non_numeric_order_not_coerced() {
        let err = BannerRecord::from_document(0, &json!({ "id": "A", "active": true, "order": "3" })).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidOrder { ref id, .. } if id == "A"));
    }

    #[test]
    fn test_malformed_timestamps() {
        let err = BannerRecord::from_document(0, &json!({ "id": "A", "startAt": "next tuesday" })).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidTimestamp { ref field, .. } if field == "startAt"));

        let err = BannerRecord::from_document(0, &json!({ "id": "A", "endAt": 12.5 })).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidTimestamp { ref field, .. } if field == "endAt"));

        let err = BannerRecord::from_document(0, &json!({ "id": "A", "endAt": true })).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidTimestamp { .. }));
    }

    #[test]
    fn test_bad_restriction_and_active() {
        let err = BannerRecord::from_document(0, &json!({ "id": "A", "regions": "MX" })).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidField { ref field, .. } if field == "regions"));

        let err = BannerRecord::from_document(0, &json!({ "id": "A", "categories": ["plumbing", 4] })).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidField { ref field, .. } if field == "categories"));

        let err = BannerRecord::from_document(0, &json!({ "id": "A", "active": "yes" })).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidField { ref field, .. } if field == "active"));
    }

    #[test]
    fn test_parse_documents_fails_fast() {
        let docs = vec![
            json!({ "id": "A", "active": true }),
            json!("not a banner"),
            json!({ "active": true }),
        ];

        assert_eq!(parse_documents(&docs), Err(ValidationError::NotAnObject { index: 1 }));
        assert_eq!(parse_documents(&[]), Ok(Vec::new()));
    }

    #[test]
    fn test_validate_rejects_non_finite_order() {
        let mut banner = BannerRecord::new("A");
        assert!(banner.validate().is_ok());

        banner.order = Some(f64::NAN);
        assert!(matches!(banner.validate(), Err(ValidationError::InvalidOrder { .. })));

        banner.order = Some(f64::INFINITY);
        assert!(banner.validate().is_err());

        let empty = BannerRecord::new("");
        assert_eq!(empty.validate(), Err(ValidationError::MissingId));
    }

    #[test]
    fn test_negative_zero_order_ranks_as_zero() {
        let mut banner = BannerRecord::new("A");
        banner.order = Some(-0.0);
        assert_eq!(banner.order_rank().total_cmp(&0.0), std::cmp::Ordering::Equal);
    }

    #[test]
    fn test_validate_rejects_typed_keys_in_payload() {
        let mut banner = BannerRecord::new("A");
        banner.payload.insert("order".to_string(), json!(1));

        let err = banner.validate().unwrap_err();
        assert!(matches!(err, ValidationError::InvalidField { ref field, .. } if field == "order"));

        banner.payload.remove("order");
        banner.payload.insert("regions".to_string(), json!(["MX"]));
        assert!(banner.validate().is_err());
    }

    #[test]
    fn test_serde_accepts_same_timestamps_as_documents() {
        let doc = json!({
            "id": "A",
            "active": true,
            "startAt": "2026-01-01T00:00:00Z",
            "endAt": 1_767_225_600_001i64
        });

        let banner: BannerRecord = serde_json::from_value(doc.clone()).unwrap();
        assert_eq!(banner, BannerRecord::from_document(0, &doc).unwrap());
        assert_eq!(banner.start_at, Some(1_767_225_600_000));
        assert_eq!(banner.end_at, Some(1_767_225_600_001));

        let bad = json!({ "id": "A", "startAt": "next tuesday" });
        assert!(serde_json::from_value::<BannerRecord>(bad).is_err());
    }

    #[test]
    fn test_serde_round_trip_keeps_payload() {
        let doc = json!({
            "id": "A",
            "active": true,
            "startAt": 5,
            "order": 1.5,
            "title": "Half off"
        });

        let banner: BannerRecord = serde_json::from_value(doc.clone()).unwrap();
        assert_eq!(banner.start_at, Some(5));
        assert_eq!(banner.payload["title"], json!("Half off"));
        assert_eq!(serde_json::to_value(&banner).unwrap(), doc);
    }
}
