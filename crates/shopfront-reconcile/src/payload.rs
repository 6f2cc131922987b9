//! Remote payload classification
//!
//! The remote endpoint is untrusted. Its body is sorted into one of a few
//! shapes up front so the merge only ever sees a non-empty list of
//! well-formed records.

use serde::Serialize;
use serde_json::Value;
use shopfront_catalog::RemoteProduct;

/// A remote response body, classified
#[derive(Debug, Clone, PartialEq)]
pub enum RemotePayload {
    /// Non-empty array of well-formed records
    Records(Vec<RemoteProduct>),
    /// `[]`
    Empty,
    /// Valid JSON that is not an array
    NotArray,
    /// Body is not JSON, or an element is not a product record
    Malformed(String),
}

/// Payload shape without the data, for reports and logs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PayloadKind {
    /// Usable records
    Records,
    /// Empty array
    Empty,
    /// Not an array
    NotArray,
    /// Unparseable
    Malformed,
}

impl RemotePayload {
    /// Classify a parsed JSON value
    #[must_use]
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Array(items) if items.is_empty() => Self::Empty,
            Value::Array(items) => {
                match items
                    .into_iter()
                    .map(serde_json::from_value::<RemoteProduct>)
                    .collect::<Result<Vec<_>, _>>()
                {
                    Ok(records) => Self::Records(records),
                    Err(e) => Self::Malformed(e.to_string()),
                }
            }
            _ => Self::NotArray,
        }
    }

    /// Classify a raw response body
    #[must_use]
    pub fn from_slice(body: &[u8]) -> Self {
        match serde_json::from_slice::<Value>(body) {
            Ok(value) => Self::from_value(value),
            Err(e) => Self::Malformed(e.to_string()),
        }
    }

    /// Wrap records directly, classifying an empty list as [`RemotePayload::Empty`]
    #[must_use]
    pub fn from_records(records: Vec<RemoteProduct>) -> Self {
        if records.is_empty() {
            Self::Empty
        } else {
            Self::Records(records)
        }
    }

    /// Records, if the payload is usable
    #[inline]
    #[must_use]
    pub fn records(&self) -> Option<&[RemoteProduct]> {
        match self {
            Self::Records(records) => Some(records),
            _ => None,
        }
    }

    /// Whether the merge should run at all
    #[inline]
    #[must_use]
    pub fn is_usable(&self) -> bool {
        matches!(self, Self::Records(_))
    }

    /// Shape of this payload
    #[must_use]
    pub fn kind(&self) -> PayloadKind {
        match self {
            Self::Records(_) => PayloadKind::Records,
            Self::Empty => PayloadKind::Empty,
            Self::NotArray => PayloadKind::NotArray,
            Self::Malformed(_) => PayloadKind::Malformed,
        }
    }
}

impl From<Value> for RemotePayload {
    fn from(value: Value) -> Self {
        Self::from_value(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_array_is_empty() {
        assert_eq!(RemotePayload::from_value(json!([])), RemotePayload::Empty);
    }

    #[test]
    fn object_is_not_array() {
        let payload = RemotePayload::from_value(json!({"products": []}));
        assert_eq!(payload, RemotePayload::NotArray);
        assert!(!payload.is_usable());
    }

    #[test]
    fn null_and_scalars_are_not_arrays() {
        for value in [json!(null), json!(3), json!("[]")] {
            assert_eq!(RemotePayload::from_value(value).kind(), PayloadKind::NotArray);
        }
    }

    #[test]
    fn element_without_name_is_malformed() {
        let payload = RemotePayload::from_value(json!([{"id": "1", "name": "A"}, {"id": "2"}]));
        assert_eq!(payload.kind(), PayloadKind::Malformed);
    }

    #[test]
    fn invalid_json_body_is_malformed() {
        let payload = RemotePayload::from_slice(b"<html>502 Bad Gateway</html>");
        assert_eq!(payload.kind(), PayloadKind::Malformed);
    }

    #[test]
    fn records_parse_with_flags() {
        let payload = RemotePayload::from_slice(
            br#"[{"id": "1", "name": "A"}, {"id": "9", "name": "D", "featured": true}]"#,
        );
        let records = payload.records().unwrap();
        assert_eq!(records.len(), 2);
        assert!(!records[0].featured);
        assert!(records[1].featured);
    }

    #[test]
    fn from_records_empty_is_empty() {
        assert_eq!(RemotePayload::from_records(Vec::new()), RemotePayload::Empty);
    }
}
