//! Wire envelopes used by the backing API.
//!
//! Successful responses wrap the payload in `{code, msg, data}`; the pipeline
//! unwraps `data` before handing it to the caller. Failed responses carry
//! `{code, msg, details?}` which feeds the error notification.

use serde::{Deserialize, Serialize};
use serde::de::DeserializeOwned;

/// Success envelope: `{code, msg, data}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponseEnvelope<T> {
    pub code: i64,
    pub msg: String,
    pub data: T,
}

/// Error envelope: `{code, msg, details?}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    pub code: i64,
    pub msg: String,
    /// Ordered detail lines, joined with newlines for display.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<String>>,
}

impl ErrorEnvelope {
    /// Detail lines joined with newlines, or `None` when absent/empty.
    pub fn joined_details(&self) -> Option<String> {
        self.details
            .as_ref()
            .filter(|lines| !lines.is_empty())
            .map(|lines| lines.join("\n"))
    }
}

/// Paginated payload. The backend emits either the full shape
/// `{list, total, page, pageSize, totalPages}` or the short `{list, total}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub list: Vec<T>,
    pub total: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_pages: Option<u32>,
}

/// Decode a success envelope from a raw body and unwrap its `data` field.
pub(crate) fn unwrap_data<T: DeserializeOwned>(body: &str) -> Result<T, serde_json::Error> {
    let envelope: ResponseEnvelope<T> = serde_json::from_str(body)?;
    Ok(envelope.data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn unwraps_success_data() {
        let body = json!({"code": 0, "msg": "ok", "data": {"id": 7}}).to_string();
        let data: serde_json::Value = unwrap_data(&body).unwrap();
        assert_eq!(data["id"], 7);
    }

    #[test]
    fn error_envelope_joins_details_with_newlines() {
        let envelope: ErrorEnvelope =
            serde_json::from_value(json!({"code": 400, "msg": "invalid", "details": ["a", "b"]}))
                .unwrap();
        assert_eq!(envelope.joined_details().as_deref(), Some("a\nb"));
    }

    #[test]
    fn error_envelope_details_are_optional() {
        let envelope: ErrorEnvelope =
            serde_json::from_value(json!({"code": 500, "msg": "boom"})).unwrap();
        assert!(envelope.details.is_none());
        assert!(envelope.joined_details().is_none());
    }

    #[test]
    fn page_accepts_short_variant() {
        let page: Page<i32> =
            serde_json::from_value(json!({"list": [1, 2, 3], "total": 3})).unwrap();
        assert_eq!(page.list, vec![1, 2, 3]);
        assert_eq!(page.total, 3);
        assert!(page.page.is_none());
        assert!(page.total_pages.is_none());
    }

    #[test]
    fn page_accepts_full_variant_with_camel_case_keys() {
        let page: Page<i32> = serde_json::from_value(json!({
            "list": [1],
            "total": 41,
            "page": 2,
            "pageSize": 20,
            "totalPages": 3
        }))
        .unwrap();
        assert_eq!(page.page, Some(2));
        assert_eq!(page.page_size, Some(20));
        assert_eq!(page.total_pages, Some(3));
    }
}
