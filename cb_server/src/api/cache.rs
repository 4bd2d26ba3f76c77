//! Conditional GET support for JSON snapshots.

use axum::{
    body::Bytes,
    http::{
        HeaderMap, HeaderValue, StatusCode,
        header::{CACHE_CONTROL, CONTENT_TYPE, ETAG, IF_NONE_MATCH},
    },
    response::{IntoResponse, Response},
};
use serde::Serialize;
use sha2::{Digest, Sha256};

/// A serialized JSON body and its strong entity tag.
///
/// The tag is the quoted hex SHA-256 of the body, so identical state always
/// produces the same tag.
#[derive(Debug, Clone)]
pub struct JsonCache {
    body: Bytes,
    etag: String,
}

impl JsonCache {
    pub fn new<T: Serialize + ?Sized>(value: &T) -> Result<Self, serde_json::Error> {
        let mut body = serde_json::to_vec(value)?;
        body.push(b'\n');
        let etag = format!("\"{}\"", hex::encode(Sha256::digest(&body)));
        Ok(Self {
            body: body.into(),
            etag,
        })
    }

    #[must_use]
    pub fn etag(&self) -> &str {
        &self.etag
    }

    /// Whether an `If-None-Match` header already names this body.
    #[must_use]
    pub fn is_fresh(&self, headers: &HeaderMap) -> bool {
        headers
            .get_all(IF_NONE_MATCH)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .flat_map(|value| value.split(','))
            .map(str::trim)
            .any(|tag| tag == "*" || tag.trim_start_matches("W/") == self.etag)
    }

    /// `304` when the client's copy is current, the full body otherwise.
    pub fn respond(self, headers: &HeaderMap) -> Response {
        let etag = HeaderValue::from_str(&self.etag).ok();
        let mut response = if self.is_fresh(headers) {
            StatusCode::NOT_MODIFIED.into_response()
        } else {
            (
                [
                    (CONTENT_TYPE, HeaderValue::from_static("application/json")),
                    (CACHE_CONTROL, HeaderValue::from_static("no-cache")),
                ],
                self.body,
            )
                .into_response()
        };
        if let Some(etag) = etag {
            response.headers_mut().insert(ETAG, etag);
        }
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn headers_with(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(IF_NONE_MATCH, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_etag_is_content_addressed() {
        let a = JsonCache::new(&json!({"streak": 1})).unwrap();
        let b = JsonCache::new(&json!({"streak": 1})).unwrap();
        let c = JsonCache::new(&json!({"streak": 2})).unwrap();

        assert_eq!(a.etag(), b.etag());
        assert_ne!(a.etag(), c.etag());
        assert!(a.etag().starts_with('"') && a.etag().ends_with('"'));
        assert_eq!(a.etag().len(), 66);
    }

    #[test]
    fn test_freshness() {
        let cache = JsonCache::new(&json!([1, 2, 3])).unwrap();

        assert!(!cache.is_fresh(&HeaderMap::new()));
        assert!(cache.is_fresh(&headers_with(cache.etag())));
        assert!(cache.is_fresh(&headers_with(&format!("\"x\", {}", cache.etag()))));
        assert!(cache.is_fresh(&headers_with("*")));
        assert!(!cache.is_fresh(&headers_with("\"stale\"")));
    }

    #[test]
    fn test_respond() {
        let cache = JsonCache::new(&json!({"done": false})).unwrap();
        let etag = cache.etag().to_string();

        let response = cache.clone().respond(&HeaderMap::new());
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[ETAG], etag.as_str());

        let response = cache.respond(&headers_with(&etag));
        assert_eq!(response.status(), StatusCode::NOT_MODIFIED);
    }
}
