//! Request id generation and propagation.

use axum::http::{HeaderName, HeaderValue, Request};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use tower_http::request_id::{MakeRequestId, RequestId};

/// Header carrying the request id.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Returns the request id header name.
#[must_use]
pub fn request_id_header() -> HeaderName {
    HeaderName::from_static(REQUEST_ID_HEADER)
}

/// Issues `<process-start-millis>-<sequence>` ids.
///
/// Unique per process; the start prefix keeps restarts from reusing ids.
#[derive(Clone, Debug)]
pub struct SequentialRequestId {
    prefix: u64,
    counter: Arc<AtomicU64>,
}

impl Default for SequentialRequestId {
    fn default() -> Self {
        let prefix = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
            .unwrap_or_default();
        Self {
            prefix,
            counter: Arc::new(AtomicU64::new(1)),
        }
    }
}

impl MakeRequestId for SequentialRequestId {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        let seq = self.counter.fetch_add(1, Ordering::Relaxed);
        HeaderValue::from_str(&format!("{:x}-{seq}", self.prefix))
            .ok()
            .map(RequestId::new)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_distinct() {
        let mut maker = SequentialRequestId::default();
        let request = Request::new(());
        let a = maker.make_request_id(&request).unwrap();
        let b = maker.make_request_id(&request).unwrap();
        assert_ne!(a.header_value(), b.header_value());
    }

    #[test]
    fn test_clones_share_sequence() {
        let mut a = SequentialRequestId::default();
        let mut b = a.clone();
        let request = Request::new(());
        let first = a.make_request_id(&request).unwrap();
        let second = b.make_request_id(&request).unwrap();
        assert_ne!(first.header_value(), second.header_value());
    }
}
