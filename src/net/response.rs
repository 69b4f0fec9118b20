//! JSON body returned by the webhook.
//!
//! Every answer, successful or not, has the shape `{ "success": bool, "message": string }`.
use http::{header::CONTENT_TYPE, HeaderValue, Response, StatusCode};
use http_body_util::Full;
use hyper::body::Bytes;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiResponse {
    pub success: bool,
    pub message: String,
}

impl ApiResponse {
    pub fn ok(message: impl Into<String>) -> Self {
        Self { success: true, message: message.into() }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self { success: false, message: message.into() }
    }

    /// Builds the full HTTP response with `status` and a JSON body.
    pub fn into_http(self, status: StatusCode) -> Response<Full<Bytes>> {
        // Two plain fields always serialize.
        let body = serde_json::to_vec(&self).unwrap_or_default();

        let mut res = Response::new(Full::new(Bytes::from(body)));
        *res.status_mut() = status;
        res.headers_mut().insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        res
    }
}
