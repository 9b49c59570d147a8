use reqwest::{header::HeaderMap, StatusCode};

/// Status line and headers of a completed API call.
#[derive(Debug, Clone)]
pub struct ResponseMeta {
    pub status: StatusCode,
    pub headers: HeaderMap,
}

impl ResponseMeta {
    pub(crate) fn from_response(resp: &reqwest::Response) -> Self {
        Self {
            status: resp.status(),
            headers: resp.headers().clone(),
        }
    }
}

/// Decoded response body together with the response metadata.
#[derive(Debug, Clone)]
pub struct ApiResponse<T> {
    pub data: T,
    pub meta: ResponseMeta,
}

impl<T> ApiResponse<T> {
    pub fn into_inner(self) -> T {
        self.data
    }
}
