use std::convert::Infallible;

use axum::{extract::FromRequestParts, http::request::Parts};

pub const HX_REQUEST_HEADER: &str = "hx-request";

/// Whether the request asks for a fragment (in-page refresh) rather than a full page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HxRequest(pub bool);

impl<S> FromRequestParts<S> for HxRequest
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(HxRequest(parts.headers.contains_key(HX_REQUEST_HEADER)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    async fn classify(req: Request<()>) -> HxRequest {
        let (mut parts, _) = req.into_parts();
        HxRequest::from_request_parts(&mut parts, &()).await.unwrap()
    }

    #[tokio::test]
    async fn header_presence_selects_fragment() {
        let req = Request::builder().header("HX-Request", "true").body(()).unwrap();
        assert_eq!(classify(req).await, HxRequest(true));
    }

    #[tokio::test]
    async fn plain_request_is_full_page() {
        let req = Request::builder().body(()).unwrap();
        assert_eq!(classify(req).await, HxRequest(false));
    }
}
