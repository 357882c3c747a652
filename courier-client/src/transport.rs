//! The HTTP seam: anything that can POST a streamed body and return the
//! response bytes.

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use courier_codec::BodyStream;

use crate::errors::TransportError;

/// Sends one encoded request.
///
/// Implementations must consume `body` in order and must not retry on
/// their own: a body stream can only be read once.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn post(&self, url: &str, content_type: &str, body: BodyStream) -> Result<Bytes, TransportError>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for Arc<T> {
    async fn post(&self, url: &str, content_type: &str, body: BodyStream) -> Result<Bytes, TransportError> {
        (**self).post(url, content_type, body).await
    }
}

// ─── reqwest ──────────────────────────────────────────────────────────────────

#[cfg(feature = "reqwest")]
pub use self::http::ReqwestTransport;

#[cfg(feature = "reqwest")]
mod http {
    use super::*;

    /// [`Transport`] over a `reqwest` client; the body is streamed, never
    /// buffered whole.
    #[derive(Clone, Debug, Default)]
    pub struct ReqwestTransport {
        client: reqwest::Client,
    }

    impl ReqwestTransport {
        pub fn new() -> Self { Self::default() }

        pub fn with_client(client: reqwest::Client) -> Self { Self { client } }
    }

    #[async_trait]
    impl Transport for ReqwestTransport {
        async fn post(&self, url: &str, content_type: &str, body: BodyStream) -> Result<Bytes, TransportError> {
            let response = self
                .client
                .post(url)
                .header(reqwest::header::CONTENT_TYPE, content_type)
                .body(reqwest::Body::wrap_stream(body))
                .send()
                .await
                .map_err(|e| TransportError::Http(Box::new(e)))?;
            tracing::trace!(status = %response.status(), "response received");
            // Error statuses still carry the JSON envelope.
            response.bytes().await.map_err(|e| TransportError::Http(Box::new(e)))
        }
    }
}
