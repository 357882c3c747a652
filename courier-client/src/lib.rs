//! # courier-client
//!
//! Async Bot API client built on `courier-codec` and `courier-types`.
//!
//! ## Features
//! - Typed calls: any [`Request`] in, its `Response` out
//! - JSON bodies for plain calls, streamed `multipart/form-data` for uploads
//! - Encode errors surface before any I/O
//! - Cancellation of in-flight uploads via `CancellationToken`
//! - Opt-in retries of connection failures, each with a freshly built request
//! - Pluggable [`Transport`]; `reqwest` support behind the `reqwest` feature
//!
//! ```rust,ignore
//! use courier_client::{Bot, Config, ReqwestTransport};
//! use courier_types::{functions::SendPhoto, Upload};
//!
//! let bot = Bot::new(Config::from_env()?, ReqwestTransport::new())?;
//! let msg = bot.call(SendPhoto::new(chat_id, Upload::from_path("cat.jpg"))).await?;
//! ```

#![deny(unsafe_code)]

mod config;
mod errors;
mod response;
mod retry;
mod transport;

pub use config::{Config, ConfigError, DEFAULT_API_URL};
pub use errors::{ApiError, InvocationError, TransportError};
pub use response::{ResponseParameters, decode_response};
pub use retry::{Backoff, NoRetries, RetryPolicy};
pub use transport::Transport;
#[cfg(feature = "reqwest")]
pub use transport::ReqwestTransport;

pub use courier_codec as codec;
pub use courier_codec::Request;
pub use courier_types as types;
pub use tokio_util::sync::CancellationToken;

use std::num::NonZeroU32;
use std::sync::Arc;

use courier_codec::RequestEncoder;
use tokio::time::sleep;

// ─── Bot ──────────────────────────────────────────────────────────────────────

/// A Bot API client over transport `T`.
pub struct Bot<T> {
    transport:    T,
    encoder:      RequestEncoder,
    api_url:      String,
    token:        String,
    retry_policy: Arc<dyn RetryPolicy>,
}

impl<T: Transport> Bot<T> {
    pub fn new(config: Config, transport: T) -> Result<Self, ConfigError> {
        if config.token.is_empty() {
            return Err(ConfigError::MissingToken);
        }
        Ok(Self {
            encoder:      RequestEncoder::new(config.encoder_config()),
            api_url:      config.api_url.trim_end_matches('/').to_owned(),
            token:        config.token,
            retry_policy: config.retry_policy,
            transport,
        })
    }

    pub fn transport(&self) -> &T { &self.transport }

    /// `{api_url}/bot{token}/{method}`.
    pub fn endpoint(&self, method: &str) -> String {
        format!("{}/bot{}/{}", self.api_url, self.token, method)
    }

    // ── Calls ──────────────────────────────────────────────────────────────

    /// Encode `request`, send it, and decode the result.
    pub async fn call<R: Request>(&self, request: R) -> Result<R::Response, InvocationError> {
        self.call_cancellable(request, CancellationToken::new()).await
    }

    /// Like [`call`](Self::call); triggering `cancel` aborts the body stream
    /// and the call fails with a cancelled transport error.
    pub async fn call_cancellable<R: Request>(
        &self,
        request: R,
        cancel: CancellationToken,
    ) -> Result<R::Response, InvocationError> {
        let body = self.encoder.encode(request)?;
        let content_type = body.content_type();
        tracing::debug!(method = R::METHOD, multipart = body.is_multipart(), "calling");

        let response = self
            .transport
            .post(&self.endpoint(R::METHOD), &content_type, body.into_stream(cancel))
            .await?;
        decode_response(&response)
    }

    /// Call with the configured [`RetryPolicy`].
    ///
    /// Upload streams can only be read once, so each attempt builds a fresh
    /// request from `make`. Only [retryable](InvocationError::is_retryable)
    /// failures reach the policy.
    pub async fn call_with_retry<R, F>(&self, mut make: F) -> Result<R::Response, InvocationError>
    where
        R: Request,
        F: FnMut() -> R,
    {
        let mut attempt = NonZeroU32::MIN;
        loop {
            let error = match self.call(make()).await {
                Ok(result) => return Ok(result),
                Err(e) => e,
            };
            let delay = if error.is_retryable() { self.retry_policy.next_delay(attempt, &error) } else { None };
            let Some(delay) = delay else { return Err(error) };
            tracing::info!(method = R::METHOD, ?delay, attempt = attempt.get(), %error, "retrying");
            sleep(delay).await;
            attempt = attempt.saturating_add(1);
        }
    }
}

impl<T> std::fmt::Debug for Bot<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bot").field("api_url", &self.api_url).finish_non_exhaustive()
    }
}
