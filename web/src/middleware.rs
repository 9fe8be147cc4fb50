//! Request tracking.
//!
//! Each request carries a correlation ID: the `X-Correlation-ID` header when
//! it parses as a UUID, a fresh v4 otherwise. The ID is stored in the request
//! extensions as a [`Uuid`] and echoed back on the response. Completion is logged
//! inside the `http_request` span with status and latency.
//!
//! ```ignore
//! let app = Router::new()
//!     .route("/users/register", post(register))
//!     .layer(correlation_id_layer());
//! ```

use axum::{
    extract::Request,
    http::{HeaderMap, HeaderValue},
    response::Response,
};
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Instant;
use tower::{Layer, Service};
use tracing::Instrument;
use uuid::Uuid;

/// Header carrying the correlation ID in both directions.
pub const CORRELATION_ID_HEADER: &str = "X-Correlation-ID";

/// Layer that tags every request with a correlation ID.
#[must_use]
pub const fn correlation_id_layer() -> RequestTrackingLayer {
    RequestTrackingLayer
}

/// See [`correlation_id_layer`].
#[derive(Clone, Copy, Debug, Default)]
pub struct RequestTrackingLayer;

impl<S> Layer<S> for RequestTrackingLayer {
    type Service = RequestTracking<S>;

    fn layer(&self, inner: S) -> Self::Service {
        RequestTracking { inner }
    }
}

/// Service produced by [`RequestTrackingLayer`].
#[derive(Clone, Debug)]
pub struct RequestTracking<S> {
    inner: S,
}

type TrackedFuture<E> = Pin<Box<dyn Future<Output = Result<Response, E>> + Send>>;

fn incoming_id(headers: &HeaderMap) -> Option<Uuid> {
    let raw = headers.get(CORRELATION_ID_HEADER)?.to_str().ok()?;
    Uuid::parse_str(raw.trim()).ok()
}

impl<S> Service<Request> for RequestTracking<S>
where
    S: Service<Request, Response = Response> + Send + 'static,
    S::Future: Send + 'static,
{
    type Response = Response;
    type Error = S::Error;
    type Future = TrackedFuture<S::Error>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: Request) -> Self::Future {
        let id = incoming_id(req.headers()).unwrap_or_else(Uuid::new_v4);
        req.extensions_mut().insert(id);

        let span = tracing::info_span!(
            "http_request",
            correlation_id = %id,
            method = %req.method(),
            path = %req.uri().path(),
        );
        let started = Instant::now();
        let pending = self.inner.call(req);

        Box::pin(
            async move {
                let mut response = pending.await?;
                let status = response.status().as_u16();
                let elapsed_ms = started.elapsed().as_millis();

                if response.status().is_server_error() {
                    tracing::warn!(status, elapsed_ms, "Request failed");
                } else {
                    tracing::info!(status, elapsed_ms, "Request completed");
                }

                // A hyphenated UUID is always a valid header value.
                if let Ok(value) = HeaderValue::from_str(&id.hyphenated().to_string()) {
                    response.headers_mut().insert(CORRELATION_ID_HEADER, value);
                }
                Ok(response)
            }
            .instrument(span),
        )
    }
}
