/* src/middleware.rs */

use axum::{
    extract::{ConnectInfo, FromRequestParts, Request},
    http::{HeaderMap as AxumHeaderMap, request::Parts},
    response::Response,
};
use futures_util::future::BoxFuture;
use std::{
    convert::Infallible,
    net::{IpAddr, SocketAddr},
    task::{Context, Poll},
};
use tower::{Layer, Service};

use crate::extractor::{HeaderMap, IpSelector};

/// Extension that holds the selected client address.
///
/// The value is whatever the selector returned, which may be the peer
/// host verbatim or an empty string when nothing was known.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientIp(pub String);

impl ClientIp {
    /// The selected address as a string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The selected address, if it is a valid IP literal.
    pub fn ip(&self) -> Option<IpAddr> {
        self.0.parse().ok()
    }
}

/// Layer that selects the client address for every request.
///
/// The result is stored as a [`ClientIp`] request extension.
///
/// # Examples
///
/// ```rust,no_run
/// use axum::{Router, routing::get};
/// use forwarded_ip::{ClientIp, RealIpLayer};
///
/// async fn handler(client_ip: ClientIp) -> String {
///     client_ip.0
/// }
///
/// let app: Router = Router::new()
///     .route("/", get(handler))
///     .layer(RealIpLayer::secure());
/// ```
#[derive(Debug, Clone, Default)]
pub struct RealIpLayer {
    selector: IpSelector,
}

impl RealIpLayer {
    /// Create a layer using the secure strategy.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a layer using the secure strategy.
    pub fn secure() -> Self {
        Self::with_selector(IpSelector::secure())
    }

    /// Create a layer using the naive, spoofable strategy.
    pub fn naive() -> Self {
        Self::with_selector(IpSelector::naive())
    }

    /// Create a layer with a custom selector configuration.
    pub fn with_selector(selector: IpSelector) -> Self {
        Self { selector }
    }
}

impl<S> Layer<S> for RealIpLayer {
    type Service = RealIpService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        RealIpService {
            inner,
            selector: self.selector.clone(),
        }
    }
}

/// Service that selects the client address before calling `S`.
#[derive(Debug, Clone)]
pub struct RealIpService<S> {
    inner: S,
    selector: IpSelector,
}

impl<S> Service<Request> for RealIpService<S>
where
    S: Service<Request, Response = Response> + Send + 'static,
    S::Future: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = BoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: Request) -> Self::Future {
        let headers = collect_headers(req.headers(), &self.selector);

        let peer = req
            .extensions()
            .get::<ConnectInfo<SocketAddr>>()
            .map(|connect_info| connect_info.0.to_string())
            .unwrap_or_default();

        let client_ip = self.selector.select(&headers, &peer);
        tracing::debug!(
            strategy = %self.selector.strategy,
            peer = %peer,
            client_ip = %client_ip,
            "selected client address"
        );
        req.extensions_mut().insert(ClientIp(client_ip));

        let future = self.inner.call(req);
        Box::pin(future)
    }
}

/// Copy the two headers the selector reads into our header map.
///
/// Every instance of the forwarded header is kept in order; only the first
/// instance of the real-ip header is kept. Values that are not valid UTF-8
/// are dropped.
fn collect_headers(headers: &AxumHeaderMap, selector: &IpSelector) -> HeaderMap {
    let mut map = HeaderMap::new();

    let forwarded: Vec<String> = headers
        .get_all(selector.forwarded_header.as_str())
        .iter()
        .filter_map(|value| value.to_str().ok())
        .map(str::to_string)
        .collect();
    if !forwarded.is_empty() {
        map.insert(selector.forwarded_header.clone(), forwarded);
    }

    if let Some(real_ip) = headers
        .get(selector.real_ip_header.as_str())
        .and_then(|value| value.to_str().ok())
    {
        map.insert(selector.real_ip_header.clone(), vec![real_ip.to_string()]);
    }

    map
}

/// Axum extractor for the selected client address.
///
/// Falls back to the connection's IP when the layer is not installed, and to
/// an empty address when no connection info is available either.
impl<S> FromRequestParts<S> for ClientIp
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        if let Some(client_ip) = parts.extensions.get::<ClientIp>() {
            return Ok(client_ip.clone());
        }

        let ip = parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|connect_info| connect_info.0.ip().to_string())
            .unwrap_or_default();
        Ok(ClientIp(ip))
    }
}
