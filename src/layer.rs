use std::{
    future::Future,
    pin::Pin,
    task::{Context, Poll},
};

use http::{Request, Response};
use tower_layer::Layer;
use tower_service::Service;

use crate::{config::SameSiteNoneConfig, rewriter::FallbackCookieRewriter};

/// Wraps a service with [`SameSiteNoneCompat`].
///
/// To be visible to `tower_cookies`, this layer must wrap its `CookieManagerLayer`, i.e. be
/// added after it.
#[derive(Debug, Clone, Copy, Default)]
pub struct SameSiteNoneCompatLayer {
    config: SameSiteNoneConfig,
}

impl SameSiteNoneCompatLayer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_config(mut self, config: SameSiteNoneConfig) -> Self {
        self.config = config;
        self
    }
}

impl<S> Layer<S> for SameSiteNoneCompatLayer {
    type Service = SameSiteNoneCompat<S>;

    fn layer(&self, inner: S) -> Self::Service {
        SameSiteNoneCompat {
            inner,
            rewriter: FallbackCookieRewriter::new(self.config),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SameSiteNoneCompat<S> {
    inner: S,
    rewriter: FallbackCookieRewriter,
}

impl<S> SameSiteNoneCompat<S> {
    pub fn new(inner: S, config: SameSiteNoneConfig) -> Self {
        Self {
            inner,
            rewriter: FallbackCookieRewriter::new(config),
        }
    }
}

impl<ReqBody, ResBody, S> Service<Request<ReqBody>> for SameSiteNoneCompat<S>
where
    S: Service<Request<ReqBody>, Response = Response<ResBody>> + Clone + Send + 'static,
    S::Future: Send,
    ReqBody: Send + 'static,
    ResBody: Send,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: Request<ReqBody>) -> Self::Future {
        let rewriter = self.rewriter;

        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);

        rewriter.promote_request(&mut req);

        Box::pin(async move {
            let mut res = inner.call(req).await?;
            rewriter.duplicate_response(&mut res);
            Ok(res)
        })
    }
}
