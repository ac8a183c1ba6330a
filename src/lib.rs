//! `SameSite=None` compatibility middleware for `tower`.
//!
//! Some older clients reject cookies carrying `SameSite=None`, or treat them as `SameSite=Strict`.
//! This crate provides a layer that keeps such cookies usable for those clients:
//!
//! - For every outgoing `SameSite=None` cookie, a twin named `<name>__ssn-fallback` is emitted with
//!   the same value and attributes but no `SameSite` attribute.
//! - On incoming requests, a fallback cookie is promoted to its primary name when the primary is
//!   missing, and fallback cookies are always removed before the request reaches the inner
//!   service.
//!
//! Handlers therefore only ever see primary cookie names.
//!
//! # Ordering
//! The layer rewrites the `Cookie` and `Set-Cookie` headers. When used with `tower_cookies`, add
//! it after `CookieManagerLayer` so that it wraps the cookie manager.
//!
//! # Limitations
//! A cookie whose real name already ends with [`FALLBACK_SUFFIX`] is treated as a fallback
//! cookie.
//!
//! Fallback cookies are serialized from the parsed [`Cookie`], so only the attributes it models
//! are carried over. Anything else on the original `Set-Cookie` line, such as `Priority=High`,
//! does not appear on the fallback.

mod config;
mod error;
mod header;
mod jar;
pub mod layer;
mod rewriter;

pub use tower_cookies::Cookie;
pub use tower_cookies::cookie::SameSite;

pub use crate::config::SameSiteNoneConfig;
pub use crate::error::{Error, Result};
pub use crate::header::{RequestCookies, SetCookies};
pub use crate::jar::{RequestCookieJar, ResponseCookieJar};
pub use crate::layer::{SameSiteNoneCompat, SameSiteNoneCompatLayer};
pub use crate::rewriter::{
    FALLBACK_SUFFIX, FallbackCookieRewriter, fallback_name, is_fallback_name, primary_name,
};

#[cfg(test)]
mod tests {
    use std::convert::Infallible;

    use axum::body::Body;
    use http::{Request, Response, header};
    use tower::{ServiceBuilder, ServiceExt as _};
    use tower_service::Service as _;

    use crate::{SameSiteNoneCompat, SameSiteNoneCompatLayer, SameSiteNoneConfig};

    async fn echo_cookies(req: Request<Body>) -> Result<Response<Body>, Infallible> {
        let cookies = req
            .headers()
            .get_all(header::COOKIE)
            .iter()
            .map(|value| value.to_str().expect("cookie header is valid utf-8"))
            .collect::<Vec<_>>()
            .join("; ");

        Ok(Response::builder()
            .header(header::SET_COOKIE, "sid=abc; Path=/; Secure; SameSite=None")
            .body(Body::from(cookies))
            .expect("response builds successfully"))
    }

    fn set_cookie_count(res: &Response<Body>) -> usize {
        res.headers().get_all(header::SET_COOKIE).iter().count()
    }

    #[tokio::test]
    async fn basic_service_test() {
        let svc = ServiceBuilder::new()
            .layer(SameSiteNoneCompatLayer::new())
            .service_fn(echo_cookies);

        let req = Request::builder()
            .header(header::COOKIE, "sid__ssn-fallback=abc")
            .body(Body::empty())
            .expect("request builds successfully");
        let res = svc.oneshot(req).await.expect("service call succeeds");

        assert_eq!(set_cookie_count(&res), 2);
    }

    #[tokio::test]
    async fn service_is_reusable_test() {
        let mut svc = ServiceBuilder::new()
            .layer(SameSiteNoneCompatLayer::new())
            .service_fn(echo_cookies);

        for _ in 0..2 {
            let req = Request::builder()
                .body(Body::empty())
                .expect("request builds successfully");
            let res = svc.call(req).await.expect("service call succeeds");

            assert_eq!(set_cookie_count(&res), 2);
        }
    }

    #[tokio::test]
    async fn wrap_without_layer_test() {
        let svc = SameSiteNoneCompat::new(
            tower::service_fn(echo_cookies),
            SameSiteNoneConfig::default(),
        );

        let req = Request::builder()
            .header(header::COOKIE, "a=1; sid__ssn-fallback=abc")
            .body(Body::empty())
            .expect("request builds successfully");
        let res = svc.oneshot(req).await.expect("service call succeeds");

        assert_eq!(set_cookie_count(&res), 2);
    }

    #[tokio::test]
    async fn duplication_disabled_test() {
        let config = SameSiteNoneConfig::default().with_duplication(false);
        let svc = ServiceBuilder::new()
            .layer(SameSiteNoneCompatLayer::new().with_config(config))
            .service_fn(echo_cookies);

        let req = Request::builder()
            .body(Body::empty())
            .expect("request builds successfully");
        let res = svc.oneshot(req).await.expect("service call succeeds");

        assert_eq!(set_cookie_count(&res), 1);
    }
}
