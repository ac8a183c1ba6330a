#![allow(dead_code)]

// Shared helpers for integration tests.
//
// Cookies are parsed with `tower_cookies::Cookie`, the same parser the middleware uses on
// `Set-Cookie` and `Cookie` headers.
use std::convert::Infallible;

use axum::body::Body;
use http::{HeaderMap, HeaderValue, Request, Response, header};
use http_body_util::BodyExt as _;
use tower_samesite_none_compat::Cookie;

pub async fn body_string(body: Body) -> String {
    // Collect an Axum body into a UTF-8 string for assertions.
    let bytes = body
        .collect()
        .await
        .expect("body collects successfully")
        .to_bytes();
    String::from_utf8_lossy(&bytes).into_owned()
}

pub async fn echo_cookies(req: Request<Body>) -> Result<Response<Body>, Infallible> {
    // Handler that answers with the `Cookie` header(s) it was given, joined by "; ".
    Ok(Response::new(Body::from(request_cookie_header(req.headers()))))
}

pub fn request_cookie_header(headers: &HeaderMap) -> String {
    headers
        .get_all(header::COOKIE)
        .iter()
        .map(|value| value.to_str().expect("cookie header is valid utf-8"))
        .collect::<Vec<_>>()
        .join("; ")
}

pub fn respond_with(set_cookies: &[&str]) -> Response<Body> {
    // Build a response carrying the given raw `Set-Cookie` values.
    let mut res = Response::new(Body::empty());
    for value in set_cookies {
        res.headers_mut().append(
            header::SET_COOKIE,
            HeaderValue::from_str(value).expect("set-cookie value is valid"),
        );
    }
    res
}

pub fn set_cookies(headers: &HeaderMap) -> Vec<Cookie<'static>> {
    // Parse every `Set-Cookie` header into a `Cookie`.
    headers
        .get_all(header::SET_COOKIE)
        .iter()
        .map(|value| {
            let value = value.to_str().expect("set-cookie header is valid utf-8");
            Cookie::parse_encoded(value)
                .expect("set-cookie parses successfully")
                .into_owned()
        })
        .collect()
}

pub fn find<'a>(cookies: &'a [Cookie<'static>], name: &str) -> Option<&'a Cookie<'static>> {
    cookies.iter().find(|cookie| cookie.name() == name)
}

pub fn cookie_header_value(cookies: &[Cookie<'static>]) -> String {
    // Encode cookies the way a browser sends them back in a `Cookie` request header.
    cookies
        .iter()
        .map(|cookie| format!("{}={}", cookie.name(), cookie.value()))
        .collect::<Vec<_>>()
        .join("; ")
}
