use http::{Request, Response};
use tower_cookies::{Cookie, cookie::SameSite};

use crate::{
    config::SameSiteNoneConfig,
    error::Result,
    header::{RequestCookies, SetCookies},
    jar::{RequestCookieJar, ResponseCookieJar},
};

/// Appended to a cookie's name to form the name of its fallback twin.
pub const FALLBACK_SUFFIX: &str = "__ssn-fallback";

const _: () = assert!(!FALLBACK_SUFFIX.is_empty());

/// The fallback name for a primary cookie name.
pub fn fallback_name(primary: &str) -> String {
    let mut name = String::with_capacity(primary.len() + FALLBACK_SUFFIX.len());
    name.push_str(primary);
    name.push_str(FALLBACK_SUFFIX);
    name
}

/// The primary name a fallback cookie stands in for, or `None` if `name` is not a fallback name.
///
/// The comparison is exact and byte-wise. The bare suffix is a fallback name whose primary is
/// empty.
pub fn primary_name(name: &str) -> Option<&str> {
    let split = name.len().checked_sub(FALLBACK_SUFFIX.len())?;
    if name.get(split..)? != FALLBACK_SUFFIX {
        return None;
    }
    name.get(..split)
}

pub fn is_fallback_name(name: &str) -> bool {
    primary_name(name).is_some()
}

/// Translates between primary `SameSite=None` cookies and their legacy fallback twins.
#[derive(Debug, Clone, Copy, Default)]
pub struct FallbackCookieRewriter {
    config: SameSiteNoneConfig,
}

impl FallbackCookieRewriter {
    pub fn new(config: SameSiteNoneConfig) -> Self {
        Self { config }
    }

    /// Run `next` between inbound promotion and outbound duplication.
    pub fn intercept<ReqBody, ResBody, F>(
        &self,
        mut req: Request<ReqBody>,
        next: F,
    ) -> Response<ResBody>
    where
        F: FnOnce(Request<ReqBody>) -> Response<ResBody>,
    {
        self.promote_request(&mut req);
        let mut res = next(req);
        self.duplicate_response(&mut res);
        res
    }

    /// Promote fallback cookies to their primary names and remove them from `jar`.
    ///
    /// A primary cookie that is already present is never overwritten. Returns the number of
    /// fallback cookies removed.
    pub fn promote<J: RequestCookieJar + ?Sized>(&self, jar: &mut J) -> usize {
        let fallbacks: Vec<(String, String)> = jar
            .pairs()
            .into_iter()
            .filter(|(name, _)| is_fallback_name(name))
            .collect();

        for (name, value) in &fallbacks {
            let Some(primary) = primary_name(name) else {
                continue;
            };

            if primary.is_empty() {
                tracing::debug!("discarding fallback cookie without a primary name");
            } else if jar.has(primary) {
                tracing::debug!(cookie = %primary, "discarding fallback cookie, primary present");
            } else {
                tracing::debug!(cookie = %primary, "promoting fallback cookie");
                jar.add(primary.to_owned(), value.clone());
            }

            jar.remove(name);
        }

        fallbacks.len()
    }

    /// Attach a fallback twin for every `SameSite=None` cookie in `jar`.
    ///
    /// Returns the number of fallback cookies attached.
    pub fn duplicate<J: ResponseCookieJar + ?Sized>(&self, jar: &mut J) -> Result<usize> {
        let mut attached = 0;

        for cookie in jar.cookies() {
            if !self.wants_fallback(&cookie) {
                continue;
            }

            tracing::debug!(cookie = %cookie.name(), "attaching fallback cookie");
            jar.attach(to_fallback(cookie))?;
            attached += 1;
        }

        Ok(attached)
    }

    /// Run [`promote`](Self::promote) over the request's `Cookie` headers.
    pub fn promote_request<B>(&self, req: &mut Request<B>) {
        if !self.config.promote {
            return;
        }

        let mut jar = RequestCookies::from_headers(req.headers());
        if self.promote(&mut jar) == 0 {
            return;
        }

        if let Err(err) = jar.write_to(req.headers_mut()) {
            tracing::warn!(err = %err, "failed to rewrite request cookies");
        }
    }

    /// Run [`duplicate`](Self::duplicate) over the response's `Set-Cookie` headers.
    pub fn duplicate_response<B>(&self, res: &mut Response<B>) {
        if !self.config.duplicate {
            return;
        }

        let mut jar = SetCookies::from_headers(res.headers());
        if let Err(err) = self.duplicate(&mut jar) {
            tracing::warn!(err = %err, "failed to attach fallback cookie");
        }
        jar.write_to(res.headers_mut());
    }

    fn wants_fallback(&self, cookie: &Cookie<'_>) -> bool {
        if cookie.same_site() != Some(SameSite::None) {
            return false;
        }
        !self.config.secure_only || cookie.secure() == Some(true)
    }
}

fn to_fallback(cookie: Cookie<'static>) -> Cookie<'static> {
    let name = fallback_name(cookie.name());
    let mut fallback = cookie;
    fallback.set_name(name);
    fallback.set_same_site(None);
    fallback
}
