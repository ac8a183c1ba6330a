//! Cookie jars backed by the `Cookie` and `Set-Cookie` headers of an [`http`] message.
//!
//! Both jars only touch the header map in [`write_to`](RequestCookies::write_to) and only when
//! something was changed, so a message without fallback work keeps its exact original headers.
//! Pairs and headers that cannot be parsed are carried along verbatim.

use http::{
    HeaderMap, HeaderValue,
    header::{COOKIE, HeaderName, SET_COOKIE},
};
use tower_cookies::Cookie;

use crate::{
    error::{Error, Result},
    jar::{RequestCookieJar, ResponseCookieJar, same_slot},
};

fn header_text(name: HeaderName, value: &HeaderValue) -> Result<&str> {
    value.to_str().map_err(|_| Error::NonUtf8Header(name))
}

#[derive(Debug, Clone)]
enum RequestSegment {
    Cookie(Cookie<'static>),
    Raw(String),
}

impl RequestSegment {
    fn cookie(&self) -> Option<&Cookie<'static>> {
        match self {
            Self::Cookie(cookie) => Some(cookie),
            Self::Raw(_) => None,
        }
    }
}

/// The cookies carried by the `Cookie` headers of a request.
#[derive(Debug, Clone, Default)]
pub struct RequestCookies {
    segments: Vec<RequestSegment>,
    opaque: Vec<HeaderValue>,
    modified: bool,
}

impl RequestCookies {
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let mut jar = Self::default();

        for value in headers.get_all(COOKIE) {
            let text = match header_text(COOKIE, value) {
                Ok(text) => text,
                Err(err) => {
                    tracing::warn!(err = %err, "keeping cookie header as-is");
                    jar.opaque.push(value.clone());
                    continue;
                }
            };

            for segment in text.split(';').map(str::trim).filter(|s| !s.is_empty()) {
                match Cookie::parse(segment.to_owned()) {
                    Ok(cookie) => jar.segments.push(RequestSegment::Cookie(cookie)),
                    Err(err) => {
                        tracing::debug!(err = %err, "keeping unparseable request cookie as-is");
                        jar.segments.push(RequestSegment::Raw(segment.to_owned()));
                    }
                }
            }
        }

        jar
    }

    fn cookies(&self) -> impl Iterator<Item = &Cookie<'static>> {
        self.segments.iter().filter_map(RequestSegment::cookie)
    }

    pub fn is_modified(&self) -> bool {
        self.modified
    }

    /// Replace the `Cookie` headers with the jar's contents if it was modified.
    pub fn write_to(&self, headers: &mut HeaderMap) -> Result<()> {
        if !self.modified {
            return Ok(());
        }

        let joined = self
            .segments
            .iter()
            .map(|segment| match segment {
                RequestSegment::Cookie(cookie) => format!("{}={}", cookie.name(), cookie.value()),
                RequestSegment::Raw(raw) => raw.clone(),
            })
            .collect::<Vec<_>>()
            .join("; ");
        let joined = if joined.is_empty() {
            None
        } else {
            Some(HeaderValue::try_from(joined)?)
        };

        headers.remove(COOKIE);
        if let Some(value) = joined {
            headers.append(COOKIE, value);
        }
        for value in &self.opaque {
            headers.append(COOKIE, value.clone());
        }

        Ok(())
    }
}

impl RequestCookieJar for RequestCookies {
    fn pairs(&self) -> Vec<(String, String)> {
        let mut pairs: Vec<(String, String)> = Vec::with_capacity(self.segments.len());
        for cookie in self.cookies() {
            if pairs.iter().all(|(name, _)| name != cookie.name()) {
                pairs.push((cookie.name().to_owned(), cookie.value().to_owned()));
            }
        }
        pairs
    }

    fn has(&self, name: &str) -> bool {
        self.cookies().any(|cookie| cookie.name() == name)
    }

    fn add(&mut self, name: String, value: String) {
        self.remove(&name);
        self.segments
            .push(RequestSegment::Cookie(Cookie::new(name, value)));
        self.modified = true;
    }

    fn remove(&mut self, name: &str) {
        let before = self.segments.len();
        self.segments
            .retain(|segment| segment.cookie().is_none_or(|cookie| cookie.name() != name));
        self.modified |= self.segments.len() != before;
    }
}

#[derive(Debug, Clone)]
struct SetCookieEntry {
    value: HeaderValue,
    cookie: Option<Cookie<'static>>,
}

/// The cookies carried by the `Set-Cookie` headers of a response.
///
/// Values that do not parse are kept verbatim and never duplicated.
#[derive(Debug, Clone, Default)]
pub struct SetCookies {
    entries: Vec<SetCookieEntry>,
    modified: bool,
}

impl SetCookies {
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let entries = headers
            .get_all(SET_COOKIE)
            .iter()
            .map(|value| SetCookieEntry {
                value: value.clone(),
                cookie: parse_set_cookie(value),
            })
            .collect();

        Self {
            entries,
            modified: false,
        }
    }

    pub fn is_modified(&self) -> bool {
        self.modified
    }

    /// Re-emit every `Set-Cookie` header, in order, if the jar was modified.
    pub fn write_to(&self, headers: &mut HeaderMap) {
        if !self.modified {
            return;
        }

        headers.remove(SET_COOKIE);
        for entry in &self.entries {
            headers.append(SET_COOKIE, entry.value.clone());
        }
    }
}

fn parse_set_cookie(value: &HeaderValue) -> Option<Cookie<'static>> {
    let text = match header_text(SET_COOKIE, value) {
        Ok(text) => text,
        Err(err) => {
            tracing::warn!(err = %err, "keeping set-cookie header as-is");
            return None;
        }
    };

    match Cookie::parse(text.to_owned()) {
        Ok(cookie) => Some(cookie),
        Err(err) => {
            tracing::debug!(err = %err, "keeping unparseable set-cookie header as-is");
            None
        }
    }
}

impl ResponseCookieJar for SetCookies {
    fn cookies(&self) -> Vec<Cookie<'static>> {
        self.entries
            .iter()
            .filter_map(|entry| entry.cookie.clone())
            .collect()
    }

    fn attach(&mut self, cookie: Cookie<'static>) -> Result<()> {
        let value = HeaderValue::try_from(cookie.to_string())?;
        let position = self.entries.iter().position(|entry| {
            entry
                .cookie
                .as_ref()
                .is_some_and(|existing| same_slot(existing, &cookie))
        });

        let entry = SetCookieEntry {
            value,
            cookie: Some(cookie),
        };
        match position {
            Some(index) => self.entries[index] = entry,
            None => self.entries.push(entry),
        }
        self.modified = true;

        Ok(())
    }
}
