use std::collections::HashMap;

use tower_cookies::Cookie;

use crate::error::Result;

/// The cookies a client sent with a request, keyed by name.
pub trait RequestCookieJar {
    /// All `(name, value)` pairs. Names are unique.
    fn pairs(&self) -> Vec<(String, String)>;
    fn has(&self, name: &str) -> bool;
    fn add(&mut self, name: String, value: String);
    fn remove(&mut self, name: &str);
}

/// The cookies a response asks the client to store.
pub trait ResponseCookieJar {
    fn cookies(&self) -> Vec<Cookie<'static>>;

    /// Attach a cookie, replacing one with the same name, path and domain if present.
    fn attach(&mut self, cookie: Cookie<'static>) -> Result<()>;
}

impl RequestCookieJar for HashMap<String, String> {
    fn pairs(&self) -> Vec<(String, String)> {
        self.iter()
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect()
    }

    fn has(&self, name: &str) -> bool {
        self.contains_key(name)
    }

    fn add(&mut self, name: String, value: String) {
        self.insert(name, value);
    }

    fn remove(&mut self, name: &str) {
        HashMap::remove(self, name);
    }
}

impl ResponseCookieJar for Vec<Cookie<'static>> {
    fn cookies(&self) -> Vec<Cookie<'static>> {
        self.clone()
    }

    fn attach(&mut self, cookie: Cookie<'static>) -> Result<()> {
        match self.iter_mut().find(|existing| same_slot(existing, &cookie)) {
            Some(existing) => *existing = cookie,
            None => self.push(cookie),
        }
        Ok(())
    }
}

/// Whether two response cookies address the same client-side cookie.
pub(crate) fn same_slot(a: &Cookie<'_>, b: &Cookie<'_>) -> bool {
    let same_domain = match (a.domain(), b.domain()) {
        (Some(a), Some(b)) => a.eq_ignore_ascii_case(b),
        (None, None) => true,
        _ => false,
    };
    a.name() == b.name() && a.path() == b.path() && same_domain
}
