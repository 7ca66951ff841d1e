use std::collections::HashMap;

use crate::sink::{CookieSink, SinkError};
use crate::{HeaderFormat, Processor, ResponseCookie, ResponseCookieId};

/// A collection of [`ResponseCookie`]s, to be sent to the client later.
///
/// It is a [`CookieSink`] that records cookies instead of writing them into
/// headers straight away: useful when the response headers are not available
/// yet, and to inspect what a [`CookiePolicy`] emitted.
///
/// Cookies are keyed by their [`ResponseCookieId`]: inserting a cookie with the
/// same name, domain and path as an existing one replaces it, while cookies with
/// the same name but a different path or domain are kept side by side.
///
/// ```rust
/// use std::collections::HashSet;
/// use cookie_policy::{HeaderFormat, Processor, ResponseCookie, ResponseCookies};
///
/// let mut cookies = ResponseCookies::new();
/// cookies.insert(ResponseCookie::new("name", "a value"));
/// cookies.insert(ResponseCookie::new("name", "a value").set_path("/"));
/// cookies.insert(ResponseCookie::new("name", "replaced").set_path("/"));
///
/// let values: HashSet<_> = cookies
///     .header_values(HeaderFormat::Structured, &Processor::default())
///     .collect();
/// assert_eq!(values, HashSet::from([
///     "name=a%20value".to_string(),
///     "name=replaced; Path=/".to_string(),
/// ]));
/// ```
///
/// [`CookiePolicy`]: crate::CookiePolicy
#[derive(Debug, Clone, Default)]
pub struct ResponseCookies<'c> {
    cookies: HashMap<ResponseCookieId<'c>, ResponseCookie<'c>>,
}

impl<'c> ResponseCookies<'c> {
    /// Creates a new, empty collection.
    pub fn new() -> Self {
        Default::default()
    }

    /// Inserts `cookie`, returning the cookie it replaced, if any.
    pub fn insert<C: Into<ResponseCookie<'c>>>(&mut self, cookie: C) -> Option<ResponseCookie<'c>> {
        let cookie = cookie.into();
        self.cookies.insert(cookie.id(), cookie)
    }

    /// Returns the cookie with the given identity, if any.
    pub fn get<'a, I: Into<ResponseCookieId<'a>>>(&self, id: I) -> Option<&ResponseCookie<'c>> {
        let id = id.into();
        self.cookies
            .iter()
            .find(|(key, _)| {
                key.name() == id.name() && key.domain() == id.domain() && key.path() == id.path()
            })
            .map(|(_, cookie)| cookie)
    }

    /// Removes the cookie with the given identity, if any.
    pub fn discard<'a, I: Into<ResponseCookieId<'a>>>(&mut self, id: I) -> Option<ResponseCookie<'c>> {
        let id = id.into();
        let key = self.cookies.keys().find(|key| {
            key.name() == id.name() && key.domain() == id.domain() && key.path() == id.path()
        })?;
        let key = key.clone();
        self.cookies.remove(&key)
    }

    pub fn len(&self) -> usize {
        self.cookies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cookies.is_empty()
    }

    /// Iterates over the cookies, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &ResponseCookie<'c>> {
        self.cookies.values()
    }

    /// Renders every cookie as a `Set-Cookie` header value.
    pub fn header_values<'a>(
        &'a self,
        format: HeaderFormat,
        processor: &'a Processor,
    ) -> impl Iterator<Item = String> + 'a {
        self.cookies
            .values()
            .map(move |cookie| format.render(cookie.clone(), processor))
    }
}

impl CookieSink for ResponseCookies<'static> {
    fn emit(&mut self, cookie: ResponseCookie<'_>) -> Result<(), SinkError> {
        self.insert(cookie.into_owned());
        Ok(())
    }
}
