//! Where cookie emission instructions end up: the response.
//!
//! [`CookiePolicy`] never formats headers itself. It resolves a
//! [`ResponseCookie`] and hands it to a [`CookieSink`]. Two header adapters
//! are provided, one per [`HeaderFormat`]:
//!
//! - [`StructuredHeaderSink`] writes `SameSite` as an attribute of its own;
//! - [`LegacyHeaderSink`] glues `; SameSite=<value>` onto the `Path`
//!   attribute, for hosts that predate the `SameSite` attribute and only pass
//!   the path through verbatim.
//!
//! Both produce the same effective cookie on the client.
//!
//! [`CookiePolicy`]: crate::CookiePolicy
use http::header::{InvalidHeaderValue, SET_COOKIE};
use http::{HeaderMap, HeaderValue};

use crate::{Processor, ResponseCookie, SameSite};

/// Receives the cookies a [`CookiePolicy`] decides to send.
///
/// [`CookiePolicy`]: crate::CookiePolicy
pub trait CookieSink {
    fn emit(&mut self, cookie: ResponseCookie<'_>) -> Result<(), SinkError>;
}

impl<S: CookieSink + ?Sized> CookieSink for &mut S {
    fn emit(&mut self, cookie: ResponseCookie<'_>) -> Result<(), SinkError> {
        (**self).emit(cookie)
    }
}

impl<S: CookieSink + ?Sized> CookieSink for Box<S> {
    fn emit(&mut self, cookie: ResponseCookie<'_>) -> Result<(), SinkError> {
        (**self).emit(cookie)
    }
}

/// How the `SameSite` attribute is encoded in `Set-Cookie` headers.
///
/// It is a property of the host, chosen once at startup.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum HeaderFormat {
    /// `SameSite` is rendered as a distinct attribute.
    #[default]
    Structured,
    /// `SameSite` is appended to the `Path` attribute value.
    Legacy,
}

impl HeaderFormat {
    /// Renders `cookie` as a `Set-Cookie` header value.
    ///
    /// ```rust
    /// use cookie_policy::{HeaderFormat, Processor, ResponseCookie, SameSite};
    ///
    /// let cookie = ResponseCookie::new("id", "42")
    ///     .set_path("/")
    ///     .set_secure(true)
    ///     .set_same_site(SameSite::None);
    /// let processor = Processor::default();
    ///
    /// assert_eq!(
    ///     HeaderFormat::Structured.render(cookie.clone(), &processor),
    ///     "id=42; SameSite=None; Secure; Path=/"
    /// );
    /// assert_eq!(
    ///     HeaderFormat::Legacy.render(cookie, &processor),
    ///     "id=42; Secure; Path=/; SameSite=None"
    /// );
    /// ```
    pub fn render(self, cookie: ResponseCookie<'_>, processor: &Processor) -> String {
        let cookie = processor.process_outgoing(cookie);
        match self {
            HeaderFormat::Structured => cookie.to_string(),
            HeaderFormat::Legacy => into_legacy(cookie).to_string(),
        }
    }

    /// Returns the header adapter for this format, writing into `headers`.
    pub fn sink(self, headers: &mut HeaderMap, processor: Processor) -> Box<dyn CookieSink + '_> {
        match self {
            HeaderFormat::Structured => Box::new(StructuredHeaderSink::new(headers, processor)),
            HeaderFormat::Legacy => Box::new(LegacyHeaderSink::new(headers, processor)),
        }
    }
}

/// Moves the `SameSite` attribute into the `Path` attribute value.
fn into_legacy(cookie: ResponseCookie<'_>) -> ResponseCookie<'_> {
    let Some(same_site) = cookie.same_site() else {
        return cookie;
    };
    let path = format!("{}; SameSite={}", cookie.path().unwrap_or_default(), same_site);
    // Without the attribute, `SameSite::None` no longer implies `Secure`.
    let secure = match cookie.secure() {
        None if same_site == SameSite::None => Some(true),
        secure => secure,
    };
    cookie
        .set_same_site(None)
        .set_secure(secure)
        .set_path(path)
}

fn append(
    headers: &mut HeaderMap,
    format: HeaderFormat,
    processor: &Processor,
    cookie: ResponseCookie<'_>,
) -> Result<(), SinkError> {
    let name = cookie.name().to_owned();
    let rendered = format.render(cookie, processor);
    let value = HeaderValue::try_from(rendered).map_err(|source| SinkError { name, source })?;
    headers.append(SET_COOKIE, value);
    Ok(())
}

/// Appends a `Set-Cookie` header per cookie, with `SameSite` as a
/// distinct attribute.
#[derive(Debug)]
pub struct StructuredHeaderSink<'h> {
    headers: &'h mut HeaderMap,
    processor: Processor,
}

impl<'h> StructuredHeaderSink<'h> {
    pub fn new(headers: &'h mut HeaderMap, processor: Processor) -> Self {
        Self { headers, processor }
    }
}

impl CookieSink for StructuredHeaderSink<'_> {
    fn emit(&mut self, cookie: ResponseCookie<'_>) -> Result<(), SinkError> {
        append(self.headers, HeaderFormat::Structured, &self.processor, cookie)
    }
}

/// Appends a `Set-Cookie` header per cookie, with `; SameSite=<value>`
/// glued onto the `Path` attribute.
#[derive(Debug)]
pub struct LegacyHeaderSink<'h> {
    headers: &'h mut HeaderMap,
    processor: Processor,
}

impl<'h> LegacyHeaderSink<'h> {
    pub fn new(headers: &'h mut HeaderMap, processor: Processor) -> Self {
        Self { headers, processor }
    }
}

impl CookieSink for LegacyHeaderSink<'_> {
    fn emit(&mut self, cookie: ResponseCookie<'_>) -> Result<(), SinkError> {
        append(self.headers, HeaderFormat::Legacy, &self.processor, cookie)
    }
}

#[derive(Debug, thiserror::Error)]
#[error("Failed to write the `{name}` cookie into a `Set-Cookie` header")]
/// A cookie that cannot be represented as a header value, e.g. because one of
/// its attributes contains control characters.
pub struct SinkError {
    name: String,
    #[source]
    source: InvalidHeaderValue,
}

impl SinkError {
    /// The name of the cookie that could not be emitted.
    pub fn cookie_name(&self) -> &str {
        &self.name
    }
}
