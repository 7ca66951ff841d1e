use http::{header, HeaderMap, HeaderName};

use crate::request_cookies::ParseError;
use crate::{PolicyConfig, Processor, RequestCookies};

/// What a [`CookiePolicy`] needs to know about the in-flight request: the
/// cookies it carries and its forwarded-HTTPS signal.
///
/// Build it once per request, either by hand or from the request headers:
///
/// ```rust
/// use cookie_policy::{PolicyConfig, RequestContext};
/// use http::{header, HeaderMap};
///
/// let mut headers = HeaderMap::new();
/// headers.insert(header::COOKIE, "theme=dark; lang=en".parse().unwrap());
/// headers.insert("x-forwarded-ssl", "on".parse().unwrap());
///
/// let request = RequestContext::from_headers(&headers, &PolicyConfig::default());
/// assert_eq!(request.cookies().value("theme"), Some("dark"));
/// assert_eq!(request.https_signal(), Some("on"));
/// ```
///
/// [`CookiePolicy`]: crate::CookiePolicy
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    cookies: RequestCookies<'static>,
    https: Option<String>,
}

impl RequestContext {
    /// Creates a context for a request carrying `cookies` and no HTTPS signal.
    pub fn new(cookies: RequestCookies<'_>) -> Self {
        RequestContext {
            cookies: cookies.into_owned(),
            https: None,
        }
    }

    /// Sets the raw forwarded-HTTPS signal (e.g. `on`, `1`, `off`).
    pub fn set_https_signal<S: Into<String>>(mut self, signal: S) -> Self {
        self.https = Some(signal.into());
        self
    }

    /// Builds a context from request headers.
    ///
    /// Every `Cookie` header is parsed. A malformed name-value pair is skipped
    /// with a warning and the other cookies in the same header are kept: a stray
    /// cookie sent by the client must not take the request down. Use
    /// [`RequestContext::try_from_headers`] to surface the error.
    pub fn from_headers(headers: &HeaderMap, config: &PolicyConfig) -> Self {
        let processor = Processor::from(config);
        let mut cookies = RequestCookies::new();
        for value in headers.get_all(header::COOKIE) {
            let raw = match value.to_str() {
                Ok(raw) => raw,
                Err(e) => {
                    let error = ParseError::InvalidHeader(e);
                    warn_skipped(&error, "Ignoring a malformed `Cookie` header");
                    continue;
                }
            };
            for error in cookies.extend_from_header_lossy(raw, &processor) {
                warn_skipped(&error, "Ignoring a malformed cookie");
            }
        }
        RequestContext {
            cookies: cookies.into_owned(),
            https: https_signal(headers, config),
        }
    }

    /// Like [`RequestContext::from_headers`], but fails on the first `Cookie`
    /// header that cannot be parsed.
    pub fn try_from_headers(headers: &HeaderMap, config: &PolicyConfig) -> Result<Self, ParseError> {
        let processor = Processor::from(config);
        let mut cookies = RequestCookies::new();
        for value in headers.get_all(header::COOKIE) {
            let raw = value.to_str().map_err(ParseError::InvalidHeader)?;
            cookies.extend_from_header(raw, &processor)?;
        }
        Ok(RequestContext {
            cookies: cookies.into_owned(),
            https: https_signal(headers, config),
        })
    }

    /// The cookies attached to the request.
    pub fn cookies(&self) -> &RequestCookies<'static> {
        &self.cookies
    }

    /// The raw forwarded-HTTPS signal, if the request carried one.
    pub fn https_signal(&self) -> Option<&str> {
        self.https.as_deref()
    }
}

fn warn_skipped(error: &ParseError, message: &str) {
    tracing::warn!(
        error = %error,
        cause = ?std::error::Error::source(error),
        "{}",
        message
    );
}

fn https_signal(headers: &HeaderMap, config: &PolicyConfig) -> Option<String> {
    let name = match HeaderName::from_bytes(config.https_header.as_bytes()) {
        Ok(name) => name,
        Err(_) => {
            tracing::warn!(
                header = %config.https_header,
                "The configured HTTPS header is not a valid header name"
            );
            return None;
        }
    };
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(ToOwned::to_owned)
}

#[cfg(test)]
mod tests {
    use http::{header, HeaderMap, HeaderValue};

    use crate::request_cookies::ParseError;
    use crate::{CookiePolicy, PolicyConfig, RequestContext};

    fn headers(pairs: &[(&'static str, &'static str)]) -> HeaderMap {
        let mut headers = HeaderMap::new();
        for (name, value) in pairs {
            headers.append(*name, HeaderValue::from_static(*value));
        }
        headers
    }

    #[test]
    fn cookies_from_every_header_are_collected() {
        let headers = headers(&[("cookie", "a=1; b=2"), ("cookie", "c=3; a=4")]);
        let request = RequestContext::from_headers(&headers, &PolicyConfig::default());
        assert_eq!(request.cookies().len(), 3);
        assert_eq!(request.cookies().value("a"), Some("1"));
        assert_eq!(request.cookies().value("c"), Some("3"));
        assert_eq!(request.https_signal(), None);
    }

    #[test]
    fn malformed_headers_are_skipped_leniently() {
        let headers = headers(&[("cookie", "=oops"), ("cookie", "ok=1")]);
        let request = RequestContext::from_headers(&headers, &PolicyConfig::default());
        assert_eq!(request.cookies().value("ok"), Some("1"));
        assert_eq!(request.cookies().len(), 1);

        let err = RequestContext::try_from_headers(&headers, &PolicyConfig::default()).unwrap_err();
        assert!(matches!(err, ParseError::EmptyName(_)));
    }

    #[test]
    fn malformed_pairs_do_not_hide_their_neighbours() {
        for raw in ["session=abc; =oops", "session=abc; flag", "session=abc; bad=%FF"] {
            let headers = headers(&[("cookie", raw)]);
            let request = RequestContext::from_headers(&headers, &PolicyConfig::default());
            assert_eq!(request.cookies().value("session"), Some("abc"), "Failed for {raw}");
            assert_eq!(request.cookies().len(), 1, "Failed for {raw}");

            let policy = CookiePolicy::new(&PolicyConfig::default(), Some(&request));
            assert_eq!(policy.get_cookie("session", "<default>"), "abc");

            assert!(RequestContext::try_from_headers(&headers, &PolicyConfig::default()).is_err());
        }
    }

    #[test]
    fn non_ascii_header_is_rejected_strictly() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_bytes(b"a=\xFF").unwrap(),
        );
        let err = RequestContext::try_from_headers(&headers, &PolicyConfig::default()).unwrap_err();
        assert!(matches!(err, ParseError::InvalidHeader(_)));
    }

    #[test]
    fn https_header_is_configurable() {
        let headers = headers(&[("x-forwarded-ssl", "off"), ("x-forwarded-https", "1")]);

        let request = RequestContext::from_headers(&headers, &PolicyConfig::default());
        assert_eq!(request.https_signal(), Some("off"));

        let mut config = PolicyConfig::default();
        config.https_header = "X-Forwarded-Https".to_string();
        let request = RequestContext::from_headers(&headers, &config);
        assert_eq!(request.https_signal(), Some("1"));

        config.https_header = "not a header".to_string();
        let request = RequestContext::from_headers(&headers, &config);
        assert_eq!(request.https_signal(), None);
    }
}
