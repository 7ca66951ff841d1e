use std::borrow::Cow;

use time::{Duration, OffsetDateTime};

use crate::sink::{CookieSink, SinkError};
use crate::truthy::is_truthy;
use crate::{Expiration, PolicyConfig, RequestContext, ResponseCookie, SameSite};

/// The lifetime of a cookie written without an explicit max-age: 30 minutes.
pub const DEFAULT_MAX_AGE: Duration = Duration::seconds(1800);

/// The max-age used by [`CookiePolicy::delete_cookie`]: one day in the past.
pub const REMOVAL_MAX_AGE: Duration = Duration::seconds(-86400);

/// Applies default attributes when reading, writing and expiring cookies for
/// a single request.
///
/// A `CookiePolicy` is built per request, from the process-wide
/// [`PolicyConfig`] and the [`RequestContext`] of that request. It only stores
/// the default attributes: cookie names and values never outlive the call that
/// handles them.
///
/// # The `Secure` default
///
/// If [`PolicyConfig::secure`] is unset, the default is inferred **once**, at
/// construction, from the forwarded-HTTPS signal of the request (`on`, `1`,
/// `true` or `yes`, case-insensitive). Without a request, it is `false`.
///
/// # Example
///
/// ```rust
/// use cookie_policy::{
///     CookieAttributes, CookiePolicy, PolicyConfig, RequestContext, RequestCookie,
///     RequestCookies, ResponseCookieId, ResponseCookies, SetOutcome, DEFAULT_MAX_AGE,
/// };
///
/// let mut config = PolicyConfig::default();
/// config.path = Some("/".to_string());
///
/// let mut cookies = RequestCookies::new();
/// cookies.append(RequestCookie::new("theme", "dark"));
/// let request = RequestContext::new(cookies).set_https_signal("on");
///
/// let policy = CookiePolicy::new(&config, Some(&request));
/// assert!(policy.secure());
/// assert_eq!(policy.get_cookie("theme", "light"), "dark");
///
/// let mut sink = ResponseCookies::new();
/// let outcome = policy
///     .set_cookie(&mut sink, "lang", "en", DEFAULT_MAX_AGE, &CookieAttributes::new())
///     .unwrap();
/// assert_eq!(outcome, SetOutcome::Emitted);
///
/// // Cookies are identified by name, domain and path.
/// let cookie = sink.get(ResponseCookieId::new("lang").set_path("/")).unwrap();
/// assert_eq!(cookie.value(), "en");
/// assert_eq!(cookie.secure(), Some(true));
/// assert!(cookie.same_site().unwrap().is_none());
/// ```
#[derive(Debug, Clone)]
pub struct CookiePolicy<'r> {
    path: Option<String>,
    domain: Option<String>,
    secure: bool,
    http_only: bool,
    test_mode: bool,
    request: Option<&'r RequestContext>,
}

impl<'r> CookiePolicy<'r> {
    /// Builds the policy for the request described by `request`, or for no
    /// request at all (e.g. in a background job).
    pub fn new(config: &PolicyConfig, request: Option<&'r RequestContext>) -> Self {
        let secure = match (config.secure, request) {
            (Some(secure), _) => secure,
            (None, Some(request)) => {
                let signal = request.https_signal();
                let secure = signal.is_some_and(is_truthy);
                tracing::debug!(signal = ?signal, secure, "Inferred the `Secure` cookie default");
                secure
            }
            (None, None) => false,
        };

        CookiePolicy {
            path: non_empty(config.path.as_deref()).map(ToOwned::to_owned),
            domain: non_empty(config.domain.as_deref()).map(ToOwned::to_owned),
            secure,
            http_only: config.http_only,
            test_mode: config.test_mode,
            request,
        }
    }

    /// The default `Path` attribute.
    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    /// The default `Domain` attribute.
    pub fn domain(&self) -> Option<&str> {
        self.domain.as_deref()
    }

    /// The default `Secure` attribute, as resolved at construction.
    pub fn secure(&self) -> bool {
        self.secure
    }

    /// The default `HttpOnly` attribute.
    pub fn http_only(&self) -> bool {
        self.http_only
    }

    /// Whether cookie emission is disabled.
    pub fn test_mode(&self) -> bool {
        self.test_mode
    }

    /// The request this policy was built for, if any.
    pub fn request(&self) -> Option<&'r RequestContext> {
        self.request
    }

    /// Returns the value of the request cookie named `name`.
    ///
    /// Returns `None` if there is no such cookie, or no request.
    pub fn cookie(&self, name: &str) -> Option<&'r str> {
        self.request?.cookies().value(name)
    }

    /// Returns the value of the request cookie named `name`, or `default` if
    /// there is no such cookie, or no request.
    pub fn get_cookie<'a>(&self, name: &str, default: &'a str) -> &'a str
    where
        'r: 'a,
    {
        self.cookie(name).unwrap_or(default)
    }

    /// Sends the cookie `name=value` to `sink`, resolving every attribute
    /// left unset in `attributes` against the policy defaults.
    ///
    /// - A zero `max_age` makes a session cookie. Otherwise the cookie expires
    ///   at `now + max_age`. [`DEFAULT_MAX_AGE`] is the customary value.
    /// - A `Secure` cookie is also marked `SameSite=None`.
    ///
    /// Nothing is emitted, and the call still succeeds, when there is no
    /// request or in test mode: the returned [`SetOutcome`] tells which.
    ///
    /// # Errors
    ///
    /// Only the errors of `sink` itself.
    pub fn set_cookie<'c, S, N, V>(
        &self,
        sink: &mut S,
        name: N,
        value: V,
        max_age: Duration,
        attributes: &CookieAttributes<'_>,
    ) -> Result<SetOutcome, SinkError>
    where
        S: CookieSink + ?Sized,
        N: Into<Cow<'c, str>>,
        V: Into<Cow<'c, str>>,
    {
        let name = name.into();
        let outcome = if self.request.is_none() {
            SetOutcome::NoRequest
        } else if self.test_mode {
            SetOutcome::TestMode
        } else {
            SetOutcome::Emitted
        };
        if outcome != SetOutcome::Emitted {
            tracing::debug!(cookie = %name, reason = ?outcome, "Skipping cookie emission");
            return Ok(outcome);
        }

        let cookie = self.resolve_at(OffsetDateTime::now_utc(), name, value, max_age, attributes);
        tracing::trace!(
            cookie = %cookie.name(),
            secure = ?cookie.secure(),
            session = cookie.expires_datetime().is_none(),
            "Emitting cookie"
        );
        sink.emit(cookie)?;
        Ok(SetOutcome::Emitted)
    }

    /// Expires the cookie `name` on the client.
    ///
    /// Equivalent to [`CookiePolicy::set_cookie`] with an empty value and
    /// [`REMOVAL_MAX_AGE`]: the same `attributes` resolve to the same path,
    /// domain and flags, so the client matches the cookie it has to drop.
    pub fn delete_cookie<'c, S, N>(
        &self,
        sink: &mut S,
        name: N,
        attributes: &CookieAttributes<'_>,
    ) -> Result<SetOutcome, SinkError>
    where
        S: CookieSink + ?Sized,
        N: Into<Cow<'c, str>>,
    {
        self.set_cookie(sink, name, "", REMOVAL_MAX_AGE, attributes)
    }

    /// Builds the cookie [`CookiePolicy::set_cookie`] would emit at `now`,
    /// regardless of the request or test mode.
    pub fn resolve_at<'c, N, V>(
        &self,
        now: OffsetDateTime,
        name: N,
        value: V,
        max_age: Duration,
        attributes: &CookieAttributes<'_>,
    ) -> ResponseCookie<'c>
    where
        N: Into<Cow<'c, str>>,
        V: Into<Cow<'c, str>>,
    {
        let secure = attributes.secure.unwrap_or(self.secure);
        let http_only = attributes.http_only.unwrap_or(self.http_only);
        let path = non_empty(attributes.path.as_deref()).or(self.path.as_deref());
        let domain = non_empty(attributes.domain.as_deref()).or(self.domain.as_deref());

        let mut cookie = ResponseCookie::new(name, value)
            .set_expires(Expiration::after(now, max_age))
            .set_secure(secure)
            .set_http_only(http_only);
        if let Some(path) = path {
            cookie = cookie.set_path(path.to_owned());
        }
        if let Some(domain) = domain {
            cookie = cookie.set_domain(domain.to_owned());
        }
        if secure {
            cookie = cookie.set_same_site(SameSite::None);
        }
        cookie
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

/// Per-call overrides for [`CookiePolicy::set_cookie`] and
/// [`CookiePolicy::delete_cookie`].
///
/// Every attribute left unset falls back to the policy default. An empty
/// path or domain counts as unset.
///
/// ```rust
/// use cookie_policy::CookieAttributes;
///
/// let attributes = CookieAttributes::new()
///     .set_path("/account")
///     .set_secure(false);
/// assert_eq!(attributes.path(), Some("/account"));
/// assert_eq!(attributes.secure(), Some(false));
/// assert_eq!(attributes.http_only(), None);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CookieAttributes<'a> {
    path: Option<Cow<'a, str>>,
    domain: Option<Cow<'a, str>>,
    secure: Option<bool>,
    http_only: Option<bool>,
}

impl<'a> CookieAttributes<'a> {
    /// No overrides: every attribute comes from the policy defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides the default `Path`.
    pub fn set_path<P: Into<Cow<'a, str>>>(mut self, path: P) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Overrides the default `Domain`.
    pub fn set_domain<D: Into<Cow<'a, str>>>(mut self, domain: D) -> Self {
        self.domain = Some(domain.into());
        self
    }

    /// Overrides the default `Secure` flag. `None` restores the default.
    pub fn set_secure<T: Into<Option<bool>>>(mut self, secure: T) -> Self {
        self.secure = secure.into();
        self
    }

    /// Overrides the default `HttpOnly` flag. `None` restores the default.
    pub fn set_http_only<T: Into<Option<bool>>>(mut self, http_only: T) -> Self {
        self.http_only = http_only.into();
        self
    }

    /// The `Path` override, if any.
    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    /// The `Domain` override, if any.
    pub fn domain(&self) -> Option<&str> {
        self.domain.as_deref()
    }

    /// The `Secure` override, if any.
    pub fn secure(&self) -> Option<bool> {
        self.secure
    }

    /// The `HttpOnly` override, if any.
    pub fn http_only(&self) -> Option<bool> {
        self.http_only
    }
}

/// What [`CookiePolicy::set_cookie`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetOutcome {
    /// The cookie was handed to the sink.
    Emitted,
    /// There is no request to answer: nothing was emitted.
    NoRequest,
    /// The policy runs in test mode: nothing was emitted.
    TestMode,
}

impl SetOutcome {
    pub fn is_emitted(&self) -> bool {
        matches!(self, SetOutcome::Emitted)
    }
}
