use crate::{Expiration, ResponseCookieId, SameSite};
use std::borrow::Cow;
use std::fmt;
use time::format_description::FormatItem;
use time::macros::{datetime, format_description};
use time::{OffsetDateTime, UtcOffset};

/// A cookie set by a server in an HTTP response using the `Set-Cookie` header.
///
/// It is the instruction [`CookiePolicy`] hands over to a [`CookieSink`]:
/// every attribute has already been resolved against the policy defaults.
///
/// ## Building a `ResponseCookie`
///
/// ```rust
/// use cookie_policy::{ResponseCookie, SameSite};
///
/// let cookie = ResponseCookie::new("name", "value")
///     .set_domain("www.rust-lang.org")
///     .set_path("/")
///     .set_secure(true)
///     .set_http_only(true)
///     .set_same_site(SameSite::None);
/// assert_eq!(
///     cookie.to_string(),
///     "name=value; HttpOnly; SameSite=None; Secure; Path=/; Domain=www.rust-lang.org"
/// );
/// ```
///
/// [`CookiePolicy`]: crate::CookiePolicy
/// [`CookieSink`]: crate::CookieSink
#[derive(Debug, Clone)]
pub struct ResponseCookie<'c> {
    /// The cookie's name.
    pub(crate) name: Cow<'c, str>,
    /// The cookie's value.
    pub(crate) value: Cow<'c, str>,
    /// The cookie's expiration, if any.
    pub(crate) expires: Option<Expiration>,
    /// The cookie's domain, if any.
    pub(crate) domain: Option<Cow<'c, str>>,
    /// The cookie's path, if any.
    pub(crate) path: Option<Cow<'c, str>>,
    /// Whether this cookie was marked Secure.
    pub(crate) secure: Option<bool>,
    /// Whether this cookie was marked HttpOnly.
    pub(crate) http_only: Option<bool>,
    /// The `SameSite` attribute.
    pub(crate) same_site: Option<SameSite>,
}

impl<'c> ResponseCookie<'c> {
    /// Creates a new [`ResponseCookie`] with the given name and value.
    ///
    /// # Example
    ///
    /// ```rust
    /// use cookie_policy::ResponseCookie;
    ///
    /// let cookie = ResponseCookie::new("name", "value");
    /// assert_eq!(cookie.name_value(), ("name", "value"));
    /// assert_eq!(cookie.to_string(), "name=value");
    /// ```
    pub fn new<N, V>(name: N, value: V) -> Self
    where
        N: Into<Cow<'c, str>>,
        V: Into<Cow<'c, str>>,
    {
        ResponseCookie {
            name: name.into(),
            value: value.into(),
            expires: None,
            domain: None,
            path: None,
            secure: None,
            http_only: None,
            same_site: None,
        }
    }

    /// Converts `self` into a [`ResponseCookie`] with a static lifetime with as few
    /// allocations as possible.
    pub fn into_owned(self) -> ResponseCookie<'static> {
        let to_owned = |s: Cow<'c, str>| match s {
            Cow::Borrowed(s) => Cow::Owned(s.to_owned()),
            Cow::Owned(s) => Cow::Owned(s),
        };
        ResponseCookie {
            name: to_owned(self.name),
            value: to_owned(self.value),
            expires: self.expires,
            domain: self.domain.map(to_owned),
            path: self.path.map(to_owned),
            secure: self.secure,
            http_only: self.http_only,
            same_site: self.same_site,
        }
    }

    /// Returns the name of `self`.
    #[inline]
    pub fn name(&self) -> &str {
        self.name.as_ref()
    }

    /// Returns the value of `self`.
    #[inline]
    pub fn value(&self) -> &str {
        self.value.as_ref()
    }

    /// Returns the name and value of `self` as a tuple of `(name, value)`.
    #[inline]
    pub fn name_value(&self) -> (&str, &str) {
        (self.name(), self.value())
    }

    /// Returns whether this cookie was marked `HttpOnly` or not. Returns
    /// `Some(true)` when the cookie was explicitly set as `HttpOnly`,
    /// `Some(false)` when `http_only` was explicitly set to `false`,
    /// and `None` otherwise.
    #[inline]
    pub fn http_only(&self) -> Option<bool> {
        self.http_only
    }

    /// Returns whether this cookie was marked `Secure` or not. Returns
    /// `Some(true)` when the cookie was explicitly set as `Secure`,
    /// `Some(false)` when `secure` was explicitly set to `false`, and
    /// `None` otherwise.
    ///
    /// # Example
    ///
    /// ```
    /// use cookie_policy::ResponseCookie;
    ///
    /// let mut c = ResponseCookie::new("name", "value");
    /// assert_eq!(c.secure(), None);
    ///
    /// c = c.set_secure(false);
    /// assert_eq!(c.secure(), Some(false));
    ///
    /// c = c.set_secure(true);
    /// assert_eq!(c.secure(), Some(true));
    /// ```
    #[inline]
    pub fn secure(&self) -> Option<bool> {
        self.secure
    }

    /// Returns the `SameSite` attribute of this cookie if one was specified.
    #[inline]
    pub fn same_site(&self) -> Option<SameSite> {
        self.same_site
    }

    /// Returns the `Path` of the cookie if one was specified.
    #[inline]
    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    /// Returns the `Domain` of the cookie if one was specified.
    ///
    /// This does not consider whether the `Domain` is valid; validation is left
    /// to higher-level libraries, as needed. However, if the `Domain` starts
    /// with a leading `.`, the leading `.` is stripped.
    ///
    /// # Example
    ///
    /// ```
    /// use cookie_policy::ResponseCookie;
    ///
    /// let mut c = ResponseCookie::new("name", "value");
    /// assert_eq!(c.domain(), None);
    ///
    /// c = c.set_domain("crates.io");
    /// assert_eq!(c.domain(), Some("crates.io"));
    ///
    /// c = c.set_domain(".crates.io");
    /// assert_eq!(c.domain(), Some("crates.io"));
    /// ```
    #[inline]
    pub fn domain(&self) -> Option<&str> {
        match self.domain {
            Some(ref c) => {
                let domain = c.as_ref();
                domain.strip_prefix('.').or(Some(domain))
            }
            None => None,
        }
    }

    /// Returns the [`Expiration`] of the cookie if one was specified.
    #[inline]
    pub fn expires(&self) -> Option<Expiration> {
        self.expires
    }

    /// Returns the expiration date-time of the cookie if one was specified.
    ///
    /// It returns `None` if the cookie is a session cookie or if the expiration
    /// was not specified.
    #[inline]
    pub fn expires_datetime(&self) -> Option<OffsetDateTime> {
        self.expires.and_then(|e| e.datetime())
    }

    /// Sets the value of `http_only` in `self` to `value`. If `value` is
    /// `None`, the field is unset.
    #[inline]
    pub fn set_http_only<T: Into<Option<bool>>>(mut self, value: T) -> Self {
        self.http_only = value.into();
        self
    }

    /// Sets the value of `secure` in `self` to `value`. If `value` is `None`,
    /// the field is unset.
    #[inline]
    pub fn set_secure<T: Into<Option<bool>>>(mut self, value: T) -> Self {
        self.secure = value.into();
        self
    }

    /// Sets the value of `same_site` in `self` to `value`. If `value` is
    /// `None`, the field is unset.
    ///
    /// If `value` is `SameSite::None`, the "Secure" flag will be set when the
    /// cookie is written out unless `secure` is explicitly set to `false`.
    ///
    /// ```
    /// use cookie_policy::{ResponseCookie, SameSite};
    ///
    /// let mut c = ResponseCookie::new("name", "value");
    ///
    /// c = c.set_same_site(SameSite::None);
    /// assert_eq!(c.to_string(), "name=value; SameSite=None; Secure");
    ///
    /// c = c.set_secure(false);
    /// assert_eq!(c.to_string(), "name=value; SameSite=None");
    ///
    /// c = c.set_same_site(None);
    /// assert_eq!(c.to_string(), "name=value");
    /// ```
    #[inline]
    pub fn set_same_site<T: Into<Option<SameSite>>>(mut self, value: T) -> Self {
        self.same_site = value.into();
        self
    }

    /// Sets the `path` of `self` to `path`.
    pub fn set_path<P: Into<Cow<'c, str>>>(mut self, path: P) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Sets the `domain` of `self` to `domain`.
    pub fn set_domain<D: Into<Cow<'c, str>>>(mut self, domain: D) -> Self {
        self.domain = Some(domain.into());
        self
    }

    /// Sets the expires field of `self` to `time`. If `time` is `None`, an
    /// expiration of [`Session`](Expiration::Session) is set.
    ///
    /// # Example
    ///
    /// ```
    /// use cookie_policy::{ResponseCookie, Expiration};
    /// use cookie_policy::time::{Duration, OffsetDateTime};
    ///
    /// let mut c = ResponseCookie::new("name", "value");
    /// assert_eq!(c.expires(), None);
    ///
    /// c = c.set_expires(OffsetDateTime::now_utc() + Duration::weeks(52));
    /// assert!(c.expires().is_some());
    ///
    /// c = c.set_expires(None);
    /// assert_eq!(c.expires(), Some(Expiration::Session));
    /// ```
    pub fn set_expires<T: Into<Expiration>>(mut self, time: T) -> Self {
        static MAX_DATETIME: OffsetDateTime = datetime!(9999-12-31 23:59:59.999_999 UTC);

        // RFC 6265 requires dates not to exceed 9999 years.
        self.expires = Some(time.into().map(|time| std::cmp::min(time, MAX_DATETIME)));
        self
    }

    /// Unsets the `expires` of `self`.
    pub fn unset_expires(mut self) -> Self {
        self.expires = None;
        self
    }

    /// Returns a [`ResponseCookieId`] that can be used to identify `self` in a
    /// collection of response cookies.
    ///
    /// It takes into account the `name`, `domain`, and `path` of `self`.
    pub fn id(&self) -> ResponseCookieId<'c> {
        let mut id = ResponseCookieId::new(self.name.clone());
        if let Some(path) = self.path.as_ref() {
            id = id.set_path(path.clone());
        }
        if let Some(domain) = self.domain.as_ref() {
            id = id.set_domain(domain.clone());
        }
        id
    }

    fn fmt_parameters(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(true) = self.http_only() {
            write!(f, "; HttpOnly")?;
        }

        if let Some(same_site) = self.same_site() {
            write!(f, "; SameSite={}", same_site)?;
        }

        if self.secure() == Some(true)
            || self.secure().is_none() && self.same_site() == Some(SameSite::None)
        {
            write!(f, "; Secure")?;
        }

        if let Some(path) = self.path() {
            write!(f, "; Path={}", path)?;
        }

        if let Some(domain) = self.domain() {
            write!(f, "; Domain={}", domain)?;
        }

        if let Some(time) = self.expires_datetime() {
            let time = time.to_offset(UtcOffset::UTC);

            // From http://tools.ietf.org/html/rfc2616#section-3.3.1.
            static FMT1: &[FormatItem<'_>] = format_description!("[weekday repr:short], [day] [month repr:short] [year padding:none] [hour]:[minute]:[second] GMT");
            write!(
                f,
                "; Expires={}",
                time.format(&FMT1).map_err(|_| fmt::Error)?
            )?;
        }

        Ok(())
    }
}

impl<'c> fmt::Display for ResponseCookie<'c> {
    /// Formats the cookie `self` as a `Set-Cookie` header value.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.name(), self.value())?;
        self.fmt_parameters(f)
    }
}

impl<'a, 'b> PartialEq<ResponseCookie<'b>> for ResponseCookie<'a> {
    fn eq(&self, other: &ResponseCookie<'b>) -> bool {
        let so_far_so_good = self.name() == other.name()
            && self.value() == other.value()
            && self.http_only() == other.http_only()
            && self.secure() == other.secure()
            && self.same_site() == other.same_site()
            && self.expires() == other.expires();

        if !so_far_so_good {
            return false;
        }

        match (self.path(), other.path()) {
            (Some(a), Some(b)) if a.eq_ignore_ascii_case(b) => {}
            (None, None) => {}
            _ => return false,
        };

        match (self.domain(), other.domain()) {
            (Some(a), Some(b)) if a.eq_ignore_ascii_case(b) => {}
            (None, None) => {}
            _ => return false,
        };

        true
    }
}

impl<'a, N, V> From<(N, V)> for ResponseCookie<'a>
where
    N: Into<Cow<'a, str>>,
    V: Into<Cow<'a, str>>,
{
    fn from((name, value): (N, V)) -> Self {
        ResponseCookie::new(name, value)
    }
}
