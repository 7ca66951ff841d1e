use std::borrow::Cow;

/// The identity of a [`ResponseCookie`] on the client: its name, domain and path.
///
/// Two cookies with the same name but a different domain or path are distinct
/// cookies for the client, so [`ResponseCookies`] keeps both.
///
/// # Example
///
/// ```
/// use cookie_policy::ResponseCookieId;
///
/// let id = ResponseCookieId::new("name").set_domain("rust-lang.org").set_path("/");
/// assert_eq!(id.name(), "name");
/// assert_eq!(id.domain(), Some("rust-lang.org"));
/// assert_eq!(id.path(), Some("/"));
/// ```
///
/// [`ResponseCookie`]: crate::ResponseCookie
/// [`ResponseCookies`]: crate::ResponseCookies
#[derive(Clone, Debug, Hash, PartialEq, Eq)]
pub struct ResponseCookieId<'c> {
    pub(crate) name: Cow<'c, str>,
    pub(crate) domain: Option<Cow<'c, str>>,
    pub(crate) path: Option<Cow<'c, str>>,
}

impl<'c> ResponseCookieId<'c> {
    /// Creates a new [`ResponseCookieId`] with the given name.
    pub fn new<N: Into<Cow<'c, str>>>(name: N) -> ResponseCookieId<'c> {
        ResponseCookieId {
            name: name.into(),
            domain: None,
            path: None,
        }
    }

    /// Sets the domain of the cookie.
    pub fn set_domain<P: Into<Cow<'c, str>>>(mut self, domain: P) -> ResponseCookieId<'c> {
        self.domain = Some(domain.into());
        self
    }

    /// Sets the path of the cookie.
    pub fn set_path<P: Into<Cow<'c, str>>>(mut self, path: P) -> ResponseCookieId<'c> {
        self.path = Some(path.into());
        self
    }

    #[inline]
    pub fn name(&self) -> &str {
        self.name.as_ref()
    }

    #[inline]
    pub fn domain(&self) -> Option<&str> {
        self.domain.as_deref()
    }

    #[inline]
    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    /// Converts `self` into an identifier with a `'static` lifetime.
    pub fn into_owned(self) -> ResponseCookieId<'static> {
        ResponseCookieId {
            name: Cow::Owned(self.name.into_owned()),
            domain: self.domain.map(|d| Cow::Owned(d.into_owned())),
            path: self.path.map(|p| Cow::Owned(p.into_owned())),
        }
    }
}

impl<'a> From<&'a str> for ResponseCookieId<'a> {
    fn from(value: &'a str) -> ResponseCookieId<'a> {
        ResponseCookieId::new(value)
    }
}
