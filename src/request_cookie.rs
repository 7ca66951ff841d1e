use std::borrow::Cow;

/// A cookie sent by a client in an HTTP request using the `Cookie` header.
///
/// ```rust
/// use cookie_policy::RequestCookie;
///
/// let cookie = RequestCookie::new("name", "value");
/// assert_eq!(cookie.name(), "name");
/// assert_eq!(cookie.value(), "value");
/// assert_eq!(cookie.to_string(), "name=value");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RequestCookie<'c> {
    pub(crate) name: Cow<'c, str>,
    pub(crate) value: Cow<'c, str>,
}

impl<'c> RequestCookie<'c> {
    /// Creates a new [`RequestCookie`] with the given `name` and `value`.
    pub fn new<N, V>(name: N, value: V) -> RequestCookie<'c>
    where
        N: Into<Cow<'c, str>>,
        V: Into<Cow<'c, str>>,
    {
        RequestCookie {
            name: name.into(),
            value: value.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    /// Converts `self` into a [`RequestCookie`] with a `'static` lifetime.
    pub fn into_owned(self) -> RequestCookie<'static> {
        RequestCookie {
            name: Cow::Owned(self.name.into_owned()),
            value: Cow::Owned(self.value.into_owned()),
        }
    }
}

impl std::fmt::Display for RequestCookie<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}={}", self.name, self.value)
    }
}
