use std::fmt;

/// The `SameSite` cookie attribute.
///
/// It tells the client under which cross-site conditions the cookie may be
/// attached to a request:
///
/// - `Strict`: never in cross-site requests.
/// - `Lax`: only in cross-site top-level navigations with "safe" HTTP methods.
/// - `None`: in all cross-site requests, provided the cookie is also `Secure`.
///   Clients ignore `SameSite=None` cookies that are not `Secure`.
///
/// [`CookiePolicy`] attaches `SameSite::None` to every cookie it writes with
/// the `Secure` attribute set.
///
/// [`CookiePolicy`]: crate::CookiePolicy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum SameSite {
    /// The "Strict" `SameSite` attribute.
    #[cfg_attr(feature = "serde", serde(alias = "strict"))]
    Strict,
    /// The "Lax" `SameSite` attribute.
    #[cfg_attr(feature = "serde", serde(alias = "lax"))]
    Lax,
    /// The "None" `SameSite` attribute.
    #[cfg_attr(feature = "serde", serde(alias = "none"))]
    None,
}

impl SameSite {
    /// Returns `true` if `self` is `SameSite::None` and `false` otherwise.
    ///
    /// # Example
    ///
    /// ```rust
    /// use cookie_policy::SameSite;
    ///
    /// assert!(SameSite::None.is_none());
    /// assert!(!SameSite::Lax.is_none());
    /// ```
    #[inline]
    pub fn is_none(&self) -> bool {
        match *self {
            SameSite::None => true,
            SameSite::Lax | SameSite::Strict => false,
        }
    }

    /// Returns the `SameSite` attribute as a string slice.
    pub fn as_str(&self) -> &'static str {
        match *self {
            SameSite::Strict => "Strict",
            SameSite::Lax => "Lax",
            SameSite::None => "None",
        }
    }
}

impl fmt::Display for SameSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
