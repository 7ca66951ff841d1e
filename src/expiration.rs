use time::{Duration, OffsetDateTime};

/// A cookie's expiration: either an absolute date-time or the end of the
/// client's session.
///
/// An `Expiration` is constructible with `Expiration::from()` via any of:
///
///   * `None` -> `Expiration::Session`
///   * `Some(OffsetDateTime)` -> `Expiration::DateTime`
///   * `OffsetDateTime` -> `Expiration::DateTime`
///
/// ```rust
/// use cookie_policy::Expiration;
/// use cookie_policy::time::OffsetDateTime;
///
/// let expires = Expiration::from(None);
/// assert_eq!(expires, Expiration::Session);
///
/// let now = OffsetDateTime::now_utc();
/// assert_eq!(Expiration::from(now), Expiration::DateTime(now));
/// assert_eq!(Expiration::from(Some(now)), Expiration::DateTime(now));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Expiration {
    /// Expiration for a "permanent" cookie at a specific date-time.
    DateTime(OffsetDateTime),
    /// Expiration for a "session" cookie. Browsers define the notion of a
    /// "session" and will automatically expire session cookies when they deem
    /// the "session" to be over.
    Session,
}

impl Expiration {
    /// Computes the expiration of a cookie that should live for `max_age`,
    /// starting from `now`.
    ///
    /// A zero `max_age` yields a session cookie. A negative `max_age` yields a
    /// date-time in the past, which instructs the client to drop the cookie.
    ///
    /// ```rust
    /// use cookie_policy::Expiration;
    /// use cookie_policy::time::{Duration, OffsetDateTime};
    ///
    /// let now = OffsetDateTime::now_utc();
    /// assert_eq!(Expiration::after(now, Duration::ZERO), Expiration::Session);
    /// assert_eq!(
    ///     Expiration::after(now, Duration::seconds(30)).datetime(),
    ///     Some(now + Duration::seconds(30))
    /// );
    /// ```
    pub fn after(now: OffsetDateTime, max_age: Duration) -> Expiration {
        if max_age.is_zero() {
            Expiration::Session
        } else {
            Expiration::DateTime(now.saturating_add(max_age))
        }
    }

    /// Returns `true` if `self` is an `Expiration::DateTime`.
    pub fn is_datetime(&self) -> bool {
        match self {
            Expiration::DateTime(_) => true,
            Expiration::Session => false,
        }
    }

    /// Returns `true` if `self` is an `Expiration::Session`.
    pub fn is_session(&self) -> bool {
        match self {
            Expiration::DateTime(_) => false,
            Expiration::Session => true,
        }
    }

    /// Returns the inner date-time if `self` is a `DateTime`.
    pub fn datetime(self) -> Option<OffsetDateTime> {
        match self {
            Expiration::Session => None,
            Expiration::DateTime(v) => Some(v),
        }
    }

    /// Applies `f` to the inner date-time if `self` is a `DateTime` and
    /// returns the mapped `Expiration`.
    pub fn map<F>(self, f: F) -> Self
    where
        F: FnOnce(OffsetDateTime) -> OffsetDateTime,
    {
        match self {
            Expiration::Session => Expiration::Session,
            Expiration::DateTime(v) => Expiration::DateTime(f(v)),
        }
    }
}

impl<T: Into<Option<OffsetDateTime>>> From<T> for Expiration {
    fn from(option: T) -> Self {
        match option.into() {
            Some(value) => Expiration::DateTime(value),
            None => Expiration::Session,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Expiration;
    use time::macros::datetime;
    use time::Duration;

    #[test]
    fn after() {
        let now = datetime!(2024-03-01 12:00:00 UTC);

        assert!(Expiration::after(now, Duration::ZERO).is_session());
        assert_eq!(
            Expiration::after(now, Duration::seconds(1800)),
            Expiration::DateTime(datetime!(2024-03-01 12:30:00 UTC))
        );
        assert_eq!(
            Expiration::after(now, Duration::seconds(-86400)),
            Expiration::DateTime(datetime!(2024-02-29 12:00:00 UTC))
        );
    }
}
