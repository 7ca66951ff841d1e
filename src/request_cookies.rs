use std::borrow::Cow;
use std::collections::HashMap;

use crate::processor::{DecodingError, Processor};
use crate::RequestCookie;

#[derive(Default, Debug, Clone)]
/// The cookies attached to an HTTP request using the `Cookie` header.
///
/// A client may send several cookies with the same name (e.g. set for
/// different paths): all values are kept, in the order they were received.
pub struct RequestCookies<'cookie> {
    /// Invariant: the `Vec` for a given `name` is never empty.
    cookies: HashMap<Cow<'cookie, str>, Vec<Cow<'cookie, str>>>,
}

impl<'cookie> RequestCookies<'cookie> {
    /// Creates a new, empty [`RequestCookies`] map.
    pub fn new() -> RequestCookies<'cookie> {
        Default::default()
    }

    /// Inserts a new [`RequestCookie`] into `self`.
    ///
    /// If a cookie with the same name already exists, **the new value is appended
    /// to the existing value list**.
    ///
    /// Returns `true` if `self` already contained one or more cookies with the same name.
    ///
    /// # Example
    ///
    /// ```rust
    /// use cookie_policy::{RequestCookie, RequestCookies};
    ///
    /// let mut cookies = RequestCookies::new();
    /// assert!(!cookies.append(RequestCookie::new("name", "value1")));
    /// assert!(cookies.append(RequestCookie::new("name", "value2")));
    /// // `get` keeps returning the first value.
    /// assert_eq!(cookies.get("name").unwrap().value(), "value1");
    /// ```
    pub fn append<C>(&mut self, cookie: C) -> bool
    where
        C: Into<RequestCookie<'cookie>>,
    {
        let RequestCookie { name, value } = cookie.into();
        let output = self.cookies.contains_key(&name);
        self.cookies.entry(name).or_default().push(value);
        output
    }

    /// Get a cookie by name.
    ///
    /// If there are multiple cookie values associated to the name, this method returns the
    /// first one.
    pub fn get(&self, name: &str) -> Option<RequestCookie<'cookie>> {
        self.cookies.get_key_value(name).and_then(|(name, v)| {
            v.first()
                .map(|first| RequestCookie::new(name.clone(), first.clone()))
        })
    }

    /// Get the first value for the cookie named `name`, without cloning it.
    pub fn value(&self, name: &str) -> Option<&str> {
        self.cookies
            .get(name)
            .and_then(|v| v.first())
            .map(|v| v.as_ref())
    }

    /// Get the first value for the cookie named `name`, falling back to `default`
    /// if there is no such cookie.
    ///
    /// # Example
    ///
    /// ```rust
    /// use cookie_policy::{RequestCookie, RequestCookies};
    ///
    /// let mut cookies = RequestCookies::new();
    /// cookies.append(RequestCookie::new("theme", "dark"));
    /// assert_eq!(cookies.get_or("theme", "light"), "dark");
    /// assert_eq!(cookies.get_or("lang", "en"), "en");
    /// ```
    pub fn get_or<'a>(&'a self, name: &str, default: &'a str) -> &'a str {
        self.value(name).unwrap_or(default)
    }

    /// Returns `true` if there is at least one cookie named `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.cookies.contains_key(name)
    }

    /// The number of distinct cookie names.
    pub fn len(&self) -> usize {
        self.cookies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cookies.is_empty()
    }

    /// Converts `self` into a map with a `'static` lifetime, detaching it
    /// from the header it was parsed from.
    pub fn into_owned(self) -> RequestCookies<'static> {
        let cookies = self
            .cookies
            .into_iter()
            .map(|(name, values)| {
                let values = values
                    .into_iter()
                    .map(|v| Cow::Owned(v.into_owned()))
                    .collect();
                (Cow::Owned(name.into_owned()), values)
            })
            .collect();
        RequestCookies { cookies }
    }

    /// Parse a `Cookie` header value into a [`RequestCookies`] map.
    ///
    /// ```rust
    /// use cookie_policy::{Processor, RequestCookies};
    ///
    /// let cookies = RequestCookies::parse_header(
    ///     "name=first%20value; name2=val; name=another%20value",
    ///     &Processor::default(),
    /// ).unwrap();
    /// assert_eq!(cookies.value("name"), Some("first value"));
    /// assert_eq!(cookies.value("name2"), Some("val"));
    /// ```
    pub fn parse_header(
        header: &'cookie str,
        processor: &Processor,
    ) -> Result<RequestCookies<'cookie>, ParseError> {
        Self::parse_headers(std::iter::once(header), processor)
    }

    /// Parse a `Cookie` header value and append its value to the existing [`RequestCookies`] map.
    ///
    /// It fails on the first malformed name-value pair, leaving the cookies parsed
    /// before it in `self`.
    pub fn extend_from_header(
        &mut self,
        header: &'cookie str,
        processor: &Processor,
    ) -> Result<(), ParseError> {
        for fragment in fragments(header) {
            let cookie = parse_pair(fragment, processor)?;
            self.append(cookie);
        }
        Ok(())
    }

    /// Like [`RequestCookies::extend_from_header`], but a malformed name-value pair
    /// is skipped instead of aborting the parse.
    ///
    /// Returns the errors for the skipped pairs.
    ///
    /// ```rust
    /// use cookie_policy::{Processor, RequestCookies};
    ///
    /// let mut cookies = RequestCookies::new();
    /// let skipped = cookies.extend_from_header_lossy("session=abc; flag; =oops", &Processor::default());
    /// assert_eq!(skipped.len(), 2);
    /// assert_eq!(cookies.value("session"), Some("abc"));
    /// ```
    pub fn extend_from_header_lossy(
        &mut self,
        header: &'cookie str,
        processor: &Processor,
    ) -> Vec<ParseError> {
        let mut skipped = Vec::new();
        for fragment in fragments(header) {
            match parse_pair(fragment, processor) {
                Ok(cookie) => {
                    self.append(cookie);
                }
                Err(e) => skipped.push(e),
            }
        }
        skipped
    }

    /// Parse multiple `Cookie` header values into a [`RequestCookies`] map.
    pub fn parse_headers<I>(
        headers: I,
        processor: &Processor,
    ) -> Result<RequestCookies<'cookie>, ParseError>
    where
        I: IntoIterator<Item = &'cookie str>,
    {
        let mut cookies = RequestCookies::new();
        for header in headers {
            cookies.extend_from_header(header, processor)?;
        }
        Ok(cookies)
    }
}

/// The non-blank `;`-separated fragments of a `Cookie` header value.
fn fragments(header: &str) -> impl Iterator<Item = &str> {
    header
        .split(';')
        .filter(|fragment| !fragment.chars().all(char::is_whitespace))
}

fn parse_pair<'c>(fragment: &'c str, processor: &Processor) -> Result<RequestCookie<'c>, ParseError> {
    let (name, value) = match fragment.split_once('=') {
        Some((name, value)) => (name.trim(), value.trim()),
        None => {
            let e = MissingPairError {
                fragment: fragment.to_string(),
            };
            return Err(ParseError::MissingPair(e));
        }
    };

    if name.is_empty() {
        let e = EmptyNameError {
            value: value.to_string(),
        };
        return Err(ParseError::EmptyName(e));
    }

    processor
        .process_incoming(name, value)
        .map_err(ParseError::Decoding)
}

#[derive(Debug)]
#[non_exhaustive]
/// The error returned by [`RequestCookies::parse_header()`].
pub enum ParseError {
    MissingPair(MissingPairError),
    EmptyName(EmptyNameError),
    Decoding(DecodingError),
    /// A `Cookie` header value that is not visible ASCII.
    InvalidHeader(http::header::ToStrError),
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Failed to parse cookies out of a header value")
    }
}

impl std::error::Error for ParseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ParseError::MissingPair(e) => Some(e),
            ParseError::EmptyName(e) => Some(e),
            ParseError::Decoding(e) => Some(e),
            ParseError::InvalidHeader(e) => Some(e),
        }
    }
}

#[derive(Debug)]
/// A fragment of a `Cookie` header value without a name-value separator (`=`).
pub struct MissingPairError {
    fragment: String,
}

impl std::fmt::Display for MissingPairError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Expected a name-value pair, but no `=` was found in `{}`",
            self.fragment
        )
    }
}

impl std::error::Error for MissingPairError {}

#[derive(Debug)]
/// A fragment of a `Cookie` header value with an empty name (e.g. `=value`).
pub struct EmptyNameError {
    value: String,
}

impl std::fmt::Display for EmptyNameError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "The name of a cookie cannot be empty, but found an empty name with `{}` as value",
            self.value
        )
    }
}

impl std::error::Error for EmptyNameError {}

#[cfg(test)]
mod tests {
    use std::error::Error;

    use googletest::matcher::{Matcher, MatcherResult};
    use googletest::prelude::{displays_as, eq};

    use crate::{Processor, RequestCookie, RequestCookies};

    /// E.g. `cookies!("name" => "value", "other" => "key")` builds an `Ok`
    /// map with those two cookies, in order.
    macro_rules! cookies {
        ($($name:expr => $value:expr),* $(,)?) => {
            {
                #[allow(unused_mut)]
                let mut cookies = RequestCookies::new();
                $(
                    cookies.append(RequestCookie::new($name, $value));
                )*
                Ok(cookies)
            }
        };
    }

    #[track_caller]
    fn check_case<'a>(
        string: &'a str,
        processor: &Processor,
        expected: Result<RequestCookies<'a>, Box<dyn Matcher<ActualT = String>>>,
    ) {
        let actual = RequestCookies::parse_header(string, processor);
        match &actual {
            Ok(actual) => {
                let expected =
                    expected.unwrap_or_else(|_| panic!("Expected a success for {string}"));
                assert_eq!(actual.len(), expected.len(), "Failed for string: {string}");
                for (name, values) in expected.cookies {
                    let actual_values = actual
                        .cookies
                        .get(&name)
                        .unwrap_or_else(|| panic!("No entry for {name} and raw string {string}"));
                    assert_eq!(actual_values, &values, "Failed for string: {string}");
                }
            }
            Err(err) => {
                let source = err.source().unwrap().to_string();
                let matcher = expected.expect_err(&format!("Expected an error for {string}"));
                let error = format!(
                    "Expected: {}\n\
                    Actual: {err},\n\
                    {}\n",
                    matcher.describe(MatcherResult::Match),
                    matcher.explain_match(&source)
                );
                assert!(matcher.matches(&source).is_match(), "{error}");
            }
        }
    }

    fn err_str(s: &'static str) -> Box<dyn Matcher<ActualT = String>> {
        Box::new(displays_as(eq(s)))
    }

    #[test]
    fn parse_verbatim() {
        let cases = [
            ("", cookies![]),
            (";;", cookies![]),
            ("name=value", cookies!["name" => "value"]),
            ("a=%20", cookies!["a" => "%20"]),
            ("  name=value  ", cookies!["name" => "value"]),
            (
                "name=value ;  ; other=key;; ",
                cookies!["name" => "value", "other" => "key"],
            ),
            (";a=1 ;  ; b= ", cookies!["a" => "1", "b" => ""]),
            (" ;   a=1 ;  ; ;;c===  ", cookies!["a" => "1", "c" => "=="]),
            ("a=1; a=2", cookies!["a" => "1", "a" => "2"]),
            (";a=1 ;  ; =v ; c=", Err(err_str("The name of a cookie cannot be empty, but found an empty name with `v` as value"))),
            ("yo", Err(err_str("Expected a name-value pair, but no `=` was found in `yo`"))),
        ];

        for (string, expected) in cases {
            check_case(string, &Processor::verbatim(), expected)
        }
    }

    #[test]
    fn parse_encoded() {
        let cases = [
            ("a=%20", cookies!["a" => " "]),
            ("a%20or%20b=1", cookies!["a or b" => "1"]),
            ("a=d#$%^&*()_", cookies!["a" => "d#$%^&*()_"]),
            (
                "a=%F1%F2%F3%C0%C1%C2",
                Err(err_str(
                    "Failed to percent-decode the value of the `a` cookie: `%F1%F2%F3%C0%C1%C2`",
                )),
            ),
        ];

        for (string, expected) in cases {
            check_case(string, &Processor::default(), expected)
        }
    }

    #[test]
    fn lookups() {
        let cookies = RequestCookies::parse_header("a=1; b=2; a=3", &Processor::default())
            .unwrap()
            .into_owned();
        assert_eq!(cookies.value("a"), Some("1"));
        assert_eq!(cookies.get_or("b", "x"), "2");
        assert_eq!(cookies.get_or("c", "x"), "x");
        assert!(cookies.contains("a"));
        assert!(!cookies.contains("c"));
        assert_eq!(cookies.get("a"), Some(RequestCookie::new("a", "1")));
    }

    #[test]
    fn lossy_parse_skips_only_malformed_pairs() {
        let cases = [
            ("session=abc; =oops", 1),
            ("session=abc; flag", 1),
            ("session=abc; bad=%FF", 1),
            ("=x; session=abc; y; other=1", 2),
            ("session=abc", 0),
        ];
        for (header, expected_skipped) in cases {
            let mut cookies = RequestCookies::new();
            let skipped = cookies.extend_from_header_lossy(header, &Processor::default());
            assert_eq!(skipped.len(), expected_skipped, "Failed for {header}");
            assert_eq!(cookies.value("session"), Some("abc"), "Failed for {header}");
            assert!(!cookies.contains("bad"), "Failed for {header}");

            let mut strict = RequestCookies::new();
            assert_eq!(
                strict.extend_from_header(header, &Processor::default()).is_err(),
                expected_skipped > 0,
                "Failed for {header}"
            );
        }
    }
}
