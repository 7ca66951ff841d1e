//! Process-wide settings for a [`CookiePolicy`].
//!
//! Check out the [`PolicyConfig`] struct for more information.
//!
//! [`CookiePolicy`]: crate::CookiePolicy
use crate::HeaderFormat;

/// The header that carries the forwarded-HTTPS signal if none is configured.
pub const DEFAULT_HTTPS_HEADER: &str = "X-Forwarded-Ssl";

/// `PolicyConfig` holds the cookie defaults shared by every request.
///
/// It is loaded once, at startup, and handed by reference to
/// [`CookiePolicy::new`] for each incoming request.
///
/// ```rust
/// use cookie_policy::PolicyConfig;
///
/// let mut config = PolicyConfig::default();
/// config.path = Some("/".to_string());
/// config.domain = Some("example.com".to_string());
/// config.http_only = true;
/// // `secure` is left unset: it will be inferred from each request.
/// assert_eq!(config.secure, None);
/// ```
///
/// With the `serde` feature enabled, the field names follow the
/// `cookie_*` setting keys:
///
/// ```rust
/// # #[cfg(feature = "serde")]
/// # {
/// use cookie_policy::{HeaderFormat, PolicyConfig};
///
/// let config: PolicyConfig = serde_json::from_str(r#"{
///     "cookie_path": "/app",
///     "cookie_secure": "",
///     "cookie_http": true,
///     "header_format": "legacy"
/// }"#).unwrap();
/// assert_eq!(config.path.as_deref(), Some("/app"));
/// assert_eq!(config.secure, None);
/// assert_eq!(config.header_format, HeaderFormat::Legacy);
/// # }
/// ```
///
/// [`CookiePolicy::new`]: crate::CookiePolicy::new
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PolicyConfig {
    /// The default `Path` attribute.
    #[cfg_attr(feature = "serde", serde(rename = "cookie_path"))]
    pub path: Option<String>,
    /// The default `Domain` attribute.
    #[cfg_attr(feature = "serde", serde(rename = "cookie_domain"))]
    pub domain: Option<String>,
    /// The default `Secure` attribute.
    ///
    /// When `None`, the value is inferred from the forwarded-HTTPS signal of
    /// the request the policy is built for.
    ///
    /// When deserializing, this accepts a boolean, a flag string such as
    /// `"on"` or `"0"`, or an empty string/null to leave it unset.
    #[cfg_attr(
        feature = "serde",
        serde(rename = "cookie_secure", deserialize_with = "deser::secure")
    )]
    pub secure: Option<bool>,
    /// The default `HttpOnly` attribute.
    #[cfg_attr(feature = "serde", serde(rename = "cookie_http"))]
    pub http_only: bool,
    /// If `true`, [`CookiePolicy::set_cookie`] and [`CookiePolicy::delete_cookie`]
    /// never emit anything.
    ///
    /// [`CookiePolicy::set_cookie`]: crate::CookiePolicy::set_cookie
    /// [`CookiePolicy::delete_cookie`]: crate::CookiePolicy::delete_cookie
    pub test_mode: bool,
    /// The request header carrying the forwarded-HTTPS signal (`on`/`off`, `1`/`0`).
    ///
    /// By default, [`DEFAULT_HTTPS_HEADER`].
    pub https_header: String,
    /// How the `SameSite` attribute is encoded in `Set-Cookie` headers.
    pub header_format: HeaderFormat,
    /// If `true`, cookie names and values are percent-encoded in `Set-Cookie`
    /// headers and percent-decoded when parsed from the `Cookie` header.
    ///
    /// By default, this field is `true`.
    pub percent_encode: bool,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        PolicyConfig {
            path: None,
            domain: None,
            secure: None,
            http_only: false,
            test_mode: false,
            https_header: DEFAULT_HTTPS_HEADER.to_string(),
            header_format: HeaderFormat::default(),
            percent_encode: true,
        }
    }
}

#[cfg(feature = "serde")]
mod deser {
    use crate::truthy::filter_bool;
    use serde::de::Error;
    use serde::{Deserialize, Deserializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawFlag {
        Bool(bool),
        Int(i64),
        Text(String),
    }

    pub(super) fn secure<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<RawFlag>::deserialize(deserializer)? {
            None => Ok(None),
            Some(RawFlag::Bool(b)) => Ok(Some(b)),
            Some(RawFlag::Int(i)) => Ok(Some(i != 0)),
            Some(RawFlag::Text(s)) if s.trim().is_empty() => Ok(None),
            Some(RawFlag::Text(s)) => filter_bool(&s).map(Some).ok_or_else(|| {
                D::Error::custom(format!(
                    "`{s}` is not a valid value for `cookie_secure`: expected a boolean flag"
                ))
            }),
        }
    }
}

#[cfg(all(test, feature = "serde"))]
mod tests {
    use googletest::prelude::*;

    use crate::{HeaderFormat, PolicyConfig};

    fn parse(json: &str) -> std::result::Result<PolicyConfig, serde_json::Error> {
        serde_json::from_str(json)
    }

    #[test]
    fn empty_document_yields_defaults() {
        let config = parse("{}").unwrap();
        assert_eq!(config, PolicyConfig::default());
        assert_eq!(config.https_header, "X-Forwarded-Ssl");
        assert!(config.percent_encode);
    }

    #[test]
    fn secure_accepts_flags_and_blank_values() {
        let cases = [
            (r#"{"cookie_secure": true}"#, Some(true)),
            (r#"{"cookie_secure": false}"#, Some(false)),
            (r#"{"cookie_secure": 1}"#, Some(true)),
            (r#"{"cookie_secure": 0}"#, Some(false)),
            (r#"{"cookie_secure": "on"}"#, Some(true)),
            (r#"{"cookie_secure": "Off"}"#, Some(false)),
            (r#"{"cookie_secure": ""}"#, None),
            (r#"{"cookie_secure": null}"#, None),
        ];
        for (json, expected) in cases {
            assert_eq!(parse(json).unwrap().secure, expected, "Failed for {json}");
        }
    }

    #[test]
    fn secure_rejects_unknown_strings() {
        let err = parse(r#"{"cookie_secure": "sometimes"}"#).unwrap_err();
        assert_that!(
            err.to_string(),
            contains_substring("`sometimes` is not a valid value for `cookie_secure`")
        );
    }

    #[test]
    fn full_document() {
        let config = parse(
            r#"{
                "cookie_path": "/",
                "cookie_domain": ".example.com",
                "cookie_secure": "1",
                "cookie_http": true,
                "test_mode": true,
                "https_header": "X-Forwarded-Https",
                "header_format": "legacy",
                "percent_encode": false
            }"#,
        )
        .unwrap();
        assert_eq!(config.path.as_deref(), Some("/"));
        assert_eq!(config.domain.as_deref(), Some(".example.com"));
        assert_eq!(config.secure, Some(true));
        assert!(config.http_only);
        assert!(config.test_mode);
        assert_eq!(config.https_header, "X-Forwarded-Https");
        assert_eq!(config.header_format, HeaderFormat::Legacy);
        assert!(!config.percent_encode);
    }
}
