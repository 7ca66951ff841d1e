//! Default-driven HTTP cookie handling for Rust servers.
//!
//! # Overview
//!
//! Most cookies an application sets share the same attributes: the same path,
//! the same domain, the same `HttpOnly` and `Secure` flags.
//! `cookie-policy` lets you configure those defaults once, via [`PolicyConfig`],
//! and then read, write and expire cookies through a [`CookiePolicy`], overriding
//! the defaults only where a call needs to.
//!
//! It has support for:
//!
//! - Reading cookies attached to incoming requests, via [`CookiePolicy::get_cookie`]
//! - Writing cookies, via [`CookiePolicy::set_cookie`]
//! - Expiring cookies on the client, via [`CookiePolicy::delete_cookie`]
//!
//! In particular:
//!
//! - The `Secure` default can be inferred from a forwarded-HTTPS header
//!   (e.g. `X-Forwarded-Ssl: on`) set by a reverse proxy
//! - `Secure` cookies are sent with `SameSite=None`, so that they keep working
//!   in cross-site contexts (e.g. embedded forms)
//! - Hosts that cannot emit a `SameSite` attribute can use the
//!   [`HeaderFormat::Legacy`] encoding instead
//! - Nothing is emitted in test mode or outside of a request
//! - Cookies are percent-encoded/decoded by default (but you can opt out)
//!
//! # Non-goals
//!
//! `cookie-policy` does not sign or encrypt cookies, and it doesn't handle
//! cookies on the client side.
//!
//! # Quickstart
//!
//! ```rust
//! use cookie_policy::{CookieAttributes, CookiePolicy, PolicyConfig, Processor, RequestContext};
//! use cookie_policy::time::Duration;
//! use http::{header, HeaderMap};
//!
//! // Load the defaults once, at startup.
//! let mut config = PolicyConfig::default();
//! config.path = Some("/".to_string());
//! config.http_only = true;
//!
//! // For each request, capture its cookies and HTTPS signal...
//! let mut request_headers = HeaderMap::new();
//! request_headers.insert(header::COOKIE, "visits=41".parse().unwrap());
//! request_headers.insert("x-forwarded-ssl", "on".parse().unwrap());
//! let request = RequestContext::from_headers(&request_headers, &config);
//!
//! // ...and build a policy for it.
//! let policy = CookiePolicy::new(&config, Some(&request));
//! let visits: u32 = policy.get_cookie("visits", "0").parse().unwrap();
//!
//! // Cookies are written into the response headers by a sink.
//! let mut response_headers = HeaderMap::new();
//! let mut sink = config
//!     .header_format
//!     .sink(&mut response_headers, Processor::from(&config));
//! policy
//!     .set_cookie(
//!         &mut sink,
//!         "visits",
//!         (visits + 1).to_string(),
//!         Duration::ZERO,
//!         &CookieAttributes::new(),
//!     )
//!     .unwrap();
//! policy
//!     .delete_cookie(&mut sink, "legacy_tracking", &CookieAttributes::new().set_path("/old"))
//!     .unwrap();
//! drop(sink);
//!
//! let values: Vec<_> = response_headers
//!     .get_all(header::SET_COOKIE)
//!     .iter()
//!     .map(|v| v.to_str().unwrap())
//!     .collect();
//! assert_eq!(values[0], "visits=42; HttpOnly; SameSite=None; Secure; Path=/");
//! assert!(values[1].starts_with("legacy_tracking=; HttpOnly; SameSite=None; Secure; Path=/old; Expires="));
//! ```
//!
//! # Logging
//!
//! `cookie-policy` emits [`tracing`](https://docs.rs/tracing) events: the
//! inferred `Secure` default and skipped emissions at `DEBUG` level, emitted
//! cookies at `TRACE` level, malformed request headers at `WARN` level.
//!
//! ## Credits
//!
//! The cookie model, the `Cookie` header parser and the `Set-Cookie` formatter
//! are derived from [`biscotti`](https://crates.io/crates/biscotti), itself a
//! fork of the [`cookie` crate](https://crates.io/crates/cookie) [Copyright (c) 2017 Sergio Benitez,
//! Copyright (c) 2014 Alex Crichton].
//!
//! [`PolicyConfig`]: crate::PolicyConfig
//! [`CookiePolicy`]: crate::CookiePolicy

pub mod config;
mod expiration;
mod policy;
mod processor;
mod request_context;
mod request_cookie;
mod request_cookies;
mod response_cookie;
mod response_cookie_id;
mod response_cookies;
mod same_site;
pub mod sink;
pub mod truthy;

pub use crate::expiration::*;
pub use crate::same_site::*;
pub use config::PolicyConfig;
pub use policy::{CookieAttributes, CookiePolicy, SetOutcome, DEFAULT_MAX_AGE, REMOVAL_MAX_AGE};
pub use processor::Processor;
pub use request_context::RequestContext;
pub use request_cookie::RequestCookie;
pub use request_cookies::RequestCookies;
pub use response_cookie::ResponseCookie;
pub use response_cookie_id::ResponseCookieId;
pub use response_cookies::ResponseCookies;
pub use sink::{CookieSink, HeaderFormat, LegacyHeaderSink, StructuredHeaderSink};
pub use time;

/// Errors that can occur when using `cookie-policy`.
pub mod errors {
    pub use crate::processor::DecodingError;
    pub use crate::request_cookies::{EmptyNameError, MissingPairError, ParseError};
    pub use crate::sink::SinkError;
}
