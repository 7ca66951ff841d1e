use crate::{PolicyConfig, RequestCookie, ResponseCookie};
use anyhow::Context;
use percent_encoding::{percent_decode, AsciiSet, CONTROLS};

/// https://url.spec.whatwg.org/#userinfo-percent-encode-set
/// + https://www.rfc-editor.org/rfc/rfc6265#section-4.1.1 + '(', ')'
const COOKIE: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'<')
    .add(b'>')
    .add(b'`')
    .add(b'#')
    .add(b'?')
    .add(b'{')
    .add(b'}')
    .add(b'/')
    .add(b':')
    .add(b';')
    .add(b'=')
    .add(b'@')
    .add(b'[')
    .add(b'\\')
    .add(b']')
    .add(b'^')
    .add(b'|')
    .add(b'%')
    .add(b'(')
    .add(b')')
    .add(b',');

/// Transforms cookie names and values on their way out to the client, or
/// after they have been parsed from an incoming request.
///
/// A processor is created from a [`PolicyConfig`]:
///
/// ```rust
/// use cookie_policy::{PolicyConfig, Processor, ResponseCookie};
///
/// let processor = Processor::from(&PolicyConfig::default());
/// let cookie = processor.process_outgoing(ResponseCookie::new("a b", "c;d"));
/// assert_eq!(cookie.name_value(), ("a%20b", "c%3Bd"));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Processor {
    percent_encode: bool,
}

impl From<&PolicyConfig> for Processor {
    fn from(value: &PolicyConfig) -> Self {
        Processor {
            percent_encode: value.percent_encode,
        }
    }
}

impl Default for Processor {
    fn default() -> Self {
        Processor::from(&PolicyConfig::default())
    }
}

impl Processor {
    /// A processor that leaves cookie names and values untouched.
    pub fn verbatim() -> Self {
        Processor {
            percent_encode: false,
        }
    }

    /// Transform a [`ResponseCookie`] before it is sent to the client.
    pub fn process_outgoing<'c>(&self, mut cookie: ResponseCookie<'c>) -> ResponseCookie<'c> {
        if self.percent_encode {
            let name = percent_encoding::utf8_percent_encode(&cookie.name, COOKIE).to_string();
            let value = percent_encoding::utf8_percent_encode(&cookie.value, COOKIE).to_string();
            cookie.name = name.into();
            cookie.value = value.into();
        }
        cookie
    }

    /// Transform a name-value pair parsed from a `Cookie` header into a [`RequestCookie`].
    pub fn process_incoming<'c>(
        &self,
        name: &'c str,
        value: &'c str,
    ) -> Result<RequestCookie<'c>, DecodingError> {
        if !self.percent_encode {
            return Ok(RequestCookie::new(name, value));
        }

        let decoded_name = percent_decode(name.as_bytes())
            .decode_utf8()
            .context("Failed to percent-decode the cookie name")
            .map_err(|e| DecodingError {
                source: e,
                raw_value: name.to_string(),
            })?;
        let decoded_value = percent_decode(value.as_bytes())
            .decode_utf8()
            .with_context(|| {
                format!(
                    "Failed to percent-decode the value of the `{}` cookie: `{}`",
                    decoded_name, value
                )
            })
            .map_err(|e| DecodingError {
                raw_value: value.to_string(),
                source: e,
            })?;

        Ok(RequestCookie::new(decoded_name, decoded_value))
    }
}

#[derive(Debug, thiserror::Error)]
#[error("{source}")]
/// An error that occurred while decoding a percent-encoded cookie name or value.
///
/// This error is returned by [`Processor::process_incoming`].
pub struct DecodingError {
    pub(crate) raw_value: String,
    #[source]
    pub(crate) source: anyhow::Error,
}

impl DecodingError {
    /// The name or value that could not be decoded, as received.
    pub fn raw_value(&self) -> &str {
        &self.raw_value
    }
}
