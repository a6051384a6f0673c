//! URI reference values.

use iri_string::types::{UriReferenceStr, UriReferenceString};
use std::fmt;

/// An RFC 3986 URI reference: an absolute URI such as
/// `https://example.com/cb` or `urn:isbn:0451450523`, or a relative
/// reference such as `../up`, `?page=2` or `#top`.
///
/// The default value is the empty reference.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UriRef(Option<UriReferenceString>);

impl UriRef {
    /// Parse a URI reference, `None` if `raw` is not one.
    pub fn parse(raw: &str) -> Option<Self> {
        if raw.is_empty() {
            return Some(Self::default());
        }
        UriReferenceStr::new(raw)
            .ok()
            .map(|reference| Self(Some(reference.to_owned())))
    }

    /// The reference as written.
    pub fn as_str(&self) -> &str {
        self.0.as_deref().map_or("", UriReferenceStr::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.as_str().is_empty()
    }

    /// Whether the reference has a scheme.
    pub fn is_absolute(&self) -> bool {
        self.0
            .as_deref()
            .is_some_and(|reference| reference.to_iri().is_ok())
    }

    /// The validated reference, for component access.
    pub fn as_reference(&self) -> Option<&UriReferenceStr> {
        self.0.as_deref()
    }
}

impl fmt::Display for UriRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
