//! Remote document fetching.

use std::borrow::Cow;
use std::time::Duration;

use percent_encoding::percent_decode_str;
use url::Url;

use super::error::LoadError;

/// Source of remote document text.
pub trait Fetcher {
    /// Fetch the body at `url` as text.
    fn fetch(&self, url: &str) -> Result<String, LoadError>;
}

/// Blocking HTTP(S) fetcher.
pub struct HttpFetcher {
    agent: ureq::Agent,
}

impl HttpFetcher {
    pub fn new(timeout: Duration) -> Self {
        let agent: ureq::Agent = ureq::Agent::config_builder()
            .timeout_global(Some(timeout))
            .build()
            .into();
        Self { agent }
    }
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new(Duration::from_secs(30))
    }
}

impl Fetcher for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<String, LoadError> {
        tracing::info!(url, "fetching composition");

        let mut response = self
            .agent
            .get(url)
            .call()
            .map_err(|err| LoadError::fetch(url, err))?;

        response
            .body_mut()
            .read_to_string()
            .map_err(|err| LoadError::fetch(url, err))
    }
}

// =============================================================================
// URL handling
// =============================================================================

/// Accept `url` as given when it parses, otherwise its percent-decoded form.
///
/// Fails with the error for the original text when neither form is a URL.
pub fn normalize_url(url: &str) -> Result<String, LoadError> {
    if is_url(url) {
        return Ok(url.to_string());
    }

    match percent_decode(url) {
        Some(decoded) if is_url(&decoded) => Ok(decoded),
        _ => Err(LoadError::fetch(url, format!("Invalid URL: {url}"))),
    }
}

/// Absolute URL by WHATWG parsing rules.
fn is_url(text: &str) -> bool {
    Url::parse(text).is_ok()
}

/// Decode `%XX` escapes. `None` if the result is not UTF-8.
///
/// Malformed escapes are kept as written.
fn percent_decode(text: &str) -> Option<String> {
    percent_decode_str(text)
        .decode_utf8()
        .ok()
        .map(Cow::into_owned)
}
