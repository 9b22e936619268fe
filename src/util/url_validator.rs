use thiserror::Error;
use url::Url;

/// Reasons a catalog link is refused before handing it to the browser.
#[derive(Error, Debug)]
pub enum UrlValidationError {
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Unsupported scheme: {0} (only http/https allowed)")]
    UnsupportedScheme(String),

    #[error("URL has no host")]
    MissingHost,
}

/// Check that a link is safe to open in the system browser.
///
/// Only `http` and `https` URLs with a host are accepted; `file:`, `javascript:`
/// and similar schemes are rejected since catalog files may come from anywhere.
///
/// ```
/// use econ_atlas::util::validate_url_for_open;
///
/// assert!(validate_url_for_open("https://www.aeaweb.org/").is_ok());
/// assert!(validate_url_for_open("file:///etc/passwd").is_err());
/// ```
pub fn validate_url_for_open(url_str: &str) -> Result<Url, UrlValidationError> {
    let url = Url::parse(url_str.trim())?;

    match url.scheme() {
        "http" | "https" => {}
        scheme => return Err(UrlValidationError::UnsupportedScheme(scheme.to_owned())),
    }

    match url.host_str() {
        Some(host) if !host.is_empty() => Ok(url),
        _ => Err(UrlValidationError::MissingHost),
    }
}
