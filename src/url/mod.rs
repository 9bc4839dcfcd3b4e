//! URL handling for sitemapper
//!
//! This module provides the query/fragment-stripping normalizer used for
//! every URL the crawler stores, and seed validation for the CLI.

mod normalize;

pub use normalize::normalize_url;

use crate::SitemapperError;
use url::Url;

/// Validates a raw seed URL and returns its canonical form
///
/// The raw string is normalized (query and fragment stripped), then parsed
/// as an absolute URL. The parsed URL's serialized form is the canonical
/// seed; serialization gives a bare authority an explicit `/` path, so a
/// page linking back to `/` compares equal to the seed.
///
/// # Arguments
///
/// * `raw` - The URL string as given on the command line
///
/// # Returns
///
/// * `Ok(String)` - The canonical seed URL
/// * `Err(SitemapperError)` - The URL is relative, malformed, or has no host
///
/// # Examples
///
/// ```
/// use sitemapper::canonicalize_seed;
///
/// let seed = canonicalize_seed("https://example.com?ref=home").unwrap();
/// assert_eq!(seed, "https://example.com/");
/// assert!(canonicalize_seed("noscheme.com").is_err());
/// ```
pub fn canonicalize_seed(raw: &str) -> crate::Result<String> {
    let normalized = normalize_url(raw);
    let parsed = Url::parse(&normalized).map_err(|source| SitemapperError::InvalidSeed {
        url: raw.to_string(),
        source,
    })?;

    if parsed.host_str().is_none() {
        return Err(SitemapperError::MissingHost(raw.to_string()));
    }

    Ok(parsed.to_string())
}
