use crate::Result;
use crate::protocol::Invalid;

use url::Url;

/// Joins path segments onto a base URL.
///
/// Trailing separators of the base path are dropped first, so
/// `https://a.example.com`, `https://a.example.com/` and
/// `https://a.example.com//` all address the same endpoints. The query of the
/// base is kept. Segments are percent-encoded.
pub(crate) fn endpoint(base: &str, segments: &[&str]) -> Result<Url> {
    let mut url = Url::parse(base)?;

    let path = url.path().trim_end_matches('/').to_owned();
    url.set_path(&path);

    url.path_segments_mut()
        .map_err(|()| Invalid::new("url", "cannot be used as a base"))?
        .pop_if_empty()
        .extend(segments);

    Ok(url)
}

/// Fails when a required string argument is empty.
pub(crate) fn require(name: &'static str, value: &str) -> Result<()> {
    if value.is_empty() {
        return Err(Invalid::new(name, "must be provided").into());
    }

    Ok(())
}
