//! URL building for service endpoints.
//!
//! The symbolizer never fetches anything; it only composes endpoint URLs
//! (e.g. the marker image endpoint) that the drawing backend loads itself.

/// Characters left unescaped by [`encode_component`], besides ASCII
/// alphanumerics.
const UNRESERVED_MARKS: &[u8] = b"-_.!~*'()";

/// Percent-encode a query component.
///
/// Every byte of the UTF-8 encoding is escaped except ASCII alphanumerics
/// and `-_.!~*'()`, which matches what browsers send for form components.
#[must_use]
pub fn encode_component(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for byte in raw.bytes() {
        if byte.is_ascii_alphanumeric() || UNRESERVED_MARKS.contains(&byte) {
            out.push(char::from(byte));
        } else {
            out.push_str(&format!("%{byte:02X}"));
        }
    }
    out
}

/// Serialize `(key, value)` pairs into a query string without the leading `?`.
///
/// Keys and values are percent-encoded, pairs are joined with `&` in the
/// given order.
#[must_use]
pub fn parameter_string(params: &[(&str, String)]) -> String {
    params
        .iter()
        .map(|(key, value)| format!("{}={}", encode_component(key), encode_component(value)))
        .collect::<Vec<_>>()
        .join("&")
}

/// Append a query string to a URL.
///
/// Uses `?` when the URL has no query yet, `&` otherwise, and nothing when
/// the URL already ends with one of the two separators.
#[must_use]
pub fn append_query(url: &str, query: &str) -> String {
    if query.is_empty() {
        return url.to_string();
    }
    if url.ends_with('?') || url.ends_with('&') {
        format!("{url}{query}")
    } else if url.contains('?') {
        format!("{url}&{query}")
    } else {
        format!("{url}?{query}")
    }
}

/// Join a resource name onto a base URL with exactly one `/` between them.
///
/// A query string on the base is kept after the joined path.
#[must_use]
pub fn join_path(base: &str, resource: &str) -> String {
    let (path, query) = base.split_once('?').map_or((base, None), |(p, q)| (p, Some(q)));
    let resource = resource.trim_start_matches('/');
    let joined = format!("{}/{resource}", path.trim_end_matches('/'));
    match query {
        Some(query) => append_query(&joined, query),
        None => joined,
    }
}
