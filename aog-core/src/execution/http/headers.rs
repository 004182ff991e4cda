//! HTTP header helpers.

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};

use crate::error::AdapterError;

fn header_pair(name: &str, value: &str) -> Result<(HeaderName, HeaderValue), AdapterError> {
    let header_name = HeaderName::from_bytes(name.as_bytes()).map_err(|e| {
        AdapterError::ConfigurationError(format!("Invalid header name '{name}': {e}"))
    })?;
    let header_value = HeaderValue::from_str(value).map_err(|e| {
        AdapterError::ConfigurationError(format!("Invalid header value for '{name}': {e}"))
    })?;
    Ok((header_name, header_value))
}

/// Build a header map, failing on the first invalid entry.
pub fn header_map<'a>(
    pairs: impl IntoIterator<Item = (&'a str, &'a str)>,
) -> Result<HeaderMap, AdapterError> {
    let mut headers = HeaderMap::new();
    for (name, value) in pairs {
        let (name, value) = header_pair(name, value)?;
        headers.insert(name, value);
    }
    Ok(headers)
}

/// Insert every valid entry, logging and skipping the rest.
pub fn insert_lenient(headers: &mut HeaderMap, pairs: &[(String, String)]) {
    for (name, value) in pairs {
        match header_pair(name, value) {
            Ok((name, value)) => {
                headers.insert(name, value);
            }
            Err(e) => tracing::warn!(error = %e, "skipping extra header"),
        }
    }
}
