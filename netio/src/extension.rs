//! Archive extension detection (spec.md §4.2 step 1): derive from
//! `Content-Disposition`'s filename parameter, falling back to the URL's
//! last `.<ext>` before any query string. Only `rar` and `zip` are
//! recognized; anything else defaults to `rar` — a known deficiency per
//! spec.md §9 that this workspace does not silently expand around.
use reqwest::header::HeaderMap;

pub fn detect_archive_extension(headers: &HeaderMap, url: &str) -> &'static str {
    if let Some(ext) = filename_from_content_disposition(headers).and_then(|name| extension_of(&name)) {
        return normalize(&ext);
    }
    if let Some(ext) = extension_from_url(url) {
        return normalize(&ext);
    }
    "rar"
}

fn filename_from_content_disposition(headers: &HeaderMap) -> Option<String> {
    let raw = headers.get(reqwest::header::CONTENT_DISPOSITION)?.to_str().ok()?;
    for part in raw.split(';') {
        let part = part.trim();
        if let Some(rest) = part.strip_prefix("filename*=") {
            // RFC 5987 encoded form, e.g. UTF-8''name.zip
            let value = rest.trim_matches('"');
            if let Some(idx) = value.find("''") {
                return Some(value[idx + 2..].to_string());
            }
            return Some(value.to_string());
        }
        if let Some(rest) = part.strip_prefix("filename=") {
            return Some(rest.trim_matches('"').to_string());
        }
    }
    None
}

fn extension_from_url(url: &str) -> Option<String> {
    let without_query = url.split(['?', '#']).next().unwrap_or(url);
    let last_segment = without_query.rsplit('/').next().unwrap_or(without_query);
    extension_of(last_segment)
}

fn extension_of(name: &str) -> Option<String> {
    let (_, ext) = name.rsplit_once('.')?;
    if ext.is_empty() {
        None
    } else {
        Some(ext.to_string())
    }
}

fn normalize(ext: &str) -> &'static str {
    match ext.to_ascii_lowercase().as_str() {
        "zip" => "zip",
        "rar" => "rar",
        _ => "rar",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::{HeaderValue, CONTENT_DISPOSITION};

    #[test]
    fn prefers_content_disposition_filename() {
        let mut headers = HeaderMap::new();
        headers.insert(
            CONTENT_DISPOSITION,
            HeaderValue::from_static("attachment; filename=\"Game.zip\""),
        );
        assert_eq!(detect_archive_extension(&headers, "https://host/file?x=1"), "zip");
    }

    #[test]
    fn falls_back_to_url_extension_before_query_string() {
        let headers = HeaderMap::new();
        assert_eq!(
            detect_archive_extension(&headers, "https://host/archive.rar?token=abc"),
            "rar"
        );
    }

    #[test]
    fn unrecognized_extension_defaults_to_rar() {
        let headers = HeaderMap::new();
        assert_eq!(detect_archive_extension(&headers, "https://host/file.7z"), "rar");
        assert_eq!(detect_archive_extension(&headers, "https://host/file"), "rar");
    }
}
