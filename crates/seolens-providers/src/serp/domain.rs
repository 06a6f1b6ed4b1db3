use reqwest::Url;

/// Returns the host (and port, if any) of `url` without a leading `www.`.
///
/// Returns an empty string for anything that does not parse as an absolute
/// URL with a host.
#[must_use]
pub fn extract_domain(url: &str) -> String {
    let Ok(parsed) = Url::parse(url.trim()) else {
        return String::new();
    };
    let Some(host) = parsed.host_str() else {
        return String::new();
    };
    let host = host.strip_prefix("www.").unwrap_or(host);
    match parsed.port() {
        Some(port) => format!("{host}:{port}"),
        None => host.to_owned(),
    }
}
