//! Trusted-host policy for the hosted Steam pages.
//!
//! Pages on a trusted host stay inside the main window and may reach the
//! notification relay. Anything else is handed to the system browser.

use tauri::{AppHandle, Url};
use tauri_plugin_opener::OpenerExt;

/// Check whether `host` is one of `trusted` or a subdomain of one.
///
/// `evilsteamcommunity.com` does not match `steamcommunity.com`.
pub fn is_trusted_host(host: &str, trusted: &[String]) -> bool {
    let host = host.trim_end_matches('.').to_ascii_lowercase();
    trusted.iter().any(|t| {
        let t = t.to_ascii_lowercase();
        host == t || host.ends_with(&format!(".{}", t))
    })
}

/// Check whether `url` points at a trusted host over http(s).
pub fn is_trusted_url(url: &Url, trusted: &[String]) -> bool {
    matches!(url.scheme(), "https" | "http")
        && url.host_str().is_some_and(|host| is_trusted_host(host, trusted))
}

/// Stricter check for the relay: only https pages on a trusted host count.
pub fn is_trusted_origin(url: &Url, trusted: &[String]) -> bool {
    url.scheme() == "https" && is_trusted_url(url, trusted)
}

/// Where a link the page follows or opens should go.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkTarget {
    /// Trusted Steam page, stays in the app.
    InApp,
    /// Other http(s) page, handed to the system browser.
    Browser,
    /// Not a web link (about:, blob:, data:, javascript:).
    NonWeb,
}

pub fn link_target(url: &Url, trusted: &[String]) -> LinkTarget {
    if !matches!(url.scheme(), "http" | "https") {
        LinkTarget::NonWeb
    } else if is_trusted_url(url, trusted) {
        LinkTarget::InApp
    } else {
        LinkTarget::Browser
    }
}

/// Resolve a Steam `linkfilter` redirect to the page it points at.
///
/// Chat links are wrapped as `/linkfilter/?u=<target>` (older pages use
/// `url=`). Anything else, or a filter without a parseable target, is
/// returned as is.
pub fn unwrap_linkfilter(url: &Url, trusted: &[String]) -> Url {
    if !is_trusted_url(url, trusted) || !url.path().starts_with("/linkfilter") {
        return url.clone();
    }
    url.query_pairs()
        .find(|(key, _)| key == "u" || key == "url")
        .and_then(|(_, target)| Url::parse(&target).ok())
        .unwrap_or_else(|| url.clone())
}

/// Open a URL in the user's default browser.
pub fn open_external(app: &AppHandle, url: &Url) {
    log::info!("[LINKS] Opening external URL {}", url);
    if let Err(e) = app.opener().open_url(url.as_str(), None::<&str>) {
        log::warn!("[LINKS] Failed to open {}: {}", url, e);
    }
}

/// Hook called after every finished page load.
///
/// Remembering the last chat room is not implemented; the hook only
/// filters to trusted pages so a store can be plugged in here later.
pub fn save_last_url(url: &Url, trusted: &[String]) {
    if is_trusted_url(url, trusted) {
        log::debug!("[LINKS] Visited {}", url);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trusted() -> Vec<String> {
        vec![
            "steamcommunity.com".to_string(),
            "steampowered.com".to_string(),
        ]
    }

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn test_exact_and_subdomain_hosts() {
        assert!(is_trusted_host("steamcommunity.com", &trusted()));
        assert!(is_trusted_host("store.steampowered.com", &trusted()));
        assert!(is_trusted_host("STEAMCOMMUNITY.COM", &trusted()));
        assert!(is_trusted_host("steamcommunity.com.", &trusted()));
    }

    #[test]
    fn test_lookalike_hosts_rejected() {
        assert!(!is_trusted_host("evilsteamcommunity.com", &trusted()));
        assert!(!is_trusted_host("steamcommunity.com.evil.net", &trusted()));
        assert!(!is_trusted_host("example.com", &trusted()));
        assert!(!is_trusted_host("", &trusted()));
    }

    #[test]
    fn test_trusted_url_schemes() {
        assert!(is_trusted_url(&url("https://steamcommunity.com/chat"), &trusted()));
        assert!(is_trusted_url(&url("http://store.steampowered.com/"), &trusted()));
        assert!(!is_trusted_url(&url("file:///etc/passwd"), &trusted()));
        assert!(!is_trusted_url(&url("https://youtube.com/watch"), &trusted()));
    }

    #[test]
    fn test_trusted_origin_requires_https() {
        assert!(is_trusted_origin(&url("https://steamcommunity.com/chat"), &trusted()));
        assert!(!is_trusted_origin(&url("http://steamcommunity.com/chat"), &trusted()));
        assert!(!is_trusted_origin(&url("https://example.com/"), &trusted()));
    }

    #[test]
    fn test_link_targets() {
        let hosts = trusted();
        assert_eq!(link_target(&url("https://steamcommunity.com/chat/"), &hosts), LinkTarget::InApp);
        assert_eq!(link_target(&url("https://store.steampowered.com/app/10"), &hosts), LinkTarget::InApp);
        assert_eq!(
            link_target(&url("https://steamcommunity.com/linkfilter/?u=https://youtube.com"), &hosts),
            LinkTarget::InApp
        );
        assert_eq!(link_target(&url("https://www.youtube.com/watch?v=1"), &hosts), LinkTarget::Browser);
        assert_eq!(link_target(&url("http://evilsteamcommunity.com/"), &hosts), LinkTarget::Browser);
        assert_eq!(link_target(&url("about:blank"), &hosts), LinkTarget::NonWeb);
        assert_eq!(link_target(&url("javascript:void(0)"), &hosts), LinkTarget::NonWeb);
    }

    #[test]
    fn test_linkfilter_is_unwrapped() {
        let hosts = trusted();
        let wrapped = url("https://steamcommunity.com/linkfilter/?u=https%3A%2F%2Fwww.youtube.com%2Fwatch%3Fv%3D1");
        let target = unwrap_linkfilter(&wrapped, &hosts);
        assert_eq!(target.as_str(), "https://www.youtube.com/watch?v=1");
        assert_eq!(link_target(&target, &hosts), LinkTarget::Browser);

        let legacy = url("https://steamcommunity.com/linkfilter/?url=https://example.com/");
        assert_eq!(unwrap_linkfilter(&legacy, &hosts).as_str(), "https://example.com/");
    }

    #[test]
    fn test_linkfilter_left_alone_when_not_applicable() {
        let hosts = trusted();
        for raw in [
            "https://steamcommunity.com/linkfilter/",
            "https://steamcommunity.com/linkfilter/?u=not%20a%20url",
            "https://steamcommunity.com/chat/?u=https://example.com/",
            "https://example.com/linkfilter/?u=https://evil.com/",
        ] {
            let original = url(raw);
            assert_eq!(unwrap_linkfilter(&original, &hosts), original, "{}", raw);
        }
    }

    #[test]
    fn test_empty_trust_list() {
        assert!(!is_trusted_url(&url("https://steamcommunity.com/chat"), &[]));
    }
}
