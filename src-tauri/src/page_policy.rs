use url::Url;

use crate::TARGET_DOMAIN;

// Hosts the captcha flow needs in addition to the target site.
const CAPTCHA_HOSTS: &[&str] = &["google.com", "gstatic.com", "recaptcha.net"];

const CHALLENGE_MARKERS: &[&str] = &["recaptcha", "challenge", "captcha", "verify"];

const INTERNAL_SCHEMES: &[&str] = &["about", "data", "blob", "tauri"];

fn is_web_url(url: &Url) -> bool {
    matches!(url.scheme(), "http" | "https")
}

fn host_matches(host: &str, domain: &str) -> bool {
    let host = host.trim_end_matches('.').to_ascii_lowercase();
    host == domain
        || host
            .strip_suffix(domain)
            .is_some_and(|prefix| prefix.ends_with('.'))
}

pub(crate) fn is_target_page(url: &Url) -> bool {
    is_web_url(url)
        && url
            .host_str()
            .is_some_and(|host| host_matches(host, TARGET_DOMAIN))
}

pub(crate) fn is_challenge_page(url: &Url) -> bool {
    let lowered = url.as_str().to_ascii_lowercase();
    CHALLENGE_MARKERS
        .iter()
        .any(|marker| lowered.contains(marker))
}

pub(crate) fn should_patch_page(url: &Url) -> bool {
    is_target_page(url) && !is_challenge_page(url)
}

pub(crate) fn is_navigation_allowed(url: &Url) -> bool {
    if INTERNAL_SCHEMES.contains(&url.scheme()) {
        return true;
    }
    if !is_web_url(url) {
        return false;
    }

    url.host_str().is_some_and(|host| {
        host_matches(host, TARGET_DOMAIN) || is_captcha_host(host)
    })
}

fn is_captcha_host(host: &str) -> bool {
    CAPTCHA_HOSTS.iter().any(|domain| host_matches(host, domain))
}

/// How a request for a new window (`window.open`, `target="_blank"`) is served.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum NewWindowAction {
    /// Captcha popups stay inside the app.
    Allow,
    OpenExternally,
    Deny,
}

pub(crate) fn new_window_action(url: &Url) -> NewWindowAction {
    if !is_web_url(url) {
        return NewWindowAction::Deny;
    }
    let captcha = url.host_str().is_some_and(is_captcha_host)
        || url.as_str().to_ascii_lowercase().contains("recaptcha");
    if captcha {
        NewWindowAction::Allow
    } else {
        NewWindowAction::OpenExternally
    }
}

pub(crate) fn should_open_externally(url: &Url) -> bool {
    is_web_url(url) && !is_navigation_allowed(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(raw: &str) -> Url {
        Url::parse(raw).unwrap()
    }

    #[test]
    fn target_page_matches_domain_and_subdomains_only() {
        assert!(is_target_page(&url("https://www.perplexity.ai/search?q=rust")));
        assert!(is_target_page(&url("https://perplexity.ai/")));
        assert!(is_target_page(&url("https://labs.Perplexity.ai/")));
        assert!(!is_target_page(&url("https://notperplexity.ai/")));
        assert!(!is_target_page(&url("https://perplexity.ai.example.com/")));
        assert!(!is_target_page(&url("about:blank")));
    }

    #[test]
    fn challenge_pages_are_not_patched() {
        let challenge = url("https://www.perplexity.ai/cdn-cgi/challenge-platform/h/b");
        assert!(is_challenge_page(&challenge));
        assert!(!should_patch_page(&challenge));
        assert!(should_patch_page(&url("https://www.perplexity.ai/discover")));
        assert!(is_challenge_page(&url("https://www.google.com/reCAPTCHA/api2/anchor")));
    }

    #[test]
    fn navigation_allows_captcha_hosts_and_internal_schemes() {
        assert!(is_navigation_allowed(&url("https://www.perplexity.ai/library")));
        assert!(is_navigation_allowed(&url("https://www.google.com/recaptcha/api.js")));
        assert!(is_navigation_allowed(&url("https://www.gstatic.com/recaptcha/x.js")));
        assert!(is_navigation_allowed(&url("https://recaptcha.net/")));
        assert!(is_navigation_allowed(&url("about:blank")));
        assert!(!is_navigation_allowed(&url("https://github.com/")));
        assert!(!is_navigation_allowed(&url("file:///etc/passwd")));
    }

    #[test]
    fn new_windows_open_externally_except_captcha_popups() {
        assert_eq!(
            new_window_action(&url("https://www.google.com/recaptcha/api2/bframe")),
            NewWindowAction::Allow
        );
        assert_eq!(
            new_window_action(&url("https://www.recaptcha.net/recaptcha/api.js")),
            NewWindowAction::Allow
        );
        assert_eq!(
            new_window_action(&url("https://en.wikipedia.org/wiki/Rust")),
            NewWindowAction::OpenExternally
        );
        assert_eq!(
            new_window_action(&url("https://www.perplexity.ai/page/shared")),
            NewWindowAction::OpenExternally
        );
        assert_eq!(
            new_window_action(&url("javascript:alert(1)")),
            NewWindowAction::Deny
        );
    }

    #[test]
    fn only_foreign_web_links_open_externally() {
        assert!(should_open_externally(&url("https://en.wikipedia.org/wiki/Rust")));
        assert!(!should_open_externally(&url("https://www.perplexity.ai/")));
        assert!(!should_open_externally(&url("mailto:someone@example.com")));
    }
}
