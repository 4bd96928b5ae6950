use crate::UrlError;
use ::url::Url;

/// Schemes the crawler will follow
const ACCEPTED_SCHEMES: &[&str] = &["https://", "http://"];

/// Resolves a raw href into an absolute, crawlable URL
///
/// # Rules
///
/// 1. An href starting with `/` is relative: it is joined against the URL of
///    the page it appeared on, inheriting that page's scheme and host.
/// 2. Anything else must already be absolute: it needs a recognized
///    http/https scheme prefix and a dotted domain, or it is rejected.
///
/// # Arguments
///
/// * `href` - The raw href as extracted from the page
/// * `src` - The URL of the page that referenced it
///
/// # Returns
///
/// * `Ok(Url)` - An absolute URL safe to register
/// * `Err(UrlError)` - The href cannot become a crawlable link
pub fn resolve_link(href: &str, src: &Url) -> Result<Url, UrlError> {
    let href = href.trim();

    if href.starts_with('/') {
        return src.join(href).map_err(|e| UrlError::Parse(e.to_string()));
    }

    if !accept_link(href) {
        if ACCEPTED_SCHEMES.iter().any(|p| href.starts_with(p)) {
            return Err(UrlError::MissingDomain(href.to_string()));
        }
        return Err(UrlError::MissingScheme(href.to_string()));
    }

    Url::parse(href).map_err(|e| UrlError::Parse(e.to_string()))
}

/// Checks whether an absolute candidate passes the accept rule:
/// a recognized scheme prefix and a dotted domain
pub fn accept_link(link: &str) -> bool {
    let has_scheme = ACCEPTED_SCHEMES.iter().any(|p| link.starts_with(p));
    has_scheme && has_dotted_domain(link)
}

/// Looks for a word character, a dot, and another word character in sequence
fn has_dotted_domain(link: &str) -> bool {
    let bytes = link.as_bytes();
    bytes.windows(3).any(|w| {
        is_word_byte(w[0]) && w[1] == b'.' && is_word_byte(w[2])
    })
}

fn is_word_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}
