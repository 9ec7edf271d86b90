use url::Url;

/// Path extensions identifying binary assets the crawler never fetches
const ASSET_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "pdf"];

/// Decides whether a candidate link may be enqueued into the frontier
///
/// # Admission Rules
///
/// **Reject:**
/// - Candidates whose host differs from the origin's host (same-domain
///   scope; exact match, no subdomain generalization)
/// - Candidates whose path ends in a binary-asset extension
///   (jpg, jpeg, png, gif, pdf, case-insensitive)
///
/// Malformed candidates never reach this function: they are dropped when
/// normalization fails.
///
/// # Arguments
///
/// * `candidate` - The discovered link, already normalized
/// * `origin` - The page the link was discovered on
///
/// # Examples
///
/// ```
/// use driftnet::url::admit_link;
/// use url::Url;
///
/// let origin = Url::parse("https://example.com/a").unwrap();
/// let same = Url::parse("https://example.com/b").unwrap();
/// let cross = Url::parse("https://other.com/x").unwrap();
/// assert!(admit_link(&same, &origin));
/// assert!(!admit_link(&cross, &origin));
/// ```
pub fn admit_link(candidate: &Url, origin: &Url) -> bool {
    match (candidate.host_str(), origin.host_str()) {
        (Some(candidate_host), Some(origin_host)) if candidate_host == origin_host => {}
        _ => return false,
    }

    !is_asset_path(candidate.path())
}

/// Checks whether a URL path ends in a known binary-asset extension
fn is_asset_path(path: &str) -> bool {
    let ext = match path.rsplit_once('.') {
        Some((_, ext)) => ext.to_ascii_lowercase(),
        None => return false,
    };
    ASSET_EXTENSIONS.contains(&ext.as_str())
}
